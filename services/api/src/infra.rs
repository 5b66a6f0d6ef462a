use metrics_exporter_prometheus::PrometheusHandle;
use money_pilot::config::{AdvisoryConfig, StorageConfig};
use money_pilot::error::AppError;
use money_pilot::planning::{
    AdvisoryGenerator, GeminiAdvisor, InMemoryPlanRepository, JsonFilePlanRepository,
    PlanRecord, PlanRepository, PlanningService, RepositoryError, StaticAdvisor, UserId,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) type SharedPlanning = Arc<PlanningService<PlanStore>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) planning: SharedPlanning,
    pub(crate) advisor: Arc<dyn AdvisoryGenerator>,
}

/// Storage picked at startup: files when a data directory is configured, memory otherwise.
pub(crate) enum PlanStore {
    Memory(InMemoryPlanRepository),
    Files(JsonFilePlanRepository),
}

impl PlanStore {
    pub(crate) fn from_config(config: &StorageConfig) -> Result<Self, AppError> {
        match &config.data_dir {
            Some(dir) => {
                let repository = JsonFilePlanRepository::open(dir)?;
                info!(data_dir = %repository.root().display(), "storing plans on disk");
                Ok(Self::Files(repository))
            }
            None => {
                info!("APP_DATA_DIR not set; plans are kept in memory");
                Ok(Self::Memory(InMemoryPlanRepository::new()))
            }
        }
    }
}

impl PlanRepository for PlanStore {
    fn save(&self, record: PlanRecord) -> Result<PlanRecord, RepositoryError> {
        match self {
            Self::Memory(store) => store.save(record),
            Self::Files(store) => store.save(record),
        }
    }

    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, RepositoryError> {
        match self {
            Self::Memory(store) => store.load(user_id),
            Self::Files(store) => store.load(user_id),
        }
    }

    fn delete(&self, user_id: &UserId) -> Result<bool, RepositoryError> {
        match self {
            Self::Memory(store) => store.delete(user_id),
            Self::Files(store) => store.delete(user_id),
        }
    }
}

pub(crate) fn build_advisor(config: &AdvisoryConfig) -> Arc<dyn AdvisoryGenerator> {
    if !config.is_enabled() {
        info!("GEMINI_API_KEY not set; serving canned advice");
        return Arc::new(StaticAdvisor);
    }

    match GeminiAdvisor::from_config(config) {
        Ok(advisor) => Arc::new(advisor),
        Err(err) => {
            warn!(error = %err, "advisory client unavailable; serving canned advice");
            Arc::new(StaticAdvisor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use money_pilot::planning::FinancialPlan;
    use std::time::Duration;

    #[test]
    fn data_dir_selects_file_store() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = PlanStore::from_config(&StorageConfig {
            data_dir: Some(dir.path().join("plans")),
        })
        .expect("store opens");
        assert!(matches!(store, PlanStore::Files(_)));

        let user = UserId("infra_test".to_string());
        store
            .save(PlanRecord::new(user.clone(), FinancialPlan::default()))
            .expect("save");
        assert!(dir.path().join("plans/moneypilot_data_infra_test.json").exists());
        assert!(store.delete(&user).expect("delete"));
    }

    #[test]
    fn missing_data_dir_selects_memory_store() {
        let store = PlanStore::from_config(&StorageConfig { data_dir: None }).expect("store");
        assert!(matches!(store, PlanStore::Memory(_)));
    }

    #[tokio::test]
    async fn advisor_without_key_serves_fallback() {
        let advisor = build_advisor(&AdvisoryConfig {
            api_key: None,
            api_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
        });
        let advice = advisor
            .advise(
                &FinancialPlan::default(),
                &money_pilot::planning::AdvisoryRequest::ActionPlan,
            )
            .await;
        assert_eq!(advice.source, money_pilot::planning::AdvisorySource::Fallback);
    }
}
