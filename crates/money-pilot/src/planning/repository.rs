use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::domain::{FinancialPlan, UserId};

/// Stored plan plus the time it was last written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub user_id: UserId,
    pub plan: FinancialPlan,
    pub updated_at: DateTime<Utc>,
}

impl PlanRecord {
    pub fn new(user_id: UserId, plan: FinancialPlan) -> Self {
        Self {
            user_id,
            plan,
            updated_at: Utc::now(),
        }
    }
}

/// Storage abstraction keyed by user; saving an existing user overwrites.
pub trait PlanRepository: Send + Sync {
    fn save(&self, record: PlanRecord) -> Result<PlanRecord, RepositoryError>;
    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, RepositoryError>;
    /// Returns whether a record existed.
    fn delete(&self, user_id: &UserId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("user id '{0}' cannot be used as a storage key")]
    InvalidKey(String),
    #[error("stored plan is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage io failure: {0}")]
    Io(#[from] io::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct InMemoryPlanRepository {
    records: Mutex<HashMap<UserId, PlanRecord>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, PlanRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("plan store lock poisoned".to_string()))
    }
}

impl PlanRepository for InMemoryPlanRepository {
    fn save(&self, record: PlanRecord) -> Result<PlanRecord, RepositoryError> {
        self.records()?
            .insert(record.user_id.clone(), record.clone());
        Ok(record)
    }

    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, RepositoryError> {
        Ok(self.records()?.get(user_id).cloned())
    }

    fn delete(&self, user_id: &UserId) -> Result<bool, RepositoryError> {
        Ok(self.records()?.remove(user_id).is_some())
    }
}

/// One JSON document per user, named `moneypilot_data_<user>.json`.
#[derive(Debug, Clone)]
pub struct JsonFilePlanRepository {
    root: PathBuf,
}

impl JsonFilePlanRepository {
    /// Creates the data directory when it does not exist yet.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, user_id: &UserId) -> Result<PathBuf, RepositoryError> {
        let key = user_id.0.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !valid {
            return Err(RepositoryError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("moneypilot_data_{key}.json")))
    }
}

impl PlanRepository for JsonFilePlanRepository {
    fn save(&self, record: PlanRecord) -> Result<PlanRecord, RepositoryError> {
        let path = self.path_for(&record.user_id)?;
        let payload = serde_json::to_vec_pretty(&record)?;
        // Each write stages into its own file, so concurrent saves never share one.
        let mut staging = NamedTempFile::new_in(&self.root)?;
        staging.write_all(&payload)?;
        staging.persist(&path).map_err(|err| err.error)?;
        Ok(record)
    }

    fn load(&self, user_id: &UserId) -> Result<Option<PlanRecord>, RepositoryError> {
        let path = self.path_for(user_id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn delete(&self, user_id: &UserId) -> Result<bool, RepositoryError> {
        let path = self.path_for(user_id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
