use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::calculator::CalculationError;
use super::domain::{FinancialPlan, UserId};
use super::report::PlanReport;
use super::repository::{PlanRecord, PlanRepository, RepositoryError};
use super::wizard::{reduce, WizardAction, WizardEffect, WizardError, WizardState};

/// Service composing plan storage, the wizard reducer, and report building.
pub struct PlanningService<R> {
    repository: Arc<R>,
}

/// Result of driving the wizard one action forward.
#[derive(Debug, Clone, Serialize)]
pub struct WizardOutcome {
    pub state: WizardState,
    pub effect: Option<WizardEffect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PlanReport>,
}

impl<R> PlanningService<R>
where
    R: PlanRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn save_plan(
        &self,
        user_id: &UserId,
        plan: FinancialPlan,
    ) -> Result<PlanRecord, PlanningServiceError> {
        let stored = self
            .repository
            .save(PlanRecord::new(user_id.clone(), plan))?;
        info!(user = %user_id, goals = stored.plan.goals.len(), "plan saved");
        Ok(stored)
    }

    pub fn load_plan(&self, user_id: &UserId) -> Result<PlanRecord, PlanningServiceError> {
        self.repository
            .load(user_id)?
            .ok_or_else(|| PlanningServiceError::PlanNotFound(user_id.clone()))
    }

    pub fn delete_plan(&self, user_id: &UserId) -> Result<(), PlanningServiceError> {
        if !self.repository.delete(user_id)? {
            return Err(PlanningServiceError::PlanNotFound(user_id.clone()));
        }
        info!(user = %user_id, "plan deleted");
        Ok(())
    }

    /// Wizard state for a returning user, or a fresh one when nothing is stored.
    pub fn resume(&self, user_id: &UserId) -> Result<WizardState, PlanningServiceError> {
        let state = match self.repository.load(user_id)? {
            Some(record) => WizardState::from_plan(record.plan),
            None => WizardState::new(),
        };
        Ok(state)
    }

    pub fn report(&self, user_id: &UserId) -> Result<PlanReport, PlanningServiceError> {
        let record = self.load_plan(user_id)?;
        let report = PlanReport::build(&record.plan)?;
        info!(
            user = %user_id,
            score = report.readiness.score,
            achievable = report.achievable,
            "plan report built"
        );
        Ok(report)
    }

    /// Runs the reducer and performs whatever effect it asks for.
    pub fn apply(
        &self,
        user_id: &UserId,
        state: WizardState,
        action: WizardAction,
    ) -> Result<WizardOutcome, PlanningServiceError> {
        let transition = reduce(state, action)?;
        debug!(user = %user_id, step = %transition.state.step, "wizard advanced");

        let report = match transition.effect {
            None => None,
            Some(WizardEffect::Persist) => {
                self.save_plan(user_id, transition.state.plan.clone())?;
                None
            }
            Some(WizardEffect::Submit) => {
                let report = PlanReport::build(&transition.state.plan)?;
                self.save_plan(user_id, transition.state.plan.clone())?;
                Some(report)
            }
        };

        Ok(WizardOutcome {
            state: transition.state,
            effect: transition.effect,
            report,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanningServiceError {
    #[error(transparent)]
    Invalid(#[from] CalculationError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("no saved plan for user '{0}'")]
    PlanNotFound(UserId),
}
