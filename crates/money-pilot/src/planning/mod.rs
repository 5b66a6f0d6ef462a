//! Financial planning: pure calculators, the step-by-step wizard, plan reports,
//! storage, and optional generated advice.

pub mod advisory;
pub mod calculator;
pub mod domain;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use advisory::{
    ActionStep, Advice, AdvisoryContent, AdvisoryError, AdvisoryGenerator, AdvisoryRequest,
    AdvisorySource, GeminiAdvisor, StaticAdvisor,
};
pub use calculator::{
    compute_allocation, compute_readiness, compute_required_contribution, AllocationResult,
    CalculationError, ReadinessResult, SipResult,
};
pub use domain::{
    FinancialPlan, FinancialProfile, Goal, GoalId, GoalPriority, GoalType, InvestmentExperience,
    Preferences, RiskProfile, UserId,
};
pub use report::{GoalPlan, PlanAssumptions, PlanReport};
pub use repository::{
    InMemoryPlanRepository, JsonFilePlanRepository, PlanRecord, PlanRepository, RepositoryError,
};
pub use router::{planning_router, JsonBody};
pub use service::{PlanningService, PlanningServiceError, WizardOutcome};
pub use wizard::{
    reduce, GoalUpdate, Transition, WizardAction, WizardEffect, WizardError, WizardState,
    WizardStep,
};
