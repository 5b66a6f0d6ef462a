//! Step machine behind the planning wizard.
//!
//! State is an explicit value owned by whoever drives the flow; [`reduce`] maps a
//! state and an action to the next state plus the side effect the caller should
//! perform (saving the plan, or saving it and producing the report).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::calculator::CalculationError;
use super::domain::{
    FinancialPlan, FinancialProfile, Goal, GoalId, GoalPriority, GoalType, InvestmentExperience,
    RiskProfile,
};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Personal,
    Goals,
    Preferences,
    Results,
}

impl WizardStep {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Personal => "Personal Info",
            Self::Goals => "Goals",
            Self::Preferences => "Preferences",
            Self::Results => "Results",
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::Personal => Some(Self::Goals),
            Self::Goals => Some(Self::Preferences),
            Self::Preferences => Some(Self::Results),
            Self::Results => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::Personal => None,
            Self::Goals => Some(Self::Personal),
            Self::Preferences => Some(Self::Goals),
            Self::Results => Some(Self::Preferences),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub plan: FinancialPlan,
    next_goal_id: u64,
}

impl WizardState {
    pub fn new() -> Self {
        Self::from_plan(FinancialPlan::default())
    }

    /// Starts on the first step with a previously saved plan.
    pub fn from_plan(plan: FinancialPlan) -> Self {
        let next_goal_id = next_free_goal_id(&plan).unwrap_or(u64::MAX);
        Self {
            step: WizardStep::Personal,
            plan,
            next_goal_id,
        }
    }

    /// Never hands out an id already in the plan, even when the counter came
    /// from a stale client copy of the state.
    fn allocate_goal_id(&mut self) -> Result<GoalId, WizardError> {
        let floor = next_free_goal_id(&self.plan).ok_or(WizardError::GoalIdsExhausted)?;
        let id = self.next_goal_id.max(floor);
        self.next_goal_id = id.saturating_add(1);
        Ok(GoalId(id))
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

/// `None` once the largest id in the plan is `u64::MAX`.
fn next_free_goal_id(plan: &FinancialPlan) -> Option<u64> {
    match plan.goals.iter().map(|goal| goal.id.0).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Partial edit of a goal; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalUpdate {
    pub goal_type: Option<GoalType>,
    pub target_amount: Option<f64>,
    pub horizon_years: Option<f64>,
    pub priority: Option<GoalPriority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardAction {
    UpdatePersonal { profile: FinancialProfile },
    AddGoal,
    RemoveGoal { id: GoalId },
    UpdateGoal { id: GoalId, update: GoalUpdate },
    SelectRisk { risk: RiskProfile },
    SelectExperience { experience: InvestmentExperience },
    Restore { plan: FinancialPlan },
    Next,
    Back,
    JumpTo { step: WizardStep },
}

impl WizardAction {
    fn name(&self) -> &'static str {
        match self {
            Self::UpdatePersonal { .. } => "update_personal",
            Self::AddGoal => "add_goal",
            Self::RemoveGoal { .. } => "remove_goal",
            Self::UpdateGoal { .. } => "update_goal",
            Self::SelectRisk { .. } => "select_risk",
            Self::SelectExperience { .. } => "select_experience",
            Self::Restore { .. } => "restore",
            Self::Next => "next",
            Self::Back => "back",
            Self::JumpTo { .. } => "jump_to",
        }
    }
}

/// Work the caller owes after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardEffect {
    /// Save the plan; the user moved past an input step.
    Persist,
    /// Save the plan and build the report; the wizard reached its results.
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<WizardEffect>,
}

impl Transition {
    fn quiet(state: WizardState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    InvalidInput(#[from] CalculationError),
    #[error("age must be between {MIN_AGE} and {MAX_AGE} (got {age})")]
    AgeOutOfRange { age: u32 },
    #[error("no goal with id {0}")]
    UnknownGoal(GoalId),
    #[error("the first goal cannot be removed")]
    PrimaryGoalLocked,
    #[error("no goal ids left to allocate")]
    GoalIdsExhausted,
    #[error("{action} is not available on the {step} step")]
    ActionNotAvailable {
        action: &'static str,
        step: WizardStep,
    },
    #[error("{action} is not a valid move from the {from} step")]
    InvalidTransition {
        action: &'static str,
        from: WizardStep,
    },
}

const DEFAULT_NEW_GOAL_AMOUNT: f64 = 500_000.0;
const DEFAULT_NEW_GOAL_YEARS: f64 = 5.0;

/// Applies one action. The input state is consumed; on error nothing is returned
/// so callers keep their previous copy untouched.
pub fn reduce(state: WizardState, action: WizardAction) -> Result<Transition, WizardError> {
    let mut state = state;
    let step = state.step;
    let name = action.name();

    let require = |expected: WizardStep| {
        if step == expected {
            Ok(())
        } else {
            Err(WizardError::ActionNotAvailable { action: name, step })
        }
    };

    match action {
        WizardAction::UpdatePersonal { profile } => {
            require(WizardStep::Personal)?;
            state.plan.personal = profile;
            Ok(Transition::quiet(state))
        }
        WizardAction::AddGoal => {
            require(WizardStep::Goals)?;
            let id = state.allocate_goal_id()?;
            state.plan.goals.push(Goal {
                id,
                goal_type: GoalType::Wealth,
                target_amount: DEFAULT_NEW_GOAL_AMOUNT,
                horizon_years: DEFAULT_NEW_GOAL_YEARS,
                priority: GoalPriority::Medium,
            });
            Ok(Transition::quiet(state))
        }
        WizardAction::RemoveGoal { id } => {
            require(WizardStep::Goals)?;
            let index = state
                .plan
                .goals
                .iter()
                .position(|goal| goal.id == id)
                .ok_or(WizardError::UnknownGoal(id))?;
            if index == 0 {
                return Err(WizardError::PrimaryGoalLocked);
            }
            state.plan.goals.remove(index);
            Ok(Transition::quiet(state))
        }
        WizardAction::UpdateGoal { id, update } => {
            require(WizardStep::Goals)?;
            let goal = state
                .plan
                .goals
                .iter_mut()
                .find(|goal| goal.id == id)
                .ok_or(WizardError::UnknownGoal(id))?;
            if let Some(goal_type) = update.goal_type {
                goal.goal_type = goal_type;
            }
            if let Some(target_amount) = update.target_amount {
                goal.target_amount = target_amount;
            }
            if let Some(horizon_years) = update.horizon_years {
                goal.horizon_years = horizon_years;
            }
            if let Some(priority) = update.priority {
                goal.priority = priority;
            }
            Ok(Transition::quiet(state))
        }
        WizardAction::SelectRisk { risk } => {
            require(WizardStep::Preferences)?;
            state.plan.preferences.risk = risk;
            Ok(Transition::quiet(state))
        }
        WizardAction::SelectExperience { experience } => {
            require(WizardStep::Preferences)?;
            state.plan.preferences.experience = experience;
            Ok(Transition::quiet(state))
        }
        WizardAction::Restore { plan } => {
            let floor = next_free_goal_id(&plan).unwrap_or(u64::MAX);
            state.next_goal_id = floor.max(state.next_goal_id);
            state.plan = plan;
            Ok(Transition::quiet(state))
        }
        WizardAction::Next => {
            let to = step.next().ok_or(WizardError::InvalidTransition {
                action: name,
                from: step,
            })?;
            validate_step(&state.plan, step)?;
            state.step = to;
            let effect = if to == WizardStep::Results {
                WizardEffect::Submit
            } else {
                WizardEffect::Persist
            };
            Ok(Transition {
                state,
                effect: Some(effect),
            })
        }
        WizardAction::Back => {
            let to = step.previous().ok_or(WizardError::InvalidTransition {
                action: name,
                from: step,
            })?;
            state.step = to;
            Ok(Transition::quiet(state))
        }
        WizardAction::JumpTo { step: to } => {
            if to >= step {
                return Err(WizardError::InvalidTransition {
                    action: name,
                    from: step,
                });
            }
            state.step = to;
            Ok(Transition::quiet(state))
        }
    }
}

fn validate_step(plan: &FinancialPlan, step: WizardStep) -> Result<(), WizardError> {
    match step {
        WizardStep::Personal => {
            let age = plan.personal.age;
            if !(MIN_AGE..=MAX_AGE).contains(&age) {
                return Err(WizardError::AgeOutOfRange { age });
            }
            plan.personal.validate()?;
        }
        WizardStep::Goals => {
            plan.goals.iter().try_for_each(Goal::validate)?;
        }
        WizardStep::Preferences => plan.validate()?,
        WizardStep::Results => {}
    }
    Ok(())
}
