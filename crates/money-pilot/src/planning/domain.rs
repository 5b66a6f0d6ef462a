use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::calculator::{validate_cash_flow, CalculationError};

/// Identity of the user who owns a saved plan. Issued by whatever auth layer fronts the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a goal within a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GoalId(pub u64);

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    Retirement,
    House,
    Car,
    Education,
    Vacation,
    Wealth,
}

impl GoalType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retirement => "Retirement",
            Self::House => "Buy a House",
            Self::Car => "Buy a Car",
            Self::Education => "Education",
            Self::Vacation => "Vacation",
            Self::Wealth => "General Wealth",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalPriority {
    High,
    Medium,
    Low,
}

impl GoalPriority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Risk appetite driving both the expected return and the base asset mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [Self::Conservative, Self::Balanced, Self::Aggressive];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
        }
    }

    /// Nominal annual return assumed when solving goal contributions.
    pub const fn annual_rate(self) -> f64 {
        match self {
            Self::Conservative => 0.08,
            Self::Balanced => 0.11,
            Self::Aggressive => 0.13,
        }
    }

    /// Lenient parse used at text boundaries: anything unrecognised is treated as Balanced.
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for RiskProfile {
    type Err = CalculationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "balanced" | "moderate" => Ok(Self::Balanced),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(CalculationError::UnknownRiskProfile(raw.to_string())),
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvestmentExperience {
    #[serde(rename = "None")]
    Novice,
    #[default]
    Intermediate,
}

impl InvestmentExperience {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Novice => "None",
            Self::Intermediate => "Intermediate",
        }
    }
}

/// Monthly cash-flow snapshot entered on the first wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialProfile {
    pub age: u32,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
}

impl FinancialProfile {
    pub fn monthly_surplus(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }

    /// Checks the preconditions the readiness scoring relies on.
    pub fn validate(&self) -> Result<(), CalculationError> {
        validate_cash_flow(
            self.monthly_income,
            self.monthly_expenses,
            self.current_savings,
        )
    }
}

impl Default for FinancialProfile {
    fn default() -> Self {
        Self {
            age: 25,
            monthly_income: 50_000.0,
            monthly_expenses: 20_000.0,
            current_savings: 100_000.0,
        }
    }
}

/// A savings target with a horizon in (possibly fractional) years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub goal_type: GoalType,
    pub target_amount: f64,
    pub horizon_years: f64,
    pub priority: GoalPriority,
}

impl Goal {
    pub fn validate(&self) -> Result<(), CalculationError> {
        if !(self.target_amount > 0.0) {
            return Err(CalculationError::InvalidTargetAmount {
                amount: self.target_amount,
            });
        }
        if !(self.horizon_years > 0.0) {
            return Err(CalculationError::InvalidGoalHorizon {
                years: self.horizon_years,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub risk: RiskProfile,
    pub experience: InvestmentExperience,
}

/// The persisted document: everything the user entered, nothing derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialPlan {
    pub personal: FinancialProfile,
    pub goals: Vec<Goal>,
    pub preferences: Preferences,
}

impl FinancialPlan {
    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Mean goal horizon, or five years when no goals are defined.
    pub fn average_horizon_years(&self) -> f64 {
        if self.goals.is_empty() {
            return 5.0;
        }
        let total: f64 = self.goals.iter().map(|goal| goal.horizon_years).sum();
        total / self.goals.len() as f64
    }

    pub fn total_goal_amount(&self) -> f64 {
        self.goals.iter().map(|goal| goal.target_amount).sum()
    }

    /// Validates the profile and every goal.
    pub fn validate(&self) -> Result<(), CalculationError> {
        self.personal.validate()?;
        self.goals.iter().try_for_each(Goal::validate)
    }
}

impl Default for FinancialPlan {
    fn default() -> Self {
        Self {
            personal: FinancialProfile::default(),
            goals: vec![Goal {
                id: GoalId(1),
                goal_type: GoalType::Retirement,
                target_amount: 10_000_000.0,
                horizon_years: 20.0,
                priority: GoalPriority::High,
            }],
            preferences: Preferences::default(),
        }
    }
}
