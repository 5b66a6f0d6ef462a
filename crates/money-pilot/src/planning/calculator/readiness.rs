use serde::Serialize;

use super::bands::{band, classify, Band, Bound};
use super::CalculationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessFactorKind {
    SavingsRate,
    EmergencyFund,
    MonthlySurplus,
    ExpenseControl,
}

impl ReadinessFactorKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SavingsRate => "Savings Rate",
            Self::EmergencyFund => "Emergency Fund",
            Self::MonthlySurplus => "Monthly Surplus",
            Self::ExpenseControl => "Expense Control",
        }
    }

    pub const fn max_points(self) -> u8 {
        match self {
            Self::SavingsRate => 30,
            Self::EmergencyFund => 35,
            Self::MonthlySurplus => 20,
            Self::ExpenseControl => 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessLabel {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsAttention,
}

impl ReadinessLabel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsAttention => "Needs Attention",
        }
    }

    pub const fn color_tag(self) -> &'static str {
        match self {
            Self::Excellent => "green",
            Self::VeryGood => "lightgreen",
            Self::Good => "yellow",
            Self::Fair => "orange",
            Self::NeedsAttention => "red",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Excellent => {
                "You are in great financial shape! Ready for aggressive wealth building."
            }
            Self::VeryGood => {
                "Strong financial foundation. Ready to start investing systematically."
            }
            Self::Good => {
                "Decent position. Focus on building emergency fund before aggressive investing."
            }
            Self::Fair => "Needs improvement. Prioritize expense reduction and emergency savings.",
            Self::NeedsAttention => "Critical: Focus on financial stability before investing.",
        }
    }

    fn for_score(score: u8) -> Self {
        *classify(&LABEL_BANDS, &Self::NeedsAttention, f64::from(score), 1.0)
    }
}

/// One scored sub-factor of the readiness composite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessFactor {
    pub kind: ReadinessFactorKind,
    pub name: &'static str,
    pub status: &'static str,
    pub points: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessMetrics {
    pub savings_ratio_pct: f64,
    /// `None` when there are no monthly expenses to cover.
    pub emergency_fund_months: Option<f64>,
    pub monthly_surplus: f64,
    pub expense_ratio_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessResult {
    pub score: u8,
    pub level: ReadinessLabel,
    pub label: &'static str,
    pub color_tag: &'static str,
    pub recommendation: &'static str,
    pub factors: Vec<ReadinessFactor>,
    pub metrics: ReadinessMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grade {
    points: u8,
    status: &'static str,
}

const fn grade(points: u8, status: &'static str) -> Grade {
    Grade { points, status }
}

const SAVINGS_RATE_BANDS: [Band<Grade>; 4] = [
    band(Bound::AtLeast(50.0), grade(30, "Excellent")),
    band(Bound::AtLeast(30.0), grade(25, "Very Good")),
    band(Bound::AtLeast(20.0), grade(20, "Good")),
    band(Bound::AtLeast(10.0), grade(10, "Fair")),
];
const SAVINGS_RATE_FLOOR: Grade = grade(5, "Needs Improvement");

const EMERGENCY_FUND_BANDS: [Band<Grade>; 4] = [
    band(Bound::AtLeast(12.0), grade(35, "Excellent (12+ months)")),
    band(Bound::AtLeast(6.0), grade(30, "Very Good (6-12 months)")),
    band(Bound::AtLeast(3.0), grade(20, "Adequate (3-6 months)")),
    band(Bound::AtLeast(1.0), grade(10, "Insufficient (1-3 months)")),
];
const EMERGENCY_FUND_FLOOR: Grade = grade(0, "Critical (< 1 month)");

// Thresholds are fractions of monthly income.
const SURPLUS_BANDS: [Band<Grade>; 4] = [
    band(Bound::Above(0.5), grade(20, "Excellent (>50%)")),
    band(Bound::Above(0.3), grade(15, "Very Good (30-50%)")),
    band(Bound::Above(0.2), grade(10, "Good (20-30%)")),
    band(Bound::Above(0.0), grade(5, "Minimal (<20%)")),
];
const SURPLUS_FLOOR: Grade = grade(0, "Deficit");

const EXPENSE_RATIO_BANDS: [Band<Grade>; 3] = [
    band(Bound::Below(40.0), grade(15, "Excellent (<40%)")),
    band(Bound::Below(60.0), grade(10, "Good (40-60%)")),
    band(Bound::Below(80.0), grade(5, "Fair (60-80%)")),
];
const EXPENSE_RATIO_FLOOR: Grade = grade(0, "Poor (>80%)");

const LABEL_BANDS: [Band<ReadinessLabel>; 4] = [
    band(Bound::AtLeast(85.0), ReadinessLabel::Excellent),
    band(Bound::AtLeast(70.0), ReadinessLabel::VeryGood),
    band(Bound::AtLeast(55.0), ReadinessLabel::Good),
    band(Bound::AtLeast(40.0), ReadinessLabel::Fair),
];

/// Income must be positive; expenses and savings must not be negative.
pub fn validate_cash_flow(income: f64, expenses: f64, savings: f64) -> Result<(), CalculationError> {
    if !(income > 0.0) {
        return Err(CalculationError::NonPositiveIncome { income });
    }
    if !(expenses >= 0.0) {
        return Err(CalculationError::NegativeAmount {
            field: "monthly_expenses",
            value: expenses,
        });
    }
    if !(savings >= 0.0) {
        return Err(CalculationError::NegativeAmount {
            field: "current_savings",
            value: savings,
        });
    }
    Ok(())
}

/// Scores how ready a household is to start investing.
///
/// Inputs must pass [`validate_cash_flow`]. Zero expenses count as unlimited
/// emergency coverage.
pub fn compute_readiness(income: f64, expenses: f64, savings: f64) -> ReadinessResult {
    let surplus = income - expenses;
    let savings_ratio_pct = surplus / income * 100.0;
    let emergency_fund_months = if expenses > 0.0 {
        Some(savings / expenses)
    } else {
        None
    };
    let expense_ratio_pct = expenses / income * 100.0;

    let graded = [
        (
            ReadinessFactorKind::SavingsRate,
            classify(&SAVINGS_RATE_BANDS, &SAVINGS_RATE_FLOOR, savings_ratio_pct, 1.0),
        ),
        (
            ReadinessFactorKind::EmergencyFund,
            classify(
                &EMERGENCY_FUND_BANDS,
                &EMERGENCY_FUND_FLOOR,
                emergency_fund_months.unwrap_or(f64::INFINITY),
                1.0,
            ),
        ),
        (
            ReadinessFactorKind::MonthlySurplus,
            classify(&SURPLUS_BANDS, &SURPLUS_FLOOR, surplus, income),
        ),
        (
            ReadinessFactorKind::ExpenseControl,
            classify(&EXPENSE_RATIO_BANDS, &EXPENSE_RATIO_FLOOR, expense_ratio_pct, 1.0),
        ),
    ];

    let factors: Vec<ReadinessFactor> = graded
        .iter()
        .map(|(kind, grade)| ReadinessFactor {
            kind: *kind,
            name: kind.label(),
            status: grade.status,
            points: grade.points,
        })
        .collect();

    let score = factors.iter().map(|factor| factor.points).sum::<u8>().min(100);
    let level = ReadinessLabel::for_score(score);

    ReadinessResult {
        score,
        level,
        label: level.label(),
        color_tag: level.color_tag(),
        recommendation: level.recommendation(),
        factors,
        metrics: ReadinessMetrics {
            savings_ratio_pct,
            emergency_fund_months,
            monthly_surplus: surplus,
            expense_ratio_pct,
        },
    }
}
