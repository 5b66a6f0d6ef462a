use serde::Serialize;

use super::{round_half_up, CalculationError};
use crate::planning::domain::RiskProfile;

/// Monthly SIP needed to reach a target, with the contributed/growth split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SipResult {
    pub monthly_contribution: f64,
    pub total_contributed: f64,
    pub projected_growth: f64,
    pub annual_rate_pct: f64,
}

/// Solves the annuity-due future-value equation for the monthly payment that
/// reaches `target_amount` after `years` at the risk profile's expected return.
pub fn compute_required_contribution(
    target_amount: f64,
    years: f64,
    risk: RiskProfile,
) -> Result<SipResult, CalculationError> {
    solve_contribution(target_amount, years, risk.annual_rate())
}

pub(crate) fn solve_contribution(
    target_amount: f64,
    years: f64,
    annual_rate: f64,
) -> Result<SipResult, CalculationError> {
    if !(years > 0.0) {
        return Err(CalculationError::InvalidGoalHorizon { years });
    }
    if !(target_amount > 0.0) {
        return Err(CalculationError::InvalidTargetAmount {
            amount: target_amount,
        });
    }

    let monthly_rate = annual_rate / 12.0;
    let months = years * 12.0;

    let payment = if monthly_rate == 0.0 {
        target_amount / months
    } else {
        let growth = (1.0 + monthly_rate).powf(months);
        let factor = (growth - 1.0) / monthly_rate * (1.0 + monthly_rate);
        target_amount / factor
    };

    let contributed = payment * months;

    Ok(SipResult {
        monthly_contribution: round_half_up(payment),
        total_contributed: round_half_up(contributed),
        projected_growth: round_half_up(target_amount - contributed),
        annual_rate_pct: (annual_rate * 1000.0).round() / 10.0,
    })
}
