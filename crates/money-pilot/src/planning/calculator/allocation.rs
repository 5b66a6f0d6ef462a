use serde::Serialize;

use super::round_half_up;
use crate::planning::domain::RiskProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquityBreakdown {
    pub total: i32,
    pub large_cap: i32,
    pub mid_cap: i32,
    pub small_cap: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebtBreakdown {
    pub total: i32,
    pub liquid_funds: i32,
    pub short_duration: i32,
    pub long_duration: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoldBreakdown {
    pub total: i32,
    pub digital_gold: i32,
    pub sovereign_gold_bonds: i32,
}

/// Informational split of each asset class. Sub-categories are rounded
/// independently and may not add up to their parent exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationBreakdown {
    pub equity: EquityBreakdown,
    pub debt: DebtBreakdown,
    pub gold: GoldBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    pub equity_pct: i32,
    pub debt_pct: i32,
    pub gold_pct: i32,
    pub breakdown: AllocationBreakdown,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mix {
    equity: i32,
    debt: i32,
    gold: i32,
}

impl Mix {
    const fn base(risk: RiskProfile) -> Self {
        match risk {
            RiskProfile::Conservative => Mix {
                equity: 20,
                debt: 65,
                gold: 15,
            },
            RiskProfile::Balanced => Mix {
                equity: 50,
                debt: 35,
                gold: 15,
            },
            RiskProfile::Aggressive => Mix {
                equity: 75,
                debt: 15,
                gold: 10,
            },
        }
    }

    fn adjust_for_age(&mut self, age: u32) {
        if age < 30 {
            self.equity = (self.equity + 10).min(85);
            self.debt = (self.debt - 10).max(10);
        } else if age > 50 {
            self.equity = (self.equity - 15).max(20);
            self.debt = (self.debt + 15).min(70);
        }
    }

    fn adjust_for_horizon(&mut self, horizon_years: f64) {
        if horizon_years < 3.0 {
            self.equity = (self.equity - 20).max(10);
            self.debt = (self.debt + 20).min(75);
        } else if horizon_years > 10.0 {
            self.equity = (self.equity + 10).min(80);
            self.debt = (self.debt - 10).max(10);
        }
    }

    /// Debt absorbs whatever the clamps left over, without re-clamping.
    fn balance(&mut self) {
        let total = self.equity + self.debt + self.gold;
        self.debt += 100 - total;
    }
}

/// Recommends an equity/debt/gold split for a risk profile, age and horizon.
pub fn compute_allocation(risk: RiskProfile, age: u32, horizon_years: f64) -> AllocationResult {
    let mut mix = Mix::base(risk);
    mix.adjust_for_age(age);
    mix.adjust_for_horizon(horizon_years);
    mix.balance();

    AllocationResult {
        equity_pct: mix.equity,
        debt_pct: mix.debt,
        gold_pct: mix.gold,
        breakdown: breakdown(&mix),
        rationale: rationale(risk, age, horizon_years),
    }
}

fn share(total: i32, fraction: f64) -> i32 {
    round_half_up(f64::from(total) * fraction) as i32
}

fn breakdown(mix: &Mix) -> AllocationBreakdown {
    AllocationBreakdown {
        equity: EquityBreakdown {
            total: mix.equity,
            large_cap: share(mix.equity, 0.5),
            mid_cap: share(mix.equity, 0.3),
            small_cap: share(mix.equity, 0.2),
        },
        debt: DebtBreakdown {
            total: mix.debt,
            liquid_funds: share(mix.debt, 0.3),
            short_duration: share(mix.debt, 0.4),
            long_duration: share(mix.debt, 0.3),
        },
        gold: GoldBreakdown {
            total: mix.gold,
            digital_gold: share(mix.gold, 0.6),
            sovereign_gold_bonds: share(mix.gold, 0.4),
        },
    }
}

fn rationale(risk: RiskProfile, age: u32, horizon_years: f64) -> String {
    let mut reasons = Vec::with_capacity(3);

    if age < 30 {
        reasons.push(format!(
            "At {age} years, you have time to ride out market volatility"
        ));
    } else if age > 50 {
        reasons.push(format!(
            "At {age} years, capital preservation becomes more important"
        ));
    }

    match risk {
        RiskProfile::Aggressive => reasons
            .push("Your aggressive risk profile allows for higher equity exposure".to_string()),
        RiskProfile::Conservative => reasons
            .push("Your conservative approach prioritizes stability over growth".to_string()),
        RiskProfile::Balanced => {}
    }

    let horizon = format_years(horizon_years);
    if horizon_years > 10.0 {
        reasons.push(format!("{horizon}+ year horizon enables equity-heavy strategy"));
    } else if horizon_years < 3.0 {
        reasons.push(format!("Short {horizon}-year timeline requires debt focus"));
    }

    if reasons.is_empty() {
        return String::new();
    }
    format!("{}.", reasons.join(". "))
}

/// Whole years print without a decimal point; fractional averages keep up to two places.
fn format_years(years: f64) -> String {
    if years.fract() == 0.0 {
        format!("{years:.0}")
    } else {
        let formatted = format!("{years:.2}");
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
