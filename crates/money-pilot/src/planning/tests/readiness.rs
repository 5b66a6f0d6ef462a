use crate::planning::calculator::{
    compute_readiness, ReadinessFactorKind, ReadinessLabel, ReadinessResult,
};

fn points(result: &ReadinessResult, kind: ReadinessFactorKind) -> u8 {
    result
        .factors
        .iter()
        .find(|factor| factor.kind == kind)
        .map(|factor| factor.points)
        .expect("factor present")
}

#[test]
fn typical_salaried_profile_scores_very_good() {
    let result = compute_readiness(50_000.0, 20_000.0, 100_000.0);

    assert_eq!(points(&result, ReadinessFactorKind::SavingsRate), 30);
    assert_eq!(points(&result, ReadinessFactorKind::EmergencyFund), 20);
    assert_eq!(points(&result, ReadinessFactorKind::MonthlySurplus), 20);
    assert_eq!(points(&result, ReadinessFactorKind::ExpenseControl), 10);
    assert_eq!(result.score, 80);
    assert_eq!(result.level, ReadinessLabel::VeryGood);
    assert_eq!(result.label, "Very Good");
    assert_eq!(result.color_tag, "lightgreen");
    assert_eq!(result.metrics.emergency_fund_months, Some(5.0));
    assert_eq!(result.metrics.monthly_surplus, 30_000.0);
}

#[test]
fn expense_ratio_of_exactly_forty_percent_is_not_excellent() {
    let result = compute_readiness(50_000.0, 20_000.0, 100_000.0);
    let factor = result
        .factors
        .iter()
        .find(|factor| factor.kind == ReadinessFactorKind::ExpenseControl)
        .expect("expense factor");
    assert_eq!(factor.status, "Good (40-60%)");
}

#[test]
fn zero_expenses_count_as_unlimited_emergency_cover() {
    let result = compute_readiness(10_000.0, 0.0, 0.0);

    assert_eq!(result.metrics.emergency_fund_months, None);
    assert_eq!(points(&result, ReadinessFactorKind::EmergencyFund), 35);
    assert_eq!(result.score, 100);
    assert_eq!(result.level, ReadinessLabel::Excellent);
}

#[test]
fn deficit_household_needs_attention() {
    let result = compute_readiness(10_000.0, 15_000.0, 5_000.0);

    assert_eq!(points(&result, ReadinessFactorKind::SavingsRate), 5);
    assert_eq!(points(&result, ReadinessFactorKind::EmergencyFund), 0);
    assert_eq!(points(&result, ReadinessFactorKind::MonthlySurplus), 0);
    assert_eq!(points(&result, ReadinessFactorKind::ExpenseControl), 0);
    assert_eq!(result.score, 5);
    assert_eq!(result.level, ReadinessLabel::NeedsAttention);
    assert_eq!(
        result.recommendation,
        "Critical: Focus on financial stability before investing."
    );
}

#[test]
fn surplus_of_exactly_half_income_is_very_good_not_excellent() {
    let result = compute_readiness(50_000.0, 25_000.0, 0.0);
    assert_eq!(points(&result, ReadinessFactorKind::MonthlySurplus), 15);
}

#[test]
fn score_stays_within_bounds_across_inputs() {
    let incomes = [1.0, 5_000.0, 25_000.0, 80_000.0, 1_000_000.0];
    let expenses = [0.0, 100.0, 10_000.0, 50_000.0, 2_000_000.0];
    let savings = [0.0, 1_000.0, 500_000.0, 50_000_000.0];

    for &income in &incomes {
        for &expense in &expenses {
            for &saved in &savings {
                let result = compute_readiness(income, expense, saved);
                assert!(result.score <= 100, "score {} out of range", result.score);
                let sum: u8 = result.factors.iter().map(|factor| factor.points).sum();
                assert_eq!(sum, result.score);
            }
        }
    }
}

#[test]
fn savings_rate_points_never_drop_as_income_rises() {
    let mut previous = 0;
    for step in 1..=200 {
        let income = f64::from(step) * 1_000.0;
        let result = compute_readiness(income, 30_000.0, 50_000.0);
        let current = points(&result, ReadinessFactorKind::SavingsRate);
        assert!(current >= previous, "dropped at income {income}");
        previous = current;
    }
}

#[test]
fn readiness_is_deterministic() {
    assert_eq!(
        compute_readiness(72_000.0, 41_000.0, 230_000.0),
        compute_readiness(72_000.0, 41_000.0, 230_000.0)
    );
}
