use crate::infra::build_advisor;
use chrono::Local;
use clap::{Args, Subcommand};
use money_pilot::config::AppConfig;
use money_pilot::error::AppError;
use money_pilot::planning::calculator::{format_rupees, validate_cash_flow};
use money_pilot::planning::{
    compute_allocation, compute_readiness, compute_required_contribution, AdvisoryContent,
    AdvisoryRequest, AdvisorySource, AllocationResult, FinancialPlan, InMemoryPlanRepository,
    PlanReport, PlanningService, ReadinessResult, RiskProfile, SipResult, UserId, WizardAction,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum PlanCommand {
    /// Score investment readiness from monthly cash flow
    Readiness(ReadinessArgs),
    /// Solve the monthly SIP needed for a goal
    Contribution(ContributionArgs),
    /// Recommend an equity/debt/gold split
    Allocation(AllocationArgs),
    /// Build the full report for a saved plan document
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ReadinessArgs {
    /// Monthly take-home income
    #[arg(long)]
    pub(crate) income: f64,
    /// Monthly expenses
    #[arg(long)]
    pub(crate) expenses: f64,
    /// Current savings
    #[arg(long)]
    pub(crate) savings: f64,
}

#[derive(Args, Debug)]
pub(crate) struct ContributionArgs {
    /// Goal amount in rupees
    #[arg(long)]
    pub(crate) target: f64,
    /// Years until the goal
    #[arg(long)]
    pub(crate) years: f64,
    /// Conservative, Balanced or Aggressive (unknown values use Balanced)
    #[arg(long)]
    pub(crate) risk: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct AllocationArgs {
    /// Conservative, Balanced or Aggressive (unknown values use Balanced)
    #[arg(long, default_value = "Balanced")]
    pub(crate) risk: String,
    /// Investor age in years
    #[arg(long)]
    pub(crate) age: u32,
    /// Investment horizon in years
    #[arg(long)]
    pub(crate) horizon: f64,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON plan document (the same shape the API stores)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the generated advice portion of the demo.
    #[arg(long)]
    pub(crate) skip_advice: bool,
}

pub(crate) fn run_plan_command(command: PlanCommand) -> Result<(), AppError> {
    match command {
        PlanCommand::Readiness(args) => {
            validate_cash_flow(args.income, args.expenses, args.savings)?;
            let readiness = compute_readiness(args.income, args.expenses, args.savings);
            render_readiness(&readiness);
        }
        PlanCommand::Contribution(args) => {
            let risk = args
                .risk
                .as_deref()
                .map(RiskProfile::parse_or_default)
                .unwrap_or_default();
            let sip = compute_required_contribution(args.target, args.years, risk)?;
            println!(
                "Goal ₹{} in {} years ({risk}, {}% expected return)",
                format_rupees(args.target),
                args.years,
                sip.annual_rate_pct
            );
            render_sip(&sip);
        }
        PlanCommand::Allocation(args) => {
            let risk = RiskProfile::parse_or_default(&args.risk);
            let allocation = compute_allocation(risk, args.age, args.horizon);
            render_allocation(&allocation);
        }
        PlanCommand::Report(args) => {
            let raw = std::fs::read_to_string(&args.file)?;
            let plan: FinancialPlan = serde_json::from_str(&raw)?;
            let report = PlanReport::build(&plan)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                render_report(&report);
            }
        }
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("MoneyPilot planning demo");

    let service = PlanningService::new(Arc::new(InMemoryPlanRepository::new()));
    let user = UserId("demo".to_string());
    let mut state = service.resume(&user)?;
    let mut report = None;

    while report.is_none() {
        println!("- {} step complete", state.step);
        let outcome = service.apply(&user, state, WizardAction::Next)?;
        state = outcome.state;
        report = outcome.report;
    }

    let saved = service.load_plan(&user)?;
    println!(
        "Plan saved at {}",
        saved
            .updated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );

    if let Some(report) = &report {
        println!();
        render_report(report);
    }

    if args.skip_advice {
        return Ok(());
    }

    let config = AppConfig::load()?;
    let advisor = build_advisor(&config.advisory);
    let advice = advisor
        .advise(&saved.plan, &AdvisoryRequest::ActionPlan)
        .await;

    let heading = match advice.source {
        AdvisorySource::Generated => "Action plan",
        AdvisorySource::Fallback => "Action plan (standard guidance)",
    };
    println!("\n{heading}");
    match advice.content {
        AdvisoryContent::ActionPlan(steps) => {
            for (index, step) in steps.iter().enumerate() {
                println!("{}. {} [{}]", index + 1, step.title, step.timeline);
                println!("   {}", step.description);
                if !step.resources.is_empty() {
                    println!("   Resources: {}", step.resources.join(", "));
                }
            }
        }
        AdvisoryContent::Html(html) => println!("{html}"),
    }

    Ok(())
}

fn render_readiness(readiness: &ReadinessResult) {
    println!(
        "Investment readiness: {}/100 ({})",
        readiness.score, readiness.label
    );
    for factor in &readiness.factors {
        println!(
            "  {:<16} {:>2}/{:<2} {}",
            factor.name,
            factor.points,
            factor.kind.max_points(),
            factor.status
        );
    }
    println!("  {}", readiness.recommendation);
}

fn render_sip(sip: &SipResult) {
    println!("  Monthly SIP:        ₹{}", format_rupees(sip.monthly_contribution));
    println!("  Total contributed:  ₹{}", format_rupees(sip.total_contributed));
    println!("  Projected growth:   ₹{}", format_rupees(sip.projected_growth));
}

fn render_allocation(allocation: &AllocationResult) {
    let breakdown = &allocation.breakdown;
    println!(
        "Allocation: equity {}% / debt {}% / gold {}%",
        allocation.equity_pct, allocation.debt_pct, allocation.gold_pct
    );
    println!(
        "  Equity: large cap {}%, mid cap {}%, small cap {}%",
        breakdown.equity.large_cap, breakdown.equity.mid_cap, breakdown.equity.small_cap
    );
    println!(
        "  Debt: liquid {}%, short duration {}%, long duration {}%",
        breakdown.debt.liquid_funds, breakdown.debt.short_duration, breakdown.debt.long_duration
    );
    println!(
        "  Gold: digital {}%, sovereign gold bonds {}%",
        breakdown.gold.digital_gold, breakdown.gold.sovereign_gold_bonds
    );
    if !allocation.rationale.is_empty() {
        println!("  {}", allocation.rationale);
    }
}

fn render_report(report: &PlanReport) {
    render_readiness(&report.readiness);
    println!();
    render_allocation(&report.allocation);

    println!("\nGoals ({} risk profile)", report.risk);
    for goal in &report.goals {
        println!(
            "  {} - ₹{} in {} years",
            goal.goal_label,
            format_rupees(goal.target_amount),
            goal.horizon_years
        );
        render_sip(&goal.contribution);
        println!("  {}", goal.feasibility.recommendation);
    }

    println!(
        "\nTotal monthly investment ₹{} against surplus ₹{}",
        format_rupees(report.total_monthly_investment),
        format_rupees(report.monthly_surplus)
    );
    match report.monthly_gap {
        Some(gap) => println!("Short by ₹{} per month", format_rupees(gap)),
        None => println!("All goals fit within the monthly surplus"),
    }
    println!(
        "Assumes {}% growth, {}% safe return, {}% inflation",
        report.assumptions.expected_growth_pct,
        report.assumptions.safe_return_pct,
        report.assumptions.inflation_pct
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_command_reads_plan_documents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("plan.json");
        let plan = serde_json::to_string(&FinancialPlan::default()).expect("encode plan");
        std::fs::write(&path, plan).expect("write plan");

        run_plan_command(PlanCommand::Report(ReportArgs {
            file: path,
            json: true,
        }))
        .expect("report renders");
    }

    #[test]
    fn report_command_rejects_malformed_documents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{ nope").expect("write plan");

        let result = run_plan_command(PlanCommand::Report(ReportArgs {
            file: path,
            json: false,
        }));
        assert!(matches!(result, Err(AppError::Input(_))));
    }

    #[test]
    fn readiness_command_validates_income() {
        let result = run_plan_command(PlanCommand::Readiness(ReadinessArgs {
            income: 0.0,
            expenses: 1_000.0,
            savings: 0.0,
        }));
        assert!(matches!(result, Err(AppError::Planning(_))));
    }

    #[tokio::test]
    async fn demo_without_advice_walks_to_results() {
        run_demo(DemoArgs { skip_advice: true })
            .await
            .expect("demo completes");
    }
}
