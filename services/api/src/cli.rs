use crate::demo::{run_demo, run_plan_command, DemoArgs, PlanCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use money_pilot::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "MoneyPilot",
    about = "Plan investments from the command line or serve the MoneyPilot API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a single planning calculation or a full plan report
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Walk the planning wizard with the default plan and print the results
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Plan { command } => run_plan_command(command),
        Command::Demo(args) => run_demo(args).await,
    }
}
