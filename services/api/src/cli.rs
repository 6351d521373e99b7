use crate::demo::{run_demo, run_finance_report, run_tier, DemoArgs, FinanceReportArgs, TierArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use pb_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Participatory Budgeting Portal",
    about = "Run the participatory budgeting calculation service and reports from the command line",
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
    /// Classify a reach figure into its coefficient tier
    Tier(TierArgs),
    /// Financial reporting over an application export
    Finance {
        #[command(subcommand)]
        command: FinanceCommand,
    },
    /// Walk through scoring, vote tally and finance with sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FinanceCommand {
    /// Summarise budget, spend and remaining funds per area
    Report(FinanceReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with committee scoring closed (admins may still score)
    #[arg(long)]
    pub(crate) scoring_closed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Tier(args) => run_tier(args),
        Command::Finance {
            command: FinanceCommand::Report(args),
        } => run_finance_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
