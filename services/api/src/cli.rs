use crate::report::{run_ingest, run_report, IngestArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use feedback_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Feedback Insights",
    about = "Serve, load and report customer feedback metrics (NPS, CSAT, CES)",
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
    /// Load a JSON or CSV feedback dataset into the configured store
    Ingest(IngestArgs),
    /// Print the indicators and segments for a period
    Report(ReportArgs),
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
        Command::Ingest(args) => run_ingest(args),
        Command::Report(args) => run_report(args),
    }
}
