use crate::demo::{run_demo, run_session_report, DemoArgs, SessionReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use immunise::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Immunisation Status Service",
    about = "Run and demonstrate the school-aged immunisation status engine from the command line",
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
    /// Inspect a seeded session without starting the server
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Run an end-to-end CLI demo covering consent, triage and recording
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Print the per-patient session report for the seeded demo session
    Report(SessionReportArgs),
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
        Command::Session {
            command: SessionCommand::Report(args),
        } => run_session_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
