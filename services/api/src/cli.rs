use crate::commands::{run_classify, run_sample, run_score, ClassifyArgs, SampleArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lead_intent::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lead Intent Scorer",
    about = "Score sales leads for purchase intent from the command line or over HTTP",
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
    /// Score a CSV batch of leads against an offer and persist the results
    Score(ScoreArgs),
    /// Write the illustrative five-lead sample batch as CSV
    Sample(SampleArgs),
    /// Ask the generative classifier about a single lead
    Classify(ClassifyArgs),
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
        Command::Score(args) => run_blocking(move || run_score(args)).await,
        Command::Sample(args) => run_sample(args),
        Command::Classify(args) => run_blocking(move || run_classify(args)).await,
    }
}

/// Runs a command that may use the blocking generative client off the async runtime.
async fn run_blocking<F>(command: F) -> Result<(), AppError>
where
    F: FnOnce() -> Result<(), AppError> + Send + 'static,
{
    tokio::task::spawn_blocking(command)
        .await
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?
}
