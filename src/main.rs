//! docseek CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use docseek::cli::commands::{add, list, remove, search, shell, show, status};
use docseek::cli::display::action_warning;
use docseek::cli::service::CorpusSession;
use docseek::cli::{Cli, Commands};
use docseek::infrastructure::config::ConfigLoader;
use docseek::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        docseek::cli::handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    // Held for the whole run so buffered file logs are flushed on exit.
    let _logger = LoggerImpl::init(&config.logging).context("Failed to initialize logging")?;

    let session = CorpusSession::open(&config, cli.json).await?;

    let is_shell = matches!(cli.command, Commands::Shell);
    if session.load_report.reconciliation.rebuilt() && !cli.json && !is_shell {
        eprintln!(
            "{}",
            action_warning(&format!(
                "Persisted index was repaired: {}",
                session.load_report.reconciliation
            ))
        );
    }

    match cli.command {
        Commands::Add(args) => add::execute(args, &session, cli.json).await,
        Commands::Remove(args) => remove::execute(args, &session, cli.json).await,
        Commands::List => list::execute(&session, cli.json),
        Commands::Show(args) => show::execute(&args, &session, cli.json),
        Commands::Search(args) => search::execute(args, &session, cli.json).await,
        Commands::Status => status::execute(&session, cli.json),
        Commands::Shell => shell::execute(&session, cli.json).await,
    }
}
