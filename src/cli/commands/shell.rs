//! Implementation of the `docseek shell` command.
//!
//! Keeps one corpus and one embedder alive across many actions. Each input
//! line is parsed with the same argument definitions as the one-shot
//! subcommands; words are split on whitespace, so file names containing
//! spaces must be added with `docseek add` instead.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{add, list, remove, search, show, status, AddArgs, RemoveArgs, SearchArgs, ShowArgs};
use crate::cli::display::action_warning;
use crate::cli::print_error;
use crate::cli::service::CorpusSession;

const PROMPT: &str = "docseek> ";

#[derive(Parser, Debug)]
#[command(name = "docseek", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Add text or PDF files to the corpus
    Add(AddArgs),
    /// Remove a chunk by row id
    #[command(alias = "rm")]
    Remove(RemoveArgs),
    /// List every chunk
    #[command(alias = "ls")]
    List,
    /// Print one chunk in full
    Show(ShowArgs),
    /// Rank chunks by similarity to a query
    Search(SearchArgs),
    /// Show corpus status
    Status,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

enum Flow {
    Continue,
    Exit,
}

pub async fn execute(session: &CorpusSession, json_mode: bool) -> Result<()> {
    if !json_mode {
        println!(
            "{} with {} chunk(s). Type {} for commands, {} to leave.",
            style("docseek shell").bold(),
            session.manager.len(),
            style("help").cyan(),
            style("exit").cyan()
        );
        if session.load_report.reconciliation.rebuilt() {
            println!(
                "{}",
                action_warning(&format!(
                    "Persisted index was repaired: {}",
                    session.load_report.reconciliation
                ))
            );
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if !json_mode {
            print!("{PROMPT}");
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                // Covers `help` and `--help` as well as real parse errors.
                let _ = err.print();
                continue;
            }
        };

        debug!(command = ?parsed.command, "shell command");
        match dispatch(parsed.command, session, json_mode).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => print_error(&err, json_mode),
        }
    }

    Ok(())
}

async fn dispatch(command: ShellCommand, session: &CorpusSession, json_mode: bool) -> Result<Flow> {
    match command {
        ShellCommand::Add(args) => add::execute(args, session, json_mode).await?,
        ShellCommand::Remove(args) => remove::execute(args, session, json_mode).await?,
        ShellCommand::List => list::execute(session, json_mode)?,
        ShellCommand::Show(args) => show::execute(&args, session, json_mode)?,
        ShellCommand::Search(args) => search::execute(args, session, json_mode).await?,
        ShellCommand::Status => status::execute(session, json_mode)?,
        ShellCommand::Exit => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<ShellCommand, clap::Error> {
        ShellLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }

    #[test]
    fn test_parse_search_joins_words() {
        match parse("search quarterly revenue -k 5").unwrap() {
            ShellCommand::Search(args) => {
                assert_eq!(args.query_text(), "quarterly revenue");
                assert_eq!(args.k, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert!(matches!(parse("rm 2").unwrap(), ShellCommand::Remove(args) if args.row == 2));
        assert!(matches!(parse("ls").unwrap(), ShellCommand::List));
        assert!(matches!(parse("quit").unwrap(), ShellCommand::Exit));
    }

    #[test]
    fn test_parse_add_without_files() {
        assert!(matches!(parse("add").unwrap(), ShellCommand::Add(args) if args.files.is_empty()));
    }

    #[test]
    fn test_parse_rejects_bad_k() {
        assert!(parse("search x -k 11").is_err());
        assert!(parse("search x -k 0").is_err());
    }

    #[test]
    fn test_help_is_a_display_error() {
        let err = parse("help").unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
