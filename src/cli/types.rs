//! CLI type definitions
//!
//! Clap structures for the `docseek` command line. Per-command arguments live
//! next to their handlers in [`super::commands`] and are reused by the
//! interactive shell.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{AddArgs, RemoveArgs, SearchArgs, ShowArgs};

#[derive(Parser, Debug)]
#[command(name = "docseek")]
#[command(about = "docseek - semantic search over your documents", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .docseek/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add text or PDF files to the corpus
    Add(AddArgs),

    /// Remove a chunk by row id
    Remove(RemoveArgs),

    /// List every chunk in the corpus
    List,

    /// Print one chunk in full
    Show(ShowArgs),

    /// Rank chunks by similarity to a query
    Search(SearchArgs),

    /// Show corpus, index, and embedder status
    Status,

    /// Start an interactive session
    Shell,
}
