//! Implementation of the `docseek show` command.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use crate::cli::display::{output, source_name, CommandOutput};
use crate::cli::service::CorpusSession;

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Row id as shown by `docseek list`
    pub row: usize,
}

#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub row_id: usize,
    pub source: String,
    pub text: String,
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        format!(
            "{} {}\n{}",
            style(format!("[{}]", self.row_id)).dim(),
            source_name(&self.source),
            self.text
        )
    }
}

pub fn execute(args: &ShowArgs, session: &CorpusSession, json_mode: bool) -> Result<()> {
    let chunk = session
        .manager
        .chunk(args.row)
        .with_context(|| format!("Failed to show row {}", args.row))?;

    let out = ShowOutput {
        row_id: args.row,
        source: chunk.source_name().to_string(),
        text: chunk.into_text(),
    };
    output(&out, json_mode);
    Ok(())
}
