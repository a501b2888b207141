//! Implementation of the `docseek remove` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{action_success, count_label, output, source_name, CommandOutput};
use crate::cli::output::{spinner, ProgressBarExt};
use crate::cli::service::CorpusSession;
use crate::domain::models::RemoveReport;

#[derive(Args, Debug, Clone)]
pub struct RemoveArgs {
    /// Row id as shown by `docseek list`
    pub row: usize,
}

#[derive(Debug, Serialize)]
pub struct RemoveOutput {
    #[serde(flatten)]
    pub report: RemoveReport,
}

impl CommandOutput for RemoveOutput {
    fn to_human(&self) -> String {
        action_success(&format!(
            "Removed row {} ({}); corpus now holds {}",
            self.report.row_id,
            source_name(&self.report.source),
            count_label(self.report.corpus_len, "chunk", "chunks"),
        ))
    }
}

pub async fn execute(args: RemoveArgs, session: &CorpusSession, json_mode: bool) -> Result<()> {
    let progress = spinner(format!("Removing row {}...", args.row), json_mode);
    let report = match session.manager.remove_document(args.row).await {
        Ok(report) => {
            progress.finish_success("Index rebuilt");
            report
        }
        Err(err) => {
            progress.finish_error("Remove failed");
            return Err(err).with_context(|| format!("Failed to remove row {}", args.row));
        }
    };

    output(&RemoveOutput { report }, json_mode);
    Ok(())
}
