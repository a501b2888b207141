//! Implementation of the `docseek add` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::display::{action_success, action_warning, count_label, output, CommandOutput};
use crate::cli::output::{spinner, ProgressBarExt};
use crate::cli::service::CorpusSession;
use crate::domain::models::AddReport;
use crate::infrastructure::extraction::extract_file;

#[derive(Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Text (.txt) or PDF files to add; other types are skipped
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct AddOutput {
    #[serde(flatten)]
    pub report: AddReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CommandOutput for AddOutput {
    fn to_human(&self) -> String {
        if let Some(warning) = &self.warning {
            return action_warning(warning);
        }

        let report = &self.report;
        let mut lines = vec![action_success(&format!(
            "Added {} from {}; corpus now holds {}",
            count_label(report.chunks_added, "chunk", "chunks"),
            count_label(report.files_received, "file", "files"),
            count_label(report.corpus_len, "chunk", "chunks"),
        ))];
        if !report.dropped.is_empty() {
            lines.push(action_warning(&format!(
                "No text extracted, skipped: {}",
                report.dropped.join(", ")
            )));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: AddArgs, session: &CorpusSession, json_mode: bool) -> Result<()> {
    if args.files.is_empty() {
        let out = AddOutput {
            report: AddReport {
                corpus_len: session.manager.len(),
                ..AddReport::default()
            },
            warning: Some("No files selected. Nothing to add.".to_string()),
        };
        output(&out, json_mode);
        return Ok(());
    }

    // Extract everything first so one bad file leaves the corpus untouched.
    let mut documents = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let document = extract_file(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(document);
    }

    let progress = spinner(
        format!(
            "Indexing {}...",
            count_label(documents.len(), "document", "documents")
        ),
        json_mode,
    );
    let report = match session.manager.add_documents(documents).await {
        Ok(report) => {
            if report.chunks_added == 0 {
                progress.finish_and_clear();
            } else {
                progress.finish_success("Index rebuilt");
            }
            report
        }
        Err(err) => {
            progress.finish_error("Indexing failed");
            return Err(err).context("Failed to add documents");
        }
    };

    let warning = (report.chunks_added == 0).then(|| {
        format!(
            "None of the {} contained extractable text. Nothing added.",
            count_label(report.files_received, "file", "files")
        )
    });
    output(&AddOutput { report, warning }, json_mode);
    Ok(())
}
