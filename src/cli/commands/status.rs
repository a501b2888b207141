//! Implementation of the `docseek status` command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::display::{output, CommandOutput, DetailView};
use crate::cli::service::CorpusSession;
use crate::domain::models::{CorpusStatus, Reconciliation};

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    #[serde(flatten)]
    pub status: CorpusStatus,
    pub reconciliation: Reconciliation,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let status = &self.status;
        let dash = || "-".to_string();
        let index_rows = status.index_rows.map_or_else(dash, |n| n.to_string());
        let index_dim = status.index_dimension.map_or_else(dash, |n| n.to_string());
        let built_at = status
            .index_built_at
            .map_or_else(dash, |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

        DetailView::new("docseek corpus")
            .field("Chunks", &status.chunks.to_string())
            .field("Index rows", &index_rows)
            .field("State", &status.state.to_string())
            .field("Opened", &self.reconciliation.to_string())
            .section("Index")
            .field("Dimension", &index_dim)
            .field("Built", &built_at)
            .section("Embedder")
            .field("Backend", &status.embedder)
            .field_opt("Model", status.embedding_model.as_deref())
            .field("Dimension", &status.embedding_dimension.to_string())
            .section("Files")
            .field("Chunks", &status.chunks_path.display().to_string())
            .field("Index", &status.index_path.display().to_string())
            .render()
    }
}

pub fn execute(session: &CorpusSession, json_mode: bool) -> Result<()> {
    let out = StatusOutput {
        status: session.manager.status(),
        reconciliation: session.load_report.reconciliation,
    };
    output(&out, json_mode);
    Ok(())
}
