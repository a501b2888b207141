//! Implementation of the `docseek list` command.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use serde::Serialize;

use crate::cli::display::{
    byte_size, list_table, output, preview_line, render_list, CommandOutput,
};
use crate::cli::service::CorpusSession;
use crate::domain::models::DocumentChunk;

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Serialize)]
pub struct ChunkSummary {
    pub row_id: usize,
    pub source: String,
    pub bytes: usize,
    pub preview: String,
}

impl ChunkSummary {
    fn from_chunk(row_id: usize, chunk: &DocumentChunk) -> Self {
        Self {
            row_id,
            source: chunk.source_name().to_string(),
            bytes: chunk.body().len(),
            preview: preview_line(chunk.body(), PREVIEW_CHARS),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub chunks: Vec<ChunkSummary>,
    pub total: usize,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["row", "source", "size", "preview"]);
        for chunk in &self.chunks {
            table.add_row(vec![
                Cell::new(chunk.row_id).set_alignment(CellAlignment::Right),
                Cell::new(&chunk.source),
                Cell::new(byte_size(chunk.bytes)),
                Cell::new(&chunk.preview),
            ]);
        }
        render_list("chunk", &table, self.total)
    }
}

pub fn execute(session: &CorpusSession, json_mode: bool) -> Result<()> {
    let chunks: Vec<ChunkSummary> = session
        .manager
        .chunks()
        .iter()
        .enumerate()
        .map(|(row_id, chunk)| ChunkSummary::from_chunk(row_id, chunk))
        .collect();

    let out = ListOutput {
        total: chunks.len(),
        chunks,
    };
    output(&out, json_mode);
    Ok(())
}
