//! Implementation of the `docseek search` command.

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, CellAlignment};
use console::style;
use serde::Serialize;

use crate::cli::display::{
    action_warning, colorize_relevance, list_table, output, preview_line, relevance_color,
    source_name,
    CommandOutput,
};
use crate::cli::output::{spinner, ProgressBarExt};
use crate::cli::service::CorpusSession;
use crate::domain::errors::CorpusError;
use crate::domain::models::SearchHit;

const PREVIEW_CHARS: usize = 70;
const EMPTY_CORPUS_WARNING: &str = "The corpus is empty. Add documents before searching.";

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Free-text query; multiple words are joined with spaces
    #[arg(required = true, num_args = 1.., value_name = "QUERY")]
    pub query: Vec<String>,

    /// Number of results (1-10); defaults to search.default_k
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub k: Option<u8>,

    /// Print each matching chunk in full instead of a one-line preview
    #[arg(long)]
    pub full: bool,
}

impl SearchArgs {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub k: usize,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip)]
    pub full: bool,
}

impl SearchOutput {
    fn render_table(&self) -> String {
        let mut table = list_table(&["rank", "relevance", "row", "source", "preview"]);
        for hit in &self.results {
            table.add_row(vec![
                Cell::new(hit.rank).set_alignment(CellAlignment::Right),
                Cell::new(hit.relevance_percent()).fg(relevance_color(hit.relevance)),
                Cell::new(hit.row_id).set_alignment(CellAlignment::Right),
                Cell::new(&hit.source),
                Cell::new(preview_line(hit.chunk.body(), PREVIEW_CHARS)),
            ]);
        }
        table.to_string()
    }

    fn render_full(&self) -> String {
        self.results
            .iter()
            .map(|hit| {
                format!(
                    "{} {} {} {}\n{}",
                    style(format!("#{}", hit.rank)).bold(),
                    colorize_relevance(hit.relevance, hit.relevance_percent()),
                    style(format!("[row {}]", hit.row_id)).dim(),
                    source_name(&hit.source),
                    hit.chunk.body()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if let Some(warning) = &self.warning {
            return action_warning(warning);
        }
        if self.results.is_empty() {
            return "No results.".to_string();
        }
        let header = format!(
            "Top {} for {}:",
            self.results.len(),
            style(format!("\"{}\"", self.query)).bold()
        );
        let body = if self.full {
            self.render_full()
        } else {
            self.render_table()
        };
        format!("{header}\n{body}")
    }
}

pub async fn execute(args: SearchArgs, session: &CorpusSession, json_mode: bool) -> Result<()> {
    let query = args.query_text();
    let k = args.k.map_or(session.default_k, usize::from);

    let mut out = SearchOutput {
        query,
        k,
        results: Vec::new(),
        warning: None,
        full: args.full,
    };

    if session.manager.is_empty() {
        out.warning = Some(EMPTY_CORPUS_WARNING.to_string());
        output(&out, json_mode);
        return Ok(());
    }

    let progress = spinner("Searching...", json_mode);
    match session.manager.search(&out.query, k).await {
        Ok(results) => {
            progress.finish_and_clear();
            out.results = results;
        }
        Err(CorpusError::EmptyCorpus) => {
            progress.finish_and_clear();
            out.warning = Some(EMPTY_CORPUS_WARNING.to_string());
        }
        Err(err) => {
            progress.finish_error("Search failed");
            return Err(err).context("Search failed");
        }
    }

    output(&out, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DocumentChunk;

    fn hit(rank: usize, relevance: f32) -> SearchHit {
        SearchHit {
            rank,
            row_id: rank - 1,
            source: "a.txt".to_string(),
            chunk: DocumentChunk::from_upload("a.txt", "hello world").unwrap(),
            distance: 1.0 - relevance,
            relevance,
        }
    }

    #[test]
    fn test_warning_replaces_results() {
        let out = SearchOutput {
            query: "x".to_string(),
            k: 3,
            results: vec![],
            warning: Some(EMPTY_CORPUS_WARNING.to_string()),
            full: false,
        };
        let text = console::strip_ansi_codes(&out.to_human()).to_string();
        assert!(text.contains("corpus is empty"));
        assert_eq!(out.to_json()["warning"], EMPTY_CORPUS_WARNING);
    }

    #[test]
    fn test_table_shows_percentages() {
        let out = SearchOutput {
            query: "hello".to_string(),
            k: 2,
            results: vec![hit(1, 0.875), hit(2, 0.25)],
            warning: None,
            full: false,
        };
        let text = console::strip_ansi_codes(&out.to_human()).to_string();
        assert!(text.contains("Top 2"));
        assert!(text.contains("87.50%"));
        assert!(text.contains("25.00%"));
    }

    #[test]
    fn test_full_output_prints_body() {
        let out = SearchOutput {
            query: "hello".to_string(),
            k: 1,
            results: vec![hit(1, 1.0)],
            warning: None,
            full: true,
        };
        let text = console::strip_ansi_codes(&out.to_human()).to_string();
        assert!(text.contains("#1 100.00% [row 0] a.txt\nhello world"));
    }

    #[test]
    fn test_json_omits_display_flag() {
        let out = SearchOutput {
            query: "hello".to_string(),
            k: 1,
            results: vec![hit(1, 1.0)],
            warning: None,
            full: true,
        };
        let json = out.to_json();
        assert!(json.get("full").is_none());
        assert_eq!(json["results"][0]["source"], "a.txt");
    }
}
