//! Command-line interface.

pub mod commands;
pub mod display;
pub mod output;
pub mod service;
pub mod types;

use serde_json::json;

pub use display::{output, CommandOutput};
pub use types::{Cli, Commands};

/// Print an error without exiting. Used by the shell between actions.
pub fn print_error(err: &anyhow::Error, json_mode: bool) {
    if json_mode {
        let body = json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{}", display::action_failure(&format!("{err:#}")));
    }
}

/// Print an error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    tracing::debug!(error = ?err, "command failed");
    print_error(&err, json_mode);
    std::process::exit(1);
}
