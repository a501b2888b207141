//! Terminal feedback while long operations run.

pub mod progress;

pub use progress::{spinner, ProgressBarExt};
