//! CLI command implementations.

pub mod add;
pub mod list;
pub mod remove;
pub mod search;
pub mod shell;
pub mod show;
pub mod status;

pub use add::AddArgs;
pub use remove::RemoveArgs;
pub use search::SearchArgs;
pub use show::ShowArgs;
