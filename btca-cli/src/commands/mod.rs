//! CLI command implementations

pub mod ask;
pub mod bookmark;
pub mod clean;
pub mod config;
pub mod history;
pub mod repo;
pub mod serve;
pub mod stats;
pub mod status;
pub mod update;

pub use ask::AskArgs;
pub use bookmark::BookmarkArgs;
pub use clean::CleanArgs;
pub use config::ConfigArgs;
pub use history::HistoryArgs;
pub use repo::RepoArgs;
pub use serve::ServeArgs;
pub use stats::StatsArgs;
pub use status::StatusArgs;
pub use update::UpdateArgs;
