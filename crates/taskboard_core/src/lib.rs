//! Core domain logic for the task board.
//! Boards, cards, their key-value persistence and the drag-and-drop reorder
//! rules live here; the CLI only drives this crate.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::board::{Board, NewBoard};
pub use model::card::{Card, Frequency, NewCard};
pub use model::patch::{BoardPatch, CardPatch, Patch};
pub use model::snapshot::Snapshot;
pub use model::validation::ValidationError;
pub use model::{BoardId, CardId};
pub use repo::board_repo::{BoardRepository, KvBoardRepository};
pub use repo::card_repo::{CardRepository, KvCardRepository};
pub use repo::kv_store::{
    Collection, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError,
};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::board_session::{BoardSession, DropOutcome, SessionOptions};
pub use service::reorder::{
    apply_plan, plan_drop, CrossBoardPolicy, DropEvent, DropKind, PlannedUpdate, ReorderPlan,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
