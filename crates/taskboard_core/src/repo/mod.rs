//! Domain access layer over the key-value adapter.
//!
//! # Responsibility
//! - Provide CRUD contracts for boards and cards.
//! - Keep serialization and storage keys inside the persistence boundary.
//!
//! # Invariants
//! - `create` validates the new record; `update` validates only the fields its
//!   patch sets. Tombstone flips never validate, so tolerantly read records
//!   can always be moved and deleted.
//! - Lookups scan the full collection, tombstones included.
//! - APIs return semantic errors (`NotFound`, `Validation`) next to storage
//!   failures.

use crate::model::validation::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod board_repo;
pub mod card_repo;
pub mod kv_store;

use kv_store::StoreError;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity family named in repository errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Board,
    Card,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => write!(f, "board"),
            Self::Card => write!(f, "card"),
        }
    }
}

/// Repository error for board and card operations.
#[derive(Debug)]
pub enum RepoError {
    /// Identifier absent from the collection.
    NotFound { entity: EntityKind, id: String },
    /// Store inaccessible or holding corrupt data.
    StorageUnavailable(StoreError),
    /// Record rejected before any write.
    Validation(ValidationError),
}

impl RepoError {
    pub(crate) fn not_found(entity: EntityKind, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable short code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Validation(_) => "validation_failed",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::StorageUnavailable(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
