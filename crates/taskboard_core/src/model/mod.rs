//! Board and card domain model.
//!
//! # Responsibility
//! - Define the records persisted in the `boards` and `cards` collections.
//! - Provide creation, validation and tombstone helpers.
//!
//! # Invariants
//! - Identifiers are opaque strings and never reused.
//! - Deletion is represented by soft-delete tombstones, not hard delete.
//! - A card references its board by id only; the board may be missing.

pub mod board;
pub mod card;
pub mod patch;
pub mod snapshot;
pub mod validation;

/// Opaque board identifier. Generated ids are UUID v4 text, but stored data
/// may carry any string.
pub type BoardId = String;

/// Opaque card identifier.
pub type CardId = String;

/// Generates a fresh record identifier.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
