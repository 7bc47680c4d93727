//! Board record.
//!
//! # Invariants
//! - `order` defines display sequence among active boards; it need not be
//!   contiguous at rest.
//! - `updated_at >= created_at` for records written by this crate.

use super::validation::{is_hex_color, ValidationError};
use super::{generate_id, BoardId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color assigned to boards created without one.
pub const DEFAULT_BOARD_COLOR: &str = "#ffffff";

/// Title used when a board is created without one.
pub const DEFAULT_BOARD_TITLE: &str = "Untitled";

/// A named, ordered column grouping cards.
///
/// Missing fields in stored JSON fall back to defaults, unknown fields are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    #[serde(default)]
    pub id: BoardId,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

fn default_title() -> String {
    DEFAULT_BOARD_TITLE.to_string()
}

impl Board {
    /// Creates an active board with a generated id, order `0` and the default color.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            title: title.into(),
            order: 0,
            color: Some(DEFAULT_BOARD_COLOR.to_string()),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let Some(color) = self.color.as_deref() {
            if !is_hex_color(color) {
                return Err(ValidationError::InvalidColor(color.to_string()));
            }
        }
        Ok(())
    }

    /// Marks this board as softly deleted. Its cards are left alone.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.touch();
    }

    /// Clears the soft delete flag.
    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.touch();
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// Creation payload for a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBoard {
    /// Defaults to [`DEFAULT_BOARD_TITLE`].
    pub title: Option<String>,
    /// Defaults to the current active board count.
    pub order: Option<i64>,
    /// Defaults to [`DEFAULT_BOARD_COLOR`].
    pub color: Option<String>,
}

impl NewBoard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}
