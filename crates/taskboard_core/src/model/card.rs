//! Card record.
//!
//! # Invariants
//! - `content` is non-empty after trimming.
//! - `labels` are trimmed, lowercase, deduplicated and sorted.
//! - `board_id` is a plain reference; the board may be missing or deleted.

use super::validation::ValidationError;
use super::{generate_id, BoardId, CardId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Repeat cadence for habit-style cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

/// A single task or habit owned by a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: CardId,
    #[serde(default)]
    pub board_id: BoardId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default, with = "due_date_serde", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates an active, incomplete card with a generated id and order `0`.
    pub fn new(board_id: impl Into<BoardId>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            board_id: board_id.into(),
            content: content.into(),
            description: None,
            order: 0,
            due_date: None,
            frequency: None,
            is_completed: false,
            is_deleted: false,
            labels: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }

    /// Marks this card as softly deleted.
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

/// Creation payload for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCard {
    pub board_id: BoardId,
    pub content: String,
    pub description: Option<String>,
    /// Defaults to the active card count of the owning board.
    pub order: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub labels: Vec<String>,
}

impl NewCard {
    pub fn new(board_id: impl Into<BoardId>, content: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}

/// Normalizes one label; blank input yields `None`.
pub fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates labels into sorted order.
pub fn normalize_labels(labels: &[String]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| normalize_label(label))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Parses a stored due date.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (older records were
/// written as ISO instants); the latter keep the date as written.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|instant| instant.date_naive())
        })
}

mod due_date_serde {
    use super::parse_due_date;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_due_date(text)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid due date `{text}`"))),
        }
    }
}
