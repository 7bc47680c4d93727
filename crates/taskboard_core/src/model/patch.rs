//! Explicit field-merge payloads for record updates.
//!
//! Every field carries a `Patch` marker: `Keep` leaves the stored value alone,
//! `Set` replaces it. Optional record fields are patched with
//! `Patch<Option<T>>`, so clearing a value (`Set(None)`) never looks like an
//! omitted field.

use super::board::Board;
use super::card::{normalize_labels, Card, Frequency};
use super::validation::{is_hex_color, ValidationError};
use crate::model::BoardId;
use chrono::NaiveDate;

/// Update marker for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// Leave the stored value unchanged.
    Keep,
    /// Replace the stored value.
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T> Patch<T> {
    /// `Some` becomes `Set`, `None` becomes `Keep`.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }

    /// Returns whether this marker carries a value.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Borrows the carried value, if any.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Keep => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Writes the carried value into `slot`. Returns whether anything was written.
    pub fn apply_to(self, slot: &mut T) -> bool {
        match self {
            Self::Keep => false,
            Self::Set(value) => {
                *slot = value;
                true
            }
        }
    }
}

/// Partial update for a [`Board`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPatch {
    pub title: Patch<String>,
    pub order: Patch<i64>,
    pub color: Patch<Option<String>>,
}

impl BoardPatch {
    /// Patch that only moves the board to `order`.
    pub fn order(order: i64) -> Self {
        Self {
            order: Patch::Set(order),
            ..Self::default()
        }
    }

    /// Returns whether the patch would leave every field unchanged.
    pub fn is_empty(&self) -> bool {
        !(self.title.is_set() || self.order.is_set() || self.color.is_set())
    }

    /// Checks only the fields this patch sets; stored values it keeps are
    /// not re-validated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Patch::Set(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
        }
        if let Patch::Set(Some(color)) = &self.color {
            if !is_hex_color(color) {
                return Err(ValidationError::InvalidColor(color.clone()));
            }
        }
        Ok(())
    }

    /// Merges the set fields into `board`. Timestamps are left to the caller.
    pub fn apply(self, board: &mut Board) {
        self.title.apply_to(&mut board.title);
        self.order.apply_to(&mut board.order);
        self.color.apply_to(&mut board.color);
    }
}

/// Partial update for a [`Card`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub board_id: Patch<BoardId>,
    pub content: Patch<String>,
    pub description: Patch<Option<String>>,
    pub order: Patch<i64>,
    pub due_date: Patch<Option<NaiveDate>>,
    pub frequency: Patch<Option<Frequency>>,
    pub is_completed: Patch<bool>,
    pub labels: Patch<Vec<String>>,
}

impl CardPatch {
    /// Patch that only changes the position inside the current board.
    pub fn order(order: i64) -> Self {
        Self {
            order: Patch::Set(order),
            ..Self::default()
        }
    }

    /// Patch that re-parents the card and positions it in one step.
    pub fn move_to(board_id: impl Into<BoardId>, order: i64) -> Self {
        Self {
            board_id: Patch::Set(board_id.into()),
            order: Patch::Set(order),
            ..Self::default()
        }
    }

    /// Patch that only flips the completion flag.
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Patch::Set(is_completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.board_id.is_set()
            || self.content.is_set()
            || self.description.is_set()
            || self.order.is_set()
            || self.due_date.is_set()
            || self.frequency.is_set()
            || self.is_completed.is_set()
            || self.labels.is_set())
    }

    /// Checks only the fields this patch sets.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Patch::Set(content) = &self.content {
            if content.trim().is_empty() {
                return Err(ValidationError::EmptyContent);
            }
        }
        if let Patch::Set(board_id) = &self.board_id {
            if board_id.trim().is_empty() {
                return Err(ValidationError::MissingBoardReference);
            }
        }
        Ok(())
    }

    /// Merges the set fields into `card`. Labels are normalized on the way in.
    pub fn apply(self, card: &mut Card) {
        self.board_id.apply_to(&mut card.board_id);
        self.content.apply_to(&mut card.content);
        self.description.apply_to(&mut card.description);
        self.order.apply_to(&mut card.order);
        self.due_date.apply_to(&mut card.due_date);
        self.frequency.apply_to(&mut card.frequency);
        self.is_completed.apply_to(&mut card.is_completed);
        if let Patch::Set(labels) = self.labels {
            card.labels = normalize_labels(&labels);
        }
    }
}
