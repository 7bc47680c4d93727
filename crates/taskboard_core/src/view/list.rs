//! Flat list view: cards grouped by board, sortable by column.
//!
//! # Invariants
//! - One group per active board in board order, empty groups included.
//! - Cards whose board reference is empty, missing or deleted go to a single
//!   trailing "Unassigned" group, present only when non-empty.

use crate::model::board::Board;
use crate::model::card::Card;
use crate::model::snapshot::Snapshot;
use std::cmp::Ordering;

/// Title of the synthetic group for cards without an active board.
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Accent used for the unassigned group and for boards without a color.
pub const FALLBACK_GROUP_COLOR: &str = "#44CB75";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Content,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for ListSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl ListSort {
    /// Column-header click: same field flips direction, a new field starts ascending.
    pub fn toggled(self, field: SortField) -> Self {
        if field == self.field {
            let direction = match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            };
            Self { field, direction }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    fn compare(&self, left: &Card, right: &Card) -> Ordering {
        let ordering = match self.field {
            SortField::Content => left
                .content
                .to_lowercase()
                .cmp(&right.content.to_lowercase()),
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
            SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
            SortField::DueDate => match (left.due_date, right.due_date) {
                (Some(l), Some(r)) => l.cmp(&r),
                // Undated cards stay at the bottom in both directions.
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Group identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey<'a> {
    Board(&'a Board),
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardGroup<'a> {
    pub key: GroupKey<'a>,
    pub cards: Vec<&'a Card>,
}

impl CardGroup<'_> {
    pub fn title(&self) -> &str {
        match self.key {
            GroupKey::Board(board) => board.title.as_str(),
            GroupKey::Unassigned => UNASSIGNED_GROUP,
        }
    }

    pub fn color(&self) -> &str {
        match self.key {
            GroupKey::Board(board) => board.color.as_deref().unwrap_or(FALLBACK_GROUP_COLOR),
            GroupKey::Unassigned => FALLBACK_GROUP_COLOR,
        }
    }
}

/// Groups the snapshot's cards by board and sorts each group.
pub fn group_by_board(snapshot: &Snapshot, sort: ListSort) -> Vec<CardGroup<'_>> {
    let mut groups: Vec<CardGroup<'_>> = snapshot
        .boards_in_order()
        .into_iter()
        .map(|board| CardGroup {
            key: GroupKey::Board(board),
            cards: snapshot
                .cards
                .iter()
                .filter(|card| card.board_id == board.id)
                .collect(),
        })
        .collect();

    let unassigned: Vec<&Card> = snapshot
        .cards
        .iter()
        .filter(|card| !snapshot.is_assigned(card))
        .collect();
    if !unassigned.is_empty() {
        groups.push(CardGroup {
            key: GroupKey::Unassigned,
            cards: unassigned,
        });
    }

    for group in &mut groups {
        group.cards.sort_by(|left, right| sort.compare(left, right));
    }
    groups
}
