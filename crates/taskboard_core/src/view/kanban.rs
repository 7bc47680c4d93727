//! Kanban columns: one per active board, cards in board order.

use crate::model::board::Board;
use crate::model::card::Card;
use crate::model::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanColumn<'a> {
    pub board: &'a Board,
    pub cards: Vec<&'a Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanbanBoard<'a> {
    pub columns: Vec<KanbanColumn<'a>>,
    /// Length of the longest column, used to size the grid.
    pub max_cards: usize,
}

/// Builds the kanban projection. Cards without an active board are not shown.
pub fn columns(snapshot: &Snapshot) -> KanbanBoard<'_> {
    let columns: Vec<KanbanColumn<'_>> = snapshot
        .boards_in_order()
        .into_iter()
        .map(|board| KanbanColumn {
            board,
            cards: snapshot.cards_in_board(&board.id),
        })
        .collect();
    let max_cards = columns
        .iter()
        .map(|column| column.cards.len())
        .max()
        .unwrap_or(0);

    KanbanBoard { columns, max_cards }
}
