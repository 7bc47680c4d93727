//! In-memory copy of both active collections.

use super::board::Board;
use super::card::Card;

/// Active boards and cards as last loaded from storage.
///
/// Replaced wholesale after every mutation; `revision` increases with each
/// reload so holders of an older snapshot can tell it is stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub revision: u64,
    pub boards: Vec<Board>,
    pub cards: Vec<Card>,
}

impl Snapshot {
    pub fn board(&self, id: &str) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == id)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Boards ascending by `order`; ties keep stored order.
    pub fn boards_in_order(&self) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self.boards.iter().collect();
        boards.sort_by_key(|board| board.order);
        boards
    }

    /// Cards referencing `board_id`, ascending by `order`; ties keep stored order.
    pub fn cards_in_board(&self, board_id: &str) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self
            .cards
            .iter()
            .filter(|card| card.board_id == board_id)
            .collect();
        cards.sort_by_key(|card| card.order);
        cards
    }

    /// Whether the card's board reference resolves to an active board.
    pub fn is_assigned(&self, card: &Card) -> bool {
        !card.board_id.is_empty() && self.board(&card.board_id).is_some()
    }
}
