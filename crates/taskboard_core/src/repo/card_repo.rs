//! Card repository contract and key-value implementation.
//!
//! # Invariants
//! - `list_active` preserves stored order and skips tombstones.
//! - A card's board reference is not checked against the boards collection.

use crate::model::card::{normalize_labels, Card, NewCard};
use crate::model::patch::CardPatch;
use crate::model::validation::ValidationError;
use crate::repo::kv_store::{load_collection, save_collection, Collection, KeyValueStore};
use crate::repo::{EntityKind, RepoError, RepoResult};
use log::debug;

/// Repository interface for card CRUD.
pub trait CardRepository {
    /// Active cards in stored order.
    fn list_active(&self) -> RepoResult<Vec<Card>>;
    /// Every stored card, tombstones included.
    fn list_all(&self) -> RepoResult<Vec<Card>>;
    fn get(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Card>>;
    fn create(&self, new: NewCard) -> RepoResult<Card>;
    /// Merges `patch` into the card and refreshes `updated_at`.
    fn update(&self, id: &str, patch: CardPatch) -> RepoResult<Card>;
    fn soft_delete(&self, id: &str) -> RepoResult<()>;
    fn restore(&self, id: &str) -> RepoResult<Card>;
}

/// Card repository over any [`KeyValueStore`].
pub struct KvCardRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvCardRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load(&self) -> RepoResult<Vec<Card>> {
        Ok(load_collection(&self.store, Collection::Cards)?)
    }

    fn save(&self, cards: &[Card]) -> RepoResult<()> {
        Ok(save_collection(&self.store, Collection::Cards, cards)?)
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Card)) -> RepoResult<Card> {
        let mut cards = self.load()?;
        let card = cards
            .iter_mut()
            .find(|card| card.id == id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Card, id))?;

        change(card);
        let updated = card.clone();

        self.save(&cards)?;
        Ok(updated)
    }
}

impl<S: KeyValueStore> CardRepository for KvCardRepository<S> {
    fn list_active(&self) -> RepoResult<Vec<Card>> {
        let mut cards = self.load()?;
        cards.retain(Card::is_active);
        Ok(cards)
    }

    fn list_all(&self) -> RepoResult<Vec<Card>> {
        self.load()
    }

    fn get(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Card>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|card| card.id == id && (include_deleted || card.is_active())))
    }

    fn create(&self, new: NewCard) -> RepoResult<Card> {
        let board_id = new.board_id.trim().to_string();
        if board_id.is_empty() {
            return Err(ValidationError::MissingBoardReference.into());
        }

        let mut cards = self.load()?;
        let siblings = cards
            .iter()
            .filter(|card| card.is_active() && card.board_id == board_id)
            .count() as i64;

        let mut card = Card::new(board_id, new.content.trim());
        card.description = new.description.filter(|text| !text.trim().is_empty());
        card.order = new.order.unwrap_or(siblings);
        card.due_date = new.due_date;
        card.frequency = new.frequency;
        card.labels = normalize_labels(&new.labels);
        card.validate()?;

        cards.push(card.clone());
        self.save(&cards)?;
        debug!(
            "event=card_create module=repo status=ok card_id={} board_id={} order={}",
            card.id, card.board_id, card.order
        );
        Ok(card)
    }

    fn update(&self, id: &str, patch: CardPatch) -> RepoResult<Card> {
        patch.validate()?;
        let card = self.modify(id, |card| {
            patch.apply(card);
            card.touch();
        })?;
        debug!(
            "event=card_update module=repo status=ok card_id={} board_id={} order={}",
            card.id, card.board_id, card.order
        );
        Ok(card)
    }

    fn soft_delete(&self, id: &str) -> RepoResult<()> {
        self.modify(id, Card::soft_delete)?;
        debug!("event=card_delete module=repo status=ok card_id={id}");
        Ok(())
    }

    fn restore(&self, id: &str) -> RepoResult<Card> {
        self.modify(id, Card::restore)
    }
}

#[cfg(test)]
mod tests {
    use super::{CardRepository, KvCardRepository};
    use crate::model::card::NewCard;
    use crate::model::patch::{CardPatch, Patch};
    use crate::model::validation::ValidationError;
    use crate::repo::kv_store::MemoryKeyValueStore;
    use crate::repo::RepoError;

    #[test]
    fn create_counts_only_active_cards_of_the_same_board() {
        let store = MemoryKeyValueStore::new();
        let repo = KvCardRepository::new(&store);

        let a1 = repo.create(NewCard::new("a", "first")).unwrap();
        repo.create(NewCard::new("b", "other board")).unwrap();
        let a2 = repo.create(NewCard::new("a", "second")).unwrap();
        repo.soft_delete(&a1.id).unwrap();
        let a3 = repo.create(NewCard::new("a", "third")).unwrap();

        assert_eq!(a1.order, 0);
        assert_eq!(a2.order, 1);
        assert_eq!(a3.order, 1);
    }

    #[test]
    fn create_rejects_blank_content_and_missing_board() {
        let store = MemoryKeyValueStore::new();
        let repo = KvCardRepository::new(&store);

        let err = repo.create(NewCard::new("a", "   ")).unwrap_err();
        assert!(matches!(err, RepoError::Validation(ValidationError::EmptyContent)));

        let err = repo.create(NewCard::new(" ", "content")).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Validation(ValidationError::MissingBoardReference)
        ));
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn update_keeps_unset_fields() {
        let store = MemoryKeyValueStore::new();
        let repo = KvCardRepository::new(&store);
        let mut new = NewCard::new("a", "Read");
        new.description = Some("psychology book".to_string());
        let card = repo.create(new).unwrap();

        let updated = repo
            .update(
                &card.id,
                CardPatch {
                    is_completed: Patch::Set(true),
                    ..CardPatch::default()
                },
            )
            .unwrap();

        assert!(updated.is_completed);
        assert_eq!(updated.content, "Read");
        assert_eq!(updated.description.as_deref(), Some("psychology book"));
        assert!(updated.updated_at >= card.updated_at);
    }
}
