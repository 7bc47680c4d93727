//! Board repository contract and key-value implementation.
//!
//! # Invariants
//! - `list_active` preserves stored order and skips tombstones.
//! - Boards are never physically removed.

use crate::model::board::{Board, NewBoard, DEFAULT_BOARD_COLOR, DEFAULT_BOARD_TITLE};
use crate::model::patch::BoardPatch;
use crate::repo::kv_store::{load_collection, save_collection, Collection, KeyValueStore};
use crate::repo::{EntityKind, RepoError, RepoResult};
use log::debug;

/// Repository interface for board CRUD.
pub trait BoardRepository {
    /// Active boards in stored order.
    fn list_active(&self) -> RepoResult<Vec<Board>>;
    /// Every stored board, tombstones included.
    fn list_all(&self) -> RepoResult<Vec<Board>>;
    fn get(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Board>>;
    fn create(&self, new: NewBoard) -> RepoResult<Board>;
    /// Merges `patch` into the board and refreshes `updated_at`.
    fn update(&self, id: &str, patch: BoardPatch) -> RepoResult<Board>;
    fn soft_delete(&self, id: &str) -> RepoResult<()>;
    fn restore(&self, id: &str) -> RepoResult<Board>;
}

/// Board repository over any [`KeyValueStore`].
pub struct KvBoardRepository<S> {
    store: S,
}

impl<S: KeyValueStore> KvBoardRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn load(&self) -> RepoResult<Vec<Board>> {
        Ok(load_collection(&self.store, Collection::Boards)?)
    }

    fn save(&self, boards: &[Board]) -> RepoResult<()> {
        Ok(save_collection(&self.store, Collection::Boards, boards)?)
    }

    /// Loads the collection, mutates the board with `id` and writes everything back.
    fn modify(&self, id: &str, change: impl FnOnce(&mut Board)) -> RepoResult<Board> {
        let mut boards = self.load()?;
        let board = boards
            .iter_mut()
            .find(|board| board.id == id)
            .ok_or_else(|| RepoError::not_found(EntityKind::Board, id))?;

        change(board);
        let updated = board.clone();

        self.save(&boards)?;
        Ok(updated)
    }
}

impl<S: KeyValueStore> BoardRepository for KvBoardRepository<S> {
    fn list_active(&self) -> RepoResult<Vec<Board>> {
        let mut boards = self.load()?;
        boards.retain(Board::is_active);
        Ok(boards)
    }

    fn list_all(&self) -> RepoResult<Vec<Board>> {
        self.load()
    }

    fn get(&self, id: &str, include_deleted: bool) -> RepoResult<Option<Board>> {
        Ok(self
            .load()?
            .into_iter()
            .find(|board| board.id == id && (include_deleted || board.is_active())))
    }

    fn create(&self, new: NewBoard) -> RepoResult<Board> {
        let mut boards = self.load()?;
        let active_count = boards.iter().filter(|board| board.is_active()).count() as i64;

        let title = new
            .title
            .map(|title| title.trim().to_string())
            .unwrap_or_else(|| DEFAULT_BOARD_TITLE.to_string());
        let mut board = Board::new(title);
        board.order = new.order.unwrap_or(active_count);
        board.color = Some(new.color.unwrap_or_else(|| DEFAULT_BOARD_COLOR.to_string()));
        board.validate()?;

        boards.push(board.clone());
        self.save(&boards)?;
        debug!(
            "event=board_create module=repo status=ok board_id={} order={}",
            board.id, board.order
        );
        Ok(board)
    }

    fn update(&self, id: &str, patch: BoardPatch) -> RepoResult<Board> {
        patch.validate()?;
        let board = self.modify(id, |board| {
            patch.apply(board);
            board.touch();
        })?;
        debug!(
            "event=board_update module=repo status=ok board_id={} order={}",
            board.id, board.order
        );
        Ok(board)
    }

    fn soft_delete(&self, id: &str) -> RepoResult<()> {
        self.modify(id, Board::soft_delete)?;
        debug!("event=board_delete module=repo status=ok board_id={id}");
        Ok(())
    }

    fn restore(&self, id: &str) -> RepoResult<Board> {
        self.modify(id, Board::restore)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardRepository, KvBoardRepository};
    use crate::model::board::{NewBoard, DEFAULT_BOARD_COLOR, DEFAULT_BOARD_TITLE};
    use crate::model::patch::{BoardPatch, Patch};
    use crate::repo::kv_store::MemoryKeyValueStore;
    use crate::repo::RepoError;

    #[test]
    fn create_applies_defaults_and_appends() {
        let store = MemoryKeyValueStore::new();
        let repo = KvBoardRepository::new(&store);

        let first = repo.create(NewBoard::default()).unwrap();
        let second = repo.create(NewBoard::titled("  Doing ")).unwrap();

        assert_eq!(first.title, DEFAULT_BOARD_TITLE);
        assert_eq!(first.color.as_deref(), Some(DEFAULT_BOARD_COLOR));
        assert_eq!(first.order, 0);
        assert_eq!(second.title, "Doing");
        assert_eq!(second.order, 1);
    }

    #[test]
    fn invalid_update_leaves_record_unchanged() {
        let store = MemoryKeyValueStore::new();
        let repo = KvBoardRepository::new(&store);
        let board = repo.create(NewBoard::titled("Todo")).unwrap();

        let err = repo
            .update(
                &board.id,
                BoardPatch {
                    title: Patch::Set("   ".to_string()),
                    ..BoardPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let stored = repo.get(&board.id, false).unwrap().unwrap();
        assert_eq!(stored, board);
    }

    #[test]
    fn restore_brings_board_back() {
        let store = MemoryKeyValueStore::new();
        let repo = KvBoardRepository::new(&store);
        let board = repo.create(NewBoard::titled("Later")).unwrap();

        repo.soft_delete(&board.id).unwrap();
        assert!(repo.list_active().unwrap().is_empty());

        let restored = repo.restore(&board.id).unwrap();
        assert!(restored.is_active());
        assert_eq!(repo.list_active().unwrap().len(), 1);
    }
}
