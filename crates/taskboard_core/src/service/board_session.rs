//! Board session: snapshot owner and gesture entry point.
//!
//! # Responsibility
//! - Hold the in-memory snapshot every view renders from.
//! - Route CRUD calls and drop gestures to the repositories.
//! - Reload both collections after every mutation.
//!
//! # Invariants
//! - The snapshot is never patched in place; it is replaced by a reload.
//! - `revision` increases by one per reload.
//! - A reload also follows a failed multi-update drop, so partial writes are visible.

use crate::model::board::{Board, NewBoard};
use crate::model::card::{Card, NewCard};
use crate::model::patch::{BoardPatch, CardPatch};
use crate::model::snapshot::Snapshot;
use crate::repo::board_repo::{BoardRepository, KvBoardRepository};
use crate::repo::card_repo::{CardRepository, KvCardRepository};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::{EntityKind, RepoError, RepoResult};
use crate::service::reorder::{apply_plan, plan_drop, CrossBoardPolicy, DropEvent, DropKind};
use log::{error, info};

/// Session-level tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    pub cross_board: CrossBoardPolicy,
}

/// What a drop gesture did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropOutcome {
    pub kind: DropKind,
    /// Number of records written.
    pub updates: usize,
    /// Snapshot revision after the gesture.
    pub revision: u64,
}

/// Single-user session over one key-value store.
pub struct BoardSession<S: KeyValueStore> {
    store: S,
    options: SessionOptions,
    snapshot: Snapshot,
}

impl<S: KeyValueStore> BoardSession<S> {
    /// Opens a session and performs the initial load.
    pub fn open(store: S, options: SessionOptions) -> RepoResult<Self> {
        let mut session = Self {
            store,
            options,
            snapshot: Snapshot::default(),
        };
        session.refresh()?;
        Ok(session)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn boards(&self) -> KvBoardRepository<&S> {
        KvBoardRepository::new(&self.store)
    }

    pub fn cards(&self) -> KvCardRepository<&S> {
        KvCardRepository::new(&self.store)
    }

    /// Replaces the snapshot with the active sets currently in storage.
    pub fn refresh(&mut self) -> RepoResult<&Snapshot> {
        let boards = self.boards().list_active()?;
        let cards = self.cards().list_active()?;
        self.snapshot = Snapshot {
            revision: self.snapshot.revision + 1,
            boards,
            cards,
        };
        Ok(&self.snapshot)
    }

    /// Creates a board. Without an explicit order it goes after the last
    /// active board (`order = count + 1`).
    pub fn create_board(&mut self, mut new: NewBoard) -> RepoResult<Board> {
        if new.order.is_none() {
            new.order = Some(self.snapshot.boards.len() as i64 + 1);
        }
        let result = self.boards().create(new);
        self.finish("board_create", result)
    }

    pub fn update_board(&mut self, id: &str, patch: BoardPatch) -> RepoResult<Board> {
        let result = self.boards().update(id, patch);
        self.finish("board_update", result)
    }

    /// Soft-deletes a board. Its cards stay and show up as unassigned.
    pub fn delete_board(&mut self, id: &str) -> RepoResult<()> {
        let result = self.boards().soft_delete(id);
        self.finish("board_delete", result)
    }

    /// Creates a card. Without an explicit order it goes after the last card
    /// of its board (`order = count + 1`).
    pub fn create_card(&mut self, mut new: NewCard) -> RepoResult<Card> {
        if new.order.is_none() {
            let count = self.snapshot.cards_in_board(new.board_id.trim()).len();
            new.order = Some(count as i64 + 1);
        }
        let result = self.cards().create(new);
        self.finish("card_create", result)
    }

    pub fn update_card(&mut self, id: &str, patch: CardPatch) -> RepoResult<Card> {
        let result = self.cards().update(id, patch);
        self.finish("card_update", result)
    }

    pub fn delete_card(&mut self, id: &str) -> RepoResult<()> {
        let result = self.cards().soft_delete(id);
        self.finish("card_delete", result)
    }

    pub fn set_completed(&mut self, id: &str, is_completed: bool) -> RepoResult<Card> {
        self.update_card(id, CardPatch::completed(is_completed))
    }

    /// Flips completion using the snapshot's current value.
    pub fn toggle_completed(&mut self, id: &str) -> RepoResult<Card> {
        let current = self
            .snapshot
            .card(id)
            .map(|card| card.is_completed)
            .ok_or_else(|| RepoError::not_found(EntityKind::Card, id))?;
        self.set_completed(id, !current)
    }

    /// Applies one drop gesture against the current snapshot.
    ///
    /// Ignored gestures write nothing and keep the snapshot. Otherwise the
    /// snapshot is reloaded even when an update fails halfway.
    pub fn handle_drop(&mut self, event: &DropEvent) -> RepoResult<DropOutcome> {
        let plan = plan_drop(&self.snapshot, event, self.options.cross_board);
        if plan.is_noop() {
            info!(
                "event=drop module=session status=ignored kind={:?} dragged={}",
                plan.kind, event.dragged
            );
            return Ok(DropOutcome {
                kind: plan.kind,
                updates: 0,
                revision: self.snapshot.revision,
            });
        }

        let result = apply_plan(&plan, &self.boards(), &self.cards());
        let updates = self.finish("drop", result)?;
        Ok(DropOutcome {
            kind: plan.kind,
            updates,
            revision: self.snapshot.revision,
        })
    }

    /// Reloads after a write attempt and logs the outcome.
    ///
    /// A reload failure after a successful write is returned in its place.
    fn finish<T>(&mut self, event: &'static str, result: RepoResult<T>) -> RepoResult<T> {
        let reload = self.refresh().map(|snapshot| snapshot.revision);
        match (&result, &reload) {
            (Ok(_), Ok(revision)) => {
                info!("event={event} module=session status=ok revision={revision}")
            }
            (Err(err), _) => error!(
                "event={event} module=session status=error error_code={} error={err}",
                err.code()
            ),
            (Ok(_), Err(err)) => error!(
                "event={event} module=session status=error error_code=reload_failed error={err}"
            ),
        }
        let value = result?;
        reload?;
        Ok(value)
    }
}
