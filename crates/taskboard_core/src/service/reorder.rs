//! Drag-and-drop reorder engine.
//!
//! # Responsibility
//! - Resolve a drop gesture against the current snapshot.
//! - Compute the new card/board positions and the minimal update list.
//! - Issue those updates through the repositories in plan order.
//!
//! # Invariants
//! - Planning is pure: it reads the snapshot and never touches storage.
//! - Renumbered sequences are 1-based and contiguous.
//! - Only records whose fields actually change get an update.
//! - A failed update stops the plan; earlier updates stay applied.

use crate::model::board::Board;
use crate::model::card::Card;
use crate::model::patch::{BoardPatch, CardPatch};
use crate::model::snapshot::Snapshot;
use crate::model::{BoardId, CardId};
use crate::repo::board_repo::BoardRepository;
use crate::repo::card_repo::CardRepository;
use crate::repo::RepoResult;
use log::{debug, warn};

/// One completed drag gesture: what was dragged and where it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub dragged: String,
    /// `None` when released outside any droppable target.
    pub target: Option<String>,
}

impl DropEvent {
    pub fn new(dragged: impl Into<String>, target: Option<String>) -> Self {
        Self {
            dragged: dragged.into(),
            target,
        }
    }

    pub fn onto(dragged: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(dragged, Some(target.into()))
    }
}

/// How a card dropped into another board treats that board's existing cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrossBoardPolicy {
    /// Only the moved card is written; destination siblings keep their
    /// `order`, so two cards may share a position until the next in-board
    /// reorder.
    #[default]
    PreserveSiblings,
    /// Destination and source boards are renumbered 1..n around the move.
    Renumber,
}

/// Branch of the drop decision tree that produced a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropKind {
    /// Same id, no target, or an unresolvable pairing.
    Ignored,
    /// Card moved within its own board.
    CardReorder { board_id: BoardId },
    /// Card dropped on a card of another board.
    CardMove { from: BoardId, to: BoardId },
    /// Card dropped on a board's empty area.
    CardToBoard { from: BoardId, to: BoardId },
    /// Board moved among boards.
    BoardReorder,
}

/// One persistent write produced by planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedUpdate {
    Card { id: CardId, patch: CardPatch },
    Board { id: BoardId, patch: BoardPatch },
}

/// Result of planning a drop: the branch taken and the writes it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub kind: DropKind,
    pub updates: Vec<PlannedUpdate>,
}

impl ReorderPlan {
    fn ignored() -> Self {
        Self {
            kind: DropKind::Ignored,
            updates: Vec::new(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Computes the writes needed to realize `event` on `snapshot`.
pub fn plan_drop(snapshot: &Snapshot, event: &DropEvent, policy: CrossBoardPolicy) -> ReorderPlan {
    let Some(target_id) = event.target.as_deref() else {
        return ReorderPlan::ignored();
    };
    if target_id == event.dragged {
        return ReorderPlan::ignored();
    }

    if let Some(dragged) = snapshot.card(&event.dragged) {
        if let Some(target) = snapshot.card(target_id) {
            if target.board_id == dragged.board_id {
                return plan_card_reorder(snapshot, dragged, target);
            }
            return plan_card_move(snapshot, dragged, target, policy);
        }
        if let Some(board) = snapshot.board(target_id) {
            return plan_card_to_board(snapshot, dragged, board, policy);
        }
        return ReorderPlan::ignored();
    }

    if let Some(dragged) = snapshot.board(&event.dragged) {
        if let Some(target) = snapshot.board(target_id) {
            return plan_board_reorder(snapshot, dragged, target);
        }
    }

    ReorderPlan::ignored()
}

/// Issues every update of `plan` in order. Returns how many were written.
///
/// Stops at the first failure without undoing earlier writes.
pub fn apply_plan<B, C>(plan: &ReorderPlan, boards: &B, cards: &C) -> RepoResult<usize>
where
    B: BoardRepository + ?Sized,
    C: CardRepository + ?Sized,
{
    for (applied, update) in plan.updates.iter().enumerate() {
        let result = match update {
            PlannedUpdate::Card { id, patch } => cards.update(id, patch.clone()).map(|_| ()),
            PlannedUpdate::Board { id, patch } => boards.update(id, patch.clone()).map(|_| ()),
        };
        if let Err(err) = result {
            warn!(
                "event=drop_apply module=reorder status=error applied={applied} total={} error_code={} error={err}",
                plan.updates.len(),
                err.code()
            );
            return Err(err);
        }
    }

    debug!(
        "event=drop_apply module=reorder status=ok kind={:?} updates={}",
        plan.kind,
        plan.updates.len()
    );
    Ok(plan.updates.len())
}

fn plan_card_reorder(snapshot: &Snapshot, dragged: &Card, target: &Card) -> ReorderPlan {
    let mut sequence = snapshot.cards_in_board(&dragged.board_id);
    let (Some(from), Some(to)) = (
        position_of(&sequence, &dragged.id, |card| &card.id),
        position_of(&sequence, &target.id, |card| &card.id),
    ) else {
        return ReorderPlan::ignored();
    };
    move_item(&mut sequence, from, to);

    ReorderPlan {
        kind: DropKind::CardReorder {
            board_id: dragged.board_id.clone(),
        },
        updates: renumber_cards(&sequence),
    }
}

fn plan_card_move(
    snapshot: &Snapshot,
    dragged: &Card,
    target: &Card,
    policy: CrossBoardPolicy,
) -> ReorderPlan {
    let destination = snapshot.cards_in_board(&target.board_id);
    let Some(index) = position_of(&destination, &target.id, |card| &card.id) else {
        return ReorderPlan::ignored();
    };

    ReorderPlan {
        kind: DropKind::CardMove {
            from: dragged.board_id.clone(),
            to: target.board_id.clone(),
        },
        updates: relocate_card(snapshot, dragged, &target.board_id, index, policy),
    }
}

fn plan_card_to_board(
    snapshot: &Snapshot,
    dragged: &Card,
    board: &Board,
    policy: CrossBoardPolicy,
) -> ReorderPlan {
    let updates = match policy {
        CrossBoardPolicy::PreserveSiblings => {
            // Counts the dragged card too when it already lives here.
            let count = snapshot.cards_in_board(&board.id).len();
            vec![PlannedUpdate::Card {
                id: dragged.id.clone(),
                patch: CardPatch::move_to(board.id.clone(), count as i64 + 1),
            }]
        }
        CrossBoardPolicy::Renumber => {
            let others = snapshot
                .cards_in_board(&board.id)
                .into_iter()
                .filter(|card| card.id != dragged.id)
                .count();
            relocate_card(snapshot, dragged, &board.id, others, policy)
        }
    };

    ReorderPlan {
        kind: DropKind::CardToBoard {
            from: dragged.board_id.clone(),
            to: board.id.clone(),
        },
        updates,
    }
}

/// Writes for placing `dragged` at `index` of `board_id`'s sequence.
fn relocate_card(
    snapshot: &Snapshot,
    dragged: &Card,
    board_id: &str,
    index: usize,
    policy: CrossBoardPolicy,
) -> Vec<PlannedUpdate> {
    let moved = PlannedUpdate::Card {
        id: dragged.id.clone(),
        patch: CardPatch::move_to(board_id, index as i64 + 1),
    };
    if policy == CrossBoardPolicy::PreserveSiblings {
        return vec![moved];
    }

    let mut destination: Vec<&Card> = snapshot
        .cards_in_board(board_id)
        .into_iter()
        .filter(|card| card.id != dragged.id)
        .collect();
    let index = index.min(destination.len());
    destination.insert(index, dragged);

    let mut updates = vec![PlannedUpdate::Card {
        id: dragged.id.clone(),
        patch: CardPatch::move_to(board_id, index as i64 + 1),
    }];
    updates.extend(
        renumber_cards(&destination)
            .into_iter()
            .filter(|update| !matches!(update, PlannedUpdate::Card { id, .. } if *id == dragged.id)),
    );

    if dragged.board_id != board_id {
        let source: Vec<&Card> = snapshot
            .cards_in_board(&dragged.board_id)
            .into_iter()
            .filter(|card| card.id != dragged.id)
            .collect();
        updates.extend(renumber_cards(&source));
    }
    updates
}

fn plan_board_reorder(snapshot: &Snapshot, dragged: &Board, target: &Board) -> ReorderPlan {
    let mut sequence = snapshot.boards_in_order();
    let (Some(from), Some(to)) = (
        position_of(&sequence, &dragged.id, |board| &board.id),
        position_of(&sequence, &target.id, |board| &board.id),
    ) else {
        return ReorderPlan::ignored();
    };
    move_item(&mut sequence, from, to);

    let updates = sequence
        .iter()
        .enumerate()
        .filter_map(|(index, board)| {
            let order = index as i64 + 1;
            (board.order != order).then(|| PlannedUpdate::Board {
                id: board.id.clone(),
                patch: BoardPatch::order(order),
            })
        })
        .collect();

    ReorderPlan {
        kind: DropKind::BoardReorder,
        updates,
    }
}

fn renumber_cards(sequence: &[&Card]) -> Vec<PlannedUpdate> {
    sequence
        .iter()
        .enumerate()
        .filter_map(|(index, card)| {
            let order = index as i64 + 1;
            (card.order != order).then(|| PlannedUpdate::Card {
                id: card.id.clone(),
                patch: CardPatch::order(order),
            })
        })
        .collect()
}

fn position_of<T>(items: &[&T], id: &str, id_of: impl Fn(&T) -> &String) -> Option<usize> {
    items.iter().position(|item| id_of(item) == id)
}

/// List-move: remove at `from`, reinsert at `to`; items in between shift by one.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::{move_item, plan_drop, CrossBoardPolicy, DropEvent, DropKind, PlannedUpdate};
    use crate::model::board::Board;
    use crate::model::card::Card;
    use crate::model::patch::{CardPatch, Patch};
    use crate::model::snapshot::Snapshot;

    fn board(id: &str, order: i64) -> Board {
        let mut board = Board::new(id);
        board.id = id.to_string();
        board.order = order;
        board
    }

    fn card(id: &str, board_id: &str, order: i64) -> Card {
        let mut card = Card::new(board_id, id);
        card.id = id.to_string();
        card.order = order;
        card
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            revision: 1,
            boards: vec![board("A", 1), board("B", 2), board("C", 3)],
            cards: vec![
                card("X", "A", 1),
                card("Y", "A", 2),
                card("Z", "A", 3),
                card("L", "B", 1),
                card("M", "B", 2),
                card("N", "B", 3),
            ],
        }
    }

    fn card_orders(updates: &[PlannedUpdate]) -> Vec<(String, i64)> {
        updates
            .iter()
            .filter_map(|update| match update {
                PlannedUpdate::Card { id, patch } => {
                    patch.order.as_set().map(|order| (id.clone(), *order))
                }
                PlannedUpdate::Board { .. } => None,
            })
            .collect()
    }

    #[test]
    fn move_item_shifts_items_between_positions() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_item(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        move_item(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn same_id_or_missing_target_is_ignored() {
        let snapshot = snapshot();
        let policy = CrossBoardPolicy::default();
        assert!(plan_drop(&snapshot, &DropEvent::onto("X", "X"), policy).is_noop());
        assert!(plan_drop(&snapshot, &DropEvent::new("X", None), policy).is_noop());
        assert!(plan_drop(&snapshot, &DropEvent::onto("X", "nowhere"), policy).is_noop());
        assert!(plan_drop(&snapshot, &DropEvent::onto("ghost", "Y"), policy).is_noop());
    }

    #[test]
    fn intra_board_drag_onto_last_card_rotates_sequence() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("X", "Z"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(
            plan.kind,
            DropKind::CardReorder {
                board_id: "A".to_string()
            }
        );
        assert_eq!(
            card_orders(&plan.updates),
            vec![
                ("Y".to_string(), 1),
                ("Z".to_string(), 2),
                ("X".to_string(), 3)
            ]
        );
    }

    #[test]
    fn intra_board_drag_writes_only_changed_cards() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("Y", "X"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(
            card_orders(&plan.updates),
            vec![("Y".to_string(), 1), ("X".to_string(), 2)]
        );
    }

    #[test]
    fn cross_board_drop_preserves_destination_siblings_by_default() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("X", "M"),
            CrossBoardPolicy::PreserveSiblings,
        );
        assert_eq!(
            plan.kind,
            DropKind::CardMove {
                from: "A".to_string(),
                to: "B".to_string()
            }
        );
        assert_eq!(
            plan.updates,
            vec![PlannedUpdate::Card {
                id: "X".to_string(),
                patch: CardPatch::move_to("B", 2),
            }]
        );
    }

    #[test]
    fn cross_board_drop_with_renumber_closes_both_sequences() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("X", "M"),
            CrossBoardPolicy::Renumber,
        );
        assert_eq!(
            card_orders(&plan.updates),
            vec![
                ("X".to_string(), 2),
                ("M".to_string(), 3),
                ("N".to_string(), 4),
                ("Y".to_string(), 1),
                ("Z".to_string(), 2),
            ]
        );
        let board_writes = plan
            .updates
            .iter()
            .filter(|update| {
                matches!(update, PlannedUpdate::Card { patch, .. } if patch.board_id.is_set())
            })
            .count();
        assert_eq!(board_writes, 1);
    }

    #[test]
    fn drop_on_board_appends_after_existing_cards() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("X", "B"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(
            plan.updates,
            vec![PlannedUpdate::Card {
                id: "X".to_string(),
                patch: CardPatch::move_to("B", 4),
            }]
        );

        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("X", "C"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(
            plan.updates,
            vec![PlannedUpdate::Card {
                id: "X".to_string(),
                patch: CardPatch::move_to("C", 1),
            }]
        );
    }

    #[test]
    fn board_drag_renumbers_boards() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("C", "A"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(plan.kind, DropKind::BoardReorder);
        let orders: Vec<(String, i64)> = plan
            .updates
            .iter()
            .filter_map(|update| match update {
                PlannedUpdate::Board { id, patch } => match patch.order {
                    Patch::Set(order) => Some((id.clone(), order)),
                    Patch::Keep => None,
                },
                PlannedUpdate::Card { .. } => None,
            })
            .collect();
        assert_eq!(
            orders,
            vec![
                ("C".to_string(), 1),
                ("A".to_string(), 2),
                ("B".to_string(), 3)
            ]
        );
    }

    #[test]
    fn board_dropped_on_card_is_ignored() {
        let plan = plan_drop(
            &snapshot(),
            &DropEvent::onto("A", "M"),
            CrossBoardPolicy::default(),
        );
        assert!(plan.is_noop());
        assert_eq!(plan.kind, DropKind::Ignored);
    }

    #[test]
    fn orphaned_cards_still_reorder_among_themselves() {
        let mut snapshot = snapshot();
        snapshot.cards.push(card("O1", "gone", 1));
        snapshot.cards.push(card("O2", "gone", 2));

        let plan = plan_drop(
            &snapshot,
            &DropEvent::onto("O2", "O1"),
            CrossBoardPolicy::default(),
        );
        assert_eq!(
            card_orders(&plan.updates),
            vec![("O2".to_string(), 1), ("O1".to_string(), 2)]
        );
    }
}
