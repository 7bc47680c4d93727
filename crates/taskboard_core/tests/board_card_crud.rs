use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskboard_core::db::open_db_in_memory;
use taskboard_core::repo::kv_store::{load_collection, save_collection};
use taskboard_core::{
    Board, BoardPatch, BoardRepository, Card, CardPatch, CardRepository, Collection, EntityKind,
    Frequency, KeyValueStore, KvBoardRepository, KvCardRepository, MemoryKeyValueStore, NewBoard,
    NewCard, Patch, RepoError, SqliteKeyValueStore,
};

trait Record {
    fn id(&self) -> &str;
}

impl Record for Board {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

fn long_ago() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

/// Rewrites one stored record in place and returns it.
fn backdate<T>(
    store: &impl KeyValueStore,
    collection: Collection,
    id: &str,
    change: impl FnOnce(&mut T),
) -> T
where
    T: Record + Clone + Serialize + DeserializeOwned,
{
    let mut records: Vec<T> = load_collection(store, collection).unwrap();
    let record = records.iter_mut().find(|record| record.id() == id).unwrap();
    change(record);
    let changed = record.clone();
    save_collection(store, collection, &records).unwrap();
    changed
}

#[test]
fn soft_deleted_board_stays_in_raw_storage() {
    let store = MemoryKeyValueStore::new();
    let repo = KvBoardRepository::new(&store);

    let keep = repo.create(NewBoard::titled("Keep")).unwrap();
    let drop = repo.create(NewBoard::titled("Drop")).unwrap();
    let drop = backdate::<Board>(&store, Collection::Boards, &drop.id, |board| {
        board.created_at = long_ago();
        board.updated_at = long_ago();
    });
    repo.soft_delete(&drop.id).unwrap();

    let active = repo.list_active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, keep.id);
    assert!(repo.get(&drop.id, false).unwrap().is_none());

    let raw = repo.get(&drop.id, true).unwrap().unwrap();
    assert!(raw.is_deleted);
    assert!(raw.updated_at > drop.updated_at);
    assert_eq!(raw.created_at, drop.created_at);
    assert_eq!(repo.list_all().unwrap().len(), 2);
}

#[test]
fn soft_deleted_card_stays_in_raw_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let repo = KvCardRepository::new(&store);

    let card = repo.create(NewCard::new("b1", "Meditate")).unwrap();
    let card = backdate::<Card>(&store, Collection::Cards, &card.id, |card| {
        card.created_at = long_ago();
        card.updated_at = long_ago();
    });
    repo.soft_delete(&card.id).unwrap();
    repo.soft_delete(&card.id).unwrap();

    assert!(repo.list_active().unwrap().is_empty());
    let raw = repo.get(&card.id, true).unwrap().unwrap();
    assert!(raw.is_deleted);
    assert!(raw.updated_at > card.updated_at);
    assert_eq!(raw.created_at, card.created_at);
}

#[test]
fn create_without_order_appends_to_active_count() {
    let store = MemoryKeyValueStore::new();
    let boards = KvBoardRepository::new(&store);
    let cards = KvCardRepository::new(&store);

    let first = boards.create(NewBoard::titled("One")).unwrap();
    let deleted = boards.create(NewBoard::titled("Two")).unwrap();
    boards.soft_delete(&deleted.id).unwrap();
    let third = boards.create(NewBoard::titled("Three")).unwrap();
    assert_eq!(first.order, 0);
    assert_eq!(third.order, 1);

    let explicit = boards
        .create(NewBoard {
            order: Some(10),
            ..NewBoard::titled("Pinned")
        })
        .unwrap();
    assert_eq!(explicit.order, 10);

    cards.create(NewCard::new(&first.id, "a")).unwrap();
    cards.create(NewCard::new(&first.id, "b")).unwrap();
    let c = cards.create(NewCard::new(&first.id, "c")).unwrap();
    assert_eq!(c.order, 2);
}

#[test]
fn update_missing_ids_return_not_found() {
    let store = MemoryKeyValueStore::new();
    let boards = KvBoardRepository::new(&store);
    let cards = KvCardRepository::new(&store);

    let err = boards.update("nope", BoardPatch::order(1)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { entity: EntityKind::Board, ref id } if id == "nope"
    ));

    let err = cards.soft_delete("nope").unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Card,
            ..
        }
    ));
    assert_eq!(err.code(), "not_found");
}

#[test]
fn card_update_merges_only_set_fields_and_can_clear_optionals() {
    let store = MemoryKeyValueStore::new();
    let repo = KvCardRepository::new(&store);

    let due = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
    let card = repo
        .create(NewCard {
            description: Some("psychology".to_string()),
            due_date: Some(due),
            frequency: Some(Frequency::Weekly),
            labels: vec!["Study".to_string()],
            ..NewCard::new("b1", "Read 20 pages")
        })
        .unwrap();
    assert_eq!(card.labels, vec!["study"]);

    let updated = repo
        .update(
            &card.id,
            CardPatch {
                content: Patch::Set("Read 30 pages".to_string()),
                due_date: Patch::Set(None),
                ..CardPatch::default()
            },
        )
        .unwrap();

    assert_eq!(updated.content, "Read 30 pages");
    assert_eq!(updated.due_date, None);
    assert_eq!(updated.description.as_deref(), Some("psychology"));
    assert_eq!(updated.frequency, Some(Frequency::Weekly));
    assert_eq!(updated.labels, vec!["study"]);
    assert_eq!(updated.created_at, card.created_at);
    assert!(updated.updated_at >= card.updated_at);

    let stored = repo.get(&card.id, false).unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn updating_card_content_to_blank_is_rejected_without_write() {
    let store = MemoryKeyValueStore::new();
    let repo = KvCardRepository::new(&store);
    let card = repo.create(NewCard::new("b1", "Walk")).unwrap();

    let err = repo
        .update(
            &card.id,
            CardPatch {
                content: Patch::Set("  ".to_string()),
                ..CardPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.get(&card.id, false).unwrap().unwrap().content, "Walk");
}

#[test]
fn deleting_board_does_not_touch_its_cards() {
    let store = MemoryKeyValueStore::new();
    let boards = KvBoardRepository::new(&store);
    let cards = KvCardRepository::new(&store);

    let board = boards.create(NewBoard::titled("Gym")).unwrap();
    let card = cards.create(NewCard::new(&board.id, "Squats")).unwrap();
    boards.soft_delete(&board.id).unwrap();

    let stored = cards.get(&card.id, false).unwrap().unwrap();
    assert_eq!(stored, card);
}

#[test]
fn stored_records_from_older_layout_are_read_tolerantly() {
    let store = MemoryKeyValueStore::new();
    store
        .set(
            "cards",
            r#"[{"id":"c1","boardId":"b1","content":"Old","order":1,
                 "dueDate":"2024-12-31T00:00:00.000Z","isArchived":false}]"#,
        )
        .unwrap();

    let repo = KvCardRepository::new(&store);
    let cards = repo.list_active().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].due_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    assert!(cards[0].labels.is_empty());

    repo.update("c1", CardPatch::completed(true)).unwrap();
    let raw = store.get("cards").unwrap().unwrap();
    assert!(!raw.contains("isArchived"));
    assert!(raw.contains("\"dueDate\":\"2024-12-31\""));
}
