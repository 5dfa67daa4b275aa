//! Tests for VideogameService
//!
//! These tests verify:
//! - CRUD semantics (upsert update, boolean delete, not-found as a value)
//! - Id assignment and uniqueness
//! - Persistence after every mutation and reload on restart
//! - Rollback when the document cannot be written
//! - Concurrent access through the single lock

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;

use gamevault::protocol::{Command, Reply};
use gamevault::{Config, IdStrategy, VaultError, Videogame, VideogameService};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_service() -> (TempDir, VideogameService) {
    let temp_dir = TempDir::new().unwrap();
    let service = open_in(&temp_dir);
    (temp_dir, service)
}

fn open_in(temp_dir: &TempDir) -> VideogameService {
    let config = Config::builder()
        .document_path(temp_dir.path().join("videogames.json"))
        .build();
    VideogameService::open(config).unwrap()
}

fn titled(title: &str) -> Videogame {
    Videogame::default().with_field("title", title)
}

fn ids(records: &[Videogame]) -> Vec<i64> {
    records.iter().map(|r| r.id).collect()
}

// =============================================================================
// Example Scenarios
// =============================================================================

#[test]
fn test_create_on_empty_store() {
    let (_temp, service) = setup_temp_service();

    let created = service.create(titled("Chess")).unwrap();

    assert_ne!(created.id, 0);
    assert_eq!(created.field("title").unwrap(), "Chess");
    assert_eq!(service.list(), vec![created]);
}

#[test]
fn test_update_existing_replaces_record() {
    let (_temp, service) = setup_temp_service();
    service
        .update(Videogame::new(5).with_field("title", "Go"))
        .unwrap();

    service
        .update(Videogame::new(5).with_field("title", "Go2"))
        .unwrap();

    let fetched = service.get(5).unwrap();
    assert_eq!(fetched, Videogame::new(5).with_field("title", "Go2"));
    assert_eq!(service.len(), 1);
}

#[test]
fn test_delete_on_empty_store() {
    let (_temp, service) = setup_temp_service();

    assert!(!service.delete(99).unwrap());
    assert!(service.list().is_empty());
}

#[test]
fn test_delete_one_of_two() {
    let (_temp, service) = setup_temp_service();
    service.update(Videogame::new(1)).unwrap();
    service.update(Videogame::new(2)).unwrap();

    assert!(service.delete(1).unwrap());
    assert_eq!(service.list(), vec![Videogame::new(2)]);
}

// =============================================================================
// CRUD Semantics Tests
// =============================================================================

#[test]
fn test_get_missing_is_none() {
    let (_temp, service) = setup_temp_service();

    assert!(service.get(12345).is_none());
}

#[test]
fn test_get_after_create_matches_input_except_id() {
    let (_temp, service) = setup_temp_service();
    let input = titled("Zelda").with_field("platform", "NES");

    let created = service.create(input.clone()).unwrap();

    let fetched = service.get(created.id).unwrap();
    assert_eq!(fetched.fields, input.fields);
    assert_eq!(fetched.id, created.id);
}

#[test]
fn test_create_ignores_supplied_id() {
    let (_temp, service) = setup_temp_service();

    let created = service.create(titled("Doom").with_id(777)).unwrap();

    assert_ne!(created.id, 777);
    assert!(service.get(777).is_none());
}

#[test]
fn test_delete_returns_true_once() {
    let (_temp, service) = setup_temp_service();
    let created = service.create(titled("Pong")).unwrap();

    assert!(service.delete(created.id).unwrap());
    assert!(!service.delete(created.id).unwrap());
    assert!(!service.delete(created.id).unwrap());
}

#[test]
fn test_update_missing_inserts() {
    let (_temp, service) = setup_temp_service();
    let record = Videogame::new(42).with_field("title", "Upserted");

    let stored = service.update(record.clone()).unwrap();

    assert_eq!(stored, record);
    assert_eq!(service.get(42), Some(record));
}

#[test]
fn test_update_moves_record_to_end() {
    let (_temp, service) = setup_temp_service();
    service.update(Videogame::new(1)).unwrap();
    service.update(Videogame::new(2)).unwrap();
    service.update(Videogame::new(3)).unwrap();

    service.update(Videogame::new(1).with_field("title", "again")).unwrap();

    assert_eq!(ids(&service.list()), vec![2, 3, 1]);
}

#[test]
fn test_list_has_no_duplicate_ids_after_mixed_operations() {
    let (_temp, service) = setup_temp_service();
    let a = service.create(titled("A")).unwrap();
    let b = service.create(titled("B")).unwrap();
    service.update(a.clone().with_field("title", "A2")).unwrap();
    service.update(a.clone().with_field("title", "A3")).unwrap();
    service.update(Videogame::new(500)).unwrap();
    service.delete(b.id).unwrap();
    let c = service.create(titled("C")).unwrap();

    let listed = ids(&service.list());
    let unique: HashSet<i64> = listed.iter().copied().collect();
    assert_eq!(unique.len(), listed.len());
    assert_eq!(listed, vec![a.id, 500, c.id]);
}

#[test]
fn test_create_after_upsert_of_large_id_does_not_collide() {
    let (_temp, service) = setup_temp_service();
    service.update(Videogame::new(1000)).unwrap();

    let created = service.create(titled("next")).unwrap();

    assert!(created.id > 1000);
}

#[test]
fn test_rapid_creates_have_unique_ids() {
    let (_temp, service) = setup_temp_service();

    let created: Vec<i64> = (0..50)
        .map(|i| service.create(titled(&format!("g{}", i))).unwrap().id)
        .collect();

    let unique: HashSet<i64> = created.iter().copied().collect();
    assert_eq!(unique.len(), 50);
}

#[test]
fn test_clock_strategy_rapid_creates_have_unique_ids() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .document_path(temp_dir.path().join("videogames.json"))
        .id_strategy(IdStrategy::Clock)
        .build();
    let service = VideogameService::open(config).unwrap();

    let created: Vec<i64> = (0..20)
        .map(|_| service.create(titled("same second")).unwrap().id)
        .collect();

    let unique: HashSet<i64> = created.iter().copied().collect();
    assert_eq!(unique.len(), 20);
    assert!(created[0] > 1_600_000_000);
}

#[test]
fn test_create_fails_cleanly_when_ids_are_exhausted() {
    let (temp, service) = setup_temp_service();
    let top = service.update(Videogame::new(i64::MAX).with_field("title", "last")).unwrap();

    let result = service.create(titled("one too many"));

    assert!(matches!(result, Err(VaultError::IdsExhausted)));
    assert_eq!(service.list(), vec![top.clone()]);
    assert_eq!(open_in(&temp).list(), vec![top]);

    // The store stays usable afterwards
    assert!(service.get(i64::MAX).is_some());
    service.update(Videogame::new(5)).unwrap();
    assert!(service.delete(i64::MAX).unwrap());
    assert_eq!(ids(&service.list()), vec![5]);
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_every_mutation_is_persisted() {
    let (temp, service) = setup_temp_service();
    let path = temp.path().join("videogames.json");
    assert!(!path.exists());

    let created = service.create(titled("A")).unwrap();
    assert_eq!(open_in(&temp).list(), vec![created.clone()]);

    let updated = created.clone().with_field("title", "B");
    service.update(updated.clone()).unwrap();
    assert_eq!(open_in(&temp).list(), vec![updated]);

    service.delete(created.id).unwrap();
    assert!(open_in(&temp).list().is_empty());
}

#[test]
fn test_delete_of_missing_id_still_writes_document() {
    let (temp, service) = setup_temp_service();
    let path = temp.path().join("videogames.json");

    service.delete(1).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
}

#[test]
fn test_restart_reloads_identical_store() {
    let temp_dir = TempDir::new().unwrap();
    let before = {
        let service = open_in(&temp_dir);
        service.create(titled("A")).unwrap();
        let b = service.create(titled("B")).unwrap();
        service.update(Videogame::new(9).with_field("title", "Nine")).unwrap();
        service.delete(b.id).unwrap();
        service.create(titled("C")).unwrap();
        service.list()
    };

    let reopened = open_in(&temp_dir);

    assert_eq!(reopened.list(), before);
}

#[test]
fn test_restart_continues_ids_after_max() {
    let temp_dir = TempDir::new().unwrap();
    {
        let service = open_in(&temp_dir);
        service.update(Videogame::new(30)).unwrap();
    }

    let reopened = open_in(&temp_dir);
    let created = reopened.create(titled("after restart")).unwrap();

    assert_eq!(created.id, 31);
}

#[test]
fn test_open_with_corrupt_document_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("videogames.json"), "not json at all").unwrap();

    let service = open_in(&temp_dir);
    assert!(service.is_empty());

    let created = service.create(titled("fresh")).unwrap();
    assert_eq!(open_in(&temp_dir).list(), vec![created]);
}

#[test]
fn test_open_with_empty_path_is_config_error() {
    let config = Config::builder().document_path("").build();

    let result = VideogameService::open(config);

    assert!(matches!(result, Err(VaultError::Config(_))));
}

#[test]
fn test_id_given_as_field_round_trips_through_restart() {
    let temp_dir = TempDir::new().unwrap();
    let before = {
        let service = open_in(&temp_dir);
        let record = Videogame::default().with_field("id", 5).with_field("title", "x");
        assert_eq!(record.id, 5);
        service.update(record).unwrap();
        service.create(Videogame::default().with_field("id", 77).with_field("title", "y")).unwrap();
        service.list()
    };

    let reopened = open_in(&temp_dir);

    assert_eq!(reopened.list(), before);
    assert_eq!(reopened.get(5).unwrap().field("title").unwrap(), "x");
}

#[test]
fn test_id_key_inserted_into_fields_is_dropped() {
    let temp_dir = TempDir::new().unwrap();
    let service = open_in(&temp_dir);

    let mut updated = Videogame::new(3).with_field("title", "upd");
    updated.fields.insert("id".to_string(), 99.into());
    let updated = service.update(updated).unwrap();

    let mut created = titled("new");
    created.fields.insert("id".to_string(), "bogus".into());
    let created = service.create(created).unwrap();

    assert_eq!(updated.id, 3);
    assert!(updated.field("id").is_none());
    assert!(created.field("id").is_none());

    let document = fs::read_to_string(temp_dir.path().join("videogames.json")).unwrap();
    assert_eq!(document.matches("\"id\"").count(), 2);
    assert_eq!(open_in(&temp_dir).list(), vec![updated, created]);
}

// =============================================================================
// Persist Failure Tests
// =============================================================================

/// A document path that is an existing directory cannot be renamed over.
fn setup_unwritable_service() -> (TempDir, VideogameService) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("blocked");
    fs::create_dir(&path).unwrap();
    let service = VideogameService::open_path(&path).unwrap();
    (temp_dir, service)
}

#[test]
fn test_create_persist_failure_is_reported_and_rolled_back() {
    let (_temp, service) = setup_unwritable_service();

    let result = service.create(titled("lost"));

    assert!(matches!(result, Err(VaultError::Persist(_))));
    assert!(service.list().is_empty());
}

#[test]
fn test_update_persist_failure_restores_previous_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("videogames.json");
    let service = VideogameService::open_path(&path).unwrap();
    let original = Videogame::new(1).with_field("title", "kept");
    service.update(original.clone()).unwrap();

    // Swap the document for a directory so the next persist fails
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let result = service.update(Videogame::new(1).with_field("title", "dropped"));

    assert!(matches!(result, Err(VaultError::Persist(_))));
    assert_eq!(service.list(), vec![original]);
}

#[test]
fn test_delete_persist_failure_keeps_record() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("videogames.json");
    let service = VideogameService::open_path(&path).unwrap();
    service.update(Videogame::new(3)).unwrap();

    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    assert!(matches!(service.delete(3), Err(VaultError::Persist(_))));
    assert!(service.get(3).is_some());
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_routes_commands() {
    let (_temp, service) = setup_temp_service();

    let created = match service
        .execute(Command::Create { record: titled("via execute") })
        .unwrap()
    {
        Reply::Record(Some(record)) => record,
        other => panic!("Expected created record, got {:?}", other),
    };

    assert_eq!(
        service.execute(Command::Get { id: created.id }).unwrap(),
        Reply::Record(Some(created.clone()))
    );
    assert_eq!(
        service.execute(Command::List).unwrap(),
        Reply::Records(vec![created.clone()])
    );
    assert_eq!(
        service.execute(Command::Delete { id: created.id }).unwrap(),
        Reply::Deleted(true)
    );
    assert_eq!(
        service.execute(Command::Get { id: created.id }).unwrap(),
        Reply::Record(None)
    );
    assert_eq!(service.execute(Command::Ping).unwrap(), Reply::Pong);
}

#[test]
fn test_execute_lookup_matches_service_name() {
    let (_temp, service) = setup_temp_service();

    assert_eq!(
        service
            .execute(Command::Lookup { service: "VideogameService".to_string() })
            .unwrap(),
        Reply::Bound(true)
    );
    assert_eq!(
        service
            .execute(Command::Lookup { service: "Other".to_string() })
            .unwrap(),
        Reply::Bound(false)
    );
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_creates_get_unique_ids() {
    let temp_dir = TempDir::new().unwrap();
    let service = Arc::new(open_in(&temp_dir));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..25)
                    .map(|i| service.create(titled(&format!("t{}-{}", t, i))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let all: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<i64> = all.iter().copied().collect();

    assert_eq!(all.len(), 200);
    assert_eq!(unique.len(), 200);
    assert_eq!(service.len(), 200);
    assert_eq!(open_in(&temp_dir).list(), service.list());
}

#[test]
fn test_concurrent_mixed_operations_keep_document_consistent() {
    let temp_dir = TempDir::new().unwrap();
    let service = Arc::new(open_in(&temp_dir));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for i in 0..20 {
                    let id = (t * 100 + i) as i64;
                    service.update(Videogame::new(id)).unwrap();
                    if i % 2 == 0 {
                        service.delete(id).unwrap();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.len(), 40);
    assert_eq!(open_in(&temp_dir).list(), service.list());
}
