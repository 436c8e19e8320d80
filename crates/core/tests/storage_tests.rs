// ═══════════════════════════════════════════════════════════════════
// Storage Tests — file format, StorageManager, JSON interchange
// ═══════════════════════════════════════════════════════════════════

use forage_tracker_core::errors::CoreError;
use forage_tracker_core::models::books::Books;
use forage_tracker_core::models::category::{Category, RecordKind};
use forage_tracker_core::models::user::User;
use forage_tracker_core::storage::format::{self, CURRENT_VERSION, MAGIC, MIN_HEADER_SIZE};
use forage_tracker_core::storage::manager::StorageManager;
use forage_tracker_core::ForageTracker;

const EPS: f64 = 1e-9;

// ═══════════════════════════════════════════════════════════════════
// File format
// ═══════════════════════════════════════════════════════════════════

mod file_format {
    use super::*;

    #[test]
    fn write_then_read_round_trip() {
        let payload = b"ledger payload";
        let bytes = format::write_file(CURRENT_VERSION, payload);
        assert_eq!(&bytes[0..4], MAGIC);

        let (header, read_payload) = format::read_file(&bytes).unwrap();
        assert_eq!(header.version, CURRENT_VERSION);
        assert_eq!(header.payload_len, payload.len() as u64);
        assert_eq!(read_payload, payload);
    }

    #[test]
    fn empty_payload_is_valid() {
        let bytes = format::write_file(CURRENT_VERSION, &[]);
        assert_eq!(bytes.len(), MIN_HEADER_SIZE);
        let (header, payload) = format::read_file(&bytes).unwrap();
        assert_eq!(header.payload_len, 0);
        assert!(payload.is_empty());
    }

    #[test]
    fn too_small_file_is_rejected() {
        let err = format::read_file(b"FGBK").unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut bytes = format::write_file(CURRENT_VERSION, b"data");
        bytes[0..4].copy_from_slice(b"NOPE");
        let err = format::read_file(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }

    #[test]
    fn future_version_is_rejected() {
        let bytes = format::write_file(CURRENT_VERSION + 1, b"data");
        let err = format::read_file(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedVersion(v) if v == CURRENT_VERSION + 1));
    }

    #[test]
    fn version_zero_is_rejected() {
        let bytes = format::write_file(0, b"data");
        let err = format::read_file(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedVersion(0)));
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let bytes = format::write_file(CURRENT_VERSION, b"full payload");
        let truncated = &bytes[..bytes.len() - 3];
        let err = format::read_file(truncated).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFileFormat(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// StorageManager
// ═══════════════════════════════════════════════════════════════════

mod manager {
    use super::*;

    fn sample_books() -> Books {
        let mut books = Books::new();
        let user = User::new("Alice");
        let user_id = user.id;
        books.users.push(user);
        books.records.push(
            forage_tracker_core::models::record::LedgerRecord::new(
                user_id,
                RecordKind::Sale,
                Category::Berry,
                "blueberry",
                200.0,
                3.0,
                6.0,
            ),
        );
        books.prices.upsert(Category::Mushroom, "porcini", 2024, 8.0, 14.0);
        books
    }

    #[test]
    fn round_trip_empty_books() {
        let books = Books::new();
        let bytes = StorageManager::save_to_bytes(&books).unwrap();
        let loaded = StorageManager::load_from_bytes(&bytes).unwrap();
        assert!(loaded.users.is_empty());
        assert!(loaded.records.is_empty());
        assert!(loaded.prices.is_empty());
    }

    #[test]
    fn round_trip_preserves_contents() {
        let books = sample_books();
        let bytes = StorageManager::save_to_bytes(&books).unwrap();
        let loaded = StorageManager::load_from_bytes(&bytes).unwrap();

        assert_eq!(loaded.users.len(), 1);
        assert_eq!(loaded.users[0].alias, "Alice");
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0], books.records[0]);
        assert_eq!(loaded.prices.len(), 1);
        assert_eq!(loaded.prices.entries[0].species, "porcini");
    }

    #[test]
    fn garbage_payload_is_a_deserialization_error() {
        let bytes = format::write_file(CURRENT_VERSION, &[0xFF; 32]);
        let err = StorageManager::load_from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.fgbk");
        let path_str = path.to_str().unwrap();

        let books = sample_books();
        StorageManager::save_to_file(&books, path_str).unwrap();
        let loaded = StorageManager::load_from_file(path_str).unwrap();
        assert_eq!(loaded.records.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StorageManager::load_from_file("/nonexistent/books.fgbk").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Facade snapshots
// ═══════════════════════════════════════════════════════════════════

mod facade_snapshots {
    use super::*;

    #[test]
    fn save_and_reload_a_tracker() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();
        tracker
            .record_purchase(alice, Category::Berry, "blueberry", 500.0, 3.0, None, None)
            .unwrap();
        tracker
            .upsert_price(Category::Berry, "blueberry", 2024, 3.0, 6.0)
            .unwrap();

        let bytes = tracker.save_to_bytes().unwrap();
        assert!(!tracker.has_unsaved_changes());

        let reloaded = ForageTracker::load_from_bytes(&bytes).unwrap();
        assert!(!reloaded.has_unsaved_changes());
        assert_eq!(reloaded.user_count(), 1);
        assert_eq!(reloaded.record_count(), 1);
        assert_eq!(reloaded.price_count(), 1);
        assert_eq!(reloaded.find_user_by_alias("Alice").unwrap().id, alice);
    }

    #[test]
    fn file_round_trip_through_facade() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.fgbk");
        let path_str = path.to_str().unwrap();

        let mut tracker = ForageTracker::create_new();
        tracker.create_user("Alice").unwrap();
        tracker.save_to_file(path_str).unwrap();
        assert!(!tracker.has_unsaved_changes());

        let reloaded = ForageTracker::load_from_file(path_str).unwrap();
        assert_eq!(reloaded.user_count(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// JSON export / import
// ═══════════════════════════════════════════════════════════════════

mod json_interchange {
    use super::*;

    #[test]
    fn export_then_import_restores_records() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();
        let id = tracker
            .record_sale(alice, Category::Berry, "blueberry", 200.0, 3.0, 6.0, None, None)
            .unwrap();

        let json = tracker.export_records_to_json().unwrap();
        assert!(tracker.delete_record(id));
        assert_eq!(tracker.record_count(), 0);

        let count = tracker.import_records_from_json(&json).unwrap();
        assert_eq!(count, 1);
        let records = tracker.list_records_for_user(alice, None);
        assert!((records[0].total_profit - 0.6).abs() < EPS);
    }

    #[test]
    fn import_for_unknown_user_is_rejected() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();
        tracker
            .record_sale(alice, Category::Berry, "blueberry", 200.0, 3.0, 6.0, None, None)
            .unwrap();
        let json = tracker.export_records_to_json().unwrap();

        let mut other = ForageTracker::create_new();
        let err = other.import_records_from_json(&json).unwrap_err();
        assert!(matches!(err, CoreError::UserNotFound(_)));
        assert_eq!(other.record_count(), 0);
    }

    #[test]
    fn import_recomputes_totals_and_counts() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();

        let json = format!(
            r#"[{{
                "user_id": "{alice}",
                "category": "berry",
                "species": "blueberry",
                "quantity": 200.0,
                "buy_price": 3.0,
                "sell_price": 6.0,
                "kind": "Sale"
            }}]"#
        );
        let count = tracker.import_records_from_json(&json).unwrap();
        assert_eq!(count, 1);

        let records = tracker.list_records_for_user(alice, None);
        assert_eq!(records.len(), 1);
        assert!((records[0].total_revenue - 1.2).abs() < EPS);
        assert!((records[0].total_profit - 0.6).abs() < EPS);
    }

    #[test]
    fn legacy_records_without_kind_are_classified_by_price_convention() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();

        // Old exports: no kind, sell price under its legacy alias.
        let json = format!(
            r#"[
                {{
                    "user_id": "{alice}",
                    "category": "berry",
                    "species": "blueberry",
                    "quantity": 500.0,
                    "buy_price": 3.0
                }},
                {{
                    "user_id": "{alice}",
                    "category": "berry",
                    "species": "blueberry",
                    "quantity": 200.0,
                    "buy_price": 3.0,
                    "unitPrice": 6.0
                }}
            ]"#
        );
        let count = tracker.import_records_from_json(&json).unwrap();
        assert_eq!(count, 2);

        let records = tracker.list_records_for_user(alice, None);
        let purchase = records.iter().find(|r| r.kind == RecordKind::Purchase).unwrap();
        let sale = records.iter().find(|r| r.kind == RecordKind::Sale).unwrap();
        assert!((purchase.quantity - 500.0).abs() < EPS);
        assert!((sale.total_profit - 0.6).abs() < EPS);
    }

    #[test]
    fn invalid_batch_imports_nothing() {
        let mut tracker = ForageTracker::create_new();
        let alice = tracker.create_user("Alice").unwrap();

        // Second record has a non-positive quantity; the whole batch rolls back.
        let json = format!(
            r#"[
                {{
                    "user_id": "{alice}",
                    "category": "berry",
                    "species": "blueberry",
                    "quantity": 500.0,
                    "buy_price": 3.0
                }},
                {{
                    "user_id": "{alice}",
                    "category": "berry",
                    "species": "blueberry",
                    "quantity": 0.0,
                    "buy_price": 3.0
                }}
            ]"#
        );
        assert!(tracker.import_records_from_json(&json).is_err());
        assert_eq!(tracker.record_count(), 0);
    }

    #[test]
    fn to_json_contains_the_whole_books() {
        let mut tracker = ForageTracker::create_new();
        tracker.create_user("Alice").unwrap();
        tracker
            .upsert_price(Category::Mushroom, "porcini", 2024, 8.0, 14.0)
            .unwrap();
        let json = tracker.to_json().unwrap();
        assert!(json.contains("Alice"));
        assert!(json.contains("porcini"));
    }
}
