//! Import pipeline integration tests
//!
//! Exercises `import_guest_list` directly against an in-memory database,
//! with a local stub standing in for the extraction service where the
//! fallback path is under test.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use tableo_gi::db;
use tableo_gi::models::Event;
use tableo_gi::services::importer::{import_guest_list, FileUpload, ImportError, MAX_BATCH_SIZE};
use tableo_gi::services::{ExtractionClient, ExtractionConfig};

async fn test_pool_with_event(event_date: &str) -> (SqlitePool, Uuid) {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.unwrap();
    tableo_common::db::init_tables(&pool).await.unwrap();

    let event = Event {
        id: Uuid::new_v4(),
        name: "Test".to_string(),
        event_date: NaiveDate::parse_from_str(event_date, "%Y-%m-%d").unwrap(),
    };
    db::events::save_event(&pool, &event).await.unwrap();

    (pool, event.id)
}

fn unroutable_extractor() -> ExtractionClient {
    ExtractionClient::new(ExtractionConfig {
        api_key: "test-key".to_string(),
        base_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        model: "test-model".to_string(),
    })
    .unwrap()
}

/// Spawn a chat-completions stub returning a fixed message content,
/// returning an ExtractionClient pointed at it
async fn stub_extractor(message_content: Value) -> ExtractionClient {
    async fn handler(State(content): State<Value>) -> Json<Value> {
        Json(json!({
            "choices": [ { "message": { "content": content.to_string() } } ]
        }))
    }

    let app = Router::new()
        .route("/v1/chat/completions", post(handler))
        .with_state(message_content);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ExtractionClient::new(ExtractionConfig {
        api_key: "test-key".to_string(),
        base_url: format!("http://{}/v1/chat/completions", addr),
        model: "test-model".to_string(),
    })
    .unwrap()
}

fn csv_upload(content: String) -> FileUpload {
    FileUpload {
        filename: "guests.csv".to_string(),
        bytes: content.into_bytes(),
    }
}

#[tokio::test]
async fn test_twelve_hundred_guests_import_fully() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    // 1200 guests arrive through the fallback path (a 1200-line file is
    // over the local-parse caps anyway) and persist as chunks of at most
    // MAX_BATCH_SIZE: 500, 500, 200
    let guests: Vec<Value> = (0..1200)
        .map(|i| json!({ "guest_name": format!("Invité {}", i), "table_number": (i % 40).to_string() }))
        .collect();
    let extractor = stub_extractor(json!({ "guests": guests })).await;

    let upload = FileUpload {
        filename: "notes.txt".to_string(),
        bytes: b"scan of a large seating chart".to_vec(),
    };

    let inserted = import_guest_list(&pool, &extractor, event_id, &upload).await.unwrap();

    assert_eq!(inserted, 1200);
    assert_eq!(1200_usize.div_ceil(MAX_BATCH_SIZE), 3);
    assert_eq!(db::guests::count_guests(&pool, event_id).await.unwrap(), 1200);
}

#[tokio::test]
async fn test_batch_failure_reports_inserted_count() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    // Poison one row of the second chunk: the whole statement aborts, the
    // first chunk stays committed
    sqlx::query(
        r#"
        CREATE TRIGGER poison_row BEFORE INSERT ON guests
        WHEN NEW.guest_name = 'Invité 600'
        BEGIN
            SELECT RAISE(ABORT, 'poisoned row');
        END
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let mut content = String::from("Nom;Table\n");
    for i in 0..700 {
        content.push_str(&format!("Invité {};{}\n", i, i % 40));
    }

    let result = import_guest_list(
        &pool,
        &unroutable_extractor(),
        event_id,
        &csv_upload(content),
    )
    .await;

    match result {
        Err(ImportError::Persistence { inserted, .. }) => assert_eq!(inserted, 500),
        other => panic!("expected Persistence error, got {:?}", other.map(|_| ())),
    }

    // Exactly the first chunk is durable; no rollback, no later chunks
    assert_eq!(db::guests::count_guests(&pool, event_id).await.unwrap(), 500);
}

#[tokio::test]
async fn test_duplicate_numbering_against_persisted_names() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    for name in ["Alice", "Alice 3"] {
        db::guests::insert_guest(
            &pool,
            event_id,
            &tableo_gi::models::NormalizedGuest {
                guest_name: name.to_string(),
                table_number: "1".to_string(),
                seat_number: None,
            },
        )
        .await
        .unwrap();
    }

    let inserted = import_guest_list(
        &pool,
        &unroutable_extractor(),
        event_id,
        &csv_upload("Nom,Table\nAlice,2".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(inserted, 1);

    let names = db::guests::load_guest_names(&pool, event_id).await.unwrap();
    assert!(names.contains(&"Alice 4".to_string()), "names: {:?}", names);
}

#[tokio::test]
async fn test_oversize_file_skips_local_parser() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    // Well-formed delimited text, but over the 50 KB simple-file cap: the
    // local parser must not run, and the unroutable extractor fails
    let mut content = String::from("Nom,Table\n");
    let filler = "x".repeat(60);
    for i in 0..900 {
        content.push_str(&format!("Invité {} {},{}\n", filler, i, i % 40));
    }
    assert!(content.len() > 50_000);

    let result = import_guest_list(
        &pool,
        &unroutable_extractor(),
        event_id,
        &csv_upload(content),
    )
    .await;

    assert!(matches!(result, Err(ImportError::Extraction(_))));
    assert_eq!(db::guests::count_guests(&pool, event_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_fallback_extraction_end_to_end() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    // Free-form notes: no delimiter, locally unparseable
    let upload = FileUpload {
        filename: "notes.txt".to_string(),
        bytes: b"Alice is seated at the head table\nBob sits at table two".to_vec(),
    };

    // Stub answers under an alternate key with loose field names
    let extractor = stub_extractor(json!({
        "invites": [
            { "name": "Alice", "table": "Head table", "seat": 1 },
            { "guest_name": "Bob", "table_number": 2 }
        ]
    }))
    .await;

    let inserted = import_guest_list(&pool, &extractor, event_id, &upload).await.unwrap();
    assert_eq!(inserted, 2);

    let guests = db::guests::list_guests(&pool, event_id).await.unwrap();
    let alice = guests.iter().find(|g| g.guest_name == "Alice").unwrap();
    assert_eq!(alice.table_number, "Head table");
    assert_eq!(alice.seat_number, Some("1".to_string()));

    let bob = guests.iter().find(|g| g.guest_name == "Bob").unwrap();
    assert_eq!(bob.table_number, "2");
    assert_eq!(bob.seat_number, None);
}

#[tokio::test]
async fn test_extraction_response_without_guest_array_is_terminal() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    let upload = FileUpload {
        filename: "notes.txt".to_string(),
        bytes: b"unstructured notes with no tables".to_vec(),
    };

    // Valid JSON, but no accepted array key anywhere
    let extractor = stub_extractor(json!({ "message": "could not find any guests" })).await;

    let result = import_guest_list(&pool, &extractor, event_id, &upload).await;

    // Never a silent zero-guest success
    assert!(matches!(result, Err(ImportError::Extraction(_))));
    assert_eq!(db::guests::count_guests(&pool, event_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_extraction_dropped_rows_yield_empty_result_error() {
    let (pool, event_id) = test_pool_with_event("2999-06-20").await;

    let upload = FileUpload {
        filename: "notes.txt".to_string(),
        bytes: b"free text".to_vec(),
    };

    // Usable array, but every tuple is missing a required field: the
    // normalizer drops them all, which is a distinct error from a failed
    // extraction
    let extractor = stub_extractor(json!({
        "guests": [ { "name": "Alice" }, { "table": "2" } ]
    }))
    .await;

    let result = import_guest_list(&pool, &extractor, event_id, &upload).await;
    assert!(matches!(result, Err(ImportError::NoGuestsFound)));
}

#[tokio::test]
async fn test_closed_event_window_rejected_before_parsing() {
    let (pool, event_id) = test_pool_with_event("2020-01-01").await;

    let result = import_guest_list(
        &pool,
        &unroutable_extractor(),
        event_id,
        &csv_upload("Nom,Table\nAlice,1".to_string()),
    )
    .await;

    assert!(matches!(result, Err(ImportError::WindowClosed)));
}
