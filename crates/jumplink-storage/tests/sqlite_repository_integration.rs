use std::sync::Arc;

use jumplink_core::{LinkRecord, Page, ShortCode};
use jumplink_storage::{ReadRepository, Repository, SqliteRepository, StorageError};
use jumplink_test_infra::{DatabaseConfig, TempDatabase};

struct Fixture {
    db: TempDatabase,
    repo: SqliteRepository,
}

impl Fixture {
    async fn start() -> Self {
        let db = TempDatabase::new(DatabaseConfig::builder().build()).expect("create temp dir");
        let repo = SqliteRepository::open(db.path())
            .await
            .expect("open sqlite repository");
        Self { db, repo }
    }
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

fn record(code_value: &str, url: &str) -> LinkRecord {
    LinkRecord::new(code(code_value), url)
}

#[tokio::test]
async fn open_creates_database_file() {
    let fixture = Fixture::start().await;

    assert!(fixture.db.path().exists());
    assert!(fixture.repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn insert_and_get_record() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("abc123", "https://example.com"))
        .await
        .unwrap();

    let got = fixture.repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.short_code.as_str(), "abc123");
    assert_eq!(got.long_url, "https://example.com");
    assert_eq!(got.hits, 0);
    assert!(fixture.repo.exists(&code("abc123")).await.unwrap());
}

#[tokio::test]
async fn get_returns_none_for_missing_code() {
    let fixture = Fixture::start().await;

    assert!(fixture.repo.get(&code("missing")).await.unwrap().is_none());
    assert!(!fixture.repo.exists(&code("missing")).await.unwrap());
}

#[tokio::test]
async fn insert_conflicts_when_code_already_exists() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("abc123", "https://one.example"))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(&record("abc123", "https://two.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));

    let got = fixture.repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got.long_url, "https://one.example");
}

#[tokio::test]
async fn insert_ignores_incoming_hit_count() {
    let fixture = Fixture::start().await;
    let mut link = record("abc", "https://a.example");
    link.hits = 42;

    fixture.repo.insert(&link).await.unwrap();

    let got = fixture.repo.get(&code("abc")).await.unwrap().unwrap();
    assert_eq!(got.hits, 0);
}

#[tokio::test]
async fn record_hit_increments_by_one_per_call() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("abc", "https://a.example"))
        .await
        .unwrap();

    for _ in 0..3 {
        fixture.repo.record_hit(&code("abc")).await.unwrap();
    }

    let got = fixture.repo.get(&code("abc")).await.unwrap().unwrap();
    assert_eq!(got.hits, 3);
}

#[tokio::test]
async fn record_hit_on_missing_code_is_a_no_op() {
    let fixture = Fixture::start().await;

    fixture.repo.record_hit(&code("missing")).await.unwrap();

    assert!(fixture.repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_hits_are_not_lost() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(&record("busy", "https://busy.example"))
        .await
        .unwrap();

    let repo = Arc::new(fixture.repo.clone());
    let mut handles = vec![];
    for _ in 0..10 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.record_hit(&code("busy")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let got = fixture.repo.get(&code("busy")).await.unwrap().unwrap();
    assert_eq!(got.hits, 10);
}

#[tokio::test]
async fn delete_removes_row() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("to-delete", "https://example.com"))
        .await
        .unwrap();

    assert!(fixture.repo.delete(&code("to-delete")).await.unwrap());
    assert!(fixture.repo.get(&code("to-delete")).await.unwrap().is_none());
    assert!(!fixture.repo.delete(&code("to-delete")).await.unwrap());
}

#[tokio::test]
async fn deleted_code_can_be_reused() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("again", "https://old.example"))
        .await
        .unwrap();
    fixture.repo.record_hit(&code("again")).await.unwrap();
    fixture.repo.delete(&code("again")).await.unwrap();

    fixture
        .repo
        .insert(&record("again", "https://new.example"))
        .await
        .unwrap();

    let got = fixture.repo.get(&code("again")).await.unwrap().unwrap();
    assert_eq!(got.long_url, "https://new.example");
    assert_eq!(got.hits, 0);
}

#[tokio::test]
async fn list_orders_by_insertion() {
    let fixture = Fixture::start().await;

    for (c, url) in [
        ("zeta", "https://z.example"),
        ("alpha", "https://a.example"),
        ("mid", "https://m.example"),
    ] {
        fixture.repo.insert(&record(c, url)).await.unwrap();
    }

    let codes: Vec<String> = fixture
        .repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.short_code.to_string())
        .collect();

    assert_eq!(codes, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn list_page_windows_from_newest() {
    let fixture = Fixture::start().await;

    for c in ["a", "b", "c", "d", "e"] {
        fixture
            .repo
            .insert(&record(c, &format!("https://{c}.example")))
            .await
            .unwrap();
    }

    let codes = |records: Vec<LinkRecord>| -> Vec<String> {
        records.into_iter().map(|r| r.short_code.to_string()).collect()
    };

    assert_eq!(
        codes(fixture.repo.list_page(Page::new(1, 2)).await.unwrap()),
        vec!["d", "e"]
    );
    assert_eq!(
        codes(fixture.repo.list_page(Page::new(2, 2)).await.unwrap()),
        vec!["b", "c"]
    );
    assert_eq!(
        codes(fixture.repo.list_page(Page::new(3, 2)).await.unwrap()),
        vec!["a"]
    );
    assert!(fixture
        .repo
        .list_page(Page::new(4, 2))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn reopening_keeps_schema_and_data() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(&record("abc", "https://a.example"))
        .await
        .unwrap();
    fixture.repo.record_hit(&code("abc")).await.unwrap();

    let reopened = SqliteRepository::connect(&fixture.db.database_url())
        .await
        .unwrap();

    let got = reopened.get(&code("abc")).await.unwrap().unwrap();
    assert_eq!(got.long_url, "https://a.example");
    assert_eq!(got.hits, 1);
}

#[tokio::test]
async fn urls_with_commas_and_quotes_are_stored_verbatim() {
    let fixture = Fixture::start().await;
    let url = "https://example.com/?q='a',\"b\"";

    fixture.repo.insert(&record("quoted", url)).await.unwrap();

    let got = fixture.repo.get(&code("quoted")).await.unwrap().unwrap();
    assert_eq!(got.long_url, url);
}

#[tokio::test]
async fn upper_case_rows_are_found_and_deleted() {
    use sqlx::{Connection, SqliteConnection};

    let fixture = Fixture::start().await;
    let mut conn = SqliteConnection::connect(&fixture.db.database_url())
        .await
        .unwrap();
    sqlx::query("INSERT INTO urls (long_url, short_url, hits) VALUES (?1, ?2, 4)")
        .bind("https://legacy.example")
        .bind("LegacyCode")
        .execute(&mut conn)
        .await
        .unwrap();
    conn.close().await.unwrap();

    let got = fixture.repo.get(&code("legacycode")).await.unwrap().unwrap();
    assert_eq!(got.short_code.as_str(), "legacycode");
    assert_eq!(got.long_url, "https://legacy.example");
    assert!(fixture.repo.exists(&code("legacycode")).await.unwrap());

    fixture.repo.record_hit(&code("legacycode")).await.unwrap();
    assert_eq!(
        fixture.repo.get(&code("legacycode")).await.unwrap().unwrap().hits,
        5
    );

    let listed = fixture.repo.list().await.unwrap();
    assert_eq!(listed[0].short_code.as_str(), "legacycode");

    assert!(fixture.repo.delete(&code("legacycode")).await.unwrap());
    assert!(fixture.repo.list().await.unwrap().is_empty());
}
