//! History Repository Tests
//! 历史记录仓库测试

use ck_core::ports::HistoryStorePort;
use ck_core::RecordId;
use ck_infra::db::mappers::ClipRecordRowMapper;
use ck_infra::db::pool::init_db_pool;
use ck_infra::db::repositories::DieselHistoryRepository;
use ck_infra::db::DieselSqliteExecutor;
use tempfile::TempDir;

type Repo = DieselHistoryRepository<DieselSqliteExecutor, ClipRecordRowMapper, ClipRecordRowMapper>;

/// File-backed database; every pooled connection must see the same data.
fn new_repo() -> (TempDir, Repo) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("history.db");
    let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("Failed to create test DB pool");
    let repo = DieselHistoryRepository::new(
        DieselSqliteExecutor::new(pool),
        ClipRecordRowMapper,
        ClipRecordRowMapper,
    );
    (dir, repo)
}

#[tokio::test]
async fn test_insert_twice_returns_same_id() {
    let (_dir, repo) = new_repo();

    let first = repo.insert_or_get_existing("hello", 1_000).await.unwrap();
    let second = repo.insert_or_get_existing("hello", 2_000).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(repo.count().await.unwrap(), 1);

    let stored = repo.get(&first).await.unwrap().expect("record exists");
    assert_eq!(stored.captured_at_ms(), 1_000);
    assert_eq!(stored.length(), 5);
}

#[tokio::test]
async fn test_empty_content_is_rejected() {
    let (_dir, repo) = new_repo();

    assert!(repo.insert_or_get_existing("", 1).await.is_err());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_query_all_is_newest_first() {
    let (_dir, repo) = new_repo();

    repo.insert_or_get_existing("oldest", 10).await.unwrap();
    repo.insert_or_get_existing("newest", 30).await.unwrap();
    repo.insert_or_get_existing("middle", 20).await.unwrap();

    let contents: Vec<String> = repo
        .query_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.content().to_string())
        .collect();
    assert_eq!(contents, vec!["newest", "middle", "oldest"]);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_literal() {
    let (_dir, repo) = new_repo();

    repo.insert_or_get_existing("Hello World", 1).await.unwrap();
    repo.insert_or_get_existing("50% off", 2).await.unwrap();
    repo.insert_or_get_existing("500 items", 3).await.unwrap();
    repo.insert_or_get_existing("snake_case", 4).await.unwrap();
    repo.insert_or_get_existing("snakeXcase", 5).await.unwrap();

    let hits = repo.query_search("hello").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content(), "Hello World");

    let percent = repo.query_search("0%").await.unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].content(), "50% off");

    let underscore = repo.query_search("e_c").await.unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].content(), "snake_case");

    assert!(repo.query_search("absent").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_one_and_all() {
    let (_dir, repo) = new_repo();

    let a = repo.insert_or_get_existing("a", 1).await.unwrap();
    repo.insert_or_get_existing("b", 2).await.unwrap();
    repo.insert_or_get_existing("c", 3).await.unwrap();

    assert!(repo.delete_one(&a).await.unwrap());
    assert!(!repo.delete_one(&a).await.unwrap());
    assert!(!repo.delete_one(&RecordId::from("missing")).await.unwrap());
    assert!(repo.get(&a).await.unwrap().is_none());
    assert_eq!(repo.count().await.unwrap(), 2);

    assert_eq!(repo.delete_all().await.unwrap(), 2);
    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.query_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleted_content_can_be_inserted_again() {
    let (_dir, repo) = new_repo();

    let first = repo.insert_or_get_existing("again", 1).await.unwrap();
    repo.delete_one(&first).await.unwrap();
    let second = repo.insert_or_get_existing("again", 2).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_oldest_beyond_keeps_newest() {
    let (_dir, repo) = new_repo();

    for (i, text) in ["one", "two", "three", "four", "five"].iter().enumerate() {
        repo.insert_or_get_existing(text, i as i64).await.unwrap();
    }

    assert_eq!(repo.delete_oldest_beyond(2).await.unwrap(), 3);
    let contents: Vec<String> = repo
        .query_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.content().to_string())
        .collect();
    assert_eq!(contents, vec!["five", "four"]);

    assert_eq!(repo.delete_oldest_beyond(10).await.unwrap(), 0);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_multibyte_length_is_char_count() {
    let (_dir, repo) = new_repo();

    let id = repo.insert_or_get_existing("剪贴板", 1).await.unwrap();
    let record = repo.get(&id).await.unwrap().unwrap();
    assert_eq!(record.length(), 3);
}
