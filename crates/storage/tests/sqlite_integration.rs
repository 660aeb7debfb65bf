use chrono::{TimeZone, Utc};
use storage::repository::{FlagRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_persists_flags() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_flags?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get_flag("quiz-passed").await.unwrap().is_none());

    let at = Utc.timestamp_opt(1_770_958_800, 0).unwrap();
    repo.set_flag("quiz-passed", "1", at).await.unwrap();

    let record = repo.get_flag("quiz-passed").await.unwrap().expect("flag");
    assert_eq!(record.key, "quiz-passed");
    assert_eq!(record.value, "1");
    assert_eq!(record.updated_at, at);
}

#[tokio::test]
async fn sqlite_upsert_clear_and_list() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let first = Utc.timestamp_opt(100, 0).unwrap();
    let second = Utc.timestamp_opt(200, 0).unwrap();
    repo.set_flag("quiz-passed", "1", first).await.unwrap();
    repo.set_flag("quiz-passed", "1", second).await.unwrap();
    repo.set_flag("countdown-skipped", "1", first).await.unwrap();

    let flags = repo.list_flags().await.unwrap();
    assert_eq!(flags.len(), 2);
    assert_eq!(flags[0].key, "countdown-skipped");
    assert_eq!(flags[1].updated_at, second);

    assert!(repo.clear_flag("quiz-passed").await.unwrap());
    assert!(!repo.clear_flag("quiz-passed").await.unwrap());
    assert_eq!(repo.list_flags().await.unwrap().len(), 1);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn storage_sqlite_builds_flag_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .flags
        .set_flag("quiz-passed", "1", Utc::now())
        .await
        .unwrap();
    assert!(storage.flags.get_flag("quiz-passed").await.unwrap().is_some());
}
