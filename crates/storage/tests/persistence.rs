use storage::{KeyValueStore, Storage};

#[tokio::test]
async fn items_survive_reopening_the_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("client.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    {
        let storage = Storage::new(&database_url).await.expect("open");
        storage
            .set_item("authToken", "token-abc")
            .await
            .expect("write token");
        storage.pool().close().await;
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.get_item("authToken").await.expect("read"),
        Some("token-abc".to_string())
    );
}
