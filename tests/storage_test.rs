//! 目录存储后端测试

use flare_discovery::discovery::{
    DiscoveryStorage, FileStorage, MemoryStorage, Metadata, StorageConfig, StorageFactory,
};
use flare_discovery::error::ErrorCode;
use flare_discovery::routing::{Address, Route};

fn metadata(kind: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("kind".to_string(), kind.as_bytes().to_vec());
    metadata
}

#[tokio::test]
async fn test_memory_last_write_wins() {
    let mut storage = MemoryStorage::new();
    storage.init().await.unwrap();

    storage
        .register("svc".to_string(), Route::from("a"), metadata("first"))
        .await
        .unwrap();
    storage
        .register("svc".to_string(), Route::from("b"), Metadata::new())
        .await
        .unwrap();

    let info = storage.get("svc").await.unwrap();
    assert_eq!(info.route, Route::from("b"));
    // 覆盖而不是合并
    assert!(info.metadata.is_empty());
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn test_memory_reads_are_idempotent() {
    let mut storage = MemoryStorage::new();
    storage
        .register("b".to_string(), Route::from("rb"), Metadata::new())
        .await
        .unwrap();
    storage
        .register("a".to_string(), Route::from("ra"), Metadata::new())
        .await
        .unwrap();

    let first = storage.list().await;
    let second = storage.list().await;
    assert_eq!(first, second);
    assert_eq!(
        first.iter().map(|info| info.id.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    let once = storage.get("a").await;
    let twice = storage.get("a").await;
    assert_eq!(once, twice);
    assert!(storage.get("missing").await.is_none());
}

#[tokio::test]
async fn test_memory_init_clears_directory() {
    let mut storage = MemoryStorage::new();
    storage
        .register("svc".to_string(), Route::from("a"), Metadata::new())
        .await
        .unwrap();
    storage.init().await.unwrap();
    assert!(storage.is_empty());
}

#[tokio::test]
async fn test_file_storage_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");

    let mut storage = FileStorage::new(&path);
    storage.init().await.unwrap();
    assert!(storage.list().await.is_empty());

    let route: Route = ["n1", "echo"].into_iter().collect();
    storage
        .register("worker-1".to_string(), route.clone(), metadata("echo"))
        .await
        .unwrap();

    let mut reopened = FileStorage::new(&path);
    reopened.init().await.unwrap();
    let info = reopened.get("worker-1").await.unwrap();
    assert_eq!(info.route, route);
    assert_eq!(info.metadata, metadata("echo"));
}

#[tokio::test]
async fn test_file_storage_metadata_is_base64_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");

    let mut storage = FileStorage::new(&path);
    storage.init().await.unwrap();
    let mut binary = Metadata::new();
    binary.insert("blob".to_string(), vec![0x00, 0xff, 0x10]);
    storage
        .register("svc".to_string(), Route::from("svc"), binary)
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json[0]["id"], "svc");
    assert_eq!(json[0]["route"][0], "svc");
    assert_eq!(json[0]["metadata"]["blob"], "AP8Q");
}

#[tokio::test]
async fn test_file_storage_keeps_local_route_with_numeric_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");

    let mut storage = FileStorage::new(&path);
    storage.init().await.unwrap();
    let route = Route::from(Address::local("1#x"));
    storage
        .register("svc".to_string(), route.clone(), Metadata::new())
        .await
        .unwrap();

    let mut reopened = FileStorage::new(&path);
    reopened.init().await.unwrap();
    let info = reopened.get("svc").await.unwrap();
    assert_eq!(info.route, route);
    assert!(info.route.next().unwrap().is_local());
}

#[tokio::test]
async fn test_file_storage_leaves_sibling_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");
    let sibling = dir.path().join("services.tmp");
    std::fs::write(&sibling, "keep").unwrap();

    let mut storage = FileStorage::new(&path);
    storage.init().await.unwrap();
    storage
        .register("svc".to_string(), Route::from("svc"), Metadata::new())
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&sibling).unwrap(), "keep");
    assert!(!dir.path().join("services.json.tmp").exists());

    let mut reopened = FileStorage::new(&path);
    reopened.init().await.unwrap();
    assert!(reopened.get("svc").await.is_some());
}

#[tokio::test]
async fn test_file_storage_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");
    std::fs::write(&path, "{ not json").unwrap();

    let mut storage = FileStorage::new(&path);
    let err = storage.init().await.unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::StorageError));
}

#[tokio::test]
async fn test_file_storage_write_failure_rolls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("services.json");

    let mut storage = FileStorage::new(&path);
    storage.init().await.unwrap();

    let err = storage
        .register("svc".to_string(), Route::from("svc"), Metadata::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::StorageError));
    assert!(storage.get("svc").await.is_none());
}

#[tokio::test]
async fn test_storage_factory() {
    let config: StorageConfig = serde_json::from_str(r#"{ "type": "memory" }"#).unwrap();
    assert_eq!(config, StorageConfig::Memory);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");
    let config = StorageConfig::File { path: path.clone() };

    let mut storage = StorageFactory::create(&config);
    storage.init().await.unwrap();
    storage
        .register("svc".to_string(), Route::from("svc"), Metadata::new())
        .await
        .unwrap();
    assert!(path.exists());
}
