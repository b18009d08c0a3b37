//! Integration tests for the JSON file adapter

use std::sync::Arc;

use geotool_core::capture::PresetAnswers;
use geotool_core::models::{CaptureTool, Coordinate, TrackSample};
use geotool_core::ports::Persistence;
use geotool_core::{FieldSession, StoreSnapshot};
use geotool_store::JsonFilePersistence;
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_file_means_no_prior_data() {
    let dir = TempDir::new().unwrap();
    let persistence = JsonFilePersistence::new(dir.path().join("session.json"));

    assert!(persistence.load().await.unwrap().is_none());
    // Clearing a file that was never written is fine
    persistence.clear().await.unwrap();
}

#[tokio::test]
async fn test_save_creates_parent_dirs_and_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("session.json");
    let persistence = JsonFilePersistence::new(&path);

    persistence.save(&StoreSnapshot::default()).await.unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("nested").join("session.json.tmp").exists());
    assert_eq!(persistence.load().await.unwrap(), Some(StoreSnapshot::default()));
}

#[tokio::test]
async fn test_corrupt_file_is_an_error_and_session_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let persistence = Arc::new(JsonFilePersistence::new(&path));
    assert!(persistence.load().await.is_err());

    let session = FieldSession::open(persistence).await;
    assert!(session.captures().is_empty());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let id = {
        let mut session = FieldSession::open(Arc::new(JsonFilePersistence::new(&path))).await;
        session.select_tool(CaptureTool::Point);
        let outcome = session
            .click(Coordinate::new(24.0277, -104.6532), &PresetAnswers::named("Encino"))
            .await;
        session
            .record_position(TrackSample::new(Coordinate::new(24.0277, -104.6532), 4.0, Some(1880.0)))
            .await;
        outcome.capture.and_then(|c| c.id).unwrap()
    };

    let session = FieldSession::open(Arc::new(JsonFilePersistence::new(&path))).await;
    assert_eq!(session.captures().len(), 1);
    assert_eq!(session.captures()[0].id, Some(id));
    assert_eq!(session.store().track().len(), 1);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"gpsTrack\""));
}

#[tokio::test]
async fn test_clear_removes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let persistence = JsonFilePersistence::new(&path);

    persistence.save(&StoreSnapshot::default()).await.unwrap();
    persistence.clear().await.unwrap();
    assert!(!path.exists());
}
