//! Integration tests for the geotool binary
//!
//! Each test points the binary at its own data file through the environment.

use std::path::Path;
use std::process::{Command, Output};

fn geotool(data_file: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_geotool"))
        .args(args)
        .env("GEOTOOL_DATA_FILE", data_file)
        .env_remove("GEOTOOL_CACHE_VERSION")
        .env_remove("GEOTOOL_TILE_HOSTS")
        .env("RUST_LOG", "error")
        .current_dir(data_file.parent().unwrap())
        .output()
        .expect("Failed to execute geotool")
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

#[test]
fn test_stats_on_empty_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let output = geotool(&data_file, &["stats", "--json"]);
    assert!(output.status.success());

    let parsed = json(&output);
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"]["point_count"], 0);
    assert!(!data_file.exists(), "Reading stats must not create the data file");
}

#[test]
fn test_track_add_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let added = geotool(&data_file, &["track", "add", "24.02", "-104.65", "--accuracy", "4"]);
    assert!(added.status.success());
    assert!(data_file.exists());

    let shown = json(&geotool(&data_file, &["track", "show", "--json"]));
    let samples = shown["data"]["samples"].as_array().unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0]["lat"], 24.02);
    assert_eq!(samples[0]["accuracy"], 4.0);
    assert!(shown["data"]["last_fix_utm"].as_str().unwrap().starts_with("UTM"));

    let human = geotool(&data_file, &["track", "show"]);
    let stdout = String::from_utf8_lossy(&human.stdout);
    assert!(stdout.contains("13N"), "{}", stdout);
}

#[test]
fn test_invalid_track_fix_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let output = geotool(&data_file, &["track", "add", "95", "0"]);
    assert!(!output.status.success());
    assert!(!data_file.exists());
}

#[test]
fn test_export_without_captures_fails_with_suggestion() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let output = geotool(&data_file, &["export", "--format", "csv", "--json"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let error: serde_json::Value = serde_json::from_str(&stderr).expect("Error should be JSON");
    assert_eq!(error["status"], "error");
    assert!(!error["suggestions"].as_array().unwrap().is_empty());
}

#[test]
fn test_list_and_export_saved_captures() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");
    std::fs::write(
        &data_file,
        r#"{
            "captures": [
                {"id": 1, "name": "Pino 1", "type": "point",
                 "coordinates": {"lat": 24.02, "lon": -104.65}, "description": "DAP 32",
                 "created_at": "2024-05-01T10:00:00Z"},
                {"id": 2, "name": "Rodal 12", "type": "polygon",
                 "coordinates": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.0, "lon": 0.01}, {"lat": 0.01, "lon": 0.0}],
                 "area": 6000000.0, "created_at": "2024-05-01T11:00:00Z"}
            ],
            "gpsTrack": []
        }"#,
    )
    .unwrap();

    let listed = json(&geotool(&data_file, &["list", "--json"]));
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);

    let export_path = dir.path().join("out.kml");
    let output = geotool(
        &data_file,
        &["export", "-f", "kml", "-o", export_path.to_str().unwrap(), "--json"],
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["data"]["captures"], 2);

    let kml = std::fs::read_to_string(&export_path).unwrap();
    assert!(kml.contains("<name>Rodal 12</name>"));
    assert!(kml.contains("-104.65,24.02,0"));
}

#[test]
fn test_json_clear_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");
    std::fs::write(
        &data_file,
        r#"{
            "captures": [
                {"id": 1, "name": "Pino 1", "type": "point",
                 "coordinates": {"lat": 24.02, "lon": -104.65},
                 "created_at": "2024-05-01T10:00:00Z"}
            ],
            "gpsTrack": [
                {"lat": 24.02, "lon": -104.65, "accuracy": 5.0, "altitude": 0.0, "timestamp": "2024-05-01T10:00:00Z"}
            ]
        }"#,
    )
    .unwrap();

    let refused = geotool(&data_file, &["clear", "--json"]);
    assert!(!refused.status.success());
    let stderr = String::from_utf8_lossy(&refused.stderr);
    let error: serde_json::Value = serde_json::from_str(&stderr).expect("Error should be JSON");
    assert!(error["suggestions"][0].as_str().unwrap().contains("--yes"));

    assert!(data_file.exists());
    let listed = json(&geotool(&data_file, &["list", "--json"]));
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let cleared = geotool(&data_file, &["clear", "--json", "--yes"]);
    assert!(cleared.status.success());
    let listed = json(&geotool(&data_file, &["list", "--json"]));
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[test]
fn test_remove_unknown_capture_reports_not_removed() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let output = geotool(&data_file, &["remove", "42", "--json"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["data"]["removed"], false);
}

#[test]
fn test_load_centers_view_on_layer() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");
    let layer = dir.path().join("caminos.geojson");
    std::fs::write(
        &layer,
        r#"{"type":"LineString","coordinates":[[-104.7,24.0],[-104.6,24.1]]}"#,
    )
    .unwrap();

    let output = geotool(&data_file, &["load", layer.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("view centered on 24.05"), "{}", stdout);

    let parsed = json(&geotool(&data_file, &["load", layer.to_str().unwrap(), "--json"]));
    assert_eq!(parsed["data"]["name"], "caminos");
    assert_eq!(parsed["data"]["bounds"]["north"], 24.1);
}

#[test]
fn test_config_shows_sources() {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.json");

    let parsed = json(&geotool(&data_file, &["config", "--json"]));
    assert_eq!(parsed["data"]["data_file"]["source"], "Environment");
    assert_eq!(parsed["data"]["cache_version"]["source"], "Default");
}
