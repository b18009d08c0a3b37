use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use geotool_api::{create_router, AppState};
use geotool_core::FieldSession;
use geotool_offline::{
    CachedResponse, Fetcher, MemoryCacheStorage, OfflineConfig, OfflineController, OfflineError,
    ResourceRequest,
};
use geotool_store::memory::MemoryPersistence;
use serde_json::{json, Value};
use tower::ServiceExt;

/// Upstream that serves the app shell and fails everything else
struct ShellOnly;

#[async_trait]
impl Fetcher for ShellOnly {
    async fn fetch(&self, request: &ResourceRequest) -> geotool_offline::Result<CachedResponse> {
        match request.url.path() {
            "/" | "/index.html" => Ok(CachedResponse::ok("text/html", "<html>shell</html>")),
            _ => Err(OfflineError::Network {
                url: request.url.to_string(),
                message: "offline".to_string(),
            }),
        }
    }
}

async fn app(activate: bool) -> Router {
    let fetcher: Arc<dyn Fetcher> = Arc::new(ShellOnly);
    let config = OfflineConfig::new(
        "http://localhost:8080",
        "v1",
        &["/", "/index.html"],
        vec!["openstreetmap.org".to_string()],
    )
    .unwrap();
    let offline = Arc::new(OfflineController::new(
        config,
        Arc::new(MemoryCacheStorage::new()),
        fetcher.clone(),
    ));
    if activate {
        offline.install().await.unwrap();
        offline.activate().await.unwrap();
    }

    let session = FieldSession::open(Arc::new(MemoryPersistence::new())).await;
    create_router(Arc::new(AppState::new(session, offline, fetcher)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn upload(app: &Router, file_name: &str, content: &str) -> (StatusCode, Value) {
    let boundary = "geotool-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
        b = boundary,
        f = file_name,
        c = content
    );
    let request = Request::post("/api/v1/layers")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn click(app: &Router, lat: f64, lon: f64, extra: Value) -> Value {
    let mut body = json!({ "lat": lat, "lon": lon });
    if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        body.extend(extra.clone());
    }
    let (status, value) = send(app, Method::POST, "/api/v1/capture/click", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    value
}

#[tokio::test]
async fn test_health() {
    let app = app(false).await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "geotool-api");
}

#[tokio::test]
async fn test_point_capture_flow() {
    let app = app(false).await;
    let (_, selected) =
        send(&app, Method::POST, "/api/v1/capture/tool", Some(json!({ "tool": "point" }))).await;
    assert_eq!(selected["state"]["state"], "tool_selected");

    let cancelled = click(&app, 24.02, -104.65, json!({})).await;
    assert!(cancelled.get("capture").is_none());

    let added = click(&app, 24.02, -104.65, json!({ "name": "Pino 1", "description": "DAP 32cm" })).await;
    assert_eq!(added["capture"]["name"], "Pino 1");
    let id = added["capture"]["id"].as_u64().unwrap();

    let (_, list) = send(&app, Method::GET, "/api/v1/captures", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, stats) = send(&app, Method::GET, "/api/v1/captures/stats", None).await;
    assert_eq!(stats["point_count"], 1);

    let (status, deleted) =
        send(&app, Method::DELETE, &format!("/api/v1/captures/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed"], true);

    let (status, again) =
        send(&app, Method::DELETE, &format!("/api/v1/captures/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["removed"], false);
    assert!(again["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_line_capture_needs_confirmation() {
    let app = app(false).await;
    send(&app, Method::POST, "/api/v1/capture/tool", Some(json!({ "tool": "line" }))).await;

    click(&app, 24.0, -104.6, json!({})).await;
    let pending = click(&app, 24.0, -104.59, json!({})).await;
    assert_eq!(pending["state"]["state"], "accumulating");
    assert!(pending.get("capture").is_none());

    let done = click(&app, 24.01, -104.59, json!({ "name": "Brecha", "finalize": true })).await;
    assert_eq!(done["capture"]["type"], "line");
    assert!(done["capture"]["distance"].as_f64().unwrap() > 1000.0);
    assert_eq!(done["state"]["state"], "idle");
}

#[tokio::test]
async fn test_invalid_click_is_rejected() {
    let app = app(false).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/capture/click",
        Some(json!({ "lat": 123.0, "lon": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid coordinate");
}

#[tokio::test]
async fn test_export_requires_captures_and_known_format() {
    let app = app(false).await;
    let (status, _) = send(&app, Method::GET, "/api/v1/captures/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(&app, Method::POST, "/api/v1/capture/tool", Some(json!({ "tool": "point" }))).await;
    click(&app, 24.0, -104.6, json!({ "name": "Pino" })).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/v1/captures/export?format=csv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).starts_with("kind,name,description"));

    let (status, _) = send(&app, Method::GET, "/api/v1/captures/export?format=shp", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_track_recording() {
    let app = app(false).await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/track",
        Some(json!({ "lat": 24.0, "lon": -104.6, "accuracy": 4.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, track) = send(&app, Method::GET, "/api/v1/track", None).await;
    assert_eq!(track["samples"].as_array().unwrap().len(), 1);
    assert_eq!(track["samples"][0]["altitude"], 0.0);
}

#[tokio::test]
async fn test_offline_navigation_gets_app_shell() {
    let app = app(true).await;
    let response = app
        .clone()
        .oneshot(
            Request::get("/rodales/12")
                .header(header::ACCEPT, "text/html")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-geotool-source"], "app_shell");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>shell</html>");
}

#[tokio::test]
async fn test_proxy_serves_tile_placeholder_offline() {
    let app = app(true).await;
    let response = app
        .clone()
        .oneshot(
            Request::get("/proxy?url=https://tile.openstreetmap.org/1/0/0.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
    assert_eq!(response.headers()["x-geotool-source"], "placeholder");
}

#[tokio::test]
async fn test_proxy_bypasses_before_activation() {
    let app = app(false).await;
    let (status, body) = send(&app, Method::GET, "/proxy?url=https://example.com/data.json", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Upstream unavailable");

    let (_, offline) = send(&app, Method::GET, "/api/v1/offline/status", None).await;
    assert_eq!(offline["lifecycle"], "new");
    assert_eq!(offline["static_cache"], "geotool-v1");
}

#[tokio::test]
async fn test_sync_and_push_hooks() {
    let app = app(false).await;
    let (_, outcome) = send(&app, Method::POST, "/api/v1/offline/sync", Some(json!({}))).await;
    assert_eq!(outcome["outcome"], "nothing_pending");

    let (_, ignored) =
        send(&app, Method::POST, "/api/v1/offline/sync", Some(json!({ "tag": "other" }))).await;
    assert_eq!(ignored["outcome"], "ignored");

    let (status, notification) = send(
        &app,
        Method::POST,
        "/api/v1/offline/push",
        Some(json!({ "title": "Alerta", "body": "Incendio cercano" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notification["title"], "Alerta");
    assert_eq!(notification["actions"][0]["action"], "open");
}

#[tokio::test]
async fn test_captures_are_queued_for_sync() {
    let app = app(false).await;
    send(&app, Method::POST, "/api/v1/capture/tool", Some(json!({ "tool": "point" }))).await;
    let first = click(&app, 24.0, -104.6, json!({ "name": "Pino 1" })).await;
    send(&app, Method::POST, "/api/v1/capture/tool", Some(json!({ "tool": "point" }))).await;
    click(&app, 24.1, -104.6, json!({ "name": "Pino 2" })).await;

    let (_, outcome) = send(&app, Method::POST, "/api/v1/offline/sync", Some(json!({}))).await;
    assert_eq!(outcome["outcome"], "pending");
    assert_eq!(outcome["count"], 2);

    let id = first["capture"]["id"].as_u64().unwrap();
    send(&app, Method::DELETE, &format!("/api/v1/captures/{}", id), None).await;
    let (_, outcome) = send(&app, Method::POST, "/api/v1/offline/sync", Some(json!({}))).await;
    assert_eq!(outcome["count"], 1);

    send(&app, Method::DELETE, "/api/v1/captures", None).await;
    let (_, outcome) = send(&app, Method::POST, "/api/v1/offline/sync", Some(json!({}))).await;
    assert_eq!(outcome["outcome"], "nothing_pending");
}

#[tokio::test]
async fn test_layer_registry() {
    let app = app(false).await;
    let (status, _) = send(&app, Method::GET, "/api/v1/layers", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, created) = upload(
        &app,
        "predios.geojson",
        r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"clave":"P-01"},
             "geometry":{"type":"LineString","coordinates":[[-104.7,24.0],[-104.6,24.1]]}}]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "predios");
    assert_eq!(created["visible"], true);
    assert_eq!(created["features"]["features"].as_array().unwrap().len(), 1);

    let (_, list) = send(&app, Method::GET, "/api/v1/layers", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["feature_count"], 1);
    assert!(list[0].get("features").is_none());

    let (status, bounds) = send(&app, Method::GET, "/api/v1/layers/1/bounds", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bounds["south"], 24.0);
    assert_eq!(bounds["east"], -104.6);

    let (_, hidden) = send(&app, Method::POST, "/api/v1/layers/1/visibility", None).await;
    assert_eq!(hidden["visible"], false);
    let (_, shown) = send(
        &app,
        Method::POST,
        "/api/v1/layers/1/visibility",
        Some(json!({ "visible": true })),
    )
    .await;
    assert_eq!(shown["visible"], true);

    let (_, deleted) = send(&app, Method::DELETE, "/api/v1/layers/1", None).await;
    assert_eq!(deleted["removed"], true);
    let (status, again) = send(&app, Method::DELETE, "/api/v1/layers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["removed"], false);

    let (status, _) = send(&app, Method::GET, "/api/v1/layers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/api/v1/layers/1/visibility", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/v1/layers/1/bounds", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_layer_upload_is_not_stored() {
    let app = app(false).await;
    let (status, body) = upload(&app, "ortofoto.mbtiles", "binary").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported format");

    let (_, list) = send(&app, Method::GET, "/api/v1/layers", None).await;
    assert!(list.as_array().unwrap().is_empty());
}
