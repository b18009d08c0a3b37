use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use geotool_offline::hooks::{self, Notification, SyncOutcome};
use geotool_offline::{CachedResponse, Destination, Disposition, ResourceRequest};

use crate::dto::{OfflineStatusResponse, ProxyQuery, SyncRequest};
use crate::error::ApiError;
use crate::state::AppState;

const SOURCE_HEADER: &str = "x-geotool-source";

pub async fn offline_status(State(state): State<Arc<AppState>>) -> Json<OfflineStatusResponse> {
    let config = state.offline.config();
    Json(OfflineStatusResponse {
        lifecycle: state.offline.lifecycle().await,
        static_cache: config.static_cache(),
        runtime_cache: config.runtime_cache(),
        static_assets: config.static_assets.len(),
    })
}

/// Fetch an absolute URL through the offline controller
pub async fn proxy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let request = ResourceRequest::get(&query.url)?.with_destination(destination(&headers));
    serve(&state, request).await
}

/// Anything outside the API resolves against the app origin, so the shell and
/// its assets keep loading while offline
pub async fn same_origin(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let url = state.offline.config().resolve(path)?;
    let request = ResourceRequest::new(method, url).with_destination(destination(&headers));
    serve(&state, request).await
}

pub async fn trigger_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SyncRequest>,
) -> Json<SyncOutcome> {
    Json(hooks::handle_sync(&request.tag, state.pending.as_ref()).await)
}

pub async fn push_notification(body: Bytes) -> Result<Json<Notification>, ApiError> {
    Ok(Json(hooks::parse_push(&body)?))
}

async fn serve(state: &AppState, request: ResourceRequest) -> Result<Response, ApiError> {
    match state.offline.handle(&request).await {
        Disposition::Respond { response, source, .. } => {
            let label = serde_json::to_value(source)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            Ok(into_response(response, Some(&label)))
        }
        Disposition::Bypass => {
            let response = state.fetcher.fetch(&request).await.map_err(|e| {
                tracing::warn!(url = %request.url, error = %e, "Direct fetch failed");
                ApiError {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Upstream unavailable".to_string(),
                    details: Some(e.to_string()),
                }
            })?;
            Ok(into_response(response, None))
        }
    }
}

fn into_response(cached: CachedResponse, source: Option<&str>) -> Response {
    let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = (status, Body::from(cached.body)).into_response();

    let headers = response.headers_mut();
    for (name, value) in &cached.headers {
        // Hop-by-hop and length headers no longer describe the replayed body
        if matches!(
            name.as_str(),
            "content-length" | "transfer-encoding" | "connection" | "content-encoding"
        ) {
            continue;
        }
        if let (Ok(name), Ok(value)) =
            (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str()))
        {
            headers.append(name, value);
        }
    }
    if let Some(source) = source.and_then(|s| HeaderValue::try_from(s).ok()) {
        headers.insert(SOURCE_HEADER, source);
    }
    response
}

/// Infer what the client wants from fetch metadata, falling back to Accept
fn destination(headers: &HeaderMap) -> Destination {
    let fetch_dest = headers.get("sec-fetch-dest").and_then(|v| v.to_str().ok());
    match fetch_dest {
        Some("document") => Destination::Document,
        Some("image") => Destination::Image,
        Some("script") => Destination::Script,
        Some("style") => Destination::Style,
        Some("font") => Destination::Font,
        Some("manifest") => Destination::Manifest,
        Some(_) => Destination::Other,
        None => {
            let accepts_html = headers
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|accept| accept.contains("text/html"));
            if accepts_html {
                Destination::Document
            } else {
                Destination::Other
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_prefers_fetch_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert("sec-fetch-dest", HeaderValue::from_static("image"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));
        assert_eq!(destination(&headers), Destination::Image);
    }

    #[test]
    fn test_destination_from_accept() {
        let mut headers = HeaderMap::new();
        assert_eq!(destination(&headers), Destination::Other);

        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html,application/xhtml+xml"));
        assert_eq!(destination(&headers), Destination::Document);
    }

    #[test]
    fn test_replayed_response_keeps_headers_and_source() {
        let cached = CachedResponse::ok("image/svg+xml", "<svg/>");
        let response = into_response(cached, Some("placeholder"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert_eq!(response.headers()[SOURCE_HEADER], "placeholder");
    }
}
