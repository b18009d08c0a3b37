//! Replayable responses

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Placeholder served for map tiles when there is neither network nor cache
pub const OFFLINE_TILE_SVG: &str = concat!(
    r##"<svg width="256" height="256" xmlns="http://www.w3.org/2000/svg">"##,
    r##"<rect width="256" height="256" fill="#2d343d"/>"##,
    r##"<text x="128" y="128" text-anchor="middle" fill="#5f6368" font-size="14">Sin conexión</text>"##,
    r##"</svg>"##,
);

/// A response body with enough metadata to replay it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
            .to_string();
        Self {
            status,
            status_text,
            headers,
            body: body.into(),
        }
    }

    /// 200 with a content type
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, vec![("content-type".to_string(), content_type.to_string())], body)
    }

    pub fn offline_tile() -> Self {
        Self::ok("image/svg+xml", OFFLINE_TILE_SVG)
    }

    /// Last-resort answer when nothing else is available
    pub fn service_unavailable() -> Self {
        let mut response = Self::new(
            503,
            vec![("content-type".to_string(), "text/plain; charset=utf-8".to_string())],
            "Offline",
        );
        response.status_text = "Service Unavailable".to_string();
        response
    }

    /// Only exact 200 responses are stored at runtime
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_tile() {
        let tile = CachedResponse::offline_tile();
        assert_eq!(tile.status, 200);
        assert_eq!(tile.content_type(), Some("image/svg+xml"));
        let svg = String::from_utf8(tile.body).unwrap();
        assert!(svg.contains("Sin conexión"));
        assert!(svg.contains("#2d343d"));
    }

    #[test]
    fn test_service_unavailable() {
        let response = CachedResponse::service_unavailable();
        assert_eq!(response.status, 503);
        assert_eq!(response.status_text, "Service Unavailable");
        assert_eq!(response.body, b"Offline");
        assert!(!response.is_cacheable());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = CachedResponse::new(
            200,
            vec![("Content-Type".to_string(), "text/css".to_string())],
            "body{}",
        );
        assert_eq!(response.content_type(), Some("text/css"));
        assert_eq!(response.status_text, "OK");
    }
}
