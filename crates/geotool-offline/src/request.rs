//! Intercepted requests and their cache keys

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OfflineError, Result};

/// What the requester intends to do with the response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// A full page navigation
    Document,
    Image,
    Script,
    Style,
    Font,
    Manifest,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
}

impl ResourceRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            destination: Destination::Other,
        }
    }

    /// Parse an absolute URL into a GET request
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self::new(Method::GET, parse_url(url)?))
    }

    /// GET for a page navigation
    pub fn document(url: &str) -> Result<Self> {
        Ok(Self::get(url)?.with_destination(Destination::Document))
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Only http and https requests are intercepted
    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    pub fn expects_document(&self) -> bool {
        self.destination == Destination::Document
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }
}

/// Cache key: method plus the URL without its fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: &Method, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        Self {
            method: method.as_str().to_string(),
            url: url.to_string(),
        }
    }

    pub fn get(url: &Url) -> Self {
        Self::new(&Method::GET, url)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| OfflineError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
