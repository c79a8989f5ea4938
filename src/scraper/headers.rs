// src/scraper/headers.rs

use crate::db::connection::Database;
use crate::db::storage;
use crate::errors::AppError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Storage key the captured headers live under.
pub const HEADERS_KEY: &str = "capturedHeaders";

// Set by the HTTP client itself or overridden per request.
const SKIPPED: [&str; 4] = ["host", "content-length", "connection", "content-type"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

/// Request headers lifted from a logged-in browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapturedHeaders(Vec<HeaderPair>);

impl CapturedHeaders {
    pub fn new(pairs: Vec<HeaderPair>) -> Self {
        Self(pairs)
    }

    /// Accepts the browser's `[{name, value}]` list or a `{name: value}` object.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
            Value::Object(map) => Ok(Self(
                map.into_iter()
                    .filter_map(|(name, value)| {
                        value.as_str().map(|v| HeaderPair {
                            name,
                            value: v.to_string(),
                        })
                    })
                    .collect(),
            )),
            _ => Err("expected a list of {name, value} or an object of headers".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Converts to a request header map, always sending JSON.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for pair in &self.0 {
            if SKIPPED.iter().any(|s| pair.name.eq_ignore_ascii_case(s)) {
                continue;
            }
            let name = match HeaderName::from_bytes(pair.name.as_bytes()) {
                Ok(n) => n,
                Err(_) => {
                    warn!(header = %pair.name, "skipping invalid header name");
                    continue;
                }
            };
            match HeaderValue::from_str(&pair.value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => warn!(header = %pair.name, "skipping invalid header value"),
            }
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// Supplies the headers the shop API requires. `None` means nothing has been
/// captured yet.
pub trait CredentialProvider: Send + Sync {
    fn request_headers(&self) -> Option<CapturedHeaders>;
}

/// Fixed headers held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(Option<CapturedHeaders>);

impl StaticHeaders {
    pub fn new(headers: CapturedHeaders) -> Self {
        Self(Some(headers))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticHeaders {
    fn request_headers(&self) -> Option<CapturedHeaders> {
        self.0.clone().filter(|headers| !headers.is_empty())
    }
}

/// Headers captured earlier and kept in the local store.
#[derive(Clone)]
pub struct StoredHeaders {
    db: Database,
}

impl StoredHeaders {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl CredentialProvider for StoredHeaders {
    fn request_headers(&self) -> Option<CapturedHeaders> {
        let raw = match self
            .db
            .with_conn(|conn| storage::get_value(conn, HEADERS_KEY))
        {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "could not read captured headers");
                return None;
            }
        };

        match CapturedHeaders::from_json(&raw) {
            Ok(headers) if !headers.is_empty() => Some(headers),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "stored headers are unreadable");
                None
            }
        }
    }
}

/// Replaces the stored headers. Returns how many were saved.
pub fn save_captured_headers(db: &Database, raw: &str) -> Result<usize, AppError> {
    let headers = CapturedHeaders::from_json(raw).map_err(AppError::BadRequest)?;
    if headers.is_empty() {
        return Err(AppError::BadRequest("no headers supplied".into()));
    }
    let json = serde_json::to_string(&headers)?;
    db.with_conn(|conn| storage::put_value(conn, HEADERS_KEY, &json))?;
    Ok(headers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn browser_list_and_plain_object_are_both_accepted() {
        let list = CapturedHeaders::from_json(
            r#"[{"name": "Cookie", "value": "session=abc"}, {"name": "X-XSRF-TOKEN", "value": "t0k"}]"#,
        )
        .unwrap();
        let object =
            CapturedHeaders::from_json(r#"{"Cookie": "session=abc", "X-XSRF-TOKEN": "t0k"}"#).unwrap();

        assert_eq!(list, object);
        assert!(CapturedHeaders::from_json("[1, 2]").is_err());
        assert!(CapturedHeaders::from_json("\"cookie\"").is_err());
    }

    #[test]
    fn header_map_drops_transport_headers_and_forces_json() {
        let headers = CapturedHeaders::new(vec![
            HeaderPair {
                name: "Cookie".into(),
                value: "session=abc".into(),
            },
            HeaderPair {
                name: "Content-Length".into(),
                value: "12".into(),
            },
            HeaderPair {
                name: "Content-Type".into(),
                value: "text/plain".into(),
            },
            HeaderPair {
                name: "bad header".into(),
                value: "x".into(),
            },
        ]);

        let map = headers.to_header_map();
        assert_eq!(map.get("cookie").unwrap(), "session=abc");
        assert_eq!(map.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(map.get("content-length").is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn static_provider_treats_empty_headers_as_absent() {
        assert!(StaticHeaders::none().request_headers().is_none());
        assert!(StaticHeaders::new(CapturedHeaders::default())
            .request_headers()
            .is_none());

        let cookie = CapturedHeaders::new(vec![HeaderPair {
            name: "Cookie".into(),
            value: "session=abc".into(),
        }]);
        assert_eq!(
            StaticHeaders::new(cookie.clone()).request_headers(),
            Some(cookie)
        );
    }
}
