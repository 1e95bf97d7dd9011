// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar handle

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;
use std::sync::Arc;

use cookie::Cookie;
use cookie_store::CookieStore;
use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::http::{Request, Response};

use super::CookieRecord;

/// Shared cookie jar
///
/// A cloneable handle over a `cookie_store::CookieStore`. All matching
/// (domain, path, expiry, secure) is the store's; this type only moves
/// cookies between the store and the wire. Clones share the same store.
#[derive(Clone, Default)]
pub struct CookieJar {
    inner: Arc<RwLock<CookieStore>>,
}

impl CookieJar {
    /// Create a new empty jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a jar from raw attribute records
    ///
    /// With `strict` set, the first malformed record aborts construction;
    /// otherwise malformed records are dropped and logged.
    pub fn from_records(records: Vec<CookieRecord>, strict: bool) -> Result<Self> {
        let jar = Self::new();
        for record in records {
            let name = record.name.clone();
            match jar.add(record) {
                Ok(()) => {}
                Err(err) if strict => return Err(err),
                Err(err) => {
                    tracing::warn!(cookie = %name, %err, "dropping malformed cookie record");
                }
            }
        }
        Ok(jar)
    }

    /// Add a single record to the jar
    pub fn add(&self, record: CookieRecord) -> Result<()> {
        record.validate()?;
        let url = record.scope_url()?;
        let cookie = record.into_cookie();
        self.inner
            .write()
            .store_response_cookies(std::iter::once(cookie), &url);
        Ok(())
    }

    /// Compute the `Cookie` header value for an outgoing request
    ///
    /// Returns `None` when nothing in the jar matches the request URL.
    pub fn cookie_header_for(&self, request: &Request) -> Option<String> {
        let store = self.inner.read();
        let value = store
            .get_request_values(&request.url)
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Store every `Set-Cookie` entry of a response
    ///
    /// Entries are scoped to the originating request's URL; unparseable
    /// headers are skipped.
    pub fn extract_cookies(&self, request: &Request, response: &Response) {
        let cookies = response.set_cookies().into_iter().filter_map(|value| {
            match Cookie::parse(value.to_string()) {
                Ok(cookie) => Some(cookie.into_owned()),
                Err(err) => {
                    tracing::warn!(url = %request.url, %err, "ignoring unparseable set-cookie header");
                    None
                }
            }
        });
        self.inner
            .write()
            .store_response_cookies(cookies, &request.url);
    }

    /// Get a stored cookie's value by domain, path and name
    pub fn get_value(&self, domain: &str, path: &str, name: &str) -> Option<String> {
        self.inner
            .read()
            .get(domain, path, name)
            .map(|c| c.value().to_string())
    }

    /// Number of unexpired cookies
    pub fn len(&self) -> usize {
        self.inner.read().iter_unexpired().count()
    }

    /// Check if the jar holds no unexpired cookies
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every cookie
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Serialize unexpired persistent cookies as JSON
    ///
    /// Session cookies are not persisted, matching file-jar conventions.
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.inner
            .read()
            .save_json(&mut buf)
            .map_err(|e| Error::Cookie(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| Error::Cookie(e.to_string()))
    }

    /// Rebuild a jar from [`CookieJar::to_json`] output
    pub fn from_json(json: &str) -> Result<Self> {
        let store = CookieStore::load_json(Cursor::new(json.as_bytes()))
            .map_err(|e| Error::Cookie(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(RwLock::new(store)),
        })
    }

    /// Persist the jar to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.inner
            .read()
            .save_json(&mut writer)
            .map_err(|e| Error::Cookie(e.to_string()))
    }

    /// Load a jar previously written with [`CookieJar::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let store = CookieStore::load_json(reader).map_err(|e| Error::Cookie(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(RwLock::new(store)),
        })
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // cookie names/values are credentials and stay out of Debug output
        f.debug_struct("CookieJar").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FUTURE: i64 = 4_102_444_800; // 2100-01-01

    fn record() -> CookieRecord {
        CookieRecord::new("test", "123").domain("example.com")
    }

    fn get(url: &str) -> Request {
        Request::get(url).unwrap()
    }

    #[test]
    fn test_cookie_header_for_matching_url() {
        let jar = CookieJar::new();
        jar.add(record()).unwrap();
        let header = jar.cookie_header_for(&get("http://example.com/path"));
        assert_eq!(header.as_deref(), Some("test=123"));
    }

    #[test]
    fn test_no_header_for_other_domain() {
        let jar = CookieJar::new();
        jar.add(record()).unwrap();
        assert!(jar.cookie_header_for(&get("http://other.com/path")).is_none());
    }

    #[test]
    fn test_expired_record_yields_nothing() {
        let jar = CookieJar::new();
        jar.add(record().expires(1_000_000_000)).unwrap();
        assert!(jar.cookie_header_for(&get("http://example.com/")).is_none());
    }

    #[test]
    fn test_from_records_strict() {
        let records = vec![record(), CookieRecord::new("", "x").domain("example.com")];
        let err = CookieJar::from_records(records, true).unwrap_err();
        assert!(matches!(err, Error::Cookie(_)));
    }

    #[test]
    fn test_from_records_lenient_drops_malformed() {
        let records = vec![record(), CookieRecord::new("", "x").domain("example.com")];
        let jar = CookieJar::from_records(records, false).unwrap();
        assert_eq!(jar.len(), 1);
        assert_eq!(
            jar.get_value("example.com", "/", "test").as_deref(),
            Some("123")
        );
    }

    #[test]
    fn test_extract_cookies() {
        let jar = CookieJar::new();
        let request = get("http://example.com/path");
        let mut headers = http::HeaderMap::new();
        headers.append(
            http::header::SET_COOKIE,
            http::HeaderValue::from_static("session=abc; Path=/"),
        );
        headers.append(
            http::header::SET_COOKIE,
            http::HeaderValue::from_static("not a cookie header"),
        );
        let response = Response::new(
            http::StatusCode::OK,
            headers,
            bytes::Bytes::new(),
            request.clone(),
        );
        jar.extract_cookies(&request, &response);
        assert_eq!(jar.len(), 1);
        assert_eq!(
            jar.get_value("example.com", "/", "session").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_clear() {
        let jar = CookieJar::new();
        jar.add(record()).unwrap();
        assert!(!jar.is_empty());
        jar.clear();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_json_persists_only_persistent_cookies() {
        let jar = CookieJar::new();
        jar.add(record().expires(FUTURE)).unwrap();
        jar.add(CookieRecord::new("session", "tmp").domain("example.com"))
            .unwrap();
        let json = jar.to_json().unwrap();
        let reloaded = CookieJar::from_json(&json).unwrap();
        assert_eq!(
            reloaded.get_value("example.com", "/", "test").as_deref(),
            Some("123")
        );
        assert!(reloaded.get_value("example.com", "/", "session").is_none());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let jar = CookieJar::new();
        jar.add(record().expires(FUTURE)).unwrap();
        jar.save(&path).unwrap();
        let reloaded = CookieJar::load(&path).unwrap();
        assert_eq!(
            reloaded.get_value("example.com", "/", "test").as_deref(),
            Some("123")
        );
    }
}
