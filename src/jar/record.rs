// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Raw cookie attribute records

use cookie::Cookie;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

use crate::error::{Error, Result};

/// A single cookie as a raw attribute record
///
/// The seed/persistence form of a cookie: what you write in configuration
/// or read back out of a saved jar. Matching semantics live in the store,
/// not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieRecord {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to
    #[serde(default)]
    pub domain: String,
    /// Path the cookie is valid for
    #[serde(default = "default_path")]
    pub path: String,
    /// Expiration as unix seconds (None = session cookie)
    #[serde(default)]
    pub expires: Option<i64>,
    /// Secure flag (HTTPS only)
    #[serde(default)]
    pub secure: bool,
    /// HttpOnly flag
    #[serde(default)]
    pub http_only: bool,
    /// SameSite attribute
    #[serde(default)]
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

impl From<SameSite> for cookie::SameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::None => cookie::SameSite::None,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::Strict => cookie::SameSite::Strict,
        }
    }
}

fn default_path() -> String {
    "/".to_string()
}

impl CookieRecord {
    /// Create a new record
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: default_path(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set expiration as unix seconds
    pub fn expires(mut self, unix_seconds: i64) -> Self {
        self.expires = Some(unix_seconds);
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set same_site attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Check if the record is expired
    pub fn is_expired(&self) -> bool {
        self.expires
            .map_or(false, |ts| ts < OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Validate the record's shape
    ///
    /// Name and domain must be present, and the name must be free of
    /// separator characters. Strict-mode jar construction turns a failure
    /// here into an error; lenient mode drops the record.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Cookie("cookie name must not be empty".to_string()));
        }
        if self
            .name
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || matches!(c, ';' | ',' | '='))
        {
            return Err(Error::Cookie(format!(
                "cookie name '{}' contains separator characters",
                self.name
            )));
        }
        if self.domain.is_empty() {
            return Err(Error::Cookie(format!(
                "cookie '{}' has no domain",
                self.name
            )));
        }
        Ok(())
    }

    /// URL this record is scoped to, synthesized from its own attributes
    pub(crate) fn scope_url(&self) -> Result<Url> {
        let scheme = if self.secure { "https" } else { "http" };
        let domain = self.domain.trim_start_matches('.');
        let path = if self.path.starts_with('/') {
            self.path.as_str()
        } else {
            "/"
        };
        Ok(Url::parse(&format!("{scheme}://{domain}{path}"))?)
    }

    /// Convert into a raw cookie for storage
    pub(crate) fn into_cookie(self) -> Cookie<'static> {
        let domain = self.domain.trim_start_matches('.').to_string();
        let mut builder = Cookie::build((self.name, self.value))
            .domain(domain)
            .path(self.path)
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site.into());
        if let Some(ts) = self.expires {
            if let Ok(at) = OffsetDateTime::from_unix_timestamp(ts) {
                builder = builder.expires(at);
            }
        }
        builder.build()
    }
}
