// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie attachment middleware
//!
//! Resolves a jar provider from the request or the connector, then installs
//! a pre-send hook (inject the `Cookie` header) and a post-receive hook
//! (feed `Set-Cookie` entries back into the jar). A request without cookie
//! configuration passes through untouched.

use http::header::{HeaderValue, COOKIE};

use crate::error::{Error, Result};
use crate::http::{PendingRequest, Response};
use crate::jar::{CookieJar, CookieRecord};

/// Name both cookie hooks register under; doubles as the reattach guard
const MIDDLEWARE_NAME: &str = "keksi.cookies";

/// Capability exposed by requests or connectors that carry a cookie jar
///
/// Returning `None` means "implemented, but no jar configured right now" —
/// a normal outcome, not an error. Not implementing the capability on
/// either object is the error.
pub trait ProvidesCookieJar: Send + Sync {
    /// The configured jar, if any
    fn cookie_jar(&self) -> Option<CookieJar>;
}

/// Input accepted by [`CookieConfig::with_cookies`]
pub enum CookieSource {
    /// Use an existing jar as-is
    Jar(CookieJar),
    /// Build a new jar from raw records
    Records(Vec<CookieRecord>),
    /// Clear the configuration
    Unset,
}

impl From<CookieJar> for CookieSource {
    fn from(jar: CookieJar) -> Self {
        Self::Jar(jar)
    }
}

impl From<Vec<CookieRecord>> for CookieSource {
    fn from(records: Vec<CookieRecord>) -> Self {
        Self::Records(records)
    }
}

impl From<Option<CookieJar>> for CookieSource {
    fn from(jar: Option<CookieJar>) -> Self {
        match jar {
            Some(jar) => Self::Jar(jar),
            None => Self::Unset,
        }
    }
}

/// Cookie configuration holder
///
/// Embed one in a connector or request type and hand it out through the
/// capability hook:
///
/// ```rust
/// use keksi::{Connector, CookieConfig, ProvidesCookieJar};
/// use url::Url;
///
/// struct Api {
///     cookies: CookieConfig,
/// }
///
/// impl Connector for Api {
///     fn base_url(&self) -> Url {
///         Url::parse("http://example.com").unwrap()
///     }
///
///     fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
///         Some(&self.cookies)
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CookieConfig {
    jar: Option<CookieJar>,
}

impl CookieConfig {
    /// Create an unset configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration
    ///
    /// Accepts an existing jar, raw records (wrapped into a new jar, with
    /// `strict` deciding whether malformed records error or drop), or
    /// [`CookieSource::Unset`] to clear. Each call replaces whatever was
    /// configured before.
    pub fn with_cookies(mut self, cookies: impl Into<CookieSource>, strict: bool) -> Result<Self> {
        self.jar = match cookies.into() {
            CookieSource::Jar(jar) => Some(jar),
            CookieSource::Records(records) => Some(CookieJar::from_records(records, strict)?),
            CookieSource::Unset => None,
        };
        Ok(self)
    }

    /// The configured jar, if any
    pub fn jar(&self) -> Option<CookieJar> {
        self.jar.clone()
    }
}

impl ProvidesCookieJar for CookieConfig {
    fn cookie_jar(&self) -> Option<CookieJar> {
        self.jar.clone()
    }
}

/// Resolve the jar for an in-flight request
///
/// The request's provider wins over the connector's; a provider that
/// returns no jar resolves to `Ok(None)`. No provider on either object is
/// a configuration error that must abort the send.
pub fn resolve_jar(pending: &PendingRequest) -> Result<Option<CookieJar>> {
    let provider = pending
        .request()
        .cookie_provider()
        .or_else(|| pending.connector().cookie_provider())
        .ok_or_else(|| {
            Error::Config(
                "neither the request nor the connector provides a cookie jar".to_string(),
            )
        })?;
    Ok(provider.cookie_jar())
}

/// Attach cookie handling to an in-flight request
///
/// With a resolved jar, installs the pre-send and post-receive hooks as a
/// pair; with no jar, installs nothing and the request behaves as if this
/// middleware did not exist. Calling it again on the same request is a
/// no-op.
pub fn attach_cookies(pending: &mut PendingRequest) -> Result<()> {
    let Some(jar) = resolve_jar(pending)? else {
        tracing::debug!(url = %pending.url(), "no cookie jar configured, skipping cookie attachment");
        return Ok(());
    };

    if pending.middleware_ref().has_request_hook(MIDDLEWARE_NAME)
        || pending.middleware_ref().has_response_hook(MIDDLEWARE_NAME)
    {
        tracing::debug!(url = %pending.url(), "cookie hooks already installed");
        return Ok(());
    }

    let send_jar = jar.clone();
    pending
        .middleware()
        .on_request_named(MIDDLEWARE_NAME, move |pending: &mut PendingRequest| {
            let wire = pending.build_request();
            let Some(value) = send_jar.cookie_header_for(&wire) else {
                return;
            };
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    // Only the Cookie header is copied back; the jar never
                    // rewrites any other part of the request.
                    pending.headers_mut().insert(COOKIE, value);
                    tracing::trace!(url = %wire.url, "cookie header attached");
                }
                Err(_) => {
                    tracing::warn!(url = %wire.url, "computed cookie header is not a valid header value");
                }
            }
        })?;
    pending
        .middleware()
        .on_response_named(MIDDLEWARE_NAME, move |response: &Response| {
            let count = response.set_cookies().len();
            jar.extract_cookies(response.request(), response);
            if count > 0 {
                tracing::trace!(url = %response.request().url, count, "stored response cookies");
            }
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Connector, Endpoint};
    use bytes::Bytes;
    use http::header::{HeaderMap, SET_COOKIE};
    use http::StatusCode;
    use std::sync::Arc;
    use url::Url;

    struct PlainConnector;

    impl Connector for PlainConnector {
        fn base_url(&self) -> Url {
            Url::parse("http://example.com").unwrap()
        }
    }

    struct JarConnector {
        cookies: CookieConfig,
    }

    impl Connector for JarConnector {
        fn base_url(&self) -> Url {
            Url::parse("http://example.com").unwrap()
        }

        fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
            Some(&self.cookies)
        }
    }

    struct PlainEndpoint;

    impl Endpoint for PlainEndpoint {
        fn endpoint(&self) -> &str {
            "/path"
        }
    }

    struct JarEndpoint {
        cookies: CookieConfig,
    }

    impl Endpoint for JarEndpoint {
        fn endpoint(&self) -> &str {
            "/path"
        }

        fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
            Some(&self.cookies)
        }
    }

    fn jar_with(name: &str, value: &str) -> CookieJar {
        let jar = CookieJar::new();
        jar.add(CookieRecord::new(name, value).domain("example.com"))
            .unwrap();
        jar
    }

    fn config_with(jar: CookieJar) -> CookieConfig {
        CookieConfig::new().with_cookies(jar, false).unwrap()
    }

    #[test]
    fn test_missing_provider_is_fatal() {
        let mut pending =
            PendingRequest::new(Arc::new(PlainConnector), Arc::new(PlainEndpoint)).unwrap();
        let err = attach_cookies(&mut pending).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(pending.middleware_ref().request_hook_count(), 0);
        assert_eq!(pending.middleware_ref().response_hook_count(), 0);
    }

    #[test]
    fn test_absent_jar_installs_nothing() {
        let connector = JarConnector {
            cookies: CookieConfig::new(),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();
        assert_eq!(pending.middleware_ref().request_hook_count(), 0);
        assert_eq!(pending.middleware_ref().response_hook_count(), 0);
        pending.run_request_middleware();
        assert!(pending.headers().is_empty());
    }

    #[test]
    fn test_hooks_installed_as_a_pair() {
        let connector = JarConnector {
            cookies: config_with(CookieJar::new()),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();
        assert_eq!(pending.middleware_ref().request_hook_count(), 1);
        assert_eq!(pending.middleware_ref().response_hook_count(), 1);
    }

    #[test]
    fn test_cookie_header_injected() {
        let connector = JarConnector {
            cookies: config_with(jar_with("test", "123")),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();
        pending.run_request_middleware();
        assert_eq!(
            pending.headers().get(COOKIE).map(|v| v.to_str().unwrap()),
            Some("test=123")
        );
    }

    #[test]
    fn test_stale_cookie_header_is_overwritten() {
        let connector = JarConnector {
            cookies: config_with(jar_with("test", "123")),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        pending
            .headers_mut()
            .insert(COOKIE, HeaderValue::from_static("stale=1"));
        attach_cookies(&mut pending).unwrap();
        pending.run_request_middleware();
        assert_eq!(
            pending.headers().get(COOKIE).map(|v| v.to_str().unwrap()),
            Some("test=123")
        );
    }

    #[test]
    fn test_empty_jar_leaves_headers_unchanged() {
        let connector = JarConnector {
            cookies: config_with(CookieJar::new()),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();
        pending.run_request_middleware();
        assert!(pending.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_set_cookie_extracted_into_jar() {
        let jar = CookieJar::new();
        let connector = JarConnector {
            cookies: config_with(jar.clone()),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();

        pending.run_request_middleware();
        let wire = pending.build_request();
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("test=123"));
        let response = Response::new(StatusCode::OK, headers, Bytes::new(), wire);
        pending.run_response_middleware(&response);

        assert_eq!(
            jar.get_value("example.com", "/", "test").as_deref(),
            Some("123")
        );
    }

    #[test]
    fn test_request_provider_takes_precedence() {
        let connector = JarConnector {
            cookies: config_with(jar_with("scope", "connector")),
        };
        let request = JarEndpoint {
            cookies: config_with(jar_with("scope", "request")),
        };
        let mut pending = PendingRequest::new(Arc::new(connector), Arc::new(request)).unwrap();
        attach_cookies(&mut pending).unwrap();
        pending.run_request_middleware();
        assert_eq!(
            pending.headers().get(COOKIE).map(|v| v.to_str().unwrap()),
            Some("scope=request")
        );
    }

    #[test]
    fn test_reattach_is_guarded() {
        let connector = JarConnector {
            cookies: config_with(jar_with("test", "123")),
        };
        let mut pending =
            PendingRequest::new(Arc::new(connector), Arc::new(PlainEndpoint)).unwrap();
        attach_cookies(&mut pending).unwrap();
        attach_cookies(&mut pending).unwrap();
        assert_eq!(pending.middleware_ref().request_hook_count(), 1);
        assert_eq!(pending.middleware_ref().response_hook_count(), 1);
        pending.run_request_middleware();
        assert_eq!(
            pending.headers().get(COOKIE).map(|v| v.to_str().unwrap()),
            Some("test=123")
        );
    }

    #[test]
    fn test_config_states() {
        let config = CookieConfig::new();
        assert!(config.jar().is_none());

        let config = config
            .with_cookies(
                vec![CookieRecord::new("test", "123").domain("example.com")],
                false,
            )
            .unwrap();
        assert!(config.jar().is_some());

        let config = config.with_cookies(CookieSource::Unset, false).unwrap();
        assert!(config.jar().is_none());
    }

    #[test]
    fn test_resolve_prefers_request_jar() {
        let connector = JarConnector {
            cookies: config_with(jar_with("scope", "connector")),
        };
        let request = JarEndpoint {
            cookies: CookieConfig::new(),
        };
        // request implements the capability with no jar: resolution must
        // yield "no jar", not fall through to the connector
        let pending = PendingRequest::new(Arc::new(connector), Arc::new(request)).unwrap();
        assert!(resolve_jar(&pending).unwrap().is_none());
    }
}
