// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Keksi - Cookie Jar Middleware
//!
//! Attaches cookie-jar semantics to an HTTP client's request lifecycle.
//! No transport of its own - the host client sends; Keksi keeps the jar
//! and the wire in sync.
//!
//! ## Features
//!
//! - Provider discovery: request-scoped jar wins over connector-scoped
//! - `Cookie` header injection on outgoing requests
//! - `Set-Cookie` capture from responses, scoped to the originating URL
//! - Jar seeding from raw records, strict or lenient
//! - JSON/file persistence of persistent cookies
//! - Matching, expiry and storage delegated to `cookie_store`
//!
//! ## Example
//!
//! ```rust
//! use keksi::{attach_cookies, Connector, CookieConfig, CookieRecord, Endpoint,
//!             PendingRequest, ProvidesCookieJar};
//! use std::sync::Arc;
//! use url::Url;
//!
//! struct Api {
//!     cookies: CookieConfig,
//! }
//!
//! impl Connector for Api {
//!     fn base_url(&self) -> Url {
//!         Url::parse("http://example.com").unwrap()
//!     }
//!
//!     fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
//!         Some(&self.cookies)
//!     }
//! }
//!
//! struct Ping;
//!
//! impl Endpoint for Ping {
//!     fn endpoint(&self) -> &str {
//!         "/ping"
//!     }
//! }
//!
//! # fn main() -> keksi::Result<()> {
//! let api = Api {
//!     cookies: CookieConfig::new().with_cookies(
//!         vec![CookieRecord::new("session", "abc123").domain("example.com")],
//!         false,
//!     )?,
//! };
//!
//! let mut pending = PendingRequest::new(Arc::new(api), Arc::new(Ping))?;
//! attach_cookies(&mut pending)?;
//!
//! // the host client runs the hooks around its send; simulated here
//! pending.run_request_middleware();
//! assert!(pending.headers().contains_key("cookie"));
//! # Ok(())
//! # }
//! ```

pub mod attach;
pub mod error;
pub mod http;
pub mod jar;

// Re-exports for convenience

// Middleware
pub use attach::{attach_cookies, resolve_jar, CookieConfig, CookieSource, ProvidesCookieJar};

// Errors
pub use error::{Error, Result};

// Pipeline surface
pub use http::{Connector, Endpoint, MiddlewarePipeline, PendingRequest, Request, Response};

// Jar
pub use jar::{CookieJar, CookieRecord, SameSite};

/// Keksi version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
