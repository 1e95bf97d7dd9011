// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for Keksi
//!
//! `Config` is the one fatal error: it aborts request preparation before any
//! network I/O. Everything else wraps a collaborator failure.

use thiserror::Error;

/// Result type alias for Keksi operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Keksi
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the request nor the connector exposes a cookie jar provider
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed cookie record or jar (de)serialization failure
    #[error("Cookie error: {0}")]
    Cookie(String),

    /// Duplicate named middleware registration
    #[error("Middleware error: {0}")]
    Middleware(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
