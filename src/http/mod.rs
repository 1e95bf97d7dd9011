// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Wire types and pipeline surface shared with the host HTTP client
//!
//! Keksi owns no transport. This module models the slice of the host
//! client's lifecycle the cookie hooks touch: the in-flight request, its
//! wire-level snapshot, the received response, and the middleware pipeline.

mod middleware;
mod pending;
mod request;
mod response;

pub use middleware::MiddlewarePipeline;
pub use pending::{Connector, Endpoint, PendingRequest};
pub use request::Request;
pub use response::Response;
