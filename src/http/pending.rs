// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! In-flight request and the connector/endpoint traits
//!
//! A [`Connector`] owns base configuration for a family of requests; an
//! [`Endpoint`] describes one request against it. Both can opt into the
//! cookie jar capability by overriding [`Connector::cookie_provider`] /
//! [`Endpoint::cookie_provider`]; the default is "does not implement",
//! which is distinct from "implements but has no jar configured".

use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderMap;
use http::Method;
use url::Url;

use crate::attach::ProvidesCookieJar;
use crate::error::Result;

use super::{MiddlewarePipeline, Request, Response};

/// Base configuration shared by a family of requests
pub trait Connector: Send + Sync {
    /// Base URL endpoints are resolved against
    fn base_url(&self) -> Url;

    /// Cookie jar capability hook
    ///
    /// Return `Some` to expose a jar provider at connector scope.
    fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
        None
    }
}

/// A single request definition against a connector
pub trait Endpoint: Send + Sync {
    /// Path resolved against the connector's base URL
    fn endpoint(&self) -> &str;

    /// Request method
    fn method(&self) -> Method {
        Method::GET
    }

    /// Cookie jar capability hook
    ///
    /// Return `Some` to expose a jar provider at request scope. Request
    /// scope wins over connector scope when both are present.
    fn cookie_provider(&self) -> Option<&dyn ProvidesCookieJar> {
        None
    }
}

/// Mutable in-flight request
///
/// Holds the resolved target, the header bag, and the middleware pipeline.
/// Plugins mutate it only through the header bag and hook registration; the
/// host client drives the actual send.
pub struct PendingRequest {
    connector: Arc<dyn Connector>,
    request: Arc<dyn Endpoint>,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    middleware: MiddlewarePipeline,
}

impl PendingRequest {
    /// Prepare a request: resolve the target URL from connector and endpoint
    pub fn new(connector: Arc<dyn Connector>, request: Arc<dyn Endpoint>) -> Result<Self> {
        let url = connector.base_url().join(request.endpoint())?;
        let method = request.method();
        Ok(Self {
            connector,
            request,
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            middleware: MiddlewarePipeline::new(),
        })
    }

    /// The connector this request goes through
    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    /// The request definition being sent
    pub fn request(&self) -> &dyn Endpoint {
        self.request.as_ref()
    }

    /// Resolved request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Resolved target URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Header bag
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable header bag
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set the request body
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = Some(body.into());
    }

    /// The middleware pipeline
    pub fn middleware(&mut self) -> &mut MiddlewarePipeline {
        &mut self.middleware
    }

    /// Read-only view of the middleware pipeline
    pub fn middleware_ref(&self) -> &MiddlewarePipeline {
        &self.middleware
    }

    /// Snapshot the wire-level representation of this request
    pub fn build_request(&self) -> Request {
        Request {
            method: self.method.clone(),
            url: self.url.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Run the pre-send hooks
    ///
    /// The pipeline is detached while it runs so hooks can mutate this
    /// request freely; hooks registered during the run are kept.
    pub fn run_request_middleware(&mut self) {
        let pipeline = std::mem::take(&mut self.middleware);
        pipeline.run_request_hooks(self);
        let added = std::mem::replace(&mut self.middleware, pipeline);
        self.middleware.merge(added);
    }

    /// Run the post-receive hooks against a received response
    pub fn run_response_middleware(&self, response: &Response) {
        self.middleware.run_response_hooks(response);
    }
}
