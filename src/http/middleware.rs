// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Middleware pipeline with pre-send and post-receive hooks

use crate::error::{Error, Result};

use super::{PendingRequest, Response};

/// Pre-send hook: mutates the in-flight request before transmission
pub type RequestHook = Box<dyn Fn(&mut PendingRequest) + Send + Sync>;

/// Post-receive hook: observes the response after transmission
pub type ResponseHook = Box<dyn Fn(&Response) + Send + Sync>;

struct NamedHook<F> {
    name: Option<String>,
    callback: F,
}

/// Ordered hook registry for a single in-flight request
///
/// Hooks can be registered anonymously or under a unique name. Names exist
/// so a plugin can detect its own prior registration; a duplicate name is
/// rejected rather than silently stacked.
#[derive(Default)]
pub struct MiddlewarePipeline {
    request_hooks: Vec<NamedHook<RequestHook>>,
    response_hooks: Vec<NamedHook<ResponseHook>>,
}

impl MiddlewarePipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pre-send hook
    pub fn on_request<F>(&mut self, hook: F)
    where
        F: Fn(&mut PendingRequest) + Send + Sync + 'static,
    {
        self.request_hooks.push(NamedHook {
            name: None,
            callback: Box::new(hook),
        });
    }

    /// Register a pre-send hook under a unique name
    pub fn on_request_named<F>(&mut self, name: impl Into<String>, hook: F) -> Result<()>
    where
        F: Fn(&mut PendingRequest) + Send + Sync + 'static,
    {
        let name = name.into();
        if self.has_request_hook(&name) {
            return Err(Error::Middleware(format!(
                "request hook '{name}' is already registered"
            )));
        }
        self.request_hooks.push(NamedHook {
            name: Some(name),
            callback: Box::new(hook),
        });
        Ok(())
    }

    /// Register a post-receive hook
    pub fn on_response<F>(&mut self, hook: F)
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        self.response_hooks.push(NamedHook {
            name: None,
            callback: Box::new(hook),
        });
    }

    /// Register a post-receive hook under a unique name
    pub fn on_response_named<F>(&mut self, name: impl Into<String>, hook: F) -> Result<()>
    where
        F: Fn(&Response) + Send + Sync + 'static,
    {
        let name = name.into();
        if self.has_response_hook(&name) {
            return Err(Error::Middleware(format!(
                "response hook '{name}' is already registered"
            )));
        }
        self.response_hooks.push(NamedHook {
            name: Some(name),
            callback: Box::new(hook),
        });
        Ok(())
    }

    /// Check whether a named pre-send hook is registered
    pub fn has_request_hook(&self, name: &str) -> bool {
        self.request_hooks
            .iter()
            .any(|h| h.name.as_deref() == Some(name))
    }

    /// Check whether a named post-receive hook is registered
    pub fn has_response_hook(&self, name: &str) -> bool {
        self.response_hooks
            .iter()
            .any(|h| h.name.as_deref() == Some(name))
    }

    /// Number of registered pre-send hooks
    pub fn request_hook_count(&self) -> usize {
        self.request_hooks.len()
    }

    /// Number of registered post-receive hooks
    pub fn response_hook_count(&self) -> usize {
        self.response_hooks.len()
    }

    /// Run every pre-send hook in registration order
    pub(super) fn run_request_hooks(&self, pending: &mut PendingRequest) {
        for hook in &self.request_hooks {
            (hook.callback)(pending);
        }
    }

    /// Run every post-receive hook in registration order
    pub(super) fn run_response_hooks(&self, response: &Response) {
        for hook in &self.response_hooks {
            (hook.callback)(response);
        }
    }

    /// Append another pipeline's hooks after this one's
    pub(super) fn merge(&mut self, other: MiddlewarePipeline) {
        self.request_hooks.extend(other.request_hooks);
        self.response_hooks.extend(other.response_hooks);
    }
}
