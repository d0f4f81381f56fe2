// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and trace identifiers.

use super::context_impl::Context;
use crate::values::Strategy;

/// Context key holding the request id.
pub const REQUEST_ID_KEY: &str = "reqId";
/// Context key holding the trace id.
pub const TRACE_ID_KEY: &str = "traId";
/// Length of generated ids.
pub const ID_LEN: usize = 13;

/// A fresh short unique id: the first [`ID_LEN`] characters of a random UUID.
pub fn new_id() -> String {
    let mut id = uuid::Uuid::new_v4().to_string();
    id.truncate(ID_LEN);
    id
}

impl Context {
    /// A context with freshly generated request and trace ids.
    pub fn new_tracked(strategy: Strategy) -> Context {
        let mut ctx = Context::new(strategy);
        ctx.track();
        ctx
    }

    /// Generates a request id and a trace id for whichever of the two is absent.
    pub fn track(&mut self) {
        for key in [REQUEST_ID_KEY, TRACE_ID_KEY] {
            if self.lookup_str(key).is_none_or(|id| id.is_empty()) {
                self.annotate(key, new_id());
            }
        }
    }

    /// Sets both ids, generating a fresh one in place of any empty argument.
    pub fn set_tracked(&mut self, request_id: &str, trace_id: &str) {
        let or_new = |id: &str| {
            if id.is_empty() {
                new_id()
            } else {
                id.to_string()
            }
        };
        self.annotate(REQUEST_ID_KEY, or_new(request_id));
        self.annotate(TRACE_ID_KEY, or_new(trace_id));
    }

    #[must_use]
    pub fn with_tracked(mut self, request_id: &str, trace_id: &str) -> Context {
        self.set_tracked(request_id, trace_id);
        self
    }

    pub fn request_id(&self) -> Option<String> {
        self.lookup_str(REQUEST_ID_KEY)
    }

    pub fn trace_id(&self) -> Option<String> {
        self.lookup_str(TRACE_ID_KEY)
    }

    /// `(request id, trace id)`, with a fresh id standing in for any that is missing.
    ///
    /// Does not annotate the context; use [`track`](Context::track) for that.
    pub fn tracked_ids(&self) -> (String, String) {
        let read = |id: Option<String>| id.filter(|id| !id.is_empty()).unwrap_or_else(new_id);
        (read(self.request_id()), read(self.trace_id()))
    }
}
