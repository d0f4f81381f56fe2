// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use crate::Value;
use crate::values::{KeyValueLog, Strategy, new_log};
use std::cell::RefCell;

/// Key/value metadata propagated alongside a request or task.
///
/// The log uses the [`Strategy`] the context was built with, which never
/// changes afterwards. An [`Strategy::Ordered`] log is created on first
/// annotation; shared logs exist from the start, so even an empty context
/// hands its clones the same storage.
///
/// # Cloning
///
/// `Clone` follows the strategy's sharing rule. An [`Strategy::Ordered`] context is
/// deep-copied, so two clones never share an unsynchronized log. Contexts built with
/// [`Strategy::Locked`] or [`Strategy::LockFree`] share storage between clones,
/// which lets several threads annotate the same request.
///
/// Use [`fork`](Context::fork) for an independent copy regardless of strategy.
///
/// # Examples
///
/// ```rust
/// use ctxlog::context::Context;
/// use ctxlog::values::Strategy;
///
/// let shared = Context::new(Strategy::Locked).with_value("request", "r-9");
/// let mut other_handle = shared.clone();
/// other_handle.annotate("retries", 1u8);
/// assert!(shared.lookup("retries").is_some());
/// ```
#[derive(Debug)]
pub struct Context {
    strategy: Strategy,
    values: Option<Box<dyn KeyValueLog>>,
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Context {
            strategy: self.strategy,
            values: self.values.as_ref().map(|v| v.clone_handle()),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Strategy::default())
    }
}

thread_local! {
    static CURRENT: RefCell<Context> = RefCell::new(Context::default());
}

impl Context {
    /// An empty context whose log will use `strategy`.
    pub fn new(strategy: Strategy) -> Context {
        let values = match strategy {
            Strategy::Ordered => None,
            Strategy::Locked | Strategy::LockFree => Some(new_log(strategy)),
        };
        Context { strategy, values }
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Attaches or replaces `key` in place.
    pub fn annotate(&mut self, key: &str, value: impl Into<Value>) {
        let strategy = self.strategy;
        self.values
            .get_or_insert_with(|| new_log(strategy))
            .set(key, value.into());
    }

    /// Value-style [`annotate`](Context::annotate).
    #[must_use]
    pub fn with_value(mut self, key: &str, value: impl Into<Value>) -> Context {
        self.annotate(key, value);
        self
    }

    /// Like [`annotate`](Context::annotate), but does nothing when `value` is empty.
    pub fn annotate_if_non_empty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.annotate(key, value);
        }
    }

    #[must_use]
    pub fn with_value_if_non_empty(mut self, key: &str, value: &str) -> Context {
        self.annotate_if_non_empty(key, value);
        self
    }

    /// An independent deep copy of this context.
    ///
    /// Annotations made on either side afterwards are invisible to the other.
    pub fn fork(&self) -> Context {
        Context {
            strategy: self.strategy,
            values: self.values.as_ref().map(|v| v.fork()),
        }
    }

    /// The accumulated pairs, as they should be rendered.
    pub fn values(&self) -> Vec<(String, Value)> {
        self.values
            .as_ref()
            .map(|v| v.snapshot())
            .unwrap_or_default()
    }

    pub fn lookup(&self, key: &str) -> Option<Value> {
        self.values.as_ref().and_then(|v| v.get(key))
    }

    /// Looks up `key`, returning `None` if it is missing or not a string.
    pub fn lookup_str(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current context for this thread.
    ///
    /// Every thread starts with an empty [`Strategy::Ordered`] context.
    pub fn current() -> Context {
        CURRENT
            .try_with(|c| c.borrow().clone())
            .unwrap_or_default()
    }

    /// Installs this context as the thread's current context, returning the previous one.
    pub fn set_current(self) -> Context {
        CURRENT
            .try_with(|c| c.replace(self))
            .unwrap_or_default()
    }

    /// Annotates the thread's current context in place.
    pub fn annotate_current(key: &str, value: impl Into<Value>) {
        let value = value.into();
        // during thread teardown there is no context left to annotate
        let _ = CURRENT.try_with(|c| c.borrow_mut().annotate(key, value));
    }

    /// Pairs of the current context, without cloning the context itself.
    pub(crate) fn current_values() -> Vec<(String, Value)> {
        CURRENT
            .try_with(|c| c.borrow().values())
            .unwrap_or_default()
    }
}
