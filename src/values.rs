// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded key/value accumulators attached to a [`Context`](crate::context::Context).
//!
//! A log accumulates the metadata of one request or task. Every implementation
//! upholds the same contract:
//!
//! * keys are unique; setting an existing key replaces its value in place
//! * at most [`CAPACITY`] keys are held; further *new* keys are silently dropped,
//!   while updates to keys already present always succeed
//! * [`KeyValueLog::fork`] returns an independent deep copy
//!
//! Three strategies trade concurrency safety for speed, and the choice is made
//! once, when the owning context is built:
//!
//! | Strategy              | Storage                      | Sharing between clones | Snapshot order  |
//! |-----------------------|------------------------------|------------------------|-----------------|
//! | [`Strategy::Ordered`] | flat vector, no locking      | never (clone copies)   | insertion order |
//! | [`Strategy::Locked`]  | map behind a reader/writer lock | shared              | unspecified     |
//! | [`Strategy::LockFree`]| lock-free skip list          | shared                 | key order       |
//!
//! ```rust
//! use ctxlog::values::{new_log, Strategy};
//!
//! let mut log = new_log(Strategy::Ordered);
//! log.set("user", "alice".into());
//! log.set("attempt", 1.into());
//! log.set("user", "bob".into());
//! assert_eq!(log.get("user").unwrap().as_str(), Some("bob"));
//! assert_eq!(log.snapshot()[0].0, "user");
//! ```

mod locked;
mod lockfree;
mod ordered;

pub use locked::LockedValues;
pub use lockfree::LockFreeValues;
pub use ordered::OrderedValues;

use crate::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Maximum number of distinct keys a log holds.
pub const CAPACITY: usize = 100;

/// Concurrency-safety strategy of a [`KeyValueLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Single owner, insertion ordered. Never shared; cloning copies.
    #[default]
    Ordered,
    /// Shared map guarded by one reader/writer lock.
    Locked,
    /// Shared lock-free map.
    LockFree,
}

/// The capability set every key/value strategy provides.
pub trait KeyValueLog: Debug + Send + Sync {
    /// Inserts or replaces `key`. New keys beyond [`CAPACITY`] are dropped.
    fn set(&mut self, key: &str, value: Value);

    fn get(&self, key: &str) -> Option<Value>;

    /// All pairs, for rendering. Only [`Strategy::Ordered`] guarantees insertion order.
    fn snapshot(&self) -> Vec<(String, Value)>;

    /// An independent deep copy; later writes to either side are invisible to the other.
    fn fork(&self) -> Box<dyn KeyValueLog>;

    /// Another handle for this log.
    ///
    /// Shared strategies return a handle onto the same storage. [`Strategy::Ordered`]
    /// cannot be shared safely and returns a fork instead.
    fn clone_handle(&self) -> Box<dyn KeyValueLog>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn strategy(&self) -> Strategy;
}

/// Builds an empty log for `strategy`.
pub fn new_log(strategy: Strategy) -> Box<dyn KeyValueLog> {
    match strategy {
        Strategy::Ordered => Box::new(OrderedValues::new()),
        Strategy::Locked => Box::new(LockedValues::new()),
        Strategy::LockFree => Box::new(LockFreeValues::new()),
    }
}
