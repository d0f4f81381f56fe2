// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CAPACITY, KeyValueLog, Strategy};
use crate::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/**
Key/value log behind a single reader/writer lock.

Clones of a `LockedValues` are handles onto the same map, so one context can be
annotated from several threads. Writers are serialized; readers run in parallel.
*/
#[derive(Debug, Clone, Default)]
pub struct LockedValues {
    map: Arc<RwLock<HashMap<String, Value>>>,
}

impl LockedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` inside one read critical section.
    ///
    /// Use this when several lookups must observe the same state; the lock is
    /// released when `f` returns.
    pub fn read_locked<R>(&self, f: impl FnOnce(&HashMap<String, Value>) -> R) -> R {
        let guard = self.map.read();
        f(&guard)
    }
}

impl KeyValueLog for LockedValues {
    fn set(&mut self, key: &str, value: Value) {
        let mut map = self.map.write();
        if let Some(slot) = map.get_mut(key) {
            *slot = value;
        } else if map.len() < CAPACITY {
            map.insert(key.to_string(), value);
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.map.read().get(key).cloned()
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.map
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn fork(&self) -> Box<dyn KeyValueLog> {
        let copy = self.map.read().clone();
        Box::new(LockedValues {
            map: Arc::new(RwLock::new(copy)),
        })
    }

    fn clone_handle(&self) -> Box<dyn KeyValueLog> {
        Box::new(self.clone())
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Locked
    }
}
