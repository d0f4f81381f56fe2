// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CAPACITY, KeyValueLog, Strategy};
use crate::Value;
use crossbeam_skiplist::SkipMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
struct Inner {
    map: SkipMap<String, Arc<Value>>,
    /// Slots reserved by new keys. Keys are never removed, so this only grows.
    occupied: AtomicUsize,
}

/**
Key/value log on a lock-free skip list.

Each key is replaced atomically and no writer ever blocks another. Snapshots
come back in key order rather than insertion order.
*/
#[derive(Debug, Clone, Default)]
pub struct LockFreeValues {
    inner: Arc<Inner>,
}

impl LockFreeValues {
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve_slot(&self) -> bool {
        self.inner
            .occupied
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < CAPACITY).then_some(n + 1)
            })
            .is_ok()
    }
}

impl KeyValueLog for LockFreeValues {
    fn set(&mut self, key: &str, value: Value) {
        let map = &self.inner.map;
        let value = Arc::new(value);
        if map.contains_key(key) {
            map.insert(key.to_string(), value);
            return;
        }
        if !self.reserve_slot() {
            return;
        }
        let entry = map.get_or_insert(key.to_string(), value.clone());
        if !Arc::ptr_eq(entry.value(), &value) {
            // another writer created the key first; hand the slot back and update
            self.inner.occupied.fetch_sub(1, Ordering::AcqRel);
            map.insert(key.to_string(), value);
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.inner
            .map
            .get(key)
            .map(|entry| Value::clone(entry.value()))
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.inner
            .map
            .iter()
            .map(|entry| (entry.key().clone(), Value::clone(entry.value())))
            .collect()
    }

    fn fork(&self) -> Box<dyn KeyValueLog> {
        let copy = Inner::default();
        for entry in self.inner.map.iter() {
            copy.map.insert(entry.key().clone(), entry.value().clone());
        }
        copy.occupied.store(copy.map.len(), Ordering::Release);
        Box::new(LockFreeValues {
            inner: Arc::new(copy),
        })
    }

    fn clone_handle(&self) -> Box<dyn KeyValueLog> {
        Box::new(self.clone())
    }

    fn len(&self) -> usize {
        self.inner.map.len()
    }

    fn strategy(&self) -> Strategy {
        Strategy::LockFree
    }
}
