// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{CAPACITY, KeyValueLog, Strategy};
use crate::Value;

/**
Insertion-ordered key/value log with no synchronization.

Lookups are a linear scan, which beats hashing at the sizes a request context
reaches. The log must have a single owner; hand a [`fork`](KeyValueLog::fork)
to any other task that needs to write.
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedValues {
    pairs: Vec<(String, Value)>,
}

impl OrderedValues {
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Borrowing iterator over the pairs, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl KeyValueLog for OrderedValues {
    fn set(&mut self, key: &str, value: Value) {
        if let Some((_, slot)) = self.pairs.iter_mut().find(|(k, _)| k == key) {
            *slot = value;
        } else if self.pairs.len() < CAPACITY {
            self.pairs.push((key.to_string(), value));
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn snapshot(&self) -> Vec<(String, Value)> {
        self.pairs.clone()
    }

    fn fork(&self) -> Box<dyn KeyValueLog> {
        Box::new(self.clone())
    }

    fn clone_handle(&self) -> Box<dyn KeyValueLog> {
        self.fork()
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_keeps_position() {
        let mut log = OrderedValues::new();
        log.set("first", 1.into());
        log.set("second", 2.into());
        log.set("third", 3.into());
        log.set("first", "again".into());

        let keys: Vec<_> = log.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["first", "second", "third"]);
        assert_eq!(log.snapshot()[0].1, Value::from("again"));
    }
}
