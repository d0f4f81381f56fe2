// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! [`MemorySink`] keeps every record it receives, which makes it the tool of
//! choice for tests that need to see what was logged, with which fields, and in
//! which band.

use super::Sink;
use crate::error::Result;
use crate::log_record::LogRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A sink that stores records in memory.
///
/// # Example
///
/// ```rust
/// use ctxlog::sink::MemorySink;
/// use ctxlog::{Band, Context, LogConfig, LogCore, RouterBuilder};
/// use std::sync::Arc;
///
/// let errors = Arc::new(MemorySink::new());
/// let core = LogCore::new();
/// let config = LogConfig { console: false, ..Default::default() };
/// core.init_with(RouterBuilder::new(config).sink(Band::Error, errors.clone()))
///     .unwrap();
///
/// let ctx = Context::default().with_value("order", 17u32);
/// core.error(Some(&ctx), "payment declined");
/// core.info(Some(&ctx), "retrying");
///
/// let records = errors.drain();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].message(), "payment declined");
/// ```
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
    closes: AtomicUsize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Takes the records received so far, leaving the sink empty.
    pub fn drain(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Drains all records into one string, one unstructured line per record.
    pub fn drain_lines(&self) -> String {
        self.drain()
            .iter()
            .map(LogRecord::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times [`Sink::close`] was called.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }
}

impl Sink for MemorySink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    #[test]
    fn drain_empties_the_sink() {
        let sink = MemorySink::new();
        sink.write(&LogRecord::new(Level::Info, "t", "first")).unwrap();
        sink.write(&LogRecord::new(Level::Warn, "t", "second").with_field("n", 2))
            .unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.drain_lines(), "first\nsecond [n=2]");
        assert!(sink.is_empty());
        assert_eq!(sink.drain_lines(), "");
    }
}
