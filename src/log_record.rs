// SPDX-License-Identifier: MIT OR Apache-2.0

//! The record handed to sinks.
//!
//! A [`LogRecord`] is built once per logging call, after the level check passed,
//! and shared by reference with every sink of its band. Sinks that keep records
//! around (such as [`MemorySink`](crate::sink::MemorySink)) clone it.
//!
//! Fields are stored in the order they were gathered: context pairs first, then
//! pairs bound by a [`SubLogger`](crate::SubLogger), then call-site pairs. The
//! record never merges duplicates; encoders decide how to render them.
//!
//! ```rust
//! use ctxlog::{Level, LogRecord, Value};
//!
//! let record = LogRecord::new(Level::Info, "svc", "listening")
//!     .with_field("port", 8080u16);
//! assert_eq!(record.to_string(), "listening [port=8080]");
//! assert_eq!(record.field("port"), Some(&Value::Uint(8080)));
//! ```

use crate::{Level, Value};
use chrono::{DateTime, Local};
use std::fmt::{Debug, Display};
use std::panic::Location;

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    time: DateTime<Local>,
    name: String,
    host: Option<String>,
    location: Option<&'static Location<'static>>,
    message: String,
    stack: Option<String>,
    fields: Vec<(String, Value)>,
}

impl LogRecord {
    /// A record stamped with the current local time.
    pub fn new(level: Level, name: impl Into<String>, message: impl Into<String>) -> Self {
        LogRecord {
            level,
            time: Local::now(),
            name: name.into(),
            host: None,
            location: None,
            message: message.into(),
            stack: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: &'static Location<'static>) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Attaches a rendered stack trace.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Local>) -> Self {
        self.time = time;
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_field(key, value);
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn push_field(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The machine the record was produced on.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Stack trace captured at the call site, for error levels.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }

    /// All fields in gathering order, duplicates included.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// The last value recorded for `key`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// `file:line` of the call site, keeping only the last two path components.
    pub fn caller(&self) -> Option<String> {
        self.location.map(|location| {
            let file = location.file();
            let short = file
                .rmatch_indices(['/', '\\'])
                .nth(1)
                .map_or(file, |(idx, _)| &file[idx + 1..]);
            format!("{}:{}", short, location.line())
        })
    }
}

/// The minimal unstructured form: `message [k=v k=v]`.
impl Display for LogRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)?;
        if !self.fields.is_empty() {
            f.write_str(" [")?;
            for (i, (key, value)) in self.fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_is_last_wins() {
        let record = LogRecord::new(Level::Warn, "t", "m")
            .with_field("k", "context")
            .with_field("other", 1)
            .with_field("k", "call site");
        assert_eq!(record.fields().len(), 3);
        assert_eq!(record.field("k"), Some(&Value::from("call site")));
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn caller_is_shortened() {
        let record = LogRecord::new(Level::Info, "t", "m").at(Location::caller());
        let caller = record.caller().unwrap();
        assert!(caller.starts_with("src/log_record.rs:"), "{caller}");
        assert_eq!(LogRecord::new(Level::Info, "t", "m").caller(), None);
    }

    #[test]
    fn display_without_fields() {
        assert_eq!(LogRecord::new(Level::Info, "t", "plain").to_string(), "plain");
    }
}
