// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turning records into bytes.
//!
//! File sinks write one JSON object per line:
//!
//! ```text
//! {"dt":"2026-10-19T09:12:01.532+0200","lv":"info","name":"svc","cal":"src/api.rs:88","msg":"hello","host":"web-3","reqId":"6f1c2e0a-93b1"}
//! ```
//!
//! Console sinks write a line meant for people:
//!
//! ```text
//! 2026-10-19T09:12:01+02:00 [INFO] svc@web-3 [src/api.rs:88]: hello {"reqId":"6f1c2e0a-93b1"}
//! ```
//!
//! A record carrying a stack trace gets it under `st` in JSON, and on the
//! lines following the console line.
//!
//! In both forms a key seen twice keeps the position of its first occurrence and
//! the value of its last.

use crate::error::Result;
use crate::log_record::LogRecord;
use chrono::SecondsFormat;
use serde_json::{Map, Value as Json};
use std::fmt::Debug;
use std::io::Write;

/// ISO-8601 local time with milliseconds and numeric offset.
const ISO8601: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

pub trait Encoder: Debug + Send + Sync {
    /// Appends the encoded record, including its trailing newline, to `buf`.
    fn encode(&self, record: &LogRecord, buf: &mut Vec<u8>) -> Result<()>;
}

/// Newline-delimited JSON with the fixed keys `dt`, `lv`, `name`, `cal` and `msg`,
/// followed by `st` and `host` when the record has them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn encode(&self, record: &LogRecord, buf: &mut Vec<u8>) -> Result<()> {
        let mut object = Map::new();
        object.insert(
            "dt".to_string(),
            Json::String(record.time().format(ISO8601).to_string()),
        );
        object.insert("lv".to_string(), Json::String(record.level().as_str().to_string()));
        object.insert("name".to_string(), Json::String(record.name().to_string()));
        if let Some(caller) = record.caller() {
            object.insert("cal".to_string(), Json::String(caller));
        }
        object.insert("msg".to_string(), Json::String(record.message().to_string()));
        if let Some(stack) = record.stack() {
            object.insert("st".to_string(), Json::String(stack.to_string()));
        }
        if let Some(host) = record.host() {
            object.insert("host".to_string(), Json::String(host.to_string()));
        }
        for (key, value) in record.fields() {
            object.insert(key.clone(), value.to_json());
        }
        serde_json::to_writer(&mut *buf, &object)?;
        buf.push(b'\n');
        Ok(())
    }
}

/// Human-readable single line, fields appended as a JSON object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConsoleEncoder;

impl Encoder for ConsoleEncoder {
    fn encode(&self, record: &LogRecord, buf: &mut Vec<u8>) -> Result<()> {
        let time = record.time().to_rfc3339_opts(SecondsFormat::Secs, false);
        push_fmt(buf, format_args!("{} [{}]", time, record.level().as_capital_str()));
        match record.host() {
            Some(host) => push_fmt(buf, format_args!(" {}@{}", record.name(), host)),
            None if !record.name().is_empty() => push_fmt(buf, format_args!(" {}", record.name())),
            None => {}
        }
        if let Some(caller) = record.caller() {
            push_fmt(buf, format_args!(" [{}]", caller));
        }
        push_fmt(buf, format_args!(": {}", record.message()));
        if !record.fields().is_empty() {
            let mut fields = Map::new();
            for (key, value) in record.fields() {
                fields.insert(key.clone(), value.to_json());
            }
            buf.push(b' ');
            serde_json::to_writer(&mut *buf, &fields)?;
        }
        buf.push(b'\n');
        if let Some(stack) = record.stack() {
            buf.extend_from_slice(stack.trim_end().as_bytes());
            buf.push(b'\n');
        }
        Ok(())
    }
}

fn push_fmt(buf: &mut Vec<u8>, args: std::fmt::Arguments<'_>) {
    // writing into a Vec cannot fail
    let _ = buf.write_fmt(args);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;

    fn decode(line: &[u8]) -> Map<String, Json> {
        assert_eq!(line.last(), Some(&b'\n'));
        serde_json::from_slice(line).unwrap()
    }

    #[test]
    fn json_fixed_keys_come_first() {
        let record = LogRecord::new(Level::Warn, "svc", "disk low")
            .at(std::panic::Location::caller())
            .with_field("free_mb", 12u32);
        let mut buf = Vec::new();
        JsonEncoder.encode(&record, &mut buf).unwrap();

        let object = decode(&buf);
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["dt", "lv", "name", "cal", "msg", "free_mb"]);
        assert_eq!(object["lv"], "warn");
        assert_eq!(object["msg"], "disk low");
        assert_eq!(object["free_mb"], 12);
        assert!(object["cal"].as_str().unwrap().contains("encoder.rs:"));
    }

    #[test]
    fn json_host_and_stack_follow_the_message() {
        let record = LogRecord::new(Level::Error, "svc", "failed")
            .with_host("web-3")
            .with_stack("0: main")
            .with_field("code", 5);
        let mut buf = Vec::new();
        JsonEncoder.encode(&record, &mut buf).unwrap();

        let object = decode(&buf);
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["dt", "lv", "name", "msg", "st", "host", "code"]);
        assert_eq!(object["host"], "web-3");
        assert_eq!(object["st"], "0: main");
    }

    #[test]
    fn json_last_value_wins() {
        let record = LogRecord::new(Level::Info, "svc", "m")
            .with_field("user", "from-context")
            .with_field("user", "from-call-site");
        let mut buf = Vec::new();
        JsonEncoder.encode(&record, &mut buf).unwrap();
        assert_eq!(decode(&buf)["user"], "from-call-site");
    }

    #[test]
    fn console_line_layout() {
        let record = LogRecord::new(Level::Error, "svc", "boom").with_field("code", 7);
        let mut buf = Vec::new();
        ConsoleEncoder.encode(&record, &mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.contains(" [ERROR] svc: boom {\"code\":7}\n"), "{line}");
    }

    #[test]
    fn console_name_carries_the_host() {
        let record = LogRecord::new(Level::Warn, "svc", "slow").with_host("web-3");
        let mut buf = Vec::new();
        ConsoleEncoder.encode(&record, &mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with(" [WARN] svc@web-3: slow\n"), "{line}");
    }

    #[test]
    fn console_stack_goes_below_the_line() {
        let record = LogRecord::new(Level::Error, "svc", "boom").with_stack("0: main\n1: start\n");
        let mut buf = Vec::new();
        ConsoleEncoder.encode(&record, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" [ERROR] svc: boom"), "{text}");
        assert_eq!(lines[1..], ["0: main", "1: start"]);
        assert!(text.ends_with("1: start\n"));
    }

    #[test]
    fn console_line_without_fields() {
        let record = LogRecord::new(Level::Info, "", "ready");
        let mut buf = Vec::new();
        ConsoleEncoder.encode(&record, &mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.ends_with(" [INFO]: ready\n"), "{line}");
    }
}
