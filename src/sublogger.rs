// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named sub-loggers.
//!
//! A component that always logs under the same tag and with the same fields
//! binds them once:
//!
//! ```rust
//! use ctxlog::{LogConfig, LogCore, RouterBuilder, Value};
//! use ctxlog::sink::MemorySink;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(MemorySink::new());
//! let core = LogCore::new();
//! core.init_with(
//!     RouterBuilder::new(LogConfig { console: false, ..Default::default() })
//!         .sink_all(sink.clone()),
//! )
//! .unwrap();
//!
//! let cfg = core.sub_logger("cfg").with("file", "app.toml");
//! cfg.info(None, "reloaded");
//!
//! let record = &sink.drain()[0];
//! assert_eq!(record.message(), "[cfg] reloaded");
//! assert_eq!(record.field("file"), Some(&Value::from("app.toml")));
//! ```

use crate::context::Context;
use crate::level::Level;
use crate::log_core::{LogCore, level_methods};
use crate::value::Value;

/// A view of a [`LogCore`] with a message template and pre-bound fields.
///
/// Bound fields are placed between the context's pairs and the call site's.
/// The caller's context is never touched.
#[derive(Debug, Clone)]
pub struct SubLogger<'a> {
    core: &'a LogCore,
    template: String,
    fields: Vec<(String, Value)>,
}

impl<'a> SubLogger<'a> {
    /// A sub-logger whose messages replace the first `{}` of `template`.
    ///
    /// A template without `{}` gets the message appended.
    pub fn new(core: &'a LogCore, template: impl Into<String>) -> Self {
        SubLogger {
            core,
            template: template.into(),
            fields: Vec::new(),
        }
    }

    /// Binds one more field.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    fn render(&self, msg: &str) -> String {
        if self.template.contains("{}") {
            self.template.replacen("{}", msg, 1)
        } else {
            format!("{}{}", self.template, msg)
        }
    }

    level_methods! {
        Debug => debug, debugw;
        Info => info, infow;
        Warn => warn, warnw;
        Error => error, errorw;
        DPanic => dpanic, dpanicw;
        Panic => panic, panicw;
        Fatal => fatal, fatalw;
    }

    /// Logs through the underlying core with the template applied.
    #[track_caller]
    pub fn log_at(
        &self,
        level: Level,
        ctx: Option<&Context>,
        msg: impl Into<String>,
        fields: Vec<(String, Value)>,
    ) {
        let msg: String = msg.into();
        let mut bound = self.fields.clone();
        bound.extend(fields);
        self.core.log_at(level, ctx, self.render(&msg), bound)
    }
}
