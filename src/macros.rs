// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging macros.
//!
//! Each level has a macro taking, in order:
//!
//! 1. optionally `core: <&LogCore>,` to log through a specific core instead of
//!    [`LogCore::global`](crate::LogCore::global)
//! 2. optionally `ctx: <&Context>,` to log with an explicit context instead of
//!    the thread's current one
//! 3. a `format!` template and its arguments
//! 4. optionally `; key => value, ...` for call-site fields
//!
//! ```rust
//! use ctxlog::{Context, LogConfig, LogCore, RouterBuilder, Value};
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
//! let ctx = Context::default().with_value("req", "r1");
//! let attempt = 3;
//! ctxlog::warn!(core: &core, ctx: &ctx, "retry {attempt} of {}", 5; "backoff_ms" => 200u32);
//!
//! let record = &sink.drain()[0];
//! assert_eq!(record.message(), "retry 3 of 5");
//! assert_eq!(record.field("req"), Some(&Value::from("r1")));
//! assert_eq!(record.field("backoff_ms"), Some(&Value::Uint(200)));
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    // split the template from the fields at the first top-level `;`
    (@split $level:expr, $core:expr, $ctx:expr, [$($fmt:tt)*] ; $($key:expr => $value:expr),* $(,)?) => {
        $core.log_at(
            $level,
            $ctx,
            ::std::format!($($fmt)*),
            ::std::vec![$((::std::string::String::from($key), $crate::Value::from($value))),*],
        )
    };
    (@split $level:expr, $core:expr, $ctx:expr, [$($fmt:tt)*] $next:tt $($rest:tt)*) => {
        $crate::__log!(@split $level, $core, $ctx, [$($fmt)* $next] $($rest)*)
    };
    (@split $level:expr, $core:expr, $ctx:expr, [$($fmt:tt)*]) => {
        $core.log_at($level, $ctx, ::std::format!($($fmt)*), ::std::vec::Vec::new())
    };
    ($level:expr, core: $core:expr, ctx: $ctx:expr, $($rest:tt)+) => {
        $crate::__log!(@split $level, $core, ::std::option::Option::Some($ctx), [] $($rest)+)
    };
    ($level:expr, core: $core:expr, $($rest:tt)+) => {
        $crate::__log!(@split $level, $core, ::std::option::Option::None, [] $($rest)+)
    };
    ($level:expr, ctx: $ctx:expr, $($rest:tt)+) => {
        $crate::__log!(@split $level, $crate::LogCore::global(), ::std::option::Option::Some($ctx), [] $($rest)+)
    };
    ($level:expr, $($rest:tt)+) => {
        $crate::__log!(@split $level, $crate::LogCore::global(), ::std::option::Option::None, [] $($rest)+)
    };
}

/// Logs at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Debug, $($args)+) };
}

/// Logs at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Info, $($args)+) };
}

/// Logs at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Warn, $($args)+) };
}

/// Logs at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Error, $($args)+) };
}

/// Logs at [`Level::DPanic`](crate::Level::DPanic); panics afterwards in development mode.
#[macro_export]
macro_rules! dpanic {
    ($($args:tt)+) => { $crate::__log!($crate::Level::DPanic, $($args)+) };
}

/// Logs at [`Level::Panic`](crate::Level::Panic), then panics.
///
/// Invoke it by path (`ctxlog::panic!`) to keep it apart from `std::panic!`.
#[macro_export]
macro_rules! panic {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Panic, $($args)+) };
}

/// Logs at [`Level::Fatal`](crate::Level::Fatal), closes the core and exits the process.
#[macro_export]
macro_rules! fatal {
    ($($args:tt)+) => { $crate::__log!($crate::Level::Fatal, $($args)+) };
}

#[cfg(test)]
mod tests {
    use crate::sink::MemorySink;
    use crate::{Context, Level, LogConfig, LogCore, RouterBuilder, Value};
    use std::sync::Arc;

    fn core() -> (LogCore, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let core = LogCore::new();
        core.init_with(
            RouterBuilder::new(LogConfig {
                console: false,
                ..Default::default()
            })
            .sink_all(sink.clone()),
        )
        .unwrap();
        (core, sink)
    }

    #[test]
    fn template_only() {
        let (core, sink) = core();
        crate::info!(core: &core, "plain");
        crate::error!(core: &core, "code {}", 42);
        let records = sink.drain();
        assert_eq!(records[0].message(), "plain");
        assert_eq!(records[1].message(), "code 42");
        assert_eq!(records[1].level(), Level::Error);
    }

    #[test]
    fn fields_after_semicolon() {
        let (core, sink) = core();
        let user = "alice";
        crate::debug!(core: &core, "login {user}"; "user" => user, "admin" => false,);
        let records = sink.drain();
        assert_eq!(records[0].message(), "login alice");
        assert_eq!(records[0].field("admin"), Some(&Value::Bool(false)));
        assert_eq!(records[0].fields().len(), 2);
    }

    #[test]
    fn explicit_context() {
        let (core, sink) = core();
        let ctx = Context::default().with_value("req", "r7");
        crate::warn!(core: &core, ctx: &ctx, "with ctx"; "n" => 1);
        let record = &sink.drain()[0];
        let keys: Vec<_> = record.fields().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["req", "n"]);
    }

    #[test]
    fn panic_macro_panics() {
        let (core, sink) = core();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            crate::panic!(core: &core, "gave up after {} tries", 3);
        }));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "gave up after 3 tries");
        assert_eq!(sink.len(), 1);
    }
}
