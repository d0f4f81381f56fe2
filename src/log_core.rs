// SPDX-License-Identifier: MIT OR Apache-2.0

//! The leveled logging entry points.
//!
//! A [`LogCore`] owns the active [`Router`]. Logging calls take the router out
//! of a short read lock (an `Arc` clone) and do all their work outside of it,
//! so re-initializing or closing never waits on a slow sink.
//!
//! # Degraded mode
//!
//! Before [`init`](LogCore::init) and after [`close`](LogCore::close), calls
//! still produce output: a minimal `LEVEL message [k=v]` line on stderr. `panic`
//! still panics and `fatal` still exits.
//!
//! # Host and stack traces
//!
//! Routed records carry the router's host name. Records at [`Level::Error`] and
//! above also carry a stack trace of the logging call.
//!
//! # Panic levels
//!
//! | level    | after logging                                      |
//! |----------|----------------------------------------------------|
//! | `dpanic` | panics if the core was initialized in development mode |
//! | `panic`  | panics                                             |
//! | `fatal`  | closes the core and exits the process with status 1 |

use crate::config::LogConfig;
use crate::context::Context;
use crate::error::Result;
use crate::fallback;
use crate::level::Level;
use crate::log_record::LogRecord;
use crate::router::{Router, RouterBuilder};
use crate::sublogger::SubLogger;
use crate::value::Value;
use parking_lot::RwLock;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

static GLOBAL_CORE: OnceLock<LogCore> = OnceLock::new();

/// Generates the plain and key/value entry points of each level.
macro_rules! level_methods {
    ($($level:ident => $plain:ident, $kv:ident;)*) => {$(
        #[doc = concat!("Logs `msg` at [`Level::", stringify!($level), "`].")]
        ///
        /// `ctx` of `None` uses the thread's current context.
        #[track_caller]
        pub fn $plain(&self, ctx: Option<&$crate::Context>, msg: impl Into<String>) {
            self.log_at($crate::Level::$level, ctx, msg, Vec::new())
        }

        #[doc = concat!("Logs `msg` with trailing key/values at [`Level::", stringify!($level), "`].")]
        #[track_caller]
        pub fn $kv<K, V>(
            &self,
            ctx: Option<&$crate::Context>,
            msg: impl Into<String>,
            fields: impl IntoIterator<Item = (K, V)>,
        ) where
            K: Into<String>,
            V: Into<$crate::Value>,
        {
            let fields = fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect();
            self.log_at($crate::Level::$level, ctx, msg, fields)
        }
    )*};
}
pub(crate) use level_methods;

/// An explicit logging handle.
///
/// Tests and embedders create their own with [`LogCore::new`]; the macros log
/// through [`LogCore::global`].
///
/// ```rust
/// use ctxlog::{Context, LogConfig, LogCore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let core = LogCore::new();
/// core.init(LogConfig {
///     dir: dir.path().to_path_buf(),
///     file: true,
///     console: false,
///     ..Default::default()
/// })
/// .unwrap();
///
/// let ctx = Context::default().with_value("req", "r1");
/// core.info(Some(&ctx), "hello");
/// core.warnw(None, "slow", [("ms", 250u32)]);
/// core.close();
///
/// let output = std::fs::read_to_string(dir.path().join("output.log")).unwrap();
/// assert!(output.contains(r#""msg":"hello""#));
/// assert!(output.contains(r#""req":"r1""#));
/// ```
#[derive(Debug, Default)]
pub struct LogCore {
    router: RwLock<Option<Arc<Router>>>,
}

impl LogCore {
    /// An uninitialized core, logging in degraded mode until [`init`](LogCore::init).
    pub fn new() -> LogCore {
        LogCore::default()
    }

    /// The process-wide core used by the logging macros.
    pub fn global() -> &'static LogCore {
        GLOBAL_CORE.get_or_init(LogCore::new)
    }

    /// Builds a router from `config` and installs it.
    ///
    /// A router already installed is closed first. On error the core is left
    /// uninitialized.
    pub fn init(&self, config: LogConfig) -> Result<()> {
        self.init_with(RouterBuilder::new(config))
    }

    /// Like [`init`](LogCore::init), with extra sinks attached by the builder.
    pub fn init_with(&self, builder: RouterBuilder) -> Result<()> {
        self.close();
        let router = Arc::new(builder.build()?);
        let previous = self.router.write().replace(router);
        if let Some(previous) = previous {
            // lost a race with a concurrent init
            previous.close();
        }
        Ok(())
    }

    /// Flushes and closes every sink. Safe to call repeatedly, or before `init`.
    pub fn close(&self) {
        let router = self.router.write().take();
        if let Some(router) = router {
            router.close();
        }
    }

    pub fn flush(&self) {
        if let Some(router) = self.router() {
            router.flush();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.router.read().is_some()
    }

    /// Whether a record at `level` would reach a sink. Always true in degraded mode.
    pub fn enabled(&self, level: Level) -> bool {
        self.router().is_none_or(|router| router.enabled(level))
    }

    /// A sub-logger rendering messages as `[name] msg`.
    pub fn sub_logger(&self, name: &str) -> SubLogger<'_> {
        SubLogger::new(self, format!("[{name}] {{}}"))
    }

    fn router(&self) -> Option<Arc<Router>> {
        self.router.read().clone()
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

    /// Logs at `level`, appending `fields` after the context's pairs.
    ///
    /// Every leveled entry point and macro ends up here.
    #[track_caller]
    pub fn log_at(
        &self,
        level: Level,
        ctx: Option<&Context>,
        msg: impl Into<String>,
        fields: Vec<(String, Value)>,
    ) {
        let location = Location::caller();
        let message: String = msg.into();
        let router = self.router();
        let build = |name: &str| {
            let mut gathered = match ctx {
                Some(ctx) => ctx.values(),
                None => Context::current_values(),
            };
            gathered.extend(fields);
            LogRecord::new(level, name, message.as_str())
                .at(location)
                .with_fields(gathered)
        };

        let development = match &router {
            Some(router) => {
                if router.enabled(level) {
                    let mut record = build(router.name()).with_host(router.host());
                    if level >= Level::Error {
                        record = record.with_stack(Backtrace::force_capture().to_string());
                    }
                    router.route(&record);
                }
                router.development()
            }
            None => {
                fallback::emit(&build(""));
                false
            }
        };

        match level {
            Level::DPanic if development => std::panic!("{}", message),
            Level::Panic => std::panic!("{}", message),
            Level::Fatal => {
                drop(router);
                self.close();
                std::process::exit(1);
            }
            _ => {}
        }
    }
}
