// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and the three routing bands they fall into.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Severity of a log record, least severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic chatter, routed to the debug band
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
    /// Programmer error; panics after logging in development mode
    DPanic,
    /// Logs, then panics
    Panic,
    /// Logs, flushes, then exits the process
    Fatal,
}

impl Level {
    /// Lowercase name used by the JSON encoder and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::DPanic => "dpanic",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase name used by the console encoder.
    pub const fn as_capital_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// The band this level is routed to.
    #[inline]
    pub fn band(self) -> Band {
        Band::of(self)
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "dpanic" => Ok(Level::DPanic),
            "panic" => Ok(Level::Panic),
            "fatal" => Ok(Level::Fatal),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown level `{other}`"
            ))),
        }
    }
}

/// Upper bound (inclusive) of the debug band.
pub const DEBUG_THRESHOLD: Level = Level::Debug;
/// Lower bound (inclusive) of the error band.
pub const ERROR_THRESHOLD: Level = Level::Error;

/// One of the three severity partitions a record is routed to.
///
/// * `Debug`: level <= [`DEBUG_THRESHOLD`]
/// * `Output`: [`DEBUG_THRESHOLD`] < level < [`ERROR_THRESHOLD`]
/// * `Error`: level >= [`ERROR_THRESHOLD`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Debug,
    Output,
    Error,
}

impl Band {
    /// All bands, in routing-table order.
    pub const ALL: [Band; 3] = [Band::Debug, Band::Output, Band::Error];

    pub fn of(level: Level) -> Band {
        if level <= DEBUG_THRESHOLD {
            Band::Debug
        } else if level < ERROR_THRESHOLD {
            Band::Output
        } else {
            Band::Error
        }
    }

    /// Position in [`Band::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Band::Debug => 0,
            Band::Output => 1,
            Band::Error => 2,
        }
    }

    /// File name of this band's active log file.
    pub const fn file_name(self) -> &'static str {
        match self {
            Band::Debug => "debug.log",
            Band::Output => "output.log",
            Band::Error => "error.log",
        }
    }
}
