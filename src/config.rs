// SPDX-License-Identifier: MIT OR Apache-2.0

//! Initialization settings.
//!
//! [`LogConfig`] is plain data deserialized by whatever loads the application's
//! configuration. Every field has a default, so an empty document is valid:
//!
//! ```rust
//! use ctxlog::{Band, Level, LogConfig};
//!
//! let config: LogConfig = serde_json::from_str(r#"{
//!     "name": "billing",
//!     "level": "info",
//!     "file": true,
//!     "rotate": { "max_size_mb": 50, "max_backups": 10 },
//!     "error_rotate": { "compress": true }
//! }"#).unwrap();
//! assert_eq!(config.level, Level::Info);
//!
//! let policies = config.rotation_policies().unwrap();
//! let error = &policies[Band::Error.index()];
//! assert_eq!(error.max_size, 50 * 1024 * 1024);
//! assert_eq!(error.max_backups, 10);
//! assert!(error.compress);
//! assert!(!policies[Band::Output.index()].compress);
//! ```

use crate::error::{Error, Result};
use crate::level::{Band, Level};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const MEGABYTE: u64 = 1024 * 1024;

/// Settings consumed by [`LogCore::init`](crate::LogCore::init).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Logger name carried by every record.
    pub name: String,
    /// Records below this level are discarded.
    pub level: Level,
    /// Directory holding `debug.log`, `output.log` and `error.log`.
    ///
    /// Created when the router is built with `file` enabled. With `file` off the
    /// directory is never touched.
    pub dir: PathBuf,
    /// Write human-readable lines to stdout (debug and output bands) and stderr (error band).
    pub console: bool,
    /// Write JSON lines to one rotating file per band.
    pub file: bool,
    /// `dpanic` panics after logging.
    pub development: bool,
    /// Host name stamped on records. Detected from the system when unset.
    pub host: Option<String>,
    /// Base rotation settings shared by all bands.
    pub rotate: Option<RotateConfig>,
    pub debug_rotate: Option<RotateConfig>,
    pub output_rotate: Option<RotateConfig>,
    pub error_rotate: Option<RotateConfig>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            name: "ctxlog".to_string(),
            level: Level::Debug,
            dir: PathBuf::from("logs"),
            console: true,
            file: false,
            development: cfg!(debug_assertions),
            host: None,
            rotate: None,
            debug_rotate: None,
            output_rotate: None,
            error_rotate: None,
        }
    }
}

/// Rotation settings as written in configuration. Unset fields are inherited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotateConfig {
    pub max_size_mb: Option<u64>,
    pub max_age_days: Option<u32>,
    pub max_backups: Option<usize>,
    pub compress: Option<bool>,
}

/// Resolved rotation bounds of one file sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size in bytes the active file may reach before it is rotated.
    pub max_size: u64,
    /// Backups older than this many days are deleted; 0 keeps them regardless of age.
    pub max_age_days: u32,
    /// Number of backups kept; 0 keeps all of them.
    pub max_backups: usize,
    /// Gzip backups as they are rotated.
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        RotationPolicy {
            max_size: 200 * MEGABYTE,
            max_age_days: 7,
            max_backups: 0,
            compress: false,
        }
    }
}

impl RotateConfig {
    /// Fills unset fields from `base`.
    fn or(self, base: Option<RotateConfig>) -> RotateConfig {
        let base = base.unwrap_or_default();
        RotateConfig {
            max_size_mb: self.max_size_mb.or(base.max_size_mb),
            max_age_days: self.max_age_days.or(base.max_age_days),
            max_backups: self.max_backups.or(base.max_backups),
            compress: self.compress.or(base.compress),
        }
    }

    fn resolve(self) -> Result<RotationPolicy> {
        let default = RotationPolicy::default();
        let max_size = match self.max_size_mb {
            Some(0) => {
                return Err(Error::InvalidConfig(
                    "max_size_mb must be greater than zero".to_string(),
                ));
            }
            Some(mb) => mb.checked_mul(MEGABYTE).ok_or_else(|| {
                Error::InvalidConfig(format!("max_size_mb {mb} is too large"))
            })?,
            None => default.max_size,
        };
        Ok(RotationPolicy {
            max_size,
            max_age_days: self.max_age_days.unwrap_or(default.max_age_days),
            max_backups: self.max_backups.unwrap_or(default.max_backups),
            compress: self.compress.unwrap_or(default.compress),
        })
    }
}

impl LogConfig {
    /// The rotation section written for `band`, if any.
    pub fn band_rotate(&self, band: Band) -> Option<RotateConfig> {
        match band {
            Band::Debug => self.debug_rotate,
            Band::Output => self.output_rotate,
            Band::Error => self.error_rotate,
        }
    }

    /// The policy of `band`: its own section, then the base section, then defaults.
    pub fn rotation_policy(&self, band: Band) -> Result<RotationPolicy> {
        self.band_rotate(band)
            .unwrap_or_default()
            .or(self.rotate)
            .resolve()
    }

    /// Policies of all bands, indexed by [`Band::index`].
    pub fn rotation_policies(&self) -> Result<[RotationPolicy; 3]> {
        Ok([
            self.rotation_policy(Band::Debug)?,
            self.rotation_policy(Band::Output)?,
            self.rotation_policy(Band::Error)?,
        ])
    }
}
