// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity routing.
//!
//! A [`Router`] holds one list of sinks per [`Band`] and writes every record to
//! all sinks of the record's band. Routers are built from a [`LogConfig`] by a
//! [`RouterBuilder`], which can also attach caller-provided sinks.
//!
//! # Building
//!
//! Construction happens in a fixed order, and stops at the first failure:
//!
//! 1. the host name is resolved, and the log directory is created (only when
//!    file output is enabled)
//! 2. rotation policies are resolved and validated
//! 3. one [`FileSink`] per band is opened
//! 4. one [`ConsoleSink`] per band is created, stdout for the debug and output
//!    bands and stderr for the error band
//! 5. extra sinks are appended and the router is assembled

use crate::config::LogConfig;
use crate::error::{Error, Result};
use crate::fallback;
use crate::host;
use crate::level::{Band, Level};
use crate::log_record::LogRecord;
use crate::sink::{ConsoleSink, FileSink, Sink, Stream};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

type BandSinks = [Vec<Arc<dyn Sink>>; 3];

#[derive(Debug)]
pub struct Router {
    name: String,
    host: String,
    min_level: Level,
    development: bool,
    bands: BandSinks,
    closed: AtomicBool,
}

impl Router {
    /// Builds a router with only the sinks `config` asks for.
    pub fn from_config(config: LogConfig) -> Result<Router> {
        RouterBuilder::new(config).build()
    }

    /// Logger name stamped on records.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host name stamped on records, resolved once when the router was built.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn development(&self) -> bool {
        self.development
    }

    /// Whether a record at `level` would reach any sink.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level && !self.is_closed()
    }

    pub fn sinks(&self, band: Band) -> &[Arc<dyn Sink>] {
        &self.bands[band.index()]
    }

    /// Writes `record` to every sink of its band.
    ///
    /// A failing sink does not keep the others from receiving the record.
    pub fn route(&self, record: &LogRecord) {
        if !self.enabled(record.level()) {
            return;
        }
        let band = record.level().band();
        for sink in self.sinks(band) {
            if let Err(e) = sink.write(record) {
                fallback::report(format_args!("{:?} band sink: {}", band, e));
            }
        }
    }

    pub fn flush(&self) {
        for sink in self.bands.iter().flatten() {
            if let Err(e) = sink.flush() {
                fallback::report(e);
            }
        }
    }

    /// Closes every sink once. Later calls do nothing.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut seen: Vec<*const ()> = Vec::new();
        for sink in self.bands.iter().flatten() {
            let ptr = Arc::as_ptr(sink) as *const ();
            if seen.contains(&ptr) {
                continue;
            }
            seen.push(ptr);
            if let Err(e) = sink.close() {
                fallback::report(e);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Assembles a [`Router`] from configuration plus extra sinks.
#[derive(Debug)]
pub struct RouterBuilder {
    config: LogConfig,
    extra: BandSinks,
}

impl RouterBuilder {
    pub fn new(config: LogConfig) -> Self {
        RouterBuilder {
            config,
            extra: Default::default(),
        }
    }

    /// Adds `sink` to `band`, after the configured sinks.
    #[must_use]
    pub fn sink(mut self, band: Band, sink: Arc<dyn Sink>) -> Self {
        self.extra[band.index()].push(sink);
        self
    }

    /// Adds `sink` to every band.
    #[must_use]
    pub fn sink_all(mut self, sink: Arc<dyn Sink>) -> Self {
        for band in Band::ALL {
            self.extra[band.index()].push(sink.clone());
        }
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn build(self) -> Result<Router> {
        let RouterBuilder { config, extra } = self;
        let host = config.host.clone().unwrap_or_else(host::detect);
        if config.file {
            fs::create_dir_all(&config.dir).map_err(|e| Error::io(&config.dir, e))?;
        }
        let policies = config.rotation_policies()?;

        let mut bands: BandSinks = Default::default();
        if config.file {
            for band in Band::ALL {
                let sink = FileSink::new(config.dir.join(band.file_name()), policies[band.index()])?;
                bands[band.index()].push(Arc::new(sink));
            }
        }
        if config.console {
            for band in Band::ALL {
                let stream = match band {
                    Band::Error => Stream::Stderr,
                    Band::Debug | Band::Output => Stream::Stdout,
                };
                bands[band.index()].push(Arc::new(ConsoleSink::new(stream)));
            }
        }
        for (sinks, extra) in bands.iter_mut().zip(extra) {
            sinks.extend(extra);
        }

        Ok(Router {
            name: config.name,
            host,
            min_level: config.level,
            development: config.development,
            bands,
            closed: AtomicBool::new(false),
        })
    }
}
