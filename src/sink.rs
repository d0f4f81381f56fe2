// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log destinations.
//!
//! A [`Sink`] receives every record routed to the band it is bound to. The
//! router builds [`FileSink`]s and [`ConsoleSink`]s from configuration; other
//! implementations, such as [`MemorySink`], can be attached through
//! [`RouterBuilder::sink`](crate::RouterBuilder::sink).

mod console;
mod memory;
mod rotating;

pub use console::{ConsoleSink, Stream};
pub use memory::MemorySink;
pub use rotating::RotatingFile;

use crate::encoder::{Encoder, JsonEncoder};
use crate::error::Result;
use crate::log_record::LogRecord;
use crate::RotationPolicy;
use std::fmt::Debug;
use std::path::PathBuf;

pub trait Sink: Debug + Send + Sync {
    /// Writes one record.
    ///
    /// Errors are not propagated to the logging call; the router reports them
    /// on the fallback channel.
    fn write(&self, record: &LogRecord) -> Result<()>;

    /// Pushes buffered output to its destination.
    fn flush(&self) -> Result<()>;

    /// Flushes and releases the destination.
    ///
    /// Called once, when the owning router closes.
    fn close(&self) -> Result<()> {
        self.flush()
    }
}

/// Encoded records appended to a [`RotatingFile`].
#[derive(Debug)]
pub struct FileSink {
    file: RotatingFile,
    encoder: Box<dyn Encoder>,
}

impl FileSink {
    /// A JSON-lines sink at `path`, creating the parent directory if needed.
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Result<FileSink> {
        Ok(FileSink::with_encoder(
            RotatingFile::new(path, policy)?,
            Box::new(JsonEncoder),
        ))
    }

    pub fn with_encoder(file: RotatingFile, encoder: Box<dyn Encoder>) -> FileSink {
        FileSink { file, encoder }
    }

    pub fn file(&self) -> &RotatingFile {
        &self.file
    }
}

impl Sink for FileSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut line = Vec::with_capacity(256);
        self.encoder.encode(record, &mut line)?;
        self.file.write(&line)
    }

    fn flush(&self) -> Result<()> {
        self.file.flush()
    }

    fn close(&self) -> Result<()> {
        self.file.close()
    }
}
