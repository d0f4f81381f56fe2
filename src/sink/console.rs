// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable output on stdout or stderr.

use super::Sink;
use crate::encoder::{ConsoleEncoder, Encoder};
use crate::error::{Error, Result};
use crate::log_record::LogRecord;
use std::io::Write;
use std::path::PathBuf;

/// Which standard stream a [`ConsoleSink`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn path(self) -> PathBuf {
        match self {
            Stream::Stdout => PathBuf::from("<stdout>"),
            Stream::Stderr => PathBuf::from("<stderr>"),
        }
    }
}

/**
A sink that writes human-readable lines to stdout or stderr.

Each record is encoded first and then written under the stream's lock, so lines
from concurrent threads never interleave.
*/
#[derive(Debug)]
pub struct ConsoleSink {
    stream: Stream,
    encoder: Box<dyn Encoder>,
}

impl ConsoleSink {
    pub fn new(stream: Stream) -> Self {
        Self::with_encoder(stream, Box::new(ConsoleEncoder))
    }

    pub fn with_encoder(stream: Stream, encoder: Box<dyn Encoder>) -> Self {
        ConsoleSink { stream, encoder }
    }

    pub fn stream(&self) -> Stream {
        self.stream
    }

    fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(bytes),
            Stream::Stderr => std::io::stderr().lock().write_all(bytes),
        }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: &LogRecord) -> Result<()> {
        let mut line = Vec::with_capacity(128);
        self.encoder.encode(record, &mut line)?;
        self.write_bytes(&line)
            .map_err(|e| Error::io(self.stream.path(), e))
    }

    fn flush(&self) -> Result<()> {
        let flushed = match self.stream {
            Stream::Stdout => std::io::stdout().lock().flush(),
            //stderr is unbuffered
            Stream::Stderr => Ok(()),
        };
        flushed.map_err(|e| Error::io(self.stream.path(), e))
    }
}
