// SPDX-License-Identifier: MIT OR Apache-2.0

//! The last-resort console channel.
//!
//! Write, rotation and encoding failures cannot be returned to whoever logged,
//! so they are reported here instead. Records logged while no router is
//! installed are printed here too, in their minimal unstructured form.

use crate::log_record::LogRecord;
use std::fmt::Display;
use std::io::Write;

/// Reports an internal failure of the logging core on standard error.
pub fn report(message: impl Display) {
    let mut lock = std::io::stderr().lock();
    // nothing left to tell if stderr itself is gone
    let _ = writeln!(lock, "ctxlog: {}", message);
}

/// Prints a record without going through any sink.
pub(crate) fn emit(record: &LogRecord) {
    let mut lock = std::io::stderr().lock();
    let _ = writeln!(lock, "{} {}", record.level().as_capital_str(), record);
}
