// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name of the machine records come from.

use std::env;
use std::fs;

const FALLBACK: &str = "localhost";

/// The machine's host name, or `"localhost"` if none can be found.
///
/// Looks at `HOSTNAME`, then the kernel's and the system's host name files,
/// then `COMPUTERNAME`.
pub(crate) fn detect() -> String {
    env::var("HOSTNAME")
        .ok()
        .and_then(non_empty)
        .or_else(|| read_first_line("/proc/sys/kernel/hostname"))
        .or_else(|| read_first_line("/etc/hostname"))
        .or_else(|| env::var("COMPUTERNAME").ok().and_then(non_empty))
        .unwrap_or_else(|| FALLBACK.to_string())
}

fn read_first_line(path: &str) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    non_empty(contents.lines().next()?.to_string())
}

fn non_empty(name: String) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
