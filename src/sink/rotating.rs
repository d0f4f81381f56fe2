// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-bounded log files.
//!
//! The active file keeps its configured name. When a write would push it past
//! [`RotationPolicy::max_size`], it is renamed to a backup named after the
//! rotation time, for `output.log`:
//!
//! ```text
//! output-20261019T091201.532.log
//! output-20261019T091201.532-1.log      second rotation within the same millisecond
//! output-20261019T091201.532.log.gz     with compression
//! ```
//!
//! and a fresh active file is opened. Backups past the age or count bound are
//! deleted after every rotation.

use crate::config::RotationPolicy;
use crate::error::{Error, Result};
use crate::fallback;
use chrono::{Local, NaiveDateTime, TimeDelta};
use flate2::Compression;
use flate2::write::GzEncoder;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";
/// Length of a formatted [`STAMP_FORMAT`].
const STAMP_LEN: usize = 19;
const GZ_SUFFIX: &str = ".gz";

/// An append-only file that rotates itself.
///
/// Writes are serialized by an internal mutex. After [`close`](RotatingFile::close)
/// the next write reopens the active file.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    file: Option<File>,
    size: u64,
    /// Stamp and sequence number of the newest backup made by this file.
    last_backup: Option<(String, u32)>,
}

impl RotatingFile {
    /// Opens (or creates) the active file at `path`, creating its directory first.
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Result<RotatingFile> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let rotating = RotatingFile {
            path,
            policy,
            state: Mutex::new(State::default()),
        };
        {
            let mut state = rotating.state.lock();
            rotating.open(&mut state)?;
        }
        Ok(rotating)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Bytes in the active file.
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    /// Appends `bytes`, rotating first if they would not fit.
    ///
    /// A single write larger than the bound still lands in one file.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.size > 0 && state.size.saturating_add(bytes.len() as u64) > self.policy.max_size {
            self.rotate(&mut state)?;
        }
        let file = match &mut state.file {
            Some(file) => file,
            None => self.open(&mut state)?,
        };
        file.write_all(bytes).map_err(|e| Error::io(&self.path, e))?;
        state.size += bytes.len() as u64;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        match &mut state.file {
            Some(file) => file.flush().map_err(|e| Error::io(&self.path, e)),
            None => Ok(()),
        }
    }

    /// Flushes and releases the active file.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        Self::release(&self.path, &mut state)
    }

    /// Rotates now, regardless of size.
    pub fn rotate_now(&self) -> Result<()> {
        let mut state = self.state.lock();
        self.rotate(&mut state)
    }

    /// Existing backups of this file, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        let backups = self.list_backups().map_err(|e| Error::io(&self.path, e))?;
        Ok(backups.into_iter().map(|b| b.path).collect())
    }

    fn open<'s>(&self, state: &'s mut State) -> Result<&'s mut File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        state.size = file
            .metadata()
            .map_err(|e| Error::io(&self.path, e))?
            .len();
        Ok(state.file.insert(file))
    }

    fn release(path: &Path, state: &mut State) -> Result<()> {
        if let Some(mut file) = state.file.take() {
            file.flush().map_err(|e| Error::io(path, e))?;
        }
        Ok(())
    }

    fn rotate(&self, state: &mut State) -> Result<()> {
        Self::release(&self.path, state)?;
        if self.path.exists() {
            let backup = self.backup_path(state);
            fs::rename(&self.path, &backup).map_err(|e| Error::io(&self.path, e))?;
            if self.policy.compress {
                if let Err(e) = compress(&backup) {
                    fallback::report(format_args!("compressing {}: {}", backup.display(), e));
                }
            }
        }
        if let Err(e) = self.prune() {
            fallback::report(format_args!("pruning backups of {}: {}", self.path.display(), e));
        }
        self.open(state)?;
        Ok(())
    }

    /// `(stem, extension)` of the active file name.
    fn name_parts(&self) -> (String, Option<String>) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        (stem, ext)
    }

    fn backup_name(&self, stamp: &str, seq: u32) -> String {
        let (stem, ext) = self.name_parts();
        let mut name = format!("{stem}-{stamp}");
        if seq > 0 {
            name.push_str(&format!("-{seq}"));
        }
        if let Some(ext) = ext {
            name.push('.');
            name.push_str(&ext);
        }
        name
    }

    /// A backup path not taken by an existing backup, compressed or not.
    ///
    /// Within one millisecond the sequence number only grows, so the newest
    /// backup always sorts last even after older ones were pruned.
    fn backup_path(&self, state: &mut State) -> PathBuf {
        let stamp = Local::now().format(STAMP_FORMAT).to_string();
        let dir = self.path.parent().unwrap_or(Path::new(""));

        let mut seq = match &state.last_backup {
            Some((last, seq)) if *last == stamp => seq + 1,
            _ => 0,
        };
        // a previous process may have rotated within this millisecond too
        let time = NaiveDateTime::parse_from_str(&stamp, STAMP_FORMAT).ok();
        if let Ok(existing) = self.list_backups() {
            let newest = existing
                .iter()
                .filter(|b| Some(b.time) == time)
                .map(|b| b.seq)
                .max();
            if let Some(newest) = newest {
                seq = seq.max(newest + 1);
            }
        }
        loop {
            let candidate = dir.join(self.backup_name(&stamp, seq));
            if !candidate.exists() && !gz_path(&candidate).exists() {
                state.last_backup = Some((stamp, seq));
                return candidate;
            }
            seq += 1;
        }
    }

    /// Recognizes `<stem>-<stamp>[-<seq>].<ext>[.gz]`.
    fn parse_backup(&self, name: &str) -> Option<(NaiveDateTime, u32)> {
        let (stem, ext) = self.name_parts();
        let name = name.strip_suffix(GZ_SUFFIX).unwrap_or(name);
        let name = match &ext {
            Some(ext) => name.strip_suffix(ext.as_str())?.strip_suffix('.')?,
            None => name,
        };
        let rest = name.strip_prefix(stem.as_str())?.strip_prefix('-')?;
        let stamp = rest.get(..STAMP_LEN)?;
        let time = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
        let seq = match &rest[STAMP_LEN..] {
            "" => 0,
            tail => tail.strip_prefix('-')?.parse().ok()?,
        };
        Some((time, seq))
    }

    fn list_backups(&self) -> io::Result<Vec<Backup>> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut backups = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some((time, seq)) = self.parse_backup(name) {
                backups.push(Backup {
                    path: entry.path(),
                    time,
                    seq,
                });
            }
        }
        backups.sort_by(|a, b| (a.time, a.seq).cmp(&(b.time, b.seq)));
        Ok(backups)
    }

    /// Deletes backups beyond the age and count bounds.
    fn prune(&self) -> io::Result<()> {
        if self.policy.max_age_days == 0 && self.policy.max_backups == 0 {
            return Ok(());
        }
        let mut backups = self.list_backups()?;
        let mut doomed = Vec::new();
        if self.policy.max_age_days > 0 {
            let cutoff =
                Local::now().naive_local() - TimeDelta::days(i64::from(self.policy.max_age_days));
            let expired = backups.iter().take_while(|b| b.time < cutoff).count();
            doomed.extend(backups.drain(..expired));
        }
        if self.policy.max_backups > 0 && backups.len() > self.policy.max_backups {
            let excess = backups.len() - self.policy.max_backups;
            doomed.extend(backups.drain(..excess));
        }
        for backup in doomed {
            fs::remove_file(&backup.path)?;
        }
        Ok(())
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        if let Err(e) = Self::release(&self.path, self.state.get_mut()) {
            fallback::report(e);
        }
    }
}

#[derive(Debug)]
struct Backup {
    path: PathBuf,
    time: NaiveDateTime,
    seq: u32,
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(GZ_SUFFIX);
    PathBuf::from(name)
}

/// Replaces `path` with a gzipped copy at `<path>.gz`.
fn compress(path: &Path) -> io::Result<()> {
    let gz = gz_path(path);
    let mut source = File::open(path)?;
    let mut encoder = GzEncoder::new(File::create(&gz)?, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?.sync_all()?;
    fs::remove_file(path)
}
