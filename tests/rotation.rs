// SPDX-License-Identifier: MIT OR Apache-2.0

//! Band files rotating under load.

use ctxlog::{Context, LogConfig, LogCore, RotateConfig};
use std::fs;
use std::path::{Path, PathBuf};

fn backups(dir: &Path, stem: &str) -> Vec<PathBuf> {
    let mut found: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            let name = path.file_name().unwrap().to_str().unwrap();
            name.starts_with(&format!("{stem}-"))
        })
        .collect();
    found.sort();
    found
}

#[test]
fn writing_past_max_size_produces_a_backup() {
    let dir = tempfile::tempdir().unwrap();
    let core = LogCore::new();
    core.init(LogConfig {
        dir: dir.path().to_path_buf(),
        file: true,
        console: false,
        rotate: Some(RotateConfig {
            max_size_mb: Some(1),
            ..Default::default()
        }),
        ..Default::default()
    })
    .unwrap();

    let ctx = Context::default().with_value("req", "r1");
    let padding = "x".repeat(1024);
    // comfortably more than one megabyte of output
    for i in 0..1200 {
        core.infow(Some(&ctx), "filler", [("i", i.to_string()), ("pad", padding.clone())]);
    }
    core.close();

    let rotated = backups(dir.path(), "output");
    assert!(!rotated.is_empty());
    for backup in &rotated {
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".log"), "{name}");
        assert!(fs::metadata(backup).unwrap().len() <= 1024 * 1024);
    }
    assert!(fs::metadata(dir.path().join("output.log")).unwrap().len() <= 1024 * 1024);

    // other bands saw nothing to rotate
    assert!(backups(dir.path(), "debug").is_empty());
    assert!(backups(dir.path(), "error").is_empty());

    // nothing was lost
    let mut lines = fs::read_to_string(dir.path().join("output.log"))
        .unwrap()
        .lines()
        .count();
    for backup in &rotated {
        lines += fs::read_to_string(backup).unwrap().lines().count();
    }
    assert_eq!(lines, 1200);
}

#[test]
fn band_policy_overrides_base() {
    let dir = tempfile::tempdir().unwrap();
    let core = LogCore::new();
    core.init(LogConfig {
        dir: dir.path().to_path_buf(),
        file: true,
        console: false,
        rotate: Some(RotateConfig {
            max_size_mb: Some(100),
            ..Default::default()
        }),
        error_rotate: Some(RotateConfig {
            max_size_mb: Some(1),
            max_backups: Some(1),
            compress: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    })
    .unwrap();

    let padding = "e".repeat(4096);
    for _ in 0..800 {
        core.errorw(None, "failure", [("pad", padding.as_str())]);
        core.warnw(None, "warning", [("pad", padding.as_str())]);
    }
    core.close();

    let errors = backups(dir.path(), "error");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_str().unwrap().ends_with(".log.gz"));
    assert!(backups(dir.path(), "output").is_empty());
}
