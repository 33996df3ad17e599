//! Startup log rotation
//!
//! Decides which physical file this run writes to. A previous instance of the
//! host may still hold its log open, so every matching file is probed with a
//! single exclusive-append open attempt before anything is archived. Any busy
//! file means nothing is archived this run and a fresh suffixed name is used
//! instead.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use regex::Regex;
use tracing::warn;

use diaglog_core::{constants, types, Result};

use crate::archive::{creation_time, ArchiveStore};

/// A log file matched during the startup scan
struct MatchedLog {
    path: PathBuf,
    /// Numeric suffix; a missing or unparseable suffix counts as 1
    suffix: u32,
}

/// Picks the active log file for this run and retires the previous run's files
pub struct RotationManager {
    dir: PathBuf,
    store: ArchiveStore,
    probe: fn(&Path) -> bool,
}

impl RotationManager {
    pub fn new(dir: impl Into<PathBuf>, max_archives: usize) -> Self {
        let dir = dir.into();
        let store = ArchiveStore::new(dir.clone()).with_max_archives(max_archives);
        Self {
            dir,
            store,
            probe: can_open,
        }
    }

    #[cfg(test)]
    fn with_probe(mut self, probe: fn(&Path) -> bool) -> Self {
        self.probe = probe;
        self
    }

    /// Select the log file this run will write to.
    ///
    /// If no matching file is busy, every match is archived oldest-first and
    /// the canonical `<role>.log` is returned. If any is busy, nothing is
    /// archived and `<role><max suffix + 1>.log` is returned so a live writer
    /// is never disturbed.
    pub fn select_active_log_file(&self, role: &str) -> Result<PathBuf> {
        types::validate_role(role)?;
        fs::create_dir_all(&self.dir)?;

        let mut matched = self.scan(role)?;

        if matched.iter().any(|m| !(self.probe)(&m.path)) {
            let n = matched.iter().map(|m| m.suffix).max().unwrap_or(1);
            return Ok(self.dir.join(constants::suffixed_log_file_name(role, n + 1)));
        }

        matched.sort_by_key(|m| creation_time(&m.path).unwrap_or(SystemTime::UNIX_EPOCH));
        for m in &matched {
            if let Err(e) = self.store.archive(&m.path) {
                // startup must not fail over an unarchivable log
                warn!("Could not archive {}: {}", m.path.display(), e);
            }
        }
        self.store.prune_old_archives();

        Ok(self.dir.join(constants::log_file_name(role)))
    }

    fn scan(&self, role: &str) -> Result<Vec<MatchedLog>> {
        // role is validated to [a-zA-Z0-9_-]+, so the pattern is well formed
        let pattern = Regex::new(&format!(r"^{}(\d*)\.log$", regex::escape(role)))
            .expect("Invalid role pattern");

        let mut matched = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(caps) = pattern.captures(name) else { continue };
            let suffix = if caps[1].is_empty() {
                1
            } else {
                caps[1].parse::<u32>().unwrap_or(1)
            };
            matched.push(MatchedLog {
                path: entry.path(),
                suffix,
            });
        }
        Ok(matched)
    }
}

/// Probe for a live writer with a single immediate open attempt, no waiting
fn can_open(path: &Path) -> bool {
    OpenOptions::new().append(true).open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name).unwrap();
    }

    fn always_busy(_: &Path) -> bool {
        false
    }

    #[test]
    fn test_empty_dir_selects_canonical_name() {
        let dir = TempDir::new().unwrap();
        let mgr = RotationManager::new(dir.path().join("logs"), 20);

        let path = mgr.select_active_log_file("client").unwrap();

        assert_eq!(path.file_name().unwrap(), "client.log");
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn test_unlocked_files_are_archived_and_canonical_returned() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "client.log");
        touch(dir.path(), "client2.log");
        let mgr = RotationManager::new(dir.path(), 20);

        let path = mgr.select_active_log_file("client").unwrap();

        assert_eq!(path.file_name().unwrap(), "client.log");
        assert!(!dir.path().join("client2.log").exists());
        let zips = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .count();
        assert_eq!(zips, 2);
    }

    #[test]
    fn test_busy_file_selects_next_suffix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "client.log"); // suffix 1
        touch(dir.path(), "client2.log");
        touch(dir.path(), "client3.log");
        touch(dir.path(), "client5.log");
        let mgr = RotationManager::new(dir.path(), 20).with_probe(always_busy);

        let path = mgr.select_active_log_file("client").unwrap();

        assert_eq!(path.file_name().unwrap(), "client6.log");
        // nothing archived while a writer may be live
        assert!(dir.path().join("client.log").exists());
        assert!(dir.path().join("client5.log").exists());
    }

    #[test]
    fn test_busy_unsuffixed_file_yields_suffix_two() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "server.log");
        let mgr = RotationManager::new(dir.path(), 20).with_probe(always_busy);

        let path = mgr.select_active_log_file("server").unwrap();

        assert_eq!(path.file_name().unwrap(), "server2.log");
    }

    #[test]
    fn test_scan_ignores_other_roles() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "server.log");
        touch(dir.path(), "server7.log");
        touch(dir.path(), "client.log");
        let mgr = RotationManager::new(dir.path(), 20);

        let path = mgr.select_active_log_file("client").unwrap();

        assert_eq!(path.file_name().unwrap(), "client.log");
        assert!(dir.path().join("server.log").exists());
        assert!(dir.path().join("server7.log").exists());
    }

    #[test]
    fn test_invalid_role_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mgr = RotationManager::new(dir.path(), 20);
        assert!(mgr.select_active_log_file("../oops").is_err());
    }
}
