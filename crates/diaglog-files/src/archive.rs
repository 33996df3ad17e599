//! Archive store - compresses retired log files into dated zip bundles
//!
//! Archives are named `<date>-<n>.zip` where `<date>` is the creation date of
//! the source log and `<n>` is a per-date sequence starting at 1. The sequence
//! is assigned by scanning existing archive names for that date and taking
//! max + 1. That scan is not atomic across two processes archiving for the
//! same date at once; `create_new` turns a collision into an error instead of
//! a silent overwrite.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use diaglog_core::{constants, Error, Result};

/// Matches archive names like `2026-08-29-3.zip`
static ARCHIVE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})-(\d+)\.zip$").expect("Invalid archive regex"));

/// Compresses closed log files and enforces the archive retention count
pub struct ArchiveStore {
    dir: PathBuf,
    max_archives: usize,
}

impl ArchiveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_archives: constants::MAX_ARCHIVES,
        }
    }

    pub fn with_max_archives(mut self, max_archives: usize) -> Self {
        self.max_archives = max_archives;
        self
    }

    /// Compress `path` into the next `<date>-<n>.zip` for its creation date,
    /// then delete the source. The source survives if the archive write fails.
    pub fn archive(&self, path: &Path) -> Result<PathBuf> {
        let created = creation_time(path)?;
        let date = DateTime::<Local>::from(created)
            .format(constants::ARCHIVE_DATE_FORMAT)
            .to_string();

        let n = self.next_sequence(&date)?;
        let archive_path = self.dir.join(format!("{}-{}.{}", date, n, constants::ARCHIVE_EXT));

        let entry_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::archive(path, "source has no file name"))?;
        let mut reader = File::open(path)?;

        // create_new refuses to clobber an archive from a concurrent writer
        let out = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&archive_path)?;

        if let Err(e) = write_zip(&mut reader, entry_name, out) {
            // the bundle is ours and incomplete, leave nothing behind
            let _ = fs::remove_file(&archive_path);
            return Err(e);
        }

        fs::remove_file(path)?;
        debug!("Archived {} -> {}", path.display(), archive_path.display());
        Ok(archive_path)
    }

    /// Delete the oldest archives until at most `max_archives` remain.
    /// Per-file failures are logged and skipped; this never fails the caller.
    pub fn prune_old_archives(&self) {
        let mut archives: Vec<PathBuf> = match fs::read_dir(&self.dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|e| e == constants::ARCHIVE_EXT).unwrap_or(false))
                .collect(),
            Err(e) => {
                warn!("Could not list archives in {}: {}", self.dir.display(), e);
                return;
            }
        };

        if archives.len() <= self.max_archives {
            return;
        }

        // Stable sort keeps directory-listing order for equal timestamps
        archives.sort_by_key(|p| creation_time(p).unwrap_or(SystemTime::UNIX_EPOCH));

        let excess = archives.len() - self.max_archives;
        for path in archives.iter().take(excess) {
            if let Err(e) = fs::remove_file(path) {
                warn!("Could not delete old archive {}: {}", path.display(), e);
            }
        }
    }

    /// Next free sequence number for `date`: max existing + 1, or 1
    fn next_sequence(&self, date: &str) -> Result<u32> {
        let mut max = 0u32;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(caps) = ARCHIVE_NAME_REGEX.captures(name) else { continue };
            if &caps[1] == date {
                let n = caps[2].parse::<u32>().unwrap_or(0);
                max = max.max(n);
            }
        }
        Ok(max + 1)
    }
}

fn write_zip(reader: &mut File, entry_name: &str, out: File) -> Result<()> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(entry_name, options)?;
    io::copy(reader, &mut zip)?;
    zip.finish()?;
    Ok(())
}

/// Creation time of a file, falling back to mtime on filesystems without
/// birth-time support
pub(crate) fn creation_time(path: &Path) -> io::Result<SystemTime> {
    let meta = fs::metadata(path)?;
    meta.created().or_else(|_| meta.modified())
}
