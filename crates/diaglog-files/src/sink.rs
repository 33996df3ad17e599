//! Line-oriented log sink
//!
//! Two independent surfaces: the console (severity-colored, colors scoped to
//! the line) and the active log file (buffered, flushed per line). Layout is
//! `[HH:MM:SS] [thread/LEVEL] [logger]: message`.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use colored::Colorize;
use parking_lot::Mutex;
use tracing::warn;

use diaglog_core::{constants, Result, RunMode, Severity};

/// Console + file line sink for the active log
pub struct LogSink {
    mode: RunMode,
    path: PathBuf,
    file: Mutex<BufWriter<File>>,
}

impl LogSink {
    /// Open a fresh active log file, truncating any leftover content.
    /// Rotation has already archived or sidestepped the previous run's file.
    pub fn open(path: PathBuf, mode: RunMode) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            mode,
            path,
            file: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the active log, for pointing users at the full trace
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Write a line to the active log file
    pub fn file_line(&self, logger: &str, severity: Severity, msg: &str) -> Result<()> {
        let line = format_line(logger, severity, msg);
        let mut file = self.file.lock();
        writeln!(file, "{}", line)?;
        file.flush()?;
        Ok(())
    }

    /// Write a severity-colored line to the console. Colors are scoped to the
    /// line, so the terminal is reset afterwards.
    pub fn console_line(&self, severity: Severity, msg: &str) {
        let line = format_line("console", severity, msg);
        match severity {
            Severity::Info => println!("{}", line),
            Severity::Warn => println!("{}", line.yellow()),
            Severity::Error => println!("{}", line.red()),
        }
    }

    /// Write to both surfaces; file failures degrade to a soft warning
    pub fn log(&self, logger: &str, severity: Severity, msg: &str) {
        self.console_line(severity, msg);
        if let Err(e) = self.file_line(logger, severity, msg) {
            warn!("Could not write to {}: {}", self.path.display(), e);
        }
    }
}

fn format_line(logger: &str, severity: Severity, msg: &str) -> String {
    let time = Local::now().format(constants::LINE_TIME_FORMAT);
    let thread = std::thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string();
    format!("[{}] [{}/{}] [{}]: {}", time, thread, severity, logger, msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("client.log");

        let sink = LogSink::open(path.clone(), RunMode::Interactive).unwrap();

        assert!(path.exists());
        assert_eq!(sink.file_name(), "client.log");
        assert_eq!(sink.mode(), RunMode::Interactive);
    }

    #[test]
    fn test_open_truncates_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.log");
        fs::write(&path, "stale content\n").unwrap();

        let _sink = LogSink::open(path.clone(), RunMode::Headless).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_file_line_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.log");
        let sink = LogSink::open(path.clone(), RunMode::Headless).unwrap();

        sink.file_line("faults", Severity::Warn, "something broke").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with('['));
        assert!(content.contains("/WARN]"));
        assert!(content.contains("[faults]: something broke"));
    }

    #[test]
    fn test_log_writes_file_even_with_console() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.log");
        let sink = LogSink::open(path.clone(), RunMode::Interactive).unwrap();

        sink.log("startup", Severity::Info, "hello");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("[startup]: hello"));
    }
}
