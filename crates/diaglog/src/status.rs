//! Status-line dedup
//!
//! Hosts report load progress as rapidly changing lines like
//! `Loading world: 37%`. Logging each tick would drown the log, so trailing
//! numbers, separators, and a percent sign are trimmed off and only changes
//! to the remaining base text are logged.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;

use diaglog_core::{Result, Severity};
use diaglog_files::LogSink;

/// Captures the base text ahead of any trailing `: 37%` style progress tail
static STATUS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)[: \d]*%?$").expect("Invalid status regex"));

/// Base text of a status line with the progress tail trimmed off
pub fn status_base(text: &str) -> &str {
    STATUS_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Logs status text only when its base changes
pub struct StatusTracker {
    sink: Arc<LogSink>,
    last: Mutex<String>,
}

impl StatusTracker {
    pub fn new(sink: Arc<LogSink>) -> Self {
        Self {
            sink,
            last: Mutex::new(String::new()),
        }
    }

    /// Record a new status line; logs when the base text changed
    pub fn status_changed(&self, text: &str) -> Result<()> {
        let base = status_base(text);
        if base.is_empty() {
            return Ok(());
        }

        let mut last = self.last.lock();
        if *last == base {
            return Ok(());
        }
        *last = base.to_string();
        self.sink.file_line("status", Severity::Info, base)
    }
}
