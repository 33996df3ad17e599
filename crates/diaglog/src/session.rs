//! Session banner
//!
//! The first lines of every log file identify the run well enough that a log
//! attached to a bug report can be placed without asking the reporter
//! anything.

use std::env;

use diaglog_core::{RunMode, Severity};
use diaglog_files::LogSink;

/// Write the session metadata banner to the active log
pub fn log_session_start(sink: &LogSink, role: &str, mode: RunMode) {
    let lines = [
        format!(
            "Starting {} session ({}) - diaglog v{}",
            role,
            mode,
            env!("CARGO_PKG_VERSION")
        ),
        format!("Running on {} {}", env::consts::OS, env::consts::ARCH),
        format!(
            "Executable: {}",
            env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string())
        ),
        format!(
            "Working directory: {}",
            env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string())
        ),
        format!(
            "Launch parameters: {}",
            env::args().skip(1).collect::<Vec<_>>().join(" ")
        ),
    ];

    for line in &lines {
        sink.log("startup", Severity::Info, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_banner_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.log");
        let sink = LogSink::open(path.clone(), RunMode::Headless).unwrap();

        log_session_start(&sink, "client", RunMode::Headless);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Starting client session (headless)"));
        assert!(content.contains("Running on"));
        assert!(content.contains("Executable:"));
        assert!(content.contains("Working directory:"));
        assert!(content.contains("Launch parameters:"));
    }
}
