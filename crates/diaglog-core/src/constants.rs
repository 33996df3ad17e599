//! Constants and default values for diaglog

use std::path::PathBuf;

/// Default diaglog home directory name
pub const DIAGLOG_DIR: &str = ".diaglog";

/// Default log directory name
pub const LOGS_DIR: &str = "logs";

/// Log file extension (active and suffixed files)
pub const LOG_EXT: &str = "log";

/// Archive file extension
pub const ARCHIVE_EXT: &str = "zip";

/// Date component of archive names, e.g. `2026-08-29-3.zip`
pub const ARCHIVE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Maximum number of archives kept after a pruning pass
pub const MAX_ARCHIVES: usize = 20;

/// Timestamp format for log lines
pub const LINE_TIME_FORMAT: &str = "%H:%M:%S";

/// Get the diaglog home directory
pub fn diaglog_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DIAGLOG_DIR))
        .unwrap_or_else(|| PathBuf::from(DIAGLOG_DIR))
}

/// Get the default log directory
pub fn log_dir() -> PathBuf {
    diaglog_home().join(LOGS_DIR)
}

/// Canonical (unsuffixed) log file name for a role
pub fn log_file_name(role: &str) -> String {
    format!("{}.{}", role, LOG_EXT)
}

/// Suffixed log file name for a role, used when the canonical file is busy
pub fn suffixed_log_file_name(role: &str, n: u32) -> String {
    format!("{}{}.{}", role, n, LOG_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir() {
        let dir = log_dir();
        assert!(dir.to_string_lossy().contains(".diaglog"));
        assert!(dir.to_string_lossy().ends_with("logs"));
    }

    #[test]
    fn test_log_file_names() {
        assert_eq!(log_file_name("client"), "client.log");
        assert_eq!(suffixed_log_file_name("client", 2), "client2.log");
    }
}
