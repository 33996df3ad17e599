//! Error types for diaglog

use std::path::PathBuf;

/// Diaglog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid log role: {0}")]
    InvalidRole(String),

    #[error("Archive failed for {path}: {reason}")]
    ArchiveFailed { path: PathBuf, reason: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias for diaglog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn archive<S: Into<String>>(path: &std::path::Path, reason: S) -> Self {
        Error::ArchiveFailed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRole("bad role".to_string());
        assert_eq!(err.to_string(), "Invalid log role: bad role");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_archive_helper() {
        let err = Error::archive(std::path::Path::new("/logs/client.log"), "disk full");
        assert!(err.to_string().contains("client.log"));
        assert!(err.to_string().contains("disk full"));
    }
}
