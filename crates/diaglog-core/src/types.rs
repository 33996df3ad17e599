//! Core types for diaglog

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Regex pattern for valid log roles: only alphanumeric, underscore, and hyphen.
/// Roles become file name stems, so path separators and dots are rejected.
static ROLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid role regex"));

/// Validate a log role before it is used as a file name stem
pub fn validate_role(role: &str) -> Result<()> {
    if role.is_empty() || !ROLE_REGEX.is_match(role) {
        return Err(Error::InvalidRole(role.to_string()));
    }
    Ok(())
}

/// Severity of a log line, mapped to console colors by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run mode of the host process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Interactive session with a user-facing surface
    Interactive,
    /// Headless session (dedicated server, batch run)
    Headless,
}

impl FromStr for RunMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "interactive" | "client" => Ok(RunMode::Interactive),
            "headless" | "server" => Ok(RunMode::Headless),
            other => Err(Error::config(format!("Unknown run mode: {}", other))),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Interactive => f.write_str("interactive"),
            RunMode::Headless => f.write_str("headless"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_role() {
        assert!(validate_role("client").is_ok());
        assert!(validate_role("server-2").is_ok());
        assert!(validate_role("").is_err());
        assert!(validate_role("../etc/passwd").is_err());
        assert!(validate_role("a b").is_err());
    }

    #[test]
    fn test_run_mode_parse() {
        assert_eq!("interactive".parse::<RunMode>().unwrap(), RunMode::Interactive);
        assert_eq!("SERVER".parse::<RunMode>().unwrap(), RunMode::Headless);
        assert!("batch".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warn.to_string(), "WARN");
    }
}
