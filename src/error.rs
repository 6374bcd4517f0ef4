//! Error types
//!
//! The simulation itself never fails: numeric edge cases clamp and a lost run
//! is a game phase. Only the outer surfaces (tuning files, upgrade selection)
//! report errors.

use std::fmt;
use std::path::PathBuf;

/// Failure to load or validate a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read tuning file {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid tuning JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Rejected upgrade selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectError {
    /// No draft is open (already chosen, or no level-up happened)
    NoDraftOpen,
    IndexOutOfRange { index: usize, choices: usize },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDraftOpen => write!(f, "no upgrade selection is open"),
            Self::IndexOutOfRange { index, choices } => {
                write!(f, "upgrade index {index} out of range (0..{choices})")
            }
        }
    }
}

impl std::error::Error for SelectError {}
