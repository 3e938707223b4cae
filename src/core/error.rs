//! Error and diagnostic types
//!
//! Structural failures (input that cannot be decomposed into lines) and
//! query-time failures are [`LogError`]s. Anything recoverable during a
//! scan becomes a [`Diagnostic`] instead: the offending event is dropped,
//! parsing continues, and callers inspect the accumulated records before
//! trusting the output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogError {
    #[error("Log input contains no lines")]
    EmptyLog,

    #[error("Invalid time format: expected 'turn.impulse', got '{0}'")]
    TimeFormat(String),

    #[error("Unit not found: {0}")]
    UnknownUnit(String),

    #[error("Impulse {impulse} is not recorded for unit '{unit}'")]
    ImpulseNotRecorded { unit: String, impulse: u32 },

    #[error("Invalid facing: {0}")]
    InvalidFacing(String),

    #[error("Invalid hex location: {0}")]
    InvalidLocation(String),
}

pub type Result<T> = std::result::Result<T, LogError>;

/// How much a diagnostic should worry the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// A single event was dropped or guessed at; the rest of the unit's
    /// timeline is intact
    Warning,
    /// Part of the log could not be interpreted at all
    Error,
}

/// One recoverable problem found while scanning the log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Unit the problem belongs to, when attributable
    pub unit: Option<String>,
    /// Linear impulse active when the problem was found
    pub impulse: Option<u32>,
    pub message: String,
}

/// Append-only collection of diagnostics for one scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        severity: Severity,
        unit: Option<&str>,
        impulse: Option<u32>,
        message: impl Into<String>,
    ) {
        let message = message.into();
        match severity {
            Severity::Warning => tracing::warn!(?unit, ?impulse, "{message}"),
            Severity::Error => tracing::error!(?unit, ?impulse, "{message}"),
        }
        self.entries.push(Diagnostic {
            severity,
            unit: unit.map(str::to_string),
            impulse,
            message,
        });
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Move every entry out, leaving the log empty
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_records_fields() {
        let mut log = DiagnosticLog::new();
        log.push(Severity::Warning, Some("Kzinti CA"), Some(37), "dropped event");

        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.unit.as_deref(), Some("Kzinti CA"));
        assert_eq!(entry.impulse, Some(37));
    }

    #[test]
    fn test_drain_empties_log() {
        let mut log = DiagnosticLog::new();
        log.push(Severity::Error, None, None, "bad header");

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}
