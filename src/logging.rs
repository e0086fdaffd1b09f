//! Logging collaborator used by persistence backends.
//!
//! Backends emit one [`LogEntry`] per contract operation. What happens to the
//! entry is up to the [`PersistenceLogger`] they were given: the default
//! [`TracingLogger`] forwards it to `tracing`, [`RecordingLogger`] keeps it in
//! memory.

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::ErrorKind;

/// Contract operation a log entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    FindRoles,
    FindCredentialsByName,
    FindCredentialsById,
    FindReportedUsers,
    RemoveAccount,
    FindUserReport,
    SetUsername,
    SetPassword,
    ListJobs,
    GetJobListingReport,
    RemoveJobListing,
    Property,
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The target was absent and the operation was a benign no-op.
    Absent,
    Failure(ErrorKind),
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub operation: Operation,
    /// Identifier, name, key, or date the call was about. Never a secret.
    pub subject: String,
    pub outcome: Outcome,
}

impl LogEntry {
    pub fn new(operation: Operation, subject: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            operation,
            subject: subject.into(),
            outcome,
        }
    }
}

/// Sink for persistence diagnostics.
#[cfg_attr(test, mockall::automock)]
pub trait PersistenceLogger: Send + Sync {
    fn record(&self, entry: LogEntry);
}

/// Forwards entries to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl PersistenceLogger for TracingLogger {
    fn record(&self, entry: LogEntry) {
        match entry.outcome {
            Outcome::Success => debug!("{}({}) succeeded", entry.operation, entry.subject),
            Outcome::Absent => debug!("{}({}): nothing to do", entry.operation, entry.subject),
            Outcome::Failure(kind) => {
                warn!("{}({}) failed: {}", entry.operation, entry.subject, kind)
            }
        }
    }
}

/// Keeps every entry in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl PersistenceLogger for RecordingLogger {
    fn record(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
    }
}
