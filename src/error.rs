//! Error taxonomy for the persistence layer.
//!
//! `PersistenceError` plays the role of the base "persistence exception":
//! callers that only need coarse handling match on the whole enum (or on
//! [`ErrorKind`]), while recovery logic matches on the specific variant.

use thiserror::Error;

/// Errors raised by a persistence backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The requested account identity does not exist.
    #[error("No such user: {0}")]
    NoSuchUser(String),

    /// The requested adaptation-data key does not exist.
    #[error("No such property: {0}")]
    NoSuchProperty(String),

    /// The requested job listing does not exist.
    ///
    /// Extension of `NoSuchProperty` for job resources.
    #[error("No such job listing: {0}")]
    NoSuchJob(String),

    /// An entity with the same identifier is already stored.
    #[error("Duplicate {0}: {1}")]
    DuplicateEntity(String, String),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a seed/snapshot file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Seed, snapshot, or configuration data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of a [`PersistenceError`].
///
/// Used by the logging collaborator so that failure records never need to
/// carry the (possibly sensitive) error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ErrorKind {
    NoSuchUser,
    NoSuchProperty,
    NoSuchJob,
    DuplicateEntity,
    Config,
    Io,
    Serialization,
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersistenceError::NoSuchUser(_) => ErrorKind::NoSuchUser,
            PersistenceError::NoSuchProperty(_) => ErrorKind::NoSuchProperty,
            PersistenceError::NoSuchJob(_) => ErrorKind::NoSuchJob,
            PersistenceError::DuplicateEntity(_, _) => ErrorKind::DuplicateEntity,
            PersistenceError::Config(_) => ErrorKind::Config,
            PersistenceError::Io(_) => ErrorKind::Io,
            PersistenceError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// True for the lookup failures (`NoSuchUser`, `NoSuchProperty`, `NoSuchJob`).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PersistenceError::NoSuchUser(_)
                | PersistenceError::NoSuchProperty(_)
                | PersistenceError::NoSuchJob(_)
        )
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        PersistenceError::Config(message.into())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(error: std::io::Error) -> Self {
        PersistenceError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(error: serde_json::Error) -> Self {
        PersistenceError::Serialization(error.to_string())
    }
}
