use std::{borrow::Cow, error::Error as StdError, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use sqlx::{
    error::{DatabaseError, ErrorKind as DatabaseErrorKind},
    Error as SqlxError,
};
use thiserror::Error;

/// Error taxonomy for sentence annotation and persistence.
///
/// Outcomes that are valid no-ops (tagging only already-claimed words, asking for default
/// connections with zero or several predicates) are *not* errors; they are reported through
/// [`crate::sentence::TagOutcome`] and [`crate::sentence::DefaultConnections`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum LingError {
    /// Malformed operation input. Retrying without fixing the input fails the same way.
    #[error("Invalid operation: {0}")]
    Validation(String),
    /// The morphological analyzer produced no candidate for a word.
    #[error("Morphological analysis failed: {0}")]
    Analysis(String),
    /// The annotation store rejected or failed a query.
    #[error("Annotation store error: {0}")]
    Cache(String),
    /// A well-formed request the current store state does not allow.
    #[error("Refused: {0}")]
    Command(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl LingError {
    pub(crate) fn out_of_range(what: &str, idx: usize, len: usize) -> Self {
        LingError::Validation(format!("{what} index {idx} out of range (len {len})"))
    }
}

impl From<toml::de::Error> for LingError {
    fn from(src: toml::de::Error) -> LingError {
        LingError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for LingError {
    fn from(src: toml::ser::Error) -> LingError {
        LingError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for LingError {
    fn from(src: JsonError) -> LingError {
        LingError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for LingError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LingError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => LingError::PermissionDenied,
            _ => LingError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<SqlxError> for LingError {
    fn from(db_error: SqlxError) -> Self {
        match db_error {
            SqlxError::RowNotFound => LingError::NotFound("database row".to_string()),
            other => LingError::Cache(format!("database error: {other:?}")),
        }
    }
}

impl DatabaseError for LingError {
    fn message(&self) -> &str {
        "stored row does not decode into an annotation type"
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        DatabaseErrorKind::Other
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        None
    }

    #[doc(hidden)]
    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    #[doc(hidden)]
    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    #[doc(hidden)]
    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }
}
