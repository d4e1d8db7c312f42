//! Error shared by every repository port.

use crate::domain::Error;

/// Errors raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-provided context.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-provided context.
        message: String,
    },
    /// A uniqueness constraint rejected the write.
    #[error("store rejected duplicate record: {message}")]
    Conflict {
        /// Adapter-provided context.
        message: String,
    },
    /// The write referenced a record that does not exist.
    #[error("store rejected missing reference: {message}")]
    MissingReference {
        /// Adapter-provided context.
        message: String,
    },
}

impl StoreError {
    /// Create a [`StoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a [`StoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a [`StoreError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a [`StoreError::MissingReference`].
    pub fn missing_reference(message: impl Into<String>) -> Self {
        Self::MissingReference {
            message: message.into(),
        }
    }
}

/// Default translation into a domain error.
///
/// Services intercept `Conflict` and `MissingReference` where those carry a
/// domain meaning (a duplicate vote, an unknown user) before falling back to
/// this mapping.
impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Connection { message } => Self::service_unavailable(message),
            StoreError::Query { message }
            | StoreError::Conflict { message }
            | StoreError::MissingReference { message } => Self::internal(message),
        }
    }
}
