//! Error types for the rule engine.

use thiserror::Error;

use crate::failure::ValidationFailure;

/// Result type for rule engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by a [`Validator`](crate::Validator).
///
/// None of these are transient: nothing here is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend rejected the attributes and exception mode is on.
    #[error(transparent)]
    Validation(Box<ValidationFailure>),

    /// A dynamically dispatched call matched neither a `validate<Action>`
    /// name nor a passthrough of the last backend check.
    #[error("`{operation}` does not exist on this validator or its last backend check")]
    UnknownOperation {
        /// The requested operation
        operation: String,
    },

    /// A `validate<Action>` call was made without attributes.
    #[error("missing attributes to validate for `{operation}`")]
    MissingAttributes {
        /// The requested operation
        operation: String,
    },

    /// Error input was neither a field → messages object nor a message
    /// provider.
    #[error("cannot build validation messages from {kind}: expected an object of field messages")]
    MalformedErrors {
        /// JSON kind of the offending value
        kind: &'static str,
    },
}

impl Error {
    /// Returns true for a validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure, if this is one.
    #[must_use]
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(&**failure),
            _ => None,
        }
    }

    /// Converts into the validation failure, if this is one.
    #[must_use]
    pub fn into_failure(self) -> Option<ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(*failure),
            _ => None,
        }
    }
}

impl From<ValidationFailure> for Error {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(Box::new(failure))
    }
}
