//! Error types for lifecycle listeners.

use rulebook_validator::ValidationFailure;
use thiserror::Error;

/// Result type for lifecycle operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reasons a lifecycle listener aborted a dispatch.
#[derive(Error, Debug)]
pub enum Error {
    /// The validator reported an error, usually a validation failure.
    #[error(transparent)]
    Validator(#[from] rulebook_validator::Error),

    /// A listener refused the entity without a validator error.
    #[error("listener for '{event}' rejected the entity: {reason}")]
    Rejected {
        /// The dispatched event name
        event: String,
        /// Why the entity was refused
        reason: String,
    },
}

impl Error {
    /// Builds a [`Error::Rejected`].
    pub fn rejected(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            event: event.into(),
            reason: reason.into(),
        }
    }

    /// The validation failure, if the validator rejected the attributes.
    #[must_use]
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validator(err) => err.failure(),
            Self::Rejected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display_names_the_event() {
        let err = Error::rejected("deleting: project", "archived projects are immutable");

        assert_eq!(
            err.to_string(),
            "listener for 'deleting: project' rejected the entity: archived projects are immutable"
        );
        assert!(err.failure().is_none());
    }

    #[test]
    fn validator_errors_convert() {
        let err: Error = rulebook_validator::Error::UnknownOperation {
            operation: "explode".to_owned(),
        }
        .into();

        assert!(matches!(err, Error::Validator(_)));
        assert!(err.to_string().contains("explode"));
    }
}
