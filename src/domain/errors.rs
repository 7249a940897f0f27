//! Domain errors for the Sherlock phase gate.

use thiserror::Error;

/// Domain-level errors that can occur in the Sherlock core.
///
/// Evidentiary gaps and GUILTY verdicts are never errors; they surface as
/// failed checks and remediation lists instead.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unknown pipeline phase: {0} (expected 1-7)")]
    UnknownPhase(u8),

    #[error("Unknown phase name: {0}")]
    UnknownPhaseName(String),

    #[error("Invalid state transition from {from} to {to}: {reason}")]
    InvalidStateTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("GUILTY verdict for phase {phase} has no remediations")]
    MissingRemediation { phase: u8 },

    #[error("Verdict validator failed: {0}")]
    ValidatorFailed(String),

    #[error("Coordination store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_phase_message() {
        let err = DomainError::UnknownPhase(9);
        assert_eq!(err.to_string(), "Unknown pipeline phase: 9 (expected 1-7)");
    }

    #[test]
    fn test_serde_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DomainError = parse_err.into();
        assert!(matches!(err, DomainError::SerializationError(_)));
    }
}
