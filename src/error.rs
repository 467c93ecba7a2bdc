use thiserror::Error;

/// Errors surfaced by repeat inference.
///
/// Only adapter failures and malformed persisted plans are errors. A plan that
/// fails round-trip verification is never reported here; inference falls back
/// to the identity fold instead.
#[derive(Error, Debug)]
pub enum FoldError {
    /// The adapter could not produce a fingerprint for a position.
    #[error("Fingerprint unavailable at position {position}: {reason}")]
    Fingerprint { position: usize, reason: String },

    /// The adapter could not produce a boundary marker for a position.
    #[error("Boundary unavailable at position {position}: {reason}")]
    Boundary { position: usize, reason: String },

    /// A position outside `0..len` was requested from an adapter.
    #[error("Position {position} out of range for sequence of length {len}")]
    PositionOutOfRange { position: usize, len: usize },

    /// A plan violates the repeat/volta structure invariants.
    #[error("Invalid plan: {reason}")]
    InvalidPlan { reason: String },

    #[error("Plan serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl FoldError {
    pub(crate) fn invalid_plan(reason: impl Into<String>) -> Self {
        FoldError::InvalidPlan {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FoldError::PositionOutOfRange { position: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Position 7 out of range for sequence of length 3"
        );

        let err = FoldError::invalid_plan("repeat 0 ends past folded length 4");
        assert_eq!(
            err.to_string(),
            "Invalid plan: repeat 0 ends past folded length 4"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: FoldError = parse.unwrap_err().into();
        assert!(matches!(err, FoldError::Json(_)));
    }
}
