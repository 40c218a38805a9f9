//! Error Types
//!
//! Failures the core surfaces to its callers. Missing or short individual
//! sections are not errors; only whole-operation failures are represented here.

use thiserror::Error;

/// Failure of a five-section lesson transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The completion service was unreachable, rejected the request, or
    /// returned nothing.
    #[error("completion service request failed")]
    Transport(#[source] anyhow::Error),
    /// The model answered, but no section carried usable content.
    ///
    /// `raw` is the untouched completion text, kept for diagnostics.
    #[error("model output did not follow the section format")]
    Format { raw: String },
}

/// Failure of a focus-check quiz generation.
#[derive(Debug, Error)]
pub enum QuizGenerationError {
    /// The generator's completion call failed.
    #[error("quiz generator request failed")]
    Transport(#[source] anyhow::Error),
    /// The generator answered with output that does not match the declared
    /// quiz shape.
    #[error("quiz output did not match the declared schema")]
    Schema { raw: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_transport_error_keeps_cause() {
        let err = TransformError::Transport(anyhow::anyhow!("connection refused"));
        assert_eq!(err.to_string(), "completion service request failed");
        let source = err.source().expect("transport error should expose its cause");
        assert!(source.to_string().contains("connection refused"));
    }

    #[test]
    fn test_format_error_preserves_raw_text() {
        let err = TransformError::Format {
            raw: "I cannot help with that.".to_string(),
        };
        match err {
            TransformError::Format { raw } => assert_eq!(raw, "I cannot help with that."),
            _ => panic!("Expected Format error"),
        }
    }

    #[test]
    fn test_quiz_error_display() {
        let err = QuizGenerationError::Schema {
            raw: "not json".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "quiz output did not match the declared schema"
        );
    }
}
