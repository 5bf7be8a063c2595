//! Webhook verification error types.
//!
//! Every variant is request-scoped: a bad delivery is rejected with a 4xx and
//! never affects other requests.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while authenticating an inbound webhook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Request body was empty, nothing to verify.
    #[error("Empty request body")]
    EmptyBody,

    /// Signature header missing components or not parseable.
    #[error("Malformed signature header: {0}")]
    MalformedHeader(String),

    /// None of the provided digests matched the expected HMAC.
    #[error("Signature mismatch")]
    SignatureMismatch,

    /// Signature timestamp lies outside the allowed tolerance window.
    #[error("Timestamp outside tolerance ({age_secs}s, tolerance {tolerance_secs}s)")]
    TimestampOutsideTolerance { age_secs: i64, tolerance_secs: i64 },

    /// Payload was authentic but is not a well-formed event.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl VerificationError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::EmptyBody => "EMPTY_BODY",
            VerificationError::MalformedHeader(_) => "MALFORMED_SIGNATURE_HEADER",
            VerificationError::SignatureMismatch => "SIGNATURE_MISMATCH",
            VerificationError::TimestampOutsideTolerance { .. } => "TIMESTAMP_OUTSIDE_TOLERANCE",
            VerificationError::InvalidPayload(_) => "INVALID_PAYLOAD",
        }
    }

    /// Every verification failure is a client error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_mismatch_displays_correctly() {
        let err = VerificationError::SignatureMismatch;
        assert_eq!(format!("{}", err), "Signature mismatch");
    }

    #[test]
    fn malformed_header_displays_reason() {
        let err = VerificationError::MalformedHeader("missing timestamp".to_string());
        assert_eq!(
            format!("{}", err),
            "Malformed signature header: missing timestamp"
        );
    }

    #[test]
    fn timestamp_outside_tolerance_displays_age() {
        let err = VerificationError::TimestampOutsideTolerance {
            age_secs: 600,
            tolerance_secs: 300,
        };
        assert_eq!(
            format!("{}", err),
            "Timestamp outside tolerance (600s, tolerance 300s)"
        );
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            VerificationError::EmptyBody.code(),
            VerificationError::MalformedHeader(String::new()).code(),
            VerificationError::SignatureMismatch.code(),
            VerificationError::TimestampOutsideTolerance {
                age_secs: 0,
                tolerance_secs: 0,
            }
            .code(),
            VerificationError::InvalidPayload(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn all_variants_return_bad_request() {
        assert_eq!(
            VerificationError::EmptyBody.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VerificationError::SignatureMismatch.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            VerificationError::TimestampOutsideTolerance {
                age_secs: 600,
                tolerance_secs: 300
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
