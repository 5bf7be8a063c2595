//! Stripe webhook signature verification.
//!
//! Implements verification of Stripe webhook signatures using HMAC-SHA256 over
//! `timestamp + "." + raw_body`, with a symmetric timestamp tolerance window to
//! prevent replay attacks.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::VerificationError;
use super::event::WebhookEvent;

type HmacSha256 = Hmac<Sha256>;

/// Default tolerance window (5 minutes), matching Stripe's client libraries.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). More than one is sent during secret rotation.
    pub v1_signatures: Vec<Vec<u8>>,
    /// Optional v0 legacy signature, never used for verification.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `VerificationError::MalformedHeader` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, VerificationError> {
        let header = header.trim();
        if header.is_empty() {
            return Err(malformed("empty header"));
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| malformed("invalid header format"))?;
            let value = value.trim();

            match key.trim() {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| malformed("invalid timestamp"))?);
                }
                "v1" => match hex::decode(value) {
                    Ok(signature) => v1_signatures.push(signature),
                    Err(_) => tracing::debug!("Skipping v1 signature that is not valid hex"),
                },
                "v0" => {
                    v0_signature = hex::decode(value).ok();
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        let timestamp = timestamp.ok_or_else(|| malformed("missing timestamp"))?;
        if v1_signatures.is_empty() {
            return Err(malformed("missing v1 signature"));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
            v0_signature,
        })
    }
}

fn malformed(reason: &str) -> VerificationError {
    VerificationError::MalformedHeader(reason.to_string())
}

/// Verifier for Stripe webhook signatures.
#[derive(Clone)]
pub struct WebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: SecretString,
    /// Maximum allowed distance between signature time and now.
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl WebhookVerifier {
    /// Creates a new verifier with the given webhook secret and tolerance.
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            tolerance_secs: tolerance_secs.abs(),
        }
    }

    pub fn tolerance_secs(&self) -> i64 {
        self.tolerance_secs
    }

    /// Verifies the webhook signature against the current time and parses the event.
    pub fn verify(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, VerificationError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Verifies the webhook signature as of `now` and parses the event.
    ///
    /// # Verification Steps
    ///
    /// 1. Reject an empty body
    /// 2. Parse the signature header
    /// 3. Validate the timestamp is within `now ± tolerance`
    /// 4. Compute the expected HMAC-SHA256 over the raw bytes
    /// 5. Compare against every v1 digest in constant time
    /// 6. Parse the JSON payload into a `WebhookEvent`
    ///
    /// # Errors
    ///
    /// - `EmptyBody` - Nothing was sent
    /// - `MalformedHeader` - Header could not be parsed
    /// - `TimestampOutsideTolerance` - Signature is too old or too far in the future
    /// - `SignatureMismatch` - No digest matched
    /// - `InvalidPayload` - Body is authentic but not an event
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<WebhookEvent, VerificationError> {
        if payload.is_empty() {
            return Err(VerificationError::EmptyBody);
        }

        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp, now)?;

        let expected = self.compute_signature(header.timestamp, payload);
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            tracing::warn!(
                timestamp = header.timestamp,
                candidates = header.v1_signatures.len(),
                "Webhook signature mismatch"
            );
            return Err(VerificationError::SignatureMismatch);
        }

        serde_json::from_slice(payload).map_err(|e| VerificationError::InvalidPayload(e.to_string()))
    }

    /// Validates that the timestamp is within `now ± tolerance`.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), VerificationError> {
        let age = now.saturating_sub(timestamp);

        if age.saturating_abs() > self.tolerance_secs {
            tracing::warn!(
                event_timestamp = timestamp,
                current_time = now,
                age_secs = age,
                "Webhook timestamp outside tolerance - possible replay"
            );
            return Err(VerificationError::TimestampOutsideTolerance {
                age_secs: age,
                tolerance_secs: self.tolerance_secs,
            });
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and raw payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        sign_payload(self.secret.expose_secret(), timestamp, payload)
    }
}

/// HMAC-SHA256 of `timestamp.payload` under `secret`.
fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac.finalize().into_bytes().to_vec()
}

/// Builds a `Stripe-Signature` header value for `payload` signed at `timestamp`.
///
/// Used by tests and local tooling to produce deliveries the verifier accepts.
pub fn signature_header_for(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(sign_payload(secret, timestamp, payload))
    )
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
