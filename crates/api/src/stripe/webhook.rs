//! Stripe webhook signature verification.
//!
//! Stripe signs each delivery with `Stripe-Signature: t=<unix>,v1=<hex>`,
//! where the hex value is HMAC-SHA256 over `"{t}.{raw body}"` keyed with
//! the endpoint's webhook secret. Verification must run on the raw bytes,
//! before any JSON parsing.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::Sha256;

use super::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// How far the signed timestamp may drift from now, in seconds. Matches
/// Stripe's own SDK default.
const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// A parsed webhook event, reduced to the fields reconciliation needs.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookObject,
}

/// The object a webhook event wraps. For `checkout.session.completed` the
/// id is the checkout session id recorded at payment initiation.
#[derive(Debug, Deserialize)]
pub struct WebhookObject {
    pub id: String,
}

/// Verifies `Stripe-Signature` headers against the endpoint secret.
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    /// Build a verifier from the endpoint's webhook secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Verify a delivery's signature against its raw body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedHeader` if the header doesn't carry
    /// a `t` and at least one `v1` component, `WebhookError::Expired` if the
    /// timestamp is more than five minutes from `now`, and
    /// `WebhookError::BadSignature` if no `v1` value matches.
    pub fn verify(&self, header: &str, payload: &[u8], now: i64) -> Result<(), WebhookError> {
        let (timestamp, signatures) = parse_signature_header(header)?;

        if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
            return Err(WebhookError::Expired);
        }

        // Signed payload is "{t}.{body}", keyed with the endpoint secret.
        let mut signed = Vec::with_capacity(payload.len() + 16);
        signed.extend_from_slice(timestamp.to_string().as_bytes());
        signed.push(b'.');
        signed.extend_from_slice(payload);

        for signature in signatures {
            let Ok(expected) = hex::decode(signature) else {
                continue;
            };
            let Ok(mut mac) =
                HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            else {
                return Err(WebhookError::BadSignature);
            };
            mac.update(&signed);
            // Constant-time comparison.
            if mac.verify_slice(&expected).is_ok() {
                return Ok(());
            }
        }

        Err(WebhookError::BadSignature)
    }
}

/// Split `t=1614556800,v1=abc,v1=def` into the timestamp and the `v1`
/// candidates. Unknown schemes are ignored, as Stripe documents.
fn parse_signature_header(header: &str) -> Result<(i64, Vec<&str>), WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse::<i64>().map_err(|_| WebhookError::MalformedHeader)?);
            }
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    match (timestamp, signatures.is_empty()) {
        (Some(t), false) => Ok((t, signatures)),
        _ => Err(WebhookError::MalformedHeader),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::from(SECRET))
    }

    #[test]
    fn test_valid_signature_accepted() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now));
        assert!(verifier().verify(&header, payload, now).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let payload = br#"{"amount":100}"#;
        let now = 1_700_000_000;
        let header = format!("t={now},v1={}", sign(payload, now));
        assert_eq!(
            verifier().verify(&header, br#"{"amount":999}"#, now),
            Err(WebhookError::BadSignature)
        );
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let payload = b"{}";
        let signed_at = 1_700_000_000;
        let header = format!("t={signed_at},v1={}", sign(payload, signed_at));
        assert_eq!(
            verifier().verify(&header, payload, signed_at + 301),
            Err(WebhookError::Expired)
        );
    }

    #[test]
    fn test_timestamp_within_tolerance_accepted() {
        let payload = b"{}";
        let signed_at = 1_700_000_000;
        let header = format!("t={signed_at},v1={}", sign(payload, signed_at));
        assert!(verifier().verify(&header, payload, signed_at + 299).is_ok());
    }

    #[test]
    fn test_missing_components_rejected() {
        let err = Err(WebhookError::MalformedHeader);
        assert_eq!(verifier().verify("", b"{}", 0), err);
        assert_eq!(verifier().verify("t=123", b"{}", 0), err);
        assert_eq!(verifier().verify("v1=abcd", b"{}", 0), err);
        assert_eq!(verifier().verify("t=notanumber,v1=abcd", b"{}", 0), err);
    }

    #[test]
    fn test_second_v1_candidate_accepted() {
        // Stripe sends multiple v1 values during secret rotation.
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v1={},v1={}", "00".repeat(32), sign(payload, now));
        assert!(verifier().verify(&header, payload, now).is_ok());
    }

    #[test]
    fn test_unknown_scheme_ignored() {
        let payload = b"{}";
        let now = 1_700_000_000;
        let header = format!("t={now},v0=legacy,v1={}", sign(payload, now));
        assert!(verifier().verify(&header, payload, now).is_ok());
    }

    #[test]
    fn test_event_deserializes_session_id() {
        let body = r#"{
            "type": "checkout.session.completed",
            "data": { "object": { "id": "cs_test_123", "amount_total": 4990 } }
        }"#;
        let event: WebhookEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object.id, "cs_test_123");
    }
}
