use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::{StripeError, types::Event};

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Verify a `t=<ts>,v1=<hex>` signature header against the raw payload and
/// shared secret. Rejects stale timestamps to limit replay of captured
/// deliveries.
pub fn verify_signature(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
    now_unix: i64,
) -> Result<(), StripeError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in sig_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse().ok();
            }
            Some(("v1", value)) => {
                if let Ok(bytes) = hex::decode(value) {
                    candidates.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| StripeError::Signature("missing timestamp".into()))?;
    if candidates.is_empty() {
        return Err(StripeError::Signature("missing v1 signature".into()));
    }
    if (now_unix - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(StripeError::Signature("timestamp outside tolerance".into()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| StripeError::Signature("invalid secret".into()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    for candidate in &candidates {
        if candidate.len() == expected.len()
            && bool::from(candidate.as_slice().ct_eq(expected.as_slice()))
        {
            return Ok(());
        }
    }

    Err(StripeError::Signature("signature mismatch".into()))
}

/// Reconstruct a verified event from the raw body and signature header.
pub fn construct_event(
    payload: &[u8],
    sig_header: &str,
    secret: &str,
) -> Result<Event, StripeError> {
    verify_signature(payload, sig_header, secret, chrono::Utc::now().timestamp())?;
    serde_json::from_slice(payload).map_err(StripeError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test123secret456";

    fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(payload);
        format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn accepts_valid_signature() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign(payload, SECRET, now);
        assert!(verify_signature(payload, &header, SECRET, now).is_ok());
    }

    #[test]
    fn rejects_wrong_secret() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign(payload, "wrong_secret", now);
        assert!(verify_signature(payload, &header, SECRET, now).is_err());
    }

    #[test]
    fn rejects_tampered_payload() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let tampered = br#"{"type":"checkout.session.completed","amount":0}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign(payload, SECRET, now);
        assert!(verify_signature(tampered, &header, SECRET, now).is_err());
    }

    #[test]
    fn rejects_stale_timestamp() {
        let payload = br#"{"type":"checkout.session.completed"}"#;
        let now = chrono::Utc::now().timestamp();
        let old = now - SIGNATURE_TOLERANCE_SECS - 60;
        let header = sign(payload, SECRET, old);
        assert!(verify_signature(payload, &header, SECRET, now).is_err());
    }

    #[test]
    fn rejects_malformed_header() {
        let payload = br#"{}"#;
        let now = chrono::Utc::now().timestamp();
        assert!(verify_signature(payload, "garbage", SECRET, now).is_err());
        assert!(verify_signature(payload, "t=123", SECRET, now).is_err());
        assert!(verify_signature(payload, "v1=abcd", SECRET, now).is_err());
    }

    #[test]
    fn construct_event_parses_verified_payload() {
        let payload =
            br#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1"}}}"#;
        let now = chrono::Utc::now().timestamp();
        let header = sign(payload, SECRET, now);
        let event = construct_event(payload, &header, SECRET).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
    }
}
