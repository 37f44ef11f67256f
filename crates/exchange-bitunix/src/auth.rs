//! Double-SHA256 authentication for the Bitunix OpenAPI.
//!
//! The signature is computed in two passes:
//!
//! 1. `digest = sha256(nonce + timestamp + api_key + query + body)` (hex)
//! 2. `sign   = sha256(digest + secret_key)` (hex)
//!
//! `query` is the canonical query string: parameters sorted by key in byte
//! order and concatenated as bare `key` + `value` pairs — no separators, no
//! URL-encoding. `body` is the exact JSON text sent on the wire. The
//! construction is bit-exact: any change in field order, case, or whitespace
//! invalidates the request.
//!
//! # Security
//!
//! - The secret key is held as a [`SecretString`] and never logged
//! - `Debug` output redacts the secret

use crate::error::{BitunixError, Result};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

// =============================================================================
// Primitives
// =============================================================================

/// Generates a single-use random nonce: a UUID v4 with the hyphens stripped
/// (32 hex characters). Reusing a nonce/timestamp pair is a protocol
/// violation the exchange rejects.
#[must_use]
pub fn nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Current Unix time in milliseconds, as the decimal string the exchange
/// expects.
///
/// # Errors
/// Returns a signing error if the system clock reads before the Unix epoch.
pub fn timestamp_ms() -> Result<String> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BitunixError::Signing(format!("failed to read system clock: {e}")))?
        .as_millis();
    Ok(millis.to_string())
}

/// Builds the canonical query string: keys sorted in byte order, each pair
/// concatenated as `key` + `value` with nothing in between.
#[must_use]
pub fn canonical_query(params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (key, value) in sorted {
        out.push_str(key);
        out.push_str(value);
    }
    out
}

/// Computes the Bitunix request signature over the given fields. Unused
/// fields are passed as empty strings.
#[must_use]
pub fn sign(
    api_key: &str,
    secret_key: &str,
    nonce: &str,
    timestamp: &str,
    query: &str,
    body: &str,
) -> String {
    let digest = hex::encode(Sha256::digest(format!(
        "{nonce}{timestamp}{api_key}{query}{body}"
    )));
    hex::encode(Sha256::digest(format!("{digest}{secret_key}")))
}

// =============================================================================
// Signed Headers
// =============================================================================

/// Headers required on every authenticated Bitunix request.
#[derive(Debug, Clone)]
pub struct SignedHeaders {
    pub api_key: String,
    pub sign: String,
    pub nonce: String,
    pub timestamp: String,
}

impl SignedHeaders {
    /// Returns headers as tuples for reqwest.
    #[must_use]
    pub fn as_tuples(&self) -> [(&'static str, &str); 4] {
        [
            ("api-key", &self.api_key),
            ("sign", &self.sign),
            ("nonce", &self.nonce),
            ("timestamp", &self.timestamp),
        ]
    }
}

// =============================================================================
// BitunixSigner
// =============================================================================

/// Holds the API key pair and produces the header set for a request.
pub struct BitunixSigner {
    api_key: String,
    secret_key: SecretString,
}

impl std::fmt::Debug for BitunixSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitunixSigner")
            .field("api_key", &self.api_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl BitunixSigner {
    #[must_use]
    pub fn new(api_key: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key,
        }
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Signs a request with a fresh nonce and the current clock.
    ///
    /// # Arguments
    /// * `query` - Canonical query string (empty for POST)
    /// * `body` - Exact JSON body text (empty for GET)
    ///
    /// # Errors
    /// Returns an error if the system clock is unavailable.
    pub fn sign_request(&self, query: &str, body: &str) -> Result<SignedHeaders> {
        let nonce = nonce();
        let timestamp = timestamp_ms()?;
        Ok(self.sign_request_with(&nonce, &timestamp, query, body))
    }

    /// Signs a request with explicit nonce and timestamp (useful for
    /// testing).
    #[must_use]
    pub fn sign_request_with(
        &self,
        nonce: &str,
        timestamp: &str,
        query: &str,
        body: &str,
    ) -> SignedHeaders {
        let sign = sign(
            &self.api_key,
            self.secret_key.expose_secret(),
            nonce,
            timestamp,
            query,
            body,
        );
        SignedHeaders {
            api_key: self.api_key.clone(),
            sign,
            nonce: nonce.to_string(),
            timestamp: timestamp.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "test-api-key";
    const SECRET_KEY: &str = "test-secret-key";
    const NONCE: &str = "f47ac10b58cc4372a5670e02b2c3d479";
    const TIMESTAMP: &str = "1706817600000";

    // ==================== Canonical Query Tests ====================

    #[test]
    fn test_canonical_query_sorts_by_key() {
        let params = vec![
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ];
        assert_eq!(canonical_query(&params), "a1b2");
    }

    #[test]
    fn test_canonical_query_independent_of_insertion_order() {
        let forward = vec![
            ("symbol".to_string(), "BTCUSDT".to_string()),
            ("limit".to_string(), "10".to_string()),
        ];
        let reverse = vec![
            ("limit".to_string(), "10".to_string()),
            ("symbol".to_string(), "BTCUSDT".to_string()),
        ];
        assert_eq!(canonical_query(&forward), canonical_query(&reverse));
        assert_eq!(canonical_query(&forward), "limit10symbolBTCUSDT");
    }

    #[test]
    fn test_canonical_query_empty() {
        assert_eq!(canonical_query(&[]), "");
    }

    // ==================== Signature Tests ====================

    #[test]
    fn test_signature_known_vector_query() {
        let signature = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "symbolBTCUSDT", "");
        assert_eq!(
            signature,
            "f4f4fdcd7db9ab5c49a348e5994bf3d3a357c53e6a1b2ee5cfb78d8fa52611d5"
        );
    }

    #[test]
    fn test_signature_known_vector_body() {
        let body = r#"{"symbol":"BTCUSDT","positionId":"12345","slPrice":"95.1234"}"#;
        let signature = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "", body);
        assert_eq!(
            signature,
            "e83c091fbfe308ab6bdcb333a4e67f1c02b606fd337c81efb94136df67659fad"
        );
    }

    #[test]
    fn test_signature_known_vector_empty_fields() {
        assert_eq!(
            sign("k", "s", "n", "1", "", ""),
            "8239a31bf6ed06c008ac146f679bf16e5881d45457efcf6d43de56ce21ccf91f"
        );
    }

    #[test]
    fn test_signature_is_deterministic() {
        let first = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "symbolBTCUSDT", "");
        let second = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "symbolBTCUSDT", "");
        assert_eq!(first, second);
    }

    #[test]
    fn test_signature_changes_with_any_input_byte() {
        let baseline = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "symbolBTCUSDT", "");

        // Last nonce byte flipped from 9 to 8.
        let other_nonce = "f47ac10b58cc4372a5670e02b2c3d478";
        let changed = sign(API_KEY, SECRET_KEY, other_nonce, TIMESTAMP, "symbolBTCUSDT", "");
        assert_eq!(
            changed,
            "c8701050af00336dea9151de14a79877bb04c6dd9e784791565ff50e92fc8047"
        );
        assert_ne!(baseline, changed);

        assert_ne!(
            baseline,
            sign(API_KEY, SECRET_KEY, NONCE, "1706817600001", "symbolBTCUSDT", "")
        );
        assert_ne!(
            baseline,
            sign(API_KEY, "other-secret", NONCE, TIMESTAMP, "symbolBTCUSDT", "")
        );
        assert_ne!(
            baseline,
            sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "symbolBTCUSDt", "")
        );
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let signature = sign(API_KEY, SECRET_KEY, NONCE, TIMESTAMP, "", "");
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    // ==================== Nonce / Timestamp Tests ====================

    #[test]
    fn test_nonce_format() {
        let value = nonce();
        assert_eq!(value.len(), 32);
        assert!(!value.contains('-'));
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_nonce_is_single_use() {
        assert_ne!(nonce(), nonce());
    }

    #[test]
    fn test_timestamp_is_milliseconds() {
        let value = timestamp_ms().unwrap();
        // Millisecond timestamps are 13 digits for the current era.
        assert!(value.len() >= 13);
        assert!(value.chars().all(|c| c.is_ascii_digit()));
    }

    // ==================== Signer Tests ====================

    #[test]
    fn test_signer_produces_matching_headers() {
        let signer = BitunixSigner::new(API_KEY, SecretString::from(SECRET_KEY));
        let headers = signer.sign_request_with(NONCE, TIMESTAMP, "symbolBTCUSDT", "");

        assert_eq!(headers.api_key, API_KEY);
        assert_eq!(headers.nonce, NONCE);
        assert_eq!(headers.timestamp, TIMESTAMP);
        assert_eq!(
            headers.sign,
            "f4f4fdcd7db9ab5c49a348e5994bf3d3a357c53e6a1b2ee5cfb78d8fa52611d5"
        );
    }

    #[test]
    fn test_signer_fresh_headers_differ_per_request() {
        let signer = BitunixSigner::new(API_KEY, SecretString::from(SECRET_KEY));
        let first = signer.sign_request("symbolBTCUSDT", "").unwrap();
        let second = signer.sign_request("symbolBTCUSDT", "").unwrap();
        // Fresh nonce per request, so the signature never repeats.
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.sign, second.sign);
    }

    #[test]
    fn test_headers_as_tuples() {
        let headers = SignedHeaders {
            api_key: "key".to_string(),
            sign: "sig".to_string(),
            nonce: "nonce".to_string(),
            timestamp: "123".to_string(),
        };
        let tuples = headers.as_tuples();
        assert_eq!(tuples[0], ("api-key", "key"));
        assert_eq!(tuples[1], ("sign", "sig"));
        assert_eq!(tuples[2], ("nonce", "nonce"));
        assert_eq!(tuples[3], ("timestamp", "123"));
    }

    #[test]
    fn test_signer_debug_redacts_secret() {
        let signer = BitunixSigner::new(API_KEY, SecretString::from("super-secret"));
        let output = format!("{signer:?}");
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("super-secret"));
    }
}
