//! Helpers for handling bearer tokens on the client side.
//!
//! The client never verifies tokens (that is the server's job); it only
//! peeks at the expiry for diagnostics and fingerprints tokens so logs
//! never carry the raw value.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::Deserialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Short SHA-256 fingerprint of a token, safe to log.
pub fn fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..12].to_string()
}

/// Expiry of a JWT access token, read without signature verification.
///
/// Returns `None` for opaque or malformed tokens.
pub fn access_token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let header = jsonwebtoken::decode_header(token).ok()?;
    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data =
        jsonwebtoken::decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?;
    Utc.timestamp_opt(data.claims.exp, 0).single()
}

/// Whether the token's `exp` is in the past. Opaque tokens count as live.
pub fn is_expired(token: &str) -> bool {
    access_token_expiry(token).is_some_and(|exp| exp <= Utc::now())
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn jwt(exp: i64) -> String {
        jsonwebtoken::encode(
            &Header::default(),
            &Claims {
                sub: "42".into(),
                exp,
            },
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn reads_expiry_without_the_signing_key() {
        let exp = Utc::now().timestamp() + 600;
        let token = jwt(exp);
        assert_eq!(access_token_expiry(&token).unwrap().timestamp(), exp);
        assert!(!is_expired(&token));
    }

    #[test]
    fn past_expiry_is_expired() {
        assert!(is_expired(&jwt(Utc::now().timestamp() - 10)));
    }

    #[test]
    fn opaque_tokens_have_no_expiry() {
        assert_eq!(access_token_expiry("not-a-jwt"), None);
        assert!(!is_expired("not-a-jwt"));
    }

    #[test]
    fn fingerprint_is_short_and_stable() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
        assert_eq!(fingerprint("abc").len(), 12);
    }
}
