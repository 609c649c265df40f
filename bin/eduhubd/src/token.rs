//! Token issuance and verification — signed, time-limited bearer tokens.
//!
//! Tokens are never persisted server-side: the cookie is the only copy,
//! and logout simply clears it client-side.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Decoded token claims — the user payload sent at login plus issuance
/// and expiry timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Email identifying the caller. Optional in the payload; routes that
    /// need it treat its absence as forbidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Any other user-identifying fields from the login payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encode failed: {0}")]
    Encode(jsonwebtoken::errors::Error),

    #[error("expired or invalid token: {0}")]
    ExpiredOrInvalid(jsonwebtoken::errors::Error),
}

/// Signs and verifies bearer tokens with a process-wide secret (HS256).
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs: ttl_secs as i64,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a user payload into a token carrying `iat`/`exp`.
    pub fn issue(&self, user: Map<String, Value>) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();

        let mut extra = user;
        let email = extra
            .remove("email")
            .and_then(|v| v.as_str().map(str::to_string));
        // The service owns the timestamps; payload copies are dropped.
        extra.remove("iat");
        extra.remove("exp");

        let claims = Claims {
            email,
            extra,
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encode)
    }

    /// Check signature integrity and expiry. All-or-nothing: a signature
    /// mismatch, malformed token, or elapsed expiry are the same rejection.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::ExpiredOrInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(email: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("email".to_string(), json!(email));
        map.insert("name".to_string(), json!("Alice"));
        map
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let svc = TokenService::new("s3cret", 3600);

        let token = svc.issue(payload("a@x.com")).unwrap();
        assert!(!token.is_empty());

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.email.as_deref(), Some("a@x.com"));
        assert_eq!(claims.extra["name"], "Alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_payload_without_email() {
        let svc = TokenService::new("s3cret", 3600);

        let mut map = Map::new();
        map.insert("name".to_string(), json!("Bob"));
        let token = svc.issue(map).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert!(claims.email.is_none());
        assert_eq!(claims.extra["name"], "Bob");
    }

    #[test]
    fn test_expired_token_fails() {
        let svc = TokenService::new("s3cret", 3600);

        let now = chrono::Utc::now().timestamp();
        let stale = Claims {
            email: Some("a@x.com".to_string()),
            extra: Map::new(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn test_forged_token_fails() {
        let issuer = TokenService::new("other-secret", 3600);
        let svc = TokenService::new("s3cret", 3600);

        let token = issuer.issue(payload("a@x.com")).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn test_malformed_token_fails() {
        let svc = TokenService::new("s3cret", 3600);
        assert!(svc.verify("this.is.not.a.valid.jwt").is_err());
    }
}
