use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issued-at timestamp.
    pub iat: i64,
}

/// Issues and verifies HS256 access tokens for the admin session.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Returns the signed token and its lifetime in seconds.
    pub fn issue(&self, subject: &str) -> Result<(String, i64)> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Config(format!("failed to sign token: {e}")))?;

        Ok((token, self.ttl.num_seconds()))
    }

    /// Verifies signature and expiry, returning the subject. Every failure
    /// collapses to the same authentication error; callers never learn
    /// whether a token was malformed, forged, or merely expired.
    pub fn verify(&self, token: &str) -> Result<String> {
        let validation = Validation::new(Algorithm::HS256);
        let decoded = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| Error::Authentication)?;
        Ok(decoded.claims.sub)
    }
}
