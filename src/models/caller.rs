//! Caller identity carried by bearer tokens

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::equipment::OwnerId;

/// JWT claims issued by the identity provider. `sub` is the caller identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl CallerClaims {
    pub fn new(sub: impl Into<String>, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let ttl = Duration::hours(expiration_hours as i64);
        Self {
            sub: sub.into(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn caller(&self) -> OwnerId {
        OwnerId::new(self.sub.clone())
    }
}
