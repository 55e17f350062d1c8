//! JWT Token Handler
//! Mission: Generate and validate JWT tokens securely

use crate::auth::models::{Claims, VerifiedIdentity};
use crate::config::SigningSecret;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature or structure is invalid")]
    Invalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a handler with the default one-hour token lifetime
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Generate a token for a verified identity, issued now
    pub fn generate_token(&self, identity: &VerifiedIdentity) -> Result<String, TokenError> {
        self.generate_token_at(identity, Utc::now())
    }

    pub fn generate_token_at(
        &self,
        identity: &VerifiedIdentity,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let claims = Claims {
            id: identity.id,
            sub: identity.email.clone(),
            role: identity.role.clone(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        debug!(
            "Generating JWT for {} ({}), expires in {}s",
            claims.sub,
            claims.role,
            self.ttl.num_seconds()
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token against the current time
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_token_at(token, Utc::now())
    }

    /// Signature first, then expiry. A token is expired once `now >= exp`;
    /// there is no leeway.
    pub fn validate_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let decoded =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                debug!("Rejected JWT: {}", e);
                TokenError::Invalid
            })?;

        if now.timestamp() >= decoded.claims.exp {
            return Err(TokenError::Expired);
        }

        debug!("Validated JWT for {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}
