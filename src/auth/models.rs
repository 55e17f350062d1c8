//! Authentication Models
//! Mission: Define credential, identity and token data structures

use serde::{Deserialize, Serialize};

/// Stored login credential. The hash is bcrypt; the plaintext never lives here.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Identity produced by a successful credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub id: i64,
    pub email: String,
    pub role: String,
}

impl VerifiedIdentity {
    pub fn from_record(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            role: record.role.clone(),
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub sub: String, // subject (email)
    pub role: String,
    pub iat: i64, // issued at, unix seconds
    pub exp: i64, // expiration, unix seconds
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}
