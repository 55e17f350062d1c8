//! Credential Verification
//! Mission: Check submitted email/password pairs against stored bcrypt hashes

use crate::auth::models::{CredentialRecord, VerifiedIdentity};
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Source of credential records, looked up by exact email.
pub trait CredentialLookup: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>>;
}

/// In-memory credential store, seeded at process start
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding one account whose password is hashed here.
    pub fn seeded(id: i64, email: &str, password: &str, role: &str, cost: u32) -> Result<Self> {
        let store = Self::new();
        store.add_account(id, email, password, role, cost)?;
        Ok(store)
    }

    /// Hash `password` and register the account under `email`.
    pub fn add_account(
        &self,
        id: i64,
        email: &str,
        password: &str,
        role: &str,
        cost: u32,
    ) -> Result<()> {
        let password_hash = hash(password, cost).context("Failed to hash password")?;
        self.insert(CredentialRecord {
            id,
            email: email.to_string(),
            password_hash,
            role: role.to_string(),
        });
        info!("🔐 Credential registered: {} ({})", email, role);
        Ok(())
    }

    pub fn insert(&self, record: CredentialRecord) {
        self.records.write().insert(record.email.clone(), record);
    }
}

impl CredentialLookup for InMemoryCredentialStore {
    fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        Ok(self.records.read().get(email).cloned())
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("credential backend failure: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// Verifies login attempts. Failures are not counted or throttled.
#[derive(Clone)]
pub struct CredentialVerifier {
    lookup: Arc<dyn CredentialLookup>,
}

impl CredentialVerifier {
    pub fn new(lookup: Arc<dyn CredentialLookup>) -> Self {
        Self { lookup }
    }

    pub fn verify(&self, email: &str, password: &str) -> Result<VerifiedIdentity, CredentialError> {
        let Some(record) = self.lookup.find_by_email(email)? else {
            debug!("No credential record for {}", email);
            return Err(CredentialError::InvalidCredentials);
        };

        let valid = verify(password, &record.password_hash)
            .context("Failed to verify password hash")?;
        if !valid {
            return Err(CredentialError::InvalidCredentials);
        }

        Ok(VerifiedIdentity::from_record(&record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    fn seeded_verifier() -> CredentialVerifier {
        let store =
            InMemoryCredentialStore::seeded(1, "test@example.com", "123456", "user", TEST_COST)
                .unwrap();
        CredentialVerifier::new(Arc::new(store))
    }

    struct FailingLookup;

    impl CredentialLookup for FailingLookup {
        fn find_by_email(&self, _email: &str) -> Result<Option<CredentialRecord>> {
            anyhow::bail!("backend offline")
        }
    }

    #[test]
    fn test_seeded_account_verifies() {
        let verifier = seeded_verifier();

        let identity = verifier.verify("test@example.com", "123456").unwrap();
        assert_eq!(identity.id, 1);
        assert_eq!(identity.email, "test@example.com");
        assert_eq!(identity.role, "user");
    }

    #[test]
    fn test_wrong_password_rejected() {
        let verifier = seeded_verifier();

        let result = verifier.verify("test@example.com", "wrong");
        assert!(matches!(result, Err(CredentialError::InvalidCredentials)));
    }

    #[test]
    fn test_unknown_and_differently_cased_email_rejected() {
        let verifier = seeded_verifier();

        assert!(matches!(
            verifier.verify("nobody@example.com", "123456"),
            Err(CredentialError::InvalidCredentials)
        ));
        assert!(matches!(
            verifier.verify("TEST@example.com", "123456"),
            Err(CredentialError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_stored_secret_is_hashed() {
        let store =
            InMemoryCredentialStore::seeded(1, "test@example.com", "123456", "user", TEST_COST)
                .unwrap();
        let record = store.find_by_email("test@example.com").unwrap().unwrap();

        assert_ne!(record.password_hash, "123456");
        assert!(record.password_hash.starts_with("$2"));
    }

    #[test]
    fn test_backend_failure_is_not_invalid_credentials() {
        let verifier = CredentialVerifier::new(Arc::new(FailingLookup));

        let result = verifier.verify("test@example.com", "123456");
        assert!(matches!(result, Err(CredentialError::Backend(_))));
    }

    #[test]
    fn test_custom_backend_is_pluggable() {
        let store = InMemoryCredentialStore::new();
        store
            .add_account(42, "ops@example.com", "s3cret", "admin", TEST_COST)
            .unwrap();
        let verifier = CredentialVerifier::new(Arc::new(store));

        let identity = verifier.verify("ops@example.com", "s3cret").unwrap();
        assert_eq!(identity.id, 42);
        assert_eq!(identity.role, "admin");
    }
}
