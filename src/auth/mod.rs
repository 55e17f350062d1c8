//! Authentication Module
//! Mission: Verify credentials, issue JWT tokens, and guard protected routes

pub mod api;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use api::AuthState;
pub use credentials::{CredentialLookup, CredentialVerifier, InMemoryCredentialStore};
pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, AuthenticatedUser};
pub use models::Claims;
