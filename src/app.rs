//! Application wiring
//! Mission: Turn configuration into shared state and assemble the router

use crate::auth::{
    api as auth_api, auth_middleware, AuthState, CredentialVerifier, InMemoryCredentialStore,
    JwtHandler,
};
use crate::config::{Config, ConfigError};
use crate::middleware::request_logging;
use crate::users::{api as users_api, UserStore, UsersState};
use anyhow::{Context, Result};
use axum::{
    middleware,
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Build the shared state for every router. Fails when the signing secret
/// is missing, which must abort startup.
pub fn init_states(config: &Config) -> Result<(AuthState, UsersState)> {
    let secret = config.signing_secret()?;
    config.validate()?;

    let ttl = chrono::Duration::try_seconds(config.token_ttl_secs)
        .ok_or(ConfigError::InvalidTokenTtl(config.token_ttl_secs))?;
    let jwt_handler = Arc::new(JwtHandler::with_ttl(&secret, ttl));

    let credentials = InMemoryCredentialStore::seeded(
        config.seed_user_id,
        &config.seed_user_email,
        &config.seed_user_password,
        &config.seed_user_role,
        config.bcrypt_cost,
    )
    .context("Failed to seed credential store")?;
    let verifier = CredentialVerifier::new(Arc::new(credentials));

    let user_store = Arc::new(UserStore::open(&config.database_path)?);
    info!("🗄️  User store opened at: {}", config.database_path);

    Ok((
        AuthState::new(verifier, jwt_handler),
        UsersState::new(user_store, config.bcrypt_cost),
    ))
}

/// Assemble the HTTP surface. Every `/api/users` route sits behind the
/// token guard; login and health are public.
pub fn build_app(auth_state: AuthState, users_state: UsersState) -> Router {
    let jwt_handler = auth_state.jwt_handler.clone();

    let auth_router = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state);

    let protected_routes = Router::new()
        .route(
            "/api/users",
            get(users_api::list_users).post(users_api::create_user),
        )
        .route("/api/users/logout", post(users_api::logout))
        .route(
            "/api/users/:id",
            get(users_api::get_user)
                .put(users_api::update_user)
                .delete(users_api::delete_user),
        )
        .route("/api/users/:id/estado", patch(users_api::update_user_status))
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware))
        .with_state(users_state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_router)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            jwt_secret: Some("app-test-secret".to_string()),
            database_path: ":memory:".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            token_ttl_secs: 3600,
            bcrypt_cost: 4,
            seed_user_id: 1,
            seed_user_email: "test@example.com".to_string(),
            seed_user_password: "123456".to_string(),
            seed_user_role: "user".to_string(),
        }
    }

    #[test]
    fn test_init_states_requires_secret() {
        let mut config = test_config();
        config.jwt_secret = None;

        let err = init_states(&config).err().unwrap();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::SigningConfigurationMissing)
        );
    }

    #[test]
    fn test_init_states_rejects_oversized_ttl() {
        let mut config = test_config();
        config.token_ttl_secs = i64::MAX;

        let err = init_states(&config).err().unwrap();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidTokenTtl(i64::MAX))
        );
    }

    #[test]
    fn test_init_states_seeds_login_account() {
        let (auth_state, users_state) = init_states(&test_config()).unwrap();

        let identity = auth_state.verifier.verify("test@example.com", "123456").unwrap();
        assert_eq!(identity.role, "user");
        assert_eq!(users_state.bcrypt_cost, 4);
        assert!(users_state.store.list_users().unwrap().is_empty());
    }
}
