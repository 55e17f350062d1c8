//! Authentication API Endpoints
//! Mission: Provide the login endpoint

use crate::auth::{
    credentials::{CredentialError, CredentialVerifier},
    jwt::JwtHandler,
    models::{LoginRequest, LoginResponse},
};
use crate::error::{json_error, INTERNAL_ERROR_MESSAGE};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub verifier: CredentialVerifier,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(verifier: CredentialVerifier, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            verifier,
            jwt_handler,
        }
    }
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| AuthApiError::InvalidRequest(e.body_text()))?;

    info!("🔐 Login attempt: {}", payload.email);

    let identity = state
        .verifier
        .verify(&payload.email, &payload.password)
        .map_err(|e| match e {
            CredentialError::InvalidCredentials => {
                warn!("❌ Failed login attempt: {}", payload.email);
                AuthApiError::InvalidCredentials
            }
            CredentialError::Backend(e) => {
                error!("Credential lookup failed: {:#}", e);
                AuthApiError::InternalError
            }
        })?;

    let token = state.jwt_handler.generate_token(&identity).map_err(|e| {
        error!("Token signing failed: {}", e);
        AuthApiError::InternalError
    })?;

    info!("✅ Login successful: {} ({})", identity.email, identity.role);

    Ok(Json(LoginResponse { token }))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    InvalidCredentials,
    InvalidRequest(String),
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        match self {
            AuthApiError::InvalidCredentials => {
                json_error(StatusCode::UNAUTHORIZED, "Credenciales inválidas")
            }
            AuthApiError::InvalidRequest(detail) => json_error(StatusCode::BAD_REQUEST, detail),
            AuthApiError::InternalError => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_api_error_responses() {
        let invalid_creds = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid_creds.status(), StatusCode::UNAUTHORIZED);

        let bad_request = AuthApiError::InvalidRequest("missing field".to_string()).into_response();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
