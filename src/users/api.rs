//! User API Endpoints
//! Mission: CRUD over user records for authenticated callers

use crate::auth::{middleware::extract_claims, models::Claims};
use crate::error::{json_error, INTERNAL_ERROR_MESSAGE};
use crate::users::{
    models::{
        CreateUserRequest, NewUser, StatusPatchRequest, UpdateUserRequest, UserChanges,
        UserResponse,
    },
    user_store::UserStore,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Request, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use bcrypt::hash;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared state for user routes
#[derive(Clone)]
pub struct UsersState {
    pub store: Arc<UserStore>,
    pub bcrypt_cost: u32,
}

impl UsersState {
    pub fn new(store: Arc<UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    fn hash_password(&self, password: &str) -> Result<String, UserApiError> {
        hash(password, self.bcrypt_cost).map_err(|e| {
            error!("Failed to hash password: {}", e);
            UserApiError::InternalError
        })
    }
}

/// List users - GET /api/users
pub async fn list_users(
    State(state): State<UsersState>,
) -> Result<Json<Vec<UserResponse>>, UserApiError> {
    let users = state.store.list_users().map_err(internal)?;

    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

/// Get one user - GET /api/users/:id
pub async fn get_user(
    State(state): State<UsersState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, UserApiError> {
    let Path(id) = id.map_err(bad_path)?;

    let user = state
        .store
        .get_user(id)
        .map_err(internal)?
        .ok_or(UserApiError::UserNotFound)?;

    Ok(Json(UserResponse::from_user(&user)))
}

/// Create user - POST /api/users
pub async fn create_user(
    State(state): State<UsersState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), UserApiError> {
    let Json(payload) = payload.map_err(bad_body)?;

    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(UserApiError::InvalidRequest(
            "nombre y apellido son obligatorios".to_string(),
        ));
    }
    if payload.password.is_empty() {
        return Err(UserApiError::InvalidRequest(
            "password es obligatorio".to_string(),
        ));
    }

    let password_hash = state.hash_password(&payload.password)?;

    let user = state
        .store
        .create_user(NewUser {
            first_name: payload.first_name,
            last_name: payload.last_name,
            status: payload.status,
            profession: payload.profession,
            password_hash,
        })
        .map_err(internal)?;

    info!(actor = %claims.sub, user_id = user.id, "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// Update user - PUT /api/users/:id
pub async fn update_user(
    State(state): State<UsersState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, UserApiError> {
    let Path(id) = id.map_err(bad_path)?;
    let Json(payload) = payload.map_err(bad_body)?;

    let blank = |name: &Option<String>| name.as_deref().is_some_and(|n| n.trim().is_empty());
    if blank(&payload.first_name) || blank(&payload.last_name) {
        return Err(UserApiError::InvalidRequest(
            "nombre y apellido no pueden estar vacíos".to_string(),
        ));
    }

    // An empty password means "keep the current one"
    let password_hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => Some(state.hash_password(password)?),
        _ => None,
    };

    let changes = UserChanges {
        first_name: payload.first_name,
        last_name: payload.last_name,
        status: payload.status,
        profession: payload.profession,
        password_hash,
    };

    let user = state
        .store
        .update_user(id, &changes)
        .map_err(internal)?
        .ok_or(UserApiError::UserNotFound)?;

    info!(actor = %claims.sub, user_id = id, "User updated");

    Ok(Json(UserResponse::from_user(&user)))
}

/// Change status only - PATCH /api/users/:id/estado
pub async fn update_user_status(
    State(state): State<UsersState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<StatusPatchRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, UserApiError> {
    let Path(id) = id.map_err(bad_path)?;
    let Json(payload) = payload.map_err(bad_body)?;

    let user = state
        .store
        .update_user(id, &UserChanges::status_only(payload.status))
        .map_err(internal)?
        .ok_or(UserApiError::UserNotFound)?;

    info!(
        actor = %claims.sub,
        user_id = id,
        estado = payload.status.as_str(),
        "User status changed"
    );

    Ok(Json(UserResponse::from_user(&user)))
}

/// Delete user - DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<UsersState>,
    id: Result<Path<i64>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<StatusCode, UserApiError> {
    let Path(id) = id.map_err(bad_path)?;

    if !state.store.delete_user(id).map_err(internal)? {
        return Err(UserApiError::UserNotFound);
    }

    info!(actor = %claims.sub, user_id = id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// Logout - POST /api/users/logout
/// Tokens are stateless; the client discards its copy.
pub async fn logout(req: Request) -> Result<Json<LogoutResponse>, UserApiError> {
    if let Some(claims) = extract_claims(&req) {
        info!("👋 Logout: {}", claims.sub);
    }

    Ok(Json(LogoutResponse {
        message: "Sesión cerrada (cliente debe eliminar el token)".to_string(),
    }))
}

fn internal(e: anyhow::Error) -> UserApiError {
    error!("User store failure: {:#}", e);
    UserApiError::InternalError
}

fn bad_path(e: PathRejection) -> UserApiError {
    UserApiError::InvalidRequest(e.body_text())
}

fn bad_body(e: JsonRejection) -> UserApiError {
    UserApiError::InvalidRequest(e.body_text())
}

/// User API errors
#[derive(Debug)]
pub enum UserApiError {
    UserNotFound,
    InvalidRequest(String),
    InternalError,
}

impl IntoResponse for UserApiError {
    fn into_response(self) -> Response {
        match self {
            UserApiError::UserNotFound => json_error(StatusCode::NOT_FOUND, "Usuario no encontrado"),
            UserApiError::InvalidRequest(detail) => json_error(StatusCode::BAD_REQUEST, detail),
            UserApiError::InternalError => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_api_error_responses() {
        let not_found = UserApiError::UserNotFound.into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad = UserApiError::InvalidRequest("x".to_string()).into_response();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let internal = UserApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_hash_password_is_not_plaintext() {
        let state = UsersState::new(Arc::new(UserStore::in_memory().unwrap()), 4);
        let hashed = state.hash_password("123456").unwrap();

        assert_ne!(hashed, "123456");
        assert!(bcrypt::verify("123456", &hashed).unwrap());
    }
}
