//! User Models
//! Mission: Define user records and their sanitized API representations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "activo",
            UserStatus::Inactive => "inactivo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "activo" => Some(UserStatus::Active),
            "inactivo" => Some(UserStatus::Inactive),
            _ => None,
        }
    }
}

/// User record as stored
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub profession: Option<String>,
    pub password_hash: String, // bcrypt hash - never leaves the server
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the store; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub status: UserStatus,
    pub profession: Option<String>,
    pub password_hash: String,
}

/// Partial update. `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub status: Option<UserStatus>,
    pub profession: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn status_only(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// User response (sanitized)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "estado")]
    pub status: UserStatus,
    #[serde(rename = "profesion")]
    pub profession: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            status: user.status,
            profession: user.profession.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Create user request - POST /api/users
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "estado", default)]
    pub status: UserStatus,
    #[serde(rename = "profesion")]
    pub profession: Option<String>,
    pub password: String,
}

/// Update user request - PUT /api/users/:id
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "nombre")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido")]
    pub last_name: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<UserStatus>,
    #[serde(rename = "profesion")]
    pub profession: Option<String>,
    pub password: Option<String>,
}

/// Status patch request - PATCH /api/users/:id/estado
#[derive(Debug, Deserialize)]
pub struct StatusPatchRequest {
    #[serde(rename = "estado")]
    pub status: UserStatus,
}
