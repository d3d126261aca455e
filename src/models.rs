//! Request and response models for the API.
//!
//! Wire models use camelCase to match the mobile client.
//! `StoredUser` is the only type that carries the password hash and it is
//! never serialized into a response.

use crate::error::AppError;
use crate::storage::normalize_email;
use serde::{Deserialize, Serialize};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

// ============================================================================
// Auth Models
// ============================================================================

/// Signup request body. Missing or null fields are rejected by validation,
/// not by deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

/// A signup that passed validation. The email is normalized.
#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    /// Check required fields, email shape, password length and confirmation.
    pub fn validate(self) -> Result<NewUser, AppError> {
        let first_name = required(self.first_name, "first name")?.trim().to_string();
        let last_name = required(self.last_name, "last name")?.trim().to_string();
        let email = normalize_email(&required(self.email, "email")?);
        let password = required(self.password, "password")?;
        let password_confirm = required(self.password_confirm, "password confirmation")?;

        if !is_valid_email(&email) {
            return Err(AppError::BadRequest(
                "Please provide a valid email.".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        if password != password_confirm {
            return Err(AppError::BadRequest("Passwords are not the same.".to_string()));
        }

        Ok(NewUser {
            first_name,
            last_name,
            email,
            password,
        })
    }
}

fn required(value: Option<String>, label: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!("Please provide your {}.", label))),
    }
}

/// Loose structural check: `local@domain.tld`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// ============================================================================
// User Models
// ============================================================================

/// Public user profile, safe to return to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: u64,
}

/// User data as held by the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: u64,
}

impl StoredUser {
    /// Drop the password hash.
    pub fn into_public(self) -> User {
        User {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

impl From<StoredUser> for User {
    fn from(user: StoredUser) -> Self {
        user.into_public()
    }
}

// ============================================================================
// Response Envelopes
// ============================================================================

/// `{ "user": .. }` payload nested under `data`.
#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: User,
}

/// `{ "status": "success", "data": { "user": .. } }`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub status: &'static str,
    pub data: UserData,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        UserResponse {
            status: "success",
            data: UserData { user },
        }
    }
}

/// `{ "status": "success", "message": .. }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            status: "success",
            message: message.into(),
        }
    }
}
