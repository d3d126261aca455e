//! Auth API endpoints.

use crate::auth::cookie::{cleared_session_cookie, expiry_after_days, session_cookie};
use crate::auth::middleware::{AppState, CurrentUser};
use crate::auth::password;
use crate::error::AppError;
use crate::models::{LoginRequest, MessageResponse, SignupRequest, StoredUser, User, UserResponse};
use crate::storage::normalize_email;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use zeroize::Zeroizing;

/// Status returned by a successful login.
pub const LOGIN_STATUS: StatusCode = StatusCode::OK;

/// Issue a token for `user`, set it as the session cookie and return the
/// sanitized user as `{ status, data: { user } }`.
fn send_session(state: &AppState, user: User, status: StatusCode) -> Result<Response, AppError> {
    let token = state.tokens.issue(&user.id)?;

    let now = Utc::now();
    let expires = expiry_after_days(now, state.config.jwt_cookie_expires_in_days).ok_or_else(
        || AppError::Internal("Cookie expiry is out of range".to_string()),
    )?;
    let cookie = session_cookie(&token, expires, state.config.production);

    Ok((
        status,
        [
            (header::SET_COOKIE, cookie),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        Json(UserResponse::new(user)),
    )
        .into_response())
}

/// POST /api/v1/users/signup — Create an account and start a session
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;
    let new_user = req.validate()?;

    let plain = Zeroizing::new(new_user.password);
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&plain)).await??;

    let user = StoredUser {
        id: nanoid::nanoid!(12),
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email: new_user.email,
        password_hash,
        created_at: Utc::now().timestamp().max(0) as u64,
    };

    if !state.store.insert(&user).await? {
        tracing::warn!(action = "signup_failed", "User could not be created");
        return Err(AppError::BadRequest(
            "User could not been created.".to_string(),
        ));
    }

    tracing::info!(action = "signup", user_id = %user.id, "New user signed up");

    send_session(&state, user.into_public(), StatusCode::CREATED)
}

/// POST /api/v1/users/login — Check credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload?;

    let (email, plain) = match (req.email, req.password) {
        (Some(email), Some(password)) if !email.trim().is_empty() && !password.is_empty() => {
            (normalize_email(&email), Zeroizing::new(password))
        }
        _ => return Err(AppError::BadRequest("Enter all credentials.".to_string())),
    };

    // Same error for unknown email and wrong password
    let invalid = || AppError::Unauthorized("Invalid email or password.".to_string());

    let Some(user) = state.store.find_by_email_with_password(&email).await? else {
        tokio::task::spawn_blocking(move || password::verify_dummy(&plain)).await?;
        tracing::warn!(action = "login_failed", reason = "unknown_email", "Login rejected");
        return Err(invalid());
    };

    let password_hash = user.password_hash.clone();
    let valid =
        tokio::task::spawn_blocking(move || password::verify_password(&plain, &password_hash))
            .await??;

    if !valid {
        tracing::warn!(action = "login_failed", reason = "wrong_password", user_id = %user.id, "Login rejected");
        return Err(invalid());
    }

    tracing::info!(action = "login", user_id = %user.id, "User logged in");

    send_session(&state, user.into_public(), LOGIN_STATUS)
}

/// GET /api/v1/users/signout — Clear the session cookie
///
/// The token itself stays valid until it expires; only the client copy is
/// overwritten.
pub async fn signout(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(action = "signout", user_id = %user.id, "User signed out");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cleared_session_cookie(state.config.production))],
        Json(MessageResponse::new("Logged out successfully!")),
    ))
}

/// GET /api/v1/users/isLoggedIn — Confirm the session and echo the user
pub async fn is_logged_in(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::new(user))
}
