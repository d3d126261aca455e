//! Session middleware and the request-context extractor it feeds.

use crate::auth::cookie::extract_session_token;
use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;
use crate::storage::UserStore;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

/// The user resolved by [`protect`] for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reject the request unless it carries a valid session cookie for an
/// existing user. On success the user is attached to the request as
/// [`CurrentUser`].
///
/// Checks run in order and the first failure ends the request:
/// 1. `jwt` cookie present, else 401
/// 2. signature and expiry valid, else 401
/// 3. user still exists, else 404
pub async fn protect(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_session_token(req.headers())
        .ok_or_else(|| AppError::Unauthorized("User is not logged in.".to_string()))?;

    let claims = state.tokens.verify(&token).map_err(|e| {
        tracing::debug!(action = "protect_rejected", reason = %e, "Session token rejected");
        AppError::from(e)
    })?;

    let user = state
        .store
        .find_by_id(&claims.id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(action = "protect_rejected", user_id = %claims.id, "Token refers to a missing user");
            AppError::NotFound("User not found!".to_string())
        })?;

    req.extensions_mut().insert(CurrentUser(user.into_public()));

    Ok(next.run(req).await)
}

/// Extracts the user attached by [`protect`].
///
/// Returns 401 Unauthorized if the route is not behind the middleware.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("User is not logged in.".to_string()))
    }
}
