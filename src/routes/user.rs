//! User data endpoints.

use crate::auth::middleware::CurrentUser;
use crate::models::UserResponse;
use axum::Json;

/// GET /api/v1/users/myProfile — Profile of the logged-in user
pub async fn my_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    tracing::debug!(action = "my_profile", user_id = %user.id, "Profile requested");
    Json(UserResponse::new(user))
}
