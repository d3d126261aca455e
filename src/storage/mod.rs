//! Credential store: user records and their password hashes.
//!
//! [`UserStore`] is the seam between the HTTP layer and persistence.
//! Production uses Redis ([`user::RedisUserStore`]); development and tests
//! can run on [`memory::MemoryUserStore`].

pub mod memory;
pub mod user;

use crate::models::StoredUser;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `false` without writing anything if the email is already taken.
    async fn insert(&self, user: &StoredUser) -> Result<bool, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredUser>, StoreError>;

    /// Look up a user by (normalized) email, including the password hash.
    async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<StoredUser>, StoreError>;

    /// Delete a user and its email index.
    ///
    /// Returns true if the user existed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

/// Canonical form used for storing and looking up emails.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
        assert_eq!(normalize_email("ada@example.com"), "ada@example.com");
    }
}
