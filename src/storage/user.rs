//! Redis-backed user store.
//!
//! Redis key patterns:
//! - `user:{nanoid}` — individual user data (JSON, includes password hash)
//! - `email:{email}` — email lookup to user_id (STRING)
//!
//! ## Security: Zeroizing Sensitive Data
//!
//! User JSON carries the password hash, so raw payloads read from Redis are
//! wrapped in `Zeroizing` and cleared once deserialized.

use super::{StoreError, UserStore};
use crate::models::StoredUser;
use async_trait::async_trait;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Store a new user.
///
/// The email index is claimed first with `SET NX`, so two concurrent signups
/// with the same email cannot both succeed. Returns false if it was taken.
pub async fn store_user<C>(con: &mut C, user: &StoredUser) -> Result<bool, StoreError>
where
    C: AsyncCommands,
{
    let user_key = format!("user:{}", user.id);
    let email_key = format!("email:{}", user.email);

    let claimed: bool = con.set_nx(&email_key, &user.id).await?;
    if !claimed {
        return Ok(false);
    }

    let json = Zeroizing::new(serde_json::to_string(user)?);
    if let Err(e) = con.set::<_, _, ()>(&user_key, json.as_str()).await {
        // Release the email so the address isn't locked out by a half-written record
        let _: Result<(), _> = con.del(&email_key).await;
        return Err(e.into());
    }

    Ok(true)
}

/// Get a user by ID.
///
/// The user JSON is zeroized after deserialization.
pub async fn get_user<C>(con: &mut C, id: &str) -> Result<Option<StoredUser>, StoreError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data)?;
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Get a user by email.
///
/// Performs a two-step lookup: email -> user_id -> user data.
pub async fn get_user_by_email<C>(
    con: &mut C,
    email: &str,
) -> Result<Option<StoredUser>, StoreError>
where
    C: AsyncCommands,
{
    let email_key = format!("email:{}", email);
    let user_id: Option<String> = con.get(&email_key).await?;

    match user_id {
        Some(id) => get_user(con, &id).await,
        None => Ok(None),
    }
}

/// Delete a user from Redis.
///
/// Also deletes the email lookup key. Returns true if the user existed.
pub async fn delete_user<C>(con: &mut C, id: &str) -> Result<bool, StoreError>
where
    C: AsyncCommands,
{
    // Get user first to find email
    let user = get_user(con, id).await?;

    let user_key = format!("user:{}", id);
    let deleted: i32 = con.del(&user_key).await?;

    if let Some(user) = user {
        let email_key = format!("email:{}", user.email);
        con.del::<_, ()>(&email_key).await?;
    }

    Ok(deleted > 0)
}

/// [`UserStore`] over a Redis client.
///
/// Each operation takes a multiplexed connection from the client.
#[derive(Clone)]
pub struct RedisUserStore {
    client: redis::Client,
}

impl RedisUserStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(redis::Client::open(url)?))
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Verify the server is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn insert(&self, user: &StoredUser) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        store_user(&mut con, user).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredUser>, StoreError> {
        let mut con = self.connection().await?;
        get_user(&mut con, id).await
    }

    async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<StoredUser>, StoreError> {
        let mut con = self.connection().await?;
        get_user_by_email(&mut con, email).await
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut con = self.connection().await?;
        delete_user(&mut con, id).await
    }
}
