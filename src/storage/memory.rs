//! In-process user store.
//!
//! Used by `STORAGE_BACKEND=memory` and by tests. Data is lost on restart.

use super::{StoreError, UserStore};
use crate::models::StoredUser;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    users: HashMap<String, StoredUser>,
    // email -> user id
    emails: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &StoredUser) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.emails.contains_key(&user.email) || inner.users.contains_key(&user.id) {
            return Ok(false);
        }
        inner.emails.insert(user.email.clone(), user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredUser>, StoreError> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn find_by_email_with_password(
        &self,
        email: &str,
    ) -> Result<Option<StoredUser>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .emails
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.users.remove(id) {
            Some(user) => {
                inner.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
