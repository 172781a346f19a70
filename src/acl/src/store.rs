//! Identity store seam
//!
//! The external authorizer reads principal attributes through
//! [`IdentityStore`]; the store client owns transport, retries and timeouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// One named attribute on a user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

/// User record as returned by the identity store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,

    #[serde(default)]
    pub attributes: Vec<UserAttribute>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(UserAttribute {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// External identity store
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch one user from a user pool
    async fn fetch_user(&self, pool: &str, username: &str) -> Result<UserRecord, StoreError>;
}

/// In-memory identity store keyed by `(pool, username)`
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    users: Arc<RwLock<HashMap<(String, String), UserRecord>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user
    pub async fn insert(&self, pool: impl Into<String>, user: UserRecord) {
        let key = (pool.into(), user.username.clone());
        self.users.write().await.insert(key, user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn fetch_user(&self, pool: &str, username: &str) -> Result<UserRecord, StoreError> {
        self.users
            .read()
            .await
            .get(&(pool.to_string(), username.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::UserNotFound {
                pool: pool.to_string(),
                username: username.to_string(),
            })
    }
}
