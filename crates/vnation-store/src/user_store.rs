//! Registered users, keyed by email.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::debug;

use vnation_models::UserRecord;

use crate::error::{StoreError, StoreResult};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Insert a new user. Fails with `StoreError::Conflict` if the email is taken.
    async fn insert(&self, user: &UserRecord) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}

pub struct RedisUserStore {
    client: redis::Client,
    db_name: String,
}

impl RedisUserStore {
    pub fn new(url: &str, db_name: impl Into<String>) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            db_name: db_name.into(),
        })
    }

    pub fn key(&self, email: &str) -> String {
        format!("{}:users:{}", self.db_name, email)
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(self.key(email)).await?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &UserRecord) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = self.key(&user.email);
        let payload = serde_json::to_string(user)?;

        // SET NX makes the existence check and the write one step.
        let created: bool = conn.set_nx(&key, payload).await?;
        if !created {
            return Err(StoreError::conflict(user.email.clone()));
        }

        debug!("Created user record {}", key);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: &UserRecord) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::conflict(user.email.clone()));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
