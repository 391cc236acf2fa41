//! User persistence.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
}

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for user storage operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every user, ordered by id.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Inserts a user and returns it with the id the store assigned.
    async fn create(&self, name: &str) -> StoreResult<User>;

    /// Deletes by id. Deleting an id that does not exist is not an error.
    async fn delete(&self, id: i32) -> StoreResult<()>;

    /// Round-trips to the backing store.
    async fn ping(&self) -> StoreResult<()>;
}

pub type SharedUserRepository = Arc<dyn UserRepository>;

/// Repository over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `users` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT NOT NULL)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, name: &str) -> StoreResult<User> {
        let id: i32 = sqlx::query_scalar("INSERT INTO users (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(User { id, name: name.to_owned() })
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// In-process repository with SERIAL-like ids, for tests and local runs
/// without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    inner: RwLock<(BTreeMap<i32, User>, i32)>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.0.values().cloned().collect())
    }

    async fn create(&self, name: &str) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        inner.1 += 1;
        let user = User { id: inner.1, name: name.to_owned() };
        inner.0.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i32) -> StoreResult<()> {
        self.inner.write().await.0.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
