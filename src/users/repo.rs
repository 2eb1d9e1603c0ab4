use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::repo_types::{NewUser, User};

/// Store failures, classified once at the backend boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no matching row")]
    NotFound,

    /// A unique index rejected the write.
    #[error("unique constraint violated: {}", .constraint.as_deref().unwrap_or("unknown"))]
    Conflict { constraint: Option<String> },

    #[error("store call timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Maps a sqlx error using the driver's structured error kind.
    pub fn classify(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::PoolTimedOut => Self::Timeout,
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Conflict {
                constraint: db.constraint().map(str::to_string),
            },
            other => Self::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence backend for users. Owns uniqueness of `external_id` and `email`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a row; the backend assigns the surrogate key.
    async fn insert(&self, user: NewUser) -> StoreResult<User>;

    async fn find_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>>;

    /// Overwrite the mutable columns of the row with key `id`, keeping `external_id`.
    /// `NotFound` when no row has that key.
    async fn update_by_key(&self, id: i64, user: NewUser) -> StoreResult<User>;

    /// Create-or-replace every column of the row with key `id`.
    async fn upsert_by_key(&self, id: i64, user: NewUser) -> StoreResult<User>;

    /// Returns the number of rows removed.
    async fn delete_by_external_id(&self, external_id: Uuid) -> StoreResult<u64>;
}
