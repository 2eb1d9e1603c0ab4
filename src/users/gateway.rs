//! The only place where user requests touch the store.
//!
//! Every call is bounded by a timeout, and every backend failure reaches the
//! caller already classified as [`StoreError`].

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::repo::{StoreError, StoreResult, UserStore};
use super::repo_types::{NewUser, User};

/// How `PUT /users/{id}` writes the new state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Overwrite name, email and birth of the row addressed by the path id.
    #[default]
    InPlace,
    /// Replace every column of the row's surrogate key with the body,
    /// including its external id.
    UpsertBySurrogate,
}

impl UpdateMode {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "in_place" | "inplace" => Ok(Self::InPlace),
            "upsert" | "upsert_by_surrogate" => Ok(Self::UpsertBySurrogate),
            other => anyhow::bail!("unknown update mode {other:?}"),
        }
    }
}

#[derive(Clone)]
pub struct UserGateway {
    store: Arc<dyn UserStore>,
    timeout: Duration,
}

impl UserGateway {
    pub fn new(store: Arc<dyn UserStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "store call timed out");
                Err(StoreError::Timeout)
            }
        }
    }

    #[instrument(skip(self, user), fields(external_id = %user.external_id))]
    pub async fn create(&self, user: NewUser) -> StoreResult<User> {
        let row = self.bounded(self.store.insert(user)).await?;
        info!(key = row.id, "user created");
        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn find_by_external_id(&self, id: Uuid) -> StoreResult<User> {
        self.bounded(self.store.find_by_external_id(id))
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Looks the row up by `id` first; a missing row is `NotFound` and nothing is written.
    #[instrument(skip(self, user))]
    pub async fn update(&self, id: Uuid, mut user: NewUser, mode: UpdateMode) -> StoreResult<User> {
        let current = self.find_by_external_id(id).await?;
        debug!(key = current.id, ?mode, "updating user");

        let row = match mode {
            UpdateMode::InPlace => {
                user.external_id = id;
                self.bounded(self.store.update_by_key(current.id, user)).await?
            }
            UpdateMode::UpsertBySurrogate => {
                if user.external_id != id {
                    warn!(
                        key = current.id,
                        path_id = %id,
                        body_id = %user.external_id,
                        "upsert replaces the row's external id"
                    );
                }
                self.bounded(self.store.upsert_by_key(current.id, user)).await?
            }
        };
        info!(key = row.id, "user updated");
        Ok(row)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> StoreResult<()> {
        match self.bounded(self.store.delete_by_external_id(id)).await? {
            0 => Err(StoreError::NotFound),
            _ => {
                info!("user deleted");
                Ok(())
            }
        }
    }
}
