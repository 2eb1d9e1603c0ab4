use std::collections::BTreeMap;

use async_trait::async_trait;
use time::UtcOffset;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::repo::{StoreError, StoreResult, UserStore};
use super::repo_types::{NewUser, User};

const EXTERNAL_ID_KEY: &str = "users_external_id_key";
const EMAIL_KEY: &str = "users_email_key";

#[derive(Default)]
struct Inner {
    rows: BTreeMap<i64, User>,
    next_id: i64,
}

/// Mirrors a `TIMESTAMPTZ` column, which keeps the instant and reads back as UTC.
fn stored(id: i64, mut user: NewUser) -> User {
    user.birth = user.birth.to_offset(UtcOffset::UTC);
    User::from_new(id, user)
}

impl Inner {
    /// Checks both unique columns against every row except `skip`.
    fn check_unique(&self, user: &NewUser, skip: Option<i64>) -> StoreResult<()> {
        for row in self.rows.values().filter(|r| Some(r.id) != skip) {
            let constraint = if row.external_id == user.external_id {
                EXTERNAL_ID_KEY
            } else if row.email == user.email {
                EMAIL_KEY
            } else {
                continue;
            };
            return Err(StoreError::Conflict {
                constraint: Some(constraint.into()),
            });
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// [`UserStore`] held in process memory. Writes are serialised by one lock,
/// which plays the role of the database's unique indexes.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.lock().await;
        inner.check_unique(&user, None)?;
        let id = inner.allocate_id();
        let row = stored(id, user);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .rows
            .values()
            .find(|r| r.external_id == external_id)
            .cloned())
    }

    async fn update_by_key(&self, id: i64, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.lock().await;
        inner.check_unique(&user, Some(id))?;
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        row.name = user.name;
        row.email = user.email;
        row.birth = user.birth.to_offset(UtcOffset::UTC);
        Ok(row.clone())
    }

    async fn upsert_by_key(&self, id: i64, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.lock().await;
        inner.check_unique(&user, Some(id))?;
        if id > inner.next_id {
            inner.next_id = id;
        }
        let row = stored(id, user);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn delete_by_external_id(&self, external_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.lock().await;
        let before = inner.rows.len();
        inner.rows.retain(|_, r| r.external_id != external_id);
        Ok((before - inner.rows.len()) as u64)
    }
}
