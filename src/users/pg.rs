use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo::{StoreError, StoreResult, UserStore};
use super::repo_types::{NewUser, User};

/// Postgres-backed [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (external_id, name, email, birth)
            VALUES ($1, $2, $3, $4)
            RETURNING id, external_id, name, email, birth
            "#,
        )
        .bind(user.external_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.birth)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::classify)
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, external_id, name, email, birth
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.db)
        .await
        .map_err(StoreError::classify)
    }

    async fn update_by_key(&self, id: i64, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $2, email = $3, birth = $4
             WHERE id = $1
            RETURNING id, external_id, name, email, birth
            "#,
        )
        .bind(id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.birth)
        .fetch_optional(&self.db)
        .await
        .map_err(StoreError::classify)?
        .ok_or(StoreError::NotFound)
    }

    async fn upsert_by_key(&self, id: i64, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, external_id, name, email, birth)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
               SET external_id = EXCLUDED.external_id,
                   name        = EXCLUDED.name,
                   email       = EXCLUDED.email,
                   birth       = EXCLUDED.birth
            RETURNING id, external_id, name, email, birth
            "#,
        )
        .bind(id)
        .bind(user.external_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.birth)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::classify)
    }

    async fn delete_by_external_id(&self, external_id: Uuid) -> StoreResult<u64> {
        let res = sqlx::query(r#"DELETE FROM users WHERE external_id = $1"#)
            .bind(external_id)
            .execute(&self.db)
            .await
            .map_err(StoreError::classify)?;
        Ok(res.rows_affected())
    }
}
