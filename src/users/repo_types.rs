use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Upper bound for `name` and `email`, matching the `VARCHAR(150)` columns.
pub const MAX_FIELD_LEN: usize = 150;

/// A user that has not been written yet, so it has no surrogate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: Uuid,
    pub name: String,
    pub email: String,
    pub birth: OffsetDateTime,
}

/// User row as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,            // surrogate key, never leaves the service
    pub external_id: Uuid,  // public handle
    pub name: String,
    pub email: String,
    pub birth: OffsetDateTime,
}

impl User {
    pub fn from_new(id: i64, new: NewUser) -> Self {
        Self {
            id,
            external_id: new.external_id,
            name: new.name,
            email: new.email,
            birth: new.birth,
        }
    }
}
