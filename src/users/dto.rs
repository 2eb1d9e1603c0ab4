use serde::{Deserialize, Serialize};

/// User as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "date_of_birth")]
    pub birth: String,
}

/// Body returned by a successful delete.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

impl DeletedResponse {
    pub fn new() -> Self {
        Self {
            message: "User deleted".into(),
        }
    }
}

/// Error body: one readable message plus a stable code.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}
