//! Request/response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use loangate_auth::UserRecord;

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    /// Validated after the role, so a missing uid never masks a bad role.
    #[serde(default)]
    pub uid: Option<String>,
    /// Kept loose so a non-string role is reported as an invalid role
    /// rather than as a malformed body.
    #[serde(default)]
    pub role: Option<Value>,
}

impl SetRoleRequest {
    /// Raw role text as submitted (`""` when absent).
    pub fn role_text(&self) -> String {
        match &self.role {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserRecord,
}
