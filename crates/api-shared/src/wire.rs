//! Request and response bodies shared by every transport.

use carehub_core::model::{User, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform error envelope. `status` is the HTTP status code as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Patient not found")]
    pub error: String,
    #[schema(example = "404")]
    pub status: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, status: u16) -> Self {
        Self {
            error: error.into(),
            status: status.to_string(),
        }
    }
}

/// Confirmation body for deletes and state transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    #[schema(example = "Bill BILL1 marked as paid")]
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllRes {
    #[schema(example = "Deleted 3 patients")]
    pub message: String,
    pub deleted_count: usize,
}

#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

/// A user as shown to clients. Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    #[schema(example = "admin")]
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.to_string(),
            role: user.role,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserView,
}

#[cfg(test)]
mod tests {
    use super::*;
    use carehub_types::RecordKey;
    use serde_json::json;

    #[test]
    fn test_error_body_status_is_a_string() {
        let value = serde_json::to_value(ErrorBody::new("Patient not found", 404)).unwrap();
        assert_eq!(
            value,
            json!({"error": "Patient not found", "status": "404"})
        );
    }

    #[test]
    fn test_user_view_drops_password() {
        let user = User::new(RecordKey::new("doctor1").unwrap(), "doc123", UserRole::Doctor);
        let value = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(value, json!({"username": "doctor1", "role": "DOCTOR"}));
    }

    #[test]
    fn test_delete_all_uses_camel_case_count() {
        let value = serde_json::to_value(DeleteAllRes {
            message: "Deleted 2 patients".into(),
            deleted_count: 2,
        })
        .unwrap();
        assert_eq!(value["deletedCount"], 2);
    }
}
