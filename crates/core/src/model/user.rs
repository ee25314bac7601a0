//! Staff accounts.
//!
//! Passwords are stored as given. Anything that leaves the process should go through a view
//! type that omits the password (see `carehub-api-shared`).

use crate::constants::USERS_COLLECTION;
use crate::store::Entity;
use carehub_types::RecordKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    #[serde(rename = "ADMIN", alias = "Admin", alias = "admin")]
    Admin,
    #[serde(rename = "DOCTOR", alias = "Doctor", alias = "doctor")]
    Doctor,
    #[serde(rename = "RECEPTIONIST", alias = "Receptionist", alias = "receptionist")]
    Receptionist,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UserRole::Admin => "ADMIN",
            UserRole::Doctor => "DOCTOR",
            UserRole::Receptionist => "RECEPTIONIST",
        })
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(value_type = String, example = "admin")]
    pub username: RecordKey,
    pub password: String,
    pub role: UserRole,
}

impl User {
    pub fn new(username: RecordKey, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            username,
            password: password.into(),
            role,
        }
    }
}

// Keeps passwords out of logs.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

impl Entity for User {
    const COLLECTION: &'static str = USERS_COLLECTION;
    const LABEL: &'static str = "User";
    const PLURAL: &'static str = "users";

    fn key(&self) -> &RecordKey {
        &self.username
    }
}
