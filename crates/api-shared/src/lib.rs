//! # API Shared
//!
//! Transport-neutral pieces of the CareHub API.
//!
//! Contains:
//! - `HealthService`, which turns a store ping into a health snapshot
//! - Credential checking for the login endpoint
//! - Wire bodies (error envelope, confirmations, login, password-free user view)
//!
//! Used by `api-rest`; nothing here knows about HTTP.

pub mod auth;
pub mod health;
pub mod wire;

pub use auth::{authenticate, AuthError};
pub use health::{DatabaseStatus, HealthRes, HealthService, ServiceStatus};
pub use wire::{DeleteAllRes, ErrorBody, LoginReq, LoginRes, MessageRes, UserView};
