//! # API REST
//!
//! REST API implementation for CareHub.
//!
//! Handles:
//! - Route resolution from a flat prefix table
//! - CRUD dispatch for patients, doctors, appointments, bills and users, plus login
//! - The JSON response envelope and CORS headers
//! - OpenAPI/Swagger documentation
//!
//! Uses `api-shared` for transport-neutral types and `core` for storage.

#![warn(rust_2018_idioms)]

pub mod app;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod routes;

pub use app::{router, serve, ApiDoc};
pub use codec::{ApiError, ApiResult, Reply};
pub use config::{resolve_port, ServerConfig};
pub use dispatch::Dispatcher;
