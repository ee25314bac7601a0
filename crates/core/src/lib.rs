//! # CareHub Core
//!
//! Core records and storage for the CareHub clinic system.
//!
//! This crate contains the entity records and everything needed to keep them:
//! - Patient, doctor, appointment, bill and user records
//! - The per-entity [`Repository`] trait and the document store behind it
//! - Startup configuration and default seeding
//!
//! **No API concerns**: routing, request decoding and response envelopes belong in `api-rest`
//! or `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod seed;
pub mod store;

pub use config::CoreConfig;
pub use error::{StoreError, StoreResult};
pub use seed::{seed_defaults, SeedReport};
pub use store::{Collection, DocumentStore, Entity, Modified, Ping, Repositories, Repository};
