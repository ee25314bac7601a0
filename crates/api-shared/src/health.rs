use carehub_core::Ping;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DatabaseStatus {
    Connected,
    Disconnected,
}

/// Health snapshot returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub status: ServiceStatus,
    pub database: DatabaseStatus,
    /// Milliseconds since the Unix epoch.
    #[schema(example = 1714557600000_i64)]
    pub timestamp: i64,
}

/// Health service shared by every transport.
///
/// Reports store reachability in the body only; callers decide what HTTP status to use.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn new() -> Self {
        Self
    }

    /// Pings the store and builds a snapshot. Never mutates anything.
    pub fn check(&self, store: &dyn Ping) -> HealthRes {
        let reachable = store.ping();
        if !reachable {
            tracing::warn!("health check: store is not reachable");
        }

        HealthRes {
            status: if reachable {
                ServiceStatus::Up
            } else {
                ServiceStatus::Down
            },
            database: if reachable {
                DatabaseStatus::Connected
            } else {
                DatabaseStatus::Disconnected
            },
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
