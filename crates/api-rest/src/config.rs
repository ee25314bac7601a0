//! Listener configuration, resolved once at startup.

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, as accepted by `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

/// Parses the optional port argument.
///
/// Anything that is not a port in `1..=65535` falls back to [`DEFAULT_PORT`] with a warning;
/// startup never fails because of it.
pub fn resolve_port(arg: Option<&str>) -> u16 {
    let Some(raw) = arg else {
        return DEFAULT_PORT;
    };

    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            tracing::warn!(
                "Invalid port number {:?}, using default port {}",
                raw,
                DEFAULT_PORT
            );
            DEFAULT_PORT
        }
    }
}

/// Parses the listen host from an optional environment value. Blank means [`DEFAULT_HOST`].
pub fn host_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
}
