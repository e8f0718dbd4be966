//! Environment-driven server configuration.

use std::net::{IpAddr, SocketAddr};

/// Runtime settings for the API server, read once at startup.
///
/// Defaults suit local development; production deployments override them
/// through the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address, from `HOST` (default `0.0.0.0`).
    pub host: String,
    /// Bind port, from `PORT` (default `8800`, the port the SPA dev
    /// server is configured to call).
    pub port: u16,
    /// Allowed CORS origins, from comma-separated `CORS_ORIGINS`
    /// (default `http://localhost:3000`).
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds, from `REQUEST_TIMEOUT_SECS`
    /// (default `30`).
    pub request_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Read the configuration from the environment.
    ///
    /// An unparseable numeric value aborts startup.
    pub fn from_env() -> Self {
        let port = env_or("PORT", "8800")
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        ServerConfig {
            host: env_or("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
        }
    }

    /// The socket address to bind. Panics on a malformed `HOST`.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip: IpAddr = self.host.parse().expect("HOST must be a valid IP address");
        SocketAddr::new(ip, self.port)
    }
}
