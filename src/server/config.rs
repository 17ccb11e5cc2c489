/* src/server/config.rs */

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;

use super::TRACING_TARGET_CONFIG;

/// HTTP server configuration.
///
/// Every option can also be set through the environment:
/// - `PORT` - listen port, bound on all interfaces (default: 8080)
/// - `HOST` - public host name shown in startup logs (default: localhost:8080)
/// - `REQUEST_TIMEOUT` - per-request timeout in seconds (default: 15, max: 300)
/// - `SHUTDOWN_TIMEOUT` - graceful shutdown budget in seconds (default: 10, max: 300)
#[derive(Debug, Clone, PartialEq, Eq, Args)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// TCP port to listen on.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Public host name (and port) clients use to reach the service.
    #[arg(long, env = "HOST", default_value = "localhost:8080")]
    pub host: String,

    /// Maximum time in seconds a request may take before it is answered with 408.
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 15)]
    pub request_timeout: u64,

    /// Maximum time in seconds to drain in-flight requests on shutdown.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 10)]
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "localhost:8080".to_string(),
            request_timeout: 15,
            shutdown_timeout: 10,
        }
    }
}

impl ServerConfig {
    /// Reject values outside their valid range.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("Port 0 is invalid. Use a port between 1 and 65535.");
        }

        if self.request_timeout == 0 || self.request_timeout > 300 {
            bail!(
                "Request timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.request_timeout
            );
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            bail!(
                "Shutdown timeout {} seconds is invalid. Must be between 1 and 300 seconds.",
                self.shutdown_timeout
            );
        }

        Ok(())
    }

    /// Listen address: all IPv4 interfaces on the configured port.
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Emit the effective configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            port = self.port,
            host = %self.host,
            request_timeout_secs = self.request_timeout,
            shutdown_timeout_secs = self.shutdown_timeout,
            "server configuration loaded"
        );
    }
}
