// Configuration module entry point
// Loads configuration from defaults and environment, holds runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Prefix for environment overrides, e.g. `STATIC_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "STATIC";

impl Config {
    /// Load configuration from built-in defaults and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(Self::environment())
    }

    /// Load configuration with the given environment source layered over the defaults
    pub fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .set_default("http.server_name", "static-cors-server/0.1")?
            .add_source(environment)
            .build()?;

        settings.try_deserialize()
    }

    /// Environment source used by [`Config::load`]
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = &self.server.host;
        let port = self.server.port;
        // Bare IPv6 literals need brackets before the port
        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
        addr.parse().map_err(|e| format!("Invalid address '{addr}': {e}"))
    }
}
