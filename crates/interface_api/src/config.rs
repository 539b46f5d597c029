//! Runtime configuration for the portal API.
//!
//! Every field can be supplied through the environment with an `API_`
//! prefix (`API_PORT`, `API_JWT_SECRET`, ...). Unset fields fall back
//! to the defaults below.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind host for the HTTP listener.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration_secs: u64,
    /// PostgreSQL connection string. Ignored when `storage` is "memory".
    pub database_url: String,
    /// Storage backend, either "postgres" or "memory".
    pub storage: String,
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/taxfiling".to_string(),
            storage: "postgres".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// True when the in-memory stores should back the services.
    pub fn uses_memory_storage(&self) -> bool {
        self.storage.eq_ignore_ascii_case("memory")
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_all_interfaces() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert!(!config.uses_memory_storage());
    }

    #[test]
    fn test_storage_flag_is_case_insensitive() {
        let config = ApiConfig {
            storage: "Memory".to_string(),
            ..ApiConfig::default()
        };
        assert!(config.uses_memory_storage());
    }
}
