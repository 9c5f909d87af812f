//! Application configuration loaded from environment variables.

use std::env;

use scribe_infra::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    /// `0` binds an ephemeral port.
    pub port: u16,
    /// `None` runs the service on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .map(|url| {
                let defaults = DatabaseConfig::new(url);
                DatabaseConfig {
                    max_connections: lookup("DB_MAX_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.max_connections),
                    min_connections: lookup("DB_MIN_CONNECTIONS")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(defaults.min_connections),
                    ..defaults
                }
            });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            telemetry: TelemetryConfig::from_lookup(&lookup),
        }
    }

    /// Loopback, ephemeral port, in-memory store.
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database: None,
            telemetry: TelemetryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_database_settings() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/blog"),
            ("DB_MAX_CONNECTIONS", "50"),
            ("PORT", "not-a-port"),
        ]);

        let db = config.database.unwrap();
        assert_eq!(db.url, "postgres://localhost/blog");
        assert_eq!(db.max_connections, 50);
        assert_eq!(db.min_connections, 2);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_database_url_means_in_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]);
        assert!(config.database.is_none());
    }
}
