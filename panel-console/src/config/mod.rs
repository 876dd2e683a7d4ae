pub use crate::config::api::ApiConfig;
pub use crate::config::catalog::CatalogConfig;
pub use crate::config::list::ListConfig;
use config::{Config as ConfigCrate, ConfigError, Environment};
use serde::Deserialize;

pub mod api;
pub mod catalog;
pub mod list;

/// Environment variable prefix, e.g. `PANEL_API__URL`
pub const ENV_PREFIX: &str = "PANEL";

/// Main configuration structure for the console client
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Defaults for paginated lists
    pub list: ListConfig,

    /// Subscribe plan catalog configuration
    pub catalog: CatalogConfig,
}

impl ConsoleConfig {
    /// Creates a new Config instance from environment variables
    pub fn new() -> Result<Self, String> {
        Self::from_environment(None)
    }

    /// Creates a Config from an explicit variable map instead of the process environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = config::Map::new();
        for (key, value) in vars {
            source.insert(key.into(), value.into());
        }
        Self::from_environment(Some(source))
    }

    fn from_environment(source: Option<config::Map<String, String>>) -> Result<Self, String> {
        ConfigCrate::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(source),
            )
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e: ConfigError| e.to_string())
    }

    #[cfg(test)]
    pub fn for_test_with_mock(api_mock: &wiremock::MockServer) -> Self {
        Self {
            api: ApiConfig {
                url: api_mock.uri(),
                prefix: String::new(),
                token: "test_token".to_string(),
                timeout: 5,
                connect_timeout: 1,
            },
            list: ListConfig { page_size: 10 },
            catalog: CatalogConfig {
                ttl: 60,
                page_size: 100,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConsoleConfig::from_vars(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.api.url, "http://localhost:8080");
        assert_eq!(config.api.prefix, "");
        assert_eq!(config.api.token, "");
        assert_eq!(config.api.timeout, 10);
        assert_eq!(config.api.connect_timeout, 2);
        assert_eq!(config.list.page_size, 10);
        assert_eq!(config.catalog.ttl, 300);
        assert_eq!(config.catalog.page_size, 1000);
    }

    #[test]
    fn test_api_overrides() {
        let config = ConsoleConfig::from_vars([
            ("PANEL_API__URL", "https://panel.example.com"),
            ("PANEL_API__PREFIX", "/api"),
            ("PANEL_API__TOKEN", "secret"),
            ("PANEL_API__CONNECT_TIMEOUT", "7"),
        ])
        .unwrap();
        assert_eq!(config.api.url, "https://panel.example.com");
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.api.token, "secret");
        assert_eq!(config.api.connect_timeout, 7);
        // untouched fields keep their defaults
        assert_eq!(config.api.timeout, 10);
    }

    #[test]
    fn test_list_and_catalog_overrides() {
        let config = ConsoleConfig::from_vars([
            ("PANEL_LIST__PAGE_SIZE", "25"),
            ("PANEL_CATALOG__TTL", "5"),
        ])
        .unwrap();
        assert_eq!(config.list.page_size, 25);
        assert_eq!(config.catalog.ttl, 5);
        assert_eq!(config.catalog.page_size, 1000);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let result = ConsoleConfig::from_vars([("PANEL_LIST__PAGE_SIZE", "many")]);
        assert!(result.is_err());
    }
}
