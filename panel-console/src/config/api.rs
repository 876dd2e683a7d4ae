use serde::Deserialize;

/// Configuration for the backend API
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the backend (default: http://localhost:8080)
    pub url: String,

    /// Path prefix prepended to every endpoint, e.g. "/api" (default: empty)
    pub prefix: String,

    /// Session token sent as a bearer token; empty means anonymous
    pub token: String,

    /// Request timeout in seconds (default: 10)
    pub timeout: u64,

    /// Connect timeout in seconds (default: 2)
    pub connect_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            prefix: String::new(),
            token: String::new(),
            timeout: 10,
            connect_timeout: 2,
        }
    }
}
