use serde::Deserialize;

/// Configuration for the shared subscribe plan catalog
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    /// How long a loaded catalog is reused, in seconds (default: 5 minutes)
    pub ttl: u64,

    /// Page size used to load the whole catalog in one request (default: 1000)
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl: 300, // 5 minutes
            page_size: 1000,
        }
    }
}
