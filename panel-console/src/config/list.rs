use serde::Deserialize;

/// Defaults shared by every paginated list
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ListConfig {
    /// Initial page size (default: 10)
    pub page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}
