use serde::Deserialize;

use crate::pagination::DEFAULT_ITEMS_PER_PAGE;

/// Configuration options of the server binary, read from `config/*.yaml`
/// plus `ZAPISKI_`-prefixed environment overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub database_url: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Key material for session and flash-message cookies.
    pub secret_key: String,
    /// Directory uploaded post images are stored in.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// Posts per page on list views. Passed explicitly into every composed
    /// query, never read as global state.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_media_root() -> String {
    "media".to_string()
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
