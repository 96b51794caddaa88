use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    pub page_size: usize,
    pub search_debounce_ms: u32,
    pub placeholder_image: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.bitechx.com".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            page_size: 9,
            search_debounce_ms: 500,
            placeholder_image: "/window.svg".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from compile-time environment variables
    pub fn from_env() -> Self {
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .unwrap_or("https://api.bitechx.com").to_string(),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            page_size: option_env!("PAGE_SIZE")
                .unwrap_or("9").parse().unwrap_or(9),
            search_debounce_ms: option_env!("SEARCH_DEBOUNCE_MS")
                .unwrap_or("500").parse().unwrap_or(500),
            placeholder_image: option_env!("PLACEHOLDER_IMAGE")
                .unwrap_or("/window.svg").to_string(),
        }
    }
}

// Global static configuration
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
