use std::path::PathBuf;

const API_URL_ENV: &str = "SMX_API_URL";
const DATA_DIR_ENV: &str = "SMX_DATA_DIR";

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Largest `_take` the server honours per request
    pub page_size: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://api.smx.573.no".to_string(),
            user_agent: "SmxStandings/1.0",
            timeout_secs: 30,
            rate_limit_ms: 100, // 10 req/sec
            max_retries: 3,
            retry_base_delay_ms: 500,
            page_size: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub data_dir: PathBuf,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub max_concurrency: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub batch: BatchSettings,
}

impl AppConfig {
    /// Defaults, with the API url and data directory overridable from the environment
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api.base_url = url;
        }
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.cache.data_dir = PathBuf::from(dir);
        }
        config
    }
}
