use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Weather data API
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_seconds: u64,

    // Client-side persistence
    pub state_file: PathBuf,

    // View defaults
    pub default_station: String,
    pub default_refresh_ms: u64,

    // Request shaping
    pub history_limit: u32,
    pub history_limit_absolute: u32,
    pub daily_days: u32,

    // Caching
    pub station_cache_ttl_seconds: u64,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            // Weather data API
            api_base_url: env::var("WX_API_BASE_URL")
                .map_err(|_| ConfigError::Missing("WX_API_BASE_URL"))?
                .trim_end_matches('/')
                .to_string(),
            api_token: env::var("WX_API_TOKEN").ok().filter(|t| !t.is_empty()),
            request_timeout_seconds: env::var("WX_REQUEST_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            // Client-side persistence
            state_file: env::var("WX_STATE_FILE")
                .unwrap_or_else(|_| ".wx-dashboard.json".to_string())
                .into(),

            // View defaults
            default_station: env::var("WX_DEFAULT_STATION")
                .unwrap_or_else(|_| "KALMILLP10".to_string()),
            default_refresh_ms: env::var("WX_REFRESH_MS")
                .unwrap_or_else(|_| "30000".to_string())
                .parse()
                .unwrap_or(30_000),

            // Request shaping
            history_limit: env::var("WX_HISTORY_LIMIT")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
            history_limit_absolute: env::var("WX_HISTORY_LIMIT_ABSOLUTE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            daily_days: env::var("WX_DAILY_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),

            // Caching
            station_cache_ttl_seconds: env::var("WX_STATION_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .unwrap_or(300), // 5 minutes default

            // Application metadata
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        })
    }

    /// Configuration pointing at `base_url` with every other value at its default.
    #[must_use]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
            request_timeout_seconds: 10,
            state_file: ".wx-dashboard.json".into(),
            default_station: "KALMILLP10".to_string(),
            default_refresh_ms: 30_000,
            history_limit: 500,
            history_limit_absolute: 1000,
            daily_days: 30,
            station_cache_ttl_seconds: 300,
            deployment: Deployment::Local,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
