use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::api::WeatherApiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::model::StationInfo;

/// Cache for the station directory. There is a single entry keyed by
/// [`STATIONS_KEY`]; admin writes invalidate it.
pub type StationCache = Cache<String, Arc<Vec<StationInfo>>>;

pub const STATIONS_KEY: &str = "stations";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<WeatherApiClient>,
    pub station_cache: StationCache,
}

impl AppState {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config) -> AppResult<Self> {
        let client = WeatherApiClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    #[must_use]
    pub fn with_client(config: Config, client: WeatherApiClient) -> Self {
        let station_cache: StationCache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(config.station_cache_ttl_seconds))
            .build();

        Self {
            config: Arc::new(config),
            client: Arc::new(client),
            station_cache,
        }
    }
}
