use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::api::models::{
    self, AlertRecord, DailyRecord, ForecastRecord, NearbyRecord, ObservationRecord,
};
use crate::api::{HistoryQuery, WeatherSource};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::{Alert, DailyRollup, ForecastPeriod, Identity, NeighborSample, Sample, StationInfo};

pub struct WeatherApiClient {
    http_client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl WeatherApiClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.clone(),
            bearer_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and map non-success statuses onto `AppError`.
    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Api(format!("Request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Api("Rate limited (429)".to_string()));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(format!("HTTP {status}")));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            return Err(AppError::Api(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }
        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Api(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = what,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse response"
            );
            AppError::Api(format!("Failed to parse {what} response: {e}"))
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let request = self.http_client.get(self.url(path)).query(query);
        let response = self.send(request).await?;
        Self::parse(response, path).await
    }

    /// Latest observation for a station.
    ///
    /// A 404 means the station has not reported yet and is returned as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is not valid JSON.
    pub async fn get_current(&self, station: &str) -> AppResult<Option<Sample>> {
        match self
            .get_json::<ObservationRecord>("/api/current", &[("station", station.to_string())])
            .await
        {
            Ok(record) => Ok(record.into_sample()),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Historical samples, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is not a JSON array.
    pub async fn get_history(&self, station: &str, query: &HistoryQuery) -> AppResult<Vec<Sample>> {
        let mut params = vec![("station", station.to_string())];
        params.extend(query.params());
        let values: Vec<serde_json::Value> = self.get_json("/api/history", &params).await?;
        Ok(models::samples_from_values(values))
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is invalid.
    pub async fn get_daily(&self, station: &str, days: u32) -> AppResult<Vec<DailyRollup>> {
        let records: Vec<DailyRecord> = self
            .get_json(
                "/api/daily",
                &[("station", station.to_string()), ("days", days.to_string())],
            )
            .await?;
        Ok(models::rollups_from_records(records))
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is invalid.
    pub async fn get_alerts(&self, station: &str) -> AppResult<Vec<Alert>> {
        let records: Vec<AlertRecord> = self
            .get_json("/api/alerts", &[("station", station.to_string())])
            .await?;
        Ok(records.into_iter().map(Alert::from).collect())
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is invalid.
    pub async fn get_nearby(&self, station: &str) -> AppResult<Vec<NeighborSample>> {
        let response = self
            .send(
                self.http_client
                    .get(self.url("/api/nearby"))
                    .query(&[("station", station)]),
            )
            .await?;
        // Upstream answers 204 when it has no neighbours to report
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        let records: Vec<NearbyRecord> = Self::parse(response, "/api/nearby").await?;
        Ok(models::neighbors_from_records(records))
    }

    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is invalid.
    pub async fn get_forecast(&self, station: &str) -> AppResult<Vec<ForecastPeriod>> {
        let records: Vec<ForecastRecord> = self
            .get_json("/api/forecast", &[("station", station.to_string())])
            .await?;
        Ok(records.into_iter().map(ForecastPeriod::from).collect())
    }

    /// Station directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails or the body is invalid.
    pub async fn get_stations(&self) -> AppResult<Vec<StationInfo>> {
        self.get_json("/api/stations", &[]).await
    }

    /// Register a station (admin).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` without an admin token, `AppError::Api` otherwise.
    pub async fn create_station(&self, id: &str, name: &str) -> AppResult<()> {
        let request = self
            .authorized(self.http_client.post(self.url("/api/stations")))
            .json(&serde_json::json!({ "id": id, "name": name }));
        self.send(request).await?;
        tracing::info!(station = id, "Station registered");
        Ok(())
    }

    /// Remove a station (admin).
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown station, `AppError::Unauthorized`
    /// without an admin token.
    pub async fn delete_station(&self, id: &str) -> AppResult<()> {
        let request = self.authorized(
            self.http_client
                .delete(self.url(&format!("/api/stations/{id}"))),
        );
        self.send(request).await?;
        tracing::info!(station = id, "Station removed");
        Ok(())
    }

    /// Identity behind the configured bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` if no token is configured or the token is rejected.
    pub async fn get_me(&self) -> AppResult<Identity> {
        if self.bearer_token.is_none() {
            return Err(AppError::Unauthorized("no API token configured".to_string()));
        }
        let request = self.authorized(self.http_client.get(self.url("/api/auth/me")));
        let response = self.send(request).await?;
        Self::parse(response, "/api/auth/me").await
    }
}

impl WeatherSource for WeatherApiClient {
    async fn current(&self, station: &str) -> AppResult<Option<Sample>> {
        self.get_current(station).await
    }

    async fn history(&self, station: &str, query: &HistoryQuery) -> AppResult<Vec<Sample>> {
        self.get_history(station, query).await
    }

    async fn daily(&self, station: &str, days: u32) -> AppResult<Vec<DailyRollup>> {
        self.get_daily(station, days).await
    }

    async fn alerts(&self, station: &str) -> AppResult<Vec<Alert>> {
        self.get_alerts(station).await
    }

    async fn nearby(&self, station: &str) -> AppResult<Vec<NeighborSample>> {
        self.get_nearby(station).await
    }

    async fn forecast(&self, station: &str) -> AppResult<Vec<ForecastPeriod>> {
        self.get_forecast(station).await
    }
}
