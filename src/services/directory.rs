//! Station directory and account operations.
//!
//! These run outside the refresh cycle. The directory listing is served from
//! the moka cache in [`AppState`] until its TTL expires or an admin write
//! invalidates it.

use std::sync::Arc;

use crate::common::{AppState, STATIONS_KEY};
use crate::error::{AppError, AppResult};
use crate::model::{Identity, StationInfo};

/// List known stations, from cache when fresh.
///
/// # Errors
///
/// Returns the client error if the directory has to be fetched and the request fails.
pub async fn list_stations(state: &AppState) -> AppResult<Arc<Vec<StationInfo>>> {
    if let Some(cached) = state.station_cache.get(STATIONS_KEY).await {
        tracing::debug!(count = cached.len(), "cache_hit");
        return Ok(cached);
    }

    let client = state.client.clone();
    state
        .station_cache
        .try_get_with(STATIONS_KEY.to_string(), async move {
            let stations = client.get_stations().await?;
            tracing::debug!(count = stations.len(), "cache_stored");
            Ok::<_, AppError>(Arc::new(stations))
        })
        .await
        .map_err(|e| unshare(&e))
}

/// Display name for a station id, falling back to the id itself.
pub async fn station_name(state: &AppState, station_id: &str) -> String {
    match list_stations(state).await {
        Ok(stations) => stations
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(station_id))
            .map_or_else(|| station_id.to_string(), |s| s.name.clone()),
        Err(e) => {
            tracing::warn!(error = %e, station = station_id, "Station directory unavailable");
            station_id.to_string()
        }
    }
}

/// Register a station and drop the cached directory.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` when the token lacks admin rights.
pub async fn register_station(state: &AppState, id: &str, name: &str) -> AppResult<()> {
    state.client.create_station(id, name).await?;
    invalidate(state).await;
    Ok(())
}

/// Remove a station and drop the cached directory.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown id, `AppError::Unauthorized`
/// when the token lacks admin rights.
pub async fn remove_station(state: &AppState, id: &str) -> AppResult<()> {
    state.client.delete_station(id).await?;
    invalidate(state).await;
    Ok(())
}

/// # Errors
///
/// Returns `AppError::Unauthorized` without a valid token.
pub async fn whoami(state: &AppState) -> AppResult<Identity> {
    state.client.get_me().await
}

/// Manually invalidate the directory entry.
pub async fn invalidate(state: &AppState) {
    state.station_cache.invalidate(STATIONS_KEY).await;
    tracing::debug!(cache_key = STATIONS_KEY, "cache_invalidated");
}

/// moka hands loader errors back behind an `Arc`; keep the variant where it matters.
fn unshare(e: &Arc<AppError>) -> AppError {
    match e.as_ref() {
        AppError::Unauthorized(msg) => AppError::Unauthorized(msg.clone()),
        AppError::NotFound(msg) => AppError::NotFound(msg.clone()),
        other => AppError::Api(other.to_string()),
    }
}
