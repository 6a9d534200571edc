mod state;

pub use state::{AppState, StationCache, STATIONS_KEY};
