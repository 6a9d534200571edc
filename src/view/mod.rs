pub mod persist;
pub mod state;

pub use persist::{FileStore, MemoryStore, PersistedSettings, SettingsStore, SETTINGS_KEY};
pub use state::{
    CardId, Intent, PanelId, Section, SectionVisibility, TimeWindow, ViewDefaults, ViewState,
};
