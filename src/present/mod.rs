pub mod advisories;
pub mod binder;
pub mod export;
pub mod surface;

pub use binder::{DashboardView, DisplayState, bind_view};
pub use surface::{LogSurface, Surface};
