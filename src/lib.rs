//! wx-dashboard - live telemetry dashboard core for a personal weather station network
//!
//! This library exposes the core modules for testing and reuse.

pub mod api;
pub mod chart;
pub mod common;
pub mod config;
pub mod error;
pub mod input;
pub mod metrics;
pub mod model;
pub mod present;
pub mod services;
pub mod sync;
pub mod units;
pub mod view;
