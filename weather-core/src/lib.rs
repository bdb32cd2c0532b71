//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider seam and the CWA open-data client
//! - The aggregation cycle that merges current conditions and forecast
//! - Dashboard state and display formatting
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregator::fetch_weather;
pub use config::Config;
pub use dashboard::{Command, Dashboard};
pub use display::WeatherPanel;
pub use error::AggregationError;
pub use model::{CurrentConditions, ForecastSummary, Location, WeatherRecord};
pub use provider::{WeatherProvider, cwa::CwaProvider, provider_from_config};
