use crate::{
    AggregationError, Config, CurrentConditions, ForecastSummary, provider::cwa::CwaProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod cwa;

/// Source of the two halves of a [`crate::WeatherRecord`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Live observations for an observation station.
    async fn current_conditions(&self, station: &str)
    -> Result<CurrentConditions, AggregationError>;

    /// First forecast time slot for a county/city.
    async fn forecast(&self, county: &str) -> Result<ForecastSummary, AggregationError>;
}

/// Construct the CWA provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider = CwaProvider::new(
        api_key.to_owned(),
        config.base_url.clone(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}
