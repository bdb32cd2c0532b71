use tracing::{debug, instrument};

use crate::{AggregationError, Location, WeatherProvider, WeatherRecord};

/// Run one aggregation cycle.
///
/// Both requests are issued concurrently and joined with first-failure-wins:
/// when either fails, the sibling request is dropped and the error returned.
/// Dropping the returned future cancels both in-flight requests.
#[instrument(skip(provider), fields(station = %location.station, county = %location.county))]
pub async fn fetch_weather(
    provider: &dyn WeatherProvider,
    location: &Location,
) -> Result<WeatherRecord, AggregationError> {
    let (current, forecast) = tokio::try_join!(
        provider.current_conditions(&location.station),
        provider.forecast(&location.county),
    )?;

    let record = WeatherRecord::merge(current, forecast);
    debug!(
        temperature = record.temperature,
        rain_possibility = record.rain_possibility,
        observed = %record.observation_time,
        "Aggregated weather record"
    );

    Ok(record)
}
