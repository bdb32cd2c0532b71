use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STATION: &str = "臺北";
pub const DEFAULT_COUNTY: &str = "臺北市";

/// The two lookup keys of one dashboard: the observation station used for
/// current conditions and the county/city used for the forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub station: String,
    pub county: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            station: DEFAULT_STATION.to_string(),
            county: DEFAULT_COUNTY.to_string(),
        }
    }
}

/// Allowlisted subset of a current-conditions payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub observation_time: DateTime<FixedOffset>,
    pub location_name: String,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humid: f64,
}

/// Allowlisted subset of the first time slot of a forecast payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub description: String,
    pub weather_code: u32,
    pub rain_possibility: f64,
    pub comfortability: String,
}

/// Merged, flat result of one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub observation_time: DateTime<FixedOffset>,
    pub location_name: String,
    pub description: String,
    pub weather_code: u32,
    /// Degrees Celsius, unrounded.
    pub temperature: f64,
    /// As reported by the source, unconverted.
    pub wind_speed: f64,
    /// Percentage, 0..=100.
    pub rain_possibility: f64,
    pub comfortability: String,
    /// Relative humidity as a fraction, 0..=1.
    pub humid: f64,
}

impl WeatherRecord {
    /// The only way to build a record: one successful half from each endpoint.
    pub fn merge(current: CurrentConditions, forecast: ForecastSummary) -> Self {
        Self {
            observation_time: current.observation_time,
            location_name: current.location_name,
            description: forecast.description,
            weather_code: forecast.weather_code,
            temperature: current.temperature,
            wind_speed: current.wind_speed,
            rain_possibility: forecast.rain_possibility,
            comfortability: forecast.comfortability,
            humid: current.humid,
        }
    }
}
