//! Central Weather Administration open-data client.
//!
//! Two datasets feed the dashboard:
//! - `O-A0003-001`: station observations (current conditions)
//! - `F-C0032-001`: 36-hour county forecast

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use tracing::{debug, instrument};

use crate::{
    AggregationError,
    model::{CurrentConditions, ForecastSummary},
};

use super::WeatherProvider;

pub const CURRENT_DATASET: &str = "O-A0003-001";
pub const FORECAST_DATASET: &str = "F-C0032-001";

const CURRENT_ELEMENTS: [&str; 3] = ["WDSD", "TEMP", "HUMD"];
const FORECAST_ELEMENTS: [&str; 3] = ["Wx", "PoP", "CI"];

/// CWA publishes observation times in Taiwan local time without an offset.
const TAIWAN_OFFSET_SECS: i32 = 8 * 3600;

#[derive(Debug, Clone)]
pub struct CwaProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl CwaProvider {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, AggregationError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AggregationError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    #[instrument(skip(self))]
    async fn fetch_dataset<T: DeserializeOwned>(
        &self,
        dataset: &str,
        location: &str,
    ) -> Result<T, AggregationError> {
        let url = format!("{}/{}", self.base_url, dataset);
        debug!(url = %url, "Fetching CWA dataset");

        // `without_url` keeps the authorization query out of error messages.
        let res = self
            .http
            .get(&url)
            .query(&[("Authorization", self.api_key.as_str()), ("locationName", location)])
            .send()
            .await
            .map_err(|e| {
                AggregationError::Network(format!("{dataset} request failed: {}", e.without_url()))
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|e| {
            AggregationError::Network(format!(
                "Failed to read {dataset} response body: {}",
                e.without_url()
            ))
        })?;

        if !status.is_success() {
            return Err(AggregationError::Response(format!(
                "{dataset} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AggregationError::Response(format!("Failed to parse {dataset} JSON: {e}")))
    }
}

#[async_trait]
impl WeatherProvider for CwaProvider {
    async fn current_conditions(
        &self,
        station: &str,
    ) -> Result<CurrentConditions, AggregationError> {
        let payload: CwaResponse<CwaStation> =
            self.fetch_dataset(CURRENT_DATASET, station).await?;
        extract_current(payload, station)
    }

    async fn forecast(&self, county: &str) -> Result<ForecastSummary, AggregationError> {
        let payload: CwaResponse<CwaCounty> = self.fetch_dataset(FORECAST_DATASET, county).await?;
        extract_forecast(payload, county)
    }
}

#[derive(Debug, Deserialize)]
struct CwaResponse<L> {
    records: Option<CwaRecords<L>>,
}

#[derive(Debug, Deserialize)]
struct CwaRecords<L> {
    #[serde(default = "Vec::new")]
    location: Vec<L>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaStation {
    #[serde(default)]
    location_name: Option<String>,
    time: Option<CwaObsTime>,
    #[serde(default)]
    weather_element: Vec<CwaElementValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaObsTime {
    obs_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaElementValue {
    #[serde(default)]
    element_name: Option<String>,
    #[serde(default)]
    element_value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaCounty {
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    weather_element: Vec<CwaForecastElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaForecastElement {
    #[serde(default)]
    element_name: Option<String>,
    #[serde(default)]
    time: Vec<CwaTimeSlot>,
}

#[derive(Debug, Deserialize)]
struct CwaTimeSlot {
    parameter: Option<CwaParameter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CwaParameter {
    parameter_name: Option<String>,
    #[serde(default)]
    parameter_value: Value,
}

trait Named {
    fn name(&self) -> Option<&str>;
}

impl Named for CwaStation {
    fn name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }
}

impl Named for CwaCounty {
    fn name(&self) -> Option<&str> {
        self.location_name.as_deref()
    }
}

fn find_location<L: Named>(
    payload: CwaResponse<L>,
    name: &str,
    dataset: &str,
) -> Result<L, AggregationError> {
    let records = payload
        .records
        .ok_or_else(|| AggregationError::FieldMissing(format!("{dataset}: records")))?;

    records
        .location
        .into_iter()
        .find(|l| l.name() == Some(name))
        .ok_or_else(|| AggregationError::FieldMissing(format!("{dataset}: location '{name}'")))
}

fn extract_current(
    payload: CwaResponse<CwaStation>,
    station: &str,
) -> Result<CurrentConditions, AggregationError> {
    let entry = find_location(payload, station, CURRENT_DATASET)?;

    let elements: HashMap<&str, &Value> = entry
        .weather_element
        .iter()
        .filter_map(|e| {
            let name = e.element_name.as_deref()?;
            CURRENT_ELEMENTS
                .contains(&name)
                .then_some((name, &e.element_value))
        })
        .collect();

    let number = |name: &str| -> Result<f64, AggregationError> {
        let value = elements.get(name).ok_or_else(|| {
            AggregationError::FieldMissing(format!("{CURRENT_DATASET}: {name} for '{station}'"))
        })?;
        parse_number(name, value)
    };

    let temperature = number("TEMP")?;
    let wind_speed = number("WDSD")?;
    let humid = number("HUMD")?;

    let obs_time = entry
        .time
        .as_ref()
        .and_then(|t| t.obs_time.as_deref())
        .ok_or_else(|| {
            AggregationError::FieldMissing(format!("{CURRENT_DATASET}: time.obsTime for '{station}'"))
        })?;

    Ok(CurrentConditions {
        observation_time: parse_obs_time(obs_time)?,
        // Matched by name in `find_location`.
        location_name: station.to_string(),
        temperature,
        wind_speed,
        humid,
    })
}

fn extract_forecast(
    payload: CwaResponse<CwaCounty>,
    county: &str,
) -> Result<ForecastSummary, AggregationError> {
    let entry = find_location(payload, county, FORECAST_DATASET)?;

    // First time slot of each allowlisted element.
    let first_slots: HashMap<&str, Option<&CwaParameter>> = entry
        .weather_element
        .iter()
        .filter_map(|e| {
            let name = e.element_name.as_deref()?;
            if !FORECAST_ELEMENTS.contains(&name) {
                return None;
            }
            let first = e.time.first().and_then(|slot| slot.parameter.as_ref());
            Some((name, first))
        })
        .collect();

    let parameter = |name: &str| first_parameter(&first_slots, name, county);
    let parameter_name = |name: &str| -> Result<String, AggregationError> {
        parameter(name)?.parameter_name.clone().ok_or_else(|| {
            AggregationError::FieldMissing(format!("{FORECAST_DATASET}: {name}.parameterName"))
        })
    };

    let wx = parameter("Wx")?;
    let description = parameter_name("Wx")?;
    let weather_code = parse_code("Wx.parameterValue", &wx.parameter_value)?;
    let rain_possibility = parse_number("PoP", &Value::String(parameter_name("PoP")?))?;
    let comfortability = parameter_name("CI")?;

    Ok(ForecastSummary {
        description,
        weather_code,
        rain_possibility,
        comfortability,
    })
}

fn first_parameter<'a>(
    slots: &HashMap<&str, Option<&'a CwaParameter>>,
    name: &str,
    county: &str,
) -> Result<&'a CwaParameter, AggregationError> {
    slots.get(name).copied().flatten().ok_or_else(|| {
        AggregationError::FieldMissing(format!(
            "{FORECAST_DATASET}: {name} time[0].parameter for '{county}'"
        ))
    })
}

/// Element values arrive as JSON numbers or numeric strings.
fn parse_number(field: &str, value: &Value) -> Result<f64, AggregationError> {
    match value {
        Value::Null => Err(AggregationError::FieldMissing(format!("{field} has no value"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| AggregationError::Response(format!("{field} is not a finite number"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| AggregationError::Response(format!("{field} is not numeric: {s:?}"))),
        other => Err(AggregationError::Response(format!(
            "{field} is not numeric: {other}"
        ))),
    }
}

fn parse_code(field: &str, value: &Value) -> Result<u32, AggregationError> {
    let code = match value {
        Value::Null => return Err(AggregationError::FieldMissing(field.to_string())),
        Value::Number(n) => n.as_u64().and_then(|c| u32::try_from(c).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    code.ok_or_else(|| AggregationError::Response(format!("{field} is not a weather code: {value}")))
}

fn parse_obs_time(s: &str) -> Result<DateTime<FixedOffset>, AggregationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    let taiwan = FixedOffset::east_opt(TAIWAN_OFFSET_SECS)
        .ok_or_else(|| AggregationError::Response("Invalid Taiwan offset".to_string()))?;

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        let parsed = NaiveDateTime::parse_from_str(s, format)
            .ok()
            .and_then(|naive| naive.and_local_timezone(taiwan).single());
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    Err(AggregationError::Response(format!("Invalid obsTime format: {s}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
