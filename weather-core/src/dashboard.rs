//! Owned dashboard state.
//!
//! Data flows one way: the view sends [`Command`]s, the caller runs the fetch
//! the dashboard asked for, and the outcome is handed back through
//! [`Dashboard::complete_refresh`]. The dashboard never fetches on its own.

use crate::{AggregationError, WeatherRecord, display::WeatherPanel};

/// Messages from the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Quit,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    record: Option<WeatherRecord>,
    refreshing: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a cycle as started. Returns `false` when one is already in flight;
    /// overlapping refresh requests are ignored rather than queued or restarted.
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            return false;
        }
        self.refreshing = true;
        true
    }

    /// Applies the outcome of a cycle.
    ///
    /// Success replaces the held record wholesale. Failure leaves the prior
    /// record untouched and hands the error back to the caller.
    pub fn complete_refresh(
        &mut self,
        outcome: Result<WeatherRecord, AggregationError>,
    ) -> Result<&WeatherRecord, AggregationError> {
        self.refreshing = false;
        let record = outcome?;
        Ok(self.record.insert(record))
    }

    /// Abandons an in-flight cycle without touching the held record.
    pub fn cancel_refresh(&mut self) {
        self.refreshing = false;
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn record(&self) -> Option<&WeatherRecord> {
        self.record.as_ref()
    }

    pub fn panel(&self) -> Option<WeatherPanel> {
        self.record.as_ref().map(WeatherPanel::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn record(temperature: f64) -> WeatherRecord {
        WeatherRecord {
            observation_time: FixedOffset::east_opt(8 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 3, 1, 10, 50, 0)
                .unwrap(),
            location_name: "臺北".into(),
            description: "多雲".into(),
            weather_code: 4,
            temperature,
            wind_speed: 1.5,
            rain_possibility: 20.0,
            comfortability: "舒適".into(),
            humid: 0.58,
        }
    }

    #[test]
    fn starts_empty() {
        let dashboard = Dashboard::new();
        assert!(dashboard.record().is_none());
        assert!(dashboard.panel().is_none());
        assert!(!dashboard.is_refreshing());
    }

    #[test]
    fn overlapping_refresh_is_ignored() {
        let mut dashboard = Dashboard::new();

        assert!(dashboard.begin_refresh());
        assert!(!dashboard.begin_refresh());
        assert!(dashboard.is_refreshing());

        dashboard.complete_refresh(Ok(record(22.3))).unwrap();
        assert!(!dashboard.is_refreshing());
        assert!(dashboard.begin_refresh());
    }

    #[test]
    fn success_replaces_record() {
        let mut dashboard = Dashboard::new();

        dashboard.begin_refresh();
        dashboard.complete_refresh(Ok(record(22.3))).unwrap();
        dashboard.begin_refresh();
        let held = dashboard.complete_refresh(Ok(record(18.0))).unwrap();

        assert_eq!(held.temperature, 18.0);
        assert_eq!(dashboard.record(), Some(&record(18.0)));
    }

    #[test]
    fn failure_keeps_prior_record() {
        let mut dashboard = Dashboard::new();

        dashboard.begin_refresh();
        dashboard.complete_refresh(Ok(record(22.3))).unwrap();

        dashboard.begin_refresh();
        let err = dashboard
            .complete_refresh(Err(AggregationError::Network("timed out".into())))
            .unwrap_err();

        assert!(matches!(err, AggregationError::Network(_)));
        assert_eq!(dashboard.record(), Some(&record(22.3)));
        assert!(!dashboard.is_refreshing());
    }

    #[test]
    fn cancel_allows_new_refresh() {
        let mut dashboard = Dashboard::new();

        dashboard.begin_refresh();
        dashboard.cancel_refresh();

        assert!(dashboard.begin_refresh());
        assert!(dashboard.record().is_none());
    }

    #[test]
    fn panel_reflects_held_record() {
        let mut dashboard = Dashboard::new();
        dashboard.begin_refresh();
        dashboard.complete_refresh(Ok(record(22.3))).unwrap();

        let panel = dashboard.panel().unwrap();
        assert_eq!(panel.temperature, "22°C");
        assert_eq!(panel.location, "臺北");
    }
}
