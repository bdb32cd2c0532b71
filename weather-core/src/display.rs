//! Display formatting for a [`WeatherRecord`].
//!
//! Records keep the source precision; rounding happens only here.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Serialize;

use crate::WeatherRecord;

/// Round to the nearest integer, ties toward positive infinity.
///
/// `22.3 -> 22`, `19.5 -> 20`, `-0.5 -> 0`, `-1.5 -> -1`. NaN stays NaN.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Rounded integer text, or `--` when the value is not finite.
fn rounded_text(value: f64) -> String {
    let rounded = round_half_up(value);
    if rounded.is_finite() {
        // `as` also folds -0.0 into 0.
        (rounded as i64).to_string()
    } else {
        "--".to_string()
    }
}

/// zh-TW style hour and minute in the timestamp's own offset, e.g. `上午10:50`.
pub fn format_observation_time(time: &DateTime<FixedOffset>) -> String {
    let (is_pm, hour) = time.hour12();
    let period = if is_pm { "下午" } else { "上午" };
    format!("{period}{hour}:{:02}", time.minute())
}

/// Display strings for one record, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherPanel {
    pub location: String,
    pub summary: String,
    pub temperature: String,
    pub wind: String,
    pub rain: String,
    pub observed_at: String,
}

impl From<&WeatherRecord> for WeatherPanel {
    fn from(record: &WeatherRecord) -> Self {
        Self {
            location: record.location_name.clone(),
            summary: format!("{} {}", record.description, record.comfortability),
            temperature: format!("{}°C", rounded_text(record.temperature)),
            wind: format!("{} m/s", record.wind_speed),
            rain: format!("{}%", rounded_text(record.rain_possibility)),
            observed_at: format!(
                "最後觀測時間: {}",
                format_observation_time(&record.observation_time)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn taipei(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, h, m, 0)
            .unwrap()
    }

    #[test]
    fn rounding_boundaries() {
        assert_eq!(round_half_up(22.3), 22.0);
        assert_eq!(round_half_up(19.5), 20.0);
        assert_eq!(round_half_up(22.5), 23.0);
        assert_eq!(round_half_up(22.49), 22.0);
        assert_eq!(round_half_up(0.0), 0.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-1.5), -1.0);
        assert_eq!(round_half_up(-1.6), -2.0);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497.0);
        assert!(round_half_up(f64::NAN).is_nan());
    }

    #[test]
    fn rounded_text_handles_negative_zero_and_nan() {
        assert_eq!(rounded_text(-0.4), "0");
        assert_eq!(rounded_text(19.5), "20");
        assert_eq!(rounded_text(f64::NAN), "--");
        assert_eq!(rounded_text(f64::INFINITY), "--");
    }

    #[test]
    fn observation_time_uses_twelve_hour_clock() {
        assert_eq!(format_observation_time(&taipei(10, 50)), "上午10:50");
        assert_eq!(format_observation_time(&taipei(15, 5)), "下午3:05");
        assert_eq!(format_observation_time(&taipei(0, 0)), "上午12:00");
        assert_eq!(format_observation_time(&taipei(12, 30)), "下午12:30");
    }

    #[test]
    fn observation_time_keeps_source_offset() {
        let utc_view = taipei(10, 50).with_timezone(&FixedOffset::east_opt(0).unwrap());
        assert_eq!(format_observation_time(&utc_view), "上午2:50");
    }

    #[test]
    fn panel_from_record() {
        let record = WeatherRecord {
            observation_time: taipei(15, 5),
            location_name: "臺北".into(),
            description: "多雲".into(),
            weather_code: 4,
            temperature: 22.3,
            wind_speed: 1.5,
            rain_possibility: 19.5,
            comfortability: "舒適".into(),
            humid: 0.58,
        };

        let panel = WeatherPanel::from(&record);
        assert_eq!(
            panel,
            WeatherPanel {
                location: "臺北".into(),
                summary: "多雲 舒適".into(),
                temperature: "22°C".into(),
                wind: "1.5 m/s".into(),
                rain: "20%".into(),
                observed_at: "最後觀測時間: 下午3:05".into(),
            }
        );
    }
}
