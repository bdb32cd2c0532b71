use weather_core::WeatherPanel;

/// Print a panel as plain lines; one field per line.
pub fn print_panel(panel: &WeatherPanel) {
    for line in panel_lines(panel) {
        println!("{line}");
    }
}

fn panel_lines(panel: &WeatherPanel) -> Vec<String> {
    vec![
        panel.location.clone(),
        panel.summary.clone(),
        format!("  {}", panel.temperature),
        format!("  風速  {}", panel.wind),
        format!("  降雨  {}", panel.rain),
        panel.observed_at.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_follow_panel_order() {
        let panel = WeatherPanel {
            location: "臺北".into(),
            summary: "多雲 舒適".into(),
            temperature: "22°C".into(),
            wind: "1.5 m/s".into(),
            rain: "20%".into(),
            observed_at: "最後觀測時間: 上午10:50".into(),
        };

        let lines = panel_lines(&panel);
        assert_eq!(lines.first().map(String::as_str), Some("臺北"));
        assert_eq!(lines[2], "  22°C");
        assert_eq!(lines[4], "  降雨  20%");
        assert_eq!(lines.last().map(String::as_str), Some("最後觀測時間: 上午10:50"));
    }
}
