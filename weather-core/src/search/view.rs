use crate::{model::WeatherSnapshot, theme::Theme};

use super::state::Phase;

/// Everything a front-end needs to draw the search screen.
///
/// Rebuilt after every state change. `theme` reverts to `None` when the
/// controller shuts down.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchView {
    /// Number of front-end events the controller has processed.
    pub revision: u64,
    pub phase: Phase,
    pub input: String,
    pub suggestions: Vec<String>,
    pub error: Option<String>,
    pub weather: Option<WeatherPanel>,
    pub theme: Option<Theme>,
    pub suggestions_pending: bool,
    pub weather_pending: bool,
}

impl Default for SearchView {
    fn default() -> Self {
        Self {
            revision: 0,
            phase: Phase::Idle,
            input: String::new(),
            suggestions: Vec::new(),
            error: None,
            weather: None,
            theme: None,
            suggestions_pending: false,
            weather_pending: false,
        }
    }
}

impl SearchView {
    pub fn is_pending(&self) -> bool {
        self.suggestions_pending || self.weather_pending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherPanel {
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl WeatherPanel {
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Option<Self> {
        let condition = snapshot.condition()?;
        Some(Self {
            name: snapshot.name.clone(),
            description: condition.description.clone(),
            icon_url: snapshot.icon_url()?,
            temperature: snapshot.main.temp,
            humidity: snapshot.main.humidity,
            wind_speed: snapshot.wind.speed,
        })
    }

    /// Reading lines in display order.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Temperature: {} °C", self.temperature),
            format!("Humidity: {} %", self.humidity),
            format!("Wind speed: {} m/s", self.wind_speed),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MainReadings, WeatherCondition, Wind};

    #[test]
    fn panel_lines_format_like_provider_numbers() {
        let snapshot = WeatherSnapshot {
            name: "Hobart".into(),
            weather: vec![WeatherCondition {
                description: "overcast clouds".into(),
                icon: "04n".into(),
            }],
            main: MainReadings { temp: 11.5, humidity: 81.0 },
            wind: Wind { speed: 6.0 },
        };

        let panel = WeatherPanel::from_snapshot(&snapshot).unwrap();
        assert_eq!(panel.icon_url, "https://openweathermap.org/img/wn/04n@2x.png");
        assert_eq!(
            panel.lines(),
            [
                "Temperature: 11.5 °C".to_string(),
                "Humidity: 81 %".to_string(),
                "Wind speed: 6 m/s".to_string(),
            ]
        );
    }
}
