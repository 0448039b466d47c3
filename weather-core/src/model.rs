use serde::{Deserialize, Serialize};

/// A geocoded place the user can pick from the suggestion list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Display name. The direct search provider occasionally omits it.
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl PlaceCandidate {
    /// Candidate synthesized from a postal-code lookup.
    pub fn from_postal_code(code: &str, location: &PostalLocation) -> Self {
        Self {
            name: format!("Postal code {code}"),
            lat: location.lat,
            lon: location.lon,
            country: location.country.clone(),
            state: None,
        }
    }

    /// Label written into the input field on selection: `name[, state], country`.
    pub fn label(&self) -> String {
        self.format_with(&self.name)
    }

    /// Text shown in the suggestion list. Falls back to coordinates when
    /// the provider returned no name.
    pub fn display_label(&self) -> String {
        if self.name.is_empty() {
            self.format_with(&format!("Lat: {}, Lon: {}", self.lat, self.lon))
        } else {
            self.label()
        }
    }

    fn format_with(&self, head: &str) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => format!("{head}, {state}, {}", self.country),
            _ => format!("{head}, {}", self.country),
        }
    }
}

/// Upstream answer for a postal-code lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostalLocation {
    pub lat: f64,
    pub lon: f64,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// The subset of the current-weather payload the UI renders.
///
/// The proxy passes the provider payload through untouched; extra fields are
/// ignored when decoding on the client side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub name: String,
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    pub wind: Wind,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> Option<&WeatherCondition> {
        self.weather.first()
    }

    pub fn description(&self) -> Option<&str> {
        self.condition().map(|c| c.description.as_str())
    }

    pub fn icon_url(&self) -> Option<String> {
        self.condition()
            .map(|c| format!("https://openweathermap.org/img/wn/{}@2x.png", c.icon))
    }
}
