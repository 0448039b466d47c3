use std::fmt;

/// Background theme derived from the current weather description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Cloudy,
    Rainy,
    Sunny,
}

const RAINY_WORDS: [&str; 4] = ["rain", "drizzle", "storm", "thunder"];

impl Theme {
    /// Cloud is checked first, so "cloudy with thunderstorms" is cloudy.
    pub fn from_description(description: &str) -> Self {
        let desc = description.to_lowercase();
        if desc.contains("cloud") {
            Theme::Cloudy
        } else if RAINY_WORDS.iter().any(|w| desc.contains(w)) {
            Theme::Rainy
        } else {
            Theme::Sunny
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Sunny => "sunny",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
