use thiserror::Error;

use crate::{
    client::ClientError,
    model::{PlaceCandidate, WeatherSnapshot},
    query::{LocationQuery, is_searchable},
    theme::Theme,
};

use super::view::{SearchView, WeatherPanel};

/// Inline error shown under the input. Never fatal to the view.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiError {
    #[error("Failed to fetch location suggestions.")]
    SuggestionsFailed,

    #[error("Failed to fetch weather data.")]
    WeatherFailed,

    #[error("No matching location found.")]
    NoMatch,
}

/// Identifies one suggestion or weather fetch. Only the most recently
/// issued token of each kind is applied; older responses are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Typing,
    Suggesting,
    Selected,
}

/// What an input change asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// The change was the echo of a selection; nothing to fetch.
    Skipped,
    /// Input too short to search; suggestions were cleared.
    Cleared,
    /// Fetch suggestions for `query` once the quiet period has passed.
    Schedule { query: LocationQuery, token: FetchToken },
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    input: String,
    suggestions: Vec<PlaceCandidate>,
    weather: Option<WeatherSnapshot>,
    error: Option<UiError>,
    theme: Option<Theme>,

    /// Set by a selection so the label it writes into the input does not
    /// start another suggestion cycle. Consumed by the next input change.
    skip_next_suggestion: bool,

    suggestion_seq: u64,
    weather_seq: u64,
    suggestions_pending: bool,
    weather_pending: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn suggestions(&self) -> &[PlaceCandidate] {
        &self.suggestions
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn error(&self) -> Option<UiError> {
        self.error
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme
    }

    pub fn phase(&self) -> Phase {
        if self.weather.is_some() || self.weather_pending {
            Phase::Selected
        } else if !self.suggestions.is_empty() || self.suggestions_pending {
            Phase::Suggesting
        } else if self.input.is_empty() {
            Phase::Idle
        } else {
            Phase::Typing
        }
    }

    /// The input field's value changed.
    ///
    /// Any pending or in-flight suggestion fetch becomes stale. A user edit
    /// also clears the weather panel and error.
    pub fn input_changed(&mut self, text: impl Into<String>) -> InputOutcome {
        self.input = text.into();
        self.suggestion_seq += 1;
        self.suggestions_pending = false;

        if self.skip_next_suggestion {
            self.skip_next_suggestion = false;
            return InputOutcome::Skipped;
        }

        self.weather = None;
        self.error = None;
        self.weather_seq += 1;
        self.weather_pending = false;

        if !is_searchable(&self.input) {
            self.suggestions.clear();
            return InputOutcome::Cleared;
        }

        self.suggestions_pending = true;
        InputOutcome::Schedule {
            query: LocationQuery::from_input(&self.input),
            token: FetchToken(self.suggestion_seq),
        }
    }

    pub fn is_current_suggestion(&self, token: FetchToken) -> bool {
        token.0 == self.suggestion_seq
    }

    pub fn is_current_weather(&self, token: FetchToken) -> bool {
        token.0 == self.weather_seq
    }

    /// Apply a suggestion response. Returns `false` if it was stale.
    pub fn suggestions_loaded(
        &mut self,
        token: FetchToken,
        result: Result<Vec<PlaceCandidate>, ClientError>,
    ) -> bool {
        if !self.is_current_suggestion(token) {
            return false;
        }
        self.suggestions_pending = false;

        match result {
            Ok(places) => {
                self.suggestions = places;
                self.error = None;
            }
            Err(_) => {
                self.suggestions.clear();
                self.error = Some(UiError::SuggestionsFailed);
            }
        }
        true
    }

    /// Pick suggestion `index`. Returns the token and place to fetch weather
    /// for, or `None` if there is no such suggestion.
    pub fn select(&mut self, index: usize) -> Option<(FetchToken, PlaceCandidate)> {
        let place = self.suggestions.get(index)?.clone();

        self.input = place.label();
        self.skip_next_suggestion = true;
        self.suggestions.clear();
        self.suggestion_seq += 1;
        self.suggestions_pending = false;

        self.weather = None;
        self.error = None;
        self.weather_seq += 1;
        self.weather_pending = true;

        Some((FetchToken(self.weather_seq), place))
    }

    /// Apply a weather response. Returns `false` if it was stale.
    pub fn weather_loaded(
        &mut self,
        token: FetchToken,
        result: Result<WeatherSnapshot, ClientError>,
    ) -> bool {
        if !self.is_current_weather(token) {
            return false;
        }
        self.weather_pending = false;

        match result {
            Ok(snapshot) => {
                let theme = snapshot.description().map(Theme::from_description);
                match theme {
                    Some(theme) => {
                        self.theme = Some(theme);
                        self.weather = Some(snapshot);
                    }
                    None => self.error = Some(UiError::WeatherFailed),
                }
            }
            Err(_) => self.error = Some(UiError::WeatherFailed),
        }
        true
    }

    /// Blur or Enter on the input. Flags "no match" when there is text but
    /// nothing to show for it. Does not look at pending fetches.
    pub fn commit(&mut self) -> bool {
        let no_match = self.suggestions.is_empty()
            && self.weather.is_none()
            && !self.input.trim().is_empty();

        if no_match {
            self.error = Some(UiError::NoMatch);
        }
        no_match
    }

    pub fn view(&self, revision: u64) -> SearchView {
        SearchView {
            revision,
            phase: self.phase(),
            input: self.input.clone(),
            suggestions: self.suggestions.iter().map(PlaceCandidate::display_label).collect(),
            error: self.error.map(|e| e.to_string()),
            weather: self.weather.as_ref().and_then(WeatherPanel::from_snapshot),
            theme: self.theme,
            suggestions_pending: self.suggestions_pending,
            weather_pending: self.weather_pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MainReadings, WeatherCondition, Wind};
    use reqwest::StatusCode;

    fn place(name: &str, state: Option<&str>) -> PlaceCandidate {
        PlaceCandidate {
            name: name.into(),
            lat: -33.87,
            lon: 151.21,
            country: "AU".into(),
            state: state.map(str::to_string),
        }
    }

    fn snapshot(description: &str) -> WeatherSnapshot {
        WeatherSnapshot {
            name: "Sydney".into(),
            weather: vec![WeatherCondition { description: description.into(), icon: "01d".into() }],
            main: MainReadings { temp: 21.0, humidity: 50.0 },
            wind: Wind { speed: 2.5 },
        }
    }

    fn upstream_error() -> ClientError {
        ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Location fetch failed".into(),
        }
    }

    fn with_suggestions(places: Vec<PlaceCandidate>) -> SearchState {
        let mut state = SearchState::new();
        let InputOutcome::Schedule { token, .. } = state.input_changed("Syd") else {
            panic!("expected a scheduled fetch");
        };
        assert!(state.suggestions_loaded(token, Ok(places)));
        state
    }

    #[test]
    fn short_input_clears_suggestions() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);

        assert_eq!(state.input_changed("S"), InputOutcome::Cleared);
        assert!(state.suggestions().is_empty());
        assert_eq!(state.phase(), Phase::Typing);

        assert_eq!(state.input_changed(""), InputOutcome::Cleared);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn input_classifies_query_mode() {
        let mut state = SearchState::new();
        match state.input_changed("2000") {
            InputOutcome::Schedule { query, .. } => {
                assert_eq!(query, LocationQuery::PostalCode("2000".into()))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(state.phase(), Phase::Suggesting);
    }

    #[test]
    fn select_writes_label_and_skips_one_cycle() {
        let mut state = with_suggestions(vec![place("Sydney", Some("New South Wales"))]);

        let (token, selected) = state.select(0).unwrap();
        assert_eq!(selected.name, "Sydney");
        assert_eq!(state.input(), "Sydney, New South Wales, AU");
        assert!(state.suggestions().is_empty());
        assert_eq!(state.phase(), Phase::Selected);

        assert_eq!(state.input_changed("Sydney, New South Wales, AU"), InputOutcome::Skipped);
        assert!(state.is_current_weather(token));

        assert!(matches!(state.input_changed("Sydney, N"), InputOutcome::Schedule { .. }));
    }

    #[test]
    fn select_out_of_range_is_ignored() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        assert!(state.select(3).is_none());
        assert_eq!(state.suggestions().len(), 1);
    }

    #[test]
    fn weather_sets_theme() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        let (token, _) = state.select(0).unwrap();

        assert!(state.weather_loaded(token, Ok(snapshot("light rain"))));
        assert_eq!(state.theme(), Some(Theme::Rainy));
        assert_eq!(state.weather().unwrap().name, "Sydney");
        assert_eq!(state.error(), None);
    }

    #[test]
    fn weather_failure_sets_error_and_keeps_panel_empty() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        let (token, _) = state.select(0).unwrap();

        assert!(state.weather_loaded(token, Err(upstream_error())));
        assert!(state.weather().is_none());
        assert_eq!(state.error(), Some(UiError::WeatherFailed));
        assert_eq!(
            state.view(0).error.as_deref(),
            Some("Failed to fetch weather data.")
        );
    }

    #[test]
    fn weather_without_conditions_is_a_failure() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        let (token, _) = state.select(0).unwrap();

        let mut empty = snapshot("clear sky");
        empty.weather.clear();
        state.weather_loaded(token, Ok(empty));

        assert!(state.weather().is_none());
        assert_eq!(state.error(), Some(UiError::WeatherFailed));
    }

    #[test]
    fn suggestion_failure_sets_error() {
        let mut state = SearchState::new();
        let InputOutcome::Schedule { token, .. } = state.input_changed("Syd") else {
            panic!("expected a scheduled fetch");
        };

        state.suggestions_loaded(token, Err(upstream_error()));
        assert_eq!(state.error(), Some(UiError::SuggestionsFailed));
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut state = SearchState::new();
        let InputOutcome::Schedule { token: old, .. } = state.input_changed("Per") else {
            panic!("expected a scheduled fetch");
        };
        let InputOutcome::Schedule { token: new, .. } = state.input_changed("Perth") else {
            panic!("expected a scheduled fetch");
        };

        assert!(state.suggestions_loaded(new, Ok(vec![place("Perth", None)])));
        assert!(!state.suggestions_loaded(old, Ok(vec![place("Percy", None)])));
        assert_eq!(state.suggestions()[0].name, "Perth");

        let (first, _) = state.select(0).unwrap();
        state.input_changed("Perth, AU");
        state.input_changed("Brisbane");
        assert!(!state.weather_loaded(first, Ok(snapshot("clear sky"))));
        assert!(state.weather().is_none());
    }

    #[test]
    fn user_edit_clears_weather_and_error() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        let (token, _) = state.select(0).unwrap();
        state.input_changed("Sydney, AU");
        state.weather_loaded(token, Ok(snapshot("clear sky")));
        assert!(state.weather().is_some());

        state.input_changed("Sydney, A");
        assert!(state.weather().is_none());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn commit_flags_no_match() {
        let mut state = SearchState::new();
        assert!(!state.commit());

        state.input_changed("   ");
        assert!(!state.commit());

        let InputOutcome::Schedule { token, .. } = state.input_changed("Xyzzy") else {
            panic!("expected a scheduled fetch");
        };
        state.suggestions_loaded(token, Ok(Vec::new()));
        assert!(state.commit());
        assert_eq!(state.error(), Some(UiError::NoMatch));
    }

    #[test]
    fn commit_with_suggestions_is_not_an_error() {
        let mut state = with_suggestions(vec![place("Sydney", None)]);
        assert!(!state.commit());
        assert_eq!(state.error(), None);
    }
}
