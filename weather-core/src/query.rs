//! Classification of what the user typed into a geocoding request.
//!
//! The client decides between postal-code and free-text lookups; the server
//! receives the decision as either a `zip` or a `q` parameter.

/// Inputs shorter than this never trigger a suggestion fetch.
pub const MIN_QUERY_CHARS: usize = 2;

const POSTAL_DIGITS: std::ops::RangeInclusive<usize> = 3..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    PostalCode,
    FreeText,
}

impl QueryMode {
    /// Postal-code mode iff the trimmed input is 3 to 10 ASCII digits.
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();
        if POSTAL_DIGITS.contains(&trimmed.len()) && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            QueryMode::PostalCode
        } else {
            QueryMode::FreeText
        }
    }
}

/// A geocoding request in one of its two modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    PostalCode(String),
    Text(String),
}

impl LocationQuery {
    /// Build the request for raw user input.
    pub fn from_input(input: &str) -> Self {
        match QueryMode::classify(input) {
            QueryMode::PostalCode => LocationQuery::PostalCode(input.trim().to_string()),
            QueryMode::FreeText => LocationQuery::Text(input.to_string()),
        }
    }

    /// Build the request from proxy query parameters. `zip` wins over `q`;
    /// empty values count as absent.
    pub fn from_params(q: Option<&str>, zip: Option<&str>) -> Option<Self> {
        let present = |v: Option<&str>| v.filter(|s| !s.is_empty()).map(str::to_string);

        present(zip)
            .map(LocationQuery::PostalCode)
            .or_else(|| present(q).map(LocationQuery::Text))
    }

    /// Query-string pair understood by the `/location` endpoint.
    pub fn as_param(&self) -> (&'static str, &str) {
        match self {
            LocationQuery::PostalCode(code) => ("zip", code),
            LocationQuery::Text(text) => ("q", text),
        }
    }
}

/// Whether the input is long enough to look up suggestions.
pub fn is_searchable(input: &str) -> bool {
    input.chars().count() >= MIN_QUERY_CHARS
}
