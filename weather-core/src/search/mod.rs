//! Search UI: typed input, debounced suggestions, selection and the weather
//! panel.
//!
//! [`SearchState`] is the synchronous state machine. [`SearchController`]
//! owns one state bundle on a task, turns front-end events into state
//! transitions and fetches, and publishes a [`SearchView`] after each step.

mod controller;
mod debounce;
mod state;
mod view;

pub use controller::{SearchController, SearchEvent, SearchHandle};
pub use debounce::Debouncer;
pub use state::{FetchToken, InputOutcome, Phase, SearchState, UiError};
pub use view::{SearchView, WeatherPanel};
