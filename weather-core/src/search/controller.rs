use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

use crate::{
    client::{ClientError, SearchBackend},
    model::{PlaceCandidate, WeatherSnapshot},
    query::LocationQuery,
};

use super::{
    debounce::Debouncer,
    state::{FetchToken, InputOutcome, SearchState},
    view::SearchView,
};

/// Input from the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The input field now holds this text.
    InputChanged(String),
    /// The user picked the suggestion at this index.
    Select(usize),
    /// Blur or Enter on the input field.
    Commit,
}

/// Completions fed back into the controller by its own tasks.
#[derive(Debug)]
enum Completion {
    QuietPeriodElapsed {
        query: LocationQuery,
        token: FetchToken,
    },
    Suggestions {
        token: FetchToken,
        result: Result<Vec<PlaceCandidate>, ClientError>,
    },
    Weather {
        token: FetchToken,
        result: Result<WeatherSnapshot, ClientError>,
    },
}

/// Owns one [`SearchState`] on a task; see [`SearchController::spawn`].
#[derive(Debug)]
pub struct SearchController {
    state: SearchState,
    backend: Arc<dyn SearchBackend>,
    quiet_period: Duration,
    debouncer: Debouncer,
    completions: mpsc::UnboundedSender<Completion>,
    view: watch::Sender<SearchView>,
    revision: u64,
}

impl SearchController {
    /// Start a controller. It runs until the returned handle is dropped,
    /// after which any pending suggestion fetch is cancelled and the
    /// published view is reset.
    pub fn spawn(backend: Arc<dyn SearchBackend>, quiet_period: Duration) -> SearchHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SearchView::default());

        let controller = SearchController {
            state: SearchState::new(),
            backend,
            quiet_period,
            debouncer: Debouncer::new(),
            completions: completions_tx,
            view: view_tx,
            revision: 0,
        };
        let task = tokio::spawn(controller.run(events_rx, completions_rx));

        SearchHandle { events: events_tx, view: view_rx, sent: 0, task }
    }

    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<SearchEvent>,
        mut completions: mpsc::UnboundedReceiver<Completion>,
    ) {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.revision += 1;
                        self.handle_event(event);
                    }
                    None => break,
                },
                Some(completion) = completions.recv() => self.handle_completion(completion),
            }
            self.view.send_replace(self.state.view(self.revision));
        }

        self.debouncer.cancel();
        self.view.send_replace(SearchView::default());
        tracing::debug!("search controller stopped");
    }

    fn handle_event(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::InputChanged(text) => {
                self.debouncer.cancel();
                match self.state.input_changed(text) {
                    InputOutcome::Schedule { query, token } => {
                        let completions = self.completions.clone();
                        self.debouncer.schedule(self.quiet_period, async move {
                            let _ =
                                completions.send(Completion::QuietPeriodElapsed { query, token });
                        });
                    }
                    InputOutcome::Skipped => {
                        tracing::debug!("skipping suggestions for selected label")
                    }
                    InputOutcome::Cleared => {}
                }
            }
            SearchEvent::Select(index) => {
                if let Some((token, place)) = self.state.select(index) {
                    self.debouncer.cancel();
                    self.fetch_weather(token, place);
                }
            }
            SearchEvent::Commit => {
                self.state.commit();
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::QuietPeriodElapsed { query, token } => {
                if self.state.is_current_suggestion(token) {
                    self.fetch_suggestions(token, query);
                }
            }
            Completion::Suggestions { token, result } => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "location suggestions failed");
                }
                if !self.state.suggestions_loaded(token, result) {
                    tracing::debug!(?token, "discarding stale suggestions");
                }
            }
            Completion::Weather { token, result } => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "weather fetch failed");
                }
                if !self.state.weather_loaded(token, result) {
                    tracing::debug!(?token, "discarding stale weather");
                }
            }
        }
    }

    fn fetch_suggestions(&self, token: FetchToken, query: LocationQuery) {
        let backend = self.backend.clone();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = backend.suggestions(&query).await;
            let _ = completions.send(Completion::Suggestions { token, result });
        });
    }

    fn fetch_weather(&self, token: FetchToken, place: PlaceCandidate) {
        let backend = self.backend.clone();
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = backend.weather(place.lat, place.lon).await;
            let _ = completions.send(Completion::Weather { token, result });
        });
    }
}

/// Front-end side of a running [`SearchController`].
#[derive(Debug)]
pub struct SearchHandle {
    events: mpsc::UnboundedSender<SearchEvent>,
    view: watch::Receiver<SearchView>,
    sent: u64,
    task: JoinHandle<()>,
}

impl SearchHandle {
    pub fn send(&mut self, event: SearchEvent) {
        if self.events.send(event).is_ok() {
            self.sent += 1;
        }
    }

    pub fn input_changed(&mut self, text: impl Into<String>) {
        self.send(SearchEvent::InputChanged(text.into()));
    }

    pub fn select(&mut self, index: usize) {
        self.send(SearchEvent::Select(index));
    }

    pub fn commit(&mut self) {
        self.send(SearchEvent::Commit);
    }

    /// Latest published view.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Another receiver for the view, e.g. for a renderer task.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    /// Wait until every event sent so far has been processed and `f` holds.
    /// Returns `None` if the controller has stopped.
    pub async fn wait_until(
        &mut self,
        mut f: impl FnMut(&SearchView) -> bool,
    ) -> Option<SearchView> {
        let sent = self.sent;
        self.view.wait_for(|v| v.revision >= sent && f(v)).await.ok().map(|v| v.clone())
    }

    /// Wait until no fetch is scheduled or in flight.
    pub async fn settled(&mut self) -> Option<SearchView> {
        self.wait_until(|v| !v.is_pending()).await
    }

    /// Stop the controller and wait for it to finish.
    pub async fn shutdown(self) {
        let SearchHandle { events, task, .. } = self;
        drop(events);
        let _ = task.await;
    }
}
