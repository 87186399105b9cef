//! Application controller
//!
//! Owns the UI state (form fields, search state, expanded bus, language)
//! and wires user actions to the orchestrator and the history store.
//!
//! ```text
//!            submit (both fields non-empty, not already loading)
//!   Idle ───────────────────────────────────────────────▶ Loading
//!    ▲                                                      │
//!    │  provider failure                      success       │
//!    └──────────────────────────────── Loading ──────▶ Loaded(suggestion)
//! ```
//!
//! Every state can be re-entered by another submit. Only a successful fetch
//! touches the history: the suggestion is stamped, recorded, then persisted.

pub mod command;
pub mod screen;

pub use command::UserCommand;
pub use screen::{BusRow, HistoryRow, ResultView, Screen};

use crate::history::HistoryStore;
use crate::messages::Catalog;
use crate::route::{Language, RouteSuggestion};
use crate::suggest::RouteOrchestrator;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading,
    Loaded(RouteSuggestion),
}

/// What a submit attempt ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard rejected the submit; nothing changed
    Ignored,
    /// A suggestion is displayed and recorded in the history
    Loaded,
    /// The provider produced nothing usable; nothing is displayed
    NoResult,
}

/// A search that has been started and awaits its provider result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub from: String,
    pub to: String,
    pub language: Language,
}

/// Epoch milliseconds source used to stamp history entries
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub struct Controller {
    orchestrator: RouteOrchestrator,
    history: HistoryStore,
    catalog: Catalog,
    state: SearchState,
    from: String,
    to: String,
    /// Row index into the displayed suggestion's buses
    expanded_bus: Option<usize>,
    language: Language,
    clock: Clock,
}

/// Leaves `Loading` for `Idle` if a submit future is dropped before its
/// result was applied
struct LoadingGuard<'a> {
    controller: &'a mut Controller,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.controller.is_loading() {
            warn!("Search abandoned before the provider answered");
            self.controller.state = SearchState::Idle;
        }
    }
}

impl Controller {
    /// Start in `Idle` with the history already loaded by `history`
    pub fn new(
        orchestrator: RouteOrchestrator,
        history: HistoryStore,
        catalog: Catalog,
        language: Language,
    ) -> Self {
        Self {
            orchestrator,
            history,
            catalog,
            state: SearchState::Idle,
            from: String::new(),
            to: String::new(),
            expanded_bus: None,
            language,
            clock: system_clock,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SearchState::Loading
    }

    /// The suggestion currently displayed, if any
    pub fn suggestion(&self) -> Option<&RouteSuggestion> {
        match &self.state {
            SearchState::Loaded(suggestion) => Some(suggestion),
            _ => None,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn label(&self, key: &str) -> String {
        self.catalog.label(self.language, key)
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn set_from(&mut self, from: &str) {
        self.from = from.to_string();
    }

    pub fn set_to(&mut self, to: &str) {
        self.to = to.to_string();
    }

    /// Row index of the expanded bus
    pub fn expanded_row(&self) -> Option<usize> {
        self.expanded_bus
    }

    /// Name of the expanded bus
    pub fn expanded_bus(&self) -> Option<&str> {
        let index = self.expanded_bus?;
        self.suggestion()?
            .suggested_buses
            .get(index)
            .map(|bus| bus.name.as_str())
    }

    /// Enter `Loading` for `(from, to)`.
    ///
    /// Returns `None` without touching any state when either endpoint is
    /// blank or a search is already in flight.
    pub fn begin_search(&mut self, from: &str, to: &str) -> Option<SearchTicket> {
        let (from, to) = (from.trim(), to.trim());
        if from.is_empty() || to.is_empty() {
            debug!("Ignoring submit with an empty endpoint");
            return None;
        }
        if self.is_loading() {
            debug!("Ignoring submit while a search is in flight");
            return None;
        }

        self.from = from.to_string();
        self.to = to.to_string();
        self.state = SearchState::Loading;
        self.expanded_bus = None;

        Some(SearchTicket {
            from: self.from.clone(),
            to: self.to.clone(),
            language: self.language,
        })
    }

    /// Apply the provider result of a started search and leave `Loading`
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        result: Option<RouteSuggestion>,
    ) -> SubmitOutcome {
        match result {
            Some(suggestion) => {
                let entry = suggestion.with_timestamp((self.clock)());
                self.history.record(entry.clone());
                self.history.persist();
                info!(
                    "Loaded {} → {} ({} history entries)",
                    ticket.from,
                    ticket.to,
                    self.history.len()
                );
                self.state = SearchState::Loaded(entry);
                SubmitOutcome::Loaded
            }
            None => {
                self.state = SearchState::Idle;
                SubmitOutcome::NoResult
            }
        }
    }

    /// Search `(from, to)`, calling `on_loading` once the `Loading` state
    /// is entered and before the provider is awaited
    pub async fn submit_with<F>(&mut self, from: &str, to: &str, on_loading: F) -> SubmitOutcome
    where
        F: FnOnce(&Self),
    {
        let Some(ticket) = self.begin_search(from, to) else {
            return SubmitOutcome::Ignored;
        };
        on_loading(self);

        let orchestrator = self.orchestrator.clone();
        let guard = LoadingGuard { controller: self };
        let result = orchestrator
            .fetch_suggestion(&ticket.from, &ticket.to, ticket.language)
            .await;
        guard.controller.finish_search(ticket, result)
    }

    pub async fn submit(&mut self, from: &str, to: &str) -> SubmitOutcome {
        self.submit_with(from, to, |_| {}).await
    }

    /// Submit whatever the form fields currently hold
    pub async fn submit_form(&mut self) -> SubmitOutcome {
        let (from, to) = (self.from.clone(), self.to.clone());
        self.submit(&from, &to).await
    }

    /// Re-run the search of history entry `index` (always a fresh fetch)
    pub async fn select_history_entry(&mut self, index: usize) -> SubmitOutcome {
        self.select_history_entry_with(index, |_| {}).await
    }

    pub async fn select_history_entry_with<F>(&mut self, index: usize, on_loading: F) -> SubmitOutcome
    where
        F: FnOnce(&Self),
    {
        let Some(entry) = self.history.get(index) else {
            debug!("No history entry at {}", index);
            return SubmitOutcome::Ignored;
        };
        let (from, to) = (entry.from.clone(), entry.to.clone());
        self.submit_with(&from, &to, on_loading).await
    }

    /// Expand bus row `index`, or collapse it if it is the expanded one.
    /// Indexes past the displayed buses are ignored.
    pub fn toggle_bus_row(&mut self, index: usize) {
        let rows = self.suggestion().map_or(0, |s| s.suggested_buses.len());
        if index >= rows {
            debug!("No bus row {}", index);
            return;
        }
        self.expanded_bus = if self.expanded_bus == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// `toggle_bus_row` for the first displayed bus named `bus_name`
    pub fn toggle_bus_detail(&mut self, bus_name: &str) {
        let index = self
            .suggestion()
            .and_then(|s| s.suggested_buses.iter().position(|bus| bus.name == bus_name));
        if let Some(index) = index {
            self.toggle_bus_row(index);
        }
    }

    /// Switch language for labels and the next request; keeps the
    /// displayed suggestion and the history as they are
    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
        debug!("Language switched to {}", self.language);
    }

    /// View of the current state, ready to render
    pub fn screen(&self) -> Screen {
        Screen::build(self)
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("expanded_bus", &self.expanded_bus)
            .field("language", &self.language)
            .field("history", &self.history)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryStore;
    use crate::route::BusDetail;
    use crate::suggest::{MockMode, MockProvider};
    use std::sync::Arc;

    fn controller(mode: MockMode) -> (Arc<MockProvider>, Controller) {
        let mock = Arc::new(MockProvider::new(mode));
        let controller = Controller::new(
            RouteOrchestrator::new(mock.clone()),
            HistoryStore::open(Box::new(MemoryStore::new())),
            Catalog::builtin().unwrap(),
            Language::default(),
        )
        .with_clock(|| 1_000);
        (mock, controller)
    }

    fn suggestion() -> RouteSuggestion {
        RouteSuggestion {
            from: "A".to_string(),
            to: "B".to_string(),
            suggested_buses: vec![BusDetail {
                name: "X".to_string(),
                start_point: "A".to_string(),
                end_point: "B".to_string(),
            }],
            distance: String::new(),
            estimated_fare: String::new(),
            travel_time: String::new(),
            tips: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let (_, controller) = controller(MockMode::Echo);
        assert_eq!(controller.state(), &SearchState::Idle);
        assert_eq!(controller.language(), Language::Bn);
        assert!(controller.suggestion().is_none());
        assert!(controller.expanded_bus().is_none());
    }

    #[test]
    fn test_begin_search_guards_empty_fields() {
        let (_, mut controller) = controller(MockMode::Echo);
        assert!(controller.begin_search("", "B").is_none());
        assert!(controller.begin_search("A", "   ").is_none());
        assert_eq!(controller.state(), &SearchState::Idle);
        assert_eq!(controller.from(), "");
    }

    #[test]
    fn test_begin_search_enters_loading_and_clears_result() {
        let (_, mut controller) = controller(MockMode::Echo);
        let ticket = controller.begin_search("A", "B").unwrap();
        controller.finish_search(ticket, Some(suggestion()));
        assert!(controller.suggestion().is_some());

        let ticket = controller.begin_search(" C ", "D").unwrap();
        assert_eq!(ticket.from, "C");
        assert!(controller.is_loading());
        assert!(controller.suggestion().is_none());
    }

    #[test]
    fn test_no_second_search_while_loading() {
        let (_, mut controller) = controller(MockMode::Echo);
        let _first = controller.begin_search("A", "B").unwrap();
        assert!(controller.begin_search("C", "D").is_none());
        assert_eq!(controller.from(), "A");
    }

    #[test]
    fn test_finish_search_stamps_and_records() {
        let (_, mut controller) = controller(MockMode::Echo);
        let ticket = controller.begin_search("A", "B").unwrap();
        let outcome = controller.finish_search(ticket, Some(suggestion()));
        assert_eq!(outcome, SubmitOutcome::Loaded);
        assert_eq!(controller.suggestion().unwrap().timestamp, Some(1_000));
        assert_eq!(controller.history().len(), 1);
        assert_eq!(controller.history().entries()[0].timestamp, Some(1_000));
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_finish_search_without_result_goes_idle() {
        let (_, mut controller) = controller(MockMode::Echo);
        let ticket = controller.begin_search("A", "B").unwrap();
        assert_eq!(controller.finish_search(ticket, None), SubmitOutcome::NoResult);
        assert_eq!(controller.state(), &SearchState::Idle);
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_submit_with_reports_loading() {
        let (_, mut controller) = controller(MockMode::Echo);
        let mut saw_loading = false;
        controller
            .submit_with("A", "B", |c| saw_loading = c.is_loading())
            .await;
        assert!(saw_loading);
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn test_submit_form_uses_fields() {
        let (mock, mut controller) = controller(MockMode::Echo);
        controller.set_from("Dhaka");
        controller.set_to("Barishal");
        assert_eq!(controller.submit_form().await, SubmitOutcome::Loaded);
        assert_eq!(controller.suggestion().unwrap().to, "Barishal");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_select_missing_history_entry_is_ignored() {
        let (mock, mut controller) = controller(MockMode::Echo);
        assert_eq!(controller.select_history_entry(3).await, SubmitOutcome::Ignored);
        assert_eq!(mock.call_count(), 0);
    }

    fn bus(name: &str, start: &str, end: &str) -> BusDetail {
        BusDetail {
            name: name.to_string(),
            start_point: start.to_string(),
            end_point: end.to_string(),
        }
    }

    fn loaded(controller: &mut Controller, buses: Vec<BusDetail>) {
        let ticket = controller.begin_search("A", "B").unwrap();
        let suggestion = RouteSuggestion {
            suggested_buses: buses,
            ..suggestion()
        };
        controller.finish_search(ticket, Some(suggestion));
    }

    #[test]
    fn test_toggle_bus_detail() {
        let (_, mut controller) = controller(MockMode::Echo);
        loaded(
            &mut controller,
            vec![bus("Green Line", "A", "B"), bus("Hanif", "A", "C")],
        );
        controller.toggle_bus_detail("Green Line");
        assert_eq!(controller.expanded_bus(), Some("Green Line"));
        controller.toggle_bus_detail("Green Line");
        assert_eq!(controller.expanded_bus(), None);

        controller.toggle_bus_detail("Green Line");
        controller.toggle_bus_detail("Hanif");
        assert_eq!(controller.expanded_bus(), Some("Hanif"));
        assert_eq!(controller.expanded_row(), Some(1));
    }

    #[test]
    fn test_toggle_without_result_or_unknown_bus() {
        let (_, mut controller) = controller(MockMode::Echo);
        controller.toggle_bus_detail("Green Line");
        controller.toggle_bus_row(0);
        assert_eq!(controller.expanded_row(), None);

        loaded(&mut controller, vec![bus("Green Line", "A", "B")]);
        controller.toggle_bus_detail("Hanif");
        controller.toggle_bus_row(5);
        assert_eq!(controller.expanded_row(), None);
    }

    #[test]
    fn test_duplicate_bus_names_expand_one_row() {
        let (_, mut controller) = controller(MockMode::Echo);
        loaded(
            &mut controller,
            vec![
                bus("Green Line", "Dhaka", "Chittagong"),
                bus("Green Line", "Dhaka", "Cox's Bazar"),
            ],
        );

        controller.toggle_bus_detail("Green Line");
        let screen = controller.screen();
        let expanded: Vec<&str> = screen
            .result
            .as_ref()
            .unwrap()
            .buses
            .iter()
            .filter(|b| b.expanded)
            .map(|b| b.end_point.as_str())
            .collect();
        assert_eq!(expanded, vec!["Chittagong"]);

        controller.toggle_bus_row(1);
        assert_eq!(controller.expanded_row(), Some(1));
        let screen = controller.screen();
        let rows = &screen.result.as_ref().unwrap().buses;
        assert!(!rows[0].expanded);
        assert!(rows[1].expanded);
    }

    #[test]
    fn test_new_search_collapses_expanded_row() {
        let (_, mut controller) = controller(MockMode::Echo);
        loaded(&mut controller, vec![bus("Green Line", "A", "B")]);
        controller.toggle_bus_row(0);
        loaded(&mut controller, vec![bus("Hanif", "A", "B")]);
        assert_eq!(controller.expanded_row(), None);
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_idle() {
        let mock = Arc::new(MockProvider::with_delay(MockMode::Echo, 500));
        let mut controller = Controller::new(
            RouteOrchestrator::new(mock.clone()),
            HistoryStore::open(Box::new(MemoryStore::new())),
            Catalog::builtin().unwrap(),
            Language::default(),
        );

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            controller.submit("A", "B"),
        )
        .await;
        assert!(timed_out.is_err());
        assert_eq!(controller.state(), &SearchState::Idle);
        assert!(controller.history().is_empty());

        let mock_fast = Arc::new(MockProvider::new(MockMode::Echo));
        controller.orchestrator = RouteOrchestrator::new(mock_fast.clone());
        assert_eq!(controller.submit("C", "D").await, SubmitOutcome::Loaded);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock_fast.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submit_leaves_form_fields() {
        let (mock, mut controller) = controller(MockMode::Echo);
        controller.set_from("Dhaka");
        controller.set_to("Sylhet");
        assert_eq!(controller.submit("Khulna", "  ").await, SubmitOutcome::Ignored);
        assert_eq!(controller.from(), "Dhaka");
        assert_eq!(controller.to(), "Sylhet");
        assert_eq!(mock.call_count(), 0);
    }

    #[test]
    fn test_toggle_language() {
        let (_, mut controller) = controller(MockMode::Echo);
        assert_eq!(controller.label("find-bus"), "বাস খুঁজুন");
        controller.toggle_language();
        assert_eq!(controller.language(), Language::En);
        assert_eq!(controller.label("find-bus"), "Find Bus");
        controller.toggle_language();
        assert_eq!(controller.label("find-bus"), "বাস খুঁজুন");
    }
}
