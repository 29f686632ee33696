//! Searchable pickers over a list controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::domain::LoadingState;

use super::debounce::Debounce;
use super::list::{ListController, ListSource, LoadHandle, Snapshot};

struct QueryState {
    debounce: Debounce<String>,
    sleeper: Option<AbortHandle>,
}

impl QueryState {
    fn cancel_sleeper(&mut self) {
        if let Some(sleeper) = self.sleeper.take() {
            sleeper.abort();
        }
    }
}

/// A list controller filtered by a free-text query.
///
/// Typed queries go through [`Picker::set_query`], which waits for the
/// input to settle before filtering. [`Picker::apply_query`] filters
/// immediately.
pub struct Picker<S: ListSource<Criteria = String>> {
    controller: ListController<S>,
    query: Arc<Mutex<QueryState>>,
}

impl<S: ListSource<Criteria = String>> Picker<S> {
    pub fn new(controller: ListController<S>, debounce: Duration) -> Self {
        Self {
            controller,
            query: Arc::new(Mutex::new(QueryState {
                debounce: Debounce::new(debounce),
                sleeper: None,
            })),
        }
    }

    fn lock_query(&self) -> MutexGuard<'_, QueryState> {
        self.query.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load(&self) -> LoadHandle {
        self.controller.load()
    }

    pub fn cancel(&self) {
        self.controller.cancel();
    }

    /// Record a typed query; filtering happens once it has settled.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_query(&self, query: &str) {
        let mut state = self.lock_query();
        state.cancel_sleeper();
        let deadline = state.debounce.push(query.trim().to_string(), Instant::now());

        let shared = self.controller.shared();
        let query = Arc::clone(&self.query);
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let settled = {
                let mut state = query.lock().unwrap_or_else(PoisonError::into_inner);
                state.sleeper = None;
                state.debounce.poll(Instant::now())
            };
            if let Some(settled) = settled {
                shared.apply_query(settled);
            }
        });
        state.sleeper = Some(sleeper.abort_handle());
    }

    /// Filter by `query` now, dropping any pending typed query.
    pub fn apply_query(&self, query: &str) {
        let query = query.trim().to_string();
        let changed = {
            let mut state = self.lock_query();
            state.cancel_sleeper();
            state.debounce.force(query.clone())
        };
        if changed {
            self.controller.shared().apply_query(query);
        }
    }

    /// The newest query, settled or not.
    pub fn query(&self) -> String {
        self.lock_query()
            .debounce
            .latest()
            .cloned()
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S::Row>> {
        self.controller.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot<S::Row> {
        self.controller.snapshot()
    }

    pub fn state(&self) -> LoadingState {
        self.controller.state()
    }

    pub fn controller(&self) -> &ListController<S> {
        &self.controller
    }
}

impl<S: ListSource<Criteria = String>> Drop for Picker<S> {
    fn drop(&mut self) {
        self.lock_query().cancel_sleeper();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasp::RaspError;
    use crate::controller::RetryPolicy;
    use crate::controller::sources::matches_query;

    const DEBOUNCE: Duration = Duration::from_millis(150);

    struct Names(Vec<&'static str>);

    impl ListSource for Names {
        type Row = String;
        type Criteria = String;

        async fn fetch(&self) -> Result<Vec<String>, RaspError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }

        fn matches(&self, row: &String, query: &String) -> bool {
            matches_query(row, query)
        }

        fn empty_message(&self, _query: &String) -> String {
            "Город не найден".into()
        }

        fn error_message(&self) -> String {
            "Ошибка загрузки".into()
        }
    }

    async fn loaded_picker() -> Picker<Names> {
        let controller = ListController::new(
            Names(vec!["Москва", "Пермь", "Санкт-Петербург"]),
            RetryPolicy::default(),
        );
        let picker = Picker::new(controller, DEBOUNCE);
        picker.load().wait().await;
        picker
    }

    #[tokio::test(start_paused = true)]
    async fn typed_query_filters_after_settling() {
        let picker = loaded_picker().await;

        picker.set_query("пе");
        assert_eq!(picker.snapshot().rows.len(), 3);
        assert_eq!(picker.query(), "пе");

        tokio::time::sleep(DEBOUNCE + Duration::from_millis(1)).await;
        assert_eq!(picker.snapshot().rows, vec!["Пермь", "Санкт-Петербург"]);
        assert_eq!(picker.state(), LoadingState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_keystroke_applies() {
        let picker = loaded_picker().await;

        picker.set_query("м");
        tokio::time::sleep(Duration::from_millis(100)).await;
        picker.set_query("мо");
        tokio::time::sleep(Duration::from_millis(100)).await;
        // 200ms since the first keystroke, but only 100ms since the last
        assert_eq!(picker.snapshot().rows.len(), 3);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(picker.snapshot().rows, vec!["Москва"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_restores_full_list() {
        let picker = loaded_picker().await;

        picker.apply_query("пе");
        assert_eq!(picker.snapshot().rows.len(), 2);

        picker.set_query("");
        tokio::time::sleep(DEBOUNCE * 2).await;
        assert_eq!(picker.snapshot().rows.len(), 3);
        assert_eq!(picker.state(), LoadingState::Loaded);
    }

    #[tokio::test(start_paused = true)]
    async fn no_match_is_empty() {
        let picker = loaded_picker().await;

        picker.apply_query("xyz");
        assert_eq!(picker.state(), LoadingState::Empty("Город не найден".into()));
        assert!(picker.snapshot().rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn apply_query_drops_pending_input() {
        let picker = loaded_picker().await;

        picker.set_query("мо");
        picker.apply_query("пе");
        tokio::time::sleep(DEBOUNCE * 2).await;

        assert_eq!(picker.snapshot().rows, vec!["Пермь", "Санкт-Петербург"]);
        assert_eq!(picker.query(), "пе");
    }

    #[tokio::test(start_paused = true)]
    async fn query_before_load_applies_on_arrival() {
        let controller = ListController::new(
            Names(vec!["Москва", "Пермь"]),
            RetryPolicy::default(),
        );
        let picker = Picker::new(controller, DEBOUNCE);

        picker.apply_query("моск");
        assert_eq!(picker.state(), LoadingState::Idle);

        picker.load().wait().await;
        assert_eq!(picker.snapshot().rows, vec!["Москва"]);
    }

    struct Broken;

    impl ListSource for Broken {
        type Row = String;
        type Criteria = String;

        async fn fetch(&self) -> Result<Vec<String>, RaspError> {
            Err(RaspError::Api {
                status: 500,
                message: "boom".into(),
            })
        }

        fn matches(&self, row: &String, query: &String) -> bool {
            matches_query(row, query)
        }

        fn empty_message(&self, _query: &String) -> String {
            "Город не найден".into()
        }

        fn error_message(&self) -> String {
            "Ошибка загрузки".into()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn query_does_not_override_error() {
        let picker = Picker::new(
            ListController::new(Broken, RetryPolicy::default()),
            DEBOUNCE,
        );
        picker.load().wait().await;

        picker.apply_query("мо");
        picker.set_query("пе");
        tokio::time::sleep(DEBOUNCE * 2).await;

        assert_eq!(picker.state(), LoadingState::Error("Ошибка загрузки".into()));
        assert_eq!(picker.query(), "пе");
    }
}
