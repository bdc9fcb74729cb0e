// Copyright 2026 Tasksift Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! One search session: the raw query, its debounced value, secondary
//! filters, sort key and history.
//!
//! Input changes move the session from `Idle` or `Settled` to `Debouncing`.
//! When the debounce timer fires the new term is picked up by
//! [`SearchSession::settled`] (or [`SearchSession::try_settle`]), recorded in
//! history, and the session is `Settled`. Evaluation itself is synchronous
//! and happens in [`SearchSession::results`].

use tokio::sync::watch;
use tracing::debug;
use tracing::trace;

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::debounce::Settled;
use crate::history::SearchHistory;
use crate::model::Filter;
use crate::model::Record;
use crate::model::SearchResults;
use crate::model::SortBy;
use crate::query::SearchOptions;
use crate::query::evaluate;
use crate::suggest::suggest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Debouncing,
    Settled,
}

pub struct SearchSession {
    opts: SearchOptions,
    max_suggestions: usize,
    query: String,
    term: String,
    filters: Vec<Filter>,
    history: SearchHistory,
    debouncer: Debouncer<String>,
    settled: watch::Receiver<Settled<String>>,
    last_seq: u64,
    state: SessionState,
}

impl SearchSession {
    pub fn new(config: &Config) -> Self {
        let (debouncer, settled) = Debouncer::new(config.debounce_delay(), String::new());
        Self {
            opts: config.search_options(),
            max_suggestions: config.max_suggestions,
            query: String::new(),
            term: String::new(),
            filters: Vec::new(),
            history: SearchHistory::new(config.history_limit),
            debouncer,
            settled,
            last_seq: 0,
            state: SessionState::Idle,
        }
    }

    /// Raw input change. Must be called from within a tokio runtime.
    pub fn set_query(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        // A value that fired but was never picked up is superseded now.
        self.settled.mark_unchanged();
        if self.debouncer.is_pending() {
            trace!(query = %self.query, "pending query superseded");
        }
        self.debouncer.schedule(raw.clone());
        self.query = raw;
        self.state = SessionState::Debouncing;
    }

    pub fn clear_query(&mut self) {
        self.debouncer.cancel();
        self.settled.mark_unchanged();
        self.query.clear();
        self.term.clear();
        self.state = SessionState::Idle;
    }

    /// Waits for the pending input to settle and returns the new term.
    /// Returns the current term right away when nothing is pending.
    pub async fn settled(&mut self) -> String {
        if self.state == SessionState::Debouncing && self.settled.changed().await.is_ok() {
            self.accept_settled();
        }
        self.term.clone()
    }

    /// Non-blocking variant of [`settled`](Self::settled). Returns whether a
    /// new term was picked up.
    pub fn try_settle(&mut self) -> bool {
        if self.state != SessionState::Debouncing {
            return false;
        }
        match self.settled.has_changed() {
            Ok(true) => {
                self.accept_settled();
                true
            }
            _ => false,
        }
    }

    fn accept_settled(&mut self) {
        let Settled { seq, value } = self.settled.borrow_and_update().clone();
        self.last_seq = seq;
        self.term = value;
        self.history.record(&self.term);
        self.state = SessionState::Settled;
        debug!(seq, term = %self.term, "query settled");
    }

    pub fn results<'a>(&self, records: &'a [Record]) -> SearchResults<'a> {
        evaluate(records, &self.term, &self.filters, &self.opts)
    }

    /// Suggestions follow the raw query, not the debounced one.
    pub fn suggestions(&self, records: &[Record]) -> Vec<String> {
        suggest(records, &self.query, &self.opts.fields, self.max_suggestions)
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    /// Out-of-range indices are ignored.
    pub fn remove_filter(&mut self, index: usize) -> Option<Filter> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn add_current_query_to_history(&mut self) -> bool {
        self.history.record(&self.query)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn set_sort_by(&mut self, sort_by: impl Into<SortBy>) {
        self.opts.sort_by = sort_by.into();
    }

    pub fn sort_by(&self) -> SortBy {
        self.opts.sort_by
    }

    pub fn options(&self) -> &SearchOptions {
        &self.opts
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of debounce timers that have fired so far.
    pub fn settle_count(&self) -> u64 {
        self.last_seq
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;
    use serde_json::json;
    use tokio::time::sleep;

    use super::*;
    use crate::model::Priority;
    use crate::model::Status;
    use crate::model::text_field;

    fn records(values: Value) -> Vec<Record> {
        serde_json::from_value(values).expect("records")
    }

    fn tasks() -> Vec<Record> {
        records(json!([
            {"title": "Fix bug", "priority": "high", "completed": false},
            {"title": "Buy milk", "priority": "low", "completed": true},
            {"title": "Bug bash", "priority": "low", "completed": false},
        ]))
    }

    fn titles<'a>(results: &SearchResults<'a>) -> Vec<&'a str> {
        results
            .hits
            .iter()
            .map(|hit| text_field(hit.record, "title").unwrap_or_default())
            .collect()
    }

    fn session() -> SearchSession {
        SearchSession::new(&Config::default())
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_settles_once_on_the_last_value() {
        let tasks = tasks();
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.results(&tasks).statistics.searched);

        for raw in ["b", "bu", "bug"] {
            session.set_query(raw);
            sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(session.state(), SessionState::Debouncing);
        assert_eq!(session.term(), "");

        assert_eq!(session.settled().await, "bug");
        assert_eq!(session.state(), SessionState::Settled);
        assert_eq!(session.settle_count(), 1);
        assert_eq!(session.history(), ["bug"]);

        let results = session.results(&tasks);
        assert_eq!(titles(&results), vec!["Bug bash", "Fix bug"]);
        assert!(results.statistics.searched);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_pause_restarts_the_timer() {
        let mut session = session();
        session.set_query("fi");
        sleep(Duration::from_millis(250)).await;
        session.set_query("fix");
        sleep(Duration::from_millis(250)).await;
        assert!(!session.try_settle());
        assert_eq!(session.state(), SessionState::Debouncing);

        sleep(Duration::from_millis(60)).await;
        assert!(session.try_settle());
        assert_eq!(session.term(), "fix");
        assert!(!session.try_settle());
    }

    #[tokio::test(start_paused = true)]
    async fn unread_settlement_is_superseded_by_new_input() {
        let mut session = session();
        session.set_query("milk");
        sleep(Duration::from_millis(400)).await;
        session.set_query("bug");
        assert!(!session.try_settle());
        assert_eq!(session.settled().await, "bug");
        assert_eq!(session.settle_count(), 2);
        assert_eq!(session.history(), ["bug"]);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_query_cancels_pending_timer() {
        let mut session = session();
        session.set_query("bug");
        session.clear_query();
        assert_eq!(session.state(), SessionState::Idle);
        sleep(Duration::from_secs(1)).await;
        assert!(!session.try_settle());
        assert_eq!(session.settled().await, "");
        assert!(session.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_releases_the_timer() {
        let mut session = session();
        session.set_query("bug");
        let rx = session.settled.clone();
        drop(session);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(rx.borrow().seq, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn filters_compose_and_are_removable() {
        let tasks = tasks();
        let mut session = session();
        session.add_filter(Filter::Status(Status::Pending));
        session.add_filter(Filter::Priority(Priority::Low));
        assert_eq!(titles(&session.results(&tasks)), vec!["Bug bash"]);

        assert_eq!(
            session.remove_filter(1),
            Some(Filter::Priority(Priority::Low))
        );
        assert_eq!(session.remove_filter(5), None);
        assert_eq!(
            titles(&session.results(&tasks)),
            vec!["Fix bug", "Bug bash"]
        );

        session.clear_filters();
        assert!(session.filters().is_empty());
        assert!(!session.results(&tasks).statistics.searched);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestions_track_the_raw_query() {
        let tasks = tasks();
        let mut session = session();
        session.set_query("bu");
        assert_eq!(
            session.suggestions(&tasks),
            vec!["Fix bug", "Buy milk", "Bug bash"]
        );
        assert_eq!(session.term(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn history_controls() {
        let mut session = session();
        session.set_query("milk");
        assert!(session.add_current_query_to_history());
        assert!(!session.add_current_query_to_history());
        session.settled().await;
        assert_eq!(session.history(), ["milk"]);

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sort_key_from_string() {
        let tasks = tasks();
        let mut session = session();
        session.set_sort_by("name");
        assert_eq!(session.sort_by(), SortBy::Name);
        session.set_query("b");
        session.settled().await;
        assert_eq!(
            titles(&session.results(&tasks)),
            vec!["Bug bash", "Buy milk", "Fix bug"]
        );

        session.set_sort_by("whatever");
        assert_eq!(session.sort_by(), SortBy::Relevance);
    }
}
