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

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Most-recent-first list of queries.
///
/// A query already present is left where it is. The presence check runs
/// against the list before it is trimmed, so an entry evicted from the tail
/// can come back later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
    limit: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Returns whether the query was added.
    pub fn record(&mut self, query: &str) -> bool {
        if query.trim().is_empty() || self.entries.iter().any(|e| e == query) {
            return false;
        }
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_without_duplicates() {
        let mut history = SearchHistory::default();
        assert!(history.record("milk"));
        assert!(history.record("bug"));
        assert!(!history.record("milk"));
        assert!(!history.record("   "));
        assert_eq!(history.entries(), ["bug", "milk"]);
    }

    #[test]
    fn trims_to_limit() {
        let mut history = SearchHistory::new(3);
        for q in ["a", "b", "c", "d"] {
            history.record(q);
        }
        assert_eq!(history.entries(), ["d", "c", "b"]);

        // "a" fell off the tail, so it is accepted again.
        assert!(history.record("a"));
        assert_eq!(history.entries(), ["a", "d", "c"]);
    }

    #[test]
    fn clear_empties() {
        let mut history = SearchHistory::default();
        history.record("x");
        history.clear();
        assert!(history.entries().is_empty());
    }
}
