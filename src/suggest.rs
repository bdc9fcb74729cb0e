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

use crate::model::Record;
use crate::model::text_field;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Autocomplete candidates: distinct field values containing `raw`
/// (case-insensitive), in first-seen order, walking fields first and records
/// second. Reads the raw input directly; nothing here is debounced or scored.
pub fn suggest(records: &[Record], raw: &str, fields: &[String], max: usize) -> Vec<String> {
    if raw.trim().chars().count() < MIN_SUGGEST_CHARS || max == 0 {
        return Vec::new();
    }
    let needle = raw.to_lowercase();
    let mut out: Vec<String> = Vec::new();

    for field in fields {
        for record in records {
            let Some(value) = text_field(record, field) else {
                continue;
            };
            if !value.to_lowercase().contains(&needle) || out.iter().any(|s| s == value) {
                continue;
            }
            out.push(value.to_string());
            if out.len() >= max {
                return out;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use serde_json::json;

    use super::*;

    fn records(values: Value) -> Vec<Record> {
        serde_json::from_value(values).expect("records")
    }

    fn fields() -> Vec<String> {
        vec!["title".to_string(), "description".to_string()]
    }

    #[test]
    fn needs_two_characters() {
        let tasks = records(json!([{"title": "a task"}]));
        assert!(suggest(&tasks, "a", &fields(), 5).is_empty());
        assert!(suggest(&tasks, "A ", &fields(), 5).is_empty());
    }

    #[test]
    fn length_check_ignores_surrounding_spaces() {
        let tasks = records(json!([{"title": "b c"}, {"title": "a task"}]));
        let title = vec!["title".to_string()];
        assert!(suggest(&tasks, "b ", &title, 5).is_empty());
        assert!(suggest(&tasks, "  t  ", &title, 5).is_empty());
        // Two real characters pass; the untrimmed input is what gets matched.
        assert_eq!(suggest(&tasks, " ta", &title, 5), vec!["a task"]);
        assert!(suggest(&tasks, " ta ", &title, 5).is_empty());
    }

    #[test]
    fn fields_before_records_and_unique() {
        let tasks = records(json!([
            {"title": "Pay rent", "description": "rent for march"},
            {"title": "Pay rent", "description": "parent meeting"},
            {"title": "Rental car", "description": 7},
        ]));
        assert_eq!(
            suggest(&tasks, "rent", &fields(), 5),
            vec!["Pay rent", "Rental car", "rent for march", "parent meeting"]
        );
    }

    #[test]
    fn stops_at_max() {
        let tasks = records(json!([
            {"title": "alpha one"},
            {"title": "alpha two"},
            {"title": "alpha three"},
        ]));
        assert_eq!(
            suggest(&tasks, "alpha", &fields(), 2),
            vec!["alpha one", "alpha two"]
        );
        assert!(suggest(&tasks, "alpha", &fields(), 0).is_empty());
    }
}
