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

use regex::Regex;

use crate::matcher::whole_word_regex;
use crate::model::Record;
use crate::model::text_field;

pub const EXACT_SCORE: u32 = 100;
pub const PREFIX_SCORE: u32 = 75;
pub const CONTAINS_SCORE: u32 = 50;
pub const WORD_SCORE: u32 = 25;

/// Relevance of a record against the whole, untokenized query.
///
/// Each field earns at most one tier: equal, starts-with, the query as a
/// whole word, then plain containment. Tiers add up across fields.
///
/// A whole-word hit (25) ranks below a plain substring hit (50):
/// `"my task today"` scores 25 for `task` while `"multitasking"` scores 50.
/// Checking containment first would make the word tier unreachable.
#[derive(Debug, Clone)]
pub struct Scorer {
    query: String,
    word: Option<Regex>,
}

impl Scorer {
    pub fn new(raw_query: &str) -> Self {
        let query = raw_query.to_lowercase();
        let word = if query.is_empty() {
            None
        } else {
            whole_word_regex(&query, true)
        };
        Self { query, word }
    }

    pub fn score(&self, record: &Record, fields: &[String]) -> u32 {
        if self.query.is_empty() {
            return 0;
        }
        fields
            .iter()
            .filter_map(|field| text_field(record, field))
            .map(|value| self.field_score(value))
            .sum()
    }

    pub fn field_score(&self, value: &str) -> u32 {
        if self.query.is_empty() {
            return 0;
        }
        let value = value.to_lowercase();
        if value == self.query {
            EXACT_SCORE
        } else if value.starts_with(self.query.as_str()) {
            PREFIX_SCORE
        } else if self.word.as_ref().is_some_and(|re| re.is_match(&value)) {
            WORD_SCORE
        } else if value.contains(self.query.as_str()) {
            CONTAINS_SCORE
        } else {
            0
        }
    }
}
