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

//! Per-field matching strategies and the first-match search across a
//! record's searchable fields.

use std::borrow::Cow;

use regex::Regex;
use regex::RegexBuilder;
use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;
use crate::model::text_field;

/// Fuzzy scores must be strictly above this to count as a match.
pub const FUZZY_THRESHOLD: f64 = 0.5;

const FUZZY_EXACT: f64 = 1.0;
const FUZZY_CONTAINS: f64 = 0.9;
const FUZZY_WORD: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MatchType {
    Exact,
    #[default]
    Substring,
    Word,
    Fuzzy,
    Prefix,
}

impl MatchType {
    pub fn as_label(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Substring => "substring",
            MatchType::Word => "word",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Prefix => "prefix",
        }
    }
}

/// Unrecognised names select substring matching instead of failing.
impl From<&str> for MatchType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "exact" => MatchType::Exact,
            "word" => MatchType::Word,
            "fuzzy" => MatchType::Fuzzy,
            "prefix" => MatchType::Prefix,
            _ => MatchType::Substring,
        }
    }
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        MatchType::from(value.as_str())
    }
}

/// A single term prepared for repeated matching under one strategy.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    term: String,
    match_type: MatchType,
    case_insensitive: bool,
    word: Option<Regex>,
}

impl FieldMatcher {
    pub fn new(term: &str, match_type: MatchType, case_insensitive: bool) -> Self {
        let word = if term.is_empty() {
            None
        } else {
            whole_word_regex(term, case_insensitive)
        };
        let term = if case_insensitive {
            term.to_lowercase()
        } else {
            term.to_string()
        };
        Self {
            term,
            match_type,
            case_insensitive,
            word,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn matches(&self, text: &str) -> bool {
        match self.match_type {
            MatchType::Exact => self.normalize(text) == self.term,
            MatchType::Substring => self.normalize(text).contains(self.term.as_str()),
            MatchType::Prefix => self.normalize(text).starts_with(self.term.as_str()),
            MatchType::Word => self.is_whole_word(text),
            MatchType::Fuzzy => self.fuzzy_score(text) > FUZZY_THRESHOLD,
        }
    }

    /// Scores `text` in `[0, 1]`. Exact, containment and whole-word hits get
    /// fixed scores; otherwise the term must appear as an in-order
    /// subsequence and the score is its share of the text length.
    pub fn fuzzy_score(&self, text: &str) -> f64 {
        let text = self.normalize(text);
        if *text == self.term {
            return FUZZY_EXACT;
        }
        if text.contains(self.term.as_str()) {
            return FUZZY_CONTAINS;
        }
        if self.is_whole_word(&text) {
            return FUZZY_WORD;
        }

        let mut rest = text.chars();
        let mut matched = 0usize;
        for wanted in self.term.chars() {
            if !rest.by_ref().any(|c| c == wanted) {
                return 0.0;
            }
            matched += 1;
        }
        let len = text.chars().count();
        if len == 0 {
            return 0.0;
        }
        matched as f64 / len as f64
    }

    fn is_whole_word(&self, text: &str) -> bool {
        self.word.as_ref().is_some_and(|re| re.is_match(text))
    }

    fn normalize<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if self.case_insensitive {
            Cow::Owned(text.to_lowercase())
        } else {
            Cow::Borrowed(text)
        }
    }
}

pub(crate) fn whole_word_regex(term: &str, case_insensitive: bool) -> Option<Regex> {
    let pattern = format!(r"\b{}\b", regex::escape(term));
    RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .build()
        .ok()
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch<'f> {
    pub field: &'f str,
    /// Set only for fuzzy matching.
    pub score: Option<f64>,
}

/// Returns the first of `fields` (in the given order) that satisfies the
/// matcher. Missing, empty, and non-string field values are skipped.
pub fn match_record<'f>(
    record: &Record,
    matcher: &FieldMatcher,
    fields: &'f [String],
) -> Option<FieldMatch<'f>> {
    if matcher.is_empty() || fields.is_empty() {
        return None;
    }
    for field in fields {
        let Some(text) = text_field(record, field) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if matcher.match_type() == MatchType::Fuzzy {
            let score = matcher.fuzzy_score(text);
            if score > FUZZY_THRESHOLD {
                return Some(FieldMatch {
                    field,
                    score: Some(score),
                });
            }
        } else if matcher.matches(text) {
            return Some(FieldMatch { field, score: None });
        }
    }
    None
}
