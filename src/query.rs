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

use std::cmp::Ordering;
use std::time::Instant;

use tracing::debug;
use tracing::trace;

use crate::matcher::FieldMatcher;
use crate::matcher::MatchType;
use crate::matcher::match_record;
use crate::model::Filter;
use crate::model::Record;
use crate::model::SearchHit;
use crate::model::SearchResults;
use crate::model::SearchStatistics;
use crate::model::SortBy;
use crate::model::created_at;
use crate::model::text_field;
use crate::score::Scorer;
use crate::tokenize::parse_query;

const TITLE_FIELD: &str = "title";

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub fields: Vec<String>,
    pub match_type: MatchType,
    pub case_insensitive: bool,
    pub rank_results: bool,
    pub sort_by: SortBy,
    pub max_results: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: vec![TITLE_FIELD.to_string(), "description".to_string()],
            match_type: MatchType::default(),
            case_insensitive: true,
            rank_results: true,
            sort_by: SortBy::default(),
            max_results: None,
        }
    }
}

/// Runs one search over caller-owned records.
///
/// An empty term with no filters returns every record untouched and marks the
/// result as not searched. Otherwise: every token must match some field, hits
/// are optionally ranked against the whole term, secondary filters and the
/// sort key apply, and the list is capped last.
pub fn evaluate<'a>(
    records: &'a [Record],
    term: &str,
    filters: &[Filter],
    opts: &SearchOptions,
) -> SearchResults<'a> {
    if term.is_empty() && filters.is_empty() {
        return SearchResults {
            hits: records.iter().map(SearchHit::unranked).collect(),
            result_count: records.len(),
            search_time_ms: 0.0,
            statistics: SearchStatistics::default(),
        };
    }

    let started = Instant::now();
    let tokens = parse_query(term);

    let mut hits: Vec<SearchHit<'a>> = if !term.is_empty() && !opts.fields.is_empty() {
        let matchers: Vec<FieldMatcher> = tokens
            .iter()
            .map(|token| FieldMatcher::new(token, opts.match_type, opts.case_insensitive))
            .collect();
        records
            .iter()
            .filter_map(|record| match_all_tokens(record, &matchers, &opts.fields))
            .collect()
    } else {
        records.iter().map(SearchHit::unranked).collect()
    };
    let matched = hits.len();

    if opts.rank_results && !term.is_empty() {
        let scorer = Scorer::new(term);
        for hit in &mut hits {
            hit.score = Some(scorer.score(hit.record, &opts.fields));
        }
        // Stable: equal scores keep filter order.
        hits.sort_by(|a, b| b.score.cmp(&a.score));
    }

    if !filters.is_empty() {
        hits.retain(|hit| filters.iter().all(|f| f.matches(hit.record)));
    }

    apply_ordering(&mut hits, opts);

    if let Some(max) = opts.max_results {
        hits.truncate(max);
    }

    let search_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(
        tokens = tokens.len(),
        matched,
        returned = hits.len(),
        filters = filters.len(),
        match_type = opts.match_type.as_label(),
        search_time_ms,
        "search evaluated"
    );

    SearchResults {
        result_count: hits.len(),
        hits,
        search_time_ms,
        statistics: SearchStatistics {
            searched: true,
            terms_count: tokens.len(),
            tokens_used: tokens,
        },
    }
}

fn match_all_tokens<'a>(
    record: &'a Record,
    matchers: &[FieldMatcher],
    fields: &[String],
) -> Option<SearchHit<'a>> {
    let mut matched_fields = Vec::with_capacity(matchers.len());
    for matcher in matchers {
        let found = match_record(record, matcher, fields)?;
        trace!(field = found.field, fuzzy = ?found.score, "token matched");
        matched_fields.push(found.field.to_string());
    }
    Some(SearchHit {
        record,
        score: None,
        matched_fields,
    })
}

fn apply_ordering(hits: &mut [SearchHit<'_>], opts: &SearchOptions) {
    match opts.sort_by {
        SortBy::Relevance => {}
        SortBy::Name => {
            if opts.fields.iter().any(|f| f == TITLE_FIELD) {
                hits.sort_by(|a, b| title_cmp(a.record, b.record));
            }
        }
        SortBy::Recent => {
            // Records without a readable createdAt go last.
            hits.sort_by(|a, b| created_at(b.record).cmp(&created_at(a.record)));
        }
    }
}

fn title_cmp(a: &Record, b: &Record) -> Ordering {
    let ta = text_field(a, TITLE_FIELD).unwrap_or_default();
    let tb = text_field(b, TITLE_FIELD).unwrap_or_default();
    ta.to_lowercase()
        .cmp(&tb.to_lowercase())
        .then_with(|| ta.cmp(tb))
}
