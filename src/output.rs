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

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::model::Filter;
use crate::model::SearchResults;
use crate::model::text_field;
use crate::query::SearchOptions;

#[derive(Debug, Clone, Serialize, Default)]
pub struct StatsOut {
    pub took_ms: f64,
    pub total_hits: usize,
    pub searched: bool,
    pub terms_count: usize,
    pub tokens_used: Vec<String>,
}

impl StatsOut {
    pub fn from_results(results: &SearchResults<'_>) -> Self {
        Self {
            took_ms: results.search_time_ms,
            total_hits: results.result_count,
            searched: results.statistics.searched,
            terms_count: results.statistics.terms_count,
            tokens_used: results.statistics.tokens_used.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryOut {
    pub text: String,
    pub match_type: String,
    pub sort_by: String,
    pub filters: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOut {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct JsonResponse {
    pub ok: bool,
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsOut>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOut>,
}

impl JsonResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            schema_version: "1".to_string(),
            ..Default::default()
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            ok: false,
            schema_version: "1".to_string(),
            error: Some(ErrorOut {
                code: code.to_string(),
                message: message.to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: &str) -> Self {
        self.event = Some(event.to_string());
        self
    }

    pub fn with_query(mut self, text: &str, opts: &SearchOptions, filters: &[Filter]) -> Self {
        let filters = (!filters.is_empty()).then(|| {
            filters
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" AND ")
        });
        self.query = Some(QueryOut {
            text: text.to_string(),
            match_type: opts.match_type.as_label().to_string(),
            sort_by: opts.sort_by.as_label().to_string(),
            filters,
            limit: opts.max_results,
        });
        self
    }

    pub fn with_search(mut self, results: &SearchResults<'_>) -> Self {
        self.results = Some(results.to_json_results());
        self.stats = Some(StatsOut::from_results(results));
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub fn print_json(resp: &JsonResponse) -> Result<()> {
    let text = serde_json::to_string_pretty(resp)?;
    println!("{text}");
    Ok(())
}

/// Single-line form, one response per line, for streamed session output.
pub fn print_json_line(resp: &JsonResponse) -> Result<()> {
    let text = serde_json::to_string(resp)?;
    println!("{text}");
    Ok(())
}

pub fn print_table(results: &SearchResults<'_>, fields: &[String]) {
    for hit in &results.hits {
        let label = fields
            .iter()
            .find_map(|f| text_field(hit.record, f))
            .unwrap_or("<untitled>");
        match hit.score {
            Some(score) => {
                println!("{score}\t{label}\t{}", hit.matched_fields.join(","));
            }
            None => println!("{label}"),
        }
    }
    if results.statistics.searched {
        println!(
            "-- {} result(s) in {:.3} ms",
            results.result_count, results.search_time_ms
        );
    }
}
