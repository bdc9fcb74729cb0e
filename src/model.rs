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

//! Shared domain types used across matching, ranking, and the search session.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::Date;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// A task as handed over by the caller. Field names are free-form; the
/// engine only looks at the ones it is told to search or filter on.
pub type Record = serde_json::Map<String, Value>;

const CALENDAR_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Returns the value of `field` when it is a string. Anything else counts as
/// absent so malformed records simply do not match through that field.
pub fn text_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

pub fn is_completed(record: &Record) -> bool {
    record
        .get("completed")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

pub fn due_date(record: &Record) -> Option<Date> {
    match record.get("dueDate")? {
        Value::String(s) => parse_calendar_date(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(timestamp_from_millis)
            .map(|ts| ts.date()),
        _ => None,
    }
}

pub fn created_at(record: &Record) -> Option<OffsetDateTime> {
    match record.get("createdAt")? {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(timestamp_from_millis),
        _ => None,
    }
}

/// Parses either a bare `YYYY-MM-DD` or a full RFC 3339 timestamp and keeps
/// only the calendar date.
pub fn parse_calendar_date(input: &str) -> Option<Date> {
    let input = input.trim();
    if let Ok(ts) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(ts.date());
    }
    let head = input.get(..10)?;
    Date::parse(head, CALENDAR_DATE).ok()
}

fn parse_timestamp(input: &str) -> Option<OffsetDateTime> {
    let input = input.trim();
    if let Ok(ts) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(ts);
    }
    parse_calendar_date(input).map(|date| date.midnight().assume_utc())
}

fn timestamp_from_millis(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

pub fn format_calendar_date(date: Date) -> String {
    date.format(CALENDAR_DATE)
        .unwrap_or_else(|_| date.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Pending,
}

impl Status {
    pub fn as_label(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Pending => "pending",
        }
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "done" => Ok(Status::Completed),
            "pending" | "active" | "open" => Ok(Status::Pending),
            other => anyhow::bail!("unknown status {other:?}; expected completed or pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => anyhow::bail!("unknown priority {other:?}; expected low, medium or high"),
        }
    }
}

/// Secondary filter applied after text search. All filters of a session are
/// combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Status(Status),
    Priority(Priority),
    DueDate(Date),
}

impl Filter {
    pub fn parse(kind: &str, value: &str) -> anyhow::Result<Self> {
        match kind.trim().to_lowercase().as_str() {
            "status" => Ok(Filter::Status(value.parse()?)),
            "priority" => Ok(Filter::Priority(value.parse()?)),
            "due" | "duedate" => {
                let date = parse_calendar_date(value)
                    .ok_or_else(|| anyhow::anyhow!("invalid due date {value:?}"))?;
                Ok(Filter::DueDate(date))
            }
            other => anyhow::bail!("unknown filter type {other:?}"),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Filter::Status(Status::Completed) => is_completed(record),
            Filter::Status(Status::Pending) => !is_completed(record),
            Filter::Priority(priority) => text_field(record, "priority")
                .is_some_and(|p| p.eq_ignore_ascii_case(priority.as_label())),
            Filter::DueDate(date) => due_date(record) == Some(*date),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Status(status) => write!(f, "status:{}", status.as_label()),
            Filter::Priority(priority) => write!(f, "priority:{}", priority.as_label()),
            Filter::DueDate(date) => write!(f, "dueDate:{}", format_calendar_date(*date)),
        }
    }
}

/// Secondary ordering applied after text search and filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortBy {
    #[default]
    Relevance,
    Name,
    Recent,
}

impl SortBy {
    pub fn as_label(self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Name => "name",
            SortBy::Recent => "recent",
        }
    }
}

impl From<&str> for SortBy {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "name" => SortBy::Name,
            "recent" => SortBy::Recent,
            _ => SortBy::Relevance,
        }
    }
}

impl From<String> for SortBy {
    fn from(value: String) -> Self {
        SortBy::from(value.as_str())
    }
}

/// One surviving record. The score lives next to the record instead of on
/// it, so caller-owned records are never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub record: &'a Record,
    pub score: Option<u32>,
    /// First field that satisfied each token, in token order.
    pub matched_fields: Vec<String>,
}

impl<'a> SearchHit<'a> {
    pub fn unranked(record: &'a Record) -> Self {
        Self {
            record,
            score: None,
            matched_fields: Vec::new(),
        }
    }

    /// Copy of the record with the transient `_searchScore` attached when the
    /// hit was ranked.
    pub fn to_json(&self) -> Value {
        let mut obj = self.record.clone();
        if let Some(score) = self.score {
            obj.insert("_searchScore".into(), Value::from(score));
        }
        Value::Object(obj)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStatistics {
    pub searched: bool,
    pub terms_count: usize,
    pub tokens_used: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    pub hits: Vec<SearchHit<'a>>,
    pub result_count: usize,
    pub search_time_ms: f64,
    pub statistics: SearchStatistics,
}

impl<'a> SearchResults<'a> {
    pub fn to_json_results(&self) -> Vec<Value> {
        self.hits.iter().map(SearchHit::to_json).collect()
    }
}
