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

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::model::Record;

/// Reads tasks from a JSON array of objects or from JSON Lines.
pub fn load_tasks(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let tasks = read_tasks(file).with_context(|| format!("load tasks from {}", path.display()))?;
    debug!(count = tasks.len(), path = %path.display(), "tasks loaded");
    Ok(tasks)
}

pub fn read_tasks(reader: impl Read) -> Result<Vec<Record>> {
    let mut reader = BufReader::new(reader);
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed).context("parse task array")?;
        return values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| into_record(value).with_context(|| format!("task #{idx}")))
            .collect();
    }

    let mut tasks = Vec::new();
    for (idx, line) in text.as_bytes().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value =
            serde_json::from_str(&line).with_context(|| format!("parse line {}", idx + 1))?;
        tasks.push(into_record(value).with_context(|| format!("line {}", idx + 1))?);
    }
    Ok(tasks)
}

fn into_record(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("expected a task object, found {}", kind(&other)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
