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

/// Splits a raw query into search tokens.
///
/// A double quote toggles phrase mode and is dropped; inside a phrase spaces
/// are literal. Quotes are toggled rather than paired, so an unmatched quote
/// turns the rest of the input into one phrase. Empty tokens never appear.
pub fn parse_query(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;

    for ch in query.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' if !in_quotes => flush(&mut buf, &mut tokens),
            _ => buf.push(ch),
        }
    }
    flush(&mut buf, &mut tokens);

    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<String>) {
    if !buf.is_empty() {
        tokens.push(std::mem::take(buf));
    }
}
