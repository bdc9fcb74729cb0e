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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::matcher::MatchType;
use crate::model::SortBy;
use crate::query::SearchOptions;
use crate::suggest::DEFAULT_MAX_SUGGESTIONS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search_fields: Vec<String>,
    pub match_type: MatchType,
    pub case_insensitive: bool,
    pub rank_results: bool,
    pub max_results: Option<usize>,
    pub sort_by: SortBy,
    pub debounce_delay_ms: u64,
    pub max_suggestions: usize,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let opts = SearchOptions::default();
        Self {
            search_fields: opts.fields,
            match_type: opts.match_type,
            case_insensitive: opts.case_insensitive,
            rank_results: opts.rank_results,
            max_results: opts.max_results,
            sort_by: opts.sort_by,
            debounce_delay_ms: 300,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            fields: self.search_fields.clone(),
            match_type: self.match_type,
            case_insensitive: self.case_insensitive,
            rank_results: self.rank_results,
            sort_by: self.sort_by,
            max_results: self.max_results,
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    fn sanitize(mut self) -> Self {
        self.search_fields.retain(|f| !f.trim().is_empty());
        if self.history_limit == 0 {
            self.history_limit = DEFAULT_HISTORY_LIMIT;
        }
        self
    }
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata));
        }
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return Some(PathBuf::from(profile).join("AppData").join("Roaming"));
        }
        return None;
    }

    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").ok()?;
        return Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support"),
        );
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config"))
}

pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("tasksift").join("tasksift.toml"))
}

/// Loads `explicit` when given (it must exist), otherwise the global config,
/// falling back to defaults when there is none.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let Some(path) = global_config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    read_config(&path)
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: Config = toml::from_str(&text).context("parse tasksift.toml")?;
    Ok(config.sanitize())
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("serialize config")?;
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
