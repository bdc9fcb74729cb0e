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

use std::path::PathBuf;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(
    name = "tasksift",
    version,
    about = "Search, filter and rank task lists in memory"
)]
pub struct Cli {
    /// Config file (defaults to the global tasksift.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default config file
    Init {
        /// Where to write it (defaults to the global config path)
        path: Option<PathBuf>,
    },

    /// Search a task file
    Search(SearchArgs),

    /// Autocomplete suggestions for partial input
    Suggest(SuggestArgs),

    /// Debounced search session fed by stdin, one input change per line
    Session(SessionArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Query text
    pub query: String,

    /// Task file (JSON array or JSON Lines)
    #[arg(long)]
    pub tasks: PathBuf,

    /// Fields to search, in order (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// exact, substring, word, fuzzy or prefix
    #[arg(long)]
    pub match_type: Option<String>,

    /// Keep filter order instead of ranking by relevance
    #[arg(long)]
    pub no_rank: bool,

    /// Match case exactly
    #[arg(long)]
    pub case_sensitive: bool,

    /// relevance, name or recent
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Maximum number of results
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Only completed or pending tasks
    #[arg(long)]
    pub status: Option<String>,

    /// Only tasks with this priority
    #[arg(long)]
    pub priority: Option<String>,

    /// Only tasks due on this date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial input
    pub input: String,

    /// Task file (JSON array or JSON Lines)
    #[arg(long)]
    pub tasks: PathBuf,

    /// Fields to read suggestions from (repeatable)
    #[arg(long = "field")]
    pub fields: Vec<String>,

    /// Maximum number of suggestions
    #[arg(long)]
    pub max: Option<usize>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Task file (JSON array or JSON Lines)
    #[arg(long)]
    pub tasks: PathBuf,

    /// Debounce delay in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Output JSON Lines
    #[arg(long)]
    pub json: bool,
}
