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

mod cli;
mod config;
mod debounce;
mod history;
mod matcher;
mod model;
mod output;
mod query;
mod score;
mod session;
mod suggest;
mod tasks;
mod tokenize;

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tracing::debug;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::SearchArgs;
use crate::cli::SessionArgs;
use crate::cli::SuggestArgs;
use crate::config::Config;
use crate::matcher::MatchType;
use crate::model::Filter;
use crate::model::Record;
use crate::model::SortBy;
use crate::output::JsonResponse;
use crate::output::print_json;
use crate::output::print_json_line;
use crate::output::print_table;
use crate::session::SearchSession;
use crate::session::SessionState;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("TASKSIFT_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Commands::Init { path } => cmd_init(path.or(config_path)),
        Commands::Search(args) => {
            let json = args.json;
            handle_result(cmd_search(config_path.as_deref(), args), json)
        }
        Commands::Suggest(args) => {
            let json = args.json;
            handle_result(cmd_suggest(config_path.as_deref(), args), json)
        }
        Commands::Session(args) => {
            let json = args.json;
            handle_result(cmd_session(config_path.as_deref(), args), json)
        }
    }
}

fn handle_result(result: Result<()>, json: bool) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            if json {
                let resp = JsonResponse::error("error", &format!("{err:#}"));
                print_json(&resp)?;
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

fn cmd_init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => config::global_config_path()
            .ok_or_else(|| anyhow::anyhow!("no config directory; pass a path"))?,
    };
    if path.exists() {
        anyhow::bail!("config already exists at {}", path.display());
    }
    config::write_config(&path, &Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

/// Emits a warning when `raw` was not a recognised name and a fallback was
/// used instead.
fn fallback_warning(what: &str, raw: &str, used: &str) -> Option<String> {
    (raw.trim().to_lowercase() != used).then(|| format!("unknown {what} {raw:?}; using {used}"))
}

fn cmd_search(config_path: Option<&Path>, args: SearchArgs) -> Result<()> {
    let config = config::load(config_path)?;
    let mut opts = config.search_options();
    let mut warnings = Vec::new();

    if !args.fields.is_empty() {
        opts.fields = args.fields;
    }
    if let Some(raw) = &args.match_type {
        opts.match_type = MatchType::from(raw.as_str());
        warnings.extend(fallback_warning("match type", raw, opts.match_type.as_label()));
    }
    if let Some(raw) = &args.sort_by {
        opts.sort_by = SortBy::from(raw.as_str());
        warnings.extend(fallback_warning("sort key", raw, opts.sort_by.as_label()));
    }
    if args.no_rank {
        opts.rank_results = false;
    }
    if args.case_sensitive {
        opts.case_insensitive = false;
    }
    if args.max_results.is_some() {
        opts.max_results = args.max_results;
    }

    let mut filters = Vec::new();
    if let Some(value) = &args.status {
        filters.push(Filter::parse("status", value)?);
    }
    if let Some(value) = &args.priority {
        filters.push(Filter::parse("priority", value)?);
    }
    if let Some(value) = &args.due {
        filters.push(Filter::parse("due", value)?);
    }

    let tasks = tasks::load_tasks(&args.tasks)?;
    let results = query::evaluate(&tasks, &args.query, &filters, &opts);

    if args.json {
        let resp = JsonResponse::ok()
            .with_query(&args.query, &opts, &filters)
            .with_search(&results)
            .with_warnings(warnings);
        print_json(&resp)?;
    } else {
        for warning in warnings {
            eprintln!("warning: {warning}");
        }
        print_table(&results, &opts.fields);
    }
    Ok(())
}

fn cmd_suggest(config_path: Option<&Path>, args: SuggestArgs) -> Result<()> {
    let config = config::load(config_path)?;
    let fields = if args.fields.is_empty() {
        config.search_fields.clone()
    } else {
        args.fields
    };
    let max = args.max.unwrap_or(config.max_suggestions);

    let tasks = tasks::load_tasks(&args.tasks)?;
    let suggestions = suggest::suggest(&tasks, &args.input, &fields, max);

    if args.json {
        print_json(&JsonResponse::ok().with_suggestions(suggestions))?;
    } else {
        for suggestion in suggestions {
            println!("{suggestion}");
        }
    }
    Ok(())
}

fn cmd_session(config_path: Option<&Path>, args: SessionArgs) -> Result<()> {
    let mut config = config::load(config_path)?;
    if let Some(ms) = args.debounce_ms {
        config.debounce_delay_ms = ms;
    }
    let tasks = tasks::load_tasks(&args.tasks)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?;
    runtime.block_on(run_session(&config, &tasks, args.json))
}

async fn run_session(config: &Config, tasks: &[Record], json: bool) -> Result<()> {
    let mut session = SearchSession::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            biased;
            _ = session.settled(), if session.state() == SessionState::Debouncing => {
                emit_results(&session, tasks, json)?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                handle_input(&mut session, tasks, &line, json).await?;
            }
        }
    }

    // Input ended mid-burst: let the last change settle before exiting.
    if session.state() == SessionState::Debouncing {
        session.settled().await;
        emit_results(&session, tasks, json)?;
    }
    Ok(())
}

async fn handle_input(
    session: &mut SearchSession,
    tasks: &[Record],
    line: &str,
    json: bool,
) -> Result<()> {
    let Some(command) = line.strip_prefix(':') else {
        session.set_query(line);
        let suggestions = session.suggestions(tasks);
        if !suggestions.is_empty() {
            emit_suggestions(suggestions, json)?;
        }
        return Ok(());
    };

    if let Err(err) = run_control(session, tasks, command.trim(), json).await {
        warn!(command, error = %err, "session command failed");
        if json {
            let resp = JsonResponse::error("bad_command", &format!("{err:#}")).with_event("error");
            print_json_line(&resp)?;
        } else {
            eprintln!("error: {err:#}");
        }
    }
    Ok(())
}

async fn run_control(
    session: &mut SearchSession,
    tasks: &[Record],
    command: &str,
    json: bool,
) -> Result<()> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    match name {
        "filter" => {
            let [kind, value] = rest.as_slice() else {
                anyhow::bail!("usage: :filter <status|priority|due> <value>");
            };
            session.add_filter(Filter::parse(kind, value)?);
        }
        "unfilter" => {
            let index: usize = rest
                .first()
                .context("usage: :unfilter <index>")?
                .parse()
                .context("filter index")?;
            if session.remove_filter(index).is_none() {
                anyhow::bail!("no filter at index {index}");
            }
        }
        "clear-filters" => session.clear_filters(),
        "clear" => session.clear_query(),
        "sort" => {
            let key = rest.first().copied().unwrap_or_default();
            session.set_sort_by(key);
            let used = session.sort_by().as_label();
            if let Some(warning) = fallback_warning("sort key", key, used) {
                warn!("{warning}");
            }
        }
        "save" => {
            if !session.add_current_query_to_history() {
                debug!(query = session.query(), "not added to history");
            }
        }
        "clear-history" => session.clear_history(),
        "history" => {
            return emit_history(session, json);
        }
        "wait" => {
            let ms: u64 = rest
                .first()
                .context("usage: :wait <ms>")?
                .parse()
                .context("wait duration")?;
            tokio::time::sleep(Duration::from_millis(ms)).await;
            if session.try_settle() {
                emit_results(session, tasks, json)?;
            }
            return Ok(());
        }
        other => anyhow::bail!("unknown command :{other}"),
    }

    if session.state() != SessionState::Debouncing {
        emit_results(session, tasks, json)?;
    }
    Ok(())
}

fn emit_results(session: &SearchSession, tasks: &[Record], json: bool) -> Result<()> {
    let results = session.results(tasks);
    debug!(settled = session.settle_count(), hits = results.result_count, "emitting results");
    if json {
        let resp = JsonResponse::ok()
            .with_event("results")
            .with_query(session.term(), session.options(), session.filters())
            .with_search(&results);
        print_json_line(&resp)?;
    } else {
        println!("> {}", session.term());
        print_table(&results, &session.options().fields);
    }
    Ok(())
}

fn emit_suggestions(suggestions: Vec<String>, json: bool) -> Result<()> {
    if json {
        print_json_line(&JsonResponse::ok().with_event("suggest").with_suggestions(suggestions))?;
    } else {
        println!("? {}", suggestions.join(" | "));
    }
    Ok(())
}

fn emit_history(session: &SearchSession, json: bool) -> Result<()> {
    if json {
        print_json_line(
            &JsonResponse::ok()
                .with_event("history")
                .with_history(session.history().to_vec()),
        )?;
    } else {
        for entry in session.history() {
            println!("# {entry}");
        }
    }
    Ok(())
}
