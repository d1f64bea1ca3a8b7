// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use regsearch::{
    discover_fields, parse, JsonFileSource, SearchConfig, SearchService, UserProfile,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::display::{render_clause_tree, render_fields, use_color};
use cli::{Cli, Commands};

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Search {
            records,
            user,
            allow,
            config,
            index_root,
            max_results,
            query,
        } => run_search(SearchArgs {
            records,
            user,
            allow,
            config,
            index_root,
            max_results,
            query,
        }),
        Commands::Fields { query } => run_fields(&query),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean JSON.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("regsearch=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

struct SearchArgs {
    records: PathBuf,
    user: String,
    allow: Vec<String>,
    config: Option<PathBuf>,
    index_root: Option<PathBuf>,
    max_results: Option<usize>,
    query: String,
}

fn run_search(args: SearchArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(root) = args.index_root {
        config = config.with_index_root(root);
    }
    if let Some(max) = args.max_results {
        config = config.with_max_results(max);
    }

    let source = JsonFileSource::open(&args.records)
        .with_context(|| format!("loading records from {}", args.records.display()))?;
    let caller = UserProfile::with_patterns(args.user.as_str(), &args.allow)
        .context("invalid --allow pattern")?;

    let service = SearchService::new(source, config);
    let items = service.search(&caller, &args.query)?;

    let json = serde_json::to_string_pretty(&items).context("encoding results")?;
    println!("{json}");
    Ok(())
}

fn run_fields(query: &str) -> Result<()> {
    let clause = parse(query).with_context(|| format!("cannot parse {query:?}"))?;
    let fields = discover_fields(&clause);
    let color = use_color();

    println!("{}", render_clause_tree(&clause, color));
    println!("Fields ({}):", fields.len());
    print!("{}", render_fields(&fields, color));
    Ok(())
}
