// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the regsearch command-line interface.
//!
//! Two subcommands: `search` runs a query over a JSON file of registrations
//! as a given user, and `fields` shows how a query parses and which record
//! fields it would index.

pub mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "regsearch",
    about = "Query-scoped search over service registrations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a JSON array of registrations and print matches as JSON
    Search {
        /// File holding a JSON array of registration objects
        #[arg(short, long)]
        records: PathBuf,

        /// User the search runs as (also names the index directory)
        #[arg(short, long, default_value = "anonymous")]
        user: String,

        /// Regex over `serviceId` the user may see (repeatable)
        ///
        /// With no patterns the user sees every record.
        #[arg(short, long = "allow")]
        allow: Vec<String>,

        /// JSON config file (`indexRoot`, `maxResults`)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding per-user index directories
        #[arg(long, env = "REGSEARCH_INDEX_ROOT")]
        index_root: Option<PathBuf>,

        /// Maximum number of results to return (capped at 5000)
        #[arg(long)]
        max_results: Option<usize>,

        /// Query string, e.g. `name:/CAS.*/ AND NOT enabled:false`
        query: String,
    },

    /// Show the parsed clause tree and the fields a query needs
    Fields {
        /// Query string
        query: String,
    },
}
