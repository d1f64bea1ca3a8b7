// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search engine settings.

use crate::error::ConfigError;
use crate::MAX_RESULTS;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where indexes live and how many results a search may return.
///
/// Any key missing from a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchConfig {
    /// Parent of the per-caller index directories.
    pub index_root: PathBuf,
    /// Result limit per search. Values above [`MAX_RESULTS`] are capped.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_root: std::env::temp_dir().join("regsearch"),
            max_results: MAX_RESULTS,
        }
    }
}

impl SearchConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_index_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.index_root = root.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}
