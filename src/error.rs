// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types for parsing, index storage, evaluation and record sources.
//!
//! The split matters to the orchestrator: syntax and index I/O failures are
//! degraded to an empty result list, everything else is a hard failure.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed query text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("query syntax error at position {position}: {message}")]
pub struct QuerySyntaxError {
    pub message: String,
    /// Byte offset into the query string.
    pub position: usize,
}

impl QuerySyntaxError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// The ephemeral index could not be created or written.
#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("cannot create index directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write index segment {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode index segment: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Reading or searching a built index failed.
#[derive(Debug, Error)]
pub enum IndexIoError {
    #[error("cannot read index segment {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index segment is corrupt: {reason}")]
    Corrupt { reason: String },

    #[error("cannot decode index segment: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("no stored document for ordinal {ordinal}")]
    UnknownDocument { ordinal: u32 },
}

/// The record source could not enumerate records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot read records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record file must contain a JSON array of objects")]
    NotAnArray,
}

/// Failed to load a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that can go wrong in a search call.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Syntax(#[from] QuerySyntaxError),

    #[error(transparent)]
    IndexBuild(#[from] IndexBuildError),

    #[error(transparent)]
    IndexIo(#[from] IndexIoError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SearchError {
    /// Whether this failure degrades to an empty result list instead of
    /// reaching the caller.
    pub fn is_degradable(&self) -> bool {
        matches!(self, SearchError::Syntax(_) | SearchError::IndexIo(_))
    }
}
