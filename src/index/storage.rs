// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Call-scoped on-disk storage for one ephemeral index.
//!
//! # Layout
//!
//! ```text
//! {index_root}/
//! └── {sanitized caller}/
//!     └── search-XXXXXX/          one per call, removed on release or drop
//!         └── segment.json
//! ```
//!
//! # Segment format
//!
//! ```text
//! ┌──────────────────────────┬───────────────┬────────┐
//! │ JSON-encoded index body  │ CRC32 (u32 LE)│ "RSEG" │
//! └──────────────────────────┴───────────────┴────────┘
//! ```
//!
//! The checksum covers the body only. Writes go to a temporary name and are
//! renamed into place, so a reader never sees a half-written segment.

use crate::error::{IndexBuildError, IndexIoError};
use crate::query::Clause;
use crate::search::evaluate;
use crate::types::{EphemeralIndex, IndexHit};
use crate::utils::sanitize_component;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// File name of the segment inside a call directory.
pub const SEGMENT_FILE: &str = "segment.json";

/// Trailing magic bytes of every segment.
pub const SEGMENT_MAGIC: [u8; 4] = *b"RSEG";

/// Footer size: checksum + magic.
const FOOTER_LEN: usize = 8;

/// Prefix of call directory names.
const CALL_DIR_PREFIX: &str = "search-";

/// A call directory that is deleted when released or dropped.
#[derive(Debug)]
pub struct IndexStorage {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl IndexStorage {
    /// Create `{root}/{caller}/search-*` for this call.
    pub fn acquire(root: &Path, caller: &str) -> Result<Self, IndexBuildError> {
        let scope = root.join(sanitize_component(caller));
        fs::create_dir_all(&scope).map_err(|source| IndexBuildError::CreateDir {
            path: scope.clone(),
            source,
        })?;

        let dir = tempfile::Builder::new()
            .prefix(CALL_DIR_PREFIX)
            .tempdir_in(&scope)
            .map_err(|source| IndexBuildError::CreateDir {
                path: scope.clone(),
                source,
            })?;

        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "acquired index directory");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    /// The call directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn segment_path(&self) -> PathBuf {
        self.path.join(SEGMENT_FILE)
    }

    /// Persist the index as the call's single segment.
    pub fn write(&self, index: &EphemeralIndex) -> Result<(), IndexBuildError> {
        let body = serde_json::to_vec(index).map_err(IndexBuildError::Encode)?;
        let bytes = encode_segment(body);

        let target = self.segment_path();
        let staging = self.path.join(format!("{SEGMENT_FILE}.tmp"));

        fs::write(&staging, &bytes).map_err(|source| IndexBuildError::Write {
            path: staging.clone(),
            source,
        })?;
        fs::rename(&staging, &target).map_err(|source| IndexBuildError::Write {
            path: target.clone(),
            source,
        })?;

        debug!(
            path = %target.display(),
            bytes = bytes.len(),
            docs = index.doc_count(),
            "wrote index segment"
        );
        Ok(())
    }

    /// Read the segment back, verifying its footer.
    pub fn open(&self) -> Result<IndexHandle, IndexIoError> {
        let path = self.segment_path();
        let bytes = fs::read(&path).map_err(|source| IndexIoError::Read {
            path: path.clone(),
            source,
        })?;
        let body = decode_segment(&bytes)?;
        let index: EphemeralIndex = serde_json::from_slice(body).map_err(IndexIoError::Decode)?;
        Ok(IndexHandle { index })
    }

    /// Delete the call directory now. Failures are logged, never returned.
    pub fn release(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match dir.close() {
            Ok(()) => debug!(path = %self.path.display(), "released index directory"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove index directory"
            ),
        }
    }
}

impl Drop for IndexStorage {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// A loaded index, good for exactly one search.
#[derive(Debug)]
pub struct IndexHandle {
    index: EphemeralIndex,
}

impl IndexHandle {
    pub fn doc_count(&self) -> usize {
        self.index.doc_count()
    }

    /// Evaluate `clause` and attach each hit's stored id.
    pub fn search(
        self,
        clause: &Clause,
        max_results: usize,
    ) -> Result<Vec<IndexHit>, IndexIoError> {
        let hits = evaluate(&self.index, clause, max_results)?;
        Ok(hits
            .into_iter()
            .map(|hit| IndexHit {
                doc: hit.doc,
                score: hit.score,
                id: self.index.stored_id(hit.doc),
            })
            .collect())
    }
}

// =============================================================================
// SEGMENT ENCODING
// =============================================================================

fn encode_segment(mut body: Vec<u8>) -> Vec<u8> {
    let checksum = crc32fast::hash(&body);
    body.extend_from_slice(&checksum.to_le_bytes());
    body.extend_from_slice(&SEGMENT_MAGIC);
    body
}

fn decode_segment(bytes: &[u8]) -> Result<&[u8], IndexIoError> {
    if bytes.len() < FOOTER_LEN {
        return Err(IndexIoError::Corrupt {
            reason: format!("segment is {} bytes, shorter than its footer", bytes.len()),
        });
    }

    let (body, footer) = bytes.split_at(bytes.len() - FOOTER_LEN);
    if footer[4..] != SEGMENT_MAGIC {
        return Err(IndexIoError::Corrupt {
            reason: "missing segment magic".to_string(),
        });
    }

    let stored = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
    let computed = crc32fast::hash(body);
    if stored != computed {
        return Err(IndexIoError::Corrupt {
            reason: format!("checksum mismatch: stored {stored:08x}, computed {computed:08x}"),
        });
    }

    Ok(body)
}
