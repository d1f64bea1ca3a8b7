// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The ephemeral index: built once per search call, searched once, deleted.
//!
//! - [`IndexBuilder`] turns projected documents into per-field term
//!   dictionaries, positions, numeric points, and token lengths.
//! - [`IndexStorage`] owns the call directory and its single segment file.
//! - [`IndexHandle`] is the loaded segment; searching consumes it.

mod builder;
mod storage;

pub use builder::{build_index, is_well_formed, IndexBuilder};
pub use storage::{IndexHandle, IndexStorage, SEGMENT_FILE, SEGMENT_MAGIC};
