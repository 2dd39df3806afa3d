// Mstrie -- An in-memory index for multisets
// Copyright 2026 The mstrie authors

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

//! An in-memory index for multisets over a fixed finite alphabet.
//!
//! The index is a *multiset-trie*: a fixed-depth digital search tree whose
//! paths encode multiplicity vectors. It answers exact, submultiset, and
//! supermultiset membership queries, retrieves all matches of the two range
//! queries within a bounded multiplicity offset, and persists itself to a
//! single flat file.

pub mod benchmark;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod stats;
pub mod trie;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::index::IndexManager;
pub use crate::stats::{Stats, TimeUnit};
pub use crate::trie::{Mstrie, Settings};
