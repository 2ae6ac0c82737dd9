// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A static hash index over a paginated word list.
//!
//! ##### About
//!
//! This crate builds a hash index once from a static corpus of words and answers
//! point queries against it, so the cost of an indexed lookup can be compared
//! against a full table scan over the same pages.
//!
//! The word list is split into fixed-size pages. Every `(word, page)` pair is then
//! placed into one of `N` fixed-capacity buckets, selected by a configurable hash
//! function. Once a bucket is full, further insertions into it are counted as
//! collisions and spill into an overflow chain. After construction, the index is
//! read-only and may be shared between threads.
//!
//! ```
//! use static_hash_index::{Config, HashAlgorithm};
//!
//! let words = "the quick brown fox jumps over the lazy dog"
//!     .split_whitespace()
//!     .map(String::from)
//!     .collect::<Vec<_>>();
//!
//! let index = Config::new(HashAlgorithm::Fnv1a)
//!     .page_size(3)
//!     .bucket_capacity(2)
//!     .build(words)?;
//!
//! assert_eq!(Some(1), index.lookup("fox"));
//! assert_eq!(None, index.lookup("cat"));
//!
//! let scan = index.scan("lazy");
//! assert_eq!(Some(2), scan.page);
//! assert_eq!(3, scan.pages_read);
//! #
//! # Ok::<(), static_hash_index::Error>(())
//! ```

#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

#[doc(hidden)]
pub type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

/// Overflow-chained buckets
pub mod bucket;

mod bucket_array;

/// Configuration
pub mod config;

/// Word list loading
pub mod corpus;

mod error;

/// Hash function family
pub mod hash;

mod index;
mod metrics;
mod pages;
mod scan;

/// Page identifier (ordinal position of a page, starting at 0)
pub type PageId = u64;

pub use {
    bucket::{Bucket, Insertion},
    bucket_array::{bucket_count, lookup_indexed, BucketArray, Probe},
    config::{Config, DuplicateKeys},
    error::{Error, Result},
    hash::HashAlgorithm,
    index::{Comparison, Index},
    metrics::Metrics,
    pages::Pages,
    scan::{lookup_scan, TableScan},
};
