// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    bucket::{Bucket, Insertion},
    config::DuplicateKeys,
    Error, HashAlgorithm, PageId, Pages, Result,
};

/// Number of buckets needed for `expected_keys` keys:
/// `ceil(expected_keys * load_factor_percent / (100 * capacity))`, but at least 1.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `capacity` or `load_factor_percent` is 0.
pub fn bucket_count(expected_keys: usize, capacity: usize, load_factor_percent: u32) -> Result<usize> {
    if capacity == 0 {
        return Err(Error::InvalidArgument("bucket capacity"));
    }
    if load_factor_percent == 0 {
        return Err(Error::InvalidArgument("load factor"));
    }

    // NOTE: Integer arithmetic, so a load factor of 1.2 is exact
    let scaled = expected_keys as u128 * u128::from(load_factor_percent);
    let n = scaled.div_ceil(100 * capacity as u128).max(1);

    Ok(usize::try_from(n).unwrap_or(usize::MAX))
}

/// Result of probing a [`BucketArray`] for a key
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Probe<'a> {
    /// Position of the bucket the key hashes to
    pub bucket: usize,

    /// Number of chain nodes that were inspected (at least 1)
    pub probes: usize,

    /// Pages stored for the key, `None` if the key is not indexed
    pub pages: Option<&'a [PageId]>,
}

impl Probe<'_> {
    /// Cost of an indexed lookup in page reads.
    ///
    /// Accessing one bucket, including walking its overflow chain, is modelled as a
    /// single page read, regardless of the chain length. [`Probe::probes`] holds the
    /// actual number of nodes inspected.
    pub const PAGE_READS: usize = 1;

    /// Page the key was last written to.
    #[must_use]
    pub fn page(&self) -> Option<PageId> {
        self.pages.and_then(|pages| pages.last().copied())
    }
}

/// Fixed-length array of root buckets
///
/// The length is decided at construction and never changes, so the position of a
/// key is always `hash(key, len)`.
#[derive(Debug)]
pub struct BucketArray {
    buckets: Vec<Bucket>,
    capacity: usize,
    collisions: u64,
}

impl BucketArray {
    /// Allocates `count` empty buckets, each holding up to `capacity` keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `count` or `capacity` is 0.
    pub fn with_bucket_count(count: usize, capacity: usize) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidArgument("bucket count"));
        }
        if capacity == 0 {
            return Err(Error::InvalidArgument("bucket capacity"));
        }

        let buckets = (0..count)
            .map(|idx| Bucket::new(format!("Bucket {}", idx + 1), capacity))
            .collect();

        Ok(Self {
            buckets,
            capacity,
            collisions: 0,
        })
    }

    /// Allocates enough empty buckets for `expected_keys` keys, see [`bucket_count`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` or `load_factor_percent` is 0.
    pub fn for_keys(expected_keys: usize, capacity: usize, load_factor_percent: u32) -> Result<Self> {
        let count = bucket_count(expected_keys, capacity, load_factor_percent)?;
        Self::with_bucket_count(count, capacity)
    }

    /// Builds a bucket array over every `(word, page)` pair of `pages`, in source order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `capacity` or `load_factor_percent` is 0.
    pub fn build(
        pages: &Pages,
        algorithm: HashAlgorithm,
        capacity: usize,
        load_factor_percent: u32,
        duplicates: DuplicateKeys,
    ) -> Result<Self> {
        let mut buckets = Self::for_keys(pages.key_count(), capacity, load_factor_percent)?;

        log::debug!(
            "Indexing {} words from {} pages into {} buckets of {capacity} with {}",
            pages.key_count(),
            pages.len(),
            buckets.len(),
            algorithm.label(),
        );

        for (word, page) in pages.entries() {
            buckets.insert(word, page, algorithm, duplicates);
        }

        log::debug!("Indexed with {} collisions", buckets.collisions);

        Ok(buckets)
    }

    /// Inserts a `(key, page)` pair into the bucket selected by `algorithm`.
    pub fn insert(
        &mut self,
        key: &str,
        page: PageId,
        algorithm: HashAlgorithm,
        duplicates: DuplicateKeys,
    ) -> Insertion {
        let position = self.position(key, algorithm);

        #[expect(clippy::indexing_slicing, reason = "position is reduced modulo the bucket count")]
        let result = self.buckets[position].insert(key, page, duplicates);

        if result.is_collision() {
            self.collisions += 1;
        }

        result
    }

    /// Looks up `key` in the bucket selected by `algorithm`, walking its overflow chain.
    ///
    /// `algorithm` needs to be the one the array was built with.
    #[must_use]
    pub fn probe(&self, key: &str, algorithm: HashAlgorithm) -> Probe<'_> {
        let bucket = self.position(key, algorithm);

        let (pages, probes) = self
            .buckets
            .get(bucket)
            .map_or((None, 0), |b| b.probe(key));

        Probe {
            bucket,
            probes,
            pages,
        }
    }

    /// Position of the bucket `key` hashes to.
    #[must_use]
    #[expect(clippy::expect_used, reason = "the bucket array is never empty")]
    pub fn position(&self, key: &str, algorithm: HashAlgorithm) -> usize {
        algorithm
            .hash(key, self.buckets.len())
            .expect("bucket count should be positive")
    }

    /// Number of buckets.
    #[must_use]
    #[expect(clippy::len_without_is_empty, reason = "there is always at least one bucket")]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Maximum number of keys per bucket node.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of insertions that were counted as collisions.
    #[must_use]
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Returns a bucket by position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Bucket> {
        self.buckets.get(position)
    }

    /// Iterates over the root buckets, in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }
}

impl<'a> IntoIterator for &'a BucketArray {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Returns the page `key` was last written to, or `None` if it is not indexed.
///
/// `algorithm` needs to be the one `buckets` was built with, otherwise the result is
/// wrong or missing.
#[must_use]
pub fn lookup_indexed(key: &str, buckets: &BucketArray, algorithm: HashAlgorithm) -> Option<PageId> {
    buckets.probe(key, algorithm).page()
}
