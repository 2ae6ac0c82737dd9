// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, HashAlgorithm, Index, PageId, Result};

/// What happens when a key that is already indexed is inserted again
///
/// Words usually occur on more than one page of a corpus.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum DuplicateKeys {
    /// Keep only the page the key was last seen on
    ///
    /// Every earlier page of that key is lost.
    #[default]
    Overwrite,

    /// Keep every page the key was seen on, in insertion order
    Collect,
}

impl DuplicateKeys {
    pub(crate) fn apply(self, pages: &mut Vec<PageId>, page: PageId) {
        match self {
            Self::Overwrite => {
                pages.clear();
                pages.push(page);
            }
            Self::Collect => {
                if pages.last() != Some(&page) {
                    pages.push(page);
                }
            }
        }
    }
}

/// Default number of words per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default number of keys per bucket node
pub const DEFAULT_BUCKET_CAPACITY: usize = 300;

/// Default load factor in percent (1.2)
pub const DEFAULT_LOAD_FACTOR_PERCENT: u32 = 120;

/// Index configuration builder
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Hash algorithm used for building and querying
    pub algorithm: HashAlgorithm,

    /// Number of words per page
    pub page_size: usize,

    /// Maximum number of keys per bucket node
    pub bucket_capacity: usize,

    /// Load factor, in percent, applied to the key count when sizing the bucket array
    pub load_factor_percent: u32,

    /// How keys occurring more than once are stored
    pub duplicate_keys: DuplicateKeys,
}

impl Config {
    /// Initializes a new config.
    ///
    /// The hash algorithm has no default, because querying an index with a different
    /// algorithm than it was built with silently returns wrong results.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            page_size: DEFAULT_PAGE_SIZE,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
            load_factor_percent: DEFAULT_LOAD_FACTOR_PERCENT,
            duplicate_keys: DuplicateKeys::default(),
        }
    }

    /// Sets the hash algorithm.
    #[must_use]
    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the number of words per page.
    ///
    /// Defaults to 100.
    #[must_use]
    pub fn page_size(mut self, words: usize) -> Self {
        self.page_size = words;
        self
    }

    /// Sets the maximum number of keys per bucket (and per overflow bucket).
    ///
    /// Defaults to 300.
    #[must_use]
    pub fn bucket_capacity(mut self, keys: usize) -> Self {
        self.bucket_capacity = keys;
        self
    }

    /// Sets the load factor in percent.
    ///
    /// The bucket array is sized as `ceil(keys * load_factor / capacity)`, so a value
    /// above 100 leaves headroom and keeps the average occupancy below 100%.
    ///
    /// Defaults to 120 (1.2).
    #[must_use]
    pub fn load_factor_percent(mut self, percent: u32) -> Self {
        self.load_factor_percent = percent;
        self
    }

    /// Sets how keys occurring more than once are stored.
    ///
    /// Defaults to [`DuplicateKeys::Overwrite`].
    #[must_use]
    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    /// Checks that all size parameters are positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidArgument("page size"));
        }
        if self.bucket_capacity == 0 {
            return Err(Error::InvalidArgument("bucket capacity"));
        }
        if self.load_factor_percent == 0 {
            return Err(Error::InvalidArgument("load factor"));
        }
        Ok(())
    }

    /// Paginates `words` and builds an index over them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a size parameter is zero.
    /// Nothing is allocated in that case.
    pub fn build(self, words: Vec<String>) -> Result<Index> {
        Index::build(self, words)
    }
}
