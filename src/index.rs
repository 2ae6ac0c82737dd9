// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{
    lookup_scan, BucketArray, Config, HashAlgorithm, Metrics, PageId, Pages, Probe, Result,
    TableScan,
};
use std::time::{Duration, Instant};

/// A built index, together with the pages it was built from
///
/// The index is read-only once [`Config::build`] returns, so it can be shared between
/// threads (e.g. behind an `Arc`) without any locking.
#[derive(Debug)]
pub struct Index {
    config: Config,
    pages: Pages,
    buckets: BucketArray,
    metrics: Metrics,
    build_time: Duration,
}

/// Indexed lookup and table scan of the same key, side by side
#[derive(Copy, Clone, Debug)]
pub struct Comparison<'a> {
    /// Indexed lookup result
    pub indexed: Probe<'a>,

    /// Time taken by the indexed lookup
    pub indexed_time: Duration,

    /// Table scan result
    pub scan: TableScan,

    /// Time taken by the table scan
    pub scan_time: Duration,
}

impl Comparison<'_> {
    /// How much longer the table scan took than the indexed lookup.
    ///
    /// Negative if the table scan was faster.
    #[must_use]
    pub fn time_difference_secs(&self) -> f64 {
        self.scan_time.as_secs_f64() - self.indexed_time.as_secs_f64()
    }
}

impl Index {
    pub(crate) fn build(config: Config, words: Vec<String>) -> Result<Self> {
        config.validate()?;

        let start = Instant::now();

        let pages = Pages::new(words, config.page_size)?;

        let buckets = BucketArray::build(
            &pages,
            config.algorithm,
            config.bucket_capacity,
            config.load_factor_percent,
            config.duplicate_keys,
        )?;

        let metrics = Metrics::collect(&pages, &buckets);
        let build_time = start.elapsed();

        log::info!(
            "Built index over {} words ({} pages, {} buckets, {} collisions) in {build_time:?}",
            metrics.total_keys,
            metrics.total_pages,
            metrics.total_buckets,
            metrics.total_collisions,
        );

        Ok(Self {
            config,
            pages,
            buckets,
            metrics,
            build_time,
        })
    }

    /// Configuration the index was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hash algorithm the index was built with.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.config.algorithm
    }

    /// The paginated source.
    #[must_use]
    pub fn pages(&self) -> &Pages {
        &self.pages
    }

    /// The bucket array.
    #[must_use]
    pub fn buckets(&self) -> &BucketArray {
        &self.buckets
    }

    /// Metrics collected after construction.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Time it took to paginate the words and build the bucket array.
    #[must_use]
    pub fn build_time(&self) -> Duration {
        self.build_time
    }

    /// Returns the page `key` was last written to, using the index.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<PageId> {
        self.probe(key).page()
    }

    /// Returns every page retained for `key`, using the index.
    ///
    /// Holds more than one page only if the index was built with
    /// [`DuplicateKeys::Collect`](crate::DuplicateKeys::Collect).
    #[must_use]
    pub fn lookup_all(&self, key: &str) -> Option<&[PageId]> {
        self.probe(key).pages
    }

    /// Probes the index for `key`.
    #[must_use]
    pub fn probe(&self, key: &str) -> Probe<'_> {
        self.buckets.probe(key, self.config.algorithm)
    }

    /// Looks for `key` by reading the pages in order, without using the index.
    #[must_use]
    pub fn scan(&self, key: &str) -> TableScan {
        lookup_scan(key, &self.pages)
    }

    /// Runs an indexed lookup and a table scan for `key`, timing both.
    #[must_use]
    pub fn compare(&self, key: &str) -> Comparison<'_> {
        let start = Instant::now();
        let indexed = self.probe(key);
        let indexed_time = start.elapsed();

        let start = Instant::now();
        let scan = self.scan(key);
        let scan_time = start.elapsed();

        log::debug!(
            "{key:?}: index probed {} node(s) in {indexed_time:?}, scan read {} page(s) in {scan_time:?}",
            indexed.probes,
            scan.pages_read,
        );

        Comparison {
            indexed,
            indexed_time,
            scan,
            scan_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DuplicateKeys, Error};
    use test_log::test;

    fn words(text: &str) -> Vec<String> {
        crate::corpus::split_words(text)
    }

    #[test]
    fn index_build_invalid_config() {
        for config in [
            Config::new(HashAlgorithm::Fnv1a).page_size(0),
            Config::new(HashAlgorithm::Fnv1a).bucket_capacity(0),
            Config::new(HashAlgorithm::Fnv1a).load_factor_percent(0),
        ] {
            assert!(matches!(
                config.build(words("a b c")),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn index_lookup_and_scan() -> crate::Result<()> {
        let index = Config::new(HashAlgorithm::PolynomialRolling)
            .page_size(2)
            .bucket_capacity(1)
            .build(words("red green blue cyan magenta yellow"))?;

        assert_eq!(3, index.pages().len());
        assert_eq!(8, index.buckets().len());
        assert_eq!(HashAlgorithm::PolynomialRolling, index.algorithm());

        assert_eq!(Some(2), index.lookup("yellow"));
        assert_eq!(None, index.lookup("black"));

        let scan = index.scan("yellow");
        assert_eq!(Some(2), scan.page);
        assert_eq!(3, scan.pages_read);

        Ok(())
    }

    #[test]
    fn index_duplicates_overwrite() -> crate::Result<()> {
        let index = Config::new(HashAlgorithm::Djb2)
            .page_size(1)
            .build(words("x y x z x"))?;

        assert_eq!(Some(4), index.lookup("x"));
        assert_eq!(Some(&[4][..]), index.lookup_all("x"));
        assert_eq!(Some(0), index.scan("x").page);
        assert_eq!(2, index.metrics().overwritten_keys());

        Ok(())
    }

    #[test]
    fn index_duplicates_collect() -> crate::Result<()> {
        let index = Config::new(HashAlgorithm::Djb2)
            .page_size(1)
            .duplicate_keys(DuplicateKeys::Collect)
            .build(words("x y x z x"))?;

        assert_eq!(Some(4), index.lookup("x"));
        assert_eq!(Some(&[0, 2, 4][..]), index.lookup_all("x"));

        Ok(())
    }

    #[test]
    fn index_compare() -> crate::Result<()> {
        let index = Config::new(HashAlgorithm::Xxh3)
            .page_size(3)
            .build(words("a b c d e f g h i"))?;

        let comparison = index.compare("h");
        assert_eq!(Some(2), comparison.indexed.page());
        assert_eq!(Some(2), comparison.scan.page);
        assert_eq!(3, comparison.scan.pages_read);

        let comparison = index.compare("nope");
        assert_eq!(None, comparison.indexed.page());
        assert_eq!(None, comparison.scan.page);
        assert_eq!(3, comparison.scan.pages_read);

        Ok(())
    }

    #[test]
    fn index_empty_corpus() -> crate::Result<()> {
        let index = Config::new(HashAlgorithm::Fnv1a).build(vec![])?;

        assert_eq!(1, index.buckets().len());
        assert_eq!(0, index.pages().len());
        assert_eq!(None, index.lookup("a"));
        assert_eq!(0, index.scan("a").pages_read);

        Ok(())
    }
}
