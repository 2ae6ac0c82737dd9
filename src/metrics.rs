// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{BucketArray, Pages};

/// Summary of a built index
///
/// Collected once after construction; formatting is up to the caller.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Metrics {
    /// Number of pages
    pub total_pages: usize,

    /// Number of words that were inserted, including duplicates
    pub total_keys: usize,

    /// Number of distinct keys actually stored in the buckets
    pub resident_keys: usize,

    /// Number of insertions that found their bucket full
    pub total_collisions: u64,

    /// Number of root buckets
    pub total_buckets: usize,

    /// Number of overflow buckets over all chains
    pub total_overflow_buckets: usize,

    /// Number of root buckets that hold no key
    pub empty_buckets: usize,

    /// Length of the longest chain, including its root bucket
    pub max_chain_len: usize,

    /// Maximum number of keys per bucket
    pub bucket_capacity: usize,
}

#[allow(clippy::cast_precision_loss)]
impl Metrics {
    /// Aggregates metrics over a built bucket array.
    #[must_use]
    pub fn collect(pages: &Pages, buckets: &BucketArray) -> Self {
        let mut metrics = Self {
            total_pages: pages.len(),
            total_keys: pages.key_count(),
            total_buckets: buckets.len(),
            bucket_capacity: buckets.capacity(),
            ..Default::default()
        };

        for bucket in buckets {
            metrics.resident_keys += bucket.entry_count();
            metrics.total_collisions += bucket.total_collisions();
            metrics.total_overflow_buckets += bucket.overflow_count();
            metrics.max_chain_len = metrics.max_chain_len.max(bucket.chain_len());

            if bucket.is_empty() {
                metrics.empty_buckets += 1;
            }
        }

        metrics
    }

    /// Collisions per inserted key, in percent.
    #[must_use]
    pub fn collision_percentage(&self) -> f64 {
        percentage(self.total_collisions as f64, self.total_keys as f64)
    }

    /// Overflow buckets per root bucket, in percent.
    #[must_use]
    pub fn overflow_percentage(&self) -> f64 {
        self.overflow_rate() * 100.0
    }

    /// Overflow buckets per root bucket (0.0 - ∞).
    #[must_use]
    pub fn overflow_rate(&self) -> f64 {
        if self.total_buckets == 0 {
            return 0.0;
        }
        self.total_overflow_buckets as f64 / self.total_buckets as f64
    }

    /// Resident keys per available slot in the root buckets (0.0 - ∞).
    #[must_use]
    pub fn average_occupancy(&self) -> f64 {
        let slots = self.total_buckets * self.bucket_capacity;
        if slots == 0 {
            return 0.0;
        }
        self.resident_keys as f64 / slots as f64
    }

    /// Number of inserted keys that were overwritten by a later duplicate.
    #[must_use]
    pub fn overwritten_keys(&self) -> usize {
        self.total_keys.saturating_sub(self.resident_keys)
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

impl std::fmt::Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total pages: {}", self.total_pages)?;
        writeln!(f, "Total words: {}", self.total_keys)?;
        writeln!(f, "Distinct words stored: {}", self.resident_keys)?;
        writeln!(f, "Total buckets: {}", self.total_buckets)?;
        writeln!(f, "Empty buckets: {}", self.empty_buckets)?;
        writeln!(f, "Overflow buckets: {}", self.total_overflow_buckets)?;
        writeln!(f, "Longest chain: {}", self.max_chain_len)?;
        writeln!(f, "Total collisions: {}", self.total_collisions)?;
        writeln!(f, "Collisions: {:.2}%", self.collision_percentage())?;
        write!(f, "Overflows: {:.2}%", self.overflow_percentage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DuplicateKeys, HashAlgorithm};
    use test_log::test;

    #[test]
    fn metrics_empty() {
        let metrics = Metrics::default();
        assert!(metrics.collision_percentage().abs() < f64::EPSILON);
        assert!(metrics.overflow_percentage().abs() < f64::EPSILON);
        assert!(metrics.average_occupancy().abs() < f64::EPSILON);
    }

    #[test]
    fn metrics_percentages() {
        let metrics = Metrics {
            total_keys: 200,
            total_collisions: 50,
            total_buckets: 8,
            total_overflow_buckets: 2,
            ..Default::default()
        };

        assert!((metrics.collision_percentage() - 25.0).abs() < 1e-9);
        assert!((metrics.overflow_percentage() - 25.0).abs() < 1e-9);
        assert!((metrics.overflow_rate() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn metrics_collect() -> crate::Result<()> {
        let words = "a b c a".split_whitespace().map(String::from).collect();
        let pages = Pages::new(words, 2)?;

        // ceil(4 * 1.2 / 2) = 3 buckets
        let buckets =
            BucketArray::build(&pages, HashAlgorithm::Fnv1a, 2, 120, DuplicateKeys::Overwrite)?;
        let metrics = Metrics::collect(&pages, &buckets);

        assert_eq!(2, metrics.total_pages);
        assert_eq!(4, metrics.total_keys);
        assert_eq!(3, metrics.resident_keys);
        assert_eq!(1, metrics.overwritten_keys());
        assert_eq!(3, metrics.total_buckets);
        assert_eq!(buckets.collisions(), metrics.total_collisions);

        Ok(())
    }
}
