// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, PageId, Result};

/// A word list split into fixed-size, ordered pages
///
/// Every page holds `page_size` words, except possibly the last one.
#[derive(Clone, Debug)]
pub struct Pages {
    words: Vec<String>,
    page_size: usize,
}

impl Pages {
    /// Splits `words` into pages of `page_size` words each.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `page_size` is 0.
    pub fn new(words: Vec<String>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidArgument("page size"));
        }
        Ok(Self { words, page_size })
    }

    /// Number of words per page.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len().div_ceil(self.page_size)
    }

    /// Returns `true` if there are no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of words over all pages.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.words.len()
    }

    /// All words, in page order.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Returns the words of a page.
    #[must_use]
    pub fn get(&self, page: PageId) -> Option<&[String]> {
        let page = usize::try_from(page).ok()?;
        let start = page.checked_mul(self.page_size)?;
        let end = start.saturating_add(self.page_size).min(self.words.len());
        self.words.get(start..end).filter(|words| !words.is_empty())
    }

    /// First page.
    #[must_use]
    pub fn first(&self) -> Option<&[String]> {
        self.iter().next().map(|(_, words)| words)
    }

    /// Last page.
    #[must_use]
    pub fn last(&self) -> Option<&[String]> {
        self.iter().next_back().map(|(_, words)| words)
    }

    /// Iterates over `(page id, words)`, in page order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (PageId, &[String])> + ExactSizeIterator {
        self.words
            .chunks(self.page_size)
            .enumerate()
            .map(|(idx, words)| (idx as PageId, words))
    }

    /// Iterates over `(word, page id)` pairs, in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, PageId)> {
        self.iter()
            .flat_map(|(page, words)| words.iter().map(move |word| (word.as_str(), page)))
    }
}
