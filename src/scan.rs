// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{PageId, Pages};

/// Outcome of a table scan
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableScan {
    /// First page containing the key, `None` if no page does
    pub page: Option<PageId>,

    /// Number of pages read until the key was found (or all pages, if it was not)
    pub pages_read: usize,
}

impl TableScan {
    /// Returns `true` if the key was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.page.is_some()
    }
}

/// Looks for `key` by reading `pages` in order, without using the index.
///
/// Returns the first page containing the key. A key on page `k` costs `k + 1` page reads;
/// a missing key costs every page.
#[must_use]
pub fn lookup_scan(key: &str, pages: &Pages) -> TableScan {
    let mut pages_read = 0;

    for (page, words) in pages.iter() {
        pages_read += 1;

        if words.iter().any(|word| word == key) {
            return TableScan {
                page: Some(page),
                pages_read,
            };
        }
    }

    TableScan {
        page: None,
        pages_read,
    }
}
