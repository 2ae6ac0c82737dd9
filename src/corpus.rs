// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! The index only ever receives a fully materialized word list, so a failed read
//! can never leave a partially built index behind.

use std::path::Path;

/// Splits `text` into words at any whitespace.
#[must_use]
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(String::from).collect()
}

/// Reads a whole UTF-8 text file and splits it into words at any whitespace.
///
/// # Errors
///
/// Will return `Err` if the file cannot be read or is not valid UTF-8.
pub fn read_words<P: AsRef<Path>>(path: P) -> crate::Result<Vec<String>> {
    let path = path.as_ref();

    log::debug!("Reading word list from {path:?}");
    let text = std::fs::read_to_string(path)?;

    let words = split_words(&text);
    log::debug!("Read {} words ({} bytes) from {path:?}", words.len(), text.len());

    Ok(words)
}
