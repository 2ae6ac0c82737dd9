// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

/// Represents errors that can occur when building or querying the index
#[derive(Debug)]
pub enum Error {
    /// I/O error while loading a word list
    Io(std::io::Error),

    /// A size parameter (modulus, bucket capacity, page size, load factor) was zero
    InvalidArgument(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "HashIndexError: I/O error: {e}"),
            Self::InvalidArgument(what) => {
                write!(f, "HashIndexError: invalid argument: {what} must be positive")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidArgument(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Index result
pub type Result<T> = std::result::Result<T, Error>;
