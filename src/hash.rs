// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Every function in this module maps a key to a bucket position in `[0, modulus)`.
//!
//! All of them are pure and deterministic, and hash the key's Unicode scalar values
//! (not its UTF-8 bytes), with the exception of [`xxh3`] which works on bytes.

use crate::{Error, Result};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

const POLYNOMIAL_BASE: u128 = 31;

const DJB2_SEED: u32 = 5_381;

/// Hash algorithm used to place keys into buckets
///
/// The same algorithm has to be used for building and querying an index,
/// otherwise lookups silently return wrong or missing results.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum HashAlgorithm {
    /// 32-bit FNV-1a
    Fnv1a,

    /// Polynomial rolling hash with base 31
    PolynomialRolling,

    /// 32-bit DJB2 (`h * 33 + c`)
    Djb2,

    /// 64-bit XXH3
    Xxh3,
}

impl HashAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 4] = [Self::Fnv1a, Self::PolynomialRolling, Self::Djb2, Self::Xxh3];

    /// Maps `key` to a position in `[0, modulus)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `modulus` is 0.
    pub fn hash(self, key: &str, modulus: usize) -> Result<usize> {
        match self {
            Self::Fnv1a => fnv1a(key, modulus),
            Self::PolynomialRolling => polynomial_rolling(key, modulus),
            Self::Djb2 => djb2(key, modulus),
            Self::Xxh3 => xxh3(key, modulus),
        }
    }

    /// Short name, as accepted by [`std::str::FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fnv1a => "fnv1a",
            Self::PolynomialRolling => "polynomial",
            Self::Djb2 => "djb2",
            Self::Xxh3 => "xxh3",
        }
    }

    /// Human readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fnv1a => "FNV-1a",
            Self::PolynomialRolling => "Polynomial Rolling Hash",
            Self::Djb2 => "DJB2",
            Self::Xxh3 => "XXH3",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fnv1a" | "fnv-1a" | "fnv" => Ok(Self::Fnv1a),
            "polynomial" | "polynomial-rolling" | "poly" => Ok(Self::PolynomialRolling),
            "djb2" => Ok(Self::Djb2),
            "xxh3" => Ok(Self::Xxh3),
            _ => Err(format!(
                "unknown hash algorithm {s:?}, expected one of: fnv1a, polynomial, djb2, xxh3"
            )),
        }
    }
}

fn check_modulus(modulus: usize) -> Result<u64> {
    if modulus == 0 {
        return Err(Error::InvalidArgument("modulus"));
    }
    Ok(modulus as u64)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the result is smaller than the modulus, which is a usize"
)]
fn reduce(h: u64, modulus: u64) -> usize {
    (h % modulus) as usize
}

/// 32-bit FNV-1a, truncated to 32 bits after every multiplication.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `modulus` is 0.
pub fn fnv1a(key: &str, modulus: usize) -> Result<usize> {
    let modulus = check_modulus(modulus)?;

    let h = key.chars().fold(FNV_OFFSET_BASIS, |h, c| {
        (h ^ u32::from(c)).wrapping_mul(FNV_PRIME)
    });

    Ok(reduce(u64::from(h), modulus))
}

/// Polynomial rolling hash: `sum(c[i] * 31^i) mod modulus`.
///
/// The sum is accumulated modulo `modulus` in 128-bit arithmetic, which yields the
/// same result as evaluating the sum with unbounded integers, for any key length.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `modulus` is 0.
pub fn polynomial_rolling(key: &str, modulus: usize) -> Result<usize> {
    let m = u128::from(check_modulus(modulus)?);

    // NOTE: power < m <= 2^64 and code points < 2^21, so nothing here can overflow
    let mut power = 1 % m;
    let mut h = 0u128;

    for c in key.chars() {
        h = (h + u128::from(u32::from(c)) * power) % m;
        power = (power * POLYNOMIAL_BASE) % m;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "h < modulus, which is a usize"
    )]
    let h = h as usize;

    Ok(h)
}

/// 32-bit DJB2: `h = h * 33 + c`, seeded with 5381.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `modulus` is 0.
pub fn djb2(key: &str, modulus: usize) -> Result<usize> {
    let modulus = check_modulus(modulus)?;

    let h = key.chars().fold(DJB2_SEED, |h, c| {
        h.wrapping_shl(5).wrapping_add(h).wrapping_add(u32::from(c))
    });

    Ok(reduce(u64::from(h), modulus))
}

/// XXH3 (64-bit) over the key's UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `modulus` is 0.
pub fn xxh3(key: &str, modulus: usize) -> Result<usize> {
    let modulus = check_modulus(modulus)?;
    Ok(reduce(xxhash_rust::xxh3::xxh3_64(key.as_bytes()), modulus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_log::test;

    const FULL_32: usize = 1 << 32;

    #[test]
    fn hash_zero_modulus() {
        for algorithm in HashAlgorithm::iter() {
            assert!(matches!(
                algorithm.hash("abc", 0),
                Err(Error::InvalidArgument("modulus"))
            ));
        }
    }

    #[test]
    fn hash_in_range() -> crate::Result<()> {
        let keys = ["", "a", "hello", "ünïcödé", "日本語", "a longer key with spaces"];

        for algorithm in HashAlgorithm::iter() {
            for modulus in [1, 2, 7, 100, 1_009, 65_536] {
                for key in keys {
                    assert!(algorithm.hash(key, modulus)? < modulus);
                }

                for _ in 0..100 {
                    let key = nanoid::nanoid!();
                    assert!(algorithm.hash(&key, modulus)? < modulus);
                }
            }
        }

        Ok(())
    }

    #[test]
    fn hash_deterministic() -> crate::Result<()> {
        for algorithm in HashAlgorithm::iter() {
            let a = algorithm.hash("deterministic", 997)?;
            let b = algorithm.hash("deterministic", 997)?;
            assert_eq!(a, b);
        }
        Ok(())
    }

    #[test]
    fn hash_fnv1a_known_values() -> crate::Result<()> {
        assert_eq!(0x811c_9dc5, fnv1a("", FULL_32)?);
        assert_eq!(0xe40c_292c, fnv1a("a", FULL_32)?);
        assert_eq!(0xbf9c_f968, fnv1a("foobar", FULL_32)?);
        assert_eq!(0x811c_9dc5 % 10, fnv1a("", 10)?);
        Ok(())
    }

    #[test]
    fn hash_djb2_known_values() -> crate::Result<()> {
        assert_eq!(5_381, djb2("", FULL_32)?);
        assert_eq!(177_670, djb2("a", FULL_32)?);
        assert_eq!(5_863_208, djb2("ab", FULL_32)?);
        assert_eq!(5_381 % 100, djb2("", 100)?);
        Ok(())
    }

    #[test]
    fn hash_djb2_truncates() -> crate::Result<()> {
        let key = "a".repeat(64);

        let mut expected = 5_381u64;
        for _ in 0..64 {
            expected = (expected * 33 + 97) & 0xFFFF_FFFF;
        }

        assert_eq!(expected as usize, djb2(&key, FULL_32)?);
        Ok(())
    }

    #[test]
    fn hash_polynomial_known_values() -> crate::Result<()> {
        assert_eq!(0, polynomial_rolling("", 10)?);
        assert_eq!(97, polynomial_rolling("a", 1_000)?);
        assert_eq!(3_135, polynomial_rolling("ab", 1_000_000)?);
        assert_eq!(98_274, polynomial_rolling("abc", 1_000_000)?);
        assert_eq!(98_274 % 13, polynomial_rolling("abc", 13)?);
        Ok(())
    }

    #[test]
    fn hash_polynomial_matches_exact_sum() -> crate::Result<()> {
        // 31^20 * 127 still fits into u128, so the exact sum can be computed directly
        let keys = ["zzzzzzzzzzzzzzzzzzzz", "hash index", "overflow_bucket_1", "~~~~~~~~~~~~~~~~~~~"];

        for key in keys {
            let exact = key
                .chars()
                .enumerate()
                .map(|(i, c)| u128::from(u32::from(c)) * 31u128.pow(i as u32))
                .sum::<u128>();

            for modulus in [1usize, 3, 1_000, 65_537, 4_294_967_311, usize::MAX] {
                assert_eq!(
                    (exact % modulus as u128) as usize,
                    polynomial_rolling(key, modulus)?,
                    "key={key:?} modulus={modulus}",
                );
            }
        }

        Ok(())
    }

    #[test]
    fn hash_polynomial_long_key() -> crate::Result<()> {
        let key = "x".repeat(10_000);
        assert!(polynomial_rolling(&key, 12_345)? < 12_345);
        Ok(())
    }

    #[test]
    fn hash_uses_code_points() -> crate::Result<()> {
        // 'é' is U+00E9 (233), but two bytes in UTF-8
        assert_eq!(233, polynomial_rolling("é", 1_000)?);
        assert_eq!(5_381 * 33 + 233, djb2("é", FULL_32)?);
        Ok(())
    }

    #[test]
    fn hash_algorithm_from_str() {
        for algorithm in HashAlgorithm::iter() {
            assert_eq!(Ok(algorithm), algorithm.as_str().parse());
            assert_eq!(Ok(algorithm), algorithm.to_string().parse());
        }

        assert_eq!(Ok(HashAlgorithm::Fnv1a), "FNV-1a".parse());
        assert_eq!(Ok(HashAlgorithm::PolynomialRolling), "poly".parse());
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    #[test]
    fn hash_algorithm_all_is_complete() {
        assert_eq!(HashAlgorithm::iter().collect::<Vec<_>>(), HashAlgorithm::ALL);
    }
}
