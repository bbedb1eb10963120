//! Error types for table construction and keyset validation.

use thiserror::Error;

/// A lookup table failed its self-check.
///
/// This is never a runtime condition: it means the table builder is broken
/// and no ciphertext computed from the tables can be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// `value * inverse` did not reduce to 1.
    #[error("inverse of {value} is recorded as {inverse}, product is not 1 mod 257")]
    InverseIdentity {
        /// Field element that was looked up.
        value: u32,
        /// Recorded inverse.
        inverse: u32,
    },
    /// The inverse of the recorded inverse is not the original value.
    #[error("inverse table is not symmetric at {value}")]
    InverseAsymmetric {
        /// Field element whose round trip failed.
        value: u32,
    },
    /// A power entry disagrees with repeated multiplication by its root.
    #[error("power table row {row} disagrees with repeated multiplication at exponent {exponent}")]
    PowerMismatch {
        /// Table row.
        row: usize,
        /// Exponent column.
        exponent: usize,
    },
}

/// A set of keys cannot be used together as a keyset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeysetError {
    /// Fewer than two keys were supplied.
    #[error("a keyset needs at least 2 keys, got {count}")]
    TooFewKeys {
        /// Number of keys supplied.
        count: usize,
    },
    /// A key has no bytes.
    #[error("key {index} is empty")]
    EmptyKey {
        /// Position of the key in the set.
        index: usize,
    },
    /// Keys in one set must all have the same length.
    #[error("key {index} has length {found}, expected {expected}")]
    KeyLengthMismatch {
        /// Position of the offending key.
        index: usize,
        /// Length of the first key.
        expected: usize,
        /// Length of the offending key.
        found: usize,
    },
    /// The forward keys do not sum to the compound key.
    #[error("forward keys do not sum to the compound key at byte {position}")]
    InvariantViolated {
        /// First byte position where the sum differs.
        position: usize,
    },
}
