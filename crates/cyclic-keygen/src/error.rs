//! Key generation errors.

use cyclic_core::KeysetError;
use thiserror::Error;

/// Key generation failed. No partial keyset is ever returned.
#[derive(Debug, Error)]
pub enum KeygenError {
    /// The secure random source failed. Generation is not retried.
    #[error("secure random source failed: {0}")]
    RandomSource(#[from] rand::Error),
    /// Fewer than two keys were requested.
    #[error("a keyset needs at least 2 keys, requested {requested}")]
    TooFewKeys {
        /// Requested key count.
        requested: usize,
    },
    /// The configured key length is zero.
    #[error("key length must be at least one byte")]
    ZeroKeyLength,
    /// The generated keys did not form a valid keyset.
    #[error(transparent)]
    Keyset(#[from] KeysetError),
}
