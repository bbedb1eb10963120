//! Keyset generation for the cyclic keyset cipher.
//!
//! A keyset of `n` keys is `n - 1` keys drawn from a cryptographically
//! secure source plus one compound key derived from them, so that applying
//! every key once (the compound key inverted) is the identity.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod generator;

pub use error::KeygenError;
pub use generator::{generate_keyset, KeyGenerator, KeygenConfig, DEFAULT_KEY_LENGTH};
