//! Keyset generator.

use cyclic_core::{to_field, to_stored, Key, Keyset, ORDER};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::KeygenError;

/// Key length used when none is configured.
pub const DEFAULT_KEY_LENGTH: usize = 10;

/// Configuration for the generator.
///
/// Every key of a keyset shares this length, and every transform applying
/// those keys must use keys of that length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeygenConfig {
    /// Bytes per key.
    pub key_length: usize,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
        }
    }
}

/// Keyset generator parametrized by a secure RNG.
pub struct KeyGenerator<R: RngCore + CryptoRng> {
    rng: R,
    config: KeygenConfig,
}

impl<R: RngCore + CryptoRng> KeyGenerator<R> {
    /// Creates a new generator with default configuration.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: KeygenConfig::default(),
        }
    }

    /// Creates a generator with explicit configuration.
    pub fn with_config(rng: R, config: KeygenConfig) -> Self {
        Self { rng, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &KeygenConfig {
        &self.config
    }

    /// Generates a keyset of exactly `count` keys, compound key last.
    ///
    /// A failure of the random source aborts generation on the spot.
    pub fn generate(&mut self, count: usize) -> Result<Keyset, KeygenError> {
        if count < 2 {
            return Err(KeygenError::TooFewKeys { requested: count });
        }
        let key_length = self.config.key_length;
        if key_length == 0 {
            return Err(KeygenError::ZeroKeyLength);
        }

        let mut keys = Vec::with_capacity(count);
        let mut sums = Zeroizing::new(vec![0u32; key_length]);
        let mut buf = Zeroizing::new(vec![0u8; key_length]);
        for _ in 0..count - 1 {
            self.rng.try_fill_bytes(&mut buf)?;
            accumulate(&mut sums, &buf);
            keys.push(Key::from(&buf[..]));
        }
        keys.push(compound_key(&sums));

        let keyset = Keyset::from_keys(keys)?;
        tracing::debug!(keys = count, key_length, "generated keyset");
        Ok(keyset)
    }
}

/// Generates a keyset of `count` keys of [`DEFAULT_KEY_LENGTH`] bytes from
/// the operating system's random source.
pub fn generate_keyset(count: usize) -> Result<Keyset, KeygenError> {
    KeyGenerator::new(OsRng).generate(count)
}

// Reduced per key, so the running sums never overflow.
fn accumulate(sums: &mut [u32], key: &[u8]) {
    for (sum, &byte) in sums.iter_mut().zip(key.iter()) {
        *sum = (*sum + to_field(byte)) % ORDER;
    }
}

fn compound_key(sums: &[u32]) -> Key {
    Key::from(sums.iter().map(|&sum| to_stored(sum)).collect::<Vec<u8>>())
}
