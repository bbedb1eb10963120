//! Key and keyset types.

use core::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::KeysetError;
use crate::field::{to_field, ORDER};

/// One cipher key: a stored field exponent per byte.
///
/// Key bytes are wiped when the key is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Key(Vec<u8>);

impl Key {
    /// Raw stored bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of key bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field value of the byte at `position`.
    #[inline]
    pub fn exponent(&self, position: usize) -> u32 {
        to_field(self.0[position])
    }
}

impl From<Vec<u8>> for Key {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for Key {
    fn from(value: &[u8]) -> Self {
        Self(value.to_vec())
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key([REDACTED; {}])", self.0.len())
    }
}

/// Keys that jointly return a message to its original state.
///
/// The last key is the compound key: per byte position its exponent is the
/// sum of the other keys' exponents modulo 256. Forward keys are applied
/// with `invert = false` and the compound key with `invert = true`, in any
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Key>", into = "Vec<Key>")]
pub struct Keyset {
    keys: Vec<Key>,
}

impl Keyset {
    /// Validates `keys` as a keyset whose last entry is the compound key.
    pub fn from_keys(keys: Vec<Key>) -> Result<Self, KeysetError> {
        if keys.len() < 2 {
            return Err(KeysetError::TooFewKeys { count: keys.len() });
        }
        let expected = keys[0].len();
        for (index, key) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(KeysetError::EmptyKey { index });
            }
            if key.len() != expected {
                return Err(KeysetError::KeyLengthMismatch {
                    index,
                    expected,
                    found: key.len(),
                });
            }
        }
        let keyset = Self { keys };
        if let Err(err) = keyset.verify() {
            tracing::warn!(%err, keys = keyset.len(), "rejected keyset");
            return Err(err);
        }
        Ok(keyset)
    }

    /// Checks that the forward keys sum to the compound key at every byte.
    pub fn verify(&self) -> Result<(), KeysetError> {
        let Some((compound, forward)) = self.keys.split_last() else {
            return Err(KeysetError::TooFewKeys { count: 0 });
        };
        for position in 0..compound.len() {
            let sum = forward
                .iter()
                .fold(0u32, |acc, key| (acc + key.exponent(position)) % ORDER);
            if sum != compound.exponent(position) % ORDER {
                return Err(KeysetError::InvariantViolated { position });
            }
        }
        Ok(())
    }

    /// Number of keys, compound key included.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false: a keyset holds at least two keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Byte length shared by every key.
    #[inline]
    pub fn key_length(&self) -> usize {
        self.keys[0].len()
    }

    /// All keys in order, compound key last.
    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Key at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Key> {
        self.keys.get(index)
    }

    /// The key applied with `invert = true`.
    #[inline]
    pub fn compound(&self) -> &Key {
        &self.keys[self.keys.len() - 1]
    }

    /// Keys applied with `invert = false`.
    #[inline]
    pub fn forward_keys(&self) -> &[Key] {
        &self.keys[..self.keys.len() - 1]
    }

    /// Whether the key at `index` is the compound key.
    #[inline]
    pub fn is_compound(&self, index: usize) -> bool {
        index + 1 == self.keys.len()
    }

    /// Every key paired with its invert flag, in stored order.
    pub fn schedule(&self) -> impl Iterator<Item = (&Key, bool)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| (key, self.is_compound(index)))
    }
}

impl TryFrom<Vec<Key>> for Keyset {
    type Error = KeysetError;

    fn try_from(value: Vec<Key>) -> Result<Self, Self::Error> {
        Self::from_keys(value)
    }
}

impl From<Keyset> for Vec<Key> {
    fn from(value: Keyset) -> Self {
        value.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(bytes: &[u8]) -> Key {
        Key::from(bytes)
    }

    #[test]
    fn accepts_forward_sum_as_compound() {
        // field values: 1 + 3 = 4, 255 + 2 = 257 ≡ 1
        let keyset = Keyset::from_keys(vec![key(&[0, 254]), key(&[2, 1]), key(&[3, 0])])
            .expect("valid keyset");
        assert_eq!(keyset.len(), 3);
        assert_eq!(keyset.key_length(), 2);
        assert_eq!(keyset.compound().as_bytes(), &[3, 0]);
        assert_eq!(keyset.forward_keys().len(), 2);
        assert!(keyset.is_compound(2));
        assert!(!keyset.is_compound(0));
    }

    #[test]
    fn zero_sum_is_stored_as_255() {
        // 128 + 128 = 256 ≡ 0, stored as 255
        let keyset =
            Keyset::from_keys(vec![key(&[127]), key(&[127]), key(&[255])]).expect("valid");
        assert_eq!(keyset.compound().exponent(0) % ORDER, 0);
    }

    #[test]
    fn rejects_single_key() {
        assert_eq!(
            Keyset::from_keys(vec![key(&[1, 2])]),
            Err(KeysetError::TooFewKeys { count: 1 })
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        assert_eq!(
            Keyset::from_keys(vec![key(&[1, 2]), key(&[1])]),
            Err(KeysetError::KeyLengthMismatch {
                index: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_empty_keys() {
        assert_eq!(
            Keyset::from_keys(vec![key(&[]), key(&[])]),
            Err(KeysetError::EmptyKey { index: 0 })
        );
    }

    #[test]
    fn rejects_broken_sum() {
        assert_eq!(
            Keyset::from_keys(vec![key(&[0, 5]), key(&[0, 6])]),
            Err(KeysetError::InvariantViolated { position: 1 })
        );
    }

    #[test]
    fn schedule_inverts_only_the_compound_key() {
        let keyset = Keyset::from_keys(vec![key(&[4]), key(&[9]), key(&[14])]).expect("valid");
        let flags: Vec<bool> = keyset.schedule().map(|(_, invert)| invert).collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[test]
    fn debug_redacts_key_material() {
        let rendered = format!("{:?}", key(&[0xde, 0xad]));
        assert_eq!(rendered, "Key([REDACTED; 2])");
    }
}
