//! Keystream transform.
//!
//! For each message byte the key product is
//! `kp = Π_j root_{row(j)}^{working(j)} mod 257`, optionally inverted, and
//! the output byte is `(byte + 1) * kp mod 257` in the stored convention.
//! Every key in a keyset sees the same row schedule and the same rotation
//! multipliers, so the key products of a whole keyset multiply to 1.

use cyclic_core::{build_tables, ct_select, to_field, to_stored, Keyset, Tables, P};

use crate::rotation::RotationState;

// Three factors of at most 256 on top of a reduced product stay below 2^33.
const REDUCE_EVERY: u8 = 3;

/// Cipher engine bound to a set of lookup tables.
#[derive(Clone, Copy, Debug)]
pub struct Cipher<'t> {
    tables: &'t Tables,
}

impl<'t> Cipher<'t> {
    /// Creates an engine over `tables`.
    pub fn new(tables: &'t Tables) -> Self {
        Self { tables }
    }

    /// The tables this engine reads.
    pub fn tables(&self) -> &'t Tables {
        self.tables
    }

    /// Transforms `input` with one key. The output has the input's length.
    ///
    /// Whether this "encrypts" or "decrypts" depends only on where the
    /// message is in its keyset traversal. `invert` must be set for exactly
    /// one key of a keyset, the compound key.
    pub fn transform(&self, input: &[u8], key: &[u8], invert: bool) -> Vec<u8> {
        let mut output = input.to_vec();
        self.transform_in_place(&mut output, key, invert);
        output
    }

    /// Transforms `buf` in place; same keystream as [`Cipher::transform`].
    pub fn transform_in_place(&self, buf: &mut [u8], key: &[u8], invert: bool) {
        tracing::trace!(len = buf.len(), key_len = key.len(), "transform");
        let tables = self.tables;
        let mut state = RotationState::new(tables, key);
        for byte in buf.iter_mut() {
            let product = key_product(tables, &mut state);
            let product = finish_product(product, invert, |value| tables.inverse(value));
            if state.push_next_row(tables) {
                state.tick();
            }
            *byte = to_stored(to_field(*byte) * product % P);
        }
    }

    /// Applies every key of `keyset` once, forward keys first, compound key
    /// inverted last. Returns `message` unchanged.
    pub fn apply_keyset(&self, message: &[u8], keyset: &Keyset) -> Vec<u8> {
        let mut state = message.to_vec();
        for (key, invert) in keyset.schedule() {
            self.transform_in_place(&mut state, key.as_bytes(), invert);
        }
        state
    }
}

impl Cipher<'static> {
    /// Engine over the process-wide tables, building them on first use.
    pub fn global() -> Self {
        Self::new(build_tables())
    }
}

/// [`Cipher::transform`] over the process-wide tables.
pub fn transform(input: &[u8], key: &[u8], invert: bool) -> Vec<u8> {
    Cipher::global().transform(input, key, invert)
}

/// [`Cipher::apply_keyset`] over the process-wide tables.
pub fn apply_keyset(message: &[u8], keyset: &Keyset) -> Vec<u8> {
    Cipher::global().apply_keyset(message, keyset)
}

fn key_product(tables: &Tables, state: &mut RotationState) -> u32 {
    let modulus = u64::from(P);
    let mut product = 1u64;
    let mut pending = 0u8;
    for position in 0..state.len() {
        product *= u64::from(tables.power(state.row(position), state.working(position)));
        pending += 1;
        if pending == REDUCE_EVERY {
            product %= modulus;
            pending = 0;
        }
        state.advance_queue(position);
    }
    (product % modulus) as u32
}

/// Resolves the invert decision with one inverse lookup and one select on
/// both paths.
#[inline]
fn finish_product(product: u32, invert: bool, inverse: impl Fn(u32) -> u32) -> u32 {
    let inverted = inverse(product);
    ct_select(u32::from(invert), inverted, product)
}
