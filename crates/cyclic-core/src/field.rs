//! Arithmetic over the prime field GF(257).
//!
//! Field elements live in `1..=256` and are stored in a byte as `value - 1`.
//! Exponents live modulo the group order 256, so the same byte convention
//! also covers key exponents, with exponent 0 sharing the stored byte 255
//! with exponent 256.

/// Field modulus.
pub const P: u32 = 257;

/// Order of the multiplicative group, `P - 1`.
pub const ORDER: u32 = P - 1;

/// Primitive root every table row is derived from.
pub const GENERATOR: u32 = 3;

/// Number of power rows: one per odd root index below `ORDER`.
pub const ROOT_ROWS: usize = (ORDER / 2) as usize;

/// Exponent columns per power row (`0..=256`).
pub const EXPONENT_COLUMNS: usize = P as usize;

/// Factor applied to a working key exponent on each rotation step.
pub const ROTATION_STEP: u32 = 3;

/// Rotation steps before a digit's multiplier returns to 1.
pub const ROTATION_RADIX: u32 = multiplicative_order(ROTATION_STEP, ORDER);

const EXPONENT_BITS: u32 = 8;

/// Converts a stored byte to its field value.
#[inline]
pub const fn to_field(stored: u8) -> u32 {
    stored as u32 + 1
}

/// Converts a field value (or exponent) to its stored byte.
///
/// The value is reduced modulo `ORDER` first.
#[inline]
pub const fn to_stored(value: u32) -> u8 {
    ((value % ORDER + ORDER - 1) % ORDER) as u8
}

/// Returns `a` when `choice == 1` and `b` when `choice == 0`, without branching.
#[inline]
pub const fn ct_select(choice: u32, a: u32, b: u32) -> u32 {
    let mask = 0u32.wrapping_sub(choice & 1);
    (a & mask) | (b & !mask)
}

/// Computes `base^exp mod P` with a fixed 8-round square-and-multiply.
///
/// Every round squares and then multiplies by either `base` or 1, so the
/// work does not depend on the exponent bits. The exponent is reduced
/// modulo `ORDER`, which is exact for any nonzero `base`.
pub fn pow_mod(base: u32, exp: u32) -> u32 {
    let base = base % P;
    let exp = exp % ORDER;
    let mut acc = 1u32;
    for bit in (0..EXPONENT_BITS).rev() {
        acc = acc * acc % P;
        let factor = ct_select((exp >> bit) & 1, base, 1);
        acc = acc * factor % P;
    }
    acc
}

/// Multiplicative inverse modulo `P` by the extended Euclidean algorithm.
///
/// Returns `None` for zero.
pub fn mod_inverse(value: u32) -> Option<u32> {
    let value = value % P;
    if value == 0 {
        return None;
    }
    let (mut old_r, mut r) = (i64::from(value), i64::from(P));
    let (mut old_s, mut s) = (1i64, 0i64);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(i64::from(P)) as u32)
}

/// Smallest `k > 0` with `base^k ≡ 1 (mod modulus)`, or 0 if there is none.
pub const fn multiplicative_order(base: u32, modulus: u32) -> u32 {
    let base = base % modulus;
    let mut value = base;
    let mut order = 1;
    while value != 1 {
        if order > modulus {
            return 0;
        }
        value = value * base % modulus;
        order += 1;
    }
    order
}
