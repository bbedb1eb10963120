//! Field arithmetic, lookup tables and key types for the cyclic keyset cipher.
//!
//! The cipher works over the prime field GF(257) with generator 3. This crate
//! provides:
//! - Constant-time exponentiation and modular inverses.
//! - The power-mod and inverse lookup tables, built once per process.
//! - `Key` and `Keyset`, including the sum-to-compound invariant check.
//!
//! This is an experimental construction. It has not been analysed and gives
//! no authenticity guarantees.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod field;
mod key;
mod tables;

pub use crate::error::{KeysetError, TableError};
pub use crate::field::{
    ct_select, mod_inverse, multiplicative_order, pow_mod, to_field, to_stored, EXPONENT_COLUMNS,
    GENERATOR, ORDER, P, ROOT_ROWS, ROTATION_RADIX, ROTATION_STEP,
};
pub use crate::key::{Key, Keyset};
pub use crate::tables::{build_tables, root_index, Tables};
