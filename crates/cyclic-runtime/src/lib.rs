//! Keystream transform for the cyclic keyset cipher.
//!
//! [`Cipher`] borrows the read-only lookup tables and applies one key of a
//! keyset to a message. Tables are built once per process through
//! [`cyclic_core::build_tables`]; after that any number of threads may run
//! transforms in parallel without synchronization.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cipher;
mod rotation;

pub use crate::cipher::{apply_keyset, transform, Cipher};
pub use crate::rotation::RotationState;
