//! Power-mod and inverse lookup tables for GF(257).
//!
//! Row `r` of the power table belongs to root index `2r + 1`, whose root is
//! `3^(2r + 1) mod 257`. Odd root indices are coprime to the group order
//! 256, so every row is a primitive root. Entry `(r, e)` holds
//! `root_r^e mod 257` in the stored byte convention.

use std::sync::OnceLock;

use crate::error::TableError;
use crate::field::{
    mod_inverse, pow_mod, to_field, to_stored, EXPONENT_COLUMNS, GENERATOR, ORDER, P, ROOT_ROWS,
};

const POWER_ENTRIES: usize = ROOT_ROWS * EXPONENT_COLUMNS;
const FIELD_ELEMENTS: usize = ORDER as usize;

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Precomputed exponentiation and inverse tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    power: Box<[u8]>,
    inverse: [u8; FIELD_ELEMENTS],
}

impl Tables {
    /// Builds both tables from scratch.
    ///
    /// Prefer [`build_tables`], which builds once per process.
    pub fn build() -> Self {
        Self {
            power: build_power_rows(),
            inverse: build_inverse(),
        }
    }

    /// Stored byte for `root_row^exponent`.
    #[inline]
    pub fn power_stored(&self, row: usize, exponent: usize) -> u8 {
        self.power[entry_index(row, exponent)]
    }

    /// Field value of `root_row^exponent`.
    #[inline]
    pub fn power(&self, row: usize, exponent: usize) -> u32 {
        to_field(self.power_stored(row, exponent))
    }

    /// Field value of the inverse of `value` (`1..=256`).
    #[inline]
    pub fn inverse(&self, value: u32) -> u32 {
        to_field(self.inverse[to_stored(value) as usize])
    }

    /// Row selected by a root-index cursor.
    ///
    /// The cursor walks row 0; the stored value halved picks one of the
    /// `ROOT_ROWS` rows.
    #[inline]
    pub fn root_row(&self, cursor: u32) -> usize {
        usize::from(self.power_stored(0, cursor as usize)) / 2
    }

    /// Checks the inverse identity, inverse symmetry and every power row.
    pub fn verify(&self) -> Result<(), TableError> {
        for value in 1..P {
            let inverse = self.inverse(value);
            if value * inverse % P != 1 {
                return Err(TableError::InverseIdentity { value, inverse });
            }
            if self.inverse(inverse) != value {
                return Err(TableError::InverseAsymmetric { value });
            }
        }

        for row in 0..ROOT_ROWS {
            let root = pow_mod(GENERATOR, root_index(row));
            let mut expected = 1u32;
            for exponent in 0..EXPONENT_COLUMNS {
                if self.power(row, exponent) != expected {
                    return Err(TableError::PowerMismatch { row, exponent });
                }
                expected = expected * root % P;
            }
        }
        Ok(())
    }
}

/// Returns the process-wide tables, building and verifying them on first use.
///
/// Concurrent first calls are safe: exactly one thread builds, the others
/// block until the tables are ready. Call it once up front to keep the build
/// cost off the first transform.
///
/// # Panics
///
/// Panics if the freshly built tables fail [`Tables::verify`]. There is no
/// way to continue from broken tables.
pub fn build_tables() -> &'static Tables {
    TABLES.get_or_init(|| {
        let tables = Tables::build();
        if let Err(err) = tables.verify() {
            tracing::error!(%err, "field tables failed self-check");
            panic!("field tables failed self-check: {err}");
        }
        tracing::debug!(
            rows = ROOT_ROWS,
            columns = EXPONENT_COLUMNS,
            "built field tables"
        );
        tables
    })
}

/// Root index encoded by power row `row`.
#[inline]
pub const fn root_index(row: usize) -> u32 {
    2 * row as u32 + 1
}

fn build_power_rows() -> Box<[u8]> {
    let mut data = vec![0u8; POWER_ENTRIES].into_boxed_slice();
    for (row, entries) in data.chunks_exact_mut(EXPONENT_COLUMNS).enumerate() {
        let root = pow_mod(GENERATOR, root_index(row));
        for (exponent, entry) in entries.iter_mut().enumerate() {
            *entry = to_stored(pow_mod(root, exponent as u32));
        }
    }
    data
}

fn build_inverse() -> [u8; FIELD_ELEMENTS] {
    let mut table = [0u8; FIELD_ELEMENTS];
    let mut filled = [false; FIELD_ELEMENTS];
    for value in 1..P {
        let slot = usize::from(to_stored(value));
        if filled[slot] {
            continue;
        }
        let Some(inverse) = mod_inverse(value) else {
            continue;
        };
        let mirror = usize::from(to_stored(inverse));
        table[slot] = to_stored(inverse);
        table[mirror] = to_stored(value);
        filled[slot] = true;
        filled[mirror] = true;
    }
    table
}

#[inline]
const fn entry_index(row: usize, exponent: usize) -> usize {
    row * EXPONENT_COLUMNS + exponent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshly_built_tables_verify() {
        assert_eq!(Tables::build().verify(), Ok(()));
    }

    #[test]
    fn first_row_is_powers_of_three() {
        let tables = build_tables();
        let row: Vec<u32> = (1..=10).map(|e| tables.power(0, e)).collect();
        assert_eq!(row, [3, 9, 27, 81, 243, 215, 131, 136, 151, 196]);
    }

    #[test]
    fn cursor_walk_over_first_row() {
        let tables = build_tables();
        let walk: Vec<u32> = (0..10).map(|i| tables.power(0, 2 * i + 1)).collect();
        assert_eq!(walk, [3, 27, 243, 131, 151, 74, 152, 83, 233, 41]);
    }

    #[test]
    fn inverse_table_is_symmetric() {
        let tables = build_tables();
        for value in 1..P {
            let inverse = tables.inverse(value);
            assert_eq!(value * inverse % P, 1);
            assert_eq!(tables.inverse(inverse), value);
        }
    }

    #[test]
    fn exponent_256_column_is_identity() {
        let tables = build_tables();
        for row in 0..ROOT_ROWS {
            assert_eq!(tables.power(row, 0), 1);
            assert_eq!(tables.power(row, EXPONENT_COLUMNS - 1), 1);
        }
    }

    #[test]
    fn root_rows_stay_in_range() {
        let tables = build_tables();
        for cursor in (1..P - 1).step_by(2) {
            assert!(tables.root_row(cursor) < ROOT_ROWS);
        }
    }

    #[test]
    fn build_is_idempotent() {
        assert_eq!(Tables::build(), Tables::build());
        assert!(std::ptr::eq(build_tables(), build_tables()));
    }

    #[test]
    fn concurrent_first_use_shares_one_instance() {
        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| build_tables() as *const Tables as usize))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("table thread"))
                .collect()
        });
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn verify_detects_corrupted_inverse() {
        let mut tables = Tables::build();
        tables.inverse[to_stored(111) as usize] = to_stored(45);
        // 44 is checked first and no longer round-trips through 111.
        assert_eq!(
            tables.verify(),
            Err(TableError::InverseAsymmetric { value: 44 })
        );
    }

    #[test]
    fn verify_detects_corrupted_power_entry() {
        let mut tables = Tables::build();
        tables.power[entry_index(5, 17)] ^= 1;
        assert_eq!(
            tables.verify(),
            Err(TableError::PowerMismatch {
                row: 5,
                exponent: 17
            })
        );
    }
}
