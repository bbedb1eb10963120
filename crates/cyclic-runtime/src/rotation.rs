//! Per-call rotation state: the root-row queue and the key odometer.
//!
//! The cursor walks the odd root indices `1, 3, .., 255`. Each wrap of the
//! cursor is one rotation tick. A tick advances the odometer: digit 0
//! multiplies its working exponent by 3 on every tick, and each digit that
//! completes `ROTATION_RADIX` steps (its multiplier is back to 1) carries one
//! step into the next digit. The keystream therefore does not repeat before
//! `128 * ROTATION_RADIX^key_len` bytes for keys with odd exponents.

use cyclic_core::{to_field, Tables, ORDER, P, ROTATION_RADIX, ROTATION_STEP};
use zeroize::{Zeroize, ZeroizeOnDrop};

const FIRST_ROOT_INDEX: u32 = 1;
const ROOT_INDEX_STRIDE: u32 = 2;
const LAST_ROOT_INDEX: u32 = P - 2;

/// Rotation state for one transform call. Never shared across calls.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RotationState {
    cursor: u32,
    // one row per key byte plus a lookahead slot
    queue: Vec<usize>,
    base: Vec<u32>,
    working: Vec<u32>,
    multipliers: Vec<u32>,
    generations: Vec<u32>,
    ticks: u64,
}

impl RotationState {
    /// Seeds the queue from the start of the cursor walk and loads the key.
    pub fn new(tables: &Tables, key: &[u8]) -> Self {
        let base: Vec<u32> = key.iter().map(|&byte| to_field(byte) % ORDER).collect();
        let mut state = Self {
            cursor: FIRST_ROOT_INDEX,
            queue: Vec::with_capacity(key.len() + 1),
            working: base.clone(),
            multipliers: vec![1; key.len()],
            generations: vec![0; key.len()],
            base,
            ticks: 0,
        };
        for _ in 0..=key.len() {
            let row = tables.root_row(state.cursor);
            state.queue.push(row);
            state.step_cursor();
        }
        state
    }

    /// Number of key bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.working.len()
    }

    /// Whether the state was built from an empty key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    /// Table row currently queued for key byte `position`.
    #[inline]
    pub fn row(&self, position: usize) -> usize {
        self.queue[position]
    }

    /// Working exponent of key byte `position` (`0..256`).
    #[inline]
    pub fn working(&self, position: usize) -> usize {
        self.working[position] as usize
    }

    /// Shifts the next row into `position` from the slot behind it.
    #[inline]
    pub fn advance_queue(&mut self, position: usize) {
        self.queue[position] = self.queue[position + 1];
    }

    /// Pushes the cursor's row into the lookahead slot and steps the cursor.
    ///
    /// Returns `true` when the cursor wrapped back to the first root index.
    #[inline]
    pub fn push_next_row(&mut self, tables: &Tables) -> bool {
        let last = self.queue.len() - 1;
        self.queue[last] = tables.root_row(self.cursor);
        self.step_cursor()
    }

    /// Advances the odometer by one step.
    pub fn tick(&mut self) {
        self.ticks += 1;
        for digit in 0..self.working.len() {
            self.multipliers[digit] = self.multipliers[digit] * ROTATION_STEP % ORDER;
            self.generations[digit] += 1;
            self.working[digit] = self.base[digit] * self.multipliers[digit] % ORDER;
            if self.generations[digit] < ROTATION_RADIX {
                break;
            }
            self.generations[digit] = 0;
        }
    }

    /// Rotation ticks completed so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Odometer digits, shallowest first.
    #[inline]
    pub fn generations(&self) -> &[u32] {
        &self.generations
    }

    fn step_cursor(&mut self) -> bool {
        self.cursor += ROOT_INDEX_STRIDE;
        if self.cursor > LAST_ROOT_INDEX {
            self.cursor = FIRST_ROOT_INDEX;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyclic_core::{build_tables, ROOT_ROWS};

    #[test]
    fn queue_is_seeded_from_the_cursor_walk() {
        let tables = build_tables();
        let state = RotationState::new(tables, &[0, 1, 2]);
        for slot in 0..4 {
            let cursor = FIRST_ROOT_INDEX + ROOT_INDEX_STRIDE * slot as u32;
            assert_eq!(state.queue[slot], tables.root_row(cursor));
        }
        assert_eq!(state.cursor, 9);
    }

    #[test]
    fn working_exponents_start_at_field_values() {
        let state = RotationState::new(build_tables(), &[0, 9, 255]);
        assert_eq!(state.working(0), 1);
        assert_eq!(state.working(1), 10);
        assert_eq!(state.working(2), 0);
    }

    #[test]
    fn cursor_wraps_once_per_root_cycle() {
        let tables = build_tables();
        let mut state = RotationState::new(tables, &[7]);
        let wraps = (0..ROOT_ROWS * 3)
            .filter(|_| state.push_next_row(tables))
            .count();
        assert_eq!(wraps, 3);
    }

    #[test]
    fn first_digit_multiplies_by_three_each_tick() {
        let mut state = RotationState::new(build_tables(), &[4, 4]);
        state.tick();
        assert_eq!(state.working(0), 15);
        assert_eq!(state.working(1), 5);
        state.tick();
        assert_eq!(state.working(0), 45);
        assert_eq!(state.generations(), &[2, 0]);
    }

    #[test]
    fn carry_happens_after_a_full_digit_cycle() {
        let mut state = RotationState::new(build_tables(), &[2, 2, 2]);
        for _ in 0..ROTATION_RADIX {
            state.tick();
        }
        assert_eq!(state.generations(), &[0, 1, 0]);
        assert_eq!(state.working(0), 3);
        assert_eq!(state.working(1), 9);
        assert_eq!(state.working(2), 3);
    }

    #[test]
    fn odometer_returns_to_start_after_full_period() {
        let mut state = RotationState::new(build_tables(), &[6, 10]);
        let start: Vec<usize> = (0..2).map(|j| state.working(j)).collect();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..ROTATION_RADIX * ROTATION_RADIX {
            assert!(seen.insert((state.working(0), state.working(1))));
            state.tick();
        }
        let end: Vec<usize> = (0..2).map(|j| state.working(j)).collect();
        assert_eq!(start, end);
        assert_eq!(state.generations(), &[0, 0]);
        assert_eq!(state.ticks(), u64::from(ROTATION_RADIX * ROTATION_RADIX));
    }
}
