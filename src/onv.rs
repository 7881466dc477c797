//! Occupation number vectors
//!
//! An ONV is a string of creation operators acting on the vacuum, stored as a
//! bitstring in reverse lexical order: the least significant bit is orbital 0.
//! Three electrons in the first three of four orbitals read `0111` (7).

use crate::error::{invalid, Result};
use std::fmt;

/// Number of orbitals a single `u64` representation can hold
pub const MAX_ORBITALS: usize = 64;

#[derive(Debug, Clone)]
pub struct Onv {
    k: usize,
    n: usize,
    representation: u64,
    /// `occupation_indices[e]` is the orbital occupied by electron `e`, ascending
    occupation_indices: Vec<usize>,
}

impl Onv {
    /// Create an ONV for `k` orbitals and `n` electrons from its bit pattern
    ///
    /// # Arguments
    ///
    /// * `k` - Number of spatial orbitals (at most 64)
    /// * `n` - Number of electrons, must equal the number of set bits
    /// * `representation` - Bit pattern, bit `p` set when orbital `p` is occupied
    pub fn new(k: usize, n: usize, representation: u64) -> Result<Self> {
        if k > MAX_ORBITALS {
            return invalid(format!(
                "an ONV holds at most {} orbitals, {} were requested",
                MAX_ORBITALS, k
            ));
        }
        if k < MAX_ORBITALS && representation >> k != 0 {
            return invalid(format!(
                "representation {:#b} has bits set beyond orbital {}",
                representation,
                k - 1
            ));
        }
        if representation.count_ones() as usize != n {
            return invalid(format!(
                "representation {:#b} does not hold {} electrons",
                representation, n
            ));
        }
        Ok(Self::new_unchecked(k, n, representation))
    }

    /// Construct without validation; callers guarantee the invariants
    pub(crate) fn new_unchecked(k: usize, n: usize, representation: u64) -> Self {
        let mut onv = Onv {
            k,
            n,
            representation,
            occupation_indices: Vec::with_capacity(n),
        };
        onv.update_occupation_indices();
        onv
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn representation(&self) -> u64 {
        self.representation
    }

    pub fn occupation_indices(&self) -> &[usize] {
        &self.occupation_indices
    }

    /// Orbital occupied by electron `electron_index`
    #[inline]
    pub fn occupied_index(&self, electron_index: usize) -> usize {
        self.occupation_indices[electron_index]
    }

    /// Replace the bit pattern and resynchronise the occupation indices
    pub fn set_representation(&mut self, representation: u64) {
        self.representation = representation;
        self.update_occupation_indices();
    }

    /// Rebuild the occupied-orbital list from the raw bit pattern
    ///
    /// Raw edits through `annihilate`/`create` leave the list stale until this is called.
    pub fn update_occupation_indices(&mut self) {
        self.occupation_indices.clear();
        let mut bits = self.representation;
        while bits != 0 {
            self.occupation_indices.push(bits.trailing_zeros() as usize);
            bits &= bits - 1;
        }
        self.n = self.occupation_indices.len();
    }

    #[inline]
    pub fn is_occupied(&self, p: usize) -> bool {
        p < MAX_ORBITALS && self.representation & (1u64 << p) != 0
    }

    /// Clear bit `p`; returns false and leaves the ONV untouched if it was already clear
    pub fn annihilate(&mut self, p: usize) -> bool {
        if !self.is_occupied(p) {
            return false;
        }
        self.representation &= !(1u64 << p);
        true
    }

    /// Set bit `p`; returns false and leaves the ONV untouched if it was already set
    pub fn create(&mut self, p: usize) -> bool {
        if p >= self.k || self.is_occupied(p) {
            return false;
        }
        self.representation |= 1u64 << p;
        true
    }

    /// Annihilate at `p` and return the fermionic phase factor of the operation
    pub fn annihilate_with_sign(&mut self, p: usize) -> Option<i32> {
        let phase = self.operator_phase_factor(p);
        self.annihilate(p).then_some(phase)
    }

    /// Create at `p` and return the fermionic phase factor of the operation
    pub fn create_with_sign(&mut self, p: usize) -> Option<i32> {
        let phase = self.operator_phase_factor(p);
        self.create(p).then_some(phase)
    }

    /// Phase factor (+1 or -1) of a single operator acting on orbital `p`
    ///
    /// With `m` electrons in the orbitals below `p`, the factor is `(-1)^m`.
    pub fn operator_phase_factor(&self, p: usize) -> i32 {
        let below = if p >= MAX_ORBITALS {
            self.representation
        } else {
            self.representation & ((1u64 << p) - 1)
        };
        if below.count_ones() % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Bits in `[index_start, index_end)`, shifted down to start at bit 0
    ///
    /// `"010011".slice(1, 4)` gives `"001"`.
    pub fn slice(&self, index_start: usize, index_end: usize) -> Result<u64> {
        if index_end > self.k || index_start >= index_end {
            return invalid(format!(
                "slice [{}, {}) is not a valid range for {} orbitals",
                index_start, index_end, self.k
            ));
        }
        let width = index_end - index_start;
        let shifted = self.representation >> index_start;
        if width == MAX_ORBITALS {
            Ok(shifted)
        } else {
            Ok(shifted & ((1u64 << width) - 1))
        }
    }

    /// Number of orbitals whose occupation differs between the two ONVs
    pub fn count_number_of_differences(&self, other: &Onv) -> usize {
        (self.representation ^ other.representation).count_ones() as usize
    }

    /// Orbitals occupied only in `self`, and orbitals occupied only in `other`
    pub fn find_differences(&self, other: &Onv) -> (Vec<usize>, Vec<usize>) {
        (
            set_bits(self.representation & !other.representation),
            set_bits(other.representation & !self.representation),
        )
    }
}

fn set_bits(mut bits: u64) -> Vec<usize> {
    let mut indices = Vec::with_capacity(bits.count_ones() as usize);
    while bits != 0 {
        indices.push(bits.trailing_zeros() as usize);
        bits &= bits - 1;
    }
    indices
}

impl PartialEq for Onv {
    fn eq(&self, other: &Self) -> bool {
        self.representation == other.representation
    }
}

impl Eq for Onv {}

impl fmt::Display for Onv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in (0..self.k).rev() {
            write!(f, "{}", if self.is_occupied(p) { '1' } else { '0' })?;
        }
        Ok(())
    }
}
