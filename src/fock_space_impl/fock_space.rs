//! Full Fock space with the vertex-weight addressing scheme
//!
//! Addresses follow the arithmetic-triangle scheme of Helgaker, Jørgensen and
//! Olsen, counted from zero. Bitstrings are read in reverse lexical order, so
//! address 0 is the string with the lowest `N` orbitals occupied.

use super::FockPermutator;
use crate::error::{invalid, CiError, Result};
use crate::onv::{Onv, MAX_ORBITALS};
use tracing::debug;

/// The full Fock space for `k` orbitals and `n` electrons
#[derive(Debug, Clone)]
pub struct FockSpace {
    k: usize,
    n: usize,
    dim: usize,
    /// Row-major `(k+1) x (n+1)` table, zero outside the allowed lattice region
    vertex_weights: Vec<usize>,
}

impl FockSpace {
    /// Build the Fock space and its vertex-weight table
    ///
    /// # Arguments
    ///
    /// * `k` - Number of orbitals (at most 64, one bit each)
    /// * `n` - Number of electrons, `n <= k`
    ///
    /// # Errors
    ///
    /// `Overflow` if `C(k, n)` does not fit an address, `InvalidConfiguration`
    /// if `n > k` or `k` exceeds the bit width of a representation.
    pub fn new(k: usize, n: usize) -> Result<Self> {
        let dim = Self::calculate_dimension(k, n)?;
        if k > MAX_ORBITALS {
            return invalid(format!(
                "a Fock space holds at most {} orbitals, {} were requested",
                MAX_ORBITALS, k
            ));
        }

        let width = n + 1;
        let mut vertex_weights = vec![0usize; (k + 1) * width];

        // The largest reverse lexical string leaves the first k-n orbitals empty,
        // so only the first k-n+1 vertices of column 0 lie on a path.
        for p in 0..(k - n + 1) {
            vertex_weights[p * width] = 1;
        }

        // W(p,m) = W(p-1,m) + W(p-1,m-1)
        for m in 1..=n {
            for p in m..=(k - n + m) {
                vertex_weights[p * width + m] =
                    vertex_weights[(p - 1) * width + m] + vertex_weights[(p - 1) * width + m - 1];
            }
        }

        debug!("Built vertex weights for K={}, N={} (dimension {})", k, n, dim);

        Ok(FockSpace {
            k,
            n,
            dim,
            vertex_weights,
        })
    }

    /// The binomial coefficient `C(k, n)`, the dimension of the Fock space
    pub fn calculate_dimension(k: usize, n: usize) -> Result<usize> {
        if n > k {
            return invalid(format!(
                "cannot place {} electrons in {} orbitals",
                n, k
            ));
        }

        let r = n.min(k - n);
        let mut value: u128 = 1;
        for i in 0..r {
            // C(k, i+1) = C(k, i) * (k - i) / (i + 1) is exact at every step
            value = value
                .checked_mul((k - i) as u128)
                .ok_or_else(|| overflow(k, n))?
                / (i as u128 + 1);
        }

        usize::try_from(value).map_err(|_| overflow(k, n))
    }

    /// Vertex weight `W(p, m)`; zero outside the lattice
    #[inline]
    pub fn vertex_weight(&self, p: usize, m: usize) -> usize {
        if p > self.k || m > self.n {
            return 0;
        }
        self.vertex_weights[p * (self.n + 1) + m]
    }

    /// Walk forward past the occupied orbitals of `onv`, starting at orbital `q`
    /// and electron `e`, correcting `address` for `T` previously annihilated electrons
    #[inline]
    pub fn shift_until_next_unoccupied_orbital<const T: usize>(
        &self,
        onv: &Onv,
        address: &mut usize,
        q: &mut usize,
        e: &mut usize,
    ) {
        while *e < self.n && *q == onv.occupied_index(*e) {
            // +1 on the electron index because the weight table counts electrons from 1
            *address = address
                .wrapping_add(self.vertex_weight(*q, *e + 1 - T))
                .wrapping_sub(self.vertex_weight(*q, *e + 1));
            *e += 1;
            *q += 1;
        }
    }

    /// Like [`Self::shift_until_next_unoccupied_orbital`], flipping `sign` once per crossed electron
    #[inline]
    pub fn shift_until_next_unoccupied_orbital_signed<const T: usize>(
        &self,
        onv: &Onv,
        address: &mut usize,
        q: &mut usize,
        e: &mut usize,
        sign: &mut i32,
    ) {
        while *e < self.n && *q == onv.occupied_index(*e) {
            *address = address
                .wrapping_add(self.vertex_weight(*q, *e + 1 - T))
                .wrapping_sub(self.vertex_weight(*q, *e + 1));
            *e += 1;
            *q += 1;
            *sign = -*sign;
        }
    }

    /// Walk backward past the occupied orbitals of `onv`, correcting `address`
    /// for `T` newly created electrons and flipping `sign` once per crossing
    ///
    /// `q` and `e` become negative once the walk passes orbital 0 / the first electron.
    #[inline]
    pub fn shift_until_previous_unoccupied_orbital<const T: usize>(
        &self,
        onv: &Onv,
        address: &mut usize,
        q: &mut isize,
        e: &mut isize,
        sign: &mut i32,
    ) {
        while *e >= 0 && *q == onv.occupied_index(*e as usize) as isize {
            let (orbital, electron) = (*q as usize, *e as usize);
            *address = address
                .wrapping_add(self.vertex_weight(orbital, electron + 1 + T))
                .wrapping_sub(self.vertex_weight(orbital, electron + 1));
            *e -= 1;
            *q -= 1;
            *sign = -*sign;
        }
    }

    /// Number of ONVs with a larger address that couple to `onv` through a one-electron operator
    pub fn count_one_electron_couplings(&self, onv: &Onv) -> usize {
        let v = self.k - self.n;
        (0..self.n)
            .map(|e1| v + e1 - onv.occupied_index(e1))
            .sum()
    }

    /// Number of ONVs with a larger address that couple to `onv` through a two-electron operator
    ///
    /// A double replacement {p1 < p2} -> {q1 < q2} raises the address exactly when
    /// `q2 > p2`. With `u` empty orbitals above `p2` there are `C(u, 2) + u (V - u)`
    /// such target pairs for every choice of `p1 < p2`.
    pub fn count_two_electron_couplings(&self, onv: &Onv) -> usize {
        let v = self.k - self.n;
        let mut coupling_count = 0;

        for e1 in 0..self.n {
            let p = onv.occupied_index(e1);
            coupling_count += v + e1 - p;

            for e2 in (e1 + 1)..self.n {
                let q = onv.occupied_index(e2);
                let above = v + e2 - q;
                coupling_count += (v - above) * above + pairs(above);
            }
        }

        coupling_count
    }

    /// Off-diagonal one-electron couplings in the whole space, both directions
    pub fn count_total_one_electron_couplings(&self) -> usize {
        (self.k - self.n) * self.n * self.dim
    }

    /// Off-diagonal two-electron couplings in the whole space, both directions
    pub fn count_total_two_electron_couplings(&self) -> usize {
        pairs(self.k - self.n) * pairs(self.n) * self.dim + self.count_total_one_electron_couplings()
    }
}

impl FockPermutator for FockSpace {
    fn k(&self) -> usize {
        self.k
    }

    fn n(&self) -> usize {
        self.n
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn get_address(&self, representation: u64) -> usize {
        debug_assert_eq!(representation.count_ones() as usize, self.n);

        let mut address = 0;
        let mut electron_count = 0;
        let mut bits = representation;
        while bits != 0 {
            let p = bits.trailing_zeros() as usize;
            electron_count += 1;
            address += self.vertex_weight(p, electron_count);
            bits &= bits - 1;
        }
        address
    }

    fn calculate_representation(&self, address: usize) -> u64 {
        let mut representation = 0u64;
        if self.n == 0 {
            return representation;
        }

        let mut address = address;
        let mut m = self.n;
        for p in (1..=self.k).rev() {
            let weight = self.vertex_weight(p - 1, m);
            if weight <= address {
                // a diagonal move in the lattice: orbital p-1 is occupied
                address -= weight;
                representation |= 1u64 << (p - 1);
                m -= 1;
                if m == 0 {
                    break;
                }
            }
        }
        representation
    }

    /// Next bit pattern with the same population count (011 -> 101 -> 110)
    fn ulong_next_permutation(&self, representation: u64) -> u64 {
        next_permutation(representation)
    }
}

/// Lexicographically next bit pattern with the same number of set bits
pub(crate) fn next_permutation(representation: u64) -> u64 {
    if representation == 0 {
        return 0;
    }
    // t has the trailing zeros of the representation set to one
    let t = representation | (representation - 1);
    let t_plus = t.wrapping_add(1);
    let fill = ((!t & t_plus).wrapping_sub(1))
        .checked_shr(representation.trailing_zeros() + 1)
        .unwrap_or(0);
    t_plus | fill
}

fn pairs(count: usize) -> usize {
    if count < 2 {
        0
    } else {
        count * (count - 1) / 2
    }
}

fn overflow(k: usize, n: usize) -> CiError {
    CiError::Overflow(format!(
        "the dimension C({}, {}) does not fit in a {}-bit address",
        k,
        n,
        usize::BITS
    ))
}
