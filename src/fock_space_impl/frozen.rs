//! Fock spaces with a frozen core
//!
//! The lowest `X` orbitals are occupied in every ONV. Addresses are those of
//! the remaining active space of `K - X` orbitals and `N - X` electrons.

use super::{FockPermutator, FockSpace, ProductFockSpace};
use crate::error::{invalid, Result};
use crate::onv::MAX_ORBITALS;

#[derive(Debug, Clone)]
pub struct FrozenFockSpace {
    active_fock_space: FockSpace,
    k: usize,
    n: usize,
    x: usize,
    frozen_mask: u64,
}

impl FrozenFockSpace {
    /// # Arguments
    ///
    /// * `k` - Total number of orbitals
    /// * `n` - Total number of electrons
    /// * `x` - Number of frozen (always occupied) orbitals, `x <= n`
    pub fn new(k: usize, n: usize, x: usize) -> Result<Self> {
        if k > MAX_ORBITALS {
            return invalid(format!(
                "a frozen Fock space holds at most {} orbitals, {} were requested",
                MAX_ORBITALS, k
            ));
        }
        if x > n {
            return invalid(format!(
                "cannot freeze {} orbitals with only {} electrons",
                x, n
            ));
        }
        if n > k {
            return invalid(format!("cannot place {} electrons in {} orbitals", n, k));
        }
        let active_fock_space = FockSpace::new(k - x, n - x)?;
        Ok(FrozenFockSpace {
            active_fock_space,
            k,
            n,
            x,
            frozen_mask: low_bits(x),
        })
    }

    pub fn number_of_frozen_orbitals(&self) -> usize {
        self.x
    }

    pub fn active_fock_space(&self) -> &FockSpace {
        &self.active_fock_space
    }

    /// The active part of a full representation
    fn to_active(&self, representation: u64) -> u64 {
        representation.checked_shr(self.x as u32).unwrap_or(0)
    }

    fn from_active(&self, active_representation: u64) -> u64 {
        active_representation.checked_shl(self.x as u32).unwrap_or(0) | self.frozen_mask
    }
}

impl FockPermutator for FrozenFockSpace {
    fn k(&self) -> usize {
        self.k
    }

    fn n(&self) -> usize {
        self.n
    }

    fn dimension(&self) -> usize {
        self.active_fock_space.dimension()
    }

    fn get_address(&self, representation: u64) -> usize {
        debug_assert_eq!(representation & self.frozen_mask, self.frozen_mask);
        self.active_fock_space
            .get_address(self.to_active(representation))
    }

    fn calculate_representation(&self, address: usize) -> u64 {
        self.from_active(self.active_fock_space.calculate_representation(address))
    }

    fn ulong_next_permutation(&self, representation: u64) -> u64 {
        let active = self
            .active_fock_space
            .ulong_next_permutation(self.to_active(representation));
        self.from_active(active)
    }
}

/// Alpha and beta frozen spaces sharing the same orbitals and frozen core
#[derive(Debug, Clone)]
pub struct FrozenProductFockSpace {
    fock_space_alpha: FrozenFockSpace,
    fock_space_beta: FrozenFockSpace,
    active_product_fock_space: ProductFockSpace,
    x: usize,
}

impl FrozenProductFockSpace {
    /// # Arguments
    ///
    /// * `k` - Total number of orbitals
    /// * `n_alpha`, `n_beta` - Electrons of each spin
    /// * `x` - Number of frozen spatial orbitals, doubly occupied in every determinant
    pub fn new(k: usize, n_alpha: usize, n_beta: usize, x: usize) -> Result<Self> {
        let fock_space_alpha = FrozenFockSpace::new(k, n_alpha, x)?;
        let fock_space_beta = FrozenFockSpace::new(k, n_beta, x)?;
        let active_product_fock_space = ProductFockSpace::new(k - x, n_alpha - x, n_beta - x)?;
        Ok(FrozenProductFockSpace {
            fock_space_alpha,
            fock_space_beta,
            active_product_fock_space,
            x,
        })
    }

    pub fn k(&self) -> usize {
        self.fock_space_alpha.k()
    }

    pub fn n_alpha(&self) -> usize {
        self.fock_space_alpha.n()
    }

    pub fn n_beta(&self) -> usize {
        self.fock_space_beta.n()
    }

    pub fn number_of_frozen_orbitals(&self) -> usize {
        self.x
    }

    pub fn dimension(&self) -> usize {
        self.active_product_fock_space.dimension()
    }

    pub fn fock_space_alpha(&self) -> &FrozenFockSpace {
        &self.fock_space_alpha
    }

    pub fn fock_space_beta(&self) -> &FrozenFockSpace {
        &self.fock_space_beta
    }

    /// The product space of the active orbitals, on which frozen-core builders act
    pub fn active_product_fock_space(&self) -> &ProductFockSpace {
        &self.active_product_fock_space
    }
}

fn low_bits(count: usize) -> u64 {
    if count >= u64::BITS as usize {
        u64::MAX
    } else {
        (1u64 << count) - 1
    }
}
