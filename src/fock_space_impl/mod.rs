//! Fock spaces and the addressing of their occupation number vectors
//!
//! Every ONV in a Fock space of `K` orbitals and `N` electrons gets a unique
//! address in `[0, C(K, N))`. The spaces here share the [`FockPermutator`]
//! interface so that iteration and address lookup look the same for a full,
//! a frozen-core or a spin-resolved product space.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fock_ci::fock_space_impl::{FockPermutator, FockSpace};
//!
//! let fock_space = FockSpace::new(4, 2)?;
//! let mut onv = fock_space.make_onv(0); // 0011
//! fock_space.set_next_onv(&mut onv);    // 0101
//! assert_eq!(fock_space.get_onv_address(&onv), 1);
//! ```

mod fock_space;
mod frozen;
mod product;
mod selected;
mod tests;

pub use fock_space::FockSpace;
pub use frozen::{FrozenFockSpace, FrozenProductFockSpace};
pub use product::ProductFockSpace;
pub use selected::{Configuration, SelectedFockSpace};

use crate::onv::Onv;
use nalgebra::DVector;

/// Address arithmetic shared by every single-spin Fock space
pub trait FockPermutator {
    /// Number of orbitals
    fn k(&self) -> usize;

    /// Number of electrons
    fn n(&self) -> usize;

    /// Number of ONVs in the space
    fn dimension(&self) -> usize;

    /// Address of the ONV with the given bit pattern
    fn get_address(&self, representation: u64) -> usize;

    /// Bit pattern of the ONV at `address`
    fn calculate_representation(&self, address: usize) -> u64;

    /// Bit pattern of the ONV at the next address
    fn ulong_next_permutation(&self, representation: u64) -> u64;

    fn make_onv(&self, address: usize) -> Onv {
        Onv::new_unchecked(self.k(), self.n(), self.calculate_representation(address))
    }

    /// Advance `onv` to the next address; the occupation indices are resynchronised
    fn set_next_onv(&self, onv: &mut Onv) {
        onv.set_representation(self.ulong_next_permutation(onv.representation()));
    }

    fn get_onv_address(&self, onv: &Onv) -> usize {
        self.get_address(onv.representation())
    }

    /// Unit vector on address 0, the lowest-orbitals-occupied reference
    fn hartree_fock_expansion(&self) -> DVector<f64> {
        let mut expansion = DVector::zeros(self.dimension());
        expansion[0] = 1.0;
        expansion
    }
}
