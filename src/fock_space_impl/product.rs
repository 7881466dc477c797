use super::{FockPermutator, FockSpace};
use crate::error::{CiError, Result};
use nalgebra::DVector;

/// Spin-resolved Fock space: every alpha string combined with every beta string
///
/// The compound address of `(I_alpha, I_beta)` is `I_alpha * dim_beta + I_beta`,
/// so all determinants sharing an alpha string form one contiguous block.
#[derive(Debug, Clone)]
pub struct ProductFockSpace {
    fock_space_alpha: FockSpace,
    fock_space_beta: FockSpace,
    dim: usize,
}

impl ProductFockSpace {
    /// # Arguments
    ///
    /// * `k` - Number of spatial orbitals
    /// * `n_alpha` - Number of alpha electrons
    /// * `n_beta` - Number of beta electrons
    pub fn new(k: usize, n_alpha: usize, n_beta: usize) -> Result<Self> {
        let fock_space_alpha = FockSpace::new(k, n_alpha)?;
        let fock_space_beta = FockSpace::new(k, n_beta)?;
        let dim = fock_space_alpha
            .dimension()
            .checked_mul(fock_space_beta.dimension())
            .ok_or_else(|| {
                CiError::Overflow(format!(
                    "the product space of C({k}, {n_alpha}) and C({k}, {n_beta}) determinants is too large"
                ))
            })?;

        Ok(ProductFockSpace {
            fock_space_alpha,
            fock_space_beta,
            dim,
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

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn fock_space_alpha(&self) -> &FockSpace {
        &self.fock_space_alpha
    }

    pub fn fock_space_beta(&self) -> &FockSpace {
        &self.fock_space_beta
    }

    #[inline]
    pub fn compound_address(&self, address_alpha: usize, address_beta: usize) -> usize {
        address_alpha * self.fock_space_beta.dimension() + address_beta
    }

    /// Unit vector on the determinant built from both lowest strings
    pub fn hartree_fock_expansion(&self) -> DVector<f64> {
        let mut expansion = DVector::zeros(self.dim);
        expansion[0] = 1.0;
        expansion
    }
}
