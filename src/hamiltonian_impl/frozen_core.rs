//! Frozen-core decorator
//!
//! The lowest `X` orbitals are doubly occupied in every configuration. Their
//! interaction with the active electrons is folded into the one-electron
//! integrals of the active orbitals, and their own energy is a constant shift
//! of the diagonal.

extern crate nalgebra as na;

use super::{
    check_parameters, check_vectors, Doci, Fci, HamiltonianBuilder, HamiltonianParameters,
    MatrixVectorOperator,
};
use crate::error::{invalid, Result};
use crate::fock_space_impl::{FrozenFockSpace, FrozenProductFockSpace};
use na::{DMatrix, DVector};
use std::borrow::Cow;
use tracing::info;

pub struct FrozenCoreCi {
    active_builder: Box<dyn HamiltonianBuilder>,
    x: usize,
}

impl FrozenCoreCi {
    /// # Arguments
    ///
    /// * `active_builder` - Builder acting on the active orbitals only
    /// * `x` - Number of frozen orbitals below the active ones
    pub fn new(active_builder: Box<dyn HamiltonianBuilder>, x: usize) -> Self {
        FrozenCoreCi { active_builder, x }
    }

    /// DOCI with the pairs in the frozen orbitals held fixed
    pub fn doci(fock_space: &FrozenFockSpace) -> Self {
        Self::new(
            Box::new(Doci::new(fock_space.active_fock_space().clone())),
            fock_space.number_of_frozen_orbitals(),
        )
    }

    /// FCI with the frozen orbitals doubly occupied in every determinant
    pub fn fci(fock_space: &FrozenProductFockSpace) -> Self {
        Self::new(
            Box::new(Fci::new(fock_space.active_product_fock_space().clone())),
            fock_space.number_of_frozen_orbitals(),
        )
    }

    pub fn number_of_frozen_orbitals(&self) -> usize {
        self.x
    }

    pub fn active_builder(&self) -> &dyn HamiltonianBuilder {
        self.active_builder.as_ref()
    }

    /// Integrals over the active orbitals `x..K` with the frozen core folded in
    ///
    /// `h'_pq = h_pq + sum_l (2 g_pqll - g_pllq)` over frozen `l`; `g'` is the active block of `g`.
    pub fn freeze_parameters(
        parameters: &HamiltonianParameters,
        x: usize,
    ) -> Result<HamiltonianParameters> {
        let k = parameters.k();
        if x > k {
            return invalid(format!("cannot freeze {} of {} orbitals", x, k));
        }

        let g = &parameters.g;
        let active = k - x;
        let h = DMatrix::from_fn(active, active, |i, j| {
            let (p, q) = (i + x, j + x);
            let mut value = parameters.h[(p, q)];
            for l in 0..x {
                value += g[(q, p, l, l)] + g[(l, l, q, p)]
                    - 0.5 * g[(q, l, l, p)]
                    - 0.5 * g[(l, p, q, l)];
            }
            value
        });

        HamiltonianParameters::new(h, g.block_from(x), parameters.constant)
    }

    /// Energy of the doubly occupied frozen orbitals on their own
    pub fn frozen_core_energy(parameters: &HamiltonianParameters, x: usize) -> f64 {
        let h = &parameters.h;
        let g = &parameters.g;
        let x = x.min(parameters.k());

        let mut energy = 0.0;
        for i in 0..x {
            energy += 2.0 * h[(i, i)] + g[(i, i, i, i)];
            for j in (i + 1)..x {
                energy += 2.0 * g[(i, i, j, j)] + 2.0 * g[(j, j, i, i)]
                    - g[(j, i, i, j)]
                    - g[(i, j, j, i)];
            }
        }
        energy
    }
}

impl HamiltonianBuilder for FrozenCoreCi {
    fn construct_hamiltonian(&self, parameters: &HamiltonianParameters) -> Result<DMatrix<f64>> {
        check_parameters(self, parameters)?;

        let frozen = Self::freeze_parameters(parameters, self.x)?;
        let core_energy = Self::frozen_core_energy(parameters, self.x);
        info!(
            "Frozen core: {} orbitals, core energy {:.10} Eh",
            self.x, core_energy
        );

        let mut hamiltonian = self.active_builder.construct_hamiltonian(&frozen)?;
        for i in 0..hamiltonian.nrows() {
            hamiltonian[(i, i)] += core_energy;
        }
        Ok(hamiltonian)
    }

    fn matrix_vector_product(
        &self,
        parameters: &HamiltonianParameters,
        x: &DVector<f64>,
        diagonal: &DVector<f64>,
    ) -> Result<DVector<f64>> {
        check_parameters(self, parameters)?;
        check_vectors(self, x, diagonal)?;

        // the core energy is already part of the diagonal that is passed in
        let frozen = Self::freeze_parameters(parameters, self.x)?;
        self.active_builder
            .matrix_vector_product(&frozen, x, diagonal)
    }

    fn matrix_vector_operator<'a>(
        &'a self,
        parameters: Cow<'a, HamiltonianParameters>,
        diagonal: &'a DVector<f64>,
    ) -> Result<MatrixVectorOperator<'a>> {
        check_parameters(self, &parameters)?;

        let frozen = Self::freeze_parameters(&parameters, self.x)?;
        self.active_builder
            .matrix_vector_operator(Cow::Owned(frozen), diagonal)
    }

    fn calculate_diagonal(&self, parameters: &HamiltonianParameters) -> Result<DVector<f64>> {
        check_parameters(self, parameters)?;

        let frozen = Self::freeze_parameters(parameters, self.x)?;
        let core_energy = Self::frozen_core_energy(parameters, self.x);
        Ok(self
            .active_builder
            .calculate_diagonal(&frozen)?
            .add_scalar(core_energy))
    }

    fn dimension(&self) -> usize {
        self.active_builder.dimension()
    }

    fn number_of_orbitals(&self) -> usize {
        self.active_builder.number_of_orbitals() + self.x
    }

    fn hartree_fock_expansion(&self) -> DVector<f64> {
        self.active_builder.hartree_fock_expansion()
    }

    fn name(&self) -> &'static str {
        "frozen-core CI"
    }
}
