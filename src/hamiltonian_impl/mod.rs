//! Hamiltonian builders
//!
//! A builder knows a Fock space and turns a set of [`HamiltonianParameters`]
//! into either the dense Hamiltonian matrix or its action on a coefficient
//! vector. Iterative eigensolvers only ever see the latter together with the
//! diagonal.
//!
//! # Available Builders
//!
//! - **DOCI**: doubly occupied configurations, pair excitations only
//! - **FCI**: every alpha string with every beta string
//! - **Selected CI**: an explicit list of determinants
//! - **Frozen core**: any of the above on an active space, core folded into the integrals

extern crate nalgebra as na;

mod doci;
mod fci;
mod frozen_core;
mod integrals;
mod parameters;
mod selected_ci;
mod tests;

pub use doci::Doci;
pub use fci::Fci;
pub use frozen_core::FrozenCoreCi;
pub use integrals::{HubbardModel, InMemoryIntegrals, IntegralProvider, TwoElectronIntegrals};
pub use parameters::HamiltonianParameters;
pub use selected_ci::SelectedCi;

use crate::error::{invalid, Result};
use na::{DMatrix, DVector};
use std::borrow::Cow;

/// `x -> H x` with the builder's per-parameter set-up already done
pub type MatrixVectorOperator<'a> = Box<dyn Fn(&DVector<f64>) -> Result<DVector<f64>> + 'a>;

pub trait HamiltonianBuilder: Send + Sync {
    /// The dense Hamiltonian matrix in the builder's Fock space
    fn construct_hamiltonian(&self, parameters: &HamiltonianParameters) -> Result<DMatrix<f64>>;

    /// `H x`, where the diagonal of `H` is taken from `diagonal`
    ///
    /// Passing the diagonal in lets iterative solvers compute it once.
    fn matrix_vector_product(
        &self,
        parameters: &HamiltonianParameters,
        x: &DVector<f64>,
        diagonal: &DVector<f64>,
    ) -> Result<DVector<f64>>;

    /// A reusable matrix-vector product for repeated application, as in Davidson iterations
    ///
    /// Builders with work that depends only on the parameters do it here, once.
    fn matrix_vector_operator<'a>(
        &'a self,
        parameters: Cow<'a, HamiltonianParameters>,
        diagonal: &'a DVector<f64>,
    ) -> Result<MatrixVectorOperator<'a>> {
        Ok(Box::new(move |x: &DVector<f64>| {
            self.matrix_vector_product(&parameters, x, diagonal)
        }))
    }

    fn calculate_diagonal(&self, parameters: &HamiltonianParameters) -> Result<DVector<f64>>;

    /// Number of configurations
    fn dimension(&self) -> usize;

    /// Number of orbitals the parameters must span
    fn number_of_orbitals(&self) -> usize;

    /// Expansion of the lowest (Hartree-Fock) configuration
    fn hartree_fock_expansion(&self) -> DVector<f64> {
        let mut expansion = DVector::zeros(self.dimension());
        expansion[0] = 1.0;
        expansion
    }

    /// Short method name for logs and reports
    fn name(&self) -> &'static str;
}

pub(crate) fn check_parameters(
    builder: &dyn HamiltonianBuilder,
    parameters: &HamiltonianParameters,
) -> Result<()> {
    if parameters.k() != builder.number_of_orbitals() {
        return invalid(format!(
            "{} works on {} orbitals but the Hamiltonian parameters span {}",
            builder.name(),
            builder.number_of_orbitals(),
            parameters.k()
        ));
    }
    Ok(())
}

pub(crate) fn check_vectors(
    builder: &dyn HamiltonianBuilder,
    x: &DVector<f64>,
    diagonal: &DVector<f64>,
) -> Result<()> {
    let dim = builder.dimension();
    if x.len() != dim || diagonal.len() != dim {
        return invalid(format!(
            "{} has dimension {} but received a vector of length {} and a diagonal of length {}",
            builder.name(),
            dim,
            x.len(),
            diagonal.len()
        ));
    }
    Ok(())
}

/// Energy of a single determinant from its occupied alpha and beta orbitals
pub(crate) fn determinant_energy(
    parameters: &HamiltonianParameters,
    alpha: &[usize],
    beta: &[usize],
) -> f64 {
    let h = &parameters.h;
    let g = &parameters.g;

    let mut energy = 0.0;
    for occupied in [alpha, beta] {
        for &p in occupied {
            energy += h[(p, p)];
            for &q in occupied {
                energy += 0.5 * (g[(p, p, q, q)] - g[(p, q, q, p)]);
            }
        }
    }
    for &p in alpha {
        for &q in beta {
            energy += g[(p, p, q, q)];
        }
    }
    energy
}
