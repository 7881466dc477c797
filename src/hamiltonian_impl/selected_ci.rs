//! Configuration interaction over an explicit list of determinants
//!
//! Matrix elements follow the Slater-Condon rules. Phase factors come from
//! replaying the excitation on the ket with the signed ONV operators.

extern crate nalgebra as na;

use super::{
    check_parameters, check_vectors, determinant_energy, HamiltonianBuilder, HamiltonianParameters,
};
use crate::error::Result;
use crate::fock_space_impl::{Configuration, SelectedFockSpace};
use crate::onv::Onv;
use na::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone)]
pub struct SelectedCi {
    pub fock_space: SelectedFockSpace,
}

impl SelectedCi {
    pub fn new(fock_space: SelectedFockSpace) -> Self {
        SelectedCi { fock_space }
    }

    /// `<bra|H|ket>` for two different determinants
    fn off_diagonal_element(
        parameters: &HamiltonianParameters,
        bra: &Configuration,
        ket: &Configuration,
    ) -> f64 {
        let differences_alpha = bra.alpha.count_number_of_differences(&ket.alpha);
        let differences_beta = bra.beta.count_number_of_differences(&ket.beta);

        match (differences_alpha, differences_beta) {
            (2, 0) => Self::single_excitation(parameters, &bra.alpha, &ket.alpha, &ket.beta),
            (0, 2) => Self::single_excitation(parameters, &bra.beta, &ket.beta, &ket.alpha),
            (4, 0) => Self::same_spin_double_excitation(parameters, &bra.alpha, &ket.alpha),
            (0, 4) => Self::same_spin_double_excitation(parameters, &bra.beta, &ket.beta),
            (2, 2) => {
                let g = &parameters.g;
                let (created_alpha, annihilated_alpha) = bra.alpha.find_differences(&ket.alpha);
                let (created_beta, annihilated_beta) = bra.beta.find_differences(&ket.beta);
                let (p, q) = (created_alpha[0], annihilated_alpha[0]);
                let (r, s) = (created_beta[0], annihilated_beta[0]);

                let sign_alpha = excitation_sign(&ket.alpha, &[q], &[p]);
                let sign_beta = excitation_sign(&ket.beta, &[s], &[r]);
                sign_alpha * sign_beta * g[(p, q, r, s)]
            }
            _ => 0.0,
        }
    }

    /// One electron of spin `sigma` moves `q -> p`; `other` is the untouched opposite-spin string
    fn single_excitation(
        parameters: &HamiltonianParameters,
        bra: &Onv,
        ket: &Onv,
        other: &Onv,
    ) -> f64 {
        let h = &parameters.h;
        let g = &parameters.g;
        let (created, annihilated) = bra.find_differences(ket);
        let (p, q) = (created[0], annihilated[0]);

        let mut value = h[(p, q)];
        for &r in ket.occupation_indices() {
            if r != q {
                value += g[(p, q, r, r)] - g[(p, r, r, q)];
            }
        }
        for &r in other.occupation_indices() {
            value += g[(p, q, r, r)];
        }

        excitation_sign(ket, &[q], &[p]) * value
    }

    /// Two electrons of the same spin move `{q, s} -> {p, r}`
    fn same_spin_double_excitation(parameters: &HamiltonianParameters, bra: &Onv, ket: &Onv) -> f64 {
        let g = &parameters.g;
        let (created, annihilated) = bra.find_differences(ket);
        let (p, r) = (created[0], created[1]);
        let (q, s) = (annihilated[0], annihilated[1]);

        excitation_sign(ket, &[q, s], &[r, p]) * (g[(p, q, r, s)] - g[(p, s, r, q)])
    }

    fn configuration_energy(parameters: &HamiltonianParameters, configuration: &Configuration) -> f64 {
        determinant_energy(
            parameters,
            configuration.alpha.occupation_indices(),
            configuration.beta.occupation_indices(),
        )
    }
}

/// Phase of applying the annihilators, then the creators, in the given order
fn excitation_sign(onv: &Onv, annihilated: &[usize], created: &[usize]) -> f64 {
    let mut onv = onv.clone();
    let mut sign = 1;
    for &q in annihilated {
        match onv.annihilate_with_sign(q) {
            Some(phase) => sign *= phase,
            None => return 0.0,
        }
    }
    for &p in created {
        match onv.create_with_sign(p) {
            Some(phase) => sign *= phase,
            None => return 0.0,
        }
    }
    sign as f64
}

impl HamiltonianBuilder for SelectedCi {
    fn construct_hamiltonian(&self, parameters: &HamiltonianParameters) -> Result<DMatrix<f64>> {
        check_parameters(self, parameters)?;

        let dim = self.dimension();
        let configurations = self.fock_space.configurations();
        info!("Building selected CI Hamiltonian of dimension {} x {}", dim, dim);

        let rows: Vec<Vec<f64>> = (0..dim)
            .into_par_iter()
            .map(|i| {
                let bra = &configurations[i];
                (0..dim)
                    .map(|j| {
                        if i == j {
                            Self::configuration_energy(parameters, bra)
                        } else {
                            Self::off_diagonal_element(parameters, bra, &configurations[j])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut hamiltonian = DMatrix::zeros(dim, dim);
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                hamiltonian[(i, j)] = value;
            }
        }

        info!("Selected CI Hamiltonian construction complete.");
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

        let configurations = self.fock_space.configurations();
        let product: Vec<f64> = (0..self.dimension())
            .into_par_iter()
            .map(|i| {
                let bra = &configurations[i];
                let mut value = diagonal[i] * x[i];
                for (j, ket) in configurations.iter().enumerate() {
                    if j != i {
                        value += Self::off_diagonal_element(parameters, bra, ket) * x[j];
                    }
                }
                value
            })
            .collect();
        Ok(DVector::from_vec(product))
    }

    fn calculate_diagonal(&self, parameters: &HamiltonianParameters) -> Result<DVector<f64>> {
        check_parameters(self, parameters)?;

        let diagonal: Vec<f64> = self
            .fock_space
            .configurations()
            .par_iter()
            .map(|configuration| Self::configuration_energy(parameters, configuration))
            .collect();
        Ok(DVector::from_vec(diagonal))
    }

    fn dimension(&self) -> usize {
        self.fock_space.dimension()
    }

    fn number_of_orbitals(&self) -> usize {
        self.fock_space.k()
    }

    fn name(&self) -> &'static str {
        "selected CI"
    }
}
