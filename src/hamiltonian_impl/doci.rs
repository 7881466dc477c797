//! Doubly occupied configuration interaction
//!
//! Every spatial orbital is either empty or doubly occupied, so a configuration
//! is a single ONV of electron pairs and only pair excitations p -> q couple.

extern crate nalgebra as na;

use super::{check_parameters, check_vectors, HamiltonianBuilder, HamiltonianParameters};
use crate::error::Result;
use crate::fock_space_impl::{FockPermutator, FockSpace};
use crate::onv::Onv;
use na::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Doci {
    /// Fock space of electron pairs
    pub fock_space: FockSpace,
}

impl Doci {
    pub fn new(fock_space: FockSpace) -> Self {
        Doci { fock_space }
    }

    /// Visit every upward pair excitation `p -> q`, so each coupled pair of configurations is seen once
    fn for_each_pair_excitation<F>(&self, parameters: &HamiltonianParameters, mut visit: F)
    where
        F: FnMut(usize, usize, f64),
    {
        let fock_space = &self.fock_space;
        let k = fock_space.k();
        let dim = fock_space.dimension();
        let g = &parameters.g;

        let mut onv = fock_space.make_onv(0);
        for address in 0..dim {
            for e1 in 0..fock_space.n() {
                let p = onv.occupied_index(e1);

                // remove the pair at p, then walk q upwards over the unoccupied orbitals
                let mut shifted = address - fock_space.vertex_weight(p, e1 + 1);
                let mut q = p + 1;
                let mut e2 = e1 + 1;
                fock_space.shift_until_next_unoccupied_orbital::<1>(&onv, &mut shifted, &mut q, &mut e2);

                while q < k {
                    let target = shifted + fock_space.vertex_weight(q, e2);
                    visit(address, target, g[(p, q, p, q)]);

                    q += 1;
                    fock_space.shift_until_next_unoccupied_orbital::<1>(&onv, &mut shifted, &mut q, &mut e2);
                }
            }

            if address + 1 < dim {
                fock_space.set_next_onv(&mut onv);
            }
        }
    }

    fn pair_energy(parameters: &HamiltonianParameters, onv: &Onv) -> f64 {
        let h = &parameters.h;
        let g = &parameters.g;
        let occupied = onv.occupation_indices();

        let mut energy = 0.0;
        for (e, &p) in occupied.iter().enumerate() {
            energy += 2.0 * h[(p, p)] + g[(p, p, p, p)];
            for &q in &occupied[..e] {
                energy += 2.0 * (2.0 * g[(p, p, q, q)] - g[(p, q, q, p)]);
            }
        }
        energy
    }
}

impl HamiltonianBuilder for Doci {
    fn construct_hamiltonian(&self, parameters: &HamiltonianParameters) -> Result<DMatrix<f64>> {
        check_parameters(self, parameters)?;

        let dim = self.dimension();
        info!("Building DOCI Hamiltonian of dimension {} x {}", dim, dim);

        let mut hamiltonian = DMatrix::from_diagonal(&self.calculate_diagonal(parameters)?);
        self.for_each_pair_excitation(parameters, |i, j, value| {
            hamiltonian[(i, j)] += value;
            hamiltonian[(j, i)] += value;
        });

        info!("DOCI Hamiltonian construction complete.");
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

        let mut product = diagonal.component_mul(x);
        self.for_each_pair_excitation(parameters, |i, j, value| {
            product[i] += value * x[j];
            product[j] += value * x[i];
        });
        Ok(product)
    }

    fn calculate_diagonal(&self, parameters: &HamiltonianParameters) -> Result<DVector<f64>> {
        check_parameters(self, parameters)?;

        let diagonal: Vec<f64> = (0..self.dimension())
            .into_par_iter()
            .map(|address| Self::pair_energy(parameters, &self.fock_space.make_onv(address)))
            .collect();
        Ok(DVector::from_vec(diagonal))
    }

    fn dimension(&self) -> usize {
        self.fock_space.dimension()
    }

    fn number_of_orbitals(&self) -> usize {
        self.fock_space.k()
    }

    fn hartree_fock_expansion(&self) -> DVector<f64> {
        self.fock_space.hartree_fock_expansion()
    }

    fn name(&self) -> &'static str {
        "DOCI"
    }
}
