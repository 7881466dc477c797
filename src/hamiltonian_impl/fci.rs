//! Full configuration interaction in a spin-resolved product space
//!
//! The Hamiltonian is written with spin-summed excitation operators,
//!
//! H = sum_pq k_pq E_pq + 1/2 sum_pqrs g_pqrs E_pq E_rs,  k_pq = h_pq - 1/2 sum_r g_prrq,
//!
//! and split into an alpha part, a beta part and the alpha-beta cross term
//! `sum_pqrs g_pqrs E^a_pq E^b_rs`. The single-spin parts are assembled as sparse
//! string operators, once per set of parameters when the builder is used through
//! `matrix_vector_operator`; the cross term is applied on the fly.

extern crate nalgebra as na;

use super::{
    check_parameters, check_vectors, determinant_energy, HamiltonianBuilder, HamiltonianParameters,
    MatrixVectorOperator,
};
use crate::error::Result;
use crate::fock_space_impl::{FockPermutator, FockSpace, ProductFockSpace};
use na::{DMatrix, DVector};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Fci {
    pub fock_space: ProductFockSpace,
}

/// `E_pq |I> = sign |target>` for one string `I`
#[derive(Debug, Clone, Copy)]
struct StringCoupling {
    target: usize,
    p: usize,
    q: usize,
    sign: f64,
}

/// Per-call intermediates shared by the dense and the matrix-vector routes
struct SpinResolvedTerms {
    couplings_alpha: Vec<Vec<StringCoupling>>,
    couplings_beta: Vec<Vec<StringCoupling>>,
    /// Off-diagonal entries of the alpha string operator, one list per string
    operator_alpha: Vec<Vec<(usize, f64)>>,
    operator_beta: Vec<Vec<(usize, f64)>>,
}

impl Fci {
    pub fn new(fock_space: ProductFockSpace) -> Self {
        Fci { fock_space }
    }

    /// All `E_pq` couplings out of every string of `fock_space`, `p == q` included
    fn string_couplings(fock_space: &FockSpace) -> Vec<Vec<StringCoupling>> {
        let k = fock_space.k();
        let n = fock_space.n();

        (0..fock_space.dimension())
            .into_par_iter()
            .map(|address| {
                let onv = fock_space.make_onv(address);
                let mut couplings = Vec::with_capacity(n * (k - n + 1));

                for e1 in 0..n {
                    let q = onv.occupied_index(e1);
                    couplings.push(StringCoupling {
                        target: address,
                        p: q,
                        q,
                        sign: 1.0,
                    });

                    let base = address - fock_space.vertex_weight(q, e1 + 1);

                    // p > q
                    let mut shifted = base;
                    let mut p = q + 1;
                    let mut e2 = e1 + 1;
                    let mut sign = 1;
                    fock_space.shift_until_next_unoccupied_orbital_signed::<1>(
                        &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                    );
                    while p < k {
                        couplings.push(StringCoupling {
                            target: shifted.wrapping_add(fock_space.vertex_weight(p, e2)),
                            p,
                            q,
                            sign: sign as f64,
                        });
                        p += 1;
                        fock_space.shift_until_next_unoccupied_orbital_signed::<1>(
                            &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                        );
                    }

                    // p < q
                    let mut shifted = base;
                    let mut p = q as isize - 1;
                    let mut e2 = e1 as isize - 1;
                    let mut sign = 1;
                    fock_space.shift_until_previous_unoccupied_orbital::<1>(
                        &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                    );
                    while p >= 0 {
                        couplings.push(StringCoupling {
                            target: shifted
                                .wrapping_add(fock_space.vertex_weight(p as usize, (e2 + 2) as usize)),
                            p: p as usize,
                            q,
                            sign: sign as f64,
                        });
                        p -= 1;
                        fock_space.shift_until_previous_unoccupied_orbital::<1>(
                            &onv, &mut shifted, &mut p, &mut e2, &mut sign,
                        );
                    }
                }

                couplings
            })
            .collect()
    }

    /// Off-diagonal part of `sum k_pq E_pq + 1/2 sum g_pqrs E_pq E_rs` on one spin
    fn string_operator(
        parameters: &HamiltonianParameters,
        couplings: &[Vec<StringCoupling>],
    ) -> Vec<Vec<(usize, f64)>> {
        let k_matrix = parameters.effective_one_electron_integrals();
        let g = &parameters.g;

        (0..couplings.len())
            .into_par_iter()
            .map(|address| {
                let mut column: HashMap<usize, f64> = HashMap::new();

                for first in &couplings[address] {
                    if first.target != address {
                        *column.entry(first.target).or_insert(0.0) +=
                            first.sign * k_matrix[(first.p, first.q)];
                    }
                    for second in &couplings[first.target] {
                        if second.target != address {
                            *column.entry(second.target).or_insert(0.0) += 0.5
                                * first.sign
                                * second.sign
                                * g[(second.p, second.q, first.p, first.q)];
                        }
                    }
                }

                let mut column: Vec<(usize, f64)> = column.into_iter().collect();
                column.sort_unstable_by_key(|&(target, _)| target);
                column
            })
            .collect()
    }

    fn prepare(&self, parameters: &HamiltonianParameters) -> SpinResolvedTerms {
        let couplings_alpha = Self::string_couplings(self.fock_space.fock_space_alpha());
        let couplings_beta = Self::string_couplings(self.fock_space.fock_space_beta());
        let operator_alpha = Self::string_operator(parameters, &couplings_alpha);
        let operator_beta = Self::string_operator(parameters, &couplings_beta);

        debug!(
            "FCI string operators: {} alpha and {} beta nonzeros",
            operator_alpha.iter().map(Vec::len).sum::<usize>(),
            operator_beta.iter().map(Vec::len).sum::<usize>()
        );

        SpinResolvedTerms {
            couplings_alpha,
            couplings_beta,
            operator_alpha,
            operator_beta,
        }
    }

    /// Every off-diagonal element `H(J, I)` of column `I = (address_alpha, address_beta)`
    fn for_each_coupling<F>(
        &self,
        parameters: &HamiltonianParameters,
        terms: &SpinResolvedTerms,
        address_alpha: usize,
        address_beta: usize,
        mut visit: F,
    ) where
        F: FnMut(usize, f64),
    {
        let g = &parameters.g;
        let dim_beta = self.fock_space.fock_space_beta().dimension();

        for &(target_alpha, value) in &terms.operator_alpha[address_alpha] {
            visit(target_alpha * dim_beta + address_beta, value);
        }
        for &(target_beta, value) in &terms.operator_beta[address_beta] {
            visit(address_alpha * dim_beta + target_beta, value);
        }

        for alpha in &terms.couplings_alpha[address_alpha] {
            for beta in &terms.couplings_beta[address_beta] {
                if alpha.target == address_alpha && beta.target == address_beta {
                    continue;
                }
                visit(
                    alpha.target * dim_beta + beta.target,
                    alpha.sign * beta.sign * g[(alpha.p, alpha.q, beta.p, beta.q)],
                );
            }
        }
    }

    /// `H x` from prepared string operators
    fn apply(
        &self,
        parameters: &HamiltonianParameters,
        terms: &SpinResolvedTerms,
        x: &DVector<f64>,
        diagonal: &DVector<f64>,
    ) -> DVector<f64> {
        let dim_beta = self.fock_space.fock_space_beta().dimension();
        let mut product = diagonal.component_mul(x);

        // each task owns the block of one alpha string and gathers into it
        product
            .as_mut_slice()
            .par_chunks_mut(dim_beta)
            .enumerate()
            .for_each(|(address_alpha, block)| {
                for (address_beta, element) in block.iter_mut().enumerate() {
                    self.for_each_coupling(
                        parameters,
                        terms,
                        address_alpha,
                        address_beta,
                        |target, value| *element += value * x[target],
                    );
                }
            });

        product
    }
}

impl HamiltonianBuilder for Fci {
    fn construct_hamiltonian(&self, parameters: &HamiltonianParameters) -> Result<DMatrix<f64>> {
        check_parameters(self, parameters)?;

        let dim = self.dimension();
        let dim_beta = self.fock_space.fock_space_beta().dimension();
        info!("Building FCI Hamiltonian of dimension {} x {}", dim, dim);

        let diagonal = self.calculate_diagonal(parameters)?;
        let terms = self.prepare(parameters);

        // the Hamiltonian is symmetric, so column I is also row I
        let columns: Vec<Vec<f64>> = (0..dim)
            .into_par_iter()
            .map(|address| {
                let mut column = vec![0.0; dim];
                column[address] = diagonal[address];
                self.for_each_coupling(
                    parameters,
                    &terms,
                    address / dim_beta,
                    address % dim_beta,
                    |target, value| column[target] += value,
                );
                column
            })
            .collect();

        let mut hamiltonian = DMatrix::zeros(dim, dim);
        for (j, column) in columns.iter().enumerate() {
            for (i, &value) in column.iter().enumerate() {
                hamiltonian[(i, j)] = value;
            }
        }

        info!("FCI Hamiltonian construction complete.");
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

        let terms = self.prepare(parameters);
        Ok(self.apply(parameters, &terms, x, diagonal))
    }

    fn matrix_vector_operator<'a>(
        &'a self,
        parameters: Cow<'a, HamiltonianParameters>,
        diagonal: &'a DVector<f64>,
    ) -> Result<MatrixVectorOperator<'a>> {
        check_parameters(self, &parameters)?;

        let terms = self.prepare(&parameters);
        Ok(Box::new(move |x: &DVector<f64>| {
            check_vectors(self, x, diagonal)?;
            Ok(self.apply(&parameters, &terms, x, diagonal))
        }))
    }

    fn calculate_diagonal(&self, parameters: &HamiltonianParameters) -> Result<DVector<f64>> {
        check_parameters(self, parameters)?;

        let fock_space_alpha = self.fock_space.fock_space_alpha();
        let fock_space_beta = self.fock_space.fock_space_beta();
        let dim_beta = fock_space_beta.dimension();

        let diagonal: Vec<f64> = (0..self.dimension())
            .into_par_iter()
            .map(|address| {
                let alpha = fock_space_alpha.make_onv(address / dim_beta);
                let beta = fock_space_beta.make_onv(address % dim_beta);
                determinant_energy(parameters, alpha.occupation_indices(), beta.occupation_indices())
            })
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
        "FCI"
    }
}
