extern crate nalgebra as na;

use super::integrals::{IntegralProvider, TwoElectronIntegrals};
use crate::error::{invalid, Result};
use na::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One- and two-electron integrals in an orthonormal orbital basis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamiltonianParameters {
    /// `K x K` one-electron integrals
    pub h: DMatrix<f64>,

    /// `K^4` two-electron integrals, chemist's notation
    pub g: TwoElectronIntegrals,

    /// Scalar offset (e.g. nuclear repulsion); builders never add it
    pub constant: f64,
}

impl HamiltonianParameters {
    /// # Arguments
    ///
    /// * `h` - Square one-electron integral matrix
    /// * `g` - Two-electron integrals over the same orbitals
    /// * `constant` - Scalar energy offset
    pub fn new(h: DMatrix<f64>, g: TwoElectronIntegrals, constant: f64) -> Result<Self> {
        if !h.is_square() {
            return invalid(format!(
                "one-electron integrals must be square, got {} x {}",
                h.nrows(),
                h.ncols()
            ));
        }
        if g.k() != h.nrows() {
            return invalid(format!(
                "one-electron integrals span {} orbitals but two-electron integrals span {}",
                h.nrows(),
                g.k()
            ));
        }
        if !g.is_complete() {
            return invalid(format!(
                "two-electron integrals over {} orbitals do not hold {}^4 values",
                g.k(),
                g.k()
            ));
        }
        Ok(HamiltonianParameters { h, g, constant })
    }

    /// Collect the integrals from `provider`
    pub fn from_provider(provider: &dyn IntegralProvider) -> Result<Self> {
        let k = provider.number_of_orbitals();
        let parameters = Self::new(
            provider.one_electron_integrals(),
            provider.two_electron_integrals(),
            provider.constant(),
        )?;
        if parameters.k() != k {
            return invalid(format!(
                "integral provider announces {} orbitals but supplied {}",
                k,
                parameters.k()
            ));
        }
        info!("Loaded integrals for {} orbitals", k);
        Ok(parameters)
    }

    /// Random integrals with the symmetries of real orbitals, for testing builders
    pub fn random(k: usize) -> Self {
        let h = DMatrix::<f64>::new_random(k, k);
        let h = &h + h.transpose();

        // symmetric over orbital pairs (pq) and under pair exchange
        let pairs = k * (k + 1) / 2;
        let pair_matrix = DMatrix::<f64>::new_random(pairs, pairs);
        let pair_matrix = &pair_matrix + pair_matrix.transpose();
        let pair = |p: usize, q: usize| {
            let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
            hi * (hi + 1) / 2 + lo
        };
        let g = TwoElectronIntegrals::from_fn(k, |p, q, r, s| {
            pair_matrix[(pair(p, q), pair(r, s))]
        });

        HamiltonianParameters {
            h,
            g,
            constant: 0.0,
        }
    }

    /// Number of orbitals
    pub fn k(&self) -> usize {
        self.h.nrows()
    }

    /// `k_pq = h_pq - 1/2 sum_r g_prrq`, the one-electron part left after
    /// normal ordering the two-electron operator into `E_pq E_rs` products
    pub fn effective_one_electron_integrals(&self) -> DMatrix<f64> {
        let k = self.k();
        DMatrix::from_fn(k, k, |p, q| {
            self.h[(p, q)] - 0.5 * (0..k).map(|r| self.g[(p, r, r, q)]).sum::<f64>()
        })
    }
}
