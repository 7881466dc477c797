//! Integral storage and the providers that supply it
//!
//! Two-electron integrals are stored in chemist's notation, `g[(p, q, r, s)] = (pq|rs)`.

extern crate nalgebra as na;

use na::DMatrix;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Dense rank-4 tensor of two-electron integrals over `k` orbitals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoElectronIntegrals {
    k: usize,
    values: Vec<f64>,
}

impl TwoElectronIntegrals {
    pub fn zeros(k: usize) -> Self {
        TwoElectronIntegrals {
            k,
            values: vec![0.0; k * k * k * k],
        }
    }

    /// Build the tensor element by element
    pub fn from_fn<F>(k: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize, usize) -> f64,
    {
        let mut values = Vec::with_capacity(k * k * k * k);
        for p in 0..k {
            for q in 0..k {
                for r in 0..k {
                    for s in 0..k {
                        values.push(f(p, q, r, s));
                    }
                }
            }
        }
        TwoElectronIntegrals { k, values }
    }

    /// Number of orbitals
    pub fn k(&self) -> usize {
        self.k
    }

    /// Whether the stored values fill exactly `k^4` elements
    ///
    /// Deserialized tensors carry `k` and the values separately.
    pub fn is_complete(&self) -> bool {
        self.k.checked_pow(4) == Some(self.values.len())
    }

    /// Whether all eight permutational symmetries of real orbitals hold within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let k = self.k;
        for p in 0..k {
            for q in 0..k {
                for r in 0..k {
                    for s in 0..k {
                        let value = self[(p, q, r, s)];
                        let images = [
                            self[(q, p, r, s)],
                            self[(p, q, s, r)],
                            self[(r, s, p, q)],
                        ];
                        if images.iter().any(|image| (image - value).abs() > tolerance) {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// The sub-tensor over orbitals `start..k`
    pub fn block_from(&self, start: usize) -> Self {
        let start = start.min(self.k);
        Self::from_fn(self.k - start, |p, q, r, s| {
            self[(p + start, q + start, r + start, s + start)]
        })
    }

    #[inline]
    fn offset(&self, p: usize, q: usize, r: usize, s: usize) -> usize {
        ((p * self.k + q) * self.k + r) * self.k + s
    }
}

impl Index<(usize, usize, usize, usize)> for TwoElectronIntegrals {
    type Output = f64;

    #[inline]
    fn index(&self, (p, q, r, s): (usize, usize, usize, usize)) -> &f64 {
        &self.values[self.offset(p, q, r, s)]
    }
}

impl IndexMut<(usize, usize, usize, usize)> for TwoElectronIntegrals {
    #[inline]
    fn index_mut(&mut self, (p, q, r, s): (usize, usize, usize, usize)) -> &mut f64 {
        let offset = self.offset(p, q, r, s);
        &mut self.values[offset]
    }
}

/// Source of the integrals for a Hamiltonian
///
/// Integral engines, model Hamiltonians and stored integrals all enter the CI
/// code through this trait. Set-up and tear-down of an engine belong to the
/// implementor and happen before it is handed over.
pub trait IntegralProvider {
    fn number_of_orbitals(&self) -> usize;

    /// `K x K` symmetric core Hamiltonian
    fn one_electron_integrals(&self) -> DMatrix<f64>;

    /// Chemist's notation two-electron integrals
    fn two_electron_integrals(&self) -> TwoElectronIntegrals;

    /// Scalar energy offset such as the nuclear repulsion
    fn constant(&self) -> f64 {
        0.0
    }
}

/// Integrals held in memory, for example read from a configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryIntegrals {
    pub one_electron: DMatrix<f64>,
    pub two_electron: TwoElectronIntegrals,
    #[serde(default)]
    pub constant: f64,
}

impl IntegralProvider for InMemoryIntegrals {
    fn number_of_orbitals(&self) -> usize {
        self.one_electron.nrows()
    }

    fn one_electron_integrals(&self) -> DMatrix<f64> {
        self.one_electron.clone()
    }

    fn two_electron_integrals(&self) -> TwoElectronIntegrals {
        self.two_electron.clone()
    }

    fn constant(&self) -> f64 {
        self.constant
    }
}

/// One-band Hubbard model on a chain or ring of sites
///
/// Nearest neighbours couple through `-hopping`; two electrons on the same site
/// repel with `on_site_repulsion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubbardModel {
    pub sites: usize,
    pub hopping: f64,
    pub on_site_repulsion: f64,
    #[serde(default)]
    pub periodic: bool,
}

impl HubbardModel {
    /// # Arguments
    ///
    /// * `sites` - Number of lattice sites, one orbital each
    /// * `hopping` - Hopping amplitude `t`
    /// * `on_site_repulsion` - Hubbard `U`
    pub fn chain(sites: usize, hopping: f64, on_site_repulsion: f64) -> Self {
        HubbardModel {
            sites,
            hopping,
            on_site_repulsion,
            periodic: false,
        }
    }

    pub fn ring(sites: usize, hopping: f64, on_site_repulsion: f64) -> Self {
        HubbardModel {
            periodic: true,
            ..Self::chain(sites, hopping, on_site_repulsion)
        }
    }
}

impl IntegralProvider for HubbardModel {
    fn number_of_orbitals(&self) -> usize {
        self.sites
    }

    fn one_electron_integrals(&self) -> DMatrix<f64> {
        let mut h = DMatrix::zeros(self.sites, self.sites);
        for i in 1..self.sites {
            h[(i - 1, i)] = -self.hopping;
            h[(i, i - 1)] = -self.hopping;
        }
        // a two-site ring has a single bond
        if self.periodic && self.sites > 2 {
            let last = self.sites - 1;
            h[(0, last)] = -self.hopping;
            h[(last, 0)] = -self.hopping;
        }
        h
    }

    fn two_electron_integrals(&self) -> TwoElectronIntegrals {
        let mut g = TwoElectronIntegrals::zeros(self.sites);
        for i in 0..self.sites {
            g[(i, i, i, i)] = self.on_site_repulsion;
        }
        g
    }
}
