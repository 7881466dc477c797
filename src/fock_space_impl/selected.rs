//! An explicit, ordered list of alpha/beta determinant pairs

use super::{FockPermutator, FockSpace, FrozenProductFockSpace, ProductFockSpace};
use crate::error::{invalid, Result};
use crate::onv::{Onv, MAX_ORBITALS};
use tracing::debug;

/// One determinant of a selected space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub alpha: Onv,
    pub beta: Onv,
}

#[derive(Debug, Clone)]
pub struct SelectedFockSpace {
    k: usize,
    n_alpha: usize,
    n_beta: usize,
    configurations: Vec<Configuration>,
}

impl SelectedFockSpace {
    /// An empty selection, filled with [`Self::add_configuration`]
    pub fn new(k: usize, n_alpha: usize, n_beta: usize) -> Result<Self> {
        if k > MAX_ORBITALS {
            return invalid(format!(
                "a selected space holds at most {} orbitals, {} were requested",
                MAX_ORBITALS, k
            ));
        }
        if n_alpha > k || n_beta > k {
            return invalid(format!(
                "cannot place {} alpha and {} beta electrons in {} orbitals",
                n_alpha, n_beta, k
            ));
        }
        Ok(SelectedFockSpace {
            k,
            n_alpha,
            n_beta,
            configurations: Vec::new(),
        })
    }

    /// Every doubly occupied determinant (alpha string == beta string) of `fock_space`
    pub fn from_fock_space(fock_space: &FockSpace) -> Result<Self> {
        let mut selected = Self::new(fock_space.k(), fock_space.n(), fock_space.n())?;
        selected.configurations.reserve(fock_space.dimension());

        let mut onv = fock_space.make_onv(0);
        for address in 0..fock_space.dimension() {
            selected.configurations.push(Configuration {
                alpha: onv.clone(),
                beta: onv.clone(),
            });
            if address + 1 < fock_space.dimension() {
                fock_space.set_next_onv(&mut onv);
            }
        }
        Ok(selected)
    }

    /// Every determinant of `product`, in compound-address order
    pub fn from_product_fock_space(product: &ProductFockSpace) -> Result<Self> {
        let mut selected = Self::new(product.k(), product.n_alpha(), product.n_beta())?;
        selected.push_product(product.fock_space_alpha(), product.fock_space_beta());
        Ok(selected)
    }

    /// Every determinant of `product`, frozen orbitals included, in compound-address order
    pub fn from_frozen_product_fock_space(product: &FrozenProductFockSpace) -> Result<Self> {
        let mut selected = Self::new(product.k(), product.n_alpha(), product.n_beta())?;
        selected.push_product(product.fock_space_alpha(), product.fock_space_beta());
        Ok(selected)
    }

    fn push_product<A: FockPermutator, B: FockPermutator>(&mut self, alpha: &A, beta: &B) {
        self.configurations
            .reserve(alpha.dimension() * beta.dimension());

        let mut onv_alpha = alpha.make_onv(0);
        for address_alpha in 0..alpha.dimension() {
            let mut onv_beta = beta.make_onv(0);
            for address_beta in 0..beta.dimension() {
                self.configurations.push(Configuration {
                    alpha: onv_alpha.clone(),
                    beta: onv_beta.clone(),
                });
                if address_beta + 1 < beta.dimension() {
                    beta.set_next_onv(&mut onv_beta);
                }
            }
            if address_alpha + 1 < alpha.dimension() {
                alpha.set_next_onv(&mut onv_alpha);
            }
        }
        debug!("Selected {} determinants", self.configurations.len());
    }

    /// Append a determinant given as two bitstrings, orbital 0 rightmost
    ///
    /// `add_configuration("0011", "0101")` occupies alpha orbitals 0,1 and beta orbitals 0,2.
    pub fn add_configuration(&mut self, alpha: &str, beta: &str) -> Result<()> {
        let alpha = self.parse_onv(alpha, self.n_alpha)?;
        let beta = self.parse_onv(beta, self.n_beta)?;
        self.configurations.push(Configuration { alpha, beta });
        Ok(())
    }

    pub fn add_configurations(&mut self, alphas: &[&str], betas: &[&str]) -> Result<()> {
        if alphas.len() != betas.len() {
            return invalid(format!(
                "{} alpha strings cannot be paired with {} beta strings",
                alphas.len(),
                betas.len()
            ));
        }
        // nothing is added unless every string parses
        let configurations = alphas
            .iter()
            .zip(betas)
            .map(|(alpha, beta)| {
                Ok(Configuration {
                    alpha: self.parse_onv(alpha, self.n_alpha)?,
                    beta: self.parse_onv(beta, self.n_beta)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.configurations.extend(configurations);
        Ok(())
    }

    fn parse_onv(&self, bitstring: &str, n: usize) -> Result<Onv> {
        if bitstring.len() != self.k {
            return invalid(format!(
                "bitstring '{}' does not have {} orbitals",
                bitstring, self.k
            ));
        }
        let mut representation = 0u64;
        for (p, c) in bitstring.chars().rev().enumerate() {
            match c {
                '1' => representation |= 1u64 << p,
                '0' => {}
                _ => return invalid(format!("bitstring '{}' contains '{}'", bitstring, c)),
            }
        }
        Onv::new(self.k, n, representation)
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn n_alpha(&self) -> usize {
        self.n_alpha
    }

    pub fn n_beta(&self) -> usize {
        self.n_beta
    }

    pub fn dimension(&self) -> usize {
        self.configurations.len()
    }

    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    pub fn configuration(&self, index: usize) -> &Configuration {
        &self.configurations[index]
    }
}
