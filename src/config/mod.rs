//! Configuration management for CI calculations
//!
//! This module handles configuration structures, defaults, and their
//! translation into Fock spaces, Hamiltonian builders and solver options.

use crate::ci_impl::SolverOptions;
use crate::eigen_impl::DavidsonSolverOptions;
use crate::error::{invalid, Result};
use crate::fock_space_impl::{
    FockSpace, FrozenFockSpace, FrozenProductFockSpace, ProductFockSpace, SelectedFockSpace,
};
use crate::hamiltonian_impl::{
    Doci, Fci, FrozenCoreCi, HamiltonianBuilder, HubbardModel, InMemoryIntegrals,
    IntegralProvider, SelectedCi,
};
use serde::{Deserialize, Serialize};

/// Main configuration structure for CI calculations
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// "doci", "fci" or "selected"
    pub method: Option<String>,
    pub orbitals: usize,
    pub electrons_alpha: usize,
    /// Defaults to the number of alpha electrons
    pub electrons_beta: Option<usize>,
    pub frozen_orbitals: Option<usize>,
    /// Alpha and beta bitstrings (orbital 0 rightmost) for selected CI
    pub configurations: Option<Vec<[String; 2]>>,
    pub solver: Option<SolverParams>,
    pub hubbard: Option<HubbardModel>,
    pub integrals: Option<InMemoryIntegrals>,
}

impl Config {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        if self.method.is_none() {
            self.method = Some("fci".to_string());
        }
        if self.electrons_beta.is_none() {
            self.electrons_beta = Some(self.electrons_alpha);
        }
        if self.frozen_orbitals.is_none() {
            self.frozen_orbitals = Some(0);
        }
        self.solver = Some(self.solver.unwrap_or_default().with_defaults());
        self
    }

    fn electrons_beta(&self) -> usize {
        self.electrons_beta.unwrap_or(self.electrons_alpha)
    }

    fn frozen_orbitals(&self) -> usize {
        self.frozen_orbitals.unwrap_or(0)
    }

    /// The Hamiltonian builder for the configured method and Fock space
    pub fn build_hamiltonian_builder(&self) -> Result<Box<dyn HamiltonianBuilder>> {
        let k = self.orbitals;
        let n_alpha = self.electrons_alpha;
        let n_beta = self.electrons_beta();
        let x = self.frozen_orbitals();
        let method = self.method.as_deref().unwrap_or("fci");

        match method.to_lowercase().as_str() {
            "doci" => {
                if n_alpha != n_beta {
                    return invalid(format!(
                        "DOCI needs equal alpha and beta electrons, got {} and {}",
                        n_alpha, n_beta
                    ));
                }
                if x > 0 {
                    Ok(Box::new(FrozenCoreCi::doci(&FrozenFockSpace::new(k, n_alpha, x)?)))
                } else {
                    Ok(Box::new(Doci::new(FockSpace::new(k, n_alpha)?)))
                }
            }
            "fci" => {
                if x > 0 {
                    Ok(Box::new(FrozenCoreCi::fci(&FrozenProductFockSpace::new(
                        k, n_alpha, n_beta, x,
                    )?)))
                } else {
                    Ok(Box::new(Fci::new(ProductFockSpace::new(k, n_alpha, n_beta)?)))
                }
            }
            "selected" => {
                if x > 0 {
                    return invalid("selected CI lists its frozen orbitals explicitly in the configurations");
                }
                let mut fock_space = SelectedFockSpace::new(k, n_alpha, n_beta)?;
                for [alpha, beta] in self.configurations.iter().flatten() {
                    fock_space.add_configuration(alpha, beta)?;
                }
                if fock_space.dimension() == 0 {
                    return invalid("selected CI needs at least one configuration");
                }
                Ok(Box::new(SelectedCi::new(fock_space)))
            }
            other => invalid(format!("unknown CI method '{}'", other)),
        }
    }

    pub fn solver_options(&self) -> Result<SolverOptions> {
        self.solver
            .clone()
            .unwrap_or_default()
            .with_defaults()
            .to_solver_options()
    }

    /// The integral source named in the configuration; exactly one must be given
    pub fn integral_provider(&self) -> Result<Box<dyn IntegralProvider>> {
        match (&self.hubbard, &self.integrals) {
            (Some(hubbard), None) => Ok(Box::new(hubbard.clone())),
            (None, Some(integrals)) => Ok(Box::new(integrals.clone())),
            (None, None) => invalid("no integral source: give either 'hubbard' or 'integrals'"),
            (Some(_), Some(_)) => invalid("give either 'hubbard' or 'integrals', not both"),
        }
    }
}

/// Eigensolver parameters
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SolverParams {
    /// "dense" or "davidson"
    pub algorithm: Option<String>,
    pub number_of_requested_eigenpairs: Option<usize>,
    pub convergence_threshold: Option<f64>,
    pub correction_threshold: Option<f64>,
    pub maximum_subspace_dimension: Option<usize>,
    pub collapsed_subspace_dimension: Option<usize>,
    pub maximum_number_of_iterations: Option<usize>,
}

impl Default for SolverParams {
    fn default() -> Self {
        let davidson = DavidsonSolverOptions::default();
        SolverParams {
            algorithm: Some("davidson".to_string()),
            number_of_requested_eigenpairs: Some(davidson.number_of_requested_eigenpairs),
            convergence_threshold: Some(davidson.convergence_threshold),
            correction_threshold: Some(davidson.correction_threshold),
            maximum_subspace_dimension: Some(davidson.maximum_subspace_dimension),
            collapsed_subspace_dimension: Some(davidson.collapsed_subspace_dimension),
            maximum_number_of_iterations: Some(davidson.maximum_number_of_iterations),
        }
    }
}

impl SolverParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.algorithm.is_none() {
            self.algorithm = defaults.algorithm;
        }
        if self.number_of_requested_eigenpairs.is_none() {
            self.number_of_requested_eigenpairs = defaults.number_of_requested_eigenpairs;
        }
        if self.convergence_threshold.is_none() {
            self.convergence_threshold = defaults.convergence_threshold;
        }
        if self.correction_threshold.is_none() {
            self.correction_threshold = defaults.correction_threshold;
        }
        if self.maximum_subspace_dimension.is_none() {
            self.maximum_subspace_dimension = defaults.maximum_subspace_dimension;
        }
        if self.collapsed_subspace_dimension.is_none() {
            self.collapsed_subspace_dimension = defaults.collapsed_subspace_dimension;
        }
        if self.maximum_number_of_iterations.is_none() {
            self.maximum_number_of_iterations = defaults.maximum_number_of_iterations;
        }
        self
    }

    fn to_solver_options(&self) -> Result<SolverOptions> {
        let defaults = DavidsonSolverOptions::default();
        let requested = self
            .number_of_requested_eigenpairs
            .unwrap_or(defaults.number_of_requested_eigenpairs);
        let algorithm = self.algorithm.as_deref().unwrap_or("davidson");

        match algorithm.to_lowercase().as_str() {
            "dense" => Ok(SolverOptions::Dense {
                number_of_requested_eigenpairs: requested,
            }),
            "davidson" => Ok(SolverOptions::Davidson(DavidsonSolverOptions {
                number_of_requested_eigenpairs: requested,
                convergence_threshold: self
                    .convergence_threshold
                    .unwrap_or(defaults.convergence_threshold),
                correction_threshold: self
                    .correction_threshold
                    .unwrap_or(defaults.correction_threshold),
                maximum_subspace_dimension: self
                    .maximum_subspace_dimension
                    .unwrap_or(defaults.maximum_subspace_dimension),
                collapsed_subspace_dimension: self
                    .collapsed_subspace_dimension
                    .unwrap_or(defaults.collapsed_subspace_dimension),
                maximum_number_of_iterations: self
                    .maximum_number_of_iterations
                    .unwrap_or(defaults.maximum_number_of_iterations),
            })),
            other => invalid(format!("unknown eigensolver '{}'", other)),
        }
    }
}
