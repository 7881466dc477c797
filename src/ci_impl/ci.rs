//! Core CI solver implementation

extern crate nalgebra as na;

use crate::eigen_impl::{DavidsonSolver, DavidsonSolverOptions, DenseSolver, Eigenpair};
use crate::error::{invalid, CiError, Result};
use crate::hamiltonian_impl::{check_parameters, HamiltonianBuilder, HamiltonianParameters};
use na::{DMatrix, DVector};
use std::borrow::Cow;
use tracing::info;

/// Eigensolver selection
#[derive(Debug, Clone, PartialEq)]
pub enum SolverOptions {
    /// Build the full matrix and diagonalize it
    Dense { number_of_requested_eigenpairs: usize },
    /// Davidson iterations on matrix-vector products
    Davidson(DavidsonSolverOptions),
}

impl SolverOptions {
    pub fn number_of_requested_eigenpairs(&self) -> usize {
        match self {
            SolverOptions::Dense {
                number_of_requested_eigenpairs,
            } => *number_of_requested_eigenpairs,
            SolverOptions::Davidson(options) => options.number_of_requested_eigenpairs,
        }
    }
}

/// CI calculation structure
pub struct CISolver {
    builder: Box<dyn HamiltonianBuilder>,
    parameters: HamiltonianParameters,
    eigenpairs: Option<Vec<Eigenpair>>,
    number_of_iterations: Option<usize>,
}

impl CISolver {
    /// # Arguments
    ///
    /// * `builder` - Hamiltonian builder for the chosen Fock space
    /// * `parameters` - Integrals over the builder's orbitals
    pub fn new(
        builder: Box<dyn HamiltonianBuilder>,
        parameters: HamiltonianParameters,
    ) -> Result<Self> {
        check_parameters(builder.as_ref(), &parameters)?;
        if builder.dimension() == 0 {
            return invalid(format!("the {} space holds no configurations", builder.name()));
        }

        info!("===========================================");
        info!("        CI Initialization");
        info!("===========================================");
        info!("Method: {}", builder.name());
        info!("Number of orbitals: {}", builder.number_of_orbitals());
        info!("Number of configurations: {}", builder.dimension());
        info!("===========================================");

        Ok(CISolver {
            builder,
            parameters,
            eigenpairs: None,
            number_of_iterations: None,
        })
    }

    pub fn builder(&self) -> &dyn HamiltonianBuilder {
        self.builder.as_ref()
    }

    pub fn parameters(&self) -> &HamiltonianParameters {
        &self.parameters
    }

    /// Compute the lowest eigenpairs; earlier results are discarded
    pub fn solve(&mut self, options: &SolverOptions) -> Result<()> {
        self.eigenpairs = None;
        self.number_of_iterations = None;

        let requested = options.number_of_requested_eigenpairs();
        if requested > self.builder.dimension() {
            return invalid(format!(
                "{} eigenpairs requested from {} configurations",
                requested,
                self.builder.dimension()
            ));
        }

        match options {
            SolverOptions::Dense {
                number_of_requested_eigenpairs,
            } => {
                info!("Solving {} with the dense solver", self.builder.name());
                let hamiltonian = self.builder.construct_hamiltonian(&self.parameters)?;
                let mut solver = DenseSolver::new(*number_of_requested_eigenpairs)?;
                solver.solve(hamiltonian)?;
                self.eigenpairs = Some(solver.eigenpairs()?.to_vec());
            }
            SolverOptions::Davidson(davidson_options) => {
                info!("Solving {} with the Davidson solver", self.builder.name());
                let diagonal = self.builder.calculate_diagonal(&self.parameters)?;
                let initial_guess = if requested == 1 {
                    DMatrix::from_columns(&[self.builder.hartree_fock_expansion()])
                } else {
                    initial_guess_from_diagonal(&diagonal, requested)
                };

                let mut solver =
                    DavidsonSolver::new(diagonal.clone(), initial_guess, davidson_options.clone())?;
                let operator = self
                    .builder
                    .matrix_vector_operator(Cow::Borrowed(&self.parameters), &diagonal)?;
                solver.solve(|x| operator(x))?;

                self.eigenpairs = Some(solver.eigenpairs()?.to_vec());
                self.number_of_iterations = Some(solver.number_of_iterations()?);
            }
        }

        if let Some(eigenpairs) = &self.eigenpairs {
            info!("===========================================");
            info!("        {} Results", self.builder.name());
            info!("===========================================");
            for (i, eigenpair) in eigenpairs.iter().enumerate() {
                info!("Root {:>3}: {:.10} Eh", i, eigenpair.eigenvalue);
            }
            info!("===========================================");
        }
        Ok(())
    }

    pub fn eigenpairs(&self) -> Result<&[Eigenpair]> {
        self.eigenpairs
            .as_deref()
            .ok_or_else(|| CiError::NotSolved("the CI solver has not been run".to_string()))
    }

    pub fn eigenpair(&self, index: usize) -> Result<&Eigenpair> {
        let eigenpairs = self.eigenpairs()?;
        eigenpairs.get(index).ok_or_else(|| {
            CiError::InvalidConfiguration(format!(
                "eigenpair {} requested but only {} were computed",
                index,
                eigenpairs.len()
            ))
        })
    }

    pub fn lowest_eigenvalue(&self) -> Result<f64> {
        Ok(self.eigenpair(0)?.eigenvalue)
    }

    /// Davidson iterations of the last solve; `None` after a dense solve
    pub fn number_of_iterations(&self) -> Result<Option<usize>> {
        self.eigenpairs()?;
        Ok(self.number_of_iterations)
    }
}

/// Unit vectors on the `count` configurations with the lowest diagonal elements
pub fn initial_guess_from_diagonal(diagonal: &DVector<f64>, count: usize) -> DMatrix<f64> {
    let mut order: Vec<usize> = (0..diagonal.len()).collect();
    order.sort_by(|&a, &b| diagonal[a].total_cmp(&diagonal[b]));

    let count = count.min(diagonal.len());
    let mut guess = DMatrix::zeros(diagonal.len(), count);
    for (column, &row) in order.iter().take(count).enumerate() {
        guess[(row, column)] = 1.0;
    }
    guess
}
