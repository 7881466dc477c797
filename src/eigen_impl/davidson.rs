//! Davidson diagonalization
//!
//! Finds the lowest eigenpairs of a symmetric operator that is only available
//! through matrix-vector products and its diagonal. The subspace grows by one
//! preconditioned correction per unconverged root and iteration, and collapses
//! onto the best Ritz vectors when it reaches its maximum size.

extern crate nalgebra as na;

use super::eigenpair::{sorted_symmetric_eigen, Eigenpair};
use super::options::DavidsonSolverOptions;
use super::subspace::SubspaceStore;
use crate::error::{invalid, CiError, Result};
use na::{DMatrix, DVector};
use tracing::{debug, info, warn};

/// Projected norm below which a new direction carries no information
const MINIMUM_CORRECTION_NORM: f64 = 1.0e-03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DavidsonState {
    Initializing,
    Iterating,
    Converged,
    Failed,
}

#[derive(Debug, Clone)]
pub struct DavidsonSolver {
    options: DavidsonSolverOptions,
    diagonal: DVector<f64>,
    initial_guess: DMatrix<f64>,
    state: DavidsonState,
    number_of_iterations: usize,
    eigenpairs: Vec<Eigenpair>,
}

impl DavidsonSolver {
    /// # Arguments
    ///
    /// * `diagonal` - Diagonal of the operator, used by the preconditioner
    /// * `initial_guess` - Guess vectors as columns, at least as many as requested eigenpairs
    /// * `options` - Thresholds and subspace limits
    pub fn new(
        diagonal: DVector<f64>,
        initial_guess: DMatrix<f64>,
        options: DavidsonSolverOptions,
    ) -> Result<Self> {
        let requested = options.number_of_requested_eigenpairs;
        if requested == 0 {
            return invalid("at least one eigenpair must be requested");
        }
        if initial_guess.ncols() < requested {
            return invalid(format!(
                "{} eigenpairs requested but only {} guess vectors supplied",
                requested,
                initial_guess.ncols()
            ));
        }
        if requested > options.collapsed_subspace_dimension {
            return invalid(format!(
                "the collapsed subspace dimension {} cannot hold {} requested eigenpairs",
                options.collapsed_subspace_dimension, requested
            ));
        }
        if options.collapsed_subspace_dimension >= options.maximum_subspace_dimension {
            return invalid(format!(
                "the collapsed subspace dimension {} must be smaller than the maximum subspace dimension {}",
                options.collapsed_subspace_dimension, options.maximum_subspace_dimension
            ));
        }
        if initial_guess.ncols() > options.maximum_subspace_dimension {
            return invalid(format!(
                "{} guess vectors do not fit a subspace of dimension {}",
                initial_guess.ncols(),
                options.maximum_subspace_dimension
            ));
        }
        if initial_guess.nrows() != diagonal.len() {
            return invalid(format!(
                "guess vectors of length {} do not match a diagonal of length {}",
                initial_guess.nrows(),
                diagonal.len()
            ));
        }
        if !(options.convergence_threshold > 0.0) || !(options.correction_threshold > 0.0) {
            return invalid("convergence and correction thresholds must be positive");
        }

        Ok(DavidsonSolver {
            options,
            diagonal,
            initial_guess,
            state: DavidsonState::Initializing,
            number_of_iterations: 0,
            eigenpairs: Vec::new(),
        })
    }

    pub fn state(&self) -> DavidsonState {
        self.state
    }

    pub fn options(&self) -> &DavidsonSolverOptions {
        &self.options
    }

    /// Run the iterations with `matvec` as the only access to the operator
    pub fn solve<F>(&mut self, mut matvec: F) -> Result<()>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>>,
    {
        let outcome = self.iterate(&mut matvec);
        if outcome.is_err() {
            self.state = DavidsonState::Failed;
        }
        outcome
    }

    fn iterate<F>(&mut self, matvec: &mut F) -> Result<()>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>>,
    {
        let dim = self.diagonal.len();
        let requested = self.options.number_of_requested_eigenpairs;

        info!("===========================================");
        info!("        Davidson Diagonalization");
        info!("===========================================");
        info!("Dimension: {}", dim);
        info!("Requested eigenpairs: {}", requested);
        info!("Convergence threshold: {:.2e}", self.options.convergence_threshold);
        info!("Maximum subspace dimension: {}", self.options.maximum_subspace_dimension);

        self.state = DavidsonState::Initializing;
        self.number_of_iterations = 0;
        self.eigenpairs.clear();

        let mut store = SubspaceStore::new(dim, self.options.maximum_subspace_dimension);
        for column in self.initial_guess.column_iter() {
            let mut vector = column.into_owned();
            let norm = vector.norm();
            if norm == 0.0 {
                continue;
            }
            vector /= norm;
            if let Some(vector) = orthonormalize(&store, &[], vector) {
                let image = matvec(&vector)?;
                store.push(&vector, &image);
            }
        }
        if store.len() < requested {
            return invalid(format!(
                "only {} of the guess vectors are linearly independent, {} are needed",
                store.len(),
                requested
            ));
        }

        self.state = DavidsonState::Iterating;
        loop {
            let (eigenvalues, z) = sorted_symmetric_eigen(store.s().clone());
            let z_requested = z.columns(0, requested);
            let ritz_vectors = store.v() * z_requested;
            let ritz_images = store.va() * z_requested;

            let mut residual_norms = Vec::with_capacity(requested);
            let mut residuals = Vec::with_capacity(requested);
            for i in 0..requested {
                let residual = ritz_images.column(i) - ritz_vectors.column(i) * eigenvalues[i];
                residual_norms.push(residual.norm());
                residuals.push(residual);
            }
            let max_residual = residual_norms.iter().cloned().fold(0.0, f64::max);
            debug!(
                "Davidson iteration {:>4}: subspace {:>3}, lowest eigenvalue {:.12}, max residual {:.3e}",
                self.number_of_iterations,
                store.len(),
                eigenvalues[0],
                max_residual
            );

            if residual_norms
                .iter()
                .all(|&norm| norm < self.options.convergence_threshold)
            {
                self.eigenpairs = (0..requested)
                    .map(|i| Eigenpair::new(eigenvalues[i], ritz_vectors.column(i).into_owned()))
                    .collect();
                self.state = DavidsonState::Converged;
                info!(
                    "Davidson converged in {} iterations, lowest eigenvalue {:.10}",
                    self.number_of_iterations, eigenvalues[0]
                );
                return Ok(());
            }

            self.number_of_iterations += 1;
            if self.number_of_iterations >= self.options.maximum_number_of_iterations {
                warn!(
                    "Davidson did not converge in {} iterations (max residual {:.3e})",
                    self.number_of_iterations, max_residual
                );
                return Err(CiError::NotConverged {
                    iterations: self.number_of_iterations,
                });
            }

            let mut corrections: Vec<DVector<f64>> = Vec::with_capacity(requested);
            for (i, residual) in residuals.iter().enumerate() {
                if residual_norms[i] < self.options.convergence_threshold {
                    continue;
                }
                let correction = self.precondition(residual, eigenvalues[i]);
                if let Some(correction) = orthonormalize(&store, &corrections, correction) {
                    corrections.push(correction);
                }
            }

            if store.len() + corrections.len() > self.options.maximum_subspace_dimension {
                let collapsed = self.options.collapsed_subspace_dimension.min(store.len());
                let z_collapsed = z.columns(0, collapsed);
                let vectors = store.v() * z_collapsed;
                let images = store.va() * z_collapsed;
                store.collapse(&vectors, &images);
                debug!("Collapsed the subspace to {} vectors", collapsed);
            }

            for correction in corrections {
                if store.is_full() {
                    break;
                }
                let image = matvec(&correction)?;
                store.push(&correction, &image);
            }
        }
    }

    /// Normalized diagonal-preconditioned correction for one residual
    fn precondition(&self, residual: &DVector<f64>, eigenvalue: f64) -> DVector<f64> {
        let threshold = self.options.correction_threshold;
        let mut correction = DVector::from_iterator(
            residual.len(),
            residual
                .iter()
                .zip(self.diagonal.iter())
                .map(|(r, d)| r / (d - eigenvalue).abs().max(threshold)),
        );
        let norm = correction.norm();
        if norm > 0.0 {
            correction /= norm;
        }
        correction
    }

    pub fn eigenpairs(&self) -> Result<&[Eigenpair]> {
        if self.state != DavidsonState::Converged {
            return Err(CiError::NotSolved(format!(
                "the Davidson solver is in state {:?}",
                self.state
            )));
        }
        Ok(&self.eigenpairs)
    }

    pub fn number_of_iterations(&self) -> Result<usize> {
        if self.state != DavidsonState::Converged {
            return Err(CiError::NotSolved(format!(
                "the Davidson solver is in state {:?}",
                self.state
            )));
        }
        Ok(self.number_of_iterations)
    }
}

/// Gram-Schmidt `vector` against the subspace and the already accepted `extra`
/// vectors, twice; `None` when too little of it is left
fn orthonormalize(
    store: &SubspaceStore,
    extra: &[DVector<f64>],
    mut vector: DVector<f64>,
) -> Option<DVector<f64>> {
    for _ in 0..2 {
        store.project_out(&mut vector);
        for other in extra {
            let overlap = other.dot(&vector);
            vector.axpy(-overlap, other, 1.0);
        }
    }
    let norm = vector.norm();
    if norm <= MINIMUM_CORRECTION_NORM {
        return None;
    }
    Some(vector / norm)
}
