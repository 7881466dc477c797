extern crate nalgebra as na;

use super::eigenpair::{sorted_symmetric_eigen, Eigenpair};
use crate::error::{invalid, CiError, Result};
use na::DMatrix;
use tracing::info;

/// Exact diagonalization of the full Hamiltonian matrix
#[derive(Debug, Clone)]
pub struct DenseSolver {
    number_of_requested_eigenpairs: usize,
    eigenpairs: Option<Vec<Eigenpair>>,
}

impl DenseSolver {
    pub fn new(number_of_requested_eigenpairs: usize) -> Result<Self> {
        if number_of_requested_eigenpairs == 0 {
            return invalid("at least one eigenpair must be requested");
        }
        Ok(DenseSolver {
            number_of_requested_eigenpairs,
            eigenpairs: None,
        })
    }

    /// Diagonalize `matrix` and keep the lowest eigenpairs
    pub fn solve(&mut self, matrix: DMatrix<f64>) -> Result<()> {
        if !matrix.is_square() {
            return invalid(format!(
                "cannot diagonalize a {} x {} matrix",
                matrix.nrows(),
                matrix.ncols()
            ));
        }
        if matrix.nrows() < self.number_of_requested_eigenpairs {
            return invalid(format!(
                "{} eigenpairs requested from a matrix of dimension {}",
                self.number_of_requested_eigenpairs,
                matrix.nrows()
            ));
        }

        info!("Diagonalizing {} x {} matrix...", matrix.nrows(), matrix.ncols());
        let (eigenvalues, eigenvectors) = sorted_symmetric_eigen(matrix);
        self.eigenpairs = Some(
            (0..self.number_of_requested_eigenpairs)
                .map(|i| Eigenpair::new(eigenvalues[i], eigenvectors.column(i).into_owned()))
                .collect(),
        );
        Ok(())
    }

    pub fn eigenpairs(&self) -> Result<&[Eigenpair]> {
        self.eigenpairs
            .as_deref()
            .ok_or_else(|| CiError::NotSolved("the dense solver has not been run".to_string()))
    }
}
