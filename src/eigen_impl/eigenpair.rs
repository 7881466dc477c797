extern crate nalgebra as na;

use na::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair {
    pub eigenvalue: f64,
    pub eigenvector: DVector<f64>,
}

impl Eigenpair {
    pub fn new(eigenvalue: f64, eigenvector: DVector<f64>) -> Self {
        Eigenpair {
            eigenvalue,
            eigenvector,
        }
    }

    /// Same eigenvalue and the same eigenvector up to an overall sign
    pub fn is_equal_to(&self, other: &Eigenpair, tolerance: f64) -> bool {
        if self.eigenvector.len() != other.eigenvector.len()
            || (self.eigenvalue - other.eigenvalue).abs() > tolerance
        {
            return false;
        }
        let same = (&self.eigenvector - &other.eigenvector).amax() < tolerance;
        let flipped = (&self.eigenvector + &other.eigenvector).amax() < tolerance;
        same || flipped
    }
}

/// Full eigendecomposition of a symmetric matrix, eigenvalues ascending
///
/// Equal eigenvalues keep the order in which the decomposition returned them.
pub fn sorted_symmetric_eigen(matrix: DMatrix<f64>) -> (DVector<f64>, DMatrix<f64>) {
    let eigen = matrix.symmetric_eigen();

    let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let eigenvalues = DVector::from_iterator(order.len(), order.iter().map(|&i| eigen.eigenvalues[i]));
    let eigenvectors = eigen.eigenvectors.select_columns(order.iter());
    (eigenvalues, eigenvectors)
}
