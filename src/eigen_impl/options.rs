use serde::{Deserialize, Serialize};

/// Davidson thresholds and subspace limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DavidsonSolverOptions {
    pub number_of_requested_eigenpairs: usize,

    /// Every residual norm must drop below this value
    pub convergence_threshold: f64,

    /// Smallest denominator allowed in the diagonal preconditioner
    pub correction_threshold: f64,

    /// Subspace size that triggers a collapse
    pub maximum_subspace_dimension: usize,

    /// Number of Ritz vectors kept after a collapse
    pub collapsed_subspace_dimension: usize,

    pub maximum_number_of_iterations: usize,
}

impl Default for DavidsonSolverOptions {
    fn default() -> Self {
        DavidsonSolverOptions {
            number_of_requested_eigenpairs: 1,
            convergence_threshold: 1.0e-08,
            correction_threshold: 1.0e-12,
            maximum_subspace_dimension: 15,
            collapsed_subspace_dimension: 2,
            maximum_number_of_iterations: 128,
        }
    }
}
