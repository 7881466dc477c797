//! Eigensolvers for the CI Hamiltonian
//!
//! - **Dense**: full symmetric eigendecomposition of an explicit matrix
//! - **Davidson**: iterative lowest eigenpairs from matrix-vector products
//!
//! Both return eigenpairs in ascending order of eigenvalue, and only after a
//! successful solve.

mod davidson;
mod dense;
mod eigenpair;
mod options;
mod subspace;

pub use davidson::{DavidsonSolver, DavidsonState};
pub use dense::DenseSolver;
pub use eigenpair::{sorted_symmetric_eigen, Eigenpair};
pub use options::DavidsonSolverOptions;
pub use subspace::SubspaceStore;
