// Configuration interaction in Fock-space representations

pub mod app;
pub mod ci_impl;
pub mod config;
pub mod eigen_impl;
pub mod error;
pub mod fock_space_impl;
pub mod hamiltonian_impl;
pub mod io;
pub mod onv;

pub use ci_impl::{CISolver, SolverOptions};
pub use eigen_impl::{DavidsonSolver, DavidsonSolverOptions, DenseSolver, Eigenpair};
pub use error::{CiError, Result};
pub use fock_space_impl::{
    FockPermutator, FockSpace, FrozenFockSpace, FrozenProductFockSpace, ProductFockSpace,
    SelectedFockSpace,
};
pub use hamiltonian_impl::{
    Doci, Fci, FrozenCoreCi, HamiltonianBuilder, HamiltonianParameters, HubbardModel,
    IntegralProvider, SelectedCi,
};
pub use onv::Onv;
