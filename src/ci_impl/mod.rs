//! Configuration Interaction (CI) solver
//!
//! Ties a Hamiltonian builder, a set of Hamiltonian parameters and an
//! eigensolver together.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fock_ci::ci_impl::{CISolver, SolverOptions};
//! use fock_ci::fock_space_impl::ProductFockSpace;
//! use fock_ci::hamiltonian_impl::{Fci, HamiltonianParameters, HubbardModel};
//!
//! let parameters = HamiltonianParameters::from_provider(&HubbardModel::ring(4, 1.0, 2.0))?;
//! let builder = Fci::new(ProductFockSpace::new(4, 2, 2)?);
//!
//! let mut solver = CISolver::new(Box::new(builder), parameters)?;
//! solver.solve(&SolverOptions::Davidson(Default::default()))?;
//! let energy = solver.lowest_eigenvalue()?;
//! ```

mod ci;

pub use ci::{initial_guess_from_diagonal, CISolver, SolverOptions};
