//! Input/Output operations for CI calculations
//!
//! This module handles logging setup and result reporting.

mod output;
mod report;

pub use output::setup_output;
pub use report::{print_eigenpairs, report_eigenpairs};
