//! Configuration-driven CI runs
//!
//! Glue between a YAML configuration file and the library: load the file,
//! collect the integrals, build the Hamiltonian and solve.

use crate::ci_impl::CISolver;
use crate::config::Config;
use crate::hamiltonian_impl::{HamiltonianParameters, IntegralProvider};
use crate::io::report_eigenpairs;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and parse a configuration file, filling in defaults
pub fn load_config(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path).wrap_err_with(|| {
        format!("Unable to read configuration file: {}", path.display())
    })?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}

/// Run the calculation described by `config` on the integrals of `provider`
pub fn run_from_config(config: &Config, provider: &dyn IntegralProvider) -> Result<CISolver> {
    let parameters = HamiltonianParameters::from_provider(provider)
        .wrap_err("Failed to collect the integrals")?;
    let builder = config
        .build_hamiltonian_builder()
        .wrap_err("Failed to set up the Hamiltonian builder")?;
    let options = config
        .solver_options()
        .wrap_err("Invalid solver parameters")?;

    let mut solver =
        CISolver::new(builder, parameters).wrap_err("Integrals do not match the Fock space")?;
    solver
        .solve(&options)
        .wrap_err_with(|| format!("{} calculation failed", solver.builder().name()))?;

    report_eigenpairs(
        solver.builder().name(),
        solver.eigenpairs()?,
        solver.parameters().constant,
    );
    Ok(solver)
}

/// Load `path` and run it on the integral source the file names
pub fn run_config_file(path: &Path) -> Result<CISolver> {
    let config = load_config(path)?;
    info!("Loaded configuration from {}", path.display());

    let provider = config
        .integral_provider()
        .wrap_err("Configuration does not define the integrals")?;
    run_from_config(&config, provider.as_ref())
}
