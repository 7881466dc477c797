//! Result summaries

use crate::eigen_impl::Eigenpair;
use color_eyre::eyre::Result;
use std::io::Write;
use tracing::info;

/// Log the eigenvalues, with and without the scalar offset of the Hamiltonian
pub fn report_eigenpairs(method: &str, eigenpairs: &[Eigenpair], constant: f64) {
    info!("");
    info!("===========================================");
    info!("       {} Results Summary", method);
    info!("===========================================");
    if constant != 0.0 {
        info!("Constant energy offset: {:.10} Eh", constant);
    }
    for (i, eigenpair) in eigenpairs.iter().enumerate() {
        info!(
            "  State {:>3}: electronic {:.10} Eh, total {:.10} Eh",
            i,
            eigenpair.eigenvalue,
            eigenpair.eigenvalue + constant
        );
    }
    info!("===========================================");
}

/// Write the eigenvalues and leading coefficients of each state to `writer`
pub fn print_eigenpairs<W: Write>(
    writer: &mut W,
    eigenpairs: &[Eigenpair],
    constant: f64,
    number_of_coefficients: usize,
) -> Result<()> {
    for (i, eigenpair) in eigenpairs.iter().enumerate() {
        writeln!(
            writer,
            "State {}: {:.10} Eh (total {:.10} Eh)",
            i,
            eigenpair.eigenvalue,
            eigenpair.eigenvalue + constant
        )?;

        let mut largest: Vec<(usize, f64)> =
            eigenpair.eigenvector.iter().cloned().enumerate().collect();
        largest.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        for (address, coefficient) in largest.into_iter().take(number_of_coefficients) {
            writeln!(writer, "  {:>8}  {:>14.10}", address, coefficient)?;
        }
    }
    Ok(())
}
