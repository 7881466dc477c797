//! Logging setup

use color_eyre::eyre::{Result, WrapErr};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime as StdSystemTime;
use tracing::{info, Level};
use tracing_subscriber::{
    filter::LevelFilter, fmt::format::Writer, fmt::layer, fmt::time::FormatTime,
    layer::SubscriberExt, util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let total_seconds = StdSystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        write!(
            w,
            "{:02}:{:02}:{:02}",
            (total_seconds / 3600) % 24,
            (total_seconds / 60) % 60,
            total_seconds % 60
        )
    }
}

/// Install the global subscriber, writing to `output_path` or to stdout
///
/// Fails if the file cannot be created or a subscriber is already installed.
pub fn setup_output(output_path: Option<&Path>, level: Level) -> Result<()> {
    let filter = LevelFilter::from_level(level);

    match output_path {
        Some(path) => {
            let log = File::create(path).wrap_err_with(|| {
                format!("Could not create output file: {}", path.display())
            })?;
            let file_layer = layer()
                .with_writer(Mutex::new(log))
                .with_timer(SecondPrecisionTimer)
                .with_ansi(false);
            Registry::default()
                .with(filter)
                .with(file_layer)
                .try_init()
                .wrap_err("Failed to install the logger")?;
            info!("Output will be written to: {}", path.display());
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .wrap_err("Failed to install the logger")?;
            info!("Output will be printed to stdout");
        }
    }
    Ok(())
}
