//! Wiring for the `txfilter` binary
//!
//! This is the only place that touches the process environment: the `.env`
//! file is loaded here and its values are handed to the library as an
//! explicit [`EnvSettings`].

use std::path::Path;

use tracing::info;

use crate::cli::Args;
use crate::config::EnvSettings;
use crate::errors::ScanError;
use crate::pipeline::{ScanPipeline, ScanReport};
use crate::provider::connect;

/// Load variables from `path` into the process environment
///
/// A missing file is not an error; variables already set are kept.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<(), dotenvy::Error> {
    match dotenvy::from_path(path.as_ref()) {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

/// Main entry point for the application.
pub async fn run(args: Args) -> Result<ScanReport, ScanError> {
    let settings = EnvSettings::from_lookup(|name| dotenvy::var(name).ok());
    let config = args.scan_config()?;
    let backends = args.backends(&settings)?;

    let connected = connect(backends)?;
    let stats = connected.stats.clone();
    let pipeline = ScanPipeline::new(config, connected.chain, connected.rates);

    let result = pipeline.run().await;
    info!(
        requests = stats.requests(),
        failures = stats.failures(),
        "Remote calls made"
    );
    result
}
