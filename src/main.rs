use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use txfilter::bootstrap::{load_env_file, run};
use txfilter::cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse_args();

    // Before the subscriber, so RUST_LOG can come from the .env file
    let env_loaded = load_env_file(&args.env_file);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = env_loaded {
        tracing::warn!("Could not read {}: {e}", args.env_file);
    }

    match run(args).await {
        Ok(report) => {
            tracing::info!("{report}");
            println!("DONE!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Scan failed: {e}");
            eprintln!("ERROR: {e}");
            ExitCode::from(1)
        }
    }
}
