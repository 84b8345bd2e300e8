//! Binary entry point: loads configuration, initializes tracing, and
//! hands off to the kernel.

use mdm_orchestrator::prelude::*;
use mdm_telemetry::init_tracing;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_tracing("mdm_orchestrator");

    let config = Config::load().unwrap_or_else(|error| {
        eprintln!("configuration error: {error}");
        std::process::exit(1);
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        info!("orchestrator starting");
        let kernel = OrchestratorKernel::ignite(config).await;
        kernel.run().await;
    });

    Ok(())
}
