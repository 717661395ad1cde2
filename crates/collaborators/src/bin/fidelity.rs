use std::sync::Arc;

use collaborators::fidelity::{self, FidelityState};
use collaborators::{SimulatorConfig, server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = SimulatorConfig::from_env(fidelity::DEFAULT_PORT);
    server::init_tracing(&config.log_level);

    let state = Arc::new(FidelityState::new(config.fault_injection));
    server::serve(fidelity::SERVICE_NAME, fidelity::router(state), &config).await
}
