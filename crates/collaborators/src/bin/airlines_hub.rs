use std::sync::Arc;

use collaborators::airlines_hub::{self, AirlinesHubState};
use collaborators::{SimulatorConfig, server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = SimulatorConfig::from_env(airlines_hub::DEFAULT_PORT);
    server::init_tracing(&config.log_level);

    let state = Arc::new(AirlinesHubState::new(config.fault_injection));
    server::serve(airlines_hub::SERVICE_NAME, airlines_hub::router(state), &config).await
}
