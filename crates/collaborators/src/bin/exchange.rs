use std::sync::Arc;

use collaborators::exchange::{self, ExchangeState};
use collaborators::{SimulatorConfig, server};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = SimulatorConfig::from_env(exchange::DEFAULT_PORT);
    server::init_tracing(&config.log_level);

    let state = Arc::new(ExchangeState::new(config.fault_injection));
    server::serve(exchange::SERVICE_NAME, exchange::router(state), &config).await
}
