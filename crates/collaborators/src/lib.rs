//! Stand-ins for the three services the purchase saga talks to.
//!
//! Each simulator keeps its data in memory and can inject random latency and
//! server errors so the saga's fault-tolerance policies can be exercised
//! against a running system:
//! - `airlines-hub` quotes and sells flights
//! - `exchange` quotes a dollar exchange rate
//! - `fidelity` credits loyalty points
//!
//! The saga never depends on this crate; it only sees the HTTP contract.

pub mod airlines_hub;
pub mod config;
pub mod exchange;
pub mod faults;
pub mod fidelity;
pub mod server;

pub use config::SimulatorConfig;
pub use faults::{FaultInjector, FaultProfile, InjectedFault};
