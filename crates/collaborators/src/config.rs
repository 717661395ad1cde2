//! Simulator configuration loaded from environment variables.

/// Bind address and fault switch shared by every simulator binary.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: the service's own port)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `FAULT_INJECTION` — `false`/`0`/`off` disables injected faults (default: enabled)
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub fault_injection: bool,
}

impl SimulatorConfig {
    /// Creates the default configuration for a service listening on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port,
            log_level: "info".to_string(),
            fault_injection: true,
        }
    }

    /// Loads configuration from environment variables, falling back to
    /// `default_port` and the other defaults.
    pub fn from_env(default_port: u16) -> Self {
        Self::from_lookup(default_port, |key| std::env::var(key).ok())
    }

    fn from_lookup(default_port: u16, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::with_port(default_port);
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            fault_injection: lookup("FAULT_INJECTION")
                .map(|v| parse_switch(&v))
                .unwrap_or(defaults.fault_injection),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_switch(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::with_port(8002);
        assert_eq!(config.addr(), "0.0.0.0:8002");
        assert!(config.fault_injection);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("HOST", "127.0.0.1"),
            ("PORT", "9001"),
            ("FAULT_INJECTION", "false"),
        ]);
        let config =
            SimulatorConfig::from_lookup(8001, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.addr(), "127.0.0.1:9001");
        assert!(!config.fault_injection);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_bad_port_keeps_default() {
        let config = SimulatorConfig::from_lookup(8003, |key| {
            (key == "PORT").then(|| "not-a-port".to_string())
        });
        assert_eq!(config.port, 8003);
    }

    #[test]
    fn test_fault_switch_values() {
        assert!(!parse_switch("OFF"));
        assert!(!parse_switch("0"));
        assert!(parse_switch("true"));
        assert!(parse_switch("1"));
    }
}
