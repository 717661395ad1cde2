//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `AIRLINES_HUB_URL` — flight catalog base URL (default: `"http://localhost:8001"`)
/// - `EXCHANGE_URL` — exchange service base URL (default: `"http://localhost:8002"`)
/// - `FIDELITY_URL` — fidelity service base URL (default: `"http://localhost:8003"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub airlines_hub_url: String,
    pub exchange_url: String,
    pub fidelity_url: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            airlines_hub_url: lookup("AIRLINES_HUB_URL").unwrap_or(defaults.airlines_hub_url),
            exchange_url: lookup("EXCHANGE_URL").unwrap_or(defaults.exchange_url),
            fidelity_url: lookup("FIDELITY_URL").unwrap_or(defaults.fidelity_url),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            airlines_hub_url: "http://localhost:8001".to_string(),
            exchange_url: "http://localhost:8002".to_string(),
            fidelity_url: "http://localhost:8003".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.airlines_hub_url, "http://localhost:8001");
        assert_eq!(config.exchange_url, "http://localhost:8002");
        assert_eq!(config.fidelity_url, "http://localhost:8003");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9000"),
            ("EXCHANGE_URL", "http://exchange:8002"),
        ]);
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 9000);
        assert_eq!(config.exchange_url, "http://exchange:8002");
        assert_eq!(config.airlines_hub_url, "http://localhost:8001");
    }

    #[test]
    fn test_unparseable_port_falls_back() {
        let config = Config::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_addr_formatting() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Config::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }
}
