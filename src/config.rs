//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_EXECUTE_TIMEOUT_MS: u64 = 180_000;

/// Default per-operation timeouts, overridable per call through options.
///
/// The execute timeout is independent of (and larger than) the query timeout
/// because it covers endorsement plus ordering plus commit notification.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Query timeout in milliseconds.
    pub query_timeout_ms: u64,
    /// Execute-transaction timeout in milliseconds.
    pub execute_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            execute_timeout_ms: DEFAULT_EXECUTE_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Load from `LEDGER_QUERY_TIMEOUT_MS` / `LEDGER_EXECUTE_TIMEOUT_MS`
    /// environment variables, falling back to defaults for anything unset
    /// or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            query_timeout_ms: env_ms("LEDGER_QUERY_TIMEOUT_MS", defaults.query_timeout_ms),
            execute_timeout_ms: env_ms("LEDGER_EXECUTE_TIMEOUT_MS", defaults.execute_timeout_ms),
        }
    }

    /// The query timeout as a duration.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// The execute-transaction timeout as a duration.
    pub fn execute_timeout(&self) -> Duration {
        Duration::from_millis(self.execute_timeout_ms)
    }
}

fn env_ms(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
        assert_eq!(config.execute_timeout(), Duration::from_secs(180));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ClientConfig = serde_json::from_str(r#"{"query_timeout_ms": 5000}"#).unwrap();
        assert_eq!(config.query_timeout(), Duration::from_secs(5));
        assert_eq!(config.execute_timeout_ms, DEFAULT_EXECUTE_TIMEOUT_MS);
    }

    #[test]
    fn test_env_fallback_on_garbage() {
        assert_eq!(env_ms("LEDGER_TEST_UNSET_TIMEOUT", 1234), 1234);
    }
}
