//! Client configuration types.

use std::time::Duration;

/// Default ServerQuery port
pub const DEFAULT_PORT: u16 = 10011;

/// Timeouts applied by the ServerQuery client
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How long to wait for the TCP connect and the greeting
    pub connect_timeout: Duration,

    /// How long to wait for the `error` line that ends a command response
    pub response_timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryConfig {
    /// Create a configuration with the default timeouts
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            response_timeout: Duration::from_secs(30),
        }
    }
}
