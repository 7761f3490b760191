use std::time::Duration;
use thiserror::Error;

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, BotError>;

/// Errors raised while loading the bot configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML
    #[error("config file is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A required top-level section is absent
    #[error("missing required config section `{0}`")]
    MissingSection(&'static str),

    /// A section is present but a key is missing or has the wrong type
    #[error("invalid `{section}` section: {message}")]
    Invalid {
        /// Section name as written in the file
        section: &'static str,
        /// What was wrong with it
        message: String,
    },
}

/// Errors that can occur while the bot talks to the server or the blacklists
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Transport-level failure: the session is unusable
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server rejected a command
    #[error("query failed ({id}): {message}")]
    Query {
        /// ServerQuery error id
        id: u32,
        /// Server supplied message
        message: String,
    },

    /// The server sent something that does not decode into the expected shape
    #[error("protocol error: {0}")]
    Protocol(String),

    /// No event arrived inside the wait window
    #[error("no event received within {0:?}")]
    Timeout(Duration),

    /// Blacklist lookup failed
    #[error("blacklist lookup failed: {0}")]
    Lookup(String),

    /// Shutdown was requested from outside
    #[error("interrupted")]
    Interrupted,
}

impl BotError {
    /// Returns true if the session can no longer be used
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Config(_))
    }

    /// Returns true for an expired event wait
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Returns the ServerQuery error id if the server rejected a command
    #[must_use]
    pub const fn query_id(&self) -> Option<u32> {
        match self {
            Self::Query { id, .. } => Some(*id),
            _ => None,
        }
    }
}
