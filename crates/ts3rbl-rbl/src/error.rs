use thiserror::Error;
use ts3rbl_core::BotError;

/// Result type alias for blacklist operations
pub type RblResult<T> = std::result::Result<T, RblError>;

/// Errors from blacklist lookups
#[derive(Error, Debug)]
pub enum RblError {
    /// Address could not be parsed
    #[error("invalid IP address: {0}")]
    InvalidIp(String),

    /// System resolver could not be set up
    #[error("resolver error: {0}")]
    Resolver(String),

    /// No blacklist could be asked at all
    #[error("all {zones} blacklists failed, last error: {last}")]
    AllFailed {
        /// Number of zones asked
        zones: usize,
        /// Error reported for the last zone
        last: String,
    },
}

impl From<RblError> for BotError {
    fn from(err: RblError) -> Self {
        Self::Lookup(err.to_string())
    }
}
