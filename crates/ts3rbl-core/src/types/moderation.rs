use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// ServerQuery reason id for "kicked from server"
pub const REASON_KICK_SERVER: u32 = 5;

/// What to do with a client whose address is listed often enough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OnMatch {
    /// Disconnect the client
    Kick,
    /// Disconnect and ban the client for the configured time
    Ban,
}

impl FromStr for OnMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kick" => Ok(Self::Kick),
            "ban" => Ok(Self::Ban),
            other => Err(format!("unknown onMatch action `{other}`, expected `kick` or `ban`")),
        }
    }
}

impl TryFrom<String> for OnMatch {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<OnMatch> for String {
    fn from(value: OnMatch) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for OnMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kick => write!(f, "kick"),
            Self::Ban => write!(f, "ban"),
        }
    }
}
