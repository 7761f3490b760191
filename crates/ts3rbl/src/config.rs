//! Bot configuration.
//!
//! The YAML file has three required sections, `TS3Server`, `Logging` and
//! `Actions`, plus an optional `RBL` section:
//!
//! ```yaml
//! TS3Server:
//!   serverIP: 127.0.0.1
//!   serverPort: 10011
//!   serverID: 1
//!   serverUsername: serveradmin
//!   serverPassword: secret
//!   botNick: RBLBot
//!   defaultChannel: 1
//! Logging:
//!   logFile: ts3rbl.log
//!   logLevel: info
//! Actions:
//!   banTime: 86400
//!   reason: Your address is listed on spam blacklists
//!   rblListedNumber: 2
//!   onMatch: ban
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use ts3rbl_core::{ConfigError, OnMatch};
use ts3rbl_query::DEFAULT_PORT;
use ts3rbl_rbl::DEFAULT_QUERY_TIMEOUT;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize)]
pub struct BotConfig {
    /// Connection and identity on the chat server
    #[serde(rename = "TS3Server")]
    pub server: ServerParams,

    /// Log destination and level
    #[serde(rename = "Logging")]
    pub logging: LogParams,

    /// What to do with listed clients
    #[serde(rename = "Actions")]
    pub actions: ActionParams,

    /// Which blacklists to ask
    #[serde(rename = "RBL")]
    pub rbl: RblParams,
}

/// `TS3Server` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerParams {
    /// Host name or address of the ServerQuery interface
    #[serde(rename = "serverIP")]
    pub server_ip: String,

    /// ServerQuery port
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Virtual server to `use`
    #[serde(rename = "serverID")]
    pub server_id: u32,

    /// Query login name
    pub server_username: String,

    /// Query login password
    #[serde(skip_serializing)]
    pub server_password: String,

    /// Nickname the bot shows on the server
    pub bot_nick: String,

    /// Channel the bot moves itself into
    pub default_channel: u32,
}

/// `Logging` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogParams {
    /// Log file; rotated daily
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Minimum level; `None` means no level filtering
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// `Actions` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
    /// Ban duration in seconds
    pub ban_time: u64,

    /// Reason shown to kicked or banned clients
    pub reason: String,

    /// Blacklist hits needed before acting
    pub rbl_listed_number: usize,

    /// Kick or ban
    pub on_match: OnMatch,

    /// Seconds during which a moderated client is not acted on again; 0 disables
    #[serde(default = "default_repeat_window")]
    pub repeat_window: u64,
}

impl ActionParams {
    /// [`Self::repeat_window`] as a duration
    #[must_use]
    pub const fn repeat_window(&self) -> Duration {
        Duration::from_secs(self.repeat_window)
    }
}

/// `RBL` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RblParams {
    /// DNSBL zones to ask
    #[serde(default = "ts3rbl_rbl::lists::default_lists")]
    pub lists: Vec<String>,

    /// Per-zone timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout: u64,
}

impl Default for RblParams {
    fn default() -> Self {
        Self {
            lists: ts3rbl_rbl::lists::default_lists(),
            query_timeout: default_query_timeout(),
        }
    }
}

impl RblParams {
    /// [`Self::query_timeout`] as a duration
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }
}

/// Log level names accepted in `Logging.logLevel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogLevel {
    /// Everything
    Trace,
    /// Debug and above
    Debug,
    /// Info and above
    Info,
    /// Warnings and errors
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// Matching tracing filter
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" | "critical" => Ok(Self::Error),
            other => Err(format!("unknown log level `{other}`")),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
        .to_string()
    }
}

impl BotConfig {
    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate config text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(content)?;

        let config = Self {
            server: section(&doc, "TS3Server")?,
            logging: section(&doc, "Logging")?,
            actions: section(&doc, "Actions")?,
            rbl: optional_section(&doc, "RBL")?.unwrap_or_default(),
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bot_nick.trim().is_empty() {
            return Err(invalid("TS3Server", "botNick must not be empty"));
        }
        if self.actions.rbl_listed_number == 0 {
            return Err(invalid("Actions", "rblListedNumber must be at least 1"));
        }
        if self.actions.reason.trim().is_empty() {
            return Err(invalid("Actions", "reason must not be empty"));
        }
        if self.rbl.lists.iter().all(|zone| zone.trim().is_empty()) {
            return Err(invalid("RBL", "lists must name at least one zone"));
        }
        Ok(())
    }
}

fn section<T: DeserializeOwned>(doc: &serde_yaml::Value, name: &'static str) -> Result<T, ConfigError> {
    optional_section(doc, name)?.ok_or(ConfigError::MissingSection(name))
}

fn optional_section<T: DeserializeOwned>(
    doc: &serde_yaml::Value,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match doc.get(name) {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(value) => serde_yaml::from_value(value.clone())
            .map(Some)
            .map_err(|e| invalid(name, e.to_string())),
    }
}

fn invalid(section: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        section,
        message: message.into(),
    }
}

// Default value functions for serde.
const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_file() -> PathBuf {
    PathBuf::from("ts3rbl.log")
}

const fn default_repeat_window() -> u64 {
    540
}

const fn default_query_timeout() -> u64 {
    DEFAULT_QUERY_TIMEOUT.as_secs()
}
