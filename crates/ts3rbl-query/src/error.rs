use std::time::Duration;
use thiserror::Error;
use ts3rbl_core::BotError;

/// Result type alias for ServerQuery operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Errors from the ServerQuery transport and command layer
#[derive(Error, Debug)]
pub enum QueryError {
    /// Socket I/O failed
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    /// TCP connect did not finish in time
    #[error("connect to {addr} timed out after {timeout:?}")]
    ConnectTimeout {
        /// Address being connected to
        addr: String,
        /// Configured connect timeout
        timeout: Duration,
    },

    /// The peer did not greet like a ServerQuery interface
    #[error("unexpected greeting: {0:?}")]
    Greeting(String),

    /// The server closed the connection
    #[error("connection closed by server")]
    Closed,

    /// A command got no complete response in time
    #[error("no response to `{command}` within {timeout:?}")]
    NoResponse {
        /// Command that was sent
        command: String,
        /// Configured response timeout
        timeout: Duration,
    },

    /// The server answered with a non-zero error id
    #[error("error id={id}: {message}")]
    Server {
        /// ServerQuery error id
        id: u32,
        /// Unescaped error message
        message: String,
    },

    /// A response line could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No notification arrived inside the wait window
    #[error("no event within {0:?}")]
    Timeout(Duration),
}

impl From<QueryError> for BotError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Server { id, message } => Self::Query { id, message },
            QueryError::Malformed(msg) => Self::Protocol(msg),
            QueryError::Timeout(window) => Self::Timeout(window),
            QueryError::Io(_)
            | QueryError::ConnectTimeout { .. }
            | QueryError::Greeting(_)
            | QueryError::Closed
            | QueryError::NoResponse { .. } => Self::Connection(err.to_string()),
        }
    }
}
