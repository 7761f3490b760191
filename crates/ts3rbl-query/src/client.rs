//! ServerQuery connection.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tokio::net::TcpStream;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, trace};
use ts3rbl_core::{Event, Properties};

use crate::codec::{self, Command};
use crate::config::{QueryConfig, DEFAULT_PORT};
use crate::error::{QueryError, QueryResult};

/// First line sent by every ServerQuery interface
const GREETING: &str = "TS3";

/// A single ServerQuery connection.
///
/// Notifications that arrive while a command response is being read are
/// queued and handed out, in order, by [`QueryClient::next_event`].
pub struct QueryClient<S = TcpStream> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    line: Vec<u8>,
    pending: VecDeque<Event>,
    welcome: String,
    config: QueryConfig,
}

impl QueryClient<TcpStream> {
    /// Connect to `host:port` with default timeouts
    pub async fn connect(host: impl Into<String>, port: u16) -> QueryResult<Self> {
        Self::builder(host).port(port).connect().await
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(host: impl Into<String>) -> QueryClientBuilder {
        QueryClientBuilder::new(host)
    }
}

impl<S> QueryClient<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    /// Wrap an already connected stream and consume the greeting
    pub async fn from_stream(stream: S, config: QueryConfig) -> QueryResult<Self> {
        let (reader, writer) = split(stream);
        let mut client = Self {
            reader: BufReader::new(reader),
            writer,
            line: Vec::new(),
            pending: VecDeque::new(),
            welcome: String::new(),
            config,
        };

        let greeting_timeout = client.config.connect_timeout;
        let (first, welcome) = timeout(greeting_timeout, async {
            let first = client.read_line().await?;
            let welcome = client.read_line().await?;
            Ok::<_, QueryError>((first, welcome))
        })
        .await
        .map_err(|_| QueryError::Greeting(format!("no greeting within {greeting_timeout:?}")))??;

        if first != GREETING {
            return Err(QueryError::Greeting(first));
        }
        debug!(welcome = %welcome, "ServerQuery greeting received");
        client.welcome = welcome;

        Ok(client)
    }

    /// Welcome banner sent after the greeting
    #[must_use]
    pub fn welcome(&self) -> &str {
        &self.welcome
    }

    /// Number of notifications read but not yet handed out
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    /// Send a command and collect its response rows
    pub async fn query(&mut self, command: &Command) -> QueryResult<Vec<Properties>> {
        debug!(command = command.name(), "sending query");
        self.write_line(&command.encode()).await?;

        let response_timeout = self.config.response_timeout;
        timeout(response_timeout, self.read_response())
            .await
            .map_err(|_| QueryError::NoResponse {
                command: command.name().to_string(),
                timeout: response_timeout,
            })?
    }

    async fn read_response(&mut self) -> QueryResult<Vec<Properties>> {
        let mut rows = Vec::new();
        loop {
            let line = self.read_line().await?;
            if let Some(rest) = line.strip_prefix("error ") {
                codec::parse_status(rest)?.into_result()?;
                return Ok(rows);
            }
            if line.starts_with("notify") {
                self.pending.push_back(codec::parse_event(&line)?);
            } else {
                rows.extend(codec::parse_rows(&line));
            }
        }
    }

    /// Wait for the next notification.
    ///
    /// Lines that are neither notifications nor part of a response are
    /// skipped. The wait is cancel safe: a partially received line is kept
    /// and completed by the next call.
    pub async fn next_event(&mut self, wait: Duration) -> QueryResult<Event> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }

        let deadline = Instant::now() + wait;
        loop {
            let line = timeout_at(deadline, self.read_line())
                .await
                .map_err(|_| QueryError::Timeout(wait))??;
            if line.starts_with("notify") {
                return codec::parse_event(&line);
            }
            debug!(line = %line, "ignoring unsolicited line");
        }
    }

    /// Send an empty line; the server does not answer it
    pub async fn keepalive(&mut self) -> QueryResult<()> {
        trace!("keepalive");
        self.write_line("\n").await
    }

    /// Say goodbye and close the write side
    pub async fn quit(&mut self) -> QueryResult<()> {
        self.write_line("quit\n").await?;
        self.writer.shutdown().await?;
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> QueryResult<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read the next non-empty line, without its `\n\r` framing
    async fn read_line(&mut self) -> QueryResult<String> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.line).await?;
            if read == 0 || self.line.last() != Some(&b'\n') {
                return Err(QueryError::Closed);
            }
            let raw = std::mem::take(&mut self.line);
            let text = String::from_utf8_lossy(&raw);
            let text = text.trim_matches(|c| c == '\r' || c == '\n');
            if !text.is_empty() {
                trace!(line = %text, "received");
                return Ok(text.to_string());
            }
        }
    }
}

/// Builder for a TCP [`QueryClient`]
pub struct QueryClientBuilder {
    host: String,
    port: u16,
    config: QueryConfig,
}

impl QueryClientBuilder {
    /// Create a builder for `host` on the default ServerQuery port
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            config: QueryConfig::default(),
        }
    }

    /// Set the port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Open the connection and read the greeting
    pub async fn connect(self) -> QueryResult<QueryClient> {
        let addr = format!("{}:{}", self.host, self.port);
        debug!(addr = %addr, "connecting to ServerQuery");

        let stream = timeout(self.config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| QueryError::ConnectTimeout {
                addr: addr.clone(),
                timeout: self.config.connect_timeout,
            })??;
        stream.set_nodelay(true)?;

        QueryClient::from_stream(stream, self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    const WELCOME: &[u8] = b"TS3\n\rWelcome to the TeamSpeak 3 ServerQuery interface, type \"help\" for a list of commands.\n\r";

    #[tokio::test]
    async fn reads_greeting() {
        let mock = Builder::new().read(WELCOME).build();
        let client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();
        assert!(client.welcome().starts_with("Welcome to the TeamSpeak 3"));
    }

    #[tokio::test]
    async fn rejects_foreign_greeting() {
        let mock = Builder::new().read(b"SSH-2.0-OpenSSH_9.6\r\nsecond\n").build();
        let err = QueryClient::from_stream(mock, QueryConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, QueryError::Greeting(line) if line.starts_with("SSH")));
    }

    #[tokio::test]
    async fn query_collects_rows() {
        let mock = Builder::new()
            .read(WELCOME)
            .write(b"clientlist\n")
            .read(b"clid=1 cid=1 client_nickname=serveradmin client_type=1|clid=42 cid=1 client_nickname=guest client_type=0\n\r")
            .read(b"error id=0 msg=ok\n\r")
            .build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        let rows = client.query(&Command::new("clientlist")).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["clid"], "42");
    }

    #[tokio::test]
    async fn query_reports_server_error() {
        let mock = Builder::new()
            .read(WELCOME)
            .write(b"use sid=9\n")
            .read(b"error id=1024 msg=invalid\\sserverID\n\r")
            .build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        let err = client.query(&Command::new("use").arg("sid", 9)).await.unwrap_err();
        assert!(matches!(err, QueryError::Server { id: 1024, ref message } if message == "invalid serverID"));
    }

    #[tokio::test]
    async fn notifications_during_query_are_queued() {
        let mock = Builder::new()
            .read(WELCOME)
            .write(b"whoami\n")
            .read(b"notifycliententerview cfid=0 ctid=1 reasonid=0 clid=42 client_servergroups=8\n\r")
            .read(b"virtualserver_status=online client_id=3 client_nickname=RBLBot\n\rerror id=0 msg=ok\n\r")
            .build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        let rows = client.query(&Command::new("whoami")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["client_id"], "3");
        assert_eq!(client.pending_events(), 1);

        let event = client.next_event(Duration::from_secs(1)).await.unwrap();
        assert_eq!(event.get("clid"), Some("42"));
        assert_eq!(client.pending_events(), 0);
    }

    #[tokio::test]
    async fn next_event_skips_unsolicited_lines() {
        let mock = Builder::new()
            .read(WELCOME)
            .read(b"error id=0 msg=ok\n\r")
            .read(b"notifyclientleftview cfid=1 ctid=0 reasonid=8 clid=42\n\r")
            .build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        let event = client.next_event(Duration::from_secs(1)).await.unwrap();
        assert_eq!(event.kind, "notifyclientleftview");
    }

    #[tokio::test]
    async fn next_event_reports_closed_connection() {
        let mock = Builder::new().read(WELCOME).build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        let err = client.next_event(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, QueryError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn next_event_times_out() {
        let (stream, mut server) = tokio::io::duplex(1024);
        server.write_all(WELCOME).await.unwrap();
        let mut client = QueryClient::from_stream(stream, QueryConfig::default()).await.unwrap();

        let err = client.next_event(Duration::from_secs(540)).await.unwrap_err();
        assert!(matches!(err, QueryError::Timeout(window) if window == Duration::from_secs(540)));
        drop(server);
    }

    #[tokio::test(start_paused = true)]
    async fn partial_line_survives_timeout() {
        let (stream, mut server) = tokio::io::duplex(1024);
        server.write_all(WELCOME).await.unwrap();
        let mut client = QueryClient::from_stream(stream, QueryConfig::default()).await.unwrap();

        server.write_all(b"notifycliententerview clid=7 ").await.unwrap();
        assert!(client.next_event(Duration::from_secs(5)).await.is_err());

        server.write_all(b"client_servergroups=8\n\r").await.unwrap();
        let event = client.next_event(Duration::from_secs(5)).await.unwrap();
        assert_eq!(event.get("clid"), Some("7"));
        assert_eq!(event.get("client_servergroups"), Some("8"));
    }

    #[tokio::test]
    async fn keepalive_and_quit_write_lines() {
        let mock = Builder::new()
            .read(WELCOME)
            .write(b"\n")
            .write(b"quit\n")
            .build();
        let mut client = QueryClient::from_stream(mock, QueryConfig::default()).await.unwrap();

        client.keepalive().await.unwrap();
        client.quit().await.unwrap();
    }
}
