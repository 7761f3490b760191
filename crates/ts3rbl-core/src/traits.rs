//! Seams between the bot and its two collaborators.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;
use crate::types::{Event, Properties, RblListing, WhoAmI};

/// ServerQuery commands the bot relies on.
///
/// Implementations own one connection; every method takes `&mut self`, so at
/// most one command is in flight at a time.
#[async_trait]
pub trait QuerySession: Send {
    /// `login client_login_name=… client_login_password=…`
    async fn login(&mut self, username: &str, password: &str) -> Result<()>;

    /// `use sid=…`
    async fn use_server(&mut self, server_id: u32) -> Result<()>;

    /// `clientupdate client_nickname=…`
    async fn set_nickname(&mut self, nickname: &str) -> Result<()>;

    /// `whoami`
    async fn whoami(&mut self) -> Result<WhoAmI>;

    /// `clientmove clid=… cid=…`
    async fn client_move(&mut self, clid: u32, cid: u32) -> Result<()>;

    /// `clientlist`, one row per connected client
    async fn client_list(&mut self) -> Result<Vec<Properties>>;

    /// `clientinfo clid=…`
    async fn client_info(&mut self, clid: u32) -> Result<Vec<Properties>>;

    /// `clientkick clid=… reasonid=… reasonmsg=…`
    async fn client_kick(&mut self, clid: u32, reason_id: u32, reason: &str) -> Result<()>;

    /// `banclient clid=… time=… banreason=…`, returns the created ban rows
    async fn ban_client(&mut self, clid: u32, seconds: u64, reason: &str) -> Result<Vec<Properties>>;

    /// `servernotifyregister event=…`
    async fn server_notify_register(&mut self, event: &str) -> Result<()>;

    /// Keep the idle connection from being dropped by the server
    async fn send_keepalive(&mut self) -> Result<()>;

    /// Block until the next notification or until `timeout` elapses.
    ///
    /// Expiry is reported as [`crate::BotError::Timeout`], transport failure as
    /// [`crate::BotError::Connection`].
    async fn wait_for_event(&mut self, timeout: Duration) -> Result<Event>;

    /// Leave the server and shut the transport down
    async fn close(&mut self) -> Result<()>;
}

/// DNS blacklist lookup.
#[async_trait]
pub trait BlacklistLookup: Send + Sync {
    /// Ask every configured blacklist about `address`.
    ///
    /// The returned listing also contains the [`crate::SEARCH_HOST`] entry.
    async fn lookup(&self, address: &str) -> Result<RblListing>;
}
