//! Session lifecycle and the event loop.

use std::fmt;
use std::future::Future;
use std::pin::{pin, Pin};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use ts3rbl_core::{BlacklistLookup, BotError, Event, QuerySession, Result};

use crate::actuator::Moderator;
use crate::checker::BlacklistChecker;
use crate::config::{BotConfig, ServerParams};
use crate::handler::JoinHandler;
use crate::resolver::resolve;

/// Longest time to wait for a notification before sending another keepalive
pub const EVENT_WAIT: Duration = Duration::from_secs(540);

/// Lifecycle of the bot's session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport yet
    Disconnected,
    /// Transport open, greeting read
    Connecting,
    /// Sending login, server selection and nickname
    Authenticating,
    /// Identity verified
    Ready,
    /// Waiting for and dispatching notifications
    EventLoop,
    /// Leaving the server
    Closing,
    /// Shut down cleanly
    Terminated,
    /// Shut down after an unrecoverable error
    FatalError,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Ready => "ready",
            Self::EventLoop => "event loop",
            Self::Closing => "closing",
            Self::Terminated => "terminated",
            Self::FatalError => "fatal error",
        };
        f.write_str(name)
    }
}

/// Owns one session and drives it from setup to shutdown
pub struct Driver<S, L> {
    session: S,
    handler: JoinHandler<L>,
    server: ServerParams,
    state: SessionState,
}

impl<S, L> Driver<S, L>
where
    S: QuerySession,
    L: BlacklistLookup,
{
    /// Wrap an already connected session
    pub fn new(config: &BotConfig, session: S, lookup: L) -> Self {
        let handler = JoinHandler::new(
            BlacklistChecker::new(lookup, &config.actions),
            Moderator::new(&config.actions),
            config.actions.repeat_window(),
        );
        Self {
            session,
            handler,
            server: config.server.clone(),
            state: SessionState::Connecting,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The underlying session
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Run until `shutdown` resolves or the session fails.
    ///
    /// The session is closed on every exit path. Shutdown returns `Ok`.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut shutdown = pin!(shutdown);
        let setup = tokio::select! {
            biased;
            () = &mut shutdown => {
                info!(state = %self.state, "shutdown requested during setup");
                Err(BotError::Interrupted)
            }
            setup = self.setup() => setup,
        };
        let outcome = match setup {
            Ok(()) => {
                self.transition(SessionState::EventLoop);
                self.event_loop(shutdown.as_mut()).await
            }
            Err(e) => Err(e),
        };

        self.transition(SessionState::Closing);
        if let Err(e) = self.session.close().await {
            debug!(error = %e, "error while closing session");
        }

        match outcome {
            Ok(()) | Err(BotError::Interrupted) => {
                self.transition(SessionState::Terminated);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "bot stopped");
                self.transition(SessionState::FatalError);
                Err(e)
            }
        }
    }

    async fn setup(&mut self) -> Result<()> {
        self.transition(SessionState::Authenticating);
        if let Err(e) = self.authenticate().await {
            error!(error = %e, "setup command failed");
        }

        self.verify().await?;
        self.transition(SessionState::Ready);

        self.sweep().await?;
        if let Err(e) = self.session.server_notify_register("server").await {
            if e.is_fatal() {
                return Err(e);
            }
            error!(error = %e, "could not register for server notifications");
        }
        Ok(())
    }

    async fn authenticate(&mut self) -> Result<()> {
        let server = &self.server;
        self.session
            .login(&server.server_username, &server.server_password)
            .await?;
        self.session.use_server(server.server_id).await?;
        self.session.set_nickname(&server.bot_nick).await
    }

    async fn verify(&mut self) -> Result<()> {
        let me = match self.session.whoami().await {
            Ok(me) => me,
            Err(e) => {
                error!(error = %e, "could not verify identity");
                return Err(BotError::Connection(format!("identity check failed: {e}")));
            }
        };

        let channel = self.server.default_channel;
        if let Err(e) = self.session.client_move(me.client_id, channel).await {
            if e.is_fatal() {
                return Err(e);
            }
            warn!(channel, error = %e, "could not move to default channel");
        }

        info!(
            clid = me.client_id,
            nickname = %me.client_nickname,
            server = %self.server.server_ip,
            port = self.server.server_port,
            "connected"
        );
        Ok(())
    }

    /// Log everyone already on the server. Clients found here are not
    /// checked against the blacklists.
    async fn sweep(&mut self) -> Result<()> {
        let rows = match self.session.client_list().await {
            Ok(rows) => rows,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(error = %e, "could not list connected clients");
                return Ok(());
            }
        };

        info!(clients = rows.len(), "existing clients are logged but not moderated");
        for row in rows {
            let Some(clid) = row.get("clid").and_then(|clid| clid.parse::<u32>().ok()) else {
                continue;
            };
            match resolve(&mut self.session, clid).await {
                Ok(client) => info!(
                    clid,
                    nickname = %client.nickname,
                    address = %client.address,
                    groups = ?client.server_groups,
                    "client online"
                ),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(clid, error = %e, "could not resolve client"),
            }
        }
        Ok(())
    }

    async fn event_loop<F>(&mut self, mut shutdown: Pin<&mut F>) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        loop {
            if let Err(e) = self.session.send_keepalive().await {
                if e.is_fatal() {
                    return Err(e);
                }
                warn!(error = %e, "keepalive failed");
            }

            let next = tokio::select! {
                biased;
                () = &mut shutdown => {
                    info!("shutdown requested");
                    return Err(BotError::Interrupted);
                }
                next = self.session.wait_for_event(EVENT_WAIT) => next,
            };

            match next {
                Ok(event) => self.dispatch(&event).await?,
                Err(e) if e.is_timeout() => info!("no events received, sending keepalive"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(error = %e, "failed to read event"),
            }
        }
    }

    async fn dispatch(&mut self, event: &Event) -> Result<()> {
        match self.handler.handle(&mut self.session, event).await {
            Ok(outcome) => {
                debug!(kind = %event.kind, ?outcome, "event handled");
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(kind = %event.kind, error = %e, "event handling failed");
                Ok(())
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = %self.state, to = %next, "session state");
        self.state = next;
    }
}
