//! [`QuerySession`] implementation on top of [`QueryClient`].

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;
use ts3rbl_core::{BotError, Event, Properties, QuerySession, Result, WhoAmI};

use crate::client::QueryClient;
use crate::codec::Command;

#[async_trait]
impl<S> QuerySession for QueryClient<S>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let cmd = Command::new("login")
            .arg("client_login_name", username)
            .arg("client_login_password", password);
        self.query(&cmd).await?;
        Ok(())
    }

    async fn use_server(&mut self, server_id: u32) -> Result<()> {
        self.query(&Command::new("use").arg("sid", server_id)).await?;
        Ok(())
    }

    async fn set_nickname(&mut self, nickname: &str) -> Result<()> {
        self.query(&Command::new("clientupdate").arg("client_nickname", nickname))
            .await?;
        Ok(())
    }

    async fn whoami(&mut self) -> Result<WhoAmI> {
        let rows = self.query(&Command::new("whoami")).await?;
        let row = rows
            .first()
            .ok_or_else(|| BotError::Protocol("empty whoami response".into()))?;
        WhoAmI::from_properties(row)
    }

    async fn client_move(&mut self, clid: u32, cid: u32) -> Result<()> {
        self.query(&Command::new("clientmove").arg("clid", clid).arg("cid", cid))
            .await?;
        Ok(())
    }

    async fn client_list(&mut self) -> Result<Vec<Properties>> {
        Ok(self.query(&Command::new("clientlist")).await?)
    }

    async fn client_info(&mut self, clid: u32) -> Result<Vec<Properties>> {
        Ok(self.query(&Command::new("clientinfo").arg("clid", clid)).await?)
    }

    async fn client_kick(&mut self, clid: u32, reason_id: u32, reason: &str) -> Result<()> {
        let cmd = Command::new("clientkick")
            .arg("clid", clid)
            .arg("reasonid", reason_id)
            .arg("reasonmsg", reason);
        self.query(&cmd).await?;
        Ok(())
    }

    async fn ban_client(&mut self, clid: u32, seconds: u64, reason: &str) -> Result<Vec<Properties>> {
        let cmd = Command::new("banclient")
            .arg("clid", clid)
            .arg("time", seconds)
            .arg("banreason", reason);
        Ok(self.query(&cmd).await?)
    }

    async fn server_notify_register(&mut self, event: &str) -> Result<()> {
        self.query(&Command::new("servernotifyregister").arg("event", event))
            .await?;
        Ok(())
    }

    async fn send_keepalive(&mut self) -> Result<()> {
        Ok(self.keepalive().await?)
    }

    async fn wait_for_event(&mut self, timeout: Duration) -> Result<Event> {
        Ok(self.next_event(timeout).await?)
    }

    async fn close(&mut self) -> Result<()> {
        if let Err(e) = self.quit().await {
            debug!(error = %e, "quit failed, connection already gone");
        }
        Ok(())
    }
}
