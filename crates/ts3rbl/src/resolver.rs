//! Client metadata lookup.

use ts3rbl_core::{BotError, ClientInfo, QuerySession, Result};

/// Fetch the current metadata of client `clid`
pub async fn resolve<S>(session: &mut S, clid: u32) -> Result<ClientInfo>
where
    S: QuerySession + ?Sized,
{
    let rows = session.client_info(clid).await?;
    let row = rows
        .first()
        .ok_or_else(|| BotError::Protocol(format!("empty clientinfo response for client {clid}")))?;
    ClientInfo::from_properties(clid, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fail, MockSession};

    #[tokio::test]
    async fn resolves_first_row() {
        let mut session = MockSession::new().with_client(42, "guest", "203.0.113.9", "8");

        let info = resolve(&mut session, 42).await.unwrap();
        assert_eq!(info.nickname, "guest");
        assert_eq!(info.address, "203.0.113.9");
        assert_eq!(session.calls, vec!["clientinfo 42"]);
    }

    #[tokio::test]
    async fn query_failure_propagates() {
        let mut session = MockSession::new().failing("clientinfo", Fail::Query);
        let err = resolve(&mut session, 42).await.unwrap_err();
        assert_eq!(err.query_id(), Some(512));
    }
}
