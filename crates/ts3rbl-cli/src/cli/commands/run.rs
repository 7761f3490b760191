//! `ts3rbl run` - connect and moderate until interrupted.

use anyhow::Result;
use std::future::Future;
use tokio::sync::oneshot;
use tracing::{error, info};

use super::Context;
use crate::logging;

pub async fn execute(ctx: Context) -> Result<()> {
    logging::init(&ctx.config.logging)?;
    info!(config = %ctx.config_path.display(), "starting");

    let shutdown = interrupt().await;
    ts3rbl::run(&ctx.config, shutdown).await?;
    info!("stopped");
    Ok(())
}

/// Listen for Ctrl-C from now on and resolve once it arrives.
///
/// The listener runs in its own task so the signal is caught during connect
/// and setup too, not only once the returned future is first polled.
async fn interrupt() -> impl Future<Output = ()> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                let _ = tx.send(());
            }
            Err(e) => error!(error = %e, "cannot listen for interrupts"),
        }
    });
    // let the listener register before connecting
    tokio::task::yield_now().await;

    async move {
        if rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn interrupt_stays_pending_without_signal() {
        let shutdown = interrupt().await;
        let waited = tokio::time::timeout(Duration::from_millis(50), shutdown).await;
        assert!(waited.is_err());
    }
}
