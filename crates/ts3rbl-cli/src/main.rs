//! ts3rbl - TeamSpeak 3 blacklist moderation bot

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    ts3rbl_cli::run().await
}
