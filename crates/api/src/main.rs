//! Slotwise - calendar scheduling from the command line
//!
//! Reads a JSON request from stdin and writes the JSON response to stdout:
//!
//! ```text
//! slotwise suggest < request.json
//! ```

use std::sync::Arc;

use anyhow::{bail, Context};
use slotwise_api::{dispatch, AppContext, COMMANDS};
use slotwise_infra::{init_tracing, LogFormat};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let format = std::env::var("SLOTWISE_LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    init_tracing(format);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let Some(command) = std::env::args().nth(1) else {
        bail!("usage: slotwise <{}> < request.json", COMMANDS.join("|"));
    };

    let mut payload = String::new();
    tokio::io::stdin().read_to_string(&mut payload).await.context("failed to read request from stdin")?;

    let ctx = Arc::new(AppContext::new().context("failed to initialise scheduling engine")?);
    let response = dispatch(&ctx, &command, &payload).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
