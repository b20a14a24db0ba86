//! `relay-token` — command-line issuer entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`config::Config`] from environment variables.
//! 2. Initialise structured JSON logging on stderr.
//! 3. Load the `.rai` file and build a [`TokenIssuer`].
//! 4. Issue one token and print an [`IssuedToken`] record on stdout.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use common::protocol::IssuedToken;
use issuer::TokenIssuer;
use tracing::info;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: relay-token configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        rai_config_path = %cfg.rai_config_path,
        "relay-token starting"
    );

    // -----------------------------------------------------------------------
    // 3. Issuer
    // -----------------------------------------------------------------------
    let issuer = TokenIssuer::from_file(&cfg.rai_config_path)
        .context("failed to initialise token issuer")?;

    // -----------------------------------------------------------------------
    // 4. Issue
    // -----------------------------------------------------------------------
    let options = cfg.token_options()?;
    let token = issuer.issue(&options).context("failed to issue token")?;
    let url = cfg
        .api_type()?
        .map(|api_type| issuer.endpoint().url_with_token(&token, api_type));

    let record = IssuedToken {
        token,
        fingerprint: issuer.fingerprint().to_string(),
        url,
    };
    println!("{}", serde_json::to_string(&record)?);
    Ok(())
}
