//! Configuration loading and validation for the command-line issuer.
//!
//! All values are read from environment variables. The process exits with a
//! clear error message if any required variable is missing or invalid.

use std::num::NonZeroU32;

use anyhow::{Context, Result};
use common::protocol::ApiType;
use issuer::TokenOptions;
use serde::Deserialize;

/// Validated command-line issuer configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Path to the `.rai` client configuration file. **Required.**
    pub rai_config_path: String,

    /// Upstream API key sealed into the token. **Required.**
    pub token_api_key: String,

    /// Number of relay calls the token allows.
    #[serde(default = "default_max_calls")]
    pub token_max_calls: u32,

    /// Token lifetime in seconds.
    #[serde(default = "default_expire_seconds")]
    pub token_expire_seconds: u64,

    /// Upstream provider the relay forwards to.
    #[serde(default = "default_provider")]
    pub token_provider: String,

    /// Extension data passed through to the relay.
    #[serde(default)]
    pub token_ext_info: String,

    /// Relay route to build a URL for (`chat_completions`,
    /// `images_generations` or `embeddings`). No URL is printed when unset.
    #[serde(default)]
    pub token_api_type: Option<String>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_calls() -> u32 {
    issuer::token::options::DEFAULT_MAX_CALLS
}
fn default_expire_seconds() -> u64 {
    u64::from(issuer::token::options::SECONDS_PER_DAY.get())
}
fn default_provider() -> String {
    issuer::token::options::DEFAULT_PROVIDER.into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build relay-token configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise relay-token configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.rai_config_path, "RAI_CONFIG_PATH")?;
        ensure_non_empty(&self.token_api_key, "TOKEN_API_KEY")?;
        ensure_non_empty(&self.token_provider, "TOKEN_PROVIDER")?;
        self.expire_seconds()?;
        self.api_type()?;
        Ok(())
    }

    fn expire_seconds(&self) -> Result<NonZeroU32> {
        u32::try_from(self.token_expire_seconds)
            .ok()
            .and_then(NonZeroU32::new)
            .with_context(|| {
                format!(
                    "TOKEN_EXPIRE_SECONDS must be between 1 and {}, got {}",
                    u32::MAX,
                    self.token_expire_seconds
                )
            })
    }

    /// Requested relay route, if any.
    pub fn api_type(&self) -> Result<Option<ApiType>> {
        self.token_api_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<ApiType>().context("TOKEN_API_TYPE is invalid"))
            .transpose()
    }

    /// Token options described by this configuration.
    pub fn token_options(&self) -> Result<TokenOptions> {
        Ok(TokenOptions::new(self.token_api_key.trim())
            .with_max_calls(self.token_max_calls)
            .with_expire_seconds(self.expire_seconds()?)
            .with_provider(self.token_provider.trim())
            .with_ext_info(self.token_ext_info.as_str()))
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rai_config_path", &self.rai_config_path)
            .field("token_api_key", &"[REDACTED]")
            .field("token_max_calls", &self.token_max_calls)
            .field("token_expire_seconds", &self.token_expire_seconds)
            .field("token_provider", &self.token_provider)
            .field("token_ext_info", &self.token_ext_info)
            .field("token_api_type", &self.token_api_type)
            .field("log_level", &self.log_level)
            .finish()
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
