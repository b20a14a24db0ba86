//! Client configuration loading and crypto-section validation.
//!
//! A `.rai` file is read with the `config` crate and can be overridden from
//! the environment, e.g. `RAI_CRYPTO__AES_IV_SEED` replaces
//! `crypto.aes_iv_seed`. Validation of what was loaded happens in
//! [`CryptoConfig::from_section`] and [`validate_sections`], which the issuer
//! runs once at construction.

use std::path::Path;

use common::protocol::{ClientConfig, CryptoSection, ServerSection};
use common::IssuerError;

use crate::crypto::{AesKey, ConfigFingerprint};

/// The only encryption method this issuer supports.
pub const SUPPORTED_METHOD: &str = "aes";

/// Prefix of environment variables that override `.rai` values.
pub const ENV_PREFIX: &str = "RAI";

/// Load a `.rai` JSON file, applying `RAI_*` environment overrides.
///
/// Only parsing happens here; an incomplete file loads successfully and is
/// rejected later by the issuer.
///
/// # Errors
///
/// Returns [`IssuerError::Configuration`] if the file cannot be read or parsed.
pub fn load_client_config(path: impl AsRef<Path>) -> Result<ClientConfig, IssuerError> {
    load_with_env_prefix(path.as_ref(), ENV_PREFIX)
}

fn load_with_env_prefix(path: &Path, env_prefix: &str) -> Result<ClientConfig, IssuerError> {
    let cfg = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Json))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()
        .map_err(|e| {
            IssuerError::Configuration(format!(
                "failed to read client config {}: {e}",
                path.display()
            ))
        })?;

    cfg.try_deserialize().map_err(|e| {
        IssuerError::Configuration(format!(
            "failed to deserialise client config {}: {e}",
            path.display()
        ))
    })
}

/// Check that both required sections are present.
///
/// # Errors
///
/// Returns [`IssuerError::Configuration`] if either section is missing.
pub fn validate_sections(
    cfg: &ClientConfig,
) -> Result<(&ServerSection, &CryptoSection), IssuerError> {
    match (&cfg.server, &cfg.crypto) {
        (Some(server), Some(crypto)) => Ok((server, crypto)),
        _ => Err(IssuerError::Configuration(
            "missing crypto or server section".into(),
        )),
    }
}

/// Validated, owned crypto settings.
///
/// Holds copies of the strings it was built from, so later changes to the
/// caller's [`CryptoSection`] cannot reach an issuer.
pub struct CryptoConfig {
    method: String,
    key_hex: String,
    iv_seed: String,
    key: AesKey,
}

impl CryptoConfig {
    /// Validate a `crypto` section, returning the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Configuration`] if the method is not `aes`, if
    /// the key or IV seed is empty, or if the key is not 16, 24 or 32 bytes of
    /// hex.
    pub fn from_section(section: &CryptoSection) -> Result<Self, IssuerError> {
        if section.method != SUPPORTED_METHOD {
            return Err(IssuerError::Configuration(format!(
                "unsupported encryption method: {}",
                section.method
            )));
        }
        if section.aes_key.is_empty() || section.aes_iv_seed.is_empty() {
            return Err(IssuerError::Configuration("missing key material".into()));
        }
        let key = AesKey::from_hex(&section.aes_key)
            .map_err(|e| IssuerError::Configuration(format!("invalid key material: {e}")))?;

        Ok(Self {
            method: section.method.clone(),
            key_hex: section.aes_key.clone(),
            iv_seed: section.aes_iv_seed.clone(),
            key,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn key(&self) -> &AesKey {
        &self.key
    }

    pub fn iv_seed(&self) -> &[u8] {
        self.iv_seed.as_bytes()
    }

    /// Digest of the settings exactly as they were configured.
    pub fn fingerprint(&self) -> ConfigFingerprint {
        ConfigFingerprint::compute(&self.method, &self.key_hex, &self.iv_seed)
    }
}

impl std::fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("method", &self.method)
            .field("key", &self.key)
            .field("iv_seed", &"[REDACTED]")
            .finish()
    }
}
