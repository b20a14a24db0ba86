//! Common error types shared across crates.

use thiserror::Error;

/// Top-level issuer error type.
///
/// Both variants are fatal for the operation that raised them:
/// - [`IssuerError::Configuration`] is raised once, while building an issuer.
/// - [`IssuerError::Encryption`] is raised per call; no token was produced.
///
/// Retrying with the same inputs cannot succeed for either variant.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// Crypto or server settings are missing, unsupported, or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialising or encrypting the token claims failed.
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl IssuerError {
    /// Short machine-readable code, safe to log or return to callers.
    pub fn code(&self) -> &'static str {
        match self {
            IssuerError::Configuration(_) => "configuration_error",
            IssuerError::Encryption(_) => "encryption_error",
        }
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        IssuerError::Configuration(msg.into())
    }
}
