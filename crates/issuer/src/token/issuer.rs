//! [`TokenIssuer`]: validated crypto settings plus the issuance operations.

use std::path::Path;

use chrono::Utc;
use common::protocol::{ApiType, ClientConfig, TokenClaims};
use common::IssuerError;
use tracing::{debug, info, warn};

use crate::config::{self, CryptoConfig};
use crate::crypto::{cipher, ConfigFingerprint};
use crate::endpoint::RelayEndpoint;

use super::claims::build_claims_at;
use super::options::TokenOptions;

/// Issues encrypted relay tokens under one crypto configuration.
///
/// All settings are validated and copied in at construction and never change
/// afterwards, so one issuer can be shared across threads (e.g. behind an
/// `Arc`) and called concurrently without locking.
#[derive(Debug)]
pub struct TokenIssuer {
    crypto: CryptoConfig,
    endpoint: RelayEndpoint,
    fingerprint: ConfigFingerprint,
}

impl TokenIssuer {
    /// Validate `cfg` and build an issuer from it.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Configuration`] if a section is missing, the
    /// method is not `aes`, or the key material is missing or malformed.
    pub fn new(cfg: &ClientConfig) -> Result<Self, IssuerError> {
        let (server, crypto) = config::validate_sections(cfg)?;
        let crypto = CryptoConfig::from_section(crypto)?;
        let fingerprint = crypto.fingerprint();

        info!(
            fingerprint = %fingerprint,
            key_bits = crypto.key().bits(),
            "token issuer initialised"
        );

        Ok(Self {
            crypto,
            endpoint: RelayEndpoint::from_section(server),
            fingerprint,
        })
    }

    /// Load a `.rai` file (with `RAI_*` overrides) and build an issuer from it.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Configuration`] if the file cannot be loaded or
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IssuerError> {
        let cfg = config::load_client_config(path)?;
        Self::new(&cfg)
    }

    /// Fingerprint of the crypto configuration, for tagging outgoing requests.
    pub fn fingerprint(&self) -> &ConfigFingerprint {
        &self.fingerprint
    }

    pub fn endpoint(&self) -> &RelayEndpoint {
        &self.endpoint
    }

    /// Build the claim set for `options` as of now.
    pub fn build_claims(&self, options: &TokenOptions) -> TokenClaims {
        if options.api_key().is_empty() {
            warn!("issuing claims with an empty api_key; the token will be rejected by the relay");
        }
        build_claims_at(options, Utc::now())
    }

    /// Serialise and encrypt `claims` into a URL-safe token.
    ///
    /// A fresh IV is drawn for every call, so encrypting the same claims twice
    /// yields different tokens.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Encryption`] if serialisation or the cipher
    /// fails. No partial token is ever returned.
    pub fn encrypt(&self, claims: &TokenClaims) -> Result<String, IssuerError> {
        let plaintext = claims.to_canonical_bytes()?;
        let sealed = cipher::seal(&plaintext, self.crypto.key(), self.crypto.iv_seed())
            .map_err(|e| IssuerError::Encryption(e.to_string()))?;
        let token = sealed.to_token_string();

        debug!(token_id = %claims.id, token_len = token.len(), "token encrypted");
        Ok(token)
    }

    /// Build claims for `options` and encrypt them.
    ///
    /// # Errors
    ///
    /// See [`Self::encrypt`].
    pub fn issue(&self, options: &TokenOptions) -> Result<String, IssuerError> {
        let claims = self.build_claims(options);
        let token = self.encrypt(&claims)?;
        info!(
            token_id = %claims.id,
            provider = %claims.provider,
            max_calls = claims.max_calls,
            expire_time = %claims.expire_time,
            "token issued"
        );
        Ok(token)
    }

    /// Issue a fresh token and return the relay URL for `api_type` carrying it.
    ///
    /// # Errors
    ///
    /// See [`Self::encrypt`].
    pub fn api_url(&self, options: &TokenOptions, api_type: ApiType) -> Result<String, IssuerError> {
        let token = self.issue(options)?;
        Ok(self.endpoint.url_with_token(&token, api_type))
    }
}
