//! Wire types shared between the issuer, its callers, and any verifier.
//!
//! [`ClientConfig`] mirrors the `.rai` client configuration file.
//! [`TokenClaims`] is the plaintext record sealed inside every token; its
//! field order and timestamp format are an interoperability contract with the
//! relay server, which decrypts and parses it independently.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::IssuerError;

// ---------------------------------------------------------------------------
// Client configuration (`.rai`)
// ---------------------------------------------------------------------------

/// Contents of a `.rai` client configuration file.
///
/// Sections are optional here so that an incomplete file surfaces as a
/// configuration error from the issuer instead of a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Free-form configuration format version.
    #[serde(default)]
    pub version: String,

    /// Location of the relay server.
    #[serde(default)]
    pub server: Option<ServerSection>,

    /// Token encryption settings shared with the relay server.
    #[serde(default)]
    pub crypto: Option<CryptoSection>,
}

impl ClientConfig {
    /// Parse a `.rai` document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Configuration`] if `json` is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, IssuerError> {
        serde_json::from_str(json)
            .map_err(|e| IssuerError::configuration(format!("invalid client config: {e}")))
    }
}

/// `server` section of a `.rai` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSection {
    /// Scheme and host, e.g. `"http://localhost"`.
    pub host: String,
    pub port: u16,
    /// Path prefix of the relay API, e.g. `"/relayapi/"`.
    #[serde(default)]
    pub base_path: String,
}

/// `crypto` section of a `.rai` file.
///
/// Missing fields deserialise as empty strings and are rejected by the issuer.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSection {
    /// Encryption method; only `"aes"` is supported.
    #[serde(default)]
    pub method: String,

    /// Hex-encoded AES key (16, 24 or 32 bytes once decoded).
    #[serde(default, alias = "key")]
    pub aes_key: String,

    /// Seed mixed into every freshly generated IV.
    #[serde(default, alias = "iv_seed")]
    pub aes_iv_seed: String,
}

impl fmt::Debug for CryptoSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("CryptoSection")
            .field("method", &self.method)
            .field("aes_key", &"[REDACTED]")
            .field("aes_iv_seed", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Token claims
// ---------------------------------------------------------------------------

/// Plaintext claim set sealed inside a token.
///
/// Serialised as compact JSON with the fields in declaration order:
/// `id, api_key, max_calls, expire_time, created_at, provider, ext_info`.
/// Timestamps are UTC RFC 3339 with millisecond precision and a `Z` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: String,
    pub api_key: String,
    pub max_calls: u32,
    #[serde(with = "rfc3339_millis")]
    pub expire_time: DateTime<Utc>,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
    pub provider: String,
    #[serde(default)]
    pub ext_info: String,
}

impl TokenClaims {
    /// Canonical byte encoding fed to the cipher.
    ///
    /// # Errors
    ///
    /// Returns [`IssuerError::Encryption`] if serialisation fails.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, IssuerError> {
        serde_json::to_vec(self)
            .map_err(|e| IssuerError::Encryption(format!("failed to serialise claims: {e}")))
    }
}

mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Relay API routes
// ---------------------------------------------------------------------------

/// Relay API routes a token can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiType {
    ChatCompletions,
    ImagesGenerations,
    Embeddings,
}

impl ApiType {
    /// Route path relative to the server's base path.
    pub fn path(self) -> &'static str {
        match self {
            ApiType::ChatCompletions => "/chat/completions",
            ApiType::ImagesGenerations => "/images/generations",
            ApiType::Embeddings => "/embeddings",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApiType::ChatCompletions => "chat_completions",
            ApiType::ImagesGenerations => "images_generations",
            ApiType::Embeddings => "embeddings",
        }
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiType {
    type Err = IssuerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "chat_completions" => Ok(ApiType::ChatCompletions),
            "images_generations" => Ok(ApiType::ImagesGenerations),
            "embeddings" => Ok(ApiType::Embeddings),
            other => Err(IssuerError::configuration(format!(
                "unsupported API type: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Issuance output
// ---------------------------------------------------------------------------

/// Record printed by the command-line issuer for each token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// URL-safe encrypted token.
    pub token: String,
    /// Public fingerprint of the crypto configuration that sealed the token.
    pub fingerprint: String,
    /// Full relay URL carrying the token, when a route was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
