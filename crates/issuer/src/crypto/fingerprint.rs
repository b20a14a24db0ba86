//! Public fingerprint of an issuer's crypto configuration.

use std::fmt;

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 over `method || key_hex || iv_seed`.
///
/// The relay server computes the same digest over each configuration it
/// knows, so a token tagged with this value can be matched to its key. It is
/// a drift detector, not a MAC, and carries no secrecy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint(String);

impl ConfigFingerprint {
    /// Hash the configuration strings exactly as written, with no delimiter.
    ///
    /// `key_hex` is hashed as its hex text, not as decoded key bytes.
    pub fn compute(method: &str, key_hex: &str, iv_seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(method.as_bytes());
        hasher.update(key_hex.as_bytes());
        hasher.update(iv_seed.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
