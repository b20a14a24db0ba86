//! Token construction and issuance.
//!
//! # Lifecycle
//!
//! 1. [`TokenIssuer::new`] validates the client configuration, decodes the
//!    key and caches the [`crate::crypto::ConfigFingerprint`].
//! 2. [`TokenIssuer::build_claims`] turns [`TokenOptions`] into a
//!    [`common::protocol::TokenClaims`] for the current instant.
//! 3. [`TokenIssuer::encrypt`] serialises the claims, seals them under a fresh
//!    IV and encodes the result.
//!
//! # Security invariants
//!
//! - Key material, the IV seed and the caller's API key are **never** logged.
//! - Claims exist only for the duration of an issuance call.

pub mod claims;
pub mod issuer;
pub mod options;

pub use claims::{build_claims_at, TOKEN_ID_PREFIX};
pub use issuer::TokenIssuer;
pub use options::TokenOptions;
