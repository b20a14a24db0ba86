//! Token encryption primitives.
//!
//! This module is free of configuration-file and transport concerns. It
//! provides the IV derivation, AES-CBC sealing and fingerprinting used by
//! [`crate::token::TokenIssuer`].
//!
//! # Token format
//!
//! ```text
//! base64url-no-pad( iv[16] || aes-cbc-pkcs7(claims_json) )
//! ```

pub mod cipher;
pub mod fingerprint;

pub use cipher::{AesKey, CipherError, SealedClaims, IV_LEN};
pub use fingerprint::ConfigFingerprint;
