//! Issuer side of the relay API token scheme.
//!
//! A [`TokenIssuer`] seals a caller's upstream API key, call budget and
//! expiry into an opaque AES-CBC token that the relay server decrypts with
//! the same key. The real API key never travels in the clear.
//!
//! ```no_run
//! use issuer::{TokenIssuer, TokenOptions};
//!
//! # fn main() -> Result<(), common::IssuerError> {
//! let issuer = TokenIssuer::from_file("default.rai")?;
//! let token = issuer.issue(&TokenOptions::new("sk-upstream").with_provider("openai"))?;
//! println!("{token} {}", issuer.fingerprint());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod endpoint;
pub mod token;

pub use crypto::ConfigFingerprint;
pub use endpoint::RelayEndpoint;
pub use token::{TokenIssuer, TokenOptions};
