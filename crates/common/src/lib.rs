//! Common types, wire formats, and errors shared across the relay token crates.

pub mod error;
pub mod protocol;

pub use error::IssuerError;
