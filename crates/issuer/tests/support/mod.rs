//! Reference verifier used to check issued tokens.
//!
//! Inverts the token format independently of the library: base64url decode,
//! split off the 16-byte IV, AES-CBC decrypt, strip PKCS#7 padding, parse.

#![allow(dead_code)]

use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use common::protocol::{ClientConfig, CryptoSection, ServerSection, TokenClaims};

pub const KEY_128: &str = "000102030405060708090a0b0c0d0e0f";

pub fn client_config(key_hex: &str, iv_seed: &str) -> ClientConfig {
    ClientConfig {
        version: "1.0.0".into(),
        server: Some(ServerSection {
            host: "http://localhost".into(),
            port: 8840,
            base_path: "/relayapi/".into(),
        }),
        crypto: Some(CryptoSection {
            method: "aes".into(),
            aes_key: key_hex.into(),
            aes_iv_seed: iv_seed.into(),
        }),
    }
}

/// Raw `iv || ciphertext` bytes of a token.
pub fn token_bytes(token: &str) -> Vec<u8> {
    URL_SAFE_NO_PAD
        .decode(token)
        .expect("token must be unpadded base64url")
}

/// Decrypt a token back to the serialised claim bytes.
pub fn decrypt_token(token: &str, key_hex: &str) -> Vec<u8> {
    let raw = token_bytes(token);
    assert!(raw.len() >= 32, "token shorter than IV plus one block");
    let (iv, ciphertext) = raw.split_at(16);
    let key = hex::decode(key_hex).expect("key must be hex");

    match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(&key, iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .expect("padding must be valid PKCS#7"),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(&key, iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .expect("padding must be valid PKCS#7"),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(&key, iv)
            .unwrap()
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .expect("padding must be valid PKCS#7"),
        other => panic!("unsupported key length {other}"),
    }
}

/// Decrypt and parse a token's claims.
pub fn open_token(token: &str, key_hex: &str) -> TokenClaims {
    serde_json::from_slice(&decrypt_token(token, key_hex)).expect("claims must be valid JSON")
}

pub fn is_url_safe(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
}
