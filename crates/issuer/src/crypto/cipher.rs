//! AES-CBC encryption of serialised token claims.
//!
//! **Algorithm choice:** AES in CBC mode with PKCS#7 padding, keyed with a
//! 128, 192 or 256-bit key. This is the layout the relay server decrypts; it
//! is not an AEAD, so integrity rests on the server rejecting claims that do
//! not parse.
//!
//! **Do NOT derive the IV from the seed alone.** A fixed CBC IV under a fixed
//! key leaks equality of plaintext prefixes across tokens. Every IV starts as
//! fresh CSPRNG output; the seed is only XOR-mixed into it.

use aes::{Aes128, Aes192, Aes256};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

/// Byte length of the CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

/// Accepted AES key lengths in bytes (AES-128, AES-192, AES-256).
pub const KEY_LENS: [usize; 3] = [16, 24, 32];

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key does not decode to 16, 24 or 32 bytes.
    #[error("invalid AES key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The key is not a valid hex string.
    #[error("invalid AES key encoding: {0}")]
    InvalidKeyEncoding(String),
}

/// Decoded AES key bytes of a validated length.
///
/// When this type is dropped, the memory is overwritten with zeroes to
/// minimise the window during which plaintext key material lives in RAM.
pub struct AesKey(Box<[u8]>);

impl AesKey {
    /// Decode a hex-encoded key and check its length.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyEncoding`] if `key_hex` is not hex, or
    /// [`CipherError::InvalidKeyLength`] if it decodes to an unsupported length.
    pub fn from_hex(key_hex: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| CipherError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    /// Wrap raw key bytes, checking the length.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for anything but 16, 24 or 32 bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CipherError> {
        if !KEY_LENS.contains(&bytes.len()) {
            return Err(CipherError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self(bytes.into_boxed_slice()))
    }

    /// Key size in bits.
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl Drop for AesKey {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AesKey({} bits, [REDACTED])", self.bits())
    }
}

/// IV followed by CBC ciphertext, as carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedClaims {
    pub iv: [u8; IV_LEN],
    /// PKCS#7-padded ciphertext; always a non-empty multiple of [`IV_LEN`].
    pub ciphertext: Vec<u8>,
}

impl SealedClaims {
    /// Encode as `base64url-no-pad(iv || ciphertext)`.
    ///
    /// The alphabet is `[A-Za-z0-9_-]`, so the result can be placed in a query
    /// string without escaping.
    pub fn to_token_string(&self) -> String {
        let mut raw = Vec::with_capacity(IV_LEN + self.ciphertext.len());
        raw.extend_from_slice(&self.iv);
        raw.extend_from_slice(&self.ciphertext);
        URL_SAFE_NO_PAD.encode(raw)
    }
}

/// Draw a fresh IV from the OS CSPRNG and mix `seed` into it.
pub fn derive_iv(seed: &[u8]) -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    mix_seed(&mut iv, seed);
    iv
}

/// XOR the first `min(IV_LEN, seed.len())` seed bytes into `iv`.
///
/// Seed bytes past [`IV_LEN`] are ignored; IV bytes past the seed length are
/// left untouched.
pub fn mix_seed(iv: &mut [u8; IV_LEN], seed: &[u8]) {
    iv.iter_mut().zip(seed).for_each(|(b, s)| *b ^= s);
}

/// Encrypt `plaintext` with AES-CBC and PKCS#7 padding under `key` and `iv`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] if the cipher rejects the key
/// (unreachable for a key built through [`AesKey`]).
pub fn encrypt_cbc(
    plaintext: &[u8],
    key: &AesKey,
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>, CipherError> {
    let invalid = |_| CipherError::InvalidKeyLength(key.0.len());
    let ciphertext = match key.0.len() {
        16 => Aes128CbcEnc::new_from_slices(&key.0, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => Aes192CbcEnc::new_from_slices(&key.0, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => Aes256CbcEnc::new_from_slices(&key.0, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        other => return Err(CipherError::InvalidKeyLength(other)),
    };
    Ok(ciphertext)
}

/// Encrypt `plaintext` under a freshly derived IV.
///
/// # Errors
///
/// See [`encrypt_cbc`].
pub fn seal(plaintext: &[u8], key: &AesKey, iv_seed: &[u8]) -> Result<SealedClaims, CipherError> {
    let iv = derive_iv(iv_seed);
    let ciphertext = encrypt_cbc(plaintext, key, &iv)?;
    Ok(SealedClaims { iv, ciphertext })
}
