//! Encrypted profile codec.
//!
//! An encrypted profile is a 16-byte IV followed by AES-256-CBC ciphertext of
//! PKCS7-padded UTF-8 JSON. The key is PBKDF2-HMAC-SHA256 over the passphrase.
//! The salt is the lowercase hex SHA-256 digest of a fixed seed, which is the
//! convention the fixture profiles are written with.

use aes::Aes256;
use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Seed whose digest forms the fixture salt.
pub const FIXTURE_SALT_SEED: &str = "DEBUG";

/// PBKDF2 rounds used by the fixture profiles.
pub const FIXTURE_ITERATIONS: u32 = 2056;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Errors while decoding an encrypted profile.
///
/// CBC decryption itself cannot detect a wrong passphrase; a bad key shows up
/// here as invalid padding, invalid UTF-8 or invalid JSON.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("ciphertext is {0} bytes, shorter than the {IV_LEN}-byte IV")]
    TooShort(usize),

    #[error("ciphertext body of {0} bytes is not a whole number of AES blocks")]
    Misaligned(usize),

    #[error("invalid padding length {pad} for {len} decrypted bytes")]
    BadPadding { pad: usize, len: usize },

    #[error("profile could not be decrypted: invalid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    #[error("profile contains invalid json: {0}")]
    InvalidJson(#[source] serde_json::Error),
}

/// Key-derivation parameters for encrypted profiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCodec {
    salt: Vec<u8>,
    iterations: u32,
}

impl Default for ProfileCodec {
    fn default() -> Self {
        Self::fixture()
    }
}

impl ProfileCodec {
    /// The convention used by the fixture suites.
    pub fn fixture() -> Self {
        Self::with_seed(FIXTURE_SALT_SEED, FIXTURE_ITERATIONS)
    }

    /// Salt derived from `seed` the same way as the fixture salt.
    pub fn with_seed(seed: &str, iterations: u32) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        Self {
            salt: format!("{:x}", digest).into_bytes(),
            iterations,
        }
    }

    /// Returns the raw salt bytes.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derives the AES-256 key for `passphrase`.
    pub fn derive_key(&self, passphrase: &str) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), &self.salt, self.iterations, &mut key);
        key
    }

    /// Decrypts a profile into its plaintext JSON text.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the buffer is malformed, the padding length is
    /// invalid, or the plaintext is not UTF-8.
    pub fn decrypt_to_string(&self, ciphertext: &[u8], passphrase: &str) -> Result<String, DecodeError> {
        if ciphertext.len() < IV_LEN {
            return Err(DecodeError::TooShort(ciphertext.len()));
        }
        let (iv, body) = ciphertext.split_at(IV_LEN);
        if body.is_empty() || body.len() % BLOCK_LEN != 0 {
            return Err(DecodeError::Misaligned(body.len()));
        }

        let key = self.derive_key(passphrase);
        let mut buf = body.to_vec();
        let plain = Aes256CbcDec::new_from_slices(&key, iv)
            .map_err(|_| DecodeError::TooShort(ciphertext.len()))?
            .decrypt_padded_mut::<NoPadding>(&mut buf)
            .map_err(|_| DecodeError::Misaligned(body.len()))?;

        let unpadded = strip_padding(plain)?;
        String::from_utf8(unpadded.to_vec())
            .map_err(|e| DecodeError::InvalidUtf8(e.utf8_error().valid_up_to()))
    }

    /// Decrypts a profile and parses it as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` on any decoding failure, including a wrong
    /// passphrase.
    pub fn decrypt(&self, ciphertext: &[u8], passphrase: &str) -> Result<serde_json::Value, DecodeError> {
        let text = self.decrypt_to_string(ciphertext, passphrase)?;
        serde_json::from_str(&text).map_err(DecodeError::InvalidJson)
    }

    /// Encrypts `plaintext` with the given IV, producing `iv || ciphertext`.
    pub fn encrypt_with_iv(&self, plaintext: &str, passphrase: &str, iv: [u8; IV_LEN]) -> Vec<u8> {
        let key = self.derive_key(passphrase);
        let msg = plaintext.as_bytes();

        let padded_len = (msg.len() / BLOCK_LEN + 1) * BLOCK_LEN;
        let mut buf = vec![0u8; padded_len];
        buf[..msg.len()].copy_from_slice(msg);

        let mut out = Vec::with_capacity(IV_LEN + padded_len);
        out.extend_from_slice(&iv);
        // The buffer always has room for a full padding block.
        if let Ok(ct) = Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_mut::<Pkcs7>(&mut buf, msg.len()) {
            out.extend_from_slice(ct);
        }
        out
    }

    /// Encrypts `plaintext` under a random IV.
    pub fn encrypt(&self, plaintext: &str, passphrase: &str) -> Vec<u8> {
        self.encrypt_with_iv(plaintext, passphrase, rand::random())
    }
}

/// Strips PKCS7 padding using the final byte as the pad length.
fn strip_padding(plain: &[u8]) -> Result<&[u8], DecodeError> {
    let len = plain.len();
    let pad = plain.last().copied().unwrap_or(0) as usize;
    if pad == 0 || pad > BLOCK_LEN || pad > len {
        return Err(DecodeError::BadPadding { pad, len });
    }
    Ok(&plain[..len - pad])
}
