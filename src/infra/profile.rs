//! Reading profile files left behind by the note tool.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::infra::codec::{DecodeError, ProfileCodec};

/// Errors while reading a profile file.
#[derive(Debug, Error)]
pub enum ProfileReadError {
    #[error("profile not found: {path}")]
    Missing { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Reads a profile and decodes it to JSON.
///
/// With a passphrase the file is decrypted through `codec`; otherwise it is
/// parsed as plain UTF-8 JSON.
///
/// # Errors
///
/// Returns `ProfileReadError::Missing` if the file does not exist and
/// `ProfileReadError::Decode` if it cannot be decoded.
pub fn read_profile(
    path: &Path,
    passphrase: Option<&str>,
    codec: &ProfileCodec,
) -> Result<Value, ProfileReadError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ProfileReadError::Missing { path: path.into() },
        _ => ProfileReadError::Io {
            path: path.into(),
            source: e,
        },
    })?;

    match passphrase {
        Some(passphrase) => Ok(codec.decrypt(&bytes, passphrase)?),
        None => Ok(parse_plain(bytes)?),
    }
}

/// Parses a plaintext profile.
pub fn parse_plain(bytes: Vec<u8>) -> Result<Value, DecodeError> {
    let text = String::from_utf8(bytes)
        .map_err(|e| DecodeError::InvalidUtf8(e.utf8_error().valid_up_to()))?;
    serde_json::from_str(&text).map_err(DecodeError::InvalidJson)
}
