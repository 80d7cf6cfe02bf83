//! Session token formatting, parsing, and hashing.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

const SESSION_TOKEN_SECRET_HEX_CHARS: usize = SESSION_TOKEN_SECRET_BYTES * 2;

#[derive(Clone)]
pub struct SessionSecret {
    bytes: [u8; SESSION_TOKEN_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

#[must_use]
pub fn format_session_token(secret: &SessionSecret) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}",
        encode_secret_hex(secret.as_bytes())
    )
}

/// Check a presented token's shape before it is hashed and looked up.
///
/// # Errors
///
/// Returns [`SessionTokenError`] for a wrong prefix or a malformed secret.
pub fn parse_session_token(token: &str) -> Result<SessionSecret, SessionTokenError> {
    let (prefix, secret_hex) = token
        .split_once('_')
        .ok_or(SessionTokenError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionTokenError::InvalidFormat);
    }

    decode_secret_hex(secret_hex)
        .map(SessionSecret::from_bytes)
        .ok_or(SessionTokenError::InvalidSecretEncoding)
}

/// Hex SHA-256 of the full token; the only form stored.
#[must_use]
pub fn hash_session_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn encode_secret_hex(secret: &[u8; SESSION_TOKEN_SECRET_BYTES]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(SESSION_TOKEN_SECRET_HEX_CHARS);

    for byte in secret {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

fn decode_secret_hex(secret_hex: &str) -> Option<[u8; SESSION_TOKEN_SECRET_BYTES]> {
    if secret_hex.len() != SESSION_TOKEN_SECRET_HEX_CHARS {
        return None;
    }

    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    for (byte, pair) in secret.iter_mut().zip(secret_hex.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(secret)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}
