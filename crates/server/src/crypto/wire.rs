//! The `base64(iv)::base64(ciphertext)` wire format.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::cipher::{CipherError, BLOCK_LEN};

/// Literal separator between the IV and ciphertext segments.
///
/// Never produced by standard base64, so a single split is unambiguous.
pub const SEPARATOR: &str = "::";

/// A parsed wire message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    /// Raw IV bytes.
    pub iv: [u8; BLOCK_LEN],
    /// Raw ciphertext bytes, a non-zero multiple of [`BLOCK_LEN`].
    pub ciphertext: Vec<u8>,
}

impl WireMessage {
    /// Parse a wire message string.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedMessage`] when the separator is missing
    /// or repeated, a segment is empty or not base64, the IV is not one block,
    /// or the ciphertext is not a non-zero multiple of the block size.
    pub fn parse(s: &str) -> Result<Self, CipherError> {
        let mut parts = s.split(SEPARATOR);
        let (iv_b64, ct_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(iv), Some(ct), None) if !iv.is_empty() && !ct.is_empty() => (iv, ct),
            _ => return Err(CipherError::MalformedMessage("expected <iv>::<ciphertext>")),
        };

        let iv_bytes = STANDARD
            .decode(iv_b64)
            .map_err(|_| CipherError::MalformedMessage("iv is not valid base64"))?;
        let iv: [u8; BLOCK_LEN] = iv_bytes
            .try_into()
            .map_err(|_| CipherError::MalformedMessage("iv must be one block"))?;

        let ciphertext = STANDARD
            .decode(ct_b64)
            .map_err(|_| CipherError::MalformedMessage("ciphertext is not valid base64"))?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::MalformedMessage(
                "ciphertext must be a non-zero multiple of the block size",
            ));
        }

        Ok(Self { iv, ciphertext })
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}",
            STANDARD.encode(self.iv),
            STANDARD.encode(&self.ciphertext)
        )
    }
}
