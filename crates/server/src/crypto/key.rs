//! [`CipherKey`]: validated AES key material.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroize;

use super::cipher::CipherError;

/// AES key sizes accepted by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 16-byte key.
    Aes128,
    /// 24-byte key.
    Aes192,
    /// 32-byte key.
    Aes256,
}

impl KeySize {
    /// Map a raw key length to a supported size.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Self::Aes128),
            24 => Some(Self::Aes192),
            32 => Some(Self::Aes256),
            _ => None,
        }
    }
}

/// Raw AES key bytes whose length has been checked against [`KeySize`].
///
/// Key material is overwritten with zeroes on drop and never printed, not
/// even through `Debug`.
pub struct CipherKey {
    bytes: Vec<u8>,
    size: KeySize,
}

impl CipherKey {
    /// Copy `bytes` into a new key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] unless `bytes` is 16, 24 or 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CipherError> {
        let size = KeySize::from_len(bytes.len()).ok_or(CipherError::InvalidKey)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            size,
        })
    }

    /// Decode a standard-alphabet base64 key as sent by HTTP clients.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] if `encoded` is not valid base64 or
    /// decodes to an unsupported length.
    pub fn from_base64(encoded: &str) -> Result<Self, CipherError> {
        let mut raw = STANDARD
            .decode(encoded.trim())
            .map_err(|_| CipherError::InvalidKey)?;
        let key = Self::from_slice(&raw);
        raw.zeroize();
        key
    }

    /// The key size this key selects.
    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CipherKey({:?}, [REDACTED])", self.size)
    }
}
