//! AES-CBC payload encryption primitives.
//!
//! This module is intentionally free of HTTP dependencies. It provides the
//! stateless encrypt/decrypt operations used by the request handlers.
//!
//! # Ciphertext format
//!
//! ```text
//! base64(iv) "::" base64(ciphertext)
//! ```
//!
//! `iv` is one 16-byte block; `ciphertext` is a non-zero multiple of 16 bytes.

pub mod canonical;
pub mod cipher;
pub mod key;
pub mod wire;

pub use canonical::Plaintext;
pub use key::CipherKey;
