//! AES-CBC encryption and decryption of whole payloads.
//!
//! The key length selects AES-128, AES-192 or AES-256. Every call draws a
//! fresh 16-byte IV from the OS CSPRNG; the IV is not secret and travels in
//! front of the ciphertext (see [`WireMessage`]).
//!
//! **CBC is unauthenticated.** A wrong key or a tampered message usually
//! surfaces as [`CipherError::PaddingInvalid`]. Callers outside this module
//! must collapse every decrypt failure into one opaque signal so that padding
//! failures cannot be told apart from any other failure.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use super::canonical::Plaintext;
use super::key::{CipherKey, KeySize};
use super::wire::WireMessage;

/// AES block size in bytes; also the IV length.
pub const BLOCK_LEN: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    /// The key is not 16, 24 or 32 bytes.
    #[error("invalid key: expected 16, 24 or 32 bytes")]
    InvalidKey,

    /// The wire message is structurally invalid.
    #[error("malformed message: {0}")]
    MalformedMessage(&'static str),

    /// PKCS#7 padding did not verify after decryption.
    #[error("invalid padding")]
    PaddingInvalid,

    /// The decrypted bytes are not valid UTF-8.
    #[error("plaintext is not valid UTF-8")]
    EncodingInvalid,

    /// A record could not be rendered as canonical JSON.
    #[error("record could not be serialised")]
    RecordInvalid,
}

impl CipherError {
    /// Stable label for logs and metrics. Never includes payload data.
    pub fn kind(&self) -> &'static str {
        match self {
            CipherError::InvalidKey => "invalid_key",
            CipherError::MalformedMessage(_) => "malformed_message",
            CipherError::PaddingInvalid => "padding_invalid",
            CipherError::EncodingInvalid => "encoding_invalid",
            CipherError::RecordInvalid => "record_invalid",
        }
    }
}

/// Encrypt `plaintext` under `key`.
///
/// A fresh IV is drawn for every call, so encrypting the same input twice
/// yields two different (equally valid) messages.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKey`] only if the cipher rejects the key,
/// which [`CipherKey`] validation already rules out, and
/// [`CipherError::RecordInvalid`] if a record fails to serialise.
pub fn encrypt(key: &CipherKey, plaintext: &Plaintext) -> Result<WireMessage, CipherError> {
    let mut iv = [0u8; BLOCK_LEN];
    OsRng.fill_bytes(&mut iv);
    let bytes = plaintext
        .canonical_bytes()
        .map_err(|_| CipherError::RecordInvalid)?;
    let ciphertext = seal(key, &iv, &bytes)?;
    Ok(WireMessage { iv, ciphertext })
}

/// Decrypt a wire string under `key`, returning the plaintext text as-is.
///
/// Parsing the text as JSON is the caller's business.
///
/// # Errors
///
/// [`CipherError::MalformedMessage`] for framing problems,
/// [`CipherError::PaddingInvalid`] for bad padding or a wrong key, and
/// [`CipherError::EncodingInvalid`] when the plaintext is not UTF-8.
pub fn decrypt(key: &CipherKey, message: &str) -> Result<String, CipherError> {
    let msg = WireMessage::parse(message)?;
    let plain = open(key, &msg.iv, &msg.ciphertext)?;
    String::from_utf8(plain).map_err(|_| CipherError::EncodingInvalid)
}

/// CBC-encrypt `data` with PKCS#7 padding. Output is always at least one block.
fn seal(key: &CipherKey, iv: &[u8; BLOCK_LEN], data: &[u8]) -> Result<Vec<u8>, CipherError> {
    match key.size() {
        KeySize::Aes128 => seal_as::<Aes128CbcEnc>(key.as_bytes(), iv, data),
        KeySize::Aes192 => seal_as::<Aes192CbcEnc>(key.as_bytes(), iv, data),
        KeySize::Aes256 => seal_as::<Aes256CbcEnc>(key.as_bytes(), iv, data),
    }
}

/// CBC-decrypt `ciphertext` and strip PKCS#7 padding.
fn open(key: &CipherKey, iv: &[u8; BLOCK_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
    match key.size() {
        KeySize::Aes128 => open_as::<Aes128CbcDec>(key.as_bytes(), iv, ciphertext),
        KeySize::Aes192 => open_as::<Aes192CbcDec>(key.as_bytes(), iv, ciphertext),
        KeySize::Aes256 => open_as::<Aes256CbcDec>(key.as_bytes(), iv, ciphertext),
    }
}

fn seal_as<E>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CipherError>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let enc = E::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKey)?;
    Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn open_as<D>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    D: KeyIvInit + BlockDecryptMut,
{
    let dec = D::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKey)?;
    dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::PaddingInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use cbc::cipher::block_padding::NoPadding;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    const KEY_LENS: [usize; 3] = [16, 24, 32];

    fn random_key(len: usize) -> CipherKey {
        let mut key = vec![0u8; len];
        OsRng.fill_bytes(&mut key);
        CipherKey::from_slice(&key).unwrap()
    }

    fn record(v: Value) -> Plaintext {
        match v {
            Value::Object(m) => Plaintext::Record(m),
            _ => panic!("not an object"),
        }
    }

    fn seal_string(key: &CipherKey, p: &str) -> String {
        encrypt(key, &Plaintext::from(p)).unwrap().to_string()
    }

    #[test]
    fn round_trip_all_key_sizes() {
        for len in KEY_LENS {
            let key = random_key(len);
            let wire = seal_string(&key, "123-45-6789");
            assert_eq!(decrypt(&key, &wire).unwrap(), "123-45-6789");
        }
    }

    #[test]
    fn zero_key_record_scenario() {
        let key = CipherKey::from_base64("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").unwrap();
        let wire = encrypt(&key, &record(json!({"user": "alice", "id": 1})))
            .unwrap()
            .to_string();

        let (iv, ct) = wire.split_once("::").unwrap();
        assert_eq!(STANDARD.decode(iv).unwrap().len(), BLOCK_LEN);
        assert_eq!(STANDARD.decode(ct).unwrap().len() % BLOCK_LEN, 0);

        let text = decrypt(&key, &wire).unwrap();
        assert_eq!(text, r#"{"user": "alice", "id": 1}"#);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"user": "alice", "id": 1}));
    }

    #[test]
    fn empty_plaintext_gets_full_padding_block() {
        let key = random_key(16);
        let msg = encrypt(&key, &Plaintext::from("")).unwrap();
        assert_eq!(msg.ciphertext.len(), BLOCK_LEN);
        assert_eq!(decrypt(&key, &msg.to_string()).unwrap(), "");
    }

    #[test]
    fn aligned_plaintext_gets_extra_block() {
        let key = random_key(32);
        let msg = encrypt(&key, &Plaintext::from("0123456789abcdef")).unwrap();
        assert_eq!(msg.ciphertext.len(), 2 * BLOCK_LEN);
    }

    #[test]
    fn fresh_iv_per_call() {
        let key = random_key(32);
        let a = encrypt(&key, &Plaintext::from("same input")).unwrap();
        let b = encrypt(&key, &Plaintext::from("same input")).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.ciphertext, b.ciphertext);
        assert_eq!(
            decrypt(&key, &a.to_string()).unwrap(),
            decrypt(&key, &b.to_string()).unwrap()
        );
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let k1 = random_key(32);
        let k2 = random_key(32);
        let original = r#"{"user": "alice", "id": 1}"#;
        let wire = seal_string(&k1, original);
        match decrypt(&k2, &wire) {
            Err(CipherError::PaddingInvalid) | Err(CipherError::EncodingInvalid) => {}
            other => assert_ne!(other, Ok(original.to_owned())),
        }
    }

    #[test]
    fn tampered_ciphertext_never_yields_original() {
        let key = random_key(24);
        let original = "a message long enough to span several AES blocks";
        let msg = encrypt(&key, &Plaintext::from(original)).unwrap();
        for byte in 0..msg.ciphertext.len() {
            for bit in [0u8, 3, 7] {
                let mut tampered = msg.clone();
                tampered.ciphertext[byte] ^= 1 << bit;
                let result = decrypt(&key, &tampered.to_string());
                assert_ne!(result, Ok(original.to_owned()), "byte {byte} bit {bit}");
            }
        }
    }

    #[test]
    fn malformed_messages_rejected() {
        let key = random_key(16);
        for bad in [
            "",
            "no separator here",
            "::",
            "AAAAAAAAAAAAAAAAAAAAAA==::",
            "%%%::AAAAAAAAAAAAAAAAAAAAAA==",
            "AAAA::AAAAAAAAAAAAAAAAAAAAAA==",
            "AAAAAAAAAAAAAAAAAAAAAA==::AAAA",
        ] {
            assert!(
                matches!(decrypt(&key, bad), Err(CipherError::MalformedMessage(_))),
                "expected MalformedMessage for {bad:?}"
            );
        }
    }

    /// Encrypt one raw block with no padding, so the decrypted tail is exactly `block`.
    fn seal_raw_block(key: &CipherKey, block: &[u8; BLOCK_LEN]) -> String {
        let iv = [9u8; BLOCK_LEN];
        let ciphertext = Aes128CbcEnc::new_from_slices(key.as_bytes(), &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<NoPadding>(block);
        WireMessage { iv, ciphertext }.to_string()
    }

    #[test]
    fn bad_padding_detected() {
        let key = random_key(16);

        // Pad length 0.
        let wire = seal_raw_block(&key, &[0u8; BLOCK_LEN]);
        assert_eq!(decrypt(&key, &wire).unwrap_err(), CipherError::PaddingInvalid);

        // Pad length 17, past the block size.
        let mut block = [b'a'; BLOCK_LEN];
        block[BLOCK_LEN - 1] = 17;
        let wire = seal_raw_block(&key, &block);
        assert_eq!(decrypt(&key, &wire).unwrap_err(), CipherError::PaddingInvalid);

        // Pad length 2 but the preceding byte is 3.
        let mut block = [b'a'; BLOCK_LEN];
        block[BLOCK_LEN - 2] = 0x03;
        block[BLOCK_LEN - 1] = 0x02;
        let wire = seal_raw_block(&key, &block);
        assert_eq!(decrypt(&key, &wire).unwrap_err(), CipherError::PaddingInvalid);
    }

    #[test]
    fn full_padding_block_accepted() {
        let key = random_key(16);
        let wire = seal_raw_block(&key, &[16u8; BLOCK_LEN]);
        assert_eq!(decrypt(&key, &wire).unwrap(), "");
    }

    #[test]
    fn record_numbers_survive_round_trip() {
        let key = random_key(32);
        let text = r#"{"id": 18446744073709551616, "ratio": 1e-7}"#;
        let map: Map<String, Value> = serde_json::from_str(text).unwrap();
        let wire = encrypt(&key, &Plaintext::Record(map)).unwrap().to_string();
        assert_eq!(decrypt(&key, &wire).unwrap(), text);
    }

    #[test]
    fn non_utf8_plaintext_detected() {
        let key = random_key(32);
        let iv = [3u8; BLOCK_LEN];
        let ciphertext = seal(&key, &iv, &[0xff, 0xfe, 0xfd]).unwrap();
        let wire = WireMessage { iv, ciphertext }.to_string();
        assert_eq!(decrypt(&key, &wire).unwrap_err(), CipherError::EncodingInvalid);
    }

    #[test]
    fn error_kinds_are_distinct() {
        let kinds = [
            CipherError::InvalidKey.kind(),
            CipherError::MalformedMessage("x").kind(),
            CipherError::PaddingInvalid.kind(),
            CipherError::EncodingInvalid.kind(),
            CipherError::RecordInvalid.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_text_round_trip(
            key_idx in 0usize..3,
            key_seed in any::<u8>(),
            text in ".*",
        ) {
            let key = CipherKey::from_slice(&vec![key_seed; KEY_LENS[key_idx]]).unwrap();
            let wire = seal_string(&key, &text);
            prop_assert_eq!(decrypt(&key, &wire).unwrap(), text);
        }

        #[test]
        fn prop_record_round_trip(
            entries in proptest::collection::vec(("[a-z]{1,8}", any::<i64>(), "\\PC{0,12}"), 0..6),
        ) {
            let mut map = Map::new();
            for (k, n, s) in entries {
                map.insert(format!("{k}_n"), json!(n));
                map.insert(format!("{k}_s"), json!(s));
            }
            let expected = Value::Object(map.clone());
            let key = CipherKey::from_slice(&[0u8; 32]).unwrap();
            let wire = encrypt(&key, &Plaintext::Record(map)).unwrap().to_string();
            let parsed: Value = serde_json::from_str(&decrypt(&key, &wire).unwrap()).unwrap();
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn prop_arbitrary_input_never_panics(message in ".{0,80}") {
            let key = CipherKey::from_slice(&[7u8; 16]).unwrap();
            let _ = decrypt(&key, &message);
        }
    }
}
