//! Plaintext canonicalisation.
//!
//! Structured records are rendered to JSON text with `", "` / `": "`
//! separators, member order preserved, and every non-ASCII character escaped
//! as `\uXXXX`. Numbers keep the digits the client sent. Existing clients
//! compare decrypted text byte-for-byte, so this layout is part of the wire
//! contract.

use std::borrow::Cow;
use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};

/// A value to encrypt.
#[derive(Debug, Clone, PartialEq)]
pub enum Plaintext {
    /// Text encrypted verbatim as UTF-8.
    Text(String),
    /// Structured record, canonicalised to JSON text first.
    Record(Map<String, Value>),
}

impl Plaintext {
    /// Canonical byte form fed to the cipher. Text is borrowed as-is.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures for records.
    pub fn canonical_bytes(&self) -> Result<Cow<'_, [u8]>, serde_json::Error> {
        match self {
            Plaintext::Text(s) => Ok(Cow::Borrowed(s.as_bytes())),
            Plaintext::Record(map) => to_canonical_json(map).map(Cow::Owned),
        }
    }
}

impl From<String> for Plaintext {
    fn from(s: String) -> Self {
        Plaintext::Text(s)
    }
}

impl From<&str> for Plaintext {
    fn from(s: &str) -> Self {
        Plaintext::Text(s.to_owned())
    }
}

impl From<Map<String, Value>> for Plaintext {
    fn from(map: Map<String, Value>) -> Self {
        Plaintext::Record(map)
    }
}

/// Only strings and objects can be encrypted; any other JSON value is handed back.
impl TryFrom<Value> for Plaintext {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Plaintext::Text(s)),
            Value::Object(map) => Ok(Plaintext::Record(map)),
            other => Err(other),
        }
    }
}

/// Render a record as canonical JSON text. The output is pure ASCII.
pub fn to_canonical_json(record: &Map<String, Value>) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut out, CanonicalFormatter);
    record.serialize(&mut ser)?;
    Ok(out)
}

/// Compact JSON with spaced separators and ASCII-only strings.
///
/// Control characters, quotes and backslashes go through serde_json's own
/// escaping; this formatter only handles what the default leaves as raw UTF-8.
struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
