//! Stored Value Module
//!
//! Scalar payloads, their byte encoding, and the decoders that turn raw
//! store bytes back into typed values.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// == Stored Value ==
/// A scalar payload accepted by the facade.
///
/// The store keeps only bytes, so the variant is not persisted. Callers
/// recover it by reading back with the matching decoder:
///
/// | variant | bytes |
/// |---------|-------|
/// | `Str`   | UTF-8 |
/// | `Bytes` | as given |
/// | `Int`   | 8 bytes, two's complement, big-endian |
/// | `Float` | 8 bytes, IEEE-754 binary64, big-endian |
///
/// Serializes as a bare JSON scalar (`"a"`, `1`, `1.5`, `[1, 2]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
}

impl StoredValue {
    /// Encodes the value into the form written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoredValue::Str(text) => text.as_bytes().to_vec(),
            StoredValue::Bytes(raw) => raw.clone(),
            StoredValue::Int(number) => number.to_be_bytes().to_vec(),
            StoredValue::Float(number) => number.to_be_bytes().to_vec(),
        }
    }

    /// Returns which decoder reads this value back.
    pub fn kind(&self) -> ValueKind {
        match self {
            StoredValue::Str(_) => ValueKind::Str,
            StoredValue::Bytes(_) => ValueKind::Bytes,
            StoredValue::Int(_) => ValueKind::Int,
            StoredValue::Float(_) => ValueKind::Float,
        }
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::Str(value.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::Str(value)
    }
}

impl From<&[u8]> for StoredValue {
    fn from(value: &[u8]) -> Self {
        StoredValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for StoredValue {
    fn from(value: Vec<u8>) -> Self {
        StoredValue::Bytes(value)
    }
}

impl From<i64> for StoredValue {
    fn from(value: i64) -> Self {
        StoredValue::Int(value)
    }
}

impl From<i32> for StoredValue {
    fn from(value: i32) -> Self {
        StoredValue::Int(i64::from(value))
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Float(value)
    }
}

// == Value Kind ==
/// Names a scalar interpretation of stored bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    #[default]
    Str,
    Bytes,
    Int,
    Float,
}

impl ValueKind {
    /// Decodes `raw` with the decoder for this kind.
    pub fn decode(self, raw: &[u8]) -> Result<StoredValue, DecodeError> {
        Ok(match self {
            ValueKind::Str => StoredValue::Str(decode::utf8(raw)?),
            ValueKind::Bytes => StoredValue::Bytes(decode::raw(raw)?),
            ValueKind::Int => StoredValue::Int(decode::integer(raw)?),
            ValueKind::Float => StoredValue::Float(decode::float(raw)?),
        })
    }
}

// == Decode Error ==
/// Why raw bytes could not be read as the requested scalar.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("expected {expected} bytes, found {found}")]
    Width { expected: usize, found: usize },
}

/// Decoders from raw store bytes to scalars.
pub mod decode {
    use super::DecodeError;

    const WIDE: usize = 8;

    fn fixed_width(raw: &[u8]) -> Result<[u8; WIDE], DecodeError> {
        <[u8; WIDE]>::try_from(raw).map_err(|_| DecodeError::Width {
            expected: WIDE,
            found: raw.len(),
        })
    }

    /// Reads the bytes as UTF-8 text.
    pub fn utf8(raw: &[u8]) -> Result<String, DecodeError> {
        Ok(String::from_utf8(raw.to_vec())?)
    }

    /// Returns the bytes unchanged.
    pub fn raw(raw: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Ok(raw.to_vec())
    }

    /// Reads exactly eight big-endian bytes as an `i64`.
    pub fn integer(raw: &[u8]) -> Result<i64, DecodeError> {
        fixed_width(raw).map(i64::from_be_bytes)
    }

    /// Reads exactly eight big-endian bytes as an `f64`.
    pub fn float(raw: &[u8]) -> Result<f64, DecodeError> {
        fixed_width(raw).map(f64::from_be_bytes)
    }
}

// == Cache Key ==
/// Identifier generated for each stored payload: a random v4 UUID in
/// hyphenated text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Generates a fresh random key.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
