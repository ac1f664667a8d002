//! OCTET STRING types

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// OCTET STRING of any length
///
/// Serializes as lowercase hex, e.g. `"00f110"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OctetString(Vec<u8>);

impl OctetString {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Lowercase hex rendering of the contents
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl Deref for OctetString {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for OctetString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for OctetString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl FromStr for OctetString {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| CodecError::InvalidEncoding(format!("invalid hex octet string: {}", e)))
    }
}

impl fmt::Display for OctetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for OctetString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for OctetString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// OCTET STRING (SIZE(N))
///
/// Used for identifiers with a fixed width such as `PLMNIdentity` (3 octets)
/// or `SD` (3 octets).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedOctetString<const N: usize>([u8; N]);

impl<const N: usize> FixedOctetString<N> {
    /// Number of octets
    pub const SIZE: usize = N;

    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Big-endian encoding of `value` in `N` octets
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not fit in `N` octets.
    pub fn from_number(value: u64) -> CodecResult<Self> {
        if N < 8 && value >> (8 * N) != 0 {
            return Err(CodecError::InvalidEncoding(format!(
                "value {} does not fit in {} octets",
                value, N
            )));
        }
        let mut bytes = [0u8; N];
        for (i, byte) in bytes.iter_mut().rev().enumerate().take(8) {
            *byte = (value >> (8 * i)) as u8;
        }
        Ok(Self(bytes))
    }

    /// Interpret the octets as a big-endian number
    pub fn to_number(&self) -> CodecResult<u64> {
        if N > 8 {
            return Err(CodecError::size_out_of_range(N, 0, 8));
        }
        Ok(self.0.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for FixedOctetString<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for FixedOctetString<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> TryFrom<&[u8]> for FixedOctetString<N> {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> CodecResult<Self> {
        <[u8; N]>::try_from(bytes)
            .map(Self)
            .map_err(|_| CodecError::size_out_of_range(bytes.len(), N, N))
    }
}

impl<const N: usize> FromStr for FixedOctetString<N> {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        let octets: OctetString = s.parse()?;
        Self::try_from(octets.as_bytes())
    }
}

impl<const N: usize> fmt::Display for FixedOctetString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl<const N: usize> Serialize for FixedOctetString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedOctetString<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
