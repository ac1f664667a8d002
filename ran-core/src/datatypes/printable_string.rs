//! PrintableString type

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Check a character against the X.680 PrintableString alphabet
///
/// The alphabet is `A-Z a-z 0-9`, space and `' ( ) + , - . / : = ?`.
pub fn is_printable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '?')
}

/// PrintableString with its alphabet enforced at construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct PrintableString(String);

impl PrintableString {
    /// Create a new printable string
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidEncoding` naming the first character
    /// outside the PrintableString alphabet.
    pub fn new(value: impl Into<String>) -> CodecResult<Self> {
        let value = value.into();
        if let Some(bad) = value.chars().find(|c| !is_printable_char(*c)) {
            return Err(CodecError::InvalidEncoding(format!(
                "character {:?} not allowed in PrintableString",
                bad
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters (equal to the octet count, the alphabet is ASCII)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for PrintableString {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<&str> for PrintableString {
    type Error = CodecError;

    fn try_from(s: &str) -> CodecResult<Self> {
        Self::new(s)
    }
}

impl fmt::Display for PrintableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PrintableString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}
