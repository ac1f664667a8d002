//! Constrained INTEGER type

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// INTEGER with a declared legal range `[LB, UB]`
///
/// The bounds are part of the type, so the codec derives the encoding width
/// from the type alone. When `EXT` is set the constraint is extensible
/// (`INTEGER (LB..UB, ...)`) and values outside the root range are legal;
/// they are encoded with the extension bit set.
///
/// # Examples
///
/// ```
/// use ran_core::ConstrainedInteger;
///
/// type ControlActionId = ConstrainedInteger<1, 65535, true>;
///
/// let id = ControlActionId::new(6).unwrap();
/// assert_eq!(id.value(), 6);
/// assert!(id.is_in_root());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstrainedInteger<const LB: i64, const UB: i64, const EXT: bool = false>(i64);

impl<const LB: i64, const UB: i64, const EXT: bool> ConstrainedInteger<LB, UB, EXT> {
    /// Lower bound of the root range
    pub const LOWER: i64 = LB;
    /// Upper bound of the root range
    pub const UPPER: i64 = UB;
    /// Whether the constraint carries an extension marker
    pub const EXTENSIBLE: bool = EXT;

    /// Create a new value
    ///
    /// # Errors
    ///
    /// Returns `CodecError::OutOfRange` if the constraint is not extensible
    /// and `value` lies outside `[LB, UB]`.
    pub fn new(value: i64) -> CodecResult<Self> {
        if EXT || (LB..=UB).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CodecError::out_of_range(value, LB, UB))
        }
    }

    /// Get the integer value
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Replace the value, keeping the constraint
    pub fn set(&mut self, value: i64) -> CodecResult<()> {
        *self = Self::new(value)?;
        Ok(())
    }

    /// Check whether the value lies in the root range
    pub fn is_in_root(self) -> bool {
        (LB..=UB).contains(&self.0)
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> Default for ConstrainedInteger<LB, UB, EXT> {
    fn default() -> Self {
        Self(LB)
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> TryFrom<i64> for ConstrainedInteger<LB, UB, EXT> {
    type Error = CodecError;

    fn try_from(value: i64) -> CodecResult<Self> {
        Self::new(value)
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> From<ConstrainedInteger<LB, UB, EXT>> for i64 {
    fn from(value: ConstrainedInteger<LB, UB, EXT>) -> Self {
        value.0
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> fmt::Display for ConstrainedInteger<LB, UB, EXT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> Serialize for ConstrainedInteger<LB, UB, EXT> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de, const LB: i64, const UB: i64, const EXT: bool> Deserialize<'de> for ConstrainedInteger<LB, UB, EXT> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
