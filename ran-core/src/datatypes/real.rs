//! REAL type

use serde::{Deserialize, Serialize};
use std::fmt;

/// REAL value
///
/// Held as an `f64`; the codec translates it to and from the X.690 binary
/// and decimal forms. Two values compare equal bitwise for NaN so that a
/// decoded NaN equals the NaN it was encoded from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Real(f64);

impl Real {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the floating point value
    pub const fn value(self) -> f64 {
        self.0
    }

    pub fn set_value(&mut self, value: f64) {
        self.0 = value;
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            return true;
        }
        self.0.to_bits() == other.0.to_bits()
    }
}

impl From<f64> for Real {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Real> for f64 {
    fn from(value: Real) -> Self {
        value.0
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
