//! Placeholder for unrecognised CHOICE alternatives

use super::octet_string::OctetString;
use serde::{Deserialize, Serialize};

/// Extension alternative of a CHOICE that this schema version does not know
///
/// Keeps the extension index and the raw open-type octets so that relaying
/// the value re-encodes it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnknownAlternative {
    /// Index within the extension alternatives, starting at 0
    pub extension_index: usize,
    /// Contents of the open type
    pub data: OctetString,
}

impl UnknownAlternative {
    pub fn new(extension_index: usize, data: impl Into<OctetString>) -> Self {
        Self {
            extension_index,
            data: data.into(),
        }
    }
}
