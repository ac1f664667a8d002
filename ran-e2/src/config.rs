//! Control service configuration

use ran_asn1::e2sm::rc::E2SM_RC_RAN_FUNCTION_ID;
use serde::{Deserialize, Serialize};

/// RIC Control service configuration
///
/// Deserializable so it can sit in the E2 node's configuration file; absent
/// keys take their default.
///
/// # Usage Example
/// ```rust
/// use ran_e2::ControlServiceConfig;
///
/// let config = ControlServiceConfig::default()
///     .with_max_message_size(16 * 1024)
///     .with_ack_with_outcome(false);
/// assert_eq!(config.ran_function_id, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlServiceConfig {
    /// RAN function id the service answers for
    pub ran_function_id: i64,
    /// Largest accepted control header in octets, 0 for no limit
    pub max_header_size: usize,
    /// Largest accepted control message in octets, 0 for no limit
    pub max_message_size: usize,
    /// Attach an encoded control outcome to the acknowledgement
    pub ack_with_outcome: bool,
}

impl Default for ControlServiceConfig {
    fn default() -> Self {
        Self {
            ran_function_id: E2SM_RC_RAN_FUNCTION_ID,
            max_header_size: 1024,
            max_message_size: 64 * 1024,
            ack_with_outcome: true,
        }
    }
}

impl ControlServiceConfig {
    pub fn with_ran_function_id(mut self, ran_function_id: i64) -> Self {
        self.ran_function_id = ran_function_id;
        self
    }

    pub fn with_max_header_size(mut self, max_header_size: usize) -> Self {
        self.max_header_size = max_header_size;
        self
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    pub fn with_ack_with_outcome(mut self, ack_with_outcome: bool) -> Self {
        self.ack_with_outcome = ack_with_outcome;
        self
    }
}
