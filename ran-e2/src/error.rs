use ran_asn1::CodecError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Error type for RIC Control handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("{what} of {size} octets exceeds the limit of {limit}")]
    Oversized { what: &'static str, size: usize, limit: usize },

    #[error("RAN function {actual} is not served, expected {expected}")]
    RanFunctionMismatch { expected: i64, actual: i64 },

    #[error("Unsupported control header format: {0}")]
    UnsupportedHeaderFormat(String),

    #[error("Unsupported control message format: {0}")]
    UnsupportedMessageFormat(String),

    #[error("Unsupported RIC style {style}")]
    UnsupportedStyle { style: i64 },

    #[error("Unsupported control action {action} of RIC style {style}")]
    UnsupportedAction { style: i64, action: i64 },

    #[error("Unsupported RAN parameter {id}")]
    UnsupportedParameter { id: i64 },

    #[error("Invalid RAN parameter {id}: {reason}")]
    InvalidParameter { id: i64, reason: String },

    #[error("Executor for style {style} action {action} is already registered")]
    DuplicateExecutor { style: i64, action: i64 },

    #[error("DU configuration failed: {0}")]
    DuConfiguration(String),
}

/// Result type alias for RIC Control handling
pub type ControlResult<T> = Result<T, ControlError>;

impl ControlError {
    pub(crate) fn invalid(id: i64, reason: impl Into<String>) -> Self {
        ControlError::InvalidParameter { id, reason: reason.into() }
    }

    /// Cause reported to the RIC in the RIC Control Failure
    pub fn cause(&self) -> RicControlCause {
        match self {
            ControlError::Codec(_) => RicControlCause::TransferSyntaxError,
            ControlError::Oversized { .. } => RicControlCause::ControlProcessingOverload,
            ControlError::RanFunctionMismatch { .. } => RicControlCause::RanFunctionIdInvalid,
            ControlError::UnsupportedHeaderFormat(_)
            | ControlError::UnsupportedMessageFormat(_)
            | ControlError::UnsupportedParameter { .. }
            | ControlError::InvalidParameter { .. } => RicControlCause::ControlMessageInvalid,
            ControlError::UnsupportedStyle { .. } | ControlError::UnsupportedAction { .. } => {
                RicControlCause::ActionNotSupported
            }
            ControlError::DuplicateExecutor { .. } => RicControlCause::Unspecified,
            ControlError::DuConfiguration(_) => RicControlCause::ControlFailedToExecute,
        }
    }
}

/// Cause of a RIC Control Failure (E2AP §9.2.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RicControlCause {
    /// ricRequest: ran-function-id-invalid
    RanFunctionIdInvalid,
    /// ricRequest: action-not-supported
    ActionNotSupported,
    /// ricRequest: control-message-invalid
    ControlMessageInvalid,
    /// ricRequest: control-failed-to-execute
    ControlFailedToExecute,
    /// ricRequest: unspecified
    Unspecified,
    /// protocol: transfer-syntax-error
    TransferSyntaxError,
    /// misc: control-processing-overload
    ControlProcessingOverload,
}

/// Cause group of the E2AP Cause CHOICE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CauseGroup {
    RicRequest,
    Protocol,
    Misc,
}

impl RicControlCause {
    pub fn group(self) -> CauseGroup {
        match self {
            RicControlCause::TransferSyntaxError => CauseGroup::Protocol,
            RicControlCause::ControlProcessingOverload => CauseGroup::Misc,
            _ => CauseGroup::RicRequest,
        }
    }
}

impl fmt::Display for RicControlCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RicControlCause::RanFunctionIdInvalid => "ran-function-id-invalid",
            RicControlCause::ActionNotSupported => "action-not-supported",
            RicControlCause::ControlMessageInvalid => "control-message-invalid",
            RicControlCause::ControlFailedToExecute => "control-failed-to-execute",
            RicControlCause::Unspecified => "unspecified",
            RicControlCause::TransferSyntaxError => "transfer-syntax-error",
            RicControlCause::ControlProcessingOverload => "control-processing-overload",
        };
        write!(f, "{}", name)
    }
}
