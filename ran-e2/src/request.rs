//! RIC Control procedure messages
//!
//! The E2AP layer hands the service the fields of a RIC Control Request it
//! needs and turns the returned [`RicControlOutcome`] into a RIC Control
//! Acknowledge or RIC Control Failure. Header and message stay opaque
//! E2SM octets at this level.

use crate::error::RicControlCause;
use bytes::Bytes;

/// RIC request id (E2AP §9.2.7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RicRequestId {
    pub ric_requestor_id: u16,
    pub ric_instance_id: u16,
}

impl RicRequestId {
    pub fn new(ric_requestor_id: u16, ric_instance_id: u16) -> Self {
        Self { ric_requestor_id, ric_instance_id }
    }
}

/// RIC Control Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RicControlRequest {
    pub ric_request_id: RicRequestId,
    pub ran_function_id: i64,
    /// Optional RIC call process id
    pub ric_call_process_id: Option<Bytes>,
    /// Encoded `E2SM-RC-ControlHeader`
    pub ric_control_header: Bytes,
    /// Encoded `E2SM-RC-ControlMessage`
    pub ric_control_message: Bytes,
    /// RIC control ack request; `false` means no outcome is expected
    pub ack_requested: bool,
}

impl RicControlRequest {
    /// Create a request that asks for an acknowledgement
    pub fn new(
        ric_request_id: RicRequestId,
        ran_function_id: i64,
        ric_control_header: impl Into<Bytes>,
        ric_control_message: impl Into<Bytes>,
    ) -> Self {
        Self {
            ric_request_id,
            ran_function_id,
            ric_call_process_id: None,
            ric_control_header: ric_control_header.into(),
            ric_control_message: ric_control_message.into(),
            ack_requested: true,
        }
    }

    pub fn with_call_process_id(mut self, id: impl Into<Bytes>) -> Self {
        self.ric_call_process_id = Some(id.into());
        self
    }

    pub fn with_ack_requested(mut self, ack_requested: bool) -> Self {
        self.ack_requested = ack_requested;
        self
    }
}

/// Result of a RIC Control Request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RicControlOutcome {
    /// RIC Control Acknowledge, with the encoded `E2SM-RC-ControlOutcome`
    /// when one was produced
    Acknowledge { outcome: Option<Bytes> },
    /// RIC Control Failure
    Failure { cause: RicControlCause },
}

impl RicControlOutcome {
    pub fn is_acknowledge(&self) -> bool {
        matches!(self, RicControlOutcome::Acknowledge { .. })
    }

    pub fn cause(&self) -> Option<RicControlCause> {
        match self {
            RicControlOutcome::Failure { cause } => Some(*cause),
            RicControlOutcome::Acknowledge { .. } => None,
        }
    }
}
