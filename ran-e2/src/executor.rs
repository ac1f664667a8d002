//! RIC control action executors
//!
//! Each E2SM-RC control action an E2 node supports is implemented by one
//! [`ControlActionExecutor`], registered with the control service under its
//! (style, action) pair.

use crate::error::ControlResult;
use async_trait::async_trait;
use ran_asn1::e2sm::common::Ueid;
use ran_asn1::e2sm::rc::{E2smRcControlMessageFormat1, E2smRcControlOutcome, RicStyleType};

/// Executor of one control action
#[async_trait]
pub trait ControlActionExecutor: Send + Sync {
    /// RIC style type served
    fn style(&self) -> RicStyleType;

    /// Control action id within the style
    fn action_id(&self) -> i64;

    /// Human-readable action name for logs
    fn name(&self) -> &str;

    /// Top-level RAN parameter ids the action accepts
    fn supported_parameters(&self) -> Vec<i64>;

    /// Execute the action for `ue_id`
    ///
    /// Returns the outcome to report to the RIC, if any.
    async fn execute(
        &self,
        ue_id: &Ueid,
        message: &E2smRcControlMessageFormat1,
    ) -> ControlResult<Option<E2smRcControlOutcome>>;
}
