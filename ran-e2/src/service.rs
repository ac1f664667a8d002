//! E2SM-RC RIC Control service
//!
//! Entry point of the RIC Control procedure on an E2 node. The service keeps
//! a registry of [`ControlActionExecutor`]s keyed by (style, action) and runs
//! every request through the same pipeline:
//!
//! 1. size checks on the header and message octets
//! 2. RAN function id check
//! 3. decode of the `E2SM-RC-ControlHeader` (format 1)
//! 4. executor lookup by (style, action)
//! 5. decode of the `E2SM-RC-ControlMessage` (format 1)
//! 6. top-level RAN parameter check against the executor
//! 7. execution, then encode of the `E2SM-RC-ControlOutcome`
//!
//! Any failure becomes a RIC Control Failure with the matching cause.
//!
//! # Usage Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use ran_e2::{E2smRcControlService, RicControlRequest, RicRequestId};
//! use ran_e2::slicing::SliceLevelPrbQuotaExecutor;
//! # use ran_e2::du::{DuConfigurator, DuMacSchedControlConfig};
//! # struct Du;
//! # #[async_trait::async_trait]
//! # impl DuConfigurator for Du {
//! #     async fn configure(&self, c: DuMacSchedControlConfig) -> ran_e2::ControlResult<DuMacSchedControlConfig> { Ok(c) }
//! # }
//!
//! # async fn run(header: Vec<u8>, message: Vec<u8>) -> ran_e2::ControlResult<()> {
//! let service = E2smRcControlService::new();
//! service.register_executor(Arc::new(SliceLevelPrbQuotaExecutor::new(Arc::new(Du)))).await?;
//!
//! let request = RicControlRequest::new(RicRequestId::new(1, 0), 3, header, message);
//! let outcome = service.handle(&request).await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

use crate::config::ControlServiceConfig;
use crate::error::{ControlError, ControlResult};
use crate::executor::ControlActionExecutor;
use crate::request::{RicControlOutcome, RicControlRequest};
use bytes::Bytes;
use log::{info, warn};
use ran_asn1::e2sm::rc::{
    ControlHeaderFormats, ControlMessageFormats, E2smRcControlHeader, E2smRcControlMessage, RicControlDecision,
    RicStyleType,
};
use ran_asn1::per::{decode, encode};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type ExecutorKey = (RicStyleType, i64);

/// RIC Control service of one E2SM-RC RAN function
pub struct E2smRcControlService {
    /// Registered executors by (style, action)
    executors: Arc<RwLock<HashMap<ExecutorKey, Arc<dyn ControlActionExecutor>>>>,
    config: ControlServiceConfig,
}

impl E2smRcControlService {
    /// Create a service with default configuration
    pub fn new() -> Self {
        Self::with_config(ControlServiceConfig::default())
    }

    /// Create a service with custom configuration
    pub fn with_config(config: ControlServiceConfig) -> Self {
        Self {
            executors: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a control action executor
    ///
    /// # Arguments
    /// * `executor` - The executor, registered under its (style, action)
    ///
    /// # Errors
    /// Returns `ControlError::DuplicateExecutor` if the pair is already served
    pub async fn register_executor(&self, executor: Arc<dyn ControlActionExecutor>) -> ControlResult<()> {
        let mut executors = self.executors.write().await;
        let key = (executor.style(), executor.action_id());

        if executors.contains_key(&key) {
            return Err(ControlError::DuplicateExecutor {
                style: key.0,
                action: key.1,
            });
        }

        info!(
            "Registered control action '{}' (style {}, action {})",
            executor.name(),
            key.0,
            key.1
        );
        executors.insert(key, executor);
        Ok(())
    }

    /// Unregister the executor of (style, action), returning it
    pub async fn unregister_executor(
        &self,
        style: RicStyleType,
        action: i64,
    ) -> Option<Arc<dyn ControlActionExecutor>> {
        let mut executors = self.executors.write().await;
        executors.remove(&(style, action))
    }

    /// Find the executor of (style, action)
    pub async fn find_executor(&self, style: RicStyleType, action: i64) -> Option<Arc<dyn ControlActionExecutor>> {
        let executors = self.executors.read().await;
        executors.get(&(style, action)).cloned()
    }

    /// Served (style, action) pairs in ascending order
    pub async fn registered_actions(&self) -> Vec<(RicStyleType, i64)> {
        let executors = self.executors.read().await;
        let mut actions: Vec<_> = executors.keys().copied().collect();
        actions.sort_unstable();
        actions
    }

    pub fn config(&self) -> &ControlServiceConfig {
        &self.config
    }

    /// Handle a RIC Control Request
    ///
    /// Never fails: rejections are reported as `RicControlOutcome::Failure`.
    pub async fn handle(&self, request: &RicControlRequest) -> RicControlOutcome {
        let id = request.ric_request_id;
        match self.process(request).await {
            Ok(outcome) => {
                info!(
                    "RIC Control request {}/{} acknowledged{}",
                    id.ric_requestor_id,
                    id.ric_instance_id,
                    if outcome.is_some() { " with outcome" } else { "" }
                );
                RicControlOutcome::Acknowledge { outcome }
            }
            Err(err) => {
                let cause = err.cause();
                warn!(
                    "RIC Control request {}/{} failed ({}): {}",
                    id.ric_requestor_id, id.ric_instance_id, cause, err
                );
                RicControlOutcome::Failure { cause }
            }
        }
    }

    async fn process(&self, request: &RicControlRequest) -> ControlResult<Option<Bytes>> {
        check_size("Control header", request.ric_control_header.len(), self.config.max_header_size)?;
        check_size("Control message", request.ric_control_message.len(), self.config.max_message_size)?;

        if request.ran_function_id != self.config.ran_function_id {
            return Err(ControlError::RanFunctionMismatch {
                expected: self.config.ran_function_id,
                actual: request.ran_function_id,
            });
        }

        let header: E2smRcControlHeader = decode(&request.ric_control_header)?;
        let header = match header.ric_control_header_formats {
            ControlHeaderFormats::ControlHeaderFormat1(format1) => format1,
            other => {
                return Err(ControlError::UnsupportedHeaderFormat(format!("{:?}", other.choice_type())));
            }
        };

        let style = header.ric_style_type;
        let action = header.ric_control_action_id.value();
        let executor = self.select_executor(style, action).await?;

        let message: E2smRcControlMessage = decode(&request.ric_control_message)?;
        let message = match message.ric_control_message_formats {
            ControlMessageFormats::ControlMessageFormat1(format1) => format1,
            other => {
                return Err(ControlError::UnsupportedMessageFormat(format!("{:?}", other.choice_type())));
            }
        };

        let supported = executor.supported_parameters();
        if let Some(item) = message
            .ran_p_list
            .iter()
            .find(|item| !supported.contains(&item.ran_parameter_id.value()))
        {
            return Err(ControlError::UnsupportedParameter {
                id: item.ran_parameter_id.value(),
            });
        }

        if header.ric_control_decision == Some(RicControlDecision::Reject) {
            info!("Control action '{}' not executed: RIC decision is reject", executor.name());
            return Ok(None);
        }

        let outcome = executor.execute(&header.ue_id, &message).await?;
        if !(self.config.ack_with_outcome && request.ack_requested) {
            return Ok(None);
        }
        Ok(outcome.map(|outcome| encode(&outcome)).transpose()?)
    }

    async fn select_executor(&self, style: RicStyleType, action: i64) -> ControlResult<Arc<dyn ControlActionExecutor>> {
        let executors = self.executors.read().await;
        if let Some(executor) = executors.get(&(style, action)) {
            return Ok(executor.clone());
        }
        if executors.keys().any(|(served, _)| *served == style) {
            Err(ControlError::UnsupportedAction { style, action })
        } else {
            Err(ControlError::UnsupportedStyle { style })
        }
    }
}

impl Default for E2smRcControlService {
    fn default() -> Self {
        Self::new()
    }
}

fn check_size(what: &'static str, size: usize, limit: usize) -> ControlResult<()> {
    if limit != 0 && size > limit {
        return Err(ControlError::Oversized { what, size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::du::{DuMacSchedControlConfig, MockDuConfigurator, RrmPolicyMember, RrmPolicyRatioGroup, SNssai};
    use crate::error::RicControlCause;
    use crate::request::RicRequestId;
    use crate::slicing::{slice_prb_quota_message, SliceLevelPrbQuotaExecutor};
    use ran_asn1::e2sm::common::Ueid;
    use ran_asn1::e2sm::rc::{
        ControlMessageFormat1Item, E2smRcControlHeaderFormat1, E2smRcControlHeaderFormat2, E2smRcControlMessageFormat1, E2smRcControlOutcome,
        RanParameterId, RanParameterStructure, RanParameterValue, RanParameterValueType, RicControlActionId,
    };
    use tokio_test::{assert_err, assert_ok};

    const HEADER_HEX: &str = "00000000000f110000000102000005";

    fn quota() -> DuMacSchedControlConfig {
        DuMacSchedControlConfig {
            rrm_policy_ratio_list: vec![RrmPolicyRatioGroup {
                members: vec![RrmPolicyMember {
                    plmn_id: [0x00, 0x0F, 0x11],
                    s_nssai: SNssai { sst: 1, sd: None },
                }],
                min_prb_policy_ratio: Some(20),
                max_prb_policy_ratio: Some(80),
                dedicated_prb_policy_ratio: Some(10),
            }],
        }
    }

    fn message() -> Bytes {
        encode(&slice_prb_quota_message(&quota()).unwrap()).unwrap()
    }

    fn header(style: i64, action: i64) -> Bytes {
        let header = E2smRcControlHeader::format1(Ueid::default(), style, RicControlActionId::new(action).unwrap());
        encode(&header).unwrap()
    }

    fn request(header: impl Into<Bytes>, message: impl Into<Bytes>) -> RicControlRequest {
        RicControlRequest::new(RicRequestId::new(1, 7), 3, header, message)
    }

    fn accepting_du() -> MockDuConfigurator {
        let mut du = MockDuConfigurator::new();
        du.expect_configure()
            .times(1)
            .withf(|config| config == &quota())
            .returning(Ok);
        du
    }

    fn idle_du() -> MockDuConfigurator {
        let mut du = MockDuConfigurator::new();
        du.expect_configure().never();
        du
    }

    async fn service(du: MockDuConfigurator, config: ControlServiceConfig) -> E2smRcControlService {
        let service = E2smRcControlService::with_config(config);
        assert_ok!(
            service
                .register_executor(Arc::new(SliceLevelPrbQuotaExecutor::new(Arc::new(du))))
                .await
        );
        service
    }

    #[tokio::test]
    async fn test_slice_quota_acknowledged() {
        let service = service(accepting_du(), ControlServiceConfig::default()).await;
        let header = hex::decode(HEADER_HEX).unwrap();

        let outcome = service.handle(&request(header, message())).await;
        let RicControlOutcome::Acknowledge { outcome: Some(bytes) } = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        let outcome: E2smRcControlOutcome = assert_ok!(decode(&bytes));
        let items = &outcome.ric_control_outcome_formats.control_outcome_format1().ran_p_list;
        let ratios: Vec<(i64, RanParameterValue)> = items
            .iter()
            .map(|item| (item.ran_parameter_id.value(), item.ran_parameter_value.clone()))
            .collect();
        assert_eq!(
            ratios,
            vec![
                (11, RanParameterValue::ValueInt(20)),
                (12, RanParameterValue::ValueInt(80)),
                (13, RanParameterValue::ValueInt(10)),
            ]
        );
    }

    #[tokio::test]
    async fn test_outcome_suppressed() {
        let service = service(accepting_du(), ControlServiceConfig::default()).await;
        let outcome = service
            .handle(&request(header(2, 6), message()).with_ack_requested(false))
            .await;
        assert_eq!(outcome, RicControlOutcome::Acknowledge { outcome: None });

        let service = service_without_outcome().await;
        let outcome = service.handle(&request(header(2, 6), message())).await;
        assert_eq!(outcome, RicControlOutcome::Acknowledge { outcome: None });
    }

    async fn service_without_outcome() -> E2smRcControlService {
        service(accepting_du(), ControlServiceConfig::default().with_ack_with_outcome(false)).await
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let header = hex::decode(&HEADER_HEX[..12]).unwrap();
        let outcome = service.handle(&request(header, message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::TransferSyntaxError));
    }

    #[tokio::test]
    async fn test_malformed_message() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let outcome = service.handle(&request(header(2, 6), vec![0x00, 0x01])).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::TransferSyntaxError));
    }

    #[tokio::test]
    async fn test_wrong_ran_function() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let mut request = request(header(2, 6), message());
        request.ran_function_id = 2;
        let outcome = service.handle(&request).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::RanFunctionIdInvalid));
    }

    #[tokio::test]
    async fn test_unknown_style_and_action() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;

        let outcome = service.handle(&request(header(1, 6), message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ActionNotSupported));
        let err = assert_err!(service.select_executor(1, 6).await.map(|_| ()));
        assert_eq!(err, ControlError::UnsupportedStyle { style: 1 });

        let outcome = service.handle(&request(header(2, 5), message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ActionNotSupported));
        let err = assert_err!(service.select_executor(2, 5).await.map(|_| ()));
        assert_eq!(err, ControlError::UnsupportedAction { style: 2, action: 5 });
    }

    #[tokio::test]
    async fn test_unsupported_header_format() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let header = E2smRcControlHeader {
            ric_control_header_formats: E2smRcControlHeaderFormat2::default().into(),
        };
        let outcome = service.handle(&request(encode(&header).unwrap(), message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ControlMessageInvalid));
    }

    #[tokio::test]
    async fn test_unknown_parameters() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;

        let mut format1 = E2smRcControlMessageFormat1::default();
        format1
            .ran_p_list
            .push(ControlMessageFormat1Item {
                ran_parameter_id: RanParameterId::new(4).unwrap(),
                ran_parameter_value_type: RanParameterValueType::element(1i64),
            })
            .unwrap();
        let top_level = encode(&E2smRcControlMessage::format1(format1)).unwrap();
        let outcome = service.handle(&request(header(2, 6), top_level)).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ControlMessageInvalid));

        let mut format1 = E2smRcControlMessageFormat1::default();
        format1
            .ran_p_list
            .push(ControlMessageFormat1Item {
                ran_parameter_id: RanParameterId::new(1).unwrap(),
                ran_parameter_value_type: RanParameterValueType::list([
                    RanParameterStructure::new([(42, RanParameterValueType::element(1i64))]).unwrap(),
                ])
                .unwrap(),
            })
            .unwrap();
        let nested = encode(&E2smRcControlMessage::format1(format1)).unwrap();
        let outcome = service.handle(&request(header(2, 6), nested)).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ControlMessageInvalid));
    }

    #[tokio::test]
    async fn test_oversized_header() {
        let service = service(idle_du(), ControlServiceConfig::default().with_max_header_size(8)).await;
        let outcome = service.handle(&request(header(2, 6), message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ControlProcessingOverload));
    }

    #[tokio::test]
    async fn test_size_check_disabled() {
        let config = ControlServiceConfig::default()
            .with_max_header_size(0)
            .with_max_message_size(0);
        let service = service(accepting_du(), config).await;
        assert!(service.handle(&request(header(2, 6), message())).await.is_acknowledge());
    }

    #[tokio::test]
    async fn test_du_failure() {
        let mut du = MockDuConfigurator::new();
        du.expect_configure()
            .times(1)
            .returning(|_| Err(ControlError::DuConfiguration("no such slice".to_string())));
        let service = service(du, ControlServiceConfig::default()).await;
        let outcome = service.handle(&request(header(2, 6), message())).await;
        assert_eq!(outcome.cause(), Some(RicControlCause::ControlFailedToExecute));
    }

    #[tokio::test]
    async fn test_rejected_by_ric_decision() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let header = E2smRcControlHeader {
            ric_control_header_formats: E2smRcControlHeaderFormat1 {
                ue_id: Ueid::default(),
                ric_style_type: 2,
                ric_control_action_id: RicControlActionId::new(6).unwrap(),
                ric_control_decision: Some(RicControlDecision::Reject),
            }
            .into(),
        };
        let outcome = service.handle(&request(encode(&header).unwrap(), message())).await;
        assert_eq!(outcome, RicControlOutcome::Acknowledge { outcome: None });
    }

    #[tokio::test]
    async fn test_registry() {
        let service = service(idle_du(), ControlServiceConfig::default()).await;
        let duplicate = Arc::new(SliceLevelPrbQuotaExecutor::new(Arc::new(idle_du())));
        let err = assert_err!(service.register_executor(duplicate).await);
        assert_eq!(err, ControlError::DuplicateExecutor { style: 2, action: 6 });
        assert_eq!(service.registered_actions().await, vec![(2, 6)]);

        let removed = service.unregister_executor(2, 6).await.unwrap();
        assert_eq!(removed.name(), "Slice-level PRB quota");
        assert!(service.find_executor(2, 6).await.is_none());
        assert_eq!(
            service.handle(&request(header(2, 6), message())).await.cause(),
            Some(RicControlCause::ActionNotSupported)
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let mut du = MockDuConfigurator::new();
        du.expect_configure().times(8).returning(Ok);
        let service = Arc::new(service(du, ControlServiceConfig::default()).await);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.handle(&request(header(2, 6), message())).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_acknowledge());
        }
    }
}
