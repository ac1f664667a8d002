//! DU configuration seam
//!
//! Control actions do not touch the MAC scheduler directly. They collect the
//! requested change in a [`DuMacSchedControlConfig`] and hand it to a
//! [`DuConfigurator`], which applies it to the DU and reports what was
//! actually applied.

use crate::error::ControlResult;
use async_trait::async_trait;
use serde::Serialize;

/// S-NSSAI of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SNssai {
    /// Slice/service type
    pub sst: u8,
    /// Slice differentiator, 24 bits
    pub sd: Option<u32>,
}

/// Slice an RRM policy applies to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RrmPolicyMember {
    pub plmn_id: [u8; 3],
    pub s_nssai: SNssai,
}

/// RRM policy ratio group: a set of slices sharing PRB ratios (TS 28.541 §4.3.36)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RrmPolicyRatioGroup {
    pub members: Vec<RrmPolicyMember>,
    /// Share of PRBs guaranteed to the group when needed, percent
    pub min_prb_policy_ratio: Option<i64>,
    /// Upper limit of the group's PRB share, percent
    pub max_prb_policy_ratio: Option<i64>,
    /// Share of PRBs reserved for the group, percent
    pub dedicated_prb_policy_ratio: Option<i64>,
}

/// MAC scheduler reconfiguration requested through RIC Control
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DuMacSchedControlConfig {
    pub rrm_policy_ratio_list: Vec<RrmPolicyRatioGroup>,
}

/// Applies MAC scheduler reconfigurations to the DU
///
/// # Usage Example
/// ```rust
/// use async_trait::async_trait;
/// use ran_e2::du::{DuConfigurator, DuMacSchedControlConfig};
/// use ran_e2::ControlResult;
///
/// struct LoggingDu;
///
/// #[async_trait]
/// impl DuConfigurator for LoggingDu {
///     async fn configure(&self, config: DuMacSchedControlConfig) -> ControlResult<DuMacSchedControlConfig> {
///         println!("{:?}", config);
///         Ok(config)
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DuConfigurator: Send + Sync {
    /// Apply `config`
    ///
    /// Returns the configuration in effect afterwards, which may differ
    /// from the request when the DU clamps values.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::DuConfiguration` if the DU refused the change.
    async fn configure(&self, config: DuMacSchedControlConfig) -> ControlResult<DuMacSchedControlConfig>;
}
