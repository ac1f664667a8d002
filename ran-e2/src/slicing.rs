//! Slice-level PRB quota control (E2SM-RC style 2, action 6)
//!
//! Radio resource allocation control that sets the RRM policy ratios of
//! network slices on the DU. The RAN parameter tree of the action:
//!
//! ```text
//! 1  RRM Policy Ratio List              LIST
//! └─ 2  RRM Policy Ratio Group          STRUCTURE (list entry)
//!    ├─ 3  RRM Policy                   STRUCTURE
//!    │  └─ 5  RRM Policy Member List    LIST
//!    │     └─ 6  RRM Policy Member      STRUCTURE (list entry)
//!    │        ├─ 7  PLMN Identity       OCTET STRING (3)
//!    │        └─ 8  S-NSSAI             STRUCTURE
//!    │           ├─ 9   SST             OCTET STRING (1)
//!    │           └─ 10  SD              OCTET STRING (3), optional
//!    ├─ 11 Min PRB Policy Ratio         INTEGER (0..100)
//!    ├─ 12 Max PRB Policy Ratio         INTEGER (0..100)
//!    └─ 13 Dedicated PRB Policy Ratio   INTEGER (0..100)
//! ```
//!
//! Messages built here list the children of groups and members directly in
//! the list entries (`[3, 11, 12, 13]` and `[7, 8]`). Entries carrying the
//! group (2) or member (6) id as their only item are accepted as well.

use crate::du::{DuConfigurator, DuMacSchedControlConfig, RrmPolicyMember, RrmPolicyRatioGroup};
use crate::error::{ControlError, ControlResult};
use crate::executor::ControlActionExecutor;
use crate::parameter::{expect_int, expect_list, expect_octets, expect_structure, RanParameterTable};
use async_trait::async_trait;
use ran_asn1::e2sm::common::Ueid;
use ran_asn1::e2sm::rc::{
    ControlMessageFormat1Item, ControlOutcomeFormat1Item, E2smRcControlMessage, E2smRcControlMessageFormat1,
    E2smRcControlOutcome, E2smRcControlOutcomeFormat1, RanParameterId, RanParameterStructure,
    RanParameterValue, RanParameterValueType, RicStyleType,
};
use ran_asn1::{CodecResult, OctetString};
use std::sync::Arc;

/// Radio Resource Allocation Control
pub const RADIO_RESOURCE_ALLOCATION_CONTROL_STYLE: RicStyleType = 2;
/// Slice-level PRB quota
pub const SLICE_LEVEL_PRB_QUOTA_ACTION: i64 = 6;

pub const RRM_POLICY_RATIO_LIST: i64 = 1;
pub const RRM_POLICY_RATIO_GROUP: i64 = 2;
pub const RRM_POLICY: i64 = 3;
pub const RRM_POLICY_MEMBER_LIST: i64 = 5;
pub const RRM_POLICY_MEMBER: i64 = 6;
pub const PLMN_IDENTITY: i64 = 7;
pub const S_NSSAI: i64 = 8;
pub const SST: i64 = 9;
pub const SD: i64 = 10;
pub const MIN_PRB_POLICY_RATIO: i64 = 11;
pub const MAX_PRB_POLICY_RATIO: i64 = 12;
pub const DEDICATED_PRB_POLICY_RATIO: i64 = 13;

/// Accumulator filled while walking the parameter tree
#[derive(Debug, Default)]
struct SliceQuota {
    config: DuMacSchedControlConfig,
}

impl SliceQuota {
    fn begin_group(&mut self) {
        self.config.rrm_policy_ratio_list.push(RrmPolicyRatioGroup::default());
    }

    fn group(&mut self, id: i64) -> ControlResult<&mut RrmPolicyRatioGroup> {
        self.config
            .rrm_policy_ratio_list
            .last_mut()
            .ok_or_else(|| ControlError::invalid(id, "outside of an RRM policy ratio group"))
    }

    fn begin_member(&mut self, id: i64) -> ControlResult<()> {
        self.group(id)?.members.push(RrmPolicyMember::default());
        Ok(())
    }

    fn member(&mut self, id: i64) -> ControlResult<&mut RrmPolicyMember> {
        self.group(id)?
            .members
            .last_mut()
            .ok_or_else(|| ControlError::invalid(id, "outside of an RRM policy member"))
    }

    fn validate(&self) -> ControlResult<()> {
        if self.config.rrm_policy_ratio_list.is_empty() {
            return Err(ControlError::invalid(RRM_POLICY_RATIO_LIST, "no RRM policy ratio group"));
        }
        for group in &self.config.rrm_policy_ratio_list {
            if group.members.is_empty() {
                return Err(ControlError::invalid(RRM_POLICY_MEMBER_LIST, "RRM policy without members"));
            }
            if let (Some(min), Some(max)) = (group.min_prb_policy_ratio, group.max_prb_policy_ratio) {
                if min > max {
                    return Err(ControlError::invalid(
                        MIN_PRB_POLICY_RATIO,
                        format!("min ratio {} above max ratio {}", min, max),
                    ));
                }
            }
            if let (Some(dedicated), Some(min)) = (group.dedicated_prb_policy_ratio, group.min_prb_policy_ratio) {
                if dedicated > min {
                    return Err(ControlError::invalid(
                        DEDICATED_PRB_POLICY_RATIO,
                        format!("dedicated ratio {} above min ratio {}", dedicated, min),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn ratio(id: i64, value: &RanParameterValueType) -> ControlResult<i64> {
    let ratio = expect_int(id, value)?;
    if !(0..=100).contains(&ratio) {
        return Err(ControlError::invalid(id, format!("ratio {} outside 0..=100", ratio)));
    }
    Ok(ratio)
}

fn fixed_octets<const N: usize>(id: i64, value: &RanParameterValueType) -> ControlResult<[u8; N]> {
    let octets = expect_octets(id, value)?;
    octets
        .try_into()
        .map_err(|_| ControlError::invalid(id, format!("expected {} octets, got {}", N, octets.len())))
}

/// Walk list entries; entries not wrapped in `entry_id` open a new entry first
fn interpret_entries(
    table: &RanParameterTable<SliceQuota>,
    id: i64,
    value: &RanParameterValueType,
    quota: &mut SliceQuota,
    entry_id: i64,
    begin: fn(&mut SliceQuota, i64) -> ControlResult<()>,
) -> ControlResult<()> {
    for entry in expect_list(id, value)? {
        if entry.get(entry_id).is_none() {
            begin(quota, id)?;
        }
        table.interpret_structure(entry, quota)?;
    }
    Ok(())
}

fn slice_quota_table() -> RanParameterTable<SliceQuota> {
    RanParameterTable::<SliceQuota>::new()
        .with(RRM_POLICY_RATIO_LIST, |table, id, value, quota| {
            interpret_entries(table, id, value, quota, RRM_POLICY_RATIO_GROUP, |quota, _| {
                quota.begin_group();
                Ok(())
            })
        })
        .with(RRM_POLICY_RATIO_GROUP, |table, id, value, quota| {
            quota.begin_group();
            table.interpret_structure(expect_structure(id, value)?, quota)
        })
        .with(RRM_POLICY, |table, id, value, quota| {
            table.interpret_structure(expect_structure(id, value)?, quota)
        })
        .with(RRM_POLICY_MEMBER_LIST, |table, id, value, quota| {
            interpret_entries(table, id, value, quota, RRM_POLICY_MEMBER, SliceQuota::begin_member)
        })
        .with(RRM_POLICY_MEMBER, |table, id, value, quota| {
            quota.begin_member(id)?;
            table.interpret_structure(expect_structure(id, value)?, quota)
        })
        .with(PLMN_IDENTITY, |_, id, value, quota| {
            quota.member(id)?.plmn_id = fixed_octets::<3>(id, value)?;
            Ok(())
        })
        .with(S_NSSAI, |table, id, value, quota| {
            table.interpret_structure(expect_structure(id, value)?, quota)
        })
        .with(SST, |_, id, value, quota| {
            let [sst] = fixed_octets::<1>(id, value)?;
            quota.member(id)?.s_nssai.sst = sst;
            Ok(())
        })
        .with(SD, |_, id, value, quota| {
            let [a, b, c] = fixed_octets::<3>(id, value)?;
            quota.member(id)?.s_nssai.sd = Some(u32::from_be_bytes([0, a, b, c]));
            Ok(())
        })
        .with(MIN_PRB_POLICY_RATIO, |_, id, value, quota| {
            quota.group(id)?.min_prb_policy_ratio = Some(ratio(id, value)?);
            Ok(())
        })
        .with(MAX_PRB_POLICY_RATIO, |_, id, value, quota| {
            quota.group(id)?.max_prb_policy_ratio = Some(ratio(id, value)?);
            Ok(())
        })
        .with(DEDICATED_PRB_POLICY_RATIO, |_, id, value, quota| {
            quota.group(id)?.dedicated_prb_policy_ratio = Some(ratio(id, value)?);
            Ok(())
        })
}

/// Executor of the slice-level PRB quota action
pub struct SliceLevelPrbQuotaExecutor {
    configurator: Arc<dyn DuConfigurator>,
    table: RanParameterTable<SliceQuota>,
}

impl SliceLevelPrbQuotaExecutor {
    pub fn new(configurator: Arc<dyn DuConfigurator>) -> Self {
        Self {
            configurator,
            table: slice_quota_table(),
        }
    }

    /// Decode the parameter tree of `message` into a scheduler configuration
    pub fn interpret(&self, message: &E2smRcControlMessageFormat1) -> ControlResult<DuMacSchedControlConfig> {
        let mut quota = SliceQuota::default();
        for item in message.ran_p_list.iter() {
            self.table.interpret(
                item.ran_parameter_id.value(),
                &item.ran_parameter_value_type,
                &mut quota,
            )?;
        }
        quota.validate()?;
        Ok(quota.config)
    }
}

#[async_trait]
impl ControlActionExecutor for SliceLevelPrbQuotaExecutor {
    fn style(&self) -> RicStyleType {
        RADIO_RESOURCE_ALLOCATION_CONTROL_STYLE
    }

    fn action_id(&self) -> i64 {
        SLICE_LEVEL_PRB_QUOTA_ACTION
    }

    fn name(&self) -> &str {
        "Slice-level PRB quota"
    }

    fn supported_parameters(&self) -> Vec<i64> {
        vec![RRM_POLICY_RATIO_LIST]
    }

    async fn execute(
        &self,
        ue_id: &Ueid,
        message: &E2smRcControlMessageFormat1,
    ) -> ControlResult<Option<E2smRcControlOutcome>> {
        let config = self.interpret(message)?;
        log::info!(
            "Applying {} RRM policy ratio group(s), requested for {:?} UE",
            config.rrm_policy_ratio_list.len(),
            ue_id.choice_type()
        );
        let applied = self.configurator.configure(config).await?;
        Ok(Some(slice_prb_quota_outcome(&applied)?))
    }
}

/// Outcome echoing the applied ratios, group by group
pub fn slice_prb_quota_outcome(config: &DuMacSchedControlConfig) -> CodecResult<E2smRcControlOutcome> {
    let mut outcome = E2smRcControlOutcomeFormat1::default();
    for group in &config.rrm_policy_ratio_list {
        let ratios = [
            (MIN_PRB_POLICY_RATIO, group.min_prb_policy_ratio),
            (MAX_PRB_POLICY_RATIO, group.max_prb_policy_ratio),
            (DEDICATED_PRB_POLICY_RATIO, group.dedicated_prb_policy_ratio),
        ];
        for (id, ratio) in ratios {
            if let Some(ratio) = ratio {
                outcome.ran_p_list.push(ControlOutcomeFormat1Item {
                    ran_parameter_id: RanParameterId::new(id)?,
                    ran_parameter_value: RanParameterValue::ValueInt(ratio),
                })?;
            }
        }
    }
    Ok(E2smRcControlOutcome::format1(outcome))
}

/// Control message requesting `config`, as built by a RIC
pub fn slice_prb_quota_message(config: &DuMacSchedControlConfig) -> CodecResult<E2smRcControlMessage> {
    let mut groups = Vec::with_capacity(config.rrm_policy_ratio_list.len());
    for group in &config.rrm_policy_ratio_list {
        let mut members = Vec::with_capacity(group.members.len());
        for member in &group.members {
            let mut s_nssai = vec![(SST, element(vec![member.s_nssai.sst]))];
            if let Some(sd) = member.s_nssai.sd {
                s_nssai.push((SD, element(sd.to_be_bytes()[1..].to_vec())));
            }
            members.push(RanParameterStructure::new([
                (PLMN_IDENTITY, element(member.plmn_id.to_vec())),
                (S_NSSAI, RanParameterValueType::structure(s_nssai)?),
            ])?);
        }

        let policy = RanParameterValueType::structure([(
            RRM_POLICY_MEMBER_LIST,
            RanParameterValueType::list(members)?,
        )])?;
        let mut items = vec![(RRM_POLICY, policy)];
        let ratios = [
            (MIN_PRB_POLICY_RATIO, group.min_prb_policy_ratio),
            (MAX_PRB_POLICY_RATIO, group.max_prb_policy_ratio),
            (DEDICATED_PRB_POLICY_RATIO, group.dedicated_prb_policy_ratio),
        ];
        items.extend(
            ratios
                .into_iter()
                .filter_map(|(id, ratio)| ratio.map(|ratio| (id, RanParameterValueType::element(ratio)))),
        );
        groups.push(RanParameterStructure::new(items)?);
    }

    let mut message = E2smRcControlMessageFormat1::default();
    message.ran_p_list.push(ControlMessageFormat1Item {
        ran_parameter_id: RanParameterId::new(RRM_POLICY_RATIO_LIST)?,
        ran_parameter_value_type: RanParameterValueType::list(groups)?,
    })?;
    Ok(E2smRcControlMessage::format1(message))
}

fn element(octets: Vec<u8>) -> RanParameterValueType {
    RanParameterValueType::element(OctetString::new(octets))
}
