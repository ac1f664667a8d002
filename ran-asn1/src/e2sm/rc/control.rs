//! RIC Control header, message and outcome (E2SM-RC §9.2.1.6–9.2.1.8)
//!
//! A RIC Control request carries one [`E2smRcControlHeader`] and one
//! [`E2smRcControlMessage`] as opaque octet strings of the E2AP PDU. The
//! header names the target UE and the (style, action) pair, the message
//! lists the RAN parameters the action takes. The E2 node may answer with
//! an [`E2smRcControlOutcome`] inside the acknowledgement.
//!
//! # Usage Example
//!
//! ```rust
//! use ran_asn1::e2sm::rc::*;
//! use ran_asn1::per::{decode, encode};
//!
//! let mut header = E2smRcControlHeader::default();
//! let format1 = header.ric_control_header_formats.set_control_header_format1();
//! format1.ric_style_type = 2;
//! format1.ric_control_action_id = RicControlActionId::new(6)?;
//!
//! let bytes = encode(&header)?;
//! assert_eq!(decode::<E2smRcControlHeader>(&bytes)?, header);
//! # Ok::<(), ran_asn1::CodecError>(())
//! ```

use super::{
    RanParameterId, RanParameterValue, RanParameterValueType, MAX_ASSOCIATED_RAN_PARAMETERS,
    MAX_MULTIPLE_CONTROL_ACTIONS, MAX_RAN_OUTCOME_PARAMETERS, MAX_RIC_STYLES,
};
use crate::e2sm::common::Ueid;
use crate::{BoundedArray, ConstrainedInteger};
use serde::Serialize;

/// RIC style type; unconstrained INTEGER
pub type RicStyleType = i64;

/// RIC control action id within a style
pub type RicControlActionId = ConstrainedInteger<1, 65535, true>;

per_enumerated! {
    /// Whether the E2 node should execute the control action
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum RicControlDecision {
        Accept,
        Reject,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlHeader {
        pub ric_control_header_formats: req ControlHeaderFormats,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum ControlHeaderFormats: ControlHeaderFormat {
        ControlHeaderFormat1(E2smRcControlHeaderFormat1) => control_header_format1, set_control_header_format1;
    }
    extensions {
        ControlHeaderFormat2(E2smRcControlHeaderFormat2) => control_header_format2, set_control_header_format2;
    }
}

per_sequence! {
    /// Control of one UE by (style, action)
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlHeaderFormat1 {
        pub ue_id: req Ueid,
        pub ric_style_type: req RicStyleType,
        pub ric_control_action_id: req RicControlActionId,
    }
    extensions {
        pub ric_control_decision: RicControlDecision,
    }
}

per_sequence! {
    /// Multiple actions, styles and actions listed in the message
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlHeaderFormat2 {
        pub ue_id: opt Ueid,
        pub ric_control_decision: opt RicControlDecision,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlMessage {
        pub ric_control_message_formats: req ControlMessageFormats,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum ControlMessageFormats: ControlMessageFormat {
        ControlMessageFormat1(E2smRcControlMessageFormat1) => control_message_format1, set_control_message_format1;
    }
    extensions {
        ControlMessageFormat2(E2smRcControlMessageFormat2) => control_message_format2, set_control_message_format2;
    }
}

per_sequence! {
    /// RAN parameters of one control action
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlMessageFormat1 {
        pub ran_p_list: req BoundedArray<ControlMessageFormat1Item, MAX_ASSOCIATED_RAN_PARAMETERS>,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct ControlMessageFormat1Item {
        pub ran_parameter_id: req RanParameterId,
        pub ran_parameter_value_type: req RanParameterValueType,
    }
    extensions {}
}

per_sequence! {
    /// RAN parameters of several actions in several styles
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlMessageFormat2 {
        pub ric_control_style_list: req BoundedArray<ControlMessageFormat2Item, MAX_RIC_STYLES, 1>,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct ControlMessageFormat2Item {
        pub indicated_control_style_type: req RicStyleType,
        pub ric_control_action_list:
            req BoundedArray<ControlMessageFormat2ControlActionItem, MAX_MULTIPLE_CONTROL_ACTIONS, 1>,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct ControlMessageFormat2ControlActionItem {
        pub ric_control_action_id: req RicControlActionId,
        pub ran_p_list: req E2smRcControlMessageFormat1,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlOutcome {
        pub ric_control_outcome_formats: req ControlOutcomeFormats,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum ControlOutcomeFormats: ControlOutcomeFormat {
        ControlOutcomeFormat1(E2smRcControlOutcomeFormat1) => control_outcome_format1, set_control_outcome_format1;
    }
    extensions {}
}

per_sequence! {
    /// RAN parameter values the E2 node applied
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct E2smRcControlOutcomeFormat1 {
        pub ran_p_list: req BoundedArray<ControlOutcomeFormat1Item, MAX_RAN_OUTCOME_PARAMETERS>,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct ControlOutcomeFormat1Item {
        pub ran_parameter_id: req RanParameterId,
        pub ran_parameter_value: req RanParameterValue,
    }
    extensions {}
}

impl E2smRcControlHeader {
    /// Format 1 header for one UE
    pub fn format1(ue_id: Ueid, ric_style_type: RicStyleType, ric_control_action_id: RicControlActionId) -> Self {
        Self {
            ric_control_header_formats: E2smRcControlHeaderFormat1 {
                ue_id,
                ric_style_type,
                ric_control_action_id,
                ric_control_decision: None,
            }
            .into(),
        }
    }
}

impl E2smRcControlMessage {
    pub fn format1(message: E2smRcControlMessageFormat1) -> Self {
        Self {
            ric_control_message_formats: message.into(),
        }
    }
}

impl E2smRcControlOutcome {
    pub fn format1(outcome: E2smRcControlOutcomeFormat1) -> Self {
        Self {
            ric_control_outcome_formats: outcome.into(),
        }
    }
}

impl E2smRcControlMessageFormat1 {
    /// First top-level parameter with the given id
    pub fn get(&self, id: i64) -> Option<&RanParameterValueType> {
        self.ran_p_list
            .iter()
            .find(|item| item.ran_parameter_id.value() == id)
            .map(|item| &item.ran_parameter_value_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2sm::common::{Guami, UeidType};
    use crate::e2sm::rc::RanParameterStructure;
    use crate::per::{decode, encode};
    use crate::{CodecError, FixedOctetString, OctetString, ToJson};

    const HEADER_HEX: &str = "00000000000f110000000102000005";

    #[test]
    fn test_control_header_vector() {
        let bytes = hex::decode(HEADER_HEX).unwrap();
        let header: E2smRcControlHeader = decode(&bytes).unwrap();

        let format1 = header.ric_control_header_formats.control_header_format1();
        assert_eq!(format1.ue_id.choice_type(), UeidType::GnbUeid);
        let gnb = format1.ue_id.gnb_ueid();
        assert_eq!(gnb.amf_ue_ngap_id.value(), 0);
        assert_eq!(gnb.guami.plmn_identity.as_bytes(), &[0x00, 0x0f, 0x11]);
        assert_eq!(gnb.guami.amf_region_id.to_number().unwrap(), 0);
        assert!(gnb.ran_ueid.is_none());
        assert_eq!(format1.ric_style_type, 2);
        assert_eq!(format1.ric_control_action_id.value(), 6);
        assert_eq!(format1.ric_control_decision, None);

        assert_eq!(hex::encode(encode(&header).unwrap()), HEADER_HEX);
    }

    #[test]
    fn test_control_header_decision_addition() {
        let bytes = hex::decode(HEADER_HEX).unwrap();
        let mut header: E2smRcControlHeader = decode(&bytes).unwrap();
        if let ControlHeaderFormats::ControlHeaderFormat1(format1) =
            &mut header.ric_control_header_formats
        {
            format1.ric_control_decision = Some(RicControlDecision::Reject);
        }
        let extended = encode(&header).unwrap();
        assert_ne!(&extended[..], &bytes[..]);
        let decoded: E2smRcControlHeader = decode(&extended).unwrap();
        assert_eq!(
            decoded.ric_control_header_formats.control_header_format1().ric_control_decision,
            Some(RicControlDecision::Reject)
        );
    }

    #[test]
    fn test_control_header_format2() {
        let header = E2smRcControlHeader {
            ric_control_header_formats: ControlHeaderFormats::ControlHeaderFormat2(
                E2smRcControlHeaderFormat2 {
                    ue_id: None,
                    ric_control_decision: Some(RicControlDecision::Accept),
                },
            ),
        };
        let bytes = encode(&header).unwrap();
        let decoded: E2smRcControlHeader = decode(&bytes).unwrap();
        assert_eq!(
            decoded.ric_control_header_formats.choice_type(),
            ControlHeaderFormat::ControlHeaderFormat2
        );
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_truncated_header_is_error() {
        let bytes = hex::decode(HEADER_HEX).unwrap();
        for len in 0..bytes.len() {
            assert!(
                decode::<E2smRcControlHeader>(&bytes[..len]).is_err(),
                "prefix of {} octets decoded",
                len
            );
        }
    }

    fn element(value: i64) -> RanParameterValueType {
        RanParameterValueType::element(value)
    }

    fn slice_member(sst: u8, sd: [u8; 3]) -> RanParameterStructure {
        let snssai = RanParameterValueType::structure([
            (9, RanParameterValueType::element(OctetString::new(vec![sst]))),
            (10, RanParameterValueType::element(OctetString::new(sd.to_vec()))),
        ])
        .unwrap();
        RanParameterStructure::new([
            (7, RanParameterValueType::element(OctetString::new(vec![0x00, 0xF1, 0x10]))),
            (8, snssai),
        ])
        .unwrap()
    }

    /// `slice_prb_quota(10, 100, 5)`
    const SLICE_PRB_QUOTA_HEX: &str = concat!(
        "0000010000600000400003000244000000046000004000010006",
        "2a000300f110000744000100082a00010100092a0003000001",
        "000a2880010a000b28800164000c28800105",
    );

    /// Slice-level PRB quota: one policy with one member and min/max/dedicated ratios
    fn slice_prb_quota(min: i64, max: i64, dedicated: i64) -> E2smRcControlMessage {
        let members = RanParameterValueType::list([slice_member(1, [0, 0, 1])]).unwrap();
        let policy = RanParameterValueType::structure([(5, members)]).unwrap();
        let ratio_group = RanParameterStructure::new([
            (3, policy),
            (11, element(min)),
            (12, element(max)),
            (13, element(dedicated)),
        ])
        .unwrap();
        let mut format1 = E2smRcControlMessageFormat1::default();
        format1
            .ran_p_list
            .push(ControlMessageFormat1Item {
                ran_parameter_id: RanParameterId::new(1).unwrap(),
                ran_parameter_value_type: RanParameterValueType::list([ratio_group]).unwrap(),
            })
            .unwrap();
        E2smRcControlMessage {
            ric_control_message_formats: format1.into(),
        }
    }

    #[test]
    fn test_slice_prb_quota_message() {
        let message = slice_prb_quota(10, 100, 5);
        let bytes = encode(&message).unwrap();
        let decoded: E2smRcControlMessage = decode(&bytes).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(encode(&decoded).unwrap(), bytes);

        let format1 = decoded.ric_control_message_formats.control_message_format1();
        let groups = format1.get(1).and_then(RanParameterValueType::as_list).unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        let ids: Vec<i64> = group.items().iter().map(|i| i.ran_parameter_id.value()).collect();
        assert_eq!(ids, vec![3, 11, 12, 13]);
        assert_eq!(
            group.get(12).and_then(RanParameterValueType::value),
            Some(&RanParameterValue::ValueInt(100))
        );

        let members = group
            .get(3)
            .and_then(RanParameterValueType::as_structure)
            .and_then(|policy| policy.get(5))
            .and_then(RanParameterValueType::as_list)
            .unwrap();
        let ids: Vec<i64> = members[0].items().iter().map(|i| i.ran_parameter_id.value()).collect();
        assert_eq!(ids, vec![7, 8]);
        assert_eq!(
            members[0].get(7).and_then(RanParameterValueType::value),
            Some(&RanParameterValue::ValueOctS(OctetString::new(vec![0x00, 0xF1, 0x10])))
        );
    }

    #[test]
    fn test_slice_prb_quota_vector() {
        let message = slice_prb_quota(10, 100, 5);
        assert_eq!(hex::encode(encode(&message).unwrap()), SLICE_PRB_QUOTA_HEX);
        let decoded: E2smRcControlMessage = decode(&hex::decode(SLICE_PRB_QUOTA_HEX).unwrap()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_message_format2() {
        let inner = slice_prb_quota(0, 50, 0);
        let ran_p_list = inner.ric_control_message_formats.control_message_format1().clone();
        let mut actions = BoundedArray::new();
        actions
            .push(ControlMessageFormat2ControlActionItem {
                ric_control_action_id: RicControlActionId::new(6).unwrap(),
                ran_p_list,
            })
            .unwrap();
        let mut styles = BoundedArray::new();
        styles
            .push(ControlMessageFormat2Item {
                indicated_control_style_type: 2,
                ric_control_action_list: actions,
            })
            .unwrap();
        let message = E2smRcControlMessage {
            ric_control_message_formats: E2smRcControlMessageFormat2 {
                ric_control_style_list: styles,
            }
            .into(),
        };
        let bytes = encode(&message).unwrap();
        assert_eq!(decode::<E2smRcControlMessage>(&bytes).unwrap(), message);
    }

    #[test]
    fn test_outcome_round_trip() {
        let mut format1 = E2smRcControlOutcomeFormat1::default();
        for (id, value) in [(11, 10), (12, 100), (13, 5)] {
            format1
                .ran_p_list
                .push(ControlOutcomeFormat1Item {
                    ran_parameter_id: RanParameterId::new(id).unwrap(),
                    ran_parameter_value: RanParameterValue::ValueInt(value),
                })
                .unwrap();
        }
        let outcome = E2smRcControlOutcome {
            ric_control_outcome_formats: format1.into(),
        };
        let bytes = encode(&outcome).unwrap();
        assert_eq!(decode::<E2smRcControlOutcome>(&bytes).unwrap(), outcome);
    }

    #[test]
    fn test_outcome_list_bound() {
        let mut format1 = E2smRcControlOutcomeFormat1::default();
        for _ in 0..MAX_RAN_OUTCOME_PARAMETERS {
            format1.ran_p_list.push(ControlOutcomeFormat1Item::default()).unwrap();
        }
        assert!(matches!(
            format1.ran_p_list.push(ControlOutcomeFormat1Item::default()),
            Err(CodecError::SizeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_header_to_json() {
        let mut header = E2smRcControlHeader::default();
        let format1 = header.ric_control_header_formats.set_control_header_format1();
        format1.ue_id.set_gnb_ueid().guami = Guami {
            plmn_identity: FixedOctetString::new([0x00, 0x0f, 0x11]),
            ..Default::default()
        };
        format1.ric_style_type = 2;
        let json = header.to_json_string().unwrap();
        assert!(json.contains("\"plmn_identity\": \"000f11\""));
        assert!(json.contains("\"amf_set_id\": \"0000000000\""));
        assert!(json.contains("\"ric_style_type\": 2"));
    }
}
