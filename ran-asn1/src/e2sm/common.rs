//! E2SM common information elements
//!
//! UE identifiers and the global node identifiers they reference, shared by
//! every E2 service model (O-RAN.WG3.E2SM-v02.03 §6.2.2, E2SM-COMMON-IEs).
//!
//! # Identifier widths
//!
//! | type                    | ASN.1                         |
//! |-------------------------|-------------------------------|
//! | `AMF-UE-NGAP-ID`        | INTEGER (0..2^40-1)           |
//! | `GNB-CU-UE-F1AP-ID`     | INTEGER (0..2^32-1)           |
//! | `GNB-CU-CP-UE-E1AP-ID`  | INTEGER (0..2^32-1)           |
//! | `NG-RANnodeUEXnAPID`    | INTEGER (0..2^32-1)           |
//! | `NGENB-CU-UE-W1AP-ID`   | INTEGER (0..2^32-1)           |
//! | `ENB-UE-X2AP-ID`        | INTEGER (0..4095)             |
//! | `MME-UE-S1AP-ID`        | INTEGER (0..2^32-1)           |
//! | `RANUEID`               | OCTET STRING (SIZE(8))        |
//! | `PLMNIdentity`          | OCTET STRING (SIZE(3))        |

use crate::{BoundedArray, BoundedBitString, ConstrainedInteger, FixedBitString, FixedOctetString};
use serde::Serialize;

pub type AmfUeNgapId = ConstrainedInteger<0, 1_099_511_627_775>;
pub type GnbCuUeF1apId = ConstrainedInteger<0, 4_294_967_295>;
pub type GnbCuCpUeE1apId = ConstrainedInteger<0, 4_294_967_295>;
pub type NgRanNodeUeXnapId = ConstrainedInteger<0, 4_294_967_295>;
pub type NgEnbCuUeW1apId = ConstrainedInteger<0, 4_294_967_295>;
pub type EnbUeX2apId = ConstrainedInteger<0, 4095>;
pub type EnbUeX2apIdExtension = ConstrainedInteger<0, 4095, true>;
pub type MmeUeS1apId = ConstrainedInteger<0, 4_294_967_295>;
pub type RanUeId = FixedOctetString<8>;

pub type PlmnIdentity = FixedOctetString<3>;
pub type AmfRegionId = FixedBitString<8>;
pub type AmfSetId = FixedBitString<10>;
pub type AmfPointer = FixedBitString<6>;
pub type MmeGroupId = FixedOctetString<2>;
pub type MmeCode = FixedOctetString<1>;

/// maxF1APid
pub const MAX_F1AP_ID: usize = 4;
/// maxE1APid
pub const MAX_E1AP_ID: usize = 65535;

per_choice! {
    /// UE identifier, one alternative per RAN node type
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Ueid: UeidType {
        GnbUeid(UeidGnb) => gnb_ueid, set_gnb_ueid;
        GnbDuUeid(UeidGnbDu) => gnb_du_ueid, set_gnb_du_ueid;
        GnbCuUpUeid(UeidGnbCuUp) => gnb_cu_up_ueid, set_gnb_cu_up_ueid;
        NgEnbUeid(UeidNgEnb) => ng_enb_ueid, set_ng_enb_ueid;
        NgEnbDuUeid(UeidNgEnbDu) => ng_enb_du_ueid, set_ng_enb_du_ueid;
        EnGnbUeid(UeidEnGnb) => en_gnb_ueid, set_en_gnb_ueid;
        EnbUeid(UeidEnb) => enb_ueid, set_enb_ueid;
    }
    extensions {}
}

per_sequence! {
    /// UE served by a gNB or gNB-CU
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidGnb {
        pub amf_ue_ngap_id: req AmfUeNgapId,
        pub guami: req Guami,
        pub gnb_cu_ue_f1ap_id_list: opt UeidGnbCuF1apIdList,
        pub gnb_cu_cp_ue_e1ap_id_list: opt UeidGnbCuCpE1apIdList,
        pub ran_ueid: opt RanUeId,
        pub m_ng_ran_ue_xnap_id: opt NgRanNodeUeXnapId,
        pub global_gnb_id: opt GlobalGnbId,
    }
    extensions {
        pub global_ng_ran_node_id: GlobalNgRanNodeId,
    }
}

pub type UeidGnbCuF1apIdList = BoundedArray<UeidGnbCuF1apIdItem, MAX_F1AP_ID, 1>;
pub type UeidGnbCuCpE1apIdList = BoundedArray<UeidGnbCuCpE1apIdItem, MAX_E1AP_ID, 1>;

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidGnbCuF1apIdItem {
        pub gnb_cu_ue_f1ap_id: req GnbCuUeF1apId,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidGnbCuCpE1apIdItem {
        pub gnb_cu_cp_ue_e1ap_id: req GnbCuCpUeE1apId,
    }
    extensions {}
}

per_sequence! {
    /// UE at a gNB-DU
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidGnbDu {
        pub gnb_cu_ue_f1ap_id: req GnbCuUeF1apId,
        pub ran_ueid: opt RanUeId,
    }
    extensions {}
}

per_sequence! {
    /// UE at a gNB-CU-UP
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidGnbCuUp {
        pub gnb_cu_cp_ue_e1ap_id: req GnbCuCpUeE1apId,
        pub ran_ueid: opt RanUeId,
    }
    extensions {}
}

per_sequence! {
    /// UE served by an ng-eNB or ng-eNB-CU
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidNgEnb {
        pub amf_ue_ngap_id: req AmfUeNgapId,
        pub guami: req Guami,
        pub ng_enb_cu_ue_w1ap_id: opt NgEnbCuUeW1apId,
        pub m_ng_ran_ue_xnap_id: opt NgRanNodeUeXnapId,
        pub global_ng_enb_id: opt GlobalNgEnbId,
    }
    extensions {
        pub global_ng_ran_node_id: GlobalNgRanNodeId,
    }
}

per_sequence! {
    /// UE at an ng-eNB-DU
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidNgEnbDu {
        pub ng_enb_cu_ue_w1ap_id: req NgEnbCuUeW1apId,
    }
    extensions {}
}

per_sequence! {
    /// UE served by an en-gNB (EN-DC secondary node)
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidEnGnb {
        pub m_enb_ue_x2ap_id: req EnbUeX2apId,
        pub m_enb_ue_x2ap_id_extension: opt EnbUeX2apIdExtension,
        pub global_enb_id: req GlobalEnbId,
        pub gnb_cu_ue_f1ap_id: opt GnbCuUeF1apId,
        pub gnb_cu_cp_ue_e1ap_id_list: opt UeidGnbCuCpE1apIdList,
        pub ran_ueid: opt RanUeId,
    }
    extensions {}
}

per_sequence! {
    /// UE served by an eNB
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct UeidEnb {
        pub mme_ue_s1ap_id: req MmeUeS1apId,
        pub gummei: req Gummei,
        pub m_enb_ue_x2ap_id: opt EnbUeX2apId,
        pub m_enb_ue_x2ap_id_extension: opt EnbUeX2apIdExtension,
        pub global_enb_id: opt GlobalEnbId,
    }
    extensions {}
}

per_sequence! {
    /// Globally unique AMF identifier
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct Guami {
        pub plmn_identity: req PlmnIdentity,
        pub amf_region_id: req AmfRegionId,
        pub amf_set_id: req AmfSetId,
        pub amf_pointer: req AmfPointer,
    }
    extensions {}
}

per_sequence! {
    /// Globally unique MME identifier
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct Gummei {
        pub plmn_identity: req PlmnIdentity,
        pub mme_group_id: req MmeGroupId,
        pub mme_code: req MmeCode,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct GlobalGnbId {
        pub plmn_identity: req PlmnIdentity,
        pub gnb_id: req GnbId,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum GnbId: GnbIdType {
        GnbId(BoundedBitString<22, 32>) => gnb_id, set_gnb_id;
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct GlobalNgEnbId {
        pub plmn_identity: req PlmnIdentity,
        pub ng_enb_id: req NgEnbId,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum NgEnbId: NgEnbIdType {
        MacroNgEnbId(FixedBitString<20>) => macro_ng_enb_id, set_macro_ng_enb_id;
        ShortMacroNgEnbId(FixedBitString<18>) => short_macro_ng_enb_id, set_short_macro_ng_enb_id;
        LongMacroNgEnbId(FixedBitString<21>) => long_macro_ng_enb_id, set_long_macro_ng_enb_id;
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct GlobalEnbId {
        pub plmn_identity: req PlmnIdentity,
        pub enb_id: req EnbId,
    }
    extensions {}
}

per_choice! {
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum EnbId: EnbIdType {
        MacroEnbId(FixedBitString<20>) => macro_enb_id, set_macro_enb_id;
        HomeEnbId(FixedBitString<28>) => home_enb_id, set_home_enb_id;
    }
    extensions {
        ShortMacroEnbId(FixedBitString<18>) => short_macro_enb_id, set_short_macro_enb_id;
        LongMacroEnbId(FixedBitString<21>) => long_macro_enb_id, set_long_macro_enb_id;
    }
}

per_choice! {
    /// Global identifier of an NG-RAN node
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum GlobalNgRanNodeId: GlobalNgRanNodeIdType {
        Gnb(GlobalGnbId) => gnb, set_gnb;
        NgEnb(GlobalNgEnbId) => ng_enb, set_ng_enb;
    }
    extensions {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::{decode, encode};
    use crate::{CodecError, UnknownAlternative};

    fn plmn() -> PlmnIdentity {
        FixedOctetString::new([0x00, 0xF1, 0x10])
    }

    fn global_gnb_id(id: u64) -> GlobalGnbId {
        GlobalGnbId {
            plmn_identity: plmn(),
            gnb_id: GnbId::GnbId(BoundedBitString::from_number(id, 22).unwrap()),
        }
    }

    #[test]
    fn test_global_gnb_id_layout() {
        let bytes = encode(&global_gnb_id(1)).unwrap();
        assert_eq!(&bytes[..], &[0x00, 0x00, 0xF1, 0x10, 0x00, 0x00, 0x00, 0x04]);
        assert_eq!(decode::<GlobalGnbId>(&bytes).unwrap(), global_gnb_id(1));
    }

    #[test]
    fn test_gnb_id_size_bounds() {
        let mut bits = BoundedBitString::<22, 32>::default();
        assert_eq!(bits.as_bit_string().num_bits(), 22);
        bits = BoundedBitString::from_number(0xFFFF_FFFF, 32).unwrap();
        let id = GnbId::GnbId(bits);
        assert_eq!(decode::<GnbId>(&encode(&id).unwrap()).unwrap(), id);
        assert!(BoundedBitString::<22, 32>::from_number(0, 21).is_err());
    }

    #[test]
    fn test_enb_id_known_extension_alternative() {
        let id = EnbId::LongMacroEnbId(FixedBitString::from_number(0x1F_FFFF).unwrap());
        let bytes = encode(&id).unwrap();
        // ext bit and normally small index 1, then a 3-octet open type
        assert_eq!(&bytes[..], &[0x81, 0x03, 0xFF, 0xFF, 0xF8]);
        let decoded = decode::<EnbId>(&bytes).unwrap();
        assert_eq!(decoded.choice_type(), EnbIdType::LongMacroEnbId);
        assert_eq!(decoded, id);
    }

    #[test]
    fn test_enb_id_unknown_extension_relayed() {
        // index 5 is beyond the known extension alternatives
        let bytes = [0x85, 0x01, 0xAB];
        let id = decode::<EnbId>(&bytes).unwrap();
        assert_eq!(id, EnbId::Unknown(UnknownAlternative::new(5, vec![0xAB])));
        assert_eq!(&encode(&id).unwrap()[..], &bytes);
    }

    #[test]
    fn test_ueid_gnb_with_extension_addition() {
        let mut ueid = Ueid::default();
        let gnb = ueid.set_gnb_ueid();
        gnb.amf_ue_ngap_id = AmfUeNgapId::new(0xAB_CDEF_0123).unwrap();
        gnb.guami.plmn_identity = plmn();
        gnb.guami.amf_region_id = FixedBitString::from_number(0x80).unwrap();
        gnb.ran_ueid = Some(FixedOctetString::from_number(7).unwrap());
        let mut f1ap = UeidGnbCuF1apIdList::new();
        f1ap.push(UeidGnbCuF1apIdItem {
            gnb_cu_ue_f1ap_id: GnbCuUeF1apId::new(42).unwrap(),
        })
        .unwrap();
        gnb.gnb_cu_ue_f1ap_id_list = Some(f1ap);
        gnb.global_ng_ran_node_id = Some(GlobalNgRanNodeId::Gnb(global_gnb_id(3)));

        let bytes = encode(&ueid).unwrap();
        let decoded = decode::<Ueid>(&bytes).unwrap();
        assert_eq!(decoded, ueid);
        assert_eq!(decoded.gnb_ueid().gnb_cu_ue_f1ap_id_list.as_ref().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_ueid_enb_round_trip() {
        let ueid = Ueid::EnbUeid(UeidEnb {
            mme_ue_s1ap_id: MmeUeS1apId::new(4_000_000_000).unwrap(),
            gummei: Gummei {
                plmn_identity: plmn(),
                mme_group_id: FixedOctetString::new([0x80, 0x01]),
                mme_code: FixedOctetString::new([0x02]),
            },
            m_enb_ue_x2ap_id_extension: Some(EnbUeX2apIdExtension::new(5000).unwrap()),
            global_enb_id: Some(GlobalEnbId {
                plmn_identity: plmn(),
                enb_id: EnbId::HomeEnbId(FixedBitString::from_number(0xABC_DEF0).unwrap()),
            }),
            ..Default::default()
        });
        let bytes = encode(&ueid).unwrap();
        assert_eq!(decode::<Ueid>(&bytes).unwrap(), ueid);
    }

    #[test]
    fn test_f1ap_list_bound() {
        let mut list = UeidGnbCuF1apIdList::new();
        for id in 0..4 {
            list.push(UeidGnbCuF1apIdItem {
                gnb_cu_ue_f1ap_id: GnbCuUeF1apId::new(id).unwrap(),
            })
            .unwrap();
        }
        assert!(list.push(UeidGnbCuF1apIdItem::default()).is_err());
        let bytes = encode(&list).unwrap();
        // 2-bit length offset 3
        assert_eq!(bytes[0] >> 6, 0b11);
        assert_eq!(decode::<UeidGnbCuF1apIdList>(&bytes).unwrap(), list);
        // claims four items, carries none
        assert!(matches!(
            decode::<UeidGnbCuF1apIdList>(&[0xC0]),
            Err(CodecError::BufferOverflow { .. })
        ));
    }
}
