//! RAN parameter values (E2SM-RC §9.3.11–9.3.15)

use super::{MAX_ITEMS_IN_LIST, MAX_PARAMETERS_IN_STRUCTURE};
use crate::{
    BitString, BoundedArray, CodecResult, ConstrainedInteger, OctetString, PrintableString, Real,
};
use serde::Serialize;

/// RAN parameter identifier, unique within a style and action
pub type RanParameterId = ConstrainedInteger<1, 4_294_967_295>;

per_choice! {
    /// Value of a single RAN parameter
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum RanParameterValue: RanParameterValueKind {
        ValueBoolean(bool) => value_boolean, set_value_boolean;
        ValueInt(i64) => value_int, set_value_int;
        ValueReal(Real) => value_real, set_value_real;
        ValueBitS(BitString) => value_bit_s, set_value_bit_s;
        ValueOctS(OctetString) => value_oct_s, set_value_oct_s;
        ValuePrintableString(PrintableString) => value_printable_string, set_value_printable_string;
    }
    extensions {}
}

per_choice! {
    /// Shape of a RAN parameter: a plain element, a structure or a list
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum RanParameterValueType: RanParameterValueTypeKind {
        ElementTrue(RanParameterElementTrue) => element_true, set_element_true;
        ElementFalse(RanParameterElementFalse) => element_false, set_element_false;
        Structure(RanParameterChoiceStructure) => choice_structure, set_choice_structure;
        List(RanParameterChoiceList) => choice_list, set_choice_list;
    }
    extensions {}
}

per_sequence! {
    /// Element that is a key of the enclosing list entry
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterElementTrue {
        pub ran_parameter_value: req RanParameterValue,
    }
    extensions {}
}

per_sequence! {
    /// Element that is not a key; the value may be absent
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterElementFalse {
        pub ran_parameter_value: opt RanParameterValue,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterChoiceStructure {
        pub ran_parameter_structure: req RanParameterStructure,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterChoiceList {
        pub ran_parameter_list: req RanParameterList,
    }
    extensions {}
}

per_sequence! {
    /// Ordered set of RAN parameters
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterStructure {
        pub sequence_of_ran_parameters:
            opt BoundedArray<RanParameterStructureItem, MAX_PARAMETERS_IN_STRUCTURE, 1>,
    }
    extensions {}
}

per_sequence! {
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterStructureItem {
        pub ran_parameter_id: req RanParameterId,
        pub ran_parameter_value_type: req RanParameterValueType,
    }
    extensions {}
}

per_sequence! {
    /// List of structures sharing one layout
    #[derive(Debug, Clone, PartialEq, Default, Serialize)]
    pub struct RanParameterList {
        pub list_of_ran_parameter: req BoundedArray<RanParameterStructure, MAX_ITEMS_IN_LIST, 1>,
    }
    extensions {}
}

impl RanParameterValueType {
    /// Non-key element carrying `value`
    pub fn element(value: impl Into<RanParameterValue>) -> Self {
        Self::ElementFalse(RanParameterElementFalse {
            ran_parameter_value: Some(value.into()),
        })
    }

    /// Key element carrying `value`
    pub fn key_element(value: impl Into<RanParameterValue>) -> Self {
        Self::ElementTrue(RanParameterElementTrue {
            ran_parameter_value: value.into(),
        })
    }

    /// Structure built from `(id, value type)` items
    ///
    /// # Errors
    ///
    /// Returns an error if an id is out of range or there are too many items.
    pub fn structure<I>(items: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = (i64, RanParameterValueType)>,
    {
        Ok(Self::Structure(RanParameterChoiceStructure {
            ran_parameter_structure: RanParameterStructure::new(items)?,
        }))
    }

    /// List built from structures
    pub fn list<I>(structures: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = RanParameterStructure>,
    {
        let list = structures.into_iter().collect::<Vec<_>>().try_into()?;
        Ok(Self::List(RanParameterChoiceList {
            ran_parameter_list: RanParameterList {
                list_of_ran_parameter: list,
            },
        }))
    }

    /// Value of an element, `None` for structures, lists and empty elements
    pub fn value(&self) -> Option<&RanParameterValue> {
        match self {
            Self::ElementTrue(element) => Some(&element.ran_parameter_value),
            Self::ElementFalse(element) => element.ran_parameter_value.as_ref(),
            _ => None,
        }
    }

    pub fn as_structure(&self) -> Option<&RanParameterStructure> {
        match self {
            Self::Structure(structure) => Some(&structure.ran_parameter_structure),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[RanParameterStructure]> {
        match self {
            Self::List(list) => Some(list.ran_parameter_list.list_of_ran_parameter.as_slice()),
            _ => None,
        }
    }
}

impl RanParameterStructure {
    /// Build from `(id, value type)` items; no items leaves the sequence absent
    pub fn new<I>(items: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = (i64, RanParameterValueType)>,
    {
        let items = items
            .into_iter()
            .map(|(id, value_type)| RanParameterStructureItem::new(id, value_type))
            .collect::<CodecResult<Vec<_>>>()?;
        let sequence_of_ran_parameters = if items.is_empty() {
            None
        } else {
            Some(items.try_into()?)
        };
        Ok(Self { sequence_of_ran_parameters })
    }

    pub fn items(&self) -> &[RanParameterStructureItem] {
        self.sequence_of_ran_parameters
            .as_ref()
            .map(|items| items.as_slice())
            .unwrap_or_default()
    }

    /// First item with the given id
    pub fn get(&self, id: i64) -> Option<&RanParameterValueType> {
        self.items()
            .iter()
            .find(|item| item.ran_parameter_id.value() == id)
            .map(|item| &item.ran_parameter_value_type)
    }
}

impl RanParameterStructureItem {
    pub fn new(id: i64, value_type: RanParameterValueType) -> CodecResult<Self> {
        Ok(Self {
            ran_parameter_id: RanParameterId::new(id)?,
            ran_parameter_value_type: value_type,
        })
    }
}
