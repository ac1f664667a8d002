//! RAN parameter interpretation
//!
//! A control action declares the RAN parameters it understands in a
//! [`RanParameterTable`]: one interpreter per `ran_param_id`, each folding
//! its value into an action-specific accumulator `C`. Structures and lists
//! are walked by the interpreters themselves through
//! [`RanParameterTable::interpret_structure`], so nested ids resolve
//! against the same table.
//!
//! An id missing from the table, or a value of the wrong shape, is a policy
//! rejection of the request. Decoding already succeeded at that point.
//!
//! # Usage Example
//! ```rust
//! use ran_e2::parameter::{expect_int, RanParameterTable};
//! use ran_asn1::e2sm::rc::RanParameterValueType;
//!
//! #[derive(Default)]
//! struct Limits { max: Option<i64> }
//!
//! let table = RanParameterTable::<Limits>::new()
//!     .with(12, |_, id, value, limits| {
//!         limits.max = Some(expect_int(id, value)?);
//!         Ok(())
//!     });
//!
//! let mut limits = Limits::default();
//! table.interpret(12, &RanParameterValueType::element(80i64), &mut limits)?;
//! assert_eq!(limits.max, Some(80));
//! assert!(table.interpret(13, &RanParameterValueType::element(1i64), &mut limits).is_err());
//! # Ok::<(), ran_e2::ControlError>(())
//! ```

use crate::error::{ControlError, ControlResult};
use ran_asn1::e2sm::rc::{RanParameterStructure, RanParameterValue, RanParameterValueType};
use std::collections::BTreeMap;

/// Interpreter of one RAN parameter
///
/// Receives the table (to descend into nested parameters), the parameter
/// id, its value and the accumulator.
pub type ParameterInterpreter<C> =
    fn(&RanParameterTable<C>, i64, &RanParameterValueType, &mut C) -> ControlResult<()>;

/// Table of RAN parameter interpreters for one control action
pub struct RanParameterTable<C> {
    interpreters: BTreeMap<i64, ParameterInterpreter<C>>,
}

impl<C> RanParameterTable<C> {
    pub fn new() -> Self {
        Self {
            interpreters: BTreeMap::new(),
        }
    }

    /// Add an interpreter, replacing any previous one for `id`
    pub fn with(mut self, id: i64, interpreter: ParameterInterpreter<C>) -> Self {
        self.interpreters.insert(id, interpreter);
        self
    }

    /// Supported ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        self.interpreters.keys().copied().collect()
    }

    pub fn supports(&self, id: i64) -> bool {
        self.interpreters.contains_key(&id)
    }

    /// Interpret one parameter
    ///
    /// # Errors
    ///
    /// Returns `ControlError::UnsupportedParameter` for an unknown id, or
    /// whatever the interpreter rejects.
    pub fn interpret(&self, id: i64, value: &RanParameterValueType, context: &mut C) -> ControlResult<()> {
        let interpreter = self
            .interpreters
            .get(&id)
            .ok_or(ControlError::UnsupportedParameter { id })?;
        log::debug!("Interpreting RAN parameter {} ({:?})", id, value.choice_type());
        interpreter(self, id, value, context)
    }

    /// Interpret every item of a structure in order
    pub fn interpret_structure(&self, structure: &RanParameterStructure, context: &mut C) -> ControlResult<()> {
        structure.items().iter().try_for_each(|item| {
            self.interpret(
                item.ran_parameter_id.value(),
                &item.ran_parameter_value_type,
                context,
            )
        })
    }
}

impl<C> Default for RanParameterTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of an element parameter
pub fn expect_value(id: i64, value: &RanParameterValueType) -> ControlResult<&RanParameterValue> {
    match value {
        RanParameterValueType::ElementTrue(_) | RanParameterValueType::ElementFalse(_) => value
            .value()
            .ok_or_else(|| ControlError::invalid(id, "element carries no value")),
        other => Err(ControlError::invalid(
            id,
            format!("expected an element, got {:?}", other.choice_type()),
        )),
    }
}

/// Integer value of an element parameter
pub fn expect_int(id: i64, value: &RanParameterValueType) -> ControlResult<i64> {
    match expect_value(id, value)? {
        RanParameterValue::ValueInt(v) => Ok(*v),
        other => Err(ControlError::invalid(
            id,
            format!("expected an integer, got {:?}", other.choice_type()),
        )),
    }
}

/// Octet string value of an element parameter
pub fn expect_octets(id: i64, value: &RanParameterValueType) -> ControlResult<&[u8]> {
    match expect_value(id, value)? {
        RanParameterValue::ValueOctS(octets) => Ok(octets.as_bytes()),
        other => Err(ControlError::invalid(
            id,
            format!("expected an octet string, got {:?}", other.choice_type()),
        )),
    }
}

pub fn expect_structure(id: i64, value: &RanParameterValueType) -> ControlResult<&RanParameterStructure> {
    value
        .as_structure()
        .ok_or_else(|| ControlError::invalid(id, format!("expected a structure, got {:?}", value.choice_type())))
}

pub fn expect_list(id: i64, value: &RanParameterValueType) -> ControlResult<&[RanParameterStructure]> {
    value
        .as_list()
        .ok_or_else(|| ControlError::invalid(id, format!("expected a list, got {:?}", value.choice_type())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ran_asn1::OctetString;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Default)]
    struct Sum {
        total: i64,
        visited: Vec<i64>,
    }

    fn table() -> RanParameterTable<Sum> {
        RanParameterTable::<Sum>::new()
            .with(1, |table, id, value, sum| {
                sum.visited.push(id);
                table.interpret_structure(expect_structure(id, value)?, sum)
            })
            .with(2, |_, id, value, sum| {
                sum.visited.push(id);
                sum.total += expect_int(id, value)?;
                Ok(())
            })
    }

    #[test]
    fn test_nested_interpretation() {
        let value = RanParameterValueType::structure([
            (2, RanParameterValueType::element(5i64)),
            (2, RanParameterValueType::key_element(7i64)),
        ])
        .unwrap();
        let mut sum = Sum::default();
        assert_ok!(table().interpret(1, &value, &mut sum));
        assert_eq!(sum.total, 12);
        assert_eq!(sum.visited, vec![1, 2, 2]);
        assert_eq!(table().ids(), vec![1, 2]);
    }

    #[test]
    fn test_unknown_nested_id() {
        let value = RanParameterValueType::structure([(3, RanParameterValueType::element(5i64))]).unwrap();
        let mut sum = Sum::default();
        let err = assert_err!(table().interpret(1, &value, &mut sum));
        assert_eq!(err, ControlError::UnsupportedParameter { id: 3 });
    }

    #[test]
    fn test_wrong_shape() {
        let mut sum = Sum::default();
        let err = assert_err!(table().interpret(1, &RanParameterValueType::element(5i64), &mut sum));
        assert!(matches!(err, ControlError::InvalidParameter { id: 1, .. }));

        let octets = RanParameterValueType::element(OctetString::new(vec![1]));
        let err = assert_err!(table().interpret(2, &octets, &mut sum));
        assert!(matches!(err, ControlError::InvalidParameter { id: 2, .. }));
        assert_eq!(assert_ok!(expect_octets(2, &octets)), &[1]);
    }

    #[test]
    fn test_empty_element() {
        let empty = RanParameterValueType::ElementFalse(Default::default());
        assert!(matches!(
            expect_value(4, &empty),
            Err(ControlError::InvalidParameter { id: 4, .. })
        ));
        assert!(expect_list(4, &empty).is_err());
    }
}
