//! CHOICE and ENUMERATED indices (X.691 §14, §23)

use crate::per::{PerDecoder, PerEncoder};
use ran_core::{CodecError, CodecResult};

/// Decoded CHOICE or ENUMERATED index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceIndex {
    /// Index into the root alternatives
    Root(usize),
    /// Index into the extension alternatives, starting at 0
    Extension(usize),
}

impl PerEncoder {
    /// Encode the index of a root alternative
    ///
    /// # Arguments
    /// * `index` - Index of the alternative among the root alternatives
    /// * `root_count` - Number of root alternatives
    /// * `extensible` - Whether the type carries an extension marker
    pub fn pack_choice_index(
        &mut self,
        index: usize,
        root_count: usize,
        extensible: bool,
    ) -> CodecResult<()> {
        if index >= root_count {
            return Err(CodecError::OutOfRange {
                value: index as i64,
                lb: 0,
                ub: root_count as i64 - 1,
            });
        }
        if extensible {
            self.pack_bit(false)?;
        }
        self.pack_constrained_whole_number(index as i64, 0, root_count as i64 - 1)
    }

    /// Encode the index of an extension alternative or extension value
    ///
    /// Sets the extension bit and writes the index as a normally small
    /// non-negative whole number.
    pub fn pack_extension_index(&mut self, index: usize) -> CodecResult<()> {
        self.pack_bit(true)?;
        self.pack_normally_small(index as u64)
    }

    /// Encode an ENUMERATED root value
    pub fn pack_enumerated(
        &mut self,
        index: usize,
        root_count: usize,
        extensible: bool,
    ) -> CodecResult<()> {
        self.pack_choice_index(index, root_count, extensible)
    }
}

impl<'a> PerDecoder<'a> {
    /// Decode a CHOICE index
    ///
    /// # Errors
    ///
    /// Returns `CodecError::UnknownChoiceAlternative` when the root index
    /// names no root alternative. An index in extension space is not an
    /// error; it is returned as [`ChoiceIndex::Extension`].
    pub fn unpack_choice_index(
        &mut self,
        type_name: &'static str,
        root_count: usize,
        extensible: bool,
    ) -> CodecResult<ChoiceIndex> {
        if extensible && self.unpack_bit()? {
            return Ok(ChoiceIndex::Extension(self.unpack_normally_small()? as usize));
        }
        if root_count == 0 {
            return Err(CodecError::UnknownChoiceAlternative { type_name, index: 0 });
        }
        match self.unpack_constrained_whole_number(0, root_count as i64 - 1) {
            Ok(index) => Ok(ChoiceIndex::Root(index as usize)),
            Err(CodecError::OutOfRange { value, .. }) => Err(CodecError::UnknownChoiceAlternative {
                type_name,
                index: value as usize,
            }),
            Err(other) => Err(other),
        }
    }

    /// Decode an ENUMERATED index
    ///
    /// # Errors
    ///
    /// Returns `CodecError::OutOfRange` when the root index exceeds the
    /// number of root values.
    pub fn unpack_enumerated(&mut self, root_count: usize, extensible: bool) -> CodecResult<ChoiceIndex> {
        if extensible && self.unpack_bit()? {
            return Ok(ChoiceIndex::Extension(self.unpack_normally_small()? as usize));
        }
        let index = self.unpack_constrained_whole_number(0, root_count as i64 - 1)?;
        Ok(ChoiceIndex::Root(index as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_index_widths() {
        let mut encoder = PerEncoder::new();
        // 7 alternatives, extensible: 1 + 3 bits
        encoder.pack_choice_index(6, 7, true).unwrap();
        // 1 alternative, not extensible: nothing
        encoder.pack_choice_index(0, 1, false).unwrap();
        encoder.pack_extension_index(2).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..], &[0x68, 0x20]);

        let mut decoder = PerDecoder::new(&bytes);
        assert_eq!(decoder.unpack_choice_index("UEID", 7, true).unwrap(), ChoiceIndex::Root(6));
        assert_eq!(decoder.unpack_choice_index("GNB-ID", 1, false).unwrap(), ChoiceIndex::Root(0));
        assert_eq!(decoder.unpack_choice_index("ENB-ID", 2, true).unwrap(), ChoiceIndex::Extension(2));
    }

    #[test]
    fn test_unknown_root_alternative_is_hard_error() {
        // 3 alternatives use 2 bits, 0b11 names none of them
        let mut decoder = PerDecoder::new(&[0xC0]);
        assert_eq!(
            decoder.unpack_choice_index("RANParameter-ValueType", 3, false),
            Err(CodecError::UnknownChoiceAlternative {
                type_name: "RANParameter-ValueType",
                index: 3
            })
        );
    }

    #[test]
    fn test_enumerated_out_of_range() {
        let mut decoder = PerDecoder::new(&[0xC0]);
        assert_eq!(
            decoder.unpack_enumerated(3, false),
            Err(CodecError::OutOfRange { value: 3, lb: 0, ub: 2 })
        );
    }
}
