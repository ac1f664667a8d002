//! SEQUENCE extension additions (X.691 §19.7–19.9)
//!
//! After the root components of an extensible SEQUENCE whose extension bit
//! is set, the encoding carries:
//!
//! ```text
//! [normally small length n] [n presence bits] [open type]...
//! ```
//!
//! with one open type per present addition, in declaration order. An
//! addition is either a single component or an extension group (`[[ ]]`),
//! which is packed as a SEQUENCE of its own.
//!
//! A decoder built from an older schema knows fewer additions than the
//! sender may signal. The extra open types are read and discarded, so the
//! known part of the message still decodes.

use crate::per::{PerDecoder, PerEncoder, Unpack};
use ran_core::{CodecError, CodecResult};

impl PerEncoder {
    /// Encode the presence bitmap of the extension additions
    pub fn pack_extension_bitmap(&mut self, present: &[bool]) -> CodecResult<()> {
        self.pack_normally_small_length(present.len())?;
        for bit in present {
            self.pack_bit(*bit)?;
        }
        Ok(())
    }
}

/// Reader for the extension additions of one SEQUENCE value
///
/// Created once the extension bit was found set and the root components
/// are decoded. Known additions are taken in order with
/// [`ExtensionAdditions::next`]; [`ExtensionAdditions::finish`] skips the
/// rest.
#[derive(Debug)]
pub struct ExtensionAdditions {
    present: Vec<bool>,
    next: usize,
}

impl ExtensionAdditions {
    /// Read the presence bitmap
    ///
    /// # Errors
    ///
    /// Returns `CodecError::MalformedExtension` when the bitmap marks no
    /// addition present although the extension bit was set.
    pub fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        let count = decoder.unpack_normally_small_length()?;
        let present = (0..count)
            .map(|_| decoder.unpack_bit())
            .collect::<CodecResult<Vec<bool>>>()?;
        if !present.iter().any(|bit| *bit) {
            return Err(CodecError::MalformedExtension(format!(
                "extension bit set but none of {} additions present",
                count
            )));
        }
        Ok(Self { present, next: 0 })
    }

    /// Number of additions signalled by the sender
    pub fn signalled(&self) -> usize {
        self.present.len()
    }

    /// Decode the next known addition, `None` when it is absent
    pub fn next<T: Unpack>(&mut self, decoder: &mut PerDecoder<'_>) -> CodecResult<Option<T>> {
        let present = self.present.get(self.next).copied().unwrap_or(false);
        self.next += 1;
        if present {
            decoder.unpack_open_type().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Skip the additions this schema does not know
    ///
    /// Returns how many were skipped.
    pub fn finish(self, decoder: &mut PerDecoder<'_>) -> CodecResult<usize> {
        let mut skipped = 0;
        for present in self.present.iter().skip(self.next) {
            if *present {
                decoder.unpack_open_type_bytes()?;
                skipped += 1;
            }
        }
        Ok(skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ran_core::ConstrainedInteger;

    type Small = ConstrainedInteger<0, 7>;

    #[test]
    fn test_bitmap_and_skip() {
        let mut encoder = PerEncoder::new();
        encoder.pack_extension_bitmap(&[true, false, true]).unwrap();
        encoder.pack_open_type(&Small::new(5).unwrap()).unwrap();
        encoder.pack_open_type(&Small::new(3).unwrap()).unwrap();
        encoder.pack_bits(0b1010, 4).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = PerDecoder::new(&bytes);
        let mut additions = ExtensionAdditions::unpack(&mut decoder).unwrap();
        assert_eq!(additions.signalled(), 3);
        let first: Option<Small> = additions.next(&mut decoder).unwrap();
        assert_eq!(first.map(|v| v.value()), Some(5));
        assert_eq!(additions.finish(&mut decoder).unwrap(), 1);
        assert_eq!(decoder.unpack_bits(4).unwrap(), 0b1010);
    }

    #[test]
    fn test_empty_bitmap_is_malformed() {
        let mut encoder = PerEncoder::new();
        encoder.pack_extension_bitmap(&[false, false]).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = PerDecoder::new(&bytes);
        assert!(matches!(
            ExtensionAdditions::unpack(&mut decoder),
            Err(CodecError::MalformedExtension(_))
        ));
    }

    #[test]
    fn test_more_known_than_signalled() {
        let mut encoder = PerEncoder::new();
        encoder.pack_extension_bitmap(&[true]).unwrap();
        encoder.pack_open_type(&true).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = PerDecoder::new(&bytes);
        let mut additions = ExtensionAdditions::unpack(&mut decoder).unwrap();
        assert_eq!(additions.next::<bool>(&mut decoder).unwrap(), Some(true));
        assert_eq!(additions.next::<bool>(&mut decoder).unwrap(), None);
        assert_eq!(additions.finish(&mut decoder).unwrap(), 0);
    }
}
