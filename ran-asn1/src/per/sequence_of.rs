//! SEQUENCE OF (X.691 §20)

use crate::per::{Pack, PerDecoder, PerEncoder, SizeConstraint, Unpack};
use ran_core::{BoundedArray, CodecResult};

impl PerEncoder {
    /// Encode the components of a SEQUENCE OF after its length determinant
    pub fn pack_sequence_of<T: Pack>(&mut self, items: &[T], size: &SizeConstraint) -> CodecResult<()> {
        self.pack_sized(items.len(), size, false, |enc, range| {
            items[range].iter().try_for_each(|item| item.pack(enc))
        })
    }
}

impl<'a> PerDecoder<'a> {
    /// Decode the components of a SEQUENCE OF
    ///
    /// The length is validated against `size` before any component is read.
    pub fn unpack_sequence_of<T: Unpack>(&mut self, size: &SizeConstraint) -> CodecResult<Vec<T>> {
        let mut items = Vec::new();
        self.unpack_sized(size, false, |dec, count| {
            // a bogus length must not drive the allocation
            items.reserve(count.min(dec.remaining_bits()));
            for _ in 0..count {
                items.push(T::unpack(dec)?);
            }
            Ok(())
        })?;
        Ok(items)
    }
}

/// SEQUENCE OF without SIZE constraint
impl<T: Pack> Pack for Vec<T> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_sequence_of(self.as_slice(), &SizeConstraint::UNCONSTRAINED)
    }
}

impl<T: Unpack> Unpack for Vec<T> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_sequence_of(&SizeConstraint::UNCONSTRAINED)
    }
}

impl<T: Pack, const N: usize, const LB: usize> Pack for BoundedArray<T, N, LB> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_sequence_of(self.as_slice(), &SizeConstraint::new(LB, N))
    }
}

impl<T: Unpack, const N: usize, const LB: usize> Unpack for BoundedArray<T, N, LB> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        let items = decoder.unpack_sequence_of(&SizeConstraint::new(LB, N))?;
        Self::try_from(items)
    }
}
