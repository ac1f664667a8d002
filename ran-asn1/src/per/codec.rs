//! `Pack`/`Unpack` contract and its implementations for the value types

use crate::per::{Constraint, PerDecoder, PerEncoder, SizeConstraint};
use bytes::Bytes;
use ran_core::{
    BitString, BoundedBitString, CodecError, CodecResult, ConstrainedInteger, FixedBitString,
    FixedOctetString, OctetString, PrintableString, Real,
};

/// Serialize a value into an aligned PER bit stream
pub trait Pack {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()>;

    /// Whether this value, held as an extension addition, is encoded as absent
    ///
    /// True for an extension addition group whose components are all absent.
    fn is_absent(&self) -> bool {
        false
    }
}

/// Deserialize a value from an aligned PER bit stream
///
/// A failed `unpack` never yields a partially decoded value.
pub trait Unpack: Sized {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self>;
}

/// Encode a complete value, padded to whole octets
pub fn encode<T: Pack + ?Sized>(value: &T) -> CodecResult<Bytes> {
    let mut encoder = PerEncoder::new();
    value.pack(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Decode a complete value from the start of `data`
///
/// Trailing padding after the value is ignored.
pub fn decode<T: Unpack>(data: &[u8]) -> CodecResult<T> {
    let mut decoder = PerDecoder::new(data);
    T::unpack(&mut decoder)
}

impl PerEncoder {
    /// Encode `value` as an open type: its complete encoding, length prefixed
    pub fn pack_open_type<T: Pack + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        let inner = encode(value)?;
        self.pack_open_type_bytes(&inner)
    }
}

impl<'a> PerDecoder<'a> {
    /// Decode an open type holding a `T`
    ///
    /// # Errors
    ///
    /// Returns `CodecError::MalformedExtension` when `T` does not consume
    /// exactly the declared number of octets.
    pub fn unpack_open_type<T: Unpack>(&mut self) -> CodecResult<T> {
        let bytes = self.unpack_open_type_bytes()?;
        let mut inner = self.open_type_decoder(&bytes);
        let value = T::unpack(&mut inner)?;
        let used = inner.bit_position().div_ceil(8).max(1);
        if used != bytes.len() {
            return Err(CodecError::MalformedExtension(format!(
                "open type declares {} octets but its value uses {}",
                bytes.len(),
                used
            )));
        }
        Ok(value)
    }
}

impl<T: Pack + ?Sized> Pack for &T {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        (**self).pack(encoder)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Pack> Pack for Box<T> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        (**self).pack(encoder)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Unpack> Unpack for Box<T> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        T::unpack(decoder).map(Box::new)
    }
}

/// NULL
impl Pack for () {
    fn pack(&self, _encoder: &mut PerEncoder) -> CodecResult<()> {
        Ok(())
    }
}

impl Unpack for () {
    fn unpack(_decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        Ok(())
    }
}

impl Pack for bool {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_bool(*self)
    }
}

impl Unpack for bool {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_bool()
    }
}

/// Unconstrained INTEGER
impl Pack for i64 {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_integer(*self, &Constraint::UNCONSTRAINED)
    }
}

impl Unpack for i64 {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_integer(&Constraint::UNCONSTRAINED)
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> Pack for ConstrainedInteger<LB, UB, EXT> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_integer(self.value(), &integer_constraint::<LB, UB, EXT>())
    }
}

impl<const LB: i64, const UB: i64, const EXT: bool> Unpack for ConstrainedInteger<LB, UB, EXT> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        let value = decoder.unpack_integer(&integer_constraint::<LB, UB, EXT>())?;
        Self::new(value)
    }
}

fn integer_constraint<const LB: i64, const UB: i64, const EXT: bool>() -> Constraint {
    Constraint {
        lb: Some(LB),
        ub: Some(UB),
        extensible: EXT,
    }
}

impl Pack for Real {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_real(self.value())
    }
}

impl Unpack for Real {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_real().map(Real::new)
    }
}

impl Pack for BitString {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_bit_string(self, &SizeConstraint::UNCONSTRAINED)
    }
}

impl Unpack for BitString {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_bit_string(&SizeConstraint::UNCONSTRAINED)
    }
}

impl<const N: usize> Pack for FixedBitString<N> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_bit_string(self.as_bit_string(), &SizeConstraint::fixed(N))
    }
}

impl<const N: usize> Unpack for FixedBitString<N> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_bit_string(&SizeConstraint::fixed(N))?.try_into()
    }
}

impl<const LB: usize, const UB: usize> Pack for BoundedBitString<LB, UB> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_bit_string(self.as_bit_string(), &SizeConstraint::new(LB, UB))
    }
}

impl<const LB: usize, const UB: usize> Unpack for BoundedBitString<LB, UB> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        Self::new(decoder.unpack_bit_string(&SizeConstraint::new(LB, UB))?)
    }
}

impl Pack for OctetString {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_octet_string(self.as_bytes(), &SizeConstraint::UNCONSTRAINED)
    }
}

impl Unpack for OctetString {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder
            .unpack_octet_string(&SizeConstraint::UNCONSTRAINED)
            .map(OctetString::new)
    }
}

impl<const N: usize> Pack for FixedOctetString<N> {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_octet_string(self.as_bytes(), &SizeConstraint::fixed(N))
    }
}

impl<const N: usize> Unpack for FixedOctetString<N> {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        let bytes = decoder.unpack_octet_string(&SizeConstraint::fixed(N))?;
        Self::try_from(bytes.as_slice())
    }
}

impl Pack for PrintableString {
    fn pack(&self, encoder: &mut PerEncoder) -> CodecResult<()> {
        encoder.pack_printable_string(self.as_str(), &SizeConstraint::UNCONSTRAINED)
    }
}

impl Unpack for PrintableString {
    fn unpack(decoder: &mut PerDecoder<'_>) -> CodecResult<Self> {
        decoder.unpack_printable_string(&SizeConstraint::UNCONSTRAINED)
    }
}
