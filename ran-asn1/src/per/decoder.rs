//! Aligned PER decoder
//!
//! Read side of the bit cursor, mirroring [`PerEncoder`](super::PerEncoder).
//! Padding bits skipped by alignment are not checked.

use crate::per::types::{
    bits_for_range, octets_for_unsigned, Constraint, SizeConstraint, FRAGMENT_UNIT,
};
use bitvec::prelude::*;
use ran_core::datatypes::printable_string::is_printable_char;
use ran_core::{BitString, CodecError, CodecResult, PrintableString};

/// Aligned PER decoder over a borrowed octet buffer
///
/// Every read is bounds checked: running past the end of the buffer yields
/// `CodecError::BufferOverflow`, never a panic.
#[derive(Debug, Clone)]
pub struct PerDecoder<'a> {
    data: &'a BitSlice<u8, Msb0>,
    position: usize,
    /// CHOICE values currently being unpacked
    depth: usize,
}

/// Deepest CHOICE nesting accepted on decode
///
/// Recursive types such as RAN parameter structures otherwise let a small
/// message drive unbounded recursion.
pub const MAX_NESTING_DEPTH: usize = 64;

impl<'a> PerDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data: BitSlice::from_slice(data),
            position: 0,
            depth: 0,
        }
    }

    /// Decoder over the contents of an open type, at the current depth
    pub(crate) fn open_type_decoder<'b>(&self, data: &'b [u8]) -> PerDecoder<'b> {
        PerDecoder {
            data: BitSlice::from_slice(data),
            position: 0,
            depth: self.depth,
        }
    }

    /// Run `unpack` one nesting level deeper
    ///
    /// # Errors
    ///
    /// Returns `CodecError::NestingTooDeep` past [`MAX_NESTING_DEPTH`]
    /// levels, or whatever `unpack` returns.
    pub fn nested<T, F>(&mut self, unpack: F) -> CodecResult<T>
    where
        F: FnOnce(&mut Self) -> CodecResult<T>,
    {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(CodecError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
        }
        self.depth += 1;
        let result = unpack(self);
        self.depth -= 1;
        result
    }

    /// Current bit position
    pub fn bit_position(&self) -> usize {
        self.position
    }

    /// Bits left to read
    pub fn remaining_bits(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    pub fn is_aligned(&self) -> bool {
        self.position % 8 == 0
    }

    fn require(&self, num_bits: usize) -> CodecResult<()> {
        let available = self.remaining_bits();
        if num_bits > available {
            return Err(CodecError::BufferOverflow {
                needed: num_bits,
                available,
            });
        }
        Ok(())
    }

    // ---- bit cursor ----

    /// Read a single bit
    pub fn unpack_bit(&mut self) -> CodecResult<bool> {
        self.require(1)?;
        let bit = self.data[self.position];
        self.position += 1;
        Ok(bit)
    }

    /// Read `num_bits` bits as an unsigned value, most significant bit first
    pub fn unpack_bits(&mut self, num_bits: usize) -> CodecResult<u64> {
        if num_bits > 64 {
            return Err(CodecError::InvalidEncoding(format!(
                "cannot unpack {} bits into a 64-bit value",
                num_bits
            )));
        }
        self.require(num_bits)?;
        let value = self.data[self.position..self.position + num_bits]
            .iter()
            .fold(0u64, |acc, bit| (acc << 1) | *bit as u64);
        self.position += num_bits;
        Ok(value)
    }

    /// Advance to the next octet boundary
    pub fn align_to_byte(&mut self) -> CodecResult<()> {
        let remainder = self.position % 8;
        if remainder != 0 {
            self.require(8 - remainder)?;
            self.position += 8 - remainder;
        }
        Ok(())
    }

    /// Read raw octets from the current position
    pub fn unpack_bytes(&mut self, num_bytes: usize) -> CodecResult<Vec<u8>> {
        self.require(num_bytes.saturating_mul(8))?;
        let mut bytes = Vec::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            bytes.push(self.unpack_bits(8)? as u8);
        }
        Ok(bytes)
    }

    /// Read `num_bits` bits and append them to `bits`
    pub fn unpack_bit_slice(&mut self, bits: &mut BitString, num_bits: usize) -> CodecResult<()> {
        self.require(num_bits)?;
        for bit in &self.data[self.position..self.position + num_bits] {
            bits.push(*bit);
        }
        self.position += num_bits;
        Ok(())
    }

    // ---- whole numbers ----

    pub fn unpack_bool(&mut self) -> CodecResult<bool> {
        self.unpack_bit()
    }

    /// Decode an INTEGER under its constraint
    ///
    /// With an extensible constraint and the extension bit set the value is
    /// read as an unconstrained whole number and is not range checked.
    pub fn unpack_integer(&mut self, constraint: &Constraint) -> CodecResult<i64> {
        if constraint.extensible && self.unpack_bit()? {
            return self.unpack_unconstrained_whole_number();
        }
        match (constraint.lb, constraint.ub) {
            (Some(lb), Some(ub)) => self.unpack_constrained_whole_number(lb, ub),
            (Some(lb), None) => self.unpack_semi_constrained_whole_number(lb),
            _ => self.unpack_unconstrained_whole_number(),
        }
    }

    /// Decode a constrained whole number (X.691 §10.5.7, aligned)
    ///
    /// # Errors
    ///
    /// Returns `CodecError::OutOfRange` when the bit-field holds an offset
    /// beyond `ub`.
    pub fn unpack_constrained_whole_number(&mut self, lb: i64, ub: i64) -> CodecResult<i64> {
        if ub < lb {
            return Err(CodecError::InvalidEncoding(format!(
                "empty range {}..={}",
                lb, ub
            )));
        }
        let range = (ub as i128 - lb as i128 + 1) as u128;

        let offset = if range == 1 {
            0
        } else if range <= 255 {
            self.unpack_bits(bits_for_range(range))?
        } else if range == 256 {
            self.align_to_byte()?;
            self.unpack_bits(8)?
        } else if range <= 65536 {
            self.align_to_byte()?;
            self.unpack_bits(16)?
        } else {
            let max_octets = octets_for_unsigned((range - 1) as u64);
            let octets = self.unpack_bits(bits_for_range(max_octets as u128))? as usize + 1;
            if octets > max_octets {
                return Err(CodecError::InvalidEncoding(format!(
                    "{} value octets exceed the {} allowed by the range",
                    octets, max_octets
                )));
            }
            self.align_to_byte()?;
            self.unpack_bits(octets * 8)?
        };

        let value = lb as i128 + offset as i128;
        if value > ub as i128 {
            return Err(CodecError::OutOfRange {
                value: value.min(i64::MAX as i128) as i64,
                lb,
                ub,
            });
        }
        Ok(value as i64)
    }

    /// Decode a semi-constrained whole number (X.691 §10.7)
    pub fn unpack_semi_constrained_whole_number(&mut self, lb: i64) -> CodecResult<i64> {
        let octets = self.unpack_unconstrained_length()?;
        if octets == 0 || octets > 8 {
            return Err(CodecError::InvalidEncoding(format!(
                "semi-constrained whole number of {} octets",
                octets
            )));
        }
        let offset = self.unpack_bits(octets * 8)?;
        let value = lb as i128 + offset as i128;
        if value > i64::MAX as i128 {
            return Err(CodecError::OutOfRange {
                value: i64::MAX,
                lb,
                ub: i64::MAX,
            });
        }
        Ok(value as i64)
    }

    /// Decode an unconstrained whole number (X.691 §10.8)
    pub fn unpack_unconstrained_whole_number(&mut self) -> CodecResult<i64> {
        let octets = self.unpack_unconstrained_length()?;
        if octets == 0 || octets > 8 {
            return Err(CodecError::InvalidEncoding(format!(
                "unconstrained whole number of {} octets",
                octets
            )));
        }
        let raw = self.unpack_bits(octets * 8)?;
        // sign-extend from the top bit of the first octet
        let shift = 64 - octets * 8;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Decode a normally small non-negative whole number (X.691 §10.6)
    pub fn unpack_normally_small(&mut self) -> CodecResult<u64> {
        if self.unpack_bit()? {
            Ok(self.unpack_semi_constrained_whole_number(0)? as u64)
        } else {
            self.unpack_bits(6)
        }
    }

    /// Decode a normally small length (X.691 §11.9.3.4)
    pub fn unpack_normally_small_length(&mut self) -> CodecResult<usize> {
        if self.unpack_bit()? {
            self.unpack_unconstrained_length()
        } else {
            Ok(self.unpack_bits(6)? as usize + 1)
        }
    }

    // ---- length determinants ----

    /// Decode an unconstrained length that is not fragmented
    pub fn unpack_unconstrained_length(&mut self) -> CodecResult<usize> {
        match self.unpack_length_octets()? {
            Fragment::Final(length) => Ok(length),
            Fragment::Partial(_) => Err(CodecError::InvalidEncoding(
                "unexpected fragmented length".to_string(),
            )),
        }
    }

    fn unpack_length_octets(&mut self) -> CodecResult<Fragment> {
        self.align_to_byte()?;
        let first = self.unpack_bits(8)? as usize;
        if first & 0x80 == 0 {
            Ok(Fragment::Final(first))
        } else if first & 0x40 == 0 {
            let second = self.unpack_bits(8)? as usize;
            Ok(Fragment::Final(((first & 0x3F) << 8) | second))
        } else {
            let units = first & 0x3F;
            if !(1..=4).contains(&units) {
                return Err(CodecError::InvalidEncoding(format!(
                    "illegal fragment header 0x{:02X}",
                    first
                )));
            }
            Ok(Fragment::Partial(units * FRAGMENT_UNIT))
        }
    }

    /// Decode a length determinant and the items it counts
    ///
    /// Mirror of [`PerEncoder::pack_sized`](super::PerEncoder::pack_sized).
    /// `unpack_items` is called once per fragment with the number of items in
    /// it. Returns the total number of items.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::SizeOutOfRange` when the decoded length falls
    /// outside the root SIZE constraint and no extension bit was set.
    pub fn unpack_sized<F>(
        &mut self,
        size: &SizeConstraint,
        align_content: bool,
        mut unpack_items: F,
    ) -> CodecResult<usize>
    where
        F: FnMut(&mut Self, usize) -> CodecResult<()>,
    {
        let extended = size.extensible && self.unpack_bit()?;
        let size_error = |count: usize| CodecError::SizeOutOfRange {
            size: count,
            lb: size.lb,
            ub: size.upper(),
        };

        if !extended {
            if let Some(ub) = size.constrained_ub() {
                let count = if size.lb == ub {
                    ub
                } else {
                    self.unpack_constrained_whole_number(size.lb as i64, ub as i64)
                        .map_err(|e| match e {
                            CodecError::OutOfRange { value, .. } => size_error(value as usize),
                            other => other,
                        })? as usize
                };
                if align_content && count > 0 {
                    self.align_to_byte()?;
                }
                unpack_items(self, count)?;
                return Ok(count);
            }
        }

        let mut total = 0usize;
        loop {
            let fragment = self.unpack_length_octets()?;
            let count = match fragment {
                Fragment::Final(n) | Fragment::Partial(n) => n,
            };
            total += count;
            if !extended && size.ub.is_some_and(|ub| total > ub) {
                return Err(size_error(total));
            }
            unpack_items(self, count)?;
            if let Fragment::Final(_) = fragment {
                break;
            }
        }
        if !extended && total < size.lb {
            return Err(size_error(total));
        }
        Ok(total)
    }

    // ---- strings ----

    /// Decode an OCTET STRING
    pub fn unpack_octet_string(&mut self, size: &SizeConstraint) -> CodecResult<Vec<u8>> {
        let align = !(size.is_fixed() && size.lb <= 2);
        let mut data = Vec::new();
        self.unpack_sized(size, align, |dec, count| {
            data.extend(dec.unpack_bytes(count)?);
            Ok(())
        })?;
        Ok(data)
    }

    /// Decode a BIT STRING
    pub fn unpack_bit_string(&mut self, size: &SizeConstraint) -> CodecResult<BitString> {
        let align = !(size.is_fixed() && size.lb <= 16);
        let mut bits = BitString::default();
        self.unpack_sized(size, align, |dec, count| dec.unpack_bit_slice(&mut bits, count))?;
        Ok(bits)
    }

    /// Decode a PrintableString, validating its alphabet
    pub fn unpack_printable_string(&mut self, size: &SizeConstraint) -> CodecResult<PrintableString> {
        let align = size.ub.is_none_or(|ub| ub * 8 > 16);
        let mut chars = String::new();
        self.unpack_sized(size, align, |dec, count| {
            for _ in 0..count {
                let c = dec.unpack_bits(8)? as u8 as char;
                if !is_printable_char(c) {
                    return Err(CodecError::InvalidEncoding(format!(
                        "character {:?} not allowed in PrintableString",
                        c
                    )));
                }
                chars.push(c);
            }
            Ok(())
        })?;
        PrintableString::new(chars)
    }

    // ---- open types ----

    /// Read the octets of an open type without interpreting them
    pub fn unpack_open_type_bytes(&mut self) -> CodecResult<Vec<u8>> {
        self.unpack_octet_string(&SizeConstraint::UNCONSTRAINED)
    }
}

enum Fragment {
    Final(usize),
    Partial(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::PerEncoder;

    #[test]
    fn test_nesting_limit() {
        fn descend(decoder: &mut PerDecoder<'_>, levels: usize) -> CodecResult<usize> {
            if levels == 0 {
                return Ok(0);
            }
            decoder.nested(|decoder| Ok(descend(decoder, levels - 1)? + 1))
        }

        let mut decoder = PerDecoder::new(&[]);
        assert_eq!(descend(&mut decoder, MAX_NESTING_DEPTH), Ok(MAX_NESTING_DEPTH));
        assert_eq!(
            descend(&mut decoder, MAX_NESTING_DEPTH + 1),
            Err(CodecError::NestingTooDeep { limit: MAX_NESTING_DEPTH })
        );
        // depth is released on error
        assert_eq!(descend(&mut decoder, 3), Ok(3));
    }

    #[test]
    fn test_unpack_bits() {
        let mut decoder = PerDecoder::new(&[0xB0, 0xAB]);
        assert!(decoder.unpack_bit().unwrap());
        assert_eq!(decoder.unpack_bits(3).unwrap(), 0b011);
        decoder.align_to_byte().unwrap();
        assert_eq!(decoder.unpack_bytes(1).unwrap(), vec![0xAB]);
        assert_eq!(decoder.remaining_bits(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let mut decoder = PerDecoder::new(&[0xFF]);
        decoder.unpack_bits(5).unwrap();
        assert_eq!(
            decoder.unpack_bits(4),
            Err(CodecError::BufferOverflow { needed: 4, available: 3 })
        );
        assert!(decoder.unpack_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_constrained_whole_number_rejects_offset_past_ub() {
        // 3 bits can carry offset 7, but range 0..=6 stops at 6
        let mut decoder = PerDecoder::new(&[0xE0]);
        assert_eq!(
            decoder.unpack_constrained_whole_number(0, 6),
            Err(CodecError::OutOfRange { value: 7, lb: 0, ub: 6 })
        );

        let mut decoder = PerDecoder::new(&[0xFF, 0xFF]);
        assert_eq!(
            decoder.unpack_constrained_whole_number(1, 65535),
            Err(CodecError::OutOfRange { value: 65536, lb: 1, ub: 65535 })
        );
    }

    #[test]
    fn test_large_range_octet_count() {
        let mut decoder = PerDecoder::new(&[0x40, 0x01, 0x02]);
        assert_eq!(decoder.unpack_constrained_whole_number(0, 4294967295).unwrap(), 0x0102);
    }

    #[test]
    fn test_integer_classes() {
        let cases: [(i64, Constraint); 6] = [
            (6, Constraint::extensible(1, 65535)),
            (70000, Constraint::extensible(1, 65535)),
            (-5, Constraint::UNCONSTRAINED),
            (i64::MIN, Constraint::UNCONSTRAINED),
            (1099511627775, Constraint::new(0, 1099511627775)),
            (12345, Constraint::semi_constrained(-10)),
        ];
        for (value, constraint) in cases {
            let mut encoder = PerEncoder::new();
            encoder.pack_integer(value, &constraint).unwrap();
            let bytes = encoder.into_bytes();
            let mut decoder = PerDecoder::new(&bytes);
            assert_eq!(decoder.unpack_integer(&constraint).unwrap(), value);
        }
    }

    #[test]
    fn test_illegal_fragment_header() {
        let mut decoder = PerDecoder::new(&[0xC5, 0x00]);
        assert!(matches!(
            decoder.unpack_octet_string(&SizeConstraint::UNCONSTRAINED),
            Err(CodecError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_fragmented_octet_string() {
        for len in [FRAGMENT_UNIT - 1, FRAGMENT_UNIT, 4 * FRAGMENT_UNIT + 1, 5 * FRAGMENT_UNIT] {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut encoder = PerEncoder::new();
            encoder.pack_octet_string(&data, &SizeConstraint::UNCONSTRAINED).unwrap();
            let bytes = encoder.into_bytes();
            let mut decoder = PerDecoder::new(&bytes);
            assert_eq!(
                decoder.unpack_octet_string(&SizeConstraint::UNCONSTRAINED).unwrap(),
                data
            );
        }
    }

    #[test]
    fn test_fragmented_bit_string() {
        let bits: BitString = (0..FRAGMENT_UNIT + 5).map(|i| i % 3 == 0).collect();
        let mut encoder = PerEncoder::new();
        encoder.pack_bit_string(&bits, &SizeConstraint::UNCONSTRAINED).unwrap();
        let bytes = encoder.into_bytes();
        let mut decoder = PerDecoder::new(&bytes);
        assert_eq!(
            decoder.unpack_bit_string(&SizeConstraint::UNCONSTRAINED).unwrap(),
            bits
        );
    }

    #[test]
    fn test_size_determinant_above_bound() {
        // SIZE(1..63): 6 bits of 63 decode to 64 items
        let mut decoder = PerDecoder::new(&[0xFC]);
        assert_eq!(
            decoder.unpack_sized(&SizeConstraint::new(1, 63), false, |_, _| Ok(())),
            Err(CodecError::SizeOutOfRange { size: 64, lb: 1, ub: 63 })
        );
    }

    #[test]
    fn test_extensible_size() {
        let size = SizeConstraint::extensible(1, 2);
        let mut encoder = PerEncoder::new();
        encoder.pack_octet_string(&[1, 2, 3], &size).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..], &[0x80, 0x03, 1, 2, 3]);
        let mut decoder = PerDecoder::new(&bytes);
        assert_eq!(decoder.unpack_octet_string(&size).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_printable_string_alphabet_on_decode() {
        let mut decoder = PerDecoder::new(&[0x02, b'o', b'@']);
        assert!(matches!(
            decoder.unpack_printable_string(&SizeConstraint::UNCONSTRAINED),
            Err(CodecError::InvalidEncoding(_))
        ));
    }
}
