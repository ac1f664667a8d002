//! Aligned PER encoder
//!
//! This module provides the write side of the bit cursor together with the
//! primitive codecs of X.691 (aligned variant).
//!
//! # Usage Example
//!
//! ```rust
//! use ran_asn1::per::{Constraint, PerEncoder};
//!
//! let mut encoder = PerEncoder::new();
//! encoder.pack_bit(false)?;
//! encoder.pack_integer(6, &Constraint::extensible(1, 65535))?;
//! assert_eq!(&encoder.into_bytes()[..], &[0x00, 0x00, 0x05]);
//! # Ok::<(), ran_asn1::CodecError>(())
//! ```

use crate::per::types::{
    bits_for_range, octets_for_signed, octets_for_unsigned, Constraint, SizeConstraint,
    FRAGMENT_UNIT,
};
use bitvec::prelude::*;
use bytes::Bytes;
use ran_core::datatypes::printable_string::is_printable_char;
use ran_core::{BitString, CodecError, CodecResult};
use std::ops::Range;

/// Aligned PER encoder
///
/// Bits are appended most significant bit first into a growable
/// `BitVec<u8, Msb0>`. An optional limit caps the encoding size in octets;
/// a write that would cross it fails with `CodecError::BufferOverflow` and
/// leaves the cursor where it was.
///
/// A failed `pack` leaves a partially written buffer behind. It must be
/// discarded by the caller.
#[derive(Debug, Default)]
pub struct PerEncoder {
    buffer: BitVec<u8, Msb0>,
    limit: Option<usize>,
}

impl PerEncoder {
    /// Create a new encoder with no size limit
    pub fn new() -> Self {
        Self {
            buffer: BitVec::new(),
            limit: None,
        }
    }

    /// Create an encoder that refuses to grow past `max_octets`
    pub fn with_limit(max_octets: usize) -> Self {
        Self {
            buffer: BitVec::with_capacity(max_octets * 8),
            limit: Some(max_octets),
        }
    }

    /// Current bit position
    pub fn bit_position(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the cursor sits on an octet boundary
    pub fn is_aligned(&self) -> bool {
        self.buffer.len() % 8 == 0
    }

    /// Finish encoding
    ///
    /// The last octet is completed with zero bits.
    pub fn into_bytes(mut self) -> Bytes {
        let padded = self.buffer.len().div_ceil(8) * 8;
        self.buffer.resize(padded, false);
        Bytes::from(self.buffer.into_vec())
    }

    fn reserve(&self, num_bits: usize) -> CodecResult<()> {
        if let Some(limit) = self.limit {
            let available = (limit * 8).saturating_sub(self.buffer.len());
            if num_bits > available {
                return Err(CodecError::BufferOverflow {
                    needed: num_bits,
                    available,
                });
            }
        }
        Ok(())
    }

    // ---- bit cursor ----

    /// Write a single bit
    pub fn pack_bit(&mut self, bit: bool) -> CodecResult<()> {
        self.reserve(1)?;
        self.buffer.push(bit);
        Ok(())
    }

    /// Write the low `num_bits` of `value`, most significant bit first
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidEncoding` if `num_bits > 64`, or
    /// `CodecError::BufferOverflow` if the limit would be crossed.
    pub fn pack_bits(&mut self, value: u64, num_bits: usize) -> CodecResult<()> {
        if num_bits > 64 {
            return Err(CodecError::InvalidEncoding(format!(
                "cannot pack {} bits from a 64-bit value",
                num_bits
            )));
        }
        self.reserve(num_bits)?;
        for i in (0..num_bits).rev() {
            self.buffer.push((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Advance to the next octet boundary, padding with zero bits
    pub fn align_to_byte(&mut self) -> CodecResult<()> {
        let remainder = self.buffer.len() % 8;
        if remainder != 0 {
            self.pack_bits(0, 8 - remainder)?;
        }
        Ok(())
    }

    /// Write raw octets at the current position
    pub fn pack_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.reserve(bytes.len() * 8)?;
        self.buffer.extend_from_raw_slice(bytes);
        Ok(())
    }

    /// Copy bits of a bit string at the current position
    pub fn pack_bit_slice(&mut self, bits: &BitString, range: Range<usize>) -> CodecResult<()> {
        self.reserve(range.len())?;
        let source = BitSlice::<u8, Msb0>::from_slice(bits.as_bytes());
        self.buffer.extend_from_bitslice(&source[range]);
        Ok(())
    }

    // ---- whole numbers ----

    /// Encode a BOOLEAN
    pub fn pack_bool(&mut self, value: bool) -> CodecResult<()> {
        self.pack_bit(value)
    }

    /// Encode an INTEGER under its constraint
    ///
    /// # Encoding Process
    /// 1. Extension bit, if the constraint is extensible. A value outside the
    ///    root is then encoded as an unconstrained whole number.
    /// 2. Constrained, semi-constrained or unconstrained whole number
    ///    depending on which bounds are present.
    pub fn pack_integer(&mut self, value: i64, constraint: &Constraint) -> CodecResult<()> {
        if constraint.extensible {
            let in_root = constraint.contains(value);
            self.pack_bit(!in_root)?;
            if !in_root {
                return self.pack_unconstrained_whole_number(value);
            }
        }
        match (constraint.lb, constraint.ub) {
            (Some(lb), Some(ub)) => self.pack_constrained_whole_number(value, lb, ub),
            (Some(lb), None) => self.pack_semi_constrained_whole_number(value, lb),
            _ => self.pack_unconstrained_whole_number(value),
        }
    }

    /// Encode a constrained whole number (X.691 §10.5.7, aligned)
    ///
    /// | range      | encoding                                         |
    /// |------------|--------------------------------------------------|
    /// | 1          | nothing                                          |
    /// | 2..=255    | minimal bit-field, not aligned                   |
    /// | 256        | one octet, aligned                               |
    /// | 257..=64K  | two octets, aligned                              |
    /// | larger     | octet count as a bit-field, then aligned octets  |
    pub fn pack_constrained_whole_number(&mut self, value: i64, lb: i64, ub: i64) -> CodecResult<()> {
        if value < lb || value > ub {
            return Err(CodecError::OutOfRange { value, lb, ub });
        }
        let range = (ub as i128 - lb as i128 + 1) as u128;
        let offset = (value as i128 - lb as i128) as u64;

        if range == 1 {
            Ok(())
        } else if range <= 255 {
            self.pack_bits(offset, bits_for_range(range))
        } else if range == 256 {
            self.align_to_byte()?;
            self.pack_bits(offset, 8)
        } else if range <= 65536 {
            self.align_to_byte()?;
            self.pack_bits(offset, 16)
        } else {
            let max_octets = octets_for_unsigned((range - 1) as u64);
            let octets = octets_for_unsigned(offset);
            self.pack_bits((octets - 1) as u64, bits_for_range(max_octets as u128))?;
            self.align_to_byte()?;
            self.pack_bits(offset, octets * 8)
        }
    }

    /// Encode a semi-constrained whole number (X.691 §10.7)
    pub fn pack_semi_constrained_whole_number(&mut self, value: i64, lb: i64) -> CodecResult<()> {
        if value < lb {
            return Err(CodecError::OutOfRange {
                value,
                lb,
                ub: i64::MAX,
            });
        }
        let offset = (value as i128 - lb as i128) as u64;
        let octets = octets_for_unsigned(offset);
        self.pack_unconstrained_length(octets)?;
        self.pack_bits(offset, octets * 8)
    }

    /// Encode an unconstrained whole number (X.691 §10.8)
    pub fn pack_unconstrained_whole_number(&mut self, value: i64) -> CodecResult<()> {
        let octets = octets_for_signed(value);
        self.pack_unconstrained_length(octets)?;
        self.pack_bits(value as u64, octets * 8)
    }

    /// Encode a normally small non-negative whole number (X.691 §10.6)
    pub fn pack_normally_small(&mut self, value: u64) -> CodecResult<()> {
        if value <= 63 {
            self.pack_bit(false)?;
            self.pack_bits(value, 6)
        } else {
            self.pack_bit(true)?;
            self.pack_semi_constrained_whole_number(value as i64, 0)
        }
    }

    /// Encode a normally small length (X.691 §11.9.3.4), `length >= 1`
    pub fn pack_normally_small_length(&mut self, length: usize) -> CodecResult<()> {
        if length == 0 {
            return Err(CodecError::InvalidEncoding(
                "normally small length must be positive".to_string(),
            ));
        }
        if length <= 64 {
            self.pack_bit(false)?;
            self.pack_bits((length - 1) as u64, 6)
        } else {
            self.pack_bit(true)?;
            self.pack_unconstrained_length(length)
        }
    }

    // ---- length determinants ----

    /// Encode an unconstrained length below 16K (X.691 §11.9.3.6/7)
    ///
    /// Longer lengths need fragmentation and go through
    /// [`PerEncoder::pack_sized`].
    pub fn pack_unconstrained_length(&mut self, length: usize) -> CodecResult<()> {
        self.align_to_byte()?;
        if length < 128 {
            self.pack_bits(length as u64, 8)
        } else if length < FRAGMENT_UNIT {
            self.pack_bits(0x8000 | length as u64, 16)
        } else {
            Err(CodecError::InvalidEncoding(format!(
                "length {} requires fragmentation",
                length
            )))
        }
    }

    /// Encode `count` items preceded by their length determinant
    ///
    /// # Arguments
    /// * `count` - Number of items (octets, bits, characters or components)
    /// * `size` - SIZE constraint of the type
    /// * `align_content` - Whether the items start on an octet boundary when
    ///   the length is constrained
    /// * `pack_items` - Writes the items of the given index range
    ///
    /// Constrained lengths (`ub < 64K`) are encoded as constrained whole
    /// numbers, or not at all for fixed sizes. Everything else uses the
    /// unconstrained length determinant, fragmented in units of 16K items
    /// with a final, possibly empty, fragment.
    pub fn pack_sized<F>(
        &mut self,
        count: usize,
        size: &SizeConstraint,
        align_content: bool,
        mut pack_items: F,
    ) -> CodecResult<()>
    where
        F: FnMut(&mut Self, Range<usize>) -> CodecResult<()>,
    {
        let in_root = size.contains(count);
        if size.extensible {
            self.pack_bit(!in_root)?;
        } else if !in_root {
            return Err(CodecError::SizeOutOfRange {
                size: count,
                lb: size.lb,
                ub: size.upper(),
            });
        }

        if in_root {
            if let Some(ub) = size.constrained_ub() {
                if size.lb != ub {
                    self.pack_constrained_whole_number(count as i64, size.lb as i64, ub as i64)?;
                }
                if align_content && count > 0 {
                    self.align_to_byte()?;
                }
                return pack_items(self, 0..count);
            }
        }

        let mut start = 0;
        loop {
            let remaining = count - start;
            if remaining < FRAGMENT_UNIT {
                self.pack_unconstrained_length(remaining)?;
                return pack_items(self, start..count);
            }
            let units = (remaining / FRAGMENT_UNIT).min(4);
            self.align_to_byte()?;
            self.pack_bits(0xC0 | units as u64, 8)?;
            pack_items(self, start..start + units * FRAGMENT_UNIT)?;
            start += units * FRAGMENT_UNIT;
        }
    }

    // ---- strings ----

    /// Encode an OCTET STRING (X.691 §17)
    ///
    /// Fixed sizes up to two octets are not aligned.
    pub fn pack_octet_string(&mut self, data: &[u8], size: &SizeConstraint) -> CodecResult<()> {
        let align = !(size.is_fixed() && size.lb <= 2);
        self.pack_sized(data.len(), size, align, |enc, range| enc.pack_bytes(&data[range]))
    }

    /// Encode a BIT STRING (X.691 §16)
    ///
    /// Fixed sizes up to 16 bits are not aligned.
    pub fn pack_bit_string(&mut self, bits: &BitString, size: &SizeConstraint) -> CodecResult<()> {
        let align = !(size.is_fixed() && size.lb <= 16);
        self.pack_sized(bits.num_bits(), size, align, |enc, range| {
            enc.pack_bit_slice(bits, range)
        })
    }

    /// Encode a PrintableString (X.691 §30, 8 bits per character)
    pub fn pack_printable_string(&mut self, value: &str, size: &SizeConstraint) -> CodecResult<()> {
        if let Some(bad) = value.chars().find(|c| !is_printable_char(*c)) {
            return Err(CodecError::InvalidEncoding(format!(
                "character {:?} not allowed in PrintableString",
                bad
            )));
        }
        let bytes = value.as_bytes();
        let align = size.ub.is_none_or(|ub| ub * 8 > 16);
        self.pack_sized(bytes.len(), size, align, |enc, range| enc.pack_bytes(&bytes[range]))
    }

    // ---- open types ----

    /// Encode raw octets as an open type
    ///
    /// An empty encoding is replaced by a single zero octet.
    pub fn pack_open_type_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        let bytes: &[u8] = if bytes.is_empty() { &[0] } else { bytes };
        self.pack_sized(bytes.len(), &SizeConstraint::UNCONSTRAINED, true, |enc, range| {
            enc.pack_bytes(&bytes[range])
        })
    }
}
