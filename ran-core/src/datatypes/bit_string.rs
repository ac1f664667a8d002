//! BIT STRING types

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Arbitrary string of bits (zeros and ones), most significant bit first.
///
/// A bit string value can have any length including zero. Bits past
/// `num_bits` in the last byte are kept at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString {
    bytes: Vec<u8>,
    num_bits: usize,
}

impl BitString {
    /// Construct a new bit string object.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The bit string as a byte array
    /// * `num_bits` - The number of bits
    ///
    /// # Errors
    ///
    /// Returns an error if `num_bits > bytes.len() * 8`.
    pub fn new(mut bytes: Vec<u8>, num_bits: usize) -> CodecResult<Self> {
        if num_bits > bytes.len() * 8 {
            return Err(CodecError::size_out_of_range(
                bytes.len() * 8,
                num_bits,
                num_bits,
            ));
        }
        bytes.truncate(num_bits.div_ceil(8));
        let mut bit_string = Self { bytes, num_bits };
        bit_string.clear_unused_bits();
        Ok(bit_string)
    }

    /// Create an all-zero bit string of `num_bits` bits
    pub fn zeros(num_bits: usize) -> Self {
        Self {
            bytes: vec![0; num_bits.div_ceil(8)],
            num_bits,
        }
    }

    /// Create a bit string holding the low `num_bits` bits of `value`
    ///
    /// # Errors
    ///
    /// Returns an error if `num_bits > 64` or `value` does not fit.
    pub fn from_number(value: u64, num_bits: usize) -> CodecResult<Self> {
        if num_bits > 64 {
            return Err(CodecError::size_out_of_range(num_bits, 0, 64));
        }
        if num_bits < 64 && value >> num_bits != 0 {
            return Err(CodecError::InvalidEncoding(format!(
                "value {} does not fit in {} bits",
                value, num_bits
            )));
        }
        let mut bit_string = Self::zeros(num_bits);
        for index in 0..num_bits {
            let bit = (value >> (num_bits - 1 - index)) & 1 == 1;
            bit_string.put(index, bit);
        }
        Ok(bit_string)
    }

    /// Interpret the bits as an unsigned number, first bit most significant
    pub fn to_number(&self) -> CodecResult<u64> {
        if self.num_bits > 64 {
            return Err(CodecError::size_out_of_range(self.num_bits, 0, 64));
        }
        Ok(self.iter().fold(0u64, |acc, bit| (acc << 1) | bit as u64))
    }

    /// Get the bit string as byte array.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The number of bits in the byte array.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// Alias of [`BitString::num_bits`]
    pub fn len(&self) -> usize {
        self.num_bits
    }

    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Get the bit at a specific position
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds
    pub fn get_bit(&self, index: usize) -> CodecResult<bool> {
        if index >= self.num_bits {
            return Err(CodecError::out_of_range(
                index as i64,
                0,
                self.num_bits as i64 - 1,
            ));
        }
        Ok((self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    /// Set the bit at a specific position
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds
    pub fn set_bit(&mut self, index: usize, value: bool) -> CodecResult<()> {
        if index >= self.num_bits {
            return Err(CodecError::out_of_range(
                index as i64,
                0,
                self.num_bits as i64 - 1,
            ));
        }
        self.put(index, value);
        Ok(())
    }

    /// Append one bit at the end
    pub fn push(&mut self, value: bool) {
        if self.num_bits % 8 == 0 {
            self.bytes.push(0);
        }
        self.num_bits += 1;
        self.put(self.num_bits - 1, value);
    }

    /// Iterate over the bits, first bit first
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.num_bits).map(move |index| (self.bytes[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    fn put(&mut self, index: usize, value: bool) {
        let mask = 1 << (7 - index % 8); // MSB first
        if value {
            self.bytes[index / 8] |= mask;
        } else {
            self.bytes[index / 8] &= !mask;
        }
    }

    fn clear_unused_bits(&mut self) {
        let used = self.num_bits % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut bit_string = BitString::default();
        for bit in iter {
            bit_string.push(bit);
        }
        bit_string
    }
}

impl FromStr for BitString {
    type Err = CodecError;

    /// Parse a string of `'0'` and `'1'` characters
    fn from_str(s: &str) -> CodecResult<Self> {
        s.chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(CodecError::InvalidEncoding(format!(
                    "invalid bit character '{}'",
                    other
                ))),
            })
            .collect()
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// BIT STRING (SIZE(N))
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedBitString<const N: usize>(BitString);

impl<const N: usize> FixedBitString<N> {
    /// Number of bits
    pub const SIZE: usize = N;

    /// Create an all-zero value
    pub fn new() -> Self {
        Self(BitString::zeros(N))
    }

    /// Create from the low `N` bits of `value`
    pub fn from_number(value: u64) -> CodecResult<Self> {
        BitString::from_number(value, N).map(Self)
    }

    pub fn to_number(&self) -> CodecResult<u64> {
        self.0.to_number()
    }

    pub fn as_bit_string(&self) -> &BitString {
        &self.0
    }

    pub fn get_bit(&self, index: usize) -> CodecResult<bool> {
        self.0.get_bit(index)
    }

    pub fn set_bit(&mut self, index: usize, value: bool) -> CodecResult<()> {
        self.0.set_bit(index, value)
    }
}

impl<const N: usize> Default for FixedBitString<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TryFrom<BitString> for FixedBitString<N> {
    type Error = CodecError;

    fn try_from(value: BitString) -> CodecResult<Self> {
        if value.num_bits() != N {
            return Err(CodecError::size_out_of_range(value.num_bits(), N, N));
        }
        Ok(Self(value))
    }
}

impl<const N: usize> FromStr for FixedBitString<N> {
    type Err = CodecError;

    fn from_str(s: &str) -> CodecResult<Self> {
        s.parse::<BitString>()?.try_into()
    }
}

impl<const N: usize> fmt::Display for FixedBitString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<const N: usize> Serialize for FixedBitString<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// BIT STRING (SIZE(LB..UB))
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundedBitString<const LB: usize, const UB: usize>(BitString);

impl<const LB: usize, const UB: usize> BoundedBitString<LB, UB> {
    /// Wrap a bit string whose length lies in `[LB, UB]`
    pub fn new(bits: BitString) -> CodecResult<Self> {
        if !(LB..=UB).contains(&bits.num_bits()) {
            return Err(CodecError::size_out_of_range(bits.num_bits(), LB, UB));
        }
        Ok(Self(bits))
    }

    /// Create from the low `num_bits` bits of `value`
    pub fn from_number(value: u64, num_bits: usize) -> CodecResult<Self> {
        Self::new(BitString::from_number(value, num_bits)?)
    }

    pub fn as_bit_string(&self) -> &BitString {
        &self.0
    }

    pub fn into_inner(self) -> BitString {
        self.0
    }
}

impl<const LB: usize, const UB: usize> Default for BoundedBitString<LB, UB> {
    fn default() -> Self {
        Self(BitString::zeros(LB))
    }
}

impl<const LB: usize, const UB: usize> fmt::Display for BoundedBitString<LB, UB> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<const LB: usize, const UB: usize> Serialize for BoundedBitString<LB, UB> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_new() {
        let bytes = vec![0xFF, 0x00, 0xAA];
        let bit_string = BitString::new(bytes.clone(), 24).unwrap();
        assert_eq!(bit_string.as_bytes(), &bytes);
        assert_eq!(bit_string.num_bits(), 24);
    }

    #[test]
    fn test_bit_string_invalid() {
        let result = BitString::new(vec![0xFF], 16);
        assert!(result.is_err());
    }

    #[test]
    fn test_bit_string_partial_byte_is_masked() {
        let bit_string = BitString::new(vec![0xFF], 4).unwrap();
        assert_eq!(bit_string.num_bits(), 4);
        assert_eq!(bit_string.as_bytes(), &[0xF0]);
    }

    #[test]
    fn test_bit_string_number_round_trip() {
        let bit_string = BitString::from_number(0b1011, 6).unwrap();
        assert_eq!(bit_string.to_string(), "001011");
        assert_eq!(bit_string.to_number().unwrap(), 0b1011);
        assert!(BitString::from_number(0b1000, 3).is_err());
    }

    #[test]
    fn test_bit_string_push_and_parse() {
        let parsed: BitString = "101000001".parse().unwrap();
        assert_eq!(parsed.num_bits(), 9);
        assert_eq!(parsed.as_bytes(), &[0xA0, 0x80]);
        assert!(parsed.get_bit(8).unwrap());
        assert!(parsed.get_bit(9).is_err());
    }

    #[test]
    fn test_fixed_bit_string_size() {
        let pointer = FixedBitString::<6>::from_number(5).unwrap();
        assert_eq!(pointer.to_string(), "000101");
        let wrong: CodecResult<FixedBitString<6>> = "0101".parse();
        assert_eq!(
            wrong,
            Err(CodecError::SizeOutOfRange { size: 4, lb: 6, ub: 6 })
        );
    }

    #[test]
    fn test_bounded_bit_string_bounds() {
        assert!(BoundedBitString::<22, 32>::from_number(1, 22).is_ok());
        assert!(BoundedBitString::<22, 32>::from_number(1, 21).is_err());
        assert_eq!(BoundedBitString::<22, 32>::default().as_bit_string().num_bits(), 22);
    }
}
