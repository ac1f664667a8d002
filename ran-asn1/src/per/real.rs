//! REAL encoding (X.691 §15, contents per X.690 §8.5)
//!
//! The contents octets are carried after an unconstrained length
//! determinant. Encoding always produces the canonical base-2 form: odd
//! mantissa, no scale factor, minimal exponent octets. Decoding accepts any
//! binary base (2, 8, 16), scale factors, long exponents and the ISO 6093
//! decimal forms NR1, NR2 and NR3.

use crate::per::{PerDecoder, PerEncoder, SizeConstraint};
use crate::per::types::octets_for_signed;
use ran_core::{CodecError, CodecResult};

const PLUS_INFINITY: u8 = 0x40;
const MINUS_INFINITY: u8 = 0x41;
const NOT_A_NUMBER: u8 = 0x42;
const MINUS_ZERO: u8 = 0x43;

impl PerEncoder {
    /// Encode a REAL
    pub fn pack_real(&mut self, value: f64) -> CodecResult<()> {
        let contents = real_contents(value);
        self.pack_octet_string(&contents, &SizeConstraint::UNCONSTRAINED)
    }
}

impl<'a> PerDecoder<'a> {
    /// Decode a REAL
    pub fn unpack_real(&mut self) -> CodecResult<f64> {
        let contents = self.unpack_octet_string(&SizeConstraint::UNCONSTRAINED)?;
        parse_real_contents(&contents)
    }
}

/// Contents octets of `value` in canonical base-2 form
pub fn real_contents(value: f64) -> Vec<u8> {
    if value.is_nan() {
        return vec![NOT_A_NUMBER];
    }
    if value.is_infinite() {
        return vec![if value > 0.0 { PLUS_INFINITY } else { MINUS_INFINITY }];
    }
    if value == 0.0 {
        return if value.is_sign_negative() { vec![MINUS_ZERO] } else { Vec::new() };
    }

    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7FF) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exponent += zeros as i64;

    let exponent_octets = octets_for_signed(exponent);
    let mut contents = Vec::with_capacity(1 + exponent_octets + 8);
    // binary encoding, base 2, scale factor 0
    let mut first = 0x80 | if negative { 0x40 } else { 0x00 };
    first |= match exponent_octets {
        1 => 0x00,
        2 => 0x01,
        _ => 0x02,
    };
    contents.push(first);
    for i in (0..exponent_octets).rev() {
        contents.push((exponent >> (8 * i)) as u8);
    }
    let mantissa_octets = (64 - mantissa.leading_zeros() as usize).div_ceil(8);
    for i in (0..mantissa_octets).rev() {
        contents.push((mantissa >> (8 * i)) as u8);
    }
    contents
}

/// Interpret REAL contents octets
pub fn parse_real_contents(contents: &[u8]) -> CodecResult<f64> {
    let Some((&first, rest)) = contents.split_first() else {
        return Ok(0.0);
    };

    if first & 0x80 != 0 {
        return parse_binary(first, rest);
    }
    if first & 0x40 != 0 {
        if !rest.is_empty() {
            return Err(invalid("special REAL value with trailing octets"));
        }
        return match first {
            PLUS_INFINITY => Ok(f64::INFINITY),
            MINUS_INFINITY => Ok(f64::NEG_INFINITY),
            NOT_A_NUMBER => Ok(f64::NAN),
            MINUS_ZERO => Ok(-0.0),
            other => Err(invalid(&format!("reserved special REAL value 0x{:02X}", other))),
        };
    }
    parse_decimal(first & 0x3F, rest)
}

fn parse_binary(first: u8, rest: &[u8]) -> CodecResult<f64> {
    let negative = first & 0x40 != 0;
    let log2_base = match (first >> 4) & 0x03 {
        0 => 1,
        1 => 3,
        2 => 4,
        _ => return Err(invalid("reserved REAL base")),
    };
    let scale = ((first >> 2) & 0x03) as i64;

    let (exponent_len, rest) = match first & 0x03 {
        3 => {
            let (&len, rest) = rest
                .split_first()
                .ok_or_else(|| invalid("missing REAL exponent length"))?;
            (len as usize, rest)
        }
        n => (n as usize + 1, rest),
    };
    if exponent_len == 0 || exponent_len > 8 || rest.len() < exponent_len {
        return Err(invalid("REAL exponent does not fit"));
    }
    let (exponent_octets, mantissa_octets) = rest.split_at(exponent_len);
    let raw = exponent_octets.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64);
    let shift = 64 - 8 * exponent_len;
    let exponent = ((raw << shift) as i64) >> shift;

    let mut mantissa = 0.0f64;
    for octet in mantissa_octets {
        mantissa = mantissa * 256.0 + *octet as f64;
    }

    let power = exponent
        .checked_mul(log2_base)
        .and_then(|e| e.checked_add(scale))
        .ok_or_else(|| invalid("REAL exponent overflow"))?;
    let magnitude = scale_by_power_of_two(mantissa, power);
    Ok(if negative { -magnitude } else { magnitude })
}

/// `mantissa * 2^power` without overflowing intermediate results
fn scale_by_power_of_two(mut mantissa: f64, mut power: i64) -> f64 {
    if mantissa == 0.0 {
        return 0.0;
    }
    while power > 1000 {
        mantissa *= 2f64.powi(1000);
        power -= 1000;
        if mantissa.is_infinite() {
            return mantissa;
        }
    }
    while power < -1000 {
        mantissa *= 2f64.powi(-1000);
        power += 1000;
        if mantissa == 0.0 {
            return mantissa;
        }
    }
    mantissa * 2f64.powi(power as i32)
}

fn parse_decimal(form: u8, rest: &[u8]) -> CodecResult<f64> {
    if !(1..=3).contains(&form) {
        return Err(invalid(&format!("unknown decimal REAL form {}", form)));
    }
    let text = std::str::from_utf8(rest).map_err(|_| invalid("decimal REAL is not ASCII"))?;
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '.' | ',' | 'e' | 'E');
    if !text.chars().all(allowed) {
        return Err(invalid("illegal character in decimal REAL"));
    }
    let normalized: String = text.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|_| invalid(&format!("malformed decimal REAL {:?}", text)))
}

fn invalid(message: &str) -> CodecError {
    CodecError::InvalidEncoding(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_contents() {
        assert_eq!(real_contents(0.0), Vec::<u8>::new());
        assert_eq!(real_contents(-0.0), vec![MINUS_ZERO]);
        assert_eq!(real_contents(f64::INFINITY), vec![PLUS_INFINITY]);
        assert_eq!(real_contents(f64::NEG_INFINITY), vec![MINUS_INFINITY]);
        assert_eq!(real_contents(f64::NAN), vec![NOT_A_NUMBER]);
        // 1.0 = 1 * 2^0
        assert_eq!(real_contents(1.0), vec![0x80, 0x00, 0x01]);
        // 0.5 = 1 * 2^-1
        assert_eq!(real_contents(0.5), vec![0x80, 0xFF, 0x01]);
        // -12.0 = -3 * 2^2
        assert_eq!(real_contents(-12.0), vec![0xC0, 0x02, 0x03]);
    }

    #[test]
    fn test_round_trip_values() {
        for value in [1.0, -12.0, 0.1, 1e300, -2.5e-310, f64::MAX, f64::MIN_POSITIVE, 3.0e-324] {
            let decoded = parse_real_contents(&real_contents(value)).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits(), "value {}", value);
        }
        assert!(parse_real_contents(&real_contents(f64::NAN)).unwrap().is_nan());
        assert!(parse_real_contents(&[MINUS_ZERO]).unwrap().is_sign_negative());
    }

    #[test]
    fn test_non_canonical_binary_forms() {
        // base 16, exponent 1, mantissa 3: 3 * 16 = 48
        assert_eq!(parse_real_contents(&[0xA0, 0x01, 0x03]).unwrap(), 48.0);
        // base 8, scale factor 1, exponent 1, mantissa 1: 1 * 2 * 8 = 16
        assert_eq!(parse_real_contents(&[0x94, 0x01, 0x01]).unwrap(), 16.0);
        // long exponent form: one exponent octet announced explicitly
        assert_eq!(parse_real_contents(&[0x83, 0x01, 0x02, 0x05]).unwrap(), 20.0);
    }

    #[test]
    fn test_decimal_forms() {
        assert_eq!(parse_real_contents(b"\x01  -123").unwrap(), -123.0);
        assert_eq!(parse_real_contents(b"\x02 12,5").unwrap(), 12.5);
        assert_eq!(parse_real_contents(b"\x03 125.E-1").unwrap(), 12.5);
        assert!(parse_real_contents(b"\x03inf").is_err());
        assert!(parse_real_contents(b"\x04 1").is_err());
    }

    #[test]
    fn test_reserved_encodings() {
        assert!(parse_real_contents(&[0xB0, 0x00, 0x01]).is_err());
        assert!(parse_real_contents(&[0x44]).is_err());
        assert!(parse_real_contents(&[0x80]).is_err());
    }

    #[test]
    fn test_pack_real() {
        let mut encoder = PerEncoder::new();
        encoder.pack_real(1.0).unwrap();
        let bytes = encoder.into_bytes();
        assert_eq!(&bytes[..], &[0x03, 0x80, 0x00, 0x01]);
        let mut decoder = PerDecoder::new(&bytes);
        assert_eq!(decoder.unpack_real().unwrap(), 1.0);
    }
}
