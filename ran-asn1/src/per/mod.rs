//! ASN.1 Packed Encoding Rules, aligned variant
//!
//! This module implements the bit-level codec every information element of
//! this crate is built on (ITU-T X.691, ALIGNED variant as profiled by 3GPP
//! and O-RAN).
//!
//! # Layers
//!
//! 1. **Bit cursor**: [`PerEncoder`] appends bits to a growable buffer,
//!    [`PerDecoder`] reads them back from a borrowed one. Both align to
//!    octet boundaries where the aligned variant requires it.
//! 2. **Primitive codecs**: constrained, semi-constrained and unconstrained
//!    whole numbers, length determinants (with fragmentation), BIT STRING,
//!    OCTET STRING, PrintableString, REAL.
//! 3. **Composite codecs**: CHOICE and ENUMERATED indices, SEQUENCE
//!    extension additions, SEQUENCE OF, open types.
//! 4. **Contract**: [`Pack`] and [`Unpack`], implemented for the value types
//!    of `ran-core` and, through the schema macros, for every SEQUENCE,
//!    CHOICE and ENUMERATED.
//!
//! # Alignment Rules
//!
//! | item                                  | aligned?                      |
//! |---------------------------------------|-------------------------------|
//! | constrained whole number, range ≤ 255 | no                            |
//! | constrained whole number, range ≥ 256 | yes                           |
//! | unconstrained length determinant      | yes                           |
//! | BIT STRING, fixed ≤ 16 bits           | no                            |
//! | OCTET STRING, fixed ≤ 2 octets        | no                            |
//! | other string contents                 | yes, when not empty           |
//! | SEQUENCE OF components                | no                            |
//!
//! The codec never logs and never suspends: `pack` and `unpack` are plain
//! synchronous transforms over their own buffer.

pub mod types;
pub mod encoder;
pub mod decoder;
pub mod codec;
pub mod choice;
pub mod sequence;
pub mod sequence_of;
pub mod real;

pub use types::{Constraint, SizeConstraint, FRAGMENT_UNIT};
pub use encoder::PerEncoder;
pub use decoder::{PerDecoder, MAX_NESTING_DEPTH};
pub use codec::{decode, encode, Pack, Unpack};
pub use choice::ChoiceIndex;
pub use sequence::ExtensionAdditions;
