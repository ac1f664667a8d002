//! Core types for the RAN ASN.1 codec
//!
//! This crate holds the value types every generated information element is
//! built from, together with the codec error taxonomy. It carries no encoding
//! logic: the aligned-PER rules live in `ran-asn1`, which implements its
//! `Pack`/`Unpack` traits for the types defined here.
//!
//! # Value types
//!
//! - [`ConstrainedInteger`]: INTEGER with compile-time `[LB, UB]` bounds
//! - [`BitString`], [`FixedBitString`], [`BoundedBitString`]: BIT STRING
//! - [`OctetString`], [`FixedOctetString`]: OCTET STRING
//! - [`PrintableString`]: PrintableString
//! - [`Real`]: REAL
//! - [`DynArray`], [`BoundedArray`]: SEQUENCE OF
//! - [`UnknownAlternative`]: placeholder for CHOICE alternatives this schema
//!   version does not know

pub mod error;
pub mod datatypes;

pub use error::{CodecError, CodecResult};
pub use datatypes::*;
