//! ASN.1 aligned PER codec for O-RAN E2 service models
//!
//! This crate provides the aligned-PER (X.691) encoder and decoder, the
//! schema macros that turn ASN.1 type definitions into Rust types with
//! `Pack`/`Unpack` implementations, and the E2SM information elements
//! built with them.
//!
//! # Usage Example
//!
//! ```rust
//! use ran_asn1::e2sm::rc::E2smRcControlHeader;
//! use ran_asn1::per::{decode, encode};
//!
//! let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x0f, 0x11, 0x00,
//!              0x00, 0x00, 0x01, 0x02, 0x00, 0x00, 0x05];
//! let header: E2smRcControlHeader = decode(&bytes)?;
//! let format1 = header.ric_control_header_formats.control_header_format1();
//! assert_eq!(format1.ric_style_type, 2);
//! assert_eq!(format1.ric_control_action_id.value(), 6);
//! assert_eq!(&encode(&header)?[..], &bytes[..]);
//! # Ok::<(), ran_asn1::CodecError>(())
//! ```

pub mod per;
pub mod json;
#[macro_use]
mod macros;
pub mod e2sm;

pub use ran_core::{CodecError, CodecResult};
pub use ran_core::datatypes::*;
pub use per::{decode, encode, Pack, PerDecoder, PerEncoder, Unpack};
pub use json::ToJson;
