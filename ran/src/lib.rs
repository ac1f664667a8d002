//! RAN protocol stack: aligned PER codec and E2SM-RC RIC Control
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `ran-core`: codec value types and the codec error taxonomy
//! - `ran-asn1`: ASN.1 aligned PER encoder/decoder, schema macros and the
//!   E2SM information elements built with them
//! - `ran-e2`: E2SM-RC RIC Control service, executors and RAN parameter
//!   interpreters
//!
//! # Usage
//!
//! ```
//! use ran::asn1::e2sm::rc::E2smRcControlHeader;
//! use ran::{decode, encode};
//!
//! let bytes = [0x00, 0x00, 0x00, 0x00, 0x00, 0x0f, 0x11, 0x00, 0x00, 0x00, 0x01, 0x02, 0x00, 0x00, 0x05];
//! let header: E2smRcControlHeader = decode(&bytes)?;
//! assert_eq!(&encode(&header)?[..], &bytes[..]);
//! # Ok::<(), ran::CodecError>(())
//! ```

// Re-export core types
pub use ran_core::datatypes::*;
pub use ran_core::{CodecError, CodecResult};

// Re-export codec entry points
pub use ran_asn1::{decode, encode, Pack, PerDecoder, PerEncoder, ToJson, Unpack};

// Re-export the codec and its information elements
pub mod asn1 {
    pub use ran_asn1::*;
}

// Re-export the RIC Control service
pub mod e2 {
    pub use ran_e2::*;
}
