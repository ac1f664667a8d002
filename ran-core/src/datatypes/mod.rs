//! Value types of the ASN.1 data model

pub mod integer;
pub mod bit_string;
pub mod octet_string;
pub mod printable_string;
pub mod real;
pub mod array;
pub mod unknown;

// Re-export types
pub use integer::ConstrainedInteger;
pub use bit_string::{BitString, BoundedBitString, FixedBitString};
pub use octet_string::{FixedOctetString, OctetString};
pub use printable_string::PrintableString;
pub use real::Real;
pub use array::{BoundedArray, DynArray};
pub use unknown::UnknownAlternative;
