use thiserror::Error;

/// Error type for aligned-PER packing and unpacking
///
/// Composite codecs propagate the first inner failure unchanged, so the
/// variant reported by a top-level `unpack` is the one raised by the
/// primitive that actually failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Write cursor exceeded the buffer limit, or read cursor ran past the
    /// available bits
    #[error("Buffer overflow: need {needed} bits, have {available}")]
    BufferOverflow { needed: usize, available: usize },

    /// Integer or enumerated index outside its declared range
    #[error("Value {value} out of range {lb}..={ub}")]
    OutOfRange { value: i64, lb: i64, ub: i64 },

    /// SEQUENCE OF, BIT STRING or OCTET STRING length outside its SIZE bounds
    #[error("Size {size} out of range {lb}..={ub}")]
    SizeOutOfRange { size: usize, lb: usize, ub: usize },

    /// Extension bitmap or open type length inconsistent with its contents
    #[error("Malformed extension: {0}")]
    MalformedExtension(String),

    /// CHOICE index outside the root set of a non-extensible CHOICE
    #[error("Unknown alternative {index} of {type_name}")]
    UnknownChoiceAlternative { type_name: &'static str, index: usize },

    /// Values nested deeper than the decoder accepts
    #[error("Nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Contents that cannot belong to the declared type
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

impl CodecError {
    pub(crate) fn out_of_range(value: i64, lb: i64, ub: i64) -> Self {
        CodecError::OutOfRange { value, lb, ub }
    }

    pub(crate) fn size_out_of_range(size: usize, lb: usize, ub: usize) -> Self {
        CodecError::SizeOutOfRange { size, lb, ub }
    }
}
