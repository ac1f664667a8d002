//! Schema macros
//!
//! Information elements are declared with these macros instead of writing
//! `pack`/`unpack` by hand for every SEQUENCE, CHOICE and ENUMERATED. Each
//! macro emits the Rust type and its [`Pack`](crate::per::Pack) /
//! [`Unpack`](crate::per::Unpack) implementations following the aligned
//! PER rules of [`per`](crate::per).
//!
//! # SEQUENCE
//!
//! ```rust
//! use ran_asn1::{per_sequence, ConstrainedInteger, FixedOctetString};
//!
//! per_sequence! {
//!     #[derive(Debug, Clone, PartialEq, Default)]
//!     pub struct Snssai {
//!         pub sst: req FixedOctetString<1>,
//!         pub sd: opt FixedOctetString<3>,
//!     }
//!     extensions {
//!         pub priority: ConstrainedInteger<0, 15>,
//!     }
//! }
//!
//! let value = Snssai { sst: FixedOctetString::new([1]), ..Default::default() };
//! let bytes = ran_asn1::per::encode(&value)?;
//! assert_eq!(ran_asn1::per::decode::<Snssai>(&bytes)?, value);
//! # Ok::<(), ran_asn1::CodecError>(())
//! ```
//!
//! Root components are `req` (mandatory) or `opt` (OPTIONAL or DEFAULT,
//! held as an `Option`). The `extensions` block makes the SEQUENCE
//! extensible; its entries are the extension additions in order, each one
//! a component or an extension group struct, always held as an `Option`.
//! A group is declared as a SEQUENCE without `extensions`; one whose
//! components are all absent is encoded as an absent addition.
//! Derives are left to the caller.
//!
//! # CHOICE
//!
//! ```rust
//! use ran_asn1::{per_choice, FixedBitString};
//!
//! per_choice! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum NgEnbId: NgEnbIdType {
//!         MacroNgEnbId(FixedBitString<20>) => macro_ng_enb_id, set_macro_ng_enb_id;
//!         ShortMacroNgEnbId(FixedBitString<18>) => short_macro_ng_enb_id, set_short_macro_ng_enb_id;
//!     }
//!     extensions {}
//! }
//!
//! let mut id = NgEnbId::default();
//! id.set_short_macro_ng_enb_id();
//! assert_eq!(id.choice_type(), NgEnbIdType::ShortMacroNgEnbId);
//! ```
//!
//! Each alternative names its getter and its setter. Getters panic when
//! another alternative is active; check `choice_type()` first. Setters
//! switch to the alternative with a default value and return it mutably.
//! `Default` (first alternative) and `From` for every alternative type are
//! generated. An extensible CHOICE gains an `Unknown` variant holding
//! extension alternatives this schema does not define.
//!
//! # ENUMERATED
//!
//! ```rust
//! use ran_asn1::per_enumerated;
//!
//! per_enumerated! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub enum ControlDecision {
//!         Accept,
//!         Reject,
//!     }
//!     extensions {}
//! }
//!
//! assert_eq!(ControlDecision::default(), ControlDecision::Accept);
//! ```
//!
//! An extensible ENUMERATED gains `UnknownExtension(usize)`.

/// Declare a SEQUENCE
#[macro_export]
macro_rules! per_sequence {
    (@ty req $t:ty) => { $t };
    (@ty opt $t:ty) => { ::core::option::Option<$t> };

    (@pack_presence $enc:ident, $value:expr, req) => {};
    (@pack_presence $enc:ident, $value:expr, opt) => {
        $enc.pack_bit($value.is_some())?;
    };

    (@pack_field $enc:ident, $value:expr, req) => {
        $crate::per::Pack::pack(&$value, $enc)?;
    };
    (@pack_field $enc:ident, $value:expr, opt) => {
        if let ::core::option::Option::Some(value) = &$value {
            $crate::per::Pack::pack(value, $enc)?;
        }
    };

    (@absent $value:expr, req) => { false };
    (@absent $value:expr, opt) => { $value.is_none() };

    (@unpack_presence $dec:ident, req) => { true };
    (@unpack_presence $dec:ident, opt) => { $dec.unpack_bit()? };

    (@unpack_field $dec:ident, $present:ident, req) => {{
        let _ = $present;
        $crate::per::Unpack::unpack($dec)?
    }};
    (@unpack_field $dec:ident, $present:ident, opt) => {
        if $present {
            ::core::option::Option::Some($crate::per::Unpack::unpack($dec)?)
        } else {
            ::core::option::Option::None
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $presence:ident $fty:ty ),* $(,)?
        }
        extensions {
            $( $(#[$xmeta:meta])* $xvis:vis $xfield:ident : $xty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $crate::per_sequence!(@ty $presence $fty), )*
            $( $(#[$xmeta])* $xvis $xfield: ::core::option::Option<$xty>, )*
        }

        impl $crate::per::Pack for $name {
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                let additions: &[bool] = &[$(
                    self.$xfield
                        .as_ref()
                        .is_some_and(|value| !$crate::per::Pack::is_absent(value))
                ),*];
                let extended = additions.iter().any(|present| *present);
                encoder.pack_bit(extended)?;
                $( $crate::per_sequence!(@pack_presence encoder, self.$field, $presence); )*
                $( $crate::per_sequence!(@pack_field encoder, self.$field, $presence); )*
                if extended {
                    encoder.pack_extension_bitmap(additions)?;
                    $(
                        if let ::core::option::Option::Some(value) = self
                            .$xfield
                            .as_ref()
                            .filter(|value| !$crate::per::Pack::is_absent(*value))
                        {
                            encoder.pack_open_type(value)?;
                        }
                    )*
                }
                Ok(())
            }
        }

        impl $crate::per::Unpack for $name {
            #[allow(unused_mut)]
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                let extended = decoder.unpack_bit()?;
                $( let $field = $crate::per_sequence!(@unpack_presence decoder, $presence); )*
                $( let $field = $crate::per_sequence!(@unpack_field decoder, $field, $presence); )*
                $( let mut $xfield = ::core::option::Option::None; )*
                if extended {
                    let mut additions = $crate::per::ExtensionAdditions::unpack(decoder)?;
                    $( $xfield = additions.next(decoder)?; )*
                    additions.finish(decoder)?;
                }
                Ok(Self {
                    $( $field, )*
                    $( $xfield, )*
                })
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $presence:ident $fty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $crate::per_sequence!(@ty $presence $fty), )*
        }

        impl $crate::per::Pack for $name {
            #[allow(unused_variables)]
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                $( $crate::per_sequence!(@pack_presence encoder, self.$field, $presence); )*
                $( $crate::per_sequence!(@pack_field encoder, self.$field, $presence); )*
                Ok(())
            }

            fn is_absent(&self) -> bool {
                let absent: &[bool] = &[$( $crate::per_sequence!(@absent self.$field, $presence) ),*];
                !absent.is_empty() && absent.iter().all(|field| *field)
            }
        }

        impl $crate::per::Unpack for $name {
            #[allow(unused_variables)]
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                $( let $field = $crate::per_sequence!(@unpack_presence decoder, $presence); )*
                $( let $field = $crate::per_sequence!(@unpack_field decoder, $field, $presence); )*
                Ok(Self {
                    $( $field, )*
                })
            }
        }
    };
}

/// Declare a CHOICE
#[macro_export]
macro_rules! per_choice {
    (@accessors $name:ident, $variant:ident, $ty:ty, $getter:ident, $setter:ident) => {
        /// Get this alternative
        ///
        /// # Panics
        ///
        /// Panics when another alternative is set.
        #[allow(unreachable_patterns)]
        pub fn $getter(&self) -> &$ty {
            match self {
                Self::$variant(value) => value,
                other => panic!(
                    concat!(stringify!($name), "::", stringify!($getter), "() called while {:?} is set"),
                    other.choice_type()
                ),
            }
        }

        /// Switch to this alternative with a default value
        #[allow(unreachable_patterns)]
        pub fn $setter(&mut self) -> &mut $ty {
            *self = Self::$variant(::core::default::Default::default());
            match self {
                Self::$variant(value) => value,
                _ => unreachable!(),
            }
        }
    };

    (@common $name:ident, $first:ident $($others:ident)* ; $( $variant:ident : $ty:ty ),+) => {
        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first(::core::default::Default::default())
            }
        }

        $(
            impl ::core::convert::From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident ( $vty:ty ) => $getter:ident, $setter:ident; )+
        }
        extensions {
            $( $(#[$xmeta:meta])* $xvariant:ident ( $xty:ty ) => $xgetter:ident, $xsetter:ident; )*
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($vty), )+
            $( $(#[$xmeta])* $xvariant($xty), )*
            /// Extension alternative unknown to this schema version
            Unknown($crate::UnknownAlternative),
        }

        /// Discriminator of
        #[doc = concat!("[`", stringify!($name), "`]")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $kind {
            $( $variant, )+
            $( $xvariant, )*
            Unknown,
        }

        impl $name {
            /// Number of root alternatives
            pub const ROOT_ALTERNATIVES: usize = [$( stringify!($variant) ),+].len();

            /// Active alternative
            pub fn choice_type(&self) -> $kind {
                match self {
                    $( Self::$variant(_) => $kind::$variant, )+
                    $( Self::$xvariant(_) => $kind::$xvariant, )*
                    Self::Unknown(_) => $kind::Unknown,
                }
            }

            $( $crate::per_choice!(@accessors $name, $variant, $vty, $getter, $setter); )+
            $( $crate::per_choice!(@accessors $name, $xvariant, $xty, $xgetter, $xsetter); )*
        }

        $crate::per_choice!(@common $name, $($variant)+ ; $( $variant: $vty ),+ $(, $xvariant: $xty )*);

        impl $crate::per::Pack for $name {
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                match self {
                    $(
                        Self::$variant(value) => {
                            encoder.pack_choice_index($kind::$variant as usize, Self::ROOT_ALTERNATIVES, true)?;
                            $crate::per::Pack::pack(value, encoder)
                        }
                    )+
                    $(
                        Self::$xvariant(value) => {
                            encoder.pack_extension_index($kind::$xvariant as usize - Self::ROOT_ALTERNATIVES)?;
                            encoder.pack_open_type(value)
                        }
                    )*
                    Self::Unknown(unknown) => {
                        encoder.pack_extension_index(unknown.extension_index)?;
                        encoder.pack_open_type_bytes(unknown.data.as_bytes())
                    }
                }
            }
        }

        impl $crate::per::Unpack for $name {
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                let type_name = stringify!($name);
                decoder.nested(|decoder| {
                    match decoder.unpack_choice_index(type_name, Self::ROOT_ALTERNATIVES, true)? {
                        $crate::per::ChoiceIndex::Root(index) => {
                            $(
                                if index == $kind::$variant as usize {
                                    return Ok(Self::$variant($crate::per::Unpack::unpack(decoder)?));
                                }
                            )+
                            Err($crate::CodecError::UnknownChoiceAlternative { type_name, index })
                        }
                        $crate::per::ChoiceIndex::Extension(index) => {
                            $(
                                if index == $kind::$xvariant as usize - Self::ROOT_ALTERNATIVES {
                                    return Ok(Self::$xvariant(decoder.unpack_open_type()?));
                                }
                            )*
                            let data = decoder.unpack_open_type_bytes()?;
                            Ok(Self::Unknown($crate::UnknownAlternative::new(index, data)))
                        }
                    }
                })
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:ident {
            $( $(#[$vmeta:meta])* $variant:ident ( $vty:ty ) => $getter:ident, $setter:ident; )+
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($vty), )+
        }

        /// Discriminator of
        #[doc = concat!("[`", stringify!($name), "`]")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $kind {
            $( $variant, )+
        }

        impl $name {
            /// Number of root alternatives
            pub const ROOT_ALTERNATIVES: usize = [$( stringify!($variant) ),+].len();

            /// Active alternative
            pub fn choice_type(&self) -> $kind {
                match self {
                    $( Self::$variant(_) => $kind::$variant, )+
                }
            }

            $( $crate::per_choice!(@accessors $name, $variant, $vty, $getter, $setter); )+
        }

        $crate::per_choice!(@common $name, $($variant)+ ; $( $variant: $vty ),+);

        impl $crate::per::Pack for $name {
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                match self {
                    $(
                        Self::$variant(value) => {
                            encoder.pack_choice_index($kind::$variant as usize, Self::ROOT_ALTERNATIVES, false)?;
                            $crate::per::Pack::pack(value, encoder)
                        }
                    )+
                }
            }
        }

        impl $crate::per::Unpack for $name {
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                let type_name = stringify!($name);
                decoder.nested(|decoder| {
                    let index = match decoder.unpack_choice_index(type_name, Self::ROOT_ALTERNATIVES, false)? {
                        $crate::per::ChoiceIndex::Root(index) | $crate::per::ChoiceIndex::Extension(index) => index,
                    };
                    $(
                        if index == $kind::$variant as usize {
                            return Ok(Self::$variant($crate::per::Unpack::unpack(decoder)?));
                        }
                    )+
                    Err($crate::CodecError::UnknownChoiceAlternative { type_name, index })
                })
            }
        }
    };
}

/// Declare an ENUMERATED
#[macro_export]
macro_rules! per_enumerated {
    (@default $name:ident, $first:ident $($rest:ident)*) => {
        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self::$first
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
        extensions {
            $( $(#[$xmeta:meta])* $xvariant:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            $( $(#[$xmeta])* $xvariant, )*
            /// Extension value unknown to this schema version
            UnknownExtension(usize),
        }

        impl $name {
            /// Number of root values
            pub const ROOT_VALUES: usize = [$( stringify!($variant) ),+].len();

            /// Position of the value among the root or extension values
            pub fn index(&self) -> $crate::per::ChoiceIndex {
                #[allow(dead_code)]
                enum Root { $( $variant, )+ }
                #[allow(dead_code)]
                enum Extension { $( $xvariant, )* }
                match self {
                    $( Self::$variant => $crate::per::ChoiceIndex::Root(Root::$variant as usize), )+
                    $( Self::$xvariant => $crate::per::ChoiceIndex::Extension(Extension::$xvariant as usize), )*
                    Self::UnknownExtension(index) => $crate::per::ChoiceIndex::Extension(*index),
                }
            }
        }

        $crate::per_enumerated!(@default $name, $($variant)+);

        impl $crate::per::Pack for $name {
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                match self.index() {
                    $crate::per::ChoiceIndex::Root(index) => {
                        encoder.pack_enumerated(index, Self::ROOT_VALUES, true)
                    }
                    $crate::per::ChoiceIndex::Extension(index) => encoder.pack_extension_index(index),
                }
            }
        }

        impl $crate::per::Unpack for $name {
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                match decoder.unpack_enumerated(Self::ROOT_VALUES, true)? {
                    $crate::per::ChoiceIndex::Root(index) => [$( Self::$variant ),+]
                        .into_iter()
                        .nth(index)
                        .ok_or($crate::CodecError::OutOfRange {
                            value: index as i64,
                            lb: 0,
                            ub: Self::ROOT_VALUES as i64 - 1,
                        }),
                    $crate::per::ChoiceIndex::Extension(index) => Ok([$( Self::$xvariant ),*]
                        .into_iter()
                        .nth(index)
                        .unwrap_or(Self::UnknownExtension(index))),
                }
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Number of root values
            pub const ROOT_VALUES: usize = [$( stringify!($variant) ),+].len();

            /// Position of the value among the root values
            pub fn index(&self) -> $crate::per::ChoiceIndex {
                #[allow(dead_code)]
                enum Root { $( $variant, )+ }
                match self {
                    $( Self::$variant => $crate::per::ChoiceIndex::Root(Root::$variant as usize), )+
                }
            }
        }

        $crate::per_enumerated!(@default $name, $($variant)+);

        impl $crate::per::Pack for $name {
            fn pack(&self, encoder: &mut $crate::per::PerEncoder) -> $crate::CodecResult<()> {
                match self.index() {
                    $crate::per::ChoiceIndex::Root(index) | $crate::per::ChoiceIndex::Extension(index) => {
                        encoder.pack_enumerated(index, Self::ROOT_VALUES, false)
                    }
                }
            }
        }

        impl $crate::per::Unpack for $name {
            fn unpack(decoder: &mut $crate::per::PerDecoder<'_>) -> $crate::CodecResult<Self> {
                let index = match decoder.unpack_enumerated(Self::ROOT_VALUES, false)? {
                    $crate::per::ChoiceIndex::Root(index) | $crate::per::ChoiceIndex::Extension(index) => index,
                };
                [$( Self::$variant ),+]
                    .into_iter()
                    .nth(index)
                    .ok_or($crate::CodecError::OutOfRange {
                        value: index as i64,
                        lb: 0,
                        ub: Self::ROOT_VALUES as i64 - 1,
                    })
            }
        }
    };

}
