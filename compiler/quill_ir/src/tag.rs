//! Type kind tag.
//!
//! Each pool item carries a `Tag`; the tag decides how its `data` word is
//! read.
//!
//! # Tag Ranges
//!
//! - 0-15: Builtins (data = bit width or unused)
//! - 16-31: Single-child types (data = child Idx or packed key)
//! - 32-63: Structural types (data = extra index)
//! - 64-79: Sugar (data = extra index, first extra word is the singly-desugared type)

use std::fmt;

/// Type kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Tag {
    // === Builtins (0-15) ===
    /// The empty tuple.
    EmptyTuple = 0,
    /// Fixed-width builtin integer; data = bit width.
    BuiltinInt = 1,
    /// Builtin IEEE float; data = bit width.
    BuiltinFloat = 2,
    /// Pointer-sized builtin integer.
    BuiltinWord = 3,
    RawPointer = 4,
    NativeObject = 5,
    UnknownObject = 6,
    BridgeObject = 7,

    // === Single-child types (16-31) ===
    /// `T.Type`; data = instance type.
    Metatype = 16,
    /// `P.Type` for an existential `P`; data = existential type.
    ExistentialMetatype = 17,
    /// Generic parameter; data = `depth << 16 | index`.
    GenericParam = 18,

    // === Structural types (32-63) ===
    /// Non-generic nominal; extra = `[decl, parent]`.
    Nominal = 32,
    /// Generic nominal with arguments; extra = `[decl, parent, args...]`.
    BoundGeneric = 33,
    /// Tuple with two or more elements, or a labeled single element;
    /// extra = `[(label, ty)...]`.
    Tuple = 34,
    /// Function type; extra = `[ext_info, (ty, flags)..., result]`.
    Function = 35,
    /// Lowered function type with conventions.
    ImplFunction = 36,
    /// Protocol composition; extra = `[superclass, any_object, protocols...]`.
    Existential = 37,
    /// Associated-type member of a type parameter; extra = `[base, assoc_decl]`.
    DependentMember = 38,
    /// Opaque result type; extra = `[opaque_decl, ordinal, args...]`.
    Opaque = 39,

    // === Sugar (64-79) ===
    /// Reference through a type alias; extra = `[underlying, alias_decl]`.
    Alias = 64,
    /// Parenthesized type; extra = `[inner]`.
    Paren = 65,
    /// `T?`; extra = `[desugared, inner]`.
    OptionalSugar = 66,
    /// `[T]`; extra = `[desugared, element]`.
    ArraySugar = 67,
    /// `[K: V]`; extra = `[desugared, key, value]`.
    DictionarySugar = 68,
}

impl Tag {
    /// Check if `data` indexes the extra array.
    #[inline]
    pub const fn uses_extra(self) -> bool {
        (self as u8) >= 32
    }

    #[inline]
    pub const fn is_builtin(self) -> bool {
        (self as u8) < 16
    }

    /// Check if this tag only exists in as-written (non-canonical) types.
    #[inline]
    pub const fn is_sugar(self) -> bool {
        matches!(self as u8, 64..=79)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Tag::EmptyTuple => "empty-tuple",
            Tag::BuiltinInt => "builtin-int",
            Tag::BuiltinFloat => "builtin-float",
            Tag::BuiltinWord => "builtin-word",
            Tag::RawPointer => "raw-pointer",
            Tag::NativeObject => "native-object",
            Tag::UnknownObject => "unknown-object",
            Tag::BridgeObject => "bridge-object",
            Tag::Metatype => "metatype",
            Tag::ExistentialMetatype => "existential-metatype",
            Tag::GenericParam => "generic-param",
            Tag::Nominal => "nominal",
            Tag::BoundGeneric => "bound-generic",
            Tag::Tuple => "tuple",
            Tag::Function => "function",
            Tag::ImplFunction => "impl-function",
            Tag::Existential => "existential",
            Tag::DependentMember => "dependent-member",
            Tag::Opaque => "opaque",
            Tag::Alias => "alias",
            Tag::Paren => "paren",
            Tag::OptionalSugar => "optional-sugar",
            Tag::ArraySugar => "array-sugar",
            Tag::DictionarySugar => "dictionary-sugar",
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
