//! Cached type properties and declaration/parameter attribute sets.
//!
//! `TypeFlags` are computed once when a type is interned, so "does this
//! type contain sugar / type parameters" is an O(1) query.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed type properties.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        // === Presence Flags (bits 0-7) ===

        /// Contains sugar somewhere in its structure.
        const HAS_SUGAR = 1 << 0;
        /// Contains a generic parameter.
        const HAS_TYPE_PARAM = 1 << 1;
        /// Contains a dependent member type.
        const HAS_DEPENDENT_MEMBER = 1 << 2;
        /// Contains an opaque result type.
        const HAS_OPAQUE = 1 << 3;

        // === Category Flags (bits 8-15) ===

        /// Builtin type.
        const IS_BUILTIN = 1 << 8;
        /// Nominal or bound generic type.
        const IS_NOMINAL = 1 << 9;
        /// Function or lowered function type.
        const IS_FUNCTION = 1 << 10;
        /// Tuple, including the empty tuple.
        const IS_TUPLE = 1 << 11;
        /// Protocol composition.
        const IS_EXISTENTIAL = 1 << 12;
    }
}

impl TypeFlags {
    /// Flags inherited by a compound type from its children.
    pub const PROPAGATE_MASK: Self = Self::HAS_SUGAR
        .union(Self::HAS_TYPE_PARAM)
        .union(Self::HAS_DEPENDENT_MEMBER)
        .union(Self::HAS_OPAQUE);

    /// Check if this type depends on a generic context.
    #[inline]
    pub const fn is_dependent(self) -> bool {
        self.intersects(Self::HAS_TYPE_PARAM.union(Self::HAS_DEPENDENT_MEMBER))
    }
}

bitflags! {
    /// Attributes of a single function parameter.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct ParamFlags: u32 {
        const INOUT = 1 << 0;
        const VARIADIC = 1 << 1;
        const AUTOCLOSURE = 1 << 2;
        const OWNED = 1 << 3;
        const SHARED = 1 << 4;
    }
}

bitflags! {
    /// Declaration attributes the mangler observes.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DeclFlags: u32 {
        /// Static/class member.
        const STATIC = 1 << 0;
        /// Exposed to the foreign object runtime under its runtime name.
        const FOREIGN_VISIBLE = 1 << 1;
        /// Compiler-synthesized.
        const IMPLICIT = 1 << 2;
    }
}
