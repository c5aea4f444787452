//! Type index handle.
//!
//! Every type lives in the [`Pool`](crate::Pool) and is referenced by a
//! 32-bit `Idx`. Structurally identical types share an index, so type
//! identity is index equality.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Builtin Types (indices 0-11) ===
    // Pre-interned at pool creation.

    /// The empty tuple `()`.
    pub const EMPTY_TUPLE: Self = Self(0);
    /// `Builtin.Int8`.
    pub const INT8: Self = Self(1);
    /// `Builtin.Int16`.
    pub const INT16: Self = Self(2);
    /// `Builtin.Int32`.
    pub const INT32: Self = Self(3);
    /// `Builtin.Int64`.
    pub const INT64: Self = Self(4);
    /// `Builtin.Word`, the pointer-sized integer.
    pub const WORD: Self = Self(5);
    /// `Builtin.FPIEEE32`.
    pub const FLOAT32: Self = Self(6);
    /// `Builtin.FPIEEE64`.
    pub const FLOAT64: Self = Self(7);
    /// `Builtin.RawPointer`.
    pub const RAW_POINTER: Self = Self(8);
    /// `Builtin.NativeObject`.
    pub const NATIVE_OBJECT: Self = Self(9);
    /// `Builtin.UnknownObject`.
    pub const UNKNOWN_OBJECT: Self = Self(10);
    /// `Builtin.BridgeObject`.
    pub const BRIDGE_OBJECT: Self = Self(11);

    /// Number of pre-interned builtin types.
    pub const PRIMITIVE_COUNT: u32 = 12;

    /// First index for dynamically interned types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    /// Sentinel for "no type" in packed pool words.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a pre-interned builtin type.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Decode a packed optional type word.
    #[inline]
    pub const fn from_optional_raw(raw: u32) -> Option<Self> {
        if raw == u32::MAX {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Encode an optional type as a packed pool word.
    #[inline]
    pub const fn optional_raw(idx: Option<Self>) -> u32 {
        match idx {
            Some(idx) => idx.0,
            None => u32::MAX,
        }
    }

    /// Human-readable name for builtin types.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("()"),
            1 => Some("Builtin.Int8"),
            2 => Some("Builtin.Int16"),
            3 => Some("Builtin.Int32"),
            4 => Some("Builtin.Int64"),
            5 => Some("Builtin.Word"),
            6 => Some("Builtin.FPIEEE32"),
            7 => Some("Builtin.FPIEEE64"),
            8 => Some("Builtin.RawPointer"),
            9 => Some("Builtin.NativeObject"),
            10 => Some("Builtin.UnknownObject"),
            11 => Some("Builtin.BridgeObject"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Idx::NONE")
        } else if let Some(name) = self.name() {
            write!(f, "Idx({name})")
        } else {
            write!(f, "Idx({})", self.0)
        }
    }
}
