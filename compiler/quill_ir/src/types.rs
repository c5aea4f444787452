//! Decoded views of structural pool types.
//!
//! The pool stores types as packed `u32` words; these are the unpacked
//! shapes handed to consumers.

use crate::{DeclId, Idx, Name, ParamFlags};

/// One element of a tuple type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElem {
    pub label: Option<Name>,
    pub ty: Idx,
}

impl TupleElem {
    pub const fn unlabeled(ty: Idx) -> Self {
        Self { label: None, ty }
    }

    pub const fn labeled(label: Name, ty: Idx) -> Self {
        Self {
            label: Some(label),
            ty,
        }
    }
}

/// One parameter of a function type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnParam {
    pub ty: Idx,
    pub flags: ParamFlags,
}

impl FnParam {
    pub const fn new(ty: Idx) -> Self {
        Self {
            ty,
            flags: ParamFlags::empty(),
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Calling representation of a function value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum FunctionRepr {
    /// Native, escaping closure.
    #[default]
    Native,
    /// Native closure that may not escape the callee.
    NoEscape,
    /// Foreign block.
    Block,
    /// C function pointer.
    CFunctionPointer,
    /// Context-free native function.
    Thin,
}

impl FunctionRepr {
    const fn to_raw(self) -> u32 {
        match self {
            FunctionRepr::Native => 0,
            FunctionRepr::NoEscape => 1,
            FunctionRepr::Block => 2,
            FunctionRepr::CFunctionPointer => 3,
            FunctionRepr::Thin => 4,
        }
    }

    const fn from_raw(raw: u32) -> Self {
        match raw {
            1 => FunctionRepr::NoEscape,
            2 => FunctionRepr::Block,
            3 => FunctionRepr::CFunctionPointer,
            4 => FunctionRepr::Thin,
            _ => FunctionRepr::Native,
        }
    }
}

/// Differentiability of a function type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum DifferentiabilityKind {
    #[default]
    NonDifferentiable,
    Normal,
    Linear,
    Forward,
    Reverse,
}

impl DifferentiabilityKind {
    const fn to_raw(self) -> u32 {
        match self {
            DifferentiabilityKind::NonDifferentiable => 0,
            DifferentiabilityKind::Normal => 1,
            DifferentiabilityKind::Linear => 2,
            DifferentiabilityKind::Forward => 3,
            DifferentiabilityKind::Reverse => 4,
        }
    }

    const fn from_raw(raw: u32) -> Self {
        match raw {
            1 => DifferentiabilityKind::Normal,
            2 => DifferentiabilityKind::Linear,
            3 => DifferentiabilityKind::Forward,
            4 => DifferentiabilityKind::Reverse,
            _ => DifferentiabilityKind::NonDifferentiable,
        }
    }
}

/// Extended attributes of a function type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct FunctionExtInfo {
    pub repr: FunctionRepr,
    pub throws: bool,
    pub is_async: bool,
    pub differentiability: DifferentiabilityKind,
}

impl FunctionExtInfo {
    #[must_use]
    pub const fn with_repr(mut self, repr: FunctionRepr) -> Self {
        self.repr = repr;
        self
    }

    #[must_use]
    pub const fn with_throws(mut self, throws: bool) -> Self {
        self.throws = throws;
        self
    }

    #[must_use]
    pub const fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }

    #[must_use]
    pub const fn with_differentiability(mut self, kind: DifferentiabilityKind) -> Self {
        self.differentiability = kind;
        self
    }

    /// Pack into a pool word: repr in bits 0-2, throws bit 3, async bit 4,
    /// differentiability in bits 5-7.
    pub(crate) const fn to_raw(self) -> u32 {
        self.repr.to_raw()
            | ((self.throws as u32) << 3)
            | ((self.is_async as u32) << 4)
            | (self.differentiability.to_raw() << 5)
    }

    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self {
            repr: FunctionRepr::from_raw(raw & 0b111),
            throws: raw & (1 << 3) != 0,
            is_async: raw & (1 << 4) != 0,
            differentiability: DifferentiabilityKind::from_raw((raw >> 5) & 0b111),
        }
    }
}

/// Decoded function type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionType {
    pub params: Vec<FnParam>,
    pub result: Idx,
    pub ext: FunctionExtInfo,
}

// ── Lowered function types ─────────────────────────────────────────

/// Ownership of the context of a lowered function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CalleeConvention {
    Thin,
    Owned,
    Guaranteed,
}

/// Passing convention of a lowered parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamConvention {
    Indirect,
    Inout,
    Owned,
    Guaranteed,
}

/// Passing convention of a lowered result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResultConvention {
    Indirect,
    Owned,
    Unowned,
}

macro_rules! raw_codec {
    ($ty:ident { $($variant:ident = $raw:literal),+ $(,)? } default $default:ident) => {
        impl $ty {
            pub(crate) const fn to_raw(self) -> u32 {
                match self {
                    $($ty::$variant => $raw,)+
                }
            }

            pub(crate) const fn from_raw(raw: u32) -> Self {
                match raw {
                    $($raw => $ty::$variant,)+
                    _ => $ty::$default,
                }
            }
        }
    };
}

raw_codec!(CalleeConvention { Thin = 0, Owned = 1, Guaranteed = 2 } default Guaranteed);
raw_codec!(ParamConvention { Indirect = 0, Inout = 1, Owned = 2, Guaranteed = 3 } default Guaranteed);
raw_codec!(ResultConvention { Indirect = 0, Owned = 1, Unowned = 2 } default Owned);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImplParam {
    pub convention: ParamConvention,
    pub ty: Idx,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImplResult {
    pub convention: ResultConvention,
    pub ty: Idx,
}

/// Decoded lowered function type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImplFunctionType {
    pub callee: CalleeConvention,
    /// Only `Native`, `Block` and `CFunctionPointer` are meaningful here.
    pub repr: FunctionRepr,
    pub is_async: bool,
    pub params: Vec<ImplParam>,
    pub results: Vec<ImplResult>,
    /// Error result, always owned.
    pub error: Option<Idx>,
}

/// Decoded protocol composition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExistentialType {
    pub protocols: Vec<DeclId>,
    pub superclass: Option<Idx>,
    pub any_object: bool,
}

/// Resilience domain a helper is compiled for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ResilienceExpansion {
    /// Code that may be inlined into other modules.
    Minimal,
    #[default]
    Maximal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ext_info_packs_every_field() {
        let info = FunctionExtInfo::default()
            .with_repr(FunctionRepr::Block)
            .with_throws(true)
            .with_async(true)
            .with_differentiability(DifferentiabilityKind::Reverse);
        assert_eq!(FunctionExtInfo::from_raw(info.to_raw()), info);
        assert_eq!(FunctionExtInfo::from_raw(0), FunctionExtInfo::default());
    }

    #[test]
    fn conventions_fall_back_on_unknown_words() {
        assert_eq!(ParamConvention::from_raw(99), ParamConvention::Guaranteed);
        assert_eq!(
            ResultConvention::from_raw(ResultConvention::Unowned.to_raw()),
            ResultConvention::Unowned
        );
    }
}
