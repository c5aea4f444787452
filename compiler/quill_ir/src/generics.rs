//! Generic signatures and substitution maps.

use crate::decl::arena_id;
use crate::{DeclId, Idx, ProtocolConformanceRef};

arena_id!(
    /// Handle to an interned generic signature.
    GenericSigId
);

/// Position of a generic parameter: nesting depth and index within it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct GenericParamKey {
    pub depth: u32,
    pub index: u32,
}

impl GenericParamKey {
    pub const fn new(depth: u32, index: u32) -> Self {
        Self { depth, index }
    }
}

/// Layout constraint on a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayoutConstraint {
    Unknown,
    RefCountedObject,
    NativeRefCountedObject,
    Class,
    NativeClass,
    Trivial,
    TrivialOfExactSize(u32),
    TrivialOfAtMostSize(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Conformance(DeclId),
    SameType(Idx),
    Superclass(Idx),
    Layout(LayoutConstraint),
}

/// A requirement on a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Requirement {
    /// Generic parameter or dependent member type.
    pub subject: Idx,
    pub kind: RequirementKind,
}

impl Requirement {
    pub const fn conformance(subject: Idx, protocol: DeclId) -> Self {
        Self {
            subject,
            kind: RequirementKind::Conformance(protocol),
        }
    }

    pub const fn same_type(subject: Idx, other: Idx) -> Self {
        Self {
            subject,
            kind: RequirementKind::SameType(other),
        }
    }

    pub const fn superclass(subject: Idx, class: Idx) -> Self {
        Self {
            subject,
            kind: RequirementKind::Superclass(class),
        }
    }

    pub const fn layout(subject: Idx, layout: LayoutConstraint) -> Self {
        Self {
            subject,
            kind: RequirementKind::Layout(layout),
        }
    }
}

/// Generic parameters plus requirements, covering every enclosing context.
///
/// Parameters are kept sorted by `(depth, index)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GenericSignature {
    pub params: Vec<GenericParamKey>,
    pub requirements: Vec<Requirement>,
}

impl GenericSignature {
    pub fn new(mut params: Vec<GenericParamKey>, requirements: Vec<Requirement>) -> Self {
        params.sort_unstable();
        params.dedup();
        Self {
            params,
            requirements,
        }
    }

    pub fn contains_param(&self, key: GenericParamKey) -> bool {
        self.params.binary_search(&key).is_ok()
    }

    /// Position of `key` in the flattened parameter list.
    pub fn param_position(&self, key: GenericParamKey) -> Option<usize> {
        self.params.binary_search(&key).ok()
    }

    pub fn max_depth(&self) -> Option<u32> {
        self.params.last().map(|key| key.depth)
    }

    /// Conformance requirements in order, paired with their subjects.
    pub fn conformance_requirements(&self) -> impl Iterator<Item = (Idx, DeclId)> + '_ {
        self.requirements.iter().filter_map(|req| match req.kind {
            RequirementKind::Conformance(protocol) => Some((req.subject, protocol)),
            _ => None,
        })
    }
}

/// Replacement types and conformances for a generic signature.
///
/// `replacements` parallels `GenericSignature::params`; `conformances`
/// parallels its conformance requirements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionMap {
    pub signature: GenericSigId,
    pub replacements: Vec<Idx>,
    pub conformances: Vec<ProtocolConformanceRef>,
}

impl SubstitutionMap {
    pub fn new(
        signature: GenericSigId,
        replacements: Vec<Idx>,
        conformances: Vec<ProtocolConformanceRef>,
    ) -> Self {
        Self {
            signature,
            replacements,
            conformances,
        }
    }
}
