//! Protocol conformances.

use crate::decl::arena_id;
use crate::{DeclId, GenericSigId, Idx};

arena_id!(
    /// Handle to a conformance in the [`Program`](crate::Program).
    ConformanceId
);

/// Conformance declared on a nominal type or one of its extensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NormalConformance {
    /// Conforming type, written in terms of the nominal's generic parameters.
    pub ty: Idx,
    pub protocol: DeclId,
    /// Nominal or extension declaring the conformance.
    pub context: DeclId,
    /// Signature of a conditional conformance; `None` when unconditional.
    pub conditional_signature: Option<GenericSigId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProtocolConformance {
    Normal(NormalConformance),
    /// A subclass's use of its superclass's conformance.
    Inherited { base: ConformanceId, ty: Idx },
}

impl ProtocolConformance {
    /// The type that conforms.
    pub const fn conforming_type(&self) -> Idx {
        match self {
            ProtocolConformance::Normal(normal) => normal.ty,
            ProtocolConformance::Inherited { ty, .. } => *ty,
        }
    }
}

/// Result of a conformance lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProtocolConformanceRef {
    /// A type parameter conforms through its generic signature.
    Abstract(DeclId),
    /// A concrete conformance, applied to the looked-up type.
    Concrete { conformance: ConformanceId, ty: Idx },
}

impl ProtocolConformanceRef {
    pub const fn is_concrete(self) -> bool {
        matches!(self, ProtocolConformanceRef::Concrete { .. })
    }
}

/// One step of a path that derives a type parameter's conformance from a
/// generic signature.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConformanceStep {
    /// The signature's conformance requirement at `requirement`.
    Root {
        subject: Idx,
        protocol: DeclId,
        requirement: u32,
    },
    /// Associated conformance `index` of the previous step's protocol.
    Associated {
        subject: Idx,
        protocol: DeclId,
        index: u32,
    },
}
