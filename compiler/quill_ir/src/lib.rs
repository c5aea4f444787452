//! Program model for the Quill compiler's symbol mangler.
//!
//! A `Program` is a read-only arena of everything the mangler inspects:
//!
//! - declarations nested in contexts (modules, nominals, extensions,
//!   functions, closures, accessors, initializers)
//! - hash-consed types in a `Pool`, addressed by `Idx`, with the canonical
//!   form of every type precomputed at intern time
//! - generic signatures, substitution maps and protocol conformances
//! - automatic differentiation configurations
//!
//! # Type Interning
//!
//! Types are stored as `(Tag, data)` items with compound payloads in a shared
//! `extra` array. Structurally equal types share one `Idx`, so type equality
//! is an integer comparison and substitution tables can key on `Idx`.

mod autodiff;
mod conformance;
mod decl;
mod flags;
mod generics;
mod idx;
mod interner;
mod name;
mod pool;
mod program;
mod tag;
mod types;

pub use autodiff::{
    AutoDiffConfig, DerivativeFunctionKind, DifferentiabilityWitnessKind, GeneratedDeclKind,
    IndexSubset, LinearMapKind,
};
pub use conformance::{
    ConformanceId, ConformanceStep, NormalConformance, ProtocolConformance,
    ProtocolConformanceRef,
};
pub use decl::{
    AccessorKind, AssociatedConformance, Closure, ClosureId, Decl, DeclContext, DeclId, DeclKind,
    PatternBinding, PatternBindingId,
};
pub use flags::{DeclFlags, ParamFlags, TypeFlags};
pub use generics::{
    GenericParamKey, GenericSigId, GenericSignature, LayoutConstraint, Requirement,
    RequirementKind, SubstitutionMap,
};
pub use idx::Idx;
pub use interner::StringInterner;
pub use name::Name;
pub use pool::{NominalType, OpaqueType, Pool};
pub use program::{Program, Stdlib, STDLIB_MODULE_NAME};
pub use tag::Tag;
pub use types::{
    CalleeConvention, DifferentiabilityKind, ExistentialType, FnParam, FunctionExtInfo,
    FunctionRepr, FunctionType, ImplFunctionType, ImplParam, ImplResult, ParamConvention,
    ResilienceExpansion, ResultConvention, TupleElem,
};

// Size assertions to prevent accidental regressions.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{DeclId, Idx, Name};
    const _: () = assert!(std::mem::size_of::<Idx>() == 4);
    const _: () = assert!(std::mem::size_of::<Name>() == 4);
    const _: () = assert!(std::mem::size_of::<DeclId>() == 4);
}
