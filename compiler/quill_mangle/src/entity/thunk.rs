//! Thunk and table symbols.
//!
//! ```text
//! vtable-thunk ::= entity entity 'TV'
//! witness-table ::= protocol-conformance 'WP'
//! witness-thunk ::= protocol-conformance (entity | accessor-entity | closure-entity) 'TW'
//! reabstraction-thunk ::= type type type? generic-signature? ('Ty' | 'TR')
//! completion-handler ::= type type generic-signature? ('TZ' | 'Tz')
//! ```

use quill_ir::{AccessorKind, ClosureId, ConformanceId, DeclId, DeclKind, GenericSigId, Idx};

use crate::{MangleError, Mangler, MANGLING_PREFIX};

/// The protocol requirement a witness thunk satisfies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WitnessRequirement {
    /// A function, variable, subscript or constructor requirement.
    Decl(DeclId),
    /// One accessor of a storage requirement.
    Accessor { storage: DeclId, kind: AccessorKind },
}

impl Mangler<'_> {
    /// Thunk in `derived`'s class vtable entry overriding `base`.
    pub fn mangle_vtable_thunk(
        &mut self,
        base: DeclId,
        derived: DeclId,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "vtable thunk", |m| {
            m.append_entity(derived)?;
            m.append_entity(base)?;
            m.append_operator("TV");
            Ok(())
        })
    }

    pub fn mangle_constructor_vtable_thunk(
        &mut self,
        base: DeclId,
        derived: DeclId,
        allocating: bool,
    ) -> Result<String, MangleError> {
        for ctor in [base, derived] {
            self.expect_kind(ctor, |k| matches!(k, DeclKind::Constructor), "a constructor")?;
        }
        self.mangle(MANGLING_PREFIX, "constructor vtable thunk", |m| {
            m.append_constructor_entity(derived, allocating)?;
            m.append_constructor_entity(base, allocating)?;
            m.append_operator("TV");
            Ok(())
        })
    }

    pub fn mangle_witness_table(&mut self, conformance: ConformanceId) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "witness table", |m| {
            m.append_protocol_conformance(conformance)?;
            m.append_operator("WP");
            Ok(())
        })
    }

    pub fn mangle_witness_thunk(
        &mut self,
        conformance: ConformanceId,
        requirement: WitnessRequirement,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "witness thunk", |m| {
            m.append_protocol_conformance(conformance)?;
            match requirement {
                WitnessRequirement::Decl(decl) => m.append_entity(decl)?,
                WitnessRequirement::Accessor { storage, kind } => {
                    m.append_accessor_entity(storage, kind)?;
                }
            }
            m.append_operator("TW");
            Ok(())
        })
    }

    /// Witness thunk whose implementation is a closure.
    pub fn mangle_closure_witness_thunk(
        &mut self,
        conformance: ConformanceId,
        closure: ClosureId,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "closure witness thunk", |m| {
            m.append_protocol_conformance(conformance)?;
            m.append_closure_entity(closure)?;
            m.append_operator("TW");
            Ok(())
        })
    }

    /// Thunk converting a function value of type `from` to the abstraction
    /// of `to`, optionally as a method of `self_ty`.
    pub fn mangle_reabstraction_thunk(
        &mut self,
        from: Idx,
        to: Idx,
        self_ty: Option<Idx>,
        signature: Option<GenericSigId>,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "reabstraction thunk", |m| {
            m.with_generic_signature(signature, |m| {
                m.append_type(from)?;
                m.append_type(to)?;
                if let Some(self_ty) = self_ty {
                    m.append_type(self_ty)?;
                }
                Ok(())
            })?;
            if let Some(signature) = signature {
                m.append_generic_signature(signature, None)?;
            }
            m.append_operator(if self_ty.is_some() { "Ty" } else { "TR" });
            Ok(())
        })
    }

    /// Implementation of a foreign async completion handler. A predefined
    /// handler has a runtime-reserved spelling.
    pub fn mangle_completion_handler(
        &mut self,
        block: Idx,
        result: Idx,
        signature: Option<GenericSigId>,
        predefined: bool,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "completion handler", |m| {
            m.with_generic_signature(signature, |m| {
                m.append_type(block)?;
                m.append_type(result)
            })?;
            if let Some(signature) = signature {
                m.append_generic_signature(signature, None)?;
            }
            m.append_operator(if predefined { "TZ" } else { "Tz" });
            Ok(())
        })
    }
}
