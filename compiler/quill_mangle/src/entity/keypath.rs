//! Key path helper symbols.
//!
//! ```text
//! key-path-accessor ::= entity generic-signature? type arg-list? ('TK' | 'Tk') 'q'?
//! key-path-index-helper ::= type* generic-signature? ('TH' | 'Th') 'q'?
//! ```
//!
//! The trailing `q` marks a helper compiled for minimal resilience
//! expansion, which must not assume the layout of resilient types.

use quill_ir::{DeclId, DeclKind, GenericSigId, Idx, ResilienceExpansion, SubstitutionMap};

use crate::{MangleError, Mangler, MANGLING_PREFIX};

impl Mangler<'_> {
    /// Getter thunk of the key path component for `property` on `base`.
    /// `substitutions` apply to a generic subscript.
    pub fn mangle_key_path_getter(
        &mut self,
        property: DeclId,
        signature: Option<GenericSigId>,
        base: Idx,
        substitutions: Option<&SubstitutionMap>,
        expansion: ResilienceExpansion,
    ) -> Result<String, MangleError> {
        self.expect_kind(property, DeclKind::is_storage, "a property or subscript")?;
        self.mangle(MANGLING_PREFIX, "key path getter", |m| {
            m.append_key_path_accessor(property, signature, base, substitutions)?;
            m.append_operator("TK");
            m.append_expansion(expansion);
            Ok(())
        })
    }

    pub fn mangle_key_path_setter(
        &mut self,
        property: DeclId,
        signature: Option<GenericSigId>,
        base: Idx,
        substitutions: Option<&SubstitutionMap>,
        expansion: ResilienceExpansion,
    ) -> Result<String, MangleError> {
        self.expect_kind(property, DeclKind::is_storage, "a property or subscript")?;
        self.mangle(MANGLING_PREFIX, "key path setter", |m| {
            m.append_key_path_accessor(property, signature, base, substitutions)?;
            m.append_operator("Tk");
            m.append_expansion(expansion);
            Ok(())
        })
    }

    /// Equality helper comparing the index values of a subscript
    /// component.
    pub fn mangle_key_path_equals(
        &mut self,
        indices: &[Idx],
        signature: Option<GenericSigId>,
        expansion: ResilienceExpansion,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "key path equals", |m| {
            m.append_key_path_indices(indices, signature)?;
            m.append_operator("TH");
            m.append_expansion(expansion);
            Ok(())
        })
    }

    pub fn mangle_key_path_hash(
        &mut self,
        indices: &[Idx],
        signature: Option<GenericSigId>,
        expansion: ResilienceExpansion,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "key path hash", |m| {
            m.append_key_path_indices(indices, signature)?;
            m.append_operator("Th");
            m.append_expansion(expansion);
            Ok(())
        })
    }

    fn append_key_path_accessor(
        &mut self,
        property: DeclId,
        signature: Option<GenericSigId>,
        base: Idx,
        substitutions: Option<&SubstitutionMap>,
    ) -> Result<(), MangleError> {
        let is_subscript = matches!(self.program.decl(property).kind, DeclKind::Subscript);
        self.append_entity(property)?;
        if let Some(signature) = signature {
            self.append_generic_signature(signature, None)?;
        }
        self.with_generic_signature(signature, |m| {
            m.append_type(base)?;
            match substitutions {
                Some(subs) if is_subscript => m.append_arg_level(&subs.replacements),
                _ => Ok(()),
            }
        })
    }

    fn append_key_path_indices(
        &mut self,
        indices: &[Idx],
        signature: Option<GenericSigId>,
    ) -> Result<(), MangleError> {
        self.with_generic_signature(signature, |m| {
            for &index in indices {
                m.append_type(index)?;
            }
            Ok(())
        })?;
        if let Some(signature) = signature {
            self.append_generic_signature(signature, None)?;
        }
        Ok(())
    }

    fn append_expansion(&mut self, expansion: ResilienceExpansion) {
        if expansion == ResilienceExpansion::Minimal {
            self.append_operator("q");
        }
    }
}
