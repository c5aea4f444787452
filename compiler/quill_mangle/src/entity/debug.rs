//! Debug info, runtime name and cross-reference (USR) manglings.

use quill_ir::{AccessorKind, DeclContext, DeclFlags, DeclId, DeclKind, Idx};

use crate::{MangleError, Mangler, MANGLING_PREFIX};

/// Prefix of a foreign runtime name spelled by mangling.
const FOREIGN_RUNTIME_PREFIX: &str = "_Qt";

impl Mangler<'_> {
    /// Type as written, for debug info. Generic parameters are resolved
    /// against the signature of `context` when given.
    pub fn mangle_type_for_debugger(
        &mut self,
        ty: Idx,
        context: Option<DeclContext>,
    ) -> Result<String, MangleError> {
        let signature = context.and_then(|ctx| self.program.generic_signature_of(ctx));
        self.mangle_tolerating_sugar(MANGLING_PREFIX, "debugger type", |m| {
            m.with_generic_signature(signature, |m| m.append_type(ty))?;
            m.append_operator("D");
            Ok(())
        })
    }

    /// Canonical spelling of `ty` used as a runtime type name, without
    /// the global prefix.
    pub fn mangle_type_for_type_name(&mut self, ty: Idx) -> Result<String, MangleError> {
        let canonical = self.program.pool().canonical(ty);
        self.mangle("", "type name", |m| m.append_type(canonical))
    }

    pub fn mangle_type_without_prefix(&mut self, ty: Idx) -> Result<String, MangleError> {
        self.mangle("", "type", |m| m.append_type(ty))
    }

    /// Descriptor of an opaque result type.
    pub fn mangle_opaque_type_descriptor(
        &mut self,
        opaque: DeclId,
    ) -> Result<String, MangleError> {
        self.mangle_subject(MANGLING_PREFIX, "opaque type descriptor", opaque, |m| {
            m.append_opaque_decl(opaque)?;
            m.append_operator("MQ");
            Ok(())
        })
    }

    pub fn mangle_opaque_type_decl(&mut self, opaque: DeclId) -> Result<String, MangleError> {
        self.mangle_subject(MANGLING_PREFIX, "opaque type declaration", opaque, |m| {
            m.append_opaque_decl(opaque)
        })
    }

    /// Opaque result type declaration introduced by `naming`.
    pub fn mangle_opaque_type_decl_of(&mut self, naming: DeclId) -> Result<String, MangleError> {
        let opaque = self
            .program
            .opaque_type_of(naming)
            .ok_or(MangleError::UnexpectedEntity {
                decl: naming,
                expected: "a declaration with an opaque result type",
            })?;
        self.mangle_opaque_type_decl(opaque)
    }

    /// Name under which the foreign runtime registers a nominal type: its
    /// foreign name when it has one, otherwise a prefixed mangling.
    pub fn mangle_foreign_runtime_name(&mut self, decl: DeclId) -> Result<String, MangleError> {
        self.expect_kind(decl, DeclKind::is_nominal, "a nominal type")?;
        let program = self.program;
        let d = program.decl(decl);
        if d.flags.contains(DeclFlags::FOREIGN_VISIBLE) {
            if let Some(foreign) = d.foreign_name {
                let text = program.name_text(foreign);
                return self.mangle("", "foreign runtime name", |m| {
                    m.append_operator(text);
                    Ok(())
                });
            }
        }
        self.mangle_without_symbolic_references(FOREIGN_RUNTIME_PREFIX, "foreign runtime name", |m| {
            m.append_nominal_decl(decl)
        })
    }

    // === Cross-reference identifiers ===

    pub fn mangle_type_as_usr(&mut self, ty: Idx, prefix: &str) -> Result<String, MangleError> {
        let canonical = self.program.pool().canonical(ty);
        self.mangle_without_symbolic_references(prefix, "type usr", |m| m.append_type(canonical))
    }

    /// A type declaration in its role as the context of its members.
    pub fn mangle_type_as_context_usr(
        &mut self,
        decl: DeclId,
        prefix: &str,
    ) -> Result<String, MangleError> {
        self.expect_kind(
            decl,
            |kind| kind.is_nominal() || matches!(kind, DeclKind::Extension { .. }),
            "a nominal type or extension",
        )?;
        self.mangle_without_symbolic_references(prefix, "context usr", |m| {
            m.append_context(DeclContext::Decl(decl))
        })
    }

    pub fn mangle_decl_as_usr(&mut self, decl: DeclId, prefix: &str) -> Result<String, MangleError> {
        self.mangle_without_symbolic_references(prefix, "declaration usr", |m| {
            m.append_entity(decl)
        })
    }

    pub fn mangle_accessor_as_usr(
        &mut self,
        storage: DeclId,
        kind: AccessorKind,
        prefix: &str,
    ) -> Result<String, MangleError> {
        self.mangle_without_symbolic_references(prefix, "accessor usr", |m| {
            m.append_accessor_entity(storage, kind)
        })
    }
}
