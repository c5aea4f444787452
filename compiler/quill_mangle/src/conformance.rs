//! Protocol conformance productions.
//!
//! ```text
//! protocol-conformance ::= type protocol module generic-signature?
//!
//! any-conformance ::= type protocol module conditional-list 'HC'
//!                 ::= abstract-step+
//! conditional-list ::= 'y' | any-conformance '_' any-conformance*
//! abstract-step ::= type protocol 'HD' INDEX      // signature requirement
//!               ::= type protocol 'HI' INDEX      // associated conformance
//! ```

use quill_ir::{ConformanceId, ConformanceStep, DeclContext, DeclId, Idx, ProtocolConformanceRef};

use crate::{MangleError, Mangler};

impl Mangler<'_> {
    /// Append a conformance as declared: the conforming interface type, the
    /// protocol, the declaring module and, for generic or conditional
    /// conformances, the full signature.
    pub(crate) fn append_protocol_conformance(
        &mut self,
        id: ConformanceId,
    ) -> Result<(), MangleError> {
        let program = self.program;
        let root = *program.root_conformance(id);
        let ty = program.conformance(id).conforming_type();
        let signature = root.conditional_signature.or_else(|| {
            program
                .nominal_decl_of(root.ty)
                .and_then(|decl| program.generic_signature_of(DeclContext::Decl(decl)))
        });

        self.with_generic_signature(signature, |m| {
            m.append_type(ty)?;
            m.append_protocol(root.protocol)?;
            m.append_module_of(root.context)
        })?;
        if let Some(signature) = signature {
            self.append_generic_signature(signature, None)?;
        }
        Ok(())
    }

    /// Append a conformance as used: a concrete conformance with the
    /// conformances its conditional requirements need, or the derivation
    /// of an abstract one from the bound signature.
    pub(crate) fn append_any_conformance(
        &mut self,
        subject: Option<Idx>,
        conformance: ProtocolConformanceRef,
    ) -> Result<(), MangleError> {
        match conformance {
            ProtocolConformanceRef::Concrete { conformance, ty } => {
                self.append_concrete_conformance(conformance, ty)
            }
            ProtocolConformanceRef::Abstract(protocol) => match subject {
                Some(subject) => self.append_abstract_conformance(subject, protocol),
                None => Err(MangleError::UnexpectedEntity {
                    decl: protocol,
                    expected: "a conformance with a known conforming type",
                }),
            },
        }
    }

    fn append_concrete_conformance(
        &mut self,
        id: ConformanceId,
        ty: Idx,
    ) -> Result<(), MangleError> {
        let program = self.program;
        let root = *program.root_conformance(id);

        self.append_type(ty)?;
        self.append_protocol(root.protocol)?;
        self.append_module_of(root.context)?;

        let conditional = program.conditional_requirements(id, ty);
        if conditional.is_empty() {
            self.append_operator("y");
        }
        for (i, &(replacement, conformance)) in conditional.iter().enumerate() {
            self.append_any_conformance(Some(replacement), conformance)?;
            if i == 0 {
                self.append_operator("_");
            }
        }
        self.append_operator("HC");
        Ok(())
    }

    fn append_abstract_conformance(
        &mut self,
        subject: Idx,
        protocol: DeclId,
    ) -> Result<(), MangleError> {
        let program = self.program;
        let missing = MangleError::MissingConformancePath {
            ty: subject,
            protocol,
        };
        let signature = self.binder.current().ok_or_else(|| missing.clone())?;
        let path = program
            .conformance_access_path(signature, subject, protocol)
            .ok_or(missing)?;

        for step in path {
            match step {
                ConformanceStep::Root {
                    subject,
                    protocol,
                    requirement,
                } => {
                    self.append_type(subject)?;
                    self.append_protocol(protocol)?;
                    self.append_operator_with_index("HD", requirement);
                }
                ConformanceStep::Associated {
                    subject,
                    protocol,
                    index,
                } => {
                    self.append_type(subject)?;
                    self.append_protocol(protocol)?;
                    self.append_operator_with_index("HI", index);
                }
            }
        }
        Ok(())
    }
}
