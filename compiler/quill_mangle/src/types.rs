//! Type productions.
//!
//! ```text
//! type ::= 'Bi' BITS '_' | 'Bf' BITS '_' | 'Bw' | 'Bp' | 'Bo' | 'BO' | 'Bb'
//!      ::= 'yt'                                    // empty tuple
//!      ::= tuple-element ('_' tuple-element*)? 't'
//!      ::= nominal
//!      ::= nominal arg-level+ retroactive* 'G'     // bound generic
//!      ::= type 'Sg'                               // Optional<type>
//!      ::= function-type | impl-function-type
//!      ::= type 'm'                                // metatype
//!      ::= protocol-list ('p' | type 'Xc' | 'Xl')  // existential
//!      ::= type 'Xp'                               // existential metatype
//!      ::= generic-param
//!      ::= type identifier 'Qa' | type protocol identifier 'QA'
//!      ::= opaque-decl arg-level retroactive* 'Qo' INDEX
//!      ::= 'Qr' | 'QR' INDEX                       // opaque result of the owner
//! tuple-element ::= identifier? type
//! arg-level ::= 'y' | type '_' type*
//! ```

use quill_ir::{DeclContext, DeclId, DeclKind, Idx, ProtocolConformanceRef, Tag};

use crate::substitution::{SubstKey, OPTIONAL_SHORTHAND};
use crate::{MangleError, Mangler};

impl Mangler<'_> {
    /// Append `ty`, consulting the substitution table first.
    ///
    /// Outside debug-info mode `ty` must be canonical.
    pub(crate) fn append_type(&mut self, ty: Idx) -> Result<(), MangleError> {
        let program = self.program;
        let pool = program.pool();
        if !self.tolerate_sugar && !pool.is_canonical(ty) {
            return Err(MangleError::NonCanonicalType { ty });
        }

        let tag = pool.tag(ty);
        if tag.is_sugar() {
            return self.append_sugared_type(ty);
        }
        if tag.is_builtin() {
            self.append_builtin_type(ty, tag);
            return Ok(());
        }

        match tag {
            Tag::GenericParam => {
                let key = pool
                    .generic_param_key(ty)
                    .ok_or(MangleError::UnexpectedType {
                        ty,
                        expected: "a generic parameter",
                    })?;
                return self.append_generic_param(key);
            }
            Tag::Nominal => {
                if let Some(nominal) = pool.nominal_info(ty).filter(|n| n.parent.is_none()) {
                    return self.append_nominal_decl(nominal.decl);
                }
            }
            Tag::Opaque if self.is_own_opaque_result(ty) => {
                return self.append_own_opaque_result(ty);
            }
            _ => {}
        }

        let key = SubstKey::Type(ty);
        if self.try_substitution(key) {
            return Ok(());
        }
        self.append_structural_type(ty, tag)?;
        self.add_substitution(key);
        Ok(())
    }

    fn append_structural_type(&mut self, ty: Idx, tag: Tag) -> Result<(), MangleError> {
        let program = self.program;
        let pool = program.pool();
        let unexpected = |expected| MangleError::UnexpectedType { ty, expected };
        match tag {
            Tag::Nominal | Tag::BoundGeneric => self.append_bound_generic(ty),
            Tag::Tuple => {
                let elems = pool.tuple_elems(ty).ok_or_else(|| unexpected("a tuple"))?;
                for (i, elem) in elems.iter().enumerate() {
                    if let Some(label) = elem.label {
                        self.append_identifier(program.name_text(label));
                    }
                    self.append_type(elem.ty)?;
                    if i == 0 {
                        self.append_operator("_");
                    }
                }
                self.append_operator("t");
                Ok(())
            }
            Tag::Function => self.append_function_type(ty, &[]),
            Tag::ImplFunction => self.append_impl_function_type(ty),
            Tag::Metatype => {
                let instance = pool
                    .metatype_instance(ty)
                    .ok_or_else(|| unexpected("a metatype"))?;
                self.append_type(instance)?;
                self.append_operator("m");
                Ok(())
            }
            Tag::ExistentialMetatype => {
                let instance = pool
                    .metatype_instance(ty)
                    .ok_or_else(|| unexpected("an existential metatype"))?;
                self.append_type(instance)?;
                self.append_operator("Xp");
                Ok(())
            }
            Tag::Existential => {
                let layout = pool
                    .existential_layout(ty)
                    .ok_or_else(|| unexpected("an existential"))?;
                self.append_protocol_list(&layout.protocols)?;
                match layout.superclass {
                    Some(superclass) => {
                        self.append_type(superclass)?;
                        self.append_operator("Xc");
                    }
                    None if layout.any_object => self.append_operator("Xl"),
                    None => self.append_operator("p"),
                }
                Ok(())
            }
            Tag::DependentMember => {
                let (base, assoc) = pool
                    .dependent_member_info(ty)
                    .ok_or_else(|| unexpected("a dependent member type"))?;
                self.append_dependent_member(base, assoc)
            }
            Tag::Opaque => self.append_opaque_type(ty),
            _ => Err(unexpected("a structural type")),
        }
    }

    fn append_builtin_type(&mut self, ty: Idx, tag: Tag) {
        let width = self.program.pool().builtin_width(ty).unwrap_or_default();
        match tag {
            Tag::EmptyTuple => self.append_operator("yt"),
            Tag::BuiltinInt => self.append_operator(&format!("Bi{width}_")),
            Tag::BuiltinFloat => self.append_operator(&format!("Bf{width}_")),
            Tag::BuiltinWord => self.append_operator("Bw"),
            Tag::RawPointer => self.append_operator("Bp"),
            Tag::NativeObject => self.append_operator("Bo"),
            Tag::UnknownObject => self.append_operator("BO"),
            _ => self.append_operator("Bb"),
        }
    }

    /// Debug-info spelling of sugar: a non-generic alias keeps its name,
    /// everything else is desugared one level.
    fn append_sugared_type(&mut self, ty: Idx) -> Result<(), MangleError> {
        let program = self.program;
        let pool = program.pool();
        if let Some((alias, _)) = pool.alias_info(ty) {
            if program.generic_signature_of(DeclContext::Decl(alias)).is_none() {
                return self.append_nominal_decl(alias);
            }
        }
        let desugared = pool
            .singly_desugared(ty)
            .ok_or(MangleError::NonCanonicalType { ty })?;
        self.append_type(desugared)
    }

    /// Nominal type nested in a generic parent, or bound generic type.
    fn append_bound_generic(&mut self, ty: Idx) -> Result<(), MangleError> {
        let program = self.program;
        let pool = program.pool();
        let nominal = pool.nominal_info(ty).ok_or(MangleError::UnexpectedType {
            ty,
            expected: "a nominal type",
        })?;

        let retroactive = self.retroactive_conformances(ty);
        if nominal.parent.is_none() && retroactive.is_empty() && self.is_stdlib_optional(nominal.decl) {
            if let [wrapped] = nominal.args.as_slice() {
                self.append_type(*wrapped)?;
                self.append_operator(OPTIONAL_SHORTHAND);
                return Ok(());
            }
        }

        self.append_nominal_decl(nominal.decl)?;
        for level in self.generic_arg_levels(ty) {
            self.append_arg_level(&level)?;
        }
        self.append_retroactive_conformances(&retroactive)?;
        self.append_operator("G");
        Ok(())
    }

    /// Arguments of every nesting level of `ty`, outermost first.
    fn generic_arg_levels(&self, ty: Idx) -> Vec<Vec<Idx>> {
        let pool = self.program.pool();
        let mut levels = Vec::new();
        let mut current = Some(ty);
        while let Some(level) = current.and_then(|ty| pool.nominal_info(ty)) {
            levels.push(level.args);
            current = level.parent;
        }
        levels.reverse();
        levels
    }

    pub(crate) fn append_arg_level(&mut self, args: &[Idx]) -> Result<(), MangleError> {
        if args.is_empty() {
            self.append_operator("y");
            return Ok(());
        }
        for (i, &arg) in args.iter().enumerate() {
            self.append_type(arg)?;
            if i == 0 {
                self.append_operator("_");
            }
        }
        Ok(())
    }

    /// Concrete conformances of `ty`'s generic arguments declared in a
    /// module owning neither the type nor the protocol, with the index of
    /// the requirement each satisfies.
    pub(crate) fn retroactive_conformances(&self, ty: Idx) -> Vec<(u32, ProtocolConformanceRef)> {
        let program = self.program;
        let Some(subs) = program.context_substitutions(ty) else {
            return Vec::new();
        };
        self.retroactive_in(&subs.conformances)
    }

    pub(crate) fn retroactive_in(
        &self,
        conformances: &[ProtocolConformanceRef],
    ) -> Vec<(u32, ProtocolConformanceRef)> {
        (0u32..)
            .zip(conformances.iter().copied())
            .filter(|&(_, conformance)| match conformance {
                ProtocolConformanceRef::Concrete { conformance, .. } => {
                    self.program.is_retroactive(conformance)
                }
                ProtocolConformanceRef::Abstract(_) => false,
            })
            .collect()
    }

    pub(crate) fn append_retroactive_conformances(
        &mut self,
        retroactive: &[(u32, ProtocolConformanceRef)],
    ) -> Result<(), MangleError> {
        for &(requirement, conformance) in retroactive {
            self.append_any_conformance(None, conformance)?;
            self.append_operator_with_index("g", requirement);
        }
        Ok(())
    }

    fn is_stdlib_optional(&self, decl: DeclId) -> bool {
        let program = self.program;
        let decl = program.decl(decl);
        let in_stdlib = matches!(
            decl.parent,
            Some(DeclContext::Decl(parent)) if program.is_stdlib_module(parent)
        );
        in_stdlib
            && matches!(decl.kind, DeclKind::Enum)
            && decl.name.map(|name| program.name_text(name)) == Some("Optional")
    }

    /// ```text
    /// protocol-list ::= 'y' | protocol '_' protocol*
    /// ```
    pub(crate) fn append_protocol_list(
        &mut self,
        protocols: &[DeclId],
    ) -> Result<(), MangleError> {
        if protocols.is_empty() {
            self.append_operator("y");
            return Ok(());
        }
        for (i, &protocol) in protocols.iter().enumerate() {
            self.append_protocol(protocol)?;
            if i == 0 {
                self.append_operator("_");
            }
        }
        Ok(())
    }

    fn append_dependent_member(
        &mut self,
        base: Idx,
        assoc: DeclId,
    ) -> Result<(), MangleError> {
        let program = self.program;
        let name = program.decl(assoc).name.ok_or(MangleError::NamelessEntity { decl: assoc })?;
        let protocol = program
            .protocol_of_associated_type(assoc)
            .ok_or(MangleError::UnexpectedEntity {
                decl: assoc,
                expected: "an associated type of a protocol",
            })?;

        self.append_type(base)?;
        if self.can_elide_protocol(base, protocol) {
            self.append_identifier(program.name_text(name));
            self.append_operator("Qa");
        } else {
            self.append_protocol(protocol)?;
            self.append_identifier(program.name_text(name));
            self.append_operator("QA");
        }
        Ok(())
    }

    fn append_opaque_type(&mut self, ty: Idx) -> Result<(), MangleError> {
        let program = self.program;
        let opaque = program.pool().opaque_info(ty).ok_or(MangleError::UnexpectedType {
            ty,
            expected: "an opaque type",
        })?;

        self.append_opaque_decl(opaque.decl)?;
        self.append_arg_level(&opaque.args)?;
        let retroactive = match program.generic_signature_of(DeclContext::Decl(opaque.decl)) {
            Some(signature) => {
                let subs = program.substitution_map(signature, opaque.args.clone());
                self.retroactive_in(&subs.conformances)
            }
            None => Vec::new(),
        };
        self.append_retroactive_conformances(&retroactive)?;
        self.append_operator_with_index("Qo", opaque.ordinal);
        Ok(())
    }

    /// An opaque result type of the declaration whose type is being
    /// encoded refers to it without spelling the declaration again.
    fn is_own_opaque_result(&self, ty: Idx) -> bool {
        let program = self.program;
        let Some(owner) = self.opaque_owner else {
            return false;
        };
        program.pool().opaque_info(ty).is_some_and(|opaque| {
            matches!(program.decl(opaque.decl).kind, DeclKind::OpaqueType { naming } if naming == owner)
        })
    }

    fn append_own_opaque_result(&mut self, ty: Idx) -> Result<(), MangleError> {
        let opaque = self.program.pool().opaque_info(ty).ok_or(MangleError::UnexpectedType {
            ty,
            expected: "an opaque type",
        })?;
        match opaque.ordinal {
            0 => self.append_operator("Qr"),
            ordinal => self.append_operator_with_index("QR", ordinal - 1),
        }
        Ok(())
    }
}
