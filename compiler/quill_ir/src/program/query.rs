//! Read-only queries over the program graph.
//!
//! Context walks, generic signature lookup, conformance lookup and
//! conformance access paths.

use smallvec::SmallVec;

use super::Program;
use crate::{
    ConformanceId, ConformanceStep, DeclContext, DeclId, DeclKind, GenericParamKey, GenericSigId,
    Idx, NormalConformance, ProtocolConformance, ProtocolConformanceRef, RequirementKind,
    SubstitutionMap, Tag,
};

impl Program {
    // === Contexts ===

    /// The context enclosing `ctx`, or `None` at a module.
    pub fn parent_context(&self, ctx: DeclContext) -> Option<DeclContext> {
        match ctx {
            DeclContext::Decl(decl) => self.decl(decl).parent,
            DeclContext::Closure(closure) => Some(self.closure(closure).parent),
            DeclContext::Initializer(var) => Some(DeclContext::Decl(var)),
            DeclContext::DefaultArgument { owner, .. } => Some(DeclContext::Decl(owner)),
            DeclContext::Accessor { storage, .. } => Some(DeclContext::Decl(storage)),
        }
    }

    /// The module containing `ctx`.
    pub fn module_of(&self, ctx: DeclContext) -> Option<DeclId> {
        let mut current = Some(ctx);
        while let Some(ctx) = current {
            if let DeclContext::Decl(decl) = ctx {
                if self.decl(decl).kind.is_module() {
                    return Some(decl);
                }
            }
            current = self.parent_context(ctx);
        }
        None
    }

    /// The module containing `decl`, or `decl` itself when it is a module.
    pub fn module_of_decl(&self, decl: DeclId) -> Option<DeclId> {
        self.module_of(DeclContext::Decl(decl))
    }

    pub fn is_stdlib_module(&self, decl: DeclId) -> bool {
        self.stdlib_module == Some(decl)
    }

    /// The innermost generic signature in scope at `ctx`.
    pub fn generic_signature_of(&self, ctx: DeclContext) -> Option<GenericSigId> {
        let mut current = Some(ctx);
        while let Some(ctx) = current {
            if let DeclContext::Decl(decl) = ctx {
                let decl = self.decl(decl);
                if decl.kind.is_module() {
                    return None;
                }
                if decl.generic_signature.is_some() {
                    return decl.generic_signature;
                }
                // An unconstrained extension sees its nominal's signature.
                if let DeclKind::Extension { extended } = decl.kind {
                    return self.generic_signature_of(DeclContext::Decl(extended));
                }
            }
            current = self.parent_context(ctx);
        }
        None
    }

    /// Generic signature in scope around `decl`, excluding its own.
    pub fn outer_generic_signature(&self, decl: DeclId) -> Option<GenericSigId> {
        self.decl(decl)
            .parent
            .and_then(|parent| self.generic_signature_of(parent))
    }

    /// Parameters `decl` introduces beyond its enclosing context's.
    pub fn own_generic_params(&self, decl: DeclId) -> Vec<GenericParamKey> {
        let Some(sig) = self.decl(decl).generic_signature else {
            return Vec::new();
        };
        let outer = self.outer_generic_signature(decl).map(|outer| self.signature(outer));
        self.signature(sig)
            .params
            .iter()
            .copied()
            .filter(|&key| outer.map_or(true, |outer| !outer.contains_param(key)))
            .collect()
    }

    /// The protocol declaring associated type `assoc`.
    pub fn protocol_of_associated_type(&self, assoc: DeclId) -> Option<DeclId> {
        match self.decl(assoc).parent {
            Some(DeclContext::Decl(proto))
                if matches!(self.decl(proto).kind, DeclKind::Protocol { .. }) =>
            {
                Some(proto)
            }
            _ => None,
        }
    }

    /// The opaque type declaration whose naming declaration is `naming`.
    pub fn opaque_type_of(&self, naming: DeclId) -> Option<DeclId> {
        self.decl_ids().find(
            |&id| matches!(self.decl(id).kind, DeclKind::OpaqueType { naming: n } if n == naming),
        )
    }

    // === Types ===

    /// Nominal declaration of a nominal or bound generic type.
    pub fn nominal_decl_of(&self, ty: Idx) -> Option<DeclId> {
        let canonical = self.pool.canonical(ty);
        self.pool.nominal_info(canonical).map(|nominal| nominal.decl)
    }

    /// All generic arguments of a nominal type, outermost level first.
    pub fn flattened_generic_args(&self, ty: Idx) -> Vec<Idx> {
        let mut args = Vec::new();
        self.collect_generic_args(self.pool.canonical(ty), &mut args);
        args
    }

    fn collect_generic_args(&self, ty: Idx, out: &mut Vec<Idx>) {
        if let Some(nominal) = self.pool.nominal_info(ty) {
            if let Some(parent) = nominal.parent {
                self.collect_generic_args(parent, out);
            }
            out.extend(nominal.args);
        }
    }

    /// Replacement for `key` in `subs`.
    pub fn replacement_for(&self, subs: &SubstitutionMap, key: GenericParamKey) -> Option<Idx> {
        self.signature(subs.signature)
            .param_position(key)
            .and_then(|pos| subs.replacements.get(pos).copied())
    }

    /// Build a substitution map for `signature`, looking up the conformance
    /// of every conformance requirement's replacement.
    pub fn substitution_map(&self, signature: GenericSigId, replacements: Vec<Idx>) -> SubstitutionMap {
        let sig = self.signature(signature);
        let conformances = sig
            .conformance_requirements()
            .map(|(subject, protocol)| {
                let replacement = self
                    .pool
                    .generic_param_key(subject)
                    .and_then(|key| sig.param_position(key))
                    .and_then(|pos| replacements.get(pos).copied());
                match replacement {
                    Some(ty) => self.lookup_conformance(ty, protocol),
                    None => ProtocolConformanceRef::Abstract(protocol),
                }
            })
            .collect();
        SubstitutionMap::new(signature, replacements, conformances)
    }

    /// Substitutions that turn the nominal's interface type into `ty`.
    pub fn context_substitutions(&self, ty: Idx) -> Option<SubstitutionMap> {
        let decl = self.nominal_decl_of(ty)?;
        let signature = self.generic_signature_of(DeclContext::Decl(decl))?;
        let args = self.flattened_generic_args(ty);
        if args.len() != self.signature(signature).params.len() {
            return None;
        }
        Some(self.substitution_map(signature, args))
    }

    // === Conformances ===

    /// Find the conformance of `ty` to `protocol`.
    ///
    /// Type parameters and types without a recorded conformance yield an
    /// abstract conformance.
    pub fn lookup_conformance(&self, ty: Idx, protocol: DeclId) -> ProtocolConformanceRef {
        let canonical = self.pool.canonical(ty);
        let Some(nominal) = self.nominal_decl_of(canonical) else {
            return ProtocolConformanceRef::Abstract(protocol);
        };
        self.conformance_ids()
            .find(|&id| {
                let conformance = self.conformance(id);
                self.root_conformance(id).protocol == protocol
                    && self.nominal_decl_of(conformance.conforming_type()) == Some(nominal)
            })
            .map_or(ProtocolConformanceRef::Abstract(protocol), |conformance| {
                ProtocolConformanceRef::Concrete {
                    conformance,
                    ty: canonical,
                }
            })
    }

    /// The normal conformance an inherited conformance derives from.
    pub fn root_conformance(&self, id: ConformanceId) -> &NormalConformance {
        let mut current = id;
        loop {
            match self.conformance(current) {
                ProtocolConformance::Normal(normal) => return normal,
                ProtocolConformance::Inherited { base, .. } => current = *base,
            }
        }
    }

    /// A conformance is retroactive when declared in a module that owns
    /// neither the conforming type nor the protocol.
    pub fn is_retroactive(&self, id: ConformanceId) -> bool {
        let root = self.root_conformance(id);
        let conformance_module = self.module_of_decl(root.context);
        let type_module = self
            .nominal_decl_of(root.ty)
            .and_then(|decl| self.module_of_decl(decl));
        let protocol_module = self.module_of_decl(root.protocol);
        conformance_module != type_module && conformance_module != protocol_module
    }

    /// Conformances that the conditional requirements of `id` need when it
    /// is applied to `ty`, paired with the type that conforms.
    pub fn conditional_requirements(
        &self,
        id: ConformanceId,
        ty: Idx,
    ) -> Vec<(Idx, ProtocolConformanceRef)> {
        let root = self.root_conformance(id);
        let Some(conditional) = root.conditional_signature else {
            return Vec::new();
        };
        let nominal_sig = self
            .nominal_decl_of(root.ty)
            .and_then(|decl| self.generic_signature_of(DeclContext::Decl(decl)))
            .map(|sig| self.signature(sig));
        let Some(subs) = self.context_substitutions(ty) else {
            return Vec::new();
        };

        self.signature(conditional)
            .requirements
            .iter()
            .filter(|req| nominal_sig.map_or(true, |sig| !sig.requirements.contains(req)))
            .filter_map(|req| match req.kind {
                RequirementKind::Conformance(protocol) => {
                    let key = self.pool.generic_param_key(req.subject)?;
                    let replacement = self.replacement_for(&subs, key)?;
                    Some((replacement, self.lookup_conformance(replacement, protocol)))
                }
                _ => None,
            })
            .collect()
    }

    /// Protocols `ty` is directly required to conform to in `signature`.
    pub fn required_protocols(&self, signature: GenericSigId, ty: Idx) -> SmallVec<[DeclId; 2]> {
        self.signature(signature)
            .conformance_requirements()
            .filter(|&(subject, _)| subject == ty)
            .map(|(_, protocol)| protocol)
            .collect()
    }

    /// Derive the conformance of type parameter `ty` to `protocol` from the
    /// requirements of `signature`.
    ///
    /// A direct requirement is a single root step. A dependent member
    /// `Base.A` conforms through its protocol's associated conformance,
    /// after the path for `Base`.
    pub fn conformance_access_path(
        &self,
        signature: GenericSigId,
        ty: Idx,
        protocol: DeclId,
    ) -> Option<Vec<ConformanceStep>> {
        let sig = self.signature(signature);
        if let Some(pos) = sig
            .conformance_requirements()
            .position(|(subject, proto)| subject == ty && proto == protocol)
        {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "requirement lists are short"
            )]
            let requirement = pos as u32;
            return Some(vec![ConformanceStep::Root {
                subject: ty,
                protocol,
                requirement,
            }]);
        }

        if self.pool.tag(ty) != Tag::DependentMember {
            return None;
        }
        let (base, assoc) = self.pool.dependent_member_info(ty)?;
        let owner = self.protocol_of_associated_type(assoc)?;
        let DeclKind::Protocol {
            associated_conformances,
        } = &self.decl(owner).kind
        else {
            return None;
        };
        let index = associated_conformances
            .iter()
            .position(|ac| ac.associated_type == assoc && ac.protocol == protocol)?;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "associated conformance lists are short"
        )]
        let index = index as u32;
        let mut path = self.conformance_access_path(signature, base, owner)?;
        path.push(ConformanceStep::Associated {
            subject: ty,
            protocol,
            index,
        });
        Some(path)
    }
}
