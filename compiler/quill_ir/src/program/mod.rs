//! The program arena.
//!
//! `Program` owns every declaration, closure, signature, conformance and
//! type of a compilation unit. Consumers hold `&Program` and address
//! entities by their ids; nothing is mutated after construction.

mod query;
mod stdlib;

#[cfg(test)]
mod tests;

pub use stdlib::{Stdlib, STDLIB_MODULE_NAME};

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    Closure, ClosureId, ConformanceId, Decl, DeclContext, DeclId, DeclKind, GenericSigId,
    GenericSignature, Idx, Name, PatternBinding, PatternBindingId, Pool, ProtocolConformance,
    StringInterner,
};

/// Arena of a fully resolved program.
pub struct Program {
    interner: StringInterner,
    pool: Pool,
    decls: Vec<Decl>,
    closures: Vec<Closure>,
    pattern_bindings: Vec<PatternBinding>,
    signatures: Vec<GenericSignature>,
    signature_ids: FxHashMap<GenericSignature, GenericSigId>,
    conformances: Vec<ProtocolConformance>,
    stdlib_module: Option<DeclId>,
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "arena sizes stay far below u32::MAX"
)]
fn next_id(len: usize) -> u32 {
    len as u32
}

impl Program {
    pub fn new() -> Self {
        Self {
            interner: StringInterner::new(),
            pool: Pool::new(),
            decls: Vec::new(),
            closures: Vec::new(),
            pattern_bindings: Vec::new(),
            signatures: Vec::new(),
            signature_ids: FxHashMap::default(),
            conformances: Vec::new(),
            stdlib_module: None,
        }
    }

    // === Names ===

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn name_text(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    // === Types ===

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut self.pool
    }

    // === Declarations ===

    pub fn add_decl(&mut self, decl: Decl) -> DeclId {
        let id = DeclId::from_raw(next_id(self.decls.len()));
        trace!(?id, kind = decl.kind.name(), "add decl");
        self.decls.push(decl);
        id
    }

    /// Add a top-level module named `name`.
    pub fn add_module(&mut self, name: &str) -> DeclId {
        let name = self.intern(name);
        self.add_decl(Decl::new(DeclKind::Module, Some(name), None))
    }

    /// Add a module imported from a foreign language.
    pub fn add_foreign_module(&mut self, name: &str) -> DeclId {
        let name = self.intern(name);
        self.add_decl(Decl::new(DeclKind::ForeignModule, Some(name), None))
    }

    /// Add a named declaration of `kind` inside `parent`.
    pub fn add_named(&mut self, kind: DeclKind, name: &str, parent: impl Into<DeclContext>) -> DeclId {
        let name = self.intern(name);
        self.add_decl(Decl::new(kind, Some(name), Some(parent.into())))
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    pub fn decl_mut(&mut self, id: DeclId) -> &mut Decl {
        &mut self.decls[id.index()]
    }

    /// Mark `module` as the standard library.
    pub fn set_stdlib_module(&mut self, module: DeclId) {
        self.stdlib_module = Some(module);
    }

    pub fn stdlib_module(&self) -> Option<DeclId> {
        self.stdlib_module
    }

    // === Closures and pattern bindings ===

    pub fn add_closure(&mut self, closure: Closure) -> ClosureId {
        let id = ClosureId::from_raw(next_id(self.closures.len()));
        self.closures.push(closure);
        id
    }

    #[inline]
    pub fn closure(&self, id: ClosureId) -> &Closure {
        &self.closures[id.index()]
    }

    pub fn add_pattern_binding(&mut self, binding: PatternBinding) -> PatternBindingId {
        let id = PatternBindingId::from_raw(next_id(self.pattern_bindings.len()));
        self.pattern_bindings.push(binding);
        id
    }

    #[inline]
    pub fn pattern_binding(&self, id: PatternBindingId) -> &PatternBinding {
        &self.pattern_bindings[id.index()]
    }

    // === Signatures and conformances ===

    /// Add a generic signature; equal signatures share one id.
    pub fn add_signature(&mut self, signature: GenericSignature) -> GenericSigId {
        if let Some(&id) = self.signature_ids.get(&signature) {
            return id;
        }
        let id = GenericSigId::from_raw(next_id(self.signatures.len()));
        self.signature_ids.insert(signature.clone(), id);
        self.signatures.push(signature);
        id
    }

    #[inline]
    pub fn signature(&self, id: GenericSigId) -> &GenericSignature {
        &self.signatures[id.index()]
    }

    pub fn add_conformance(&mut self, conformance: ProtocolConformance) -> ConformanceId {
        let id = ConformanceId::from_raw(next_id(self.conformances.len()));
        self.conformances.push(conformance);
        id
    }

    #[inline]
    pub fn conformance(&self, id: ConformanceId) -> &ProtocolConformance {
        &self.conformances[id.index()]
    }

    fn conformance_ids(&self) -> impl Iterator<Item = ConformanceId> {
        (0..next_id(self.conformances.len())).map(ConformanceId::from_raw)
    }

    fn decl_ids(&self) -> impl Iterator<Item = DeclId> {
        (0..next_id(self.decls.len())).map(DeclId::from_raw)
    }

    /// The interface type of a nominal declaration: the nominal applied to
    /// its own generic parameters, nested in its generic parent's type.
    pub fn declared_interface_type(&mut self, decl: DeclId) -> Idx {
        let parent_ty = match self.decl(decl).parent {
            Some(DeclContext::Decl(parent))
                if self.decl(parent).kind.is_nominal()
                    && self.generic_signature_of(DeclContext::Decl(parent)).is_some() =>
            {
                Some(self.declared_interface_type(parent))
            }
            _ => None,
        };

        let own = self.own_generic_params(decl);
        if own.is_empty() {
            self.pool.nominal(decl, parent_ty)
        } else {
            let args: Vec<Idx> = own.into_iter().map(|key| self.pool.generic_param(key)).collect();
            self.pool.bound_generic(decl, parent_ty, &args)
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
