//! Program fixtures for mangler tests.
//!
//! `Fixture` wraps a program with the standard library installed and one
//! user module `M`, plus shorthands for the declarations tests build most.

use quill_ir::{
    Decl, DeclContext, DeclId, DeclKind, FnParam, FunctionExtInfo, GenericParamKey, GenericSigId,
    GenericSignature, Idx, Name, Program, Requirement, Stdlib,
};

use crate::{Mangler, ManglerOptions};

pub(crate) struct Fixture {
    pub program: Program,
    pub std: Stdlib,
    /// User module `M`.
    pub module: DeclId,
}

impl Fixture {
    pub fn new() -> Self {
        crate::init_tracing();
        let mut program = Program::new();
        let std = program.install_stdlib();
        let module = program.add_module("M");
        Self {
            program,
            std,
            module,
        }
    }

    pub fn mangler(&self) -> Mangler<'_> {
        Mangler::new(&self.program, ManglerOptions::default())
    }

    pub fn mangler_with(&self, options: ManglerOptions) -> Mangler<'_> {
        Mangler::new(&self.program, options)
    }

    pub fn name(&self, text: &str) -> Name {
        self.program.intern(text)
    }

    pub fn int(&mut self) -> Idx {
        self.std.ty(&mut self.program, self.std.int)
    }

    pub fn bool(&mut self) -> Idx {
        self.std.ty(&mut self.program, self.std.bool)
    }

    /// Declare a nominal type and return it with its interface type.
    pub fn nominal(
        &mut self,
        kind: DeclKind,
        name: &str,
        parent: impl Into<DeclContext>,
    ) -> (DeclId, Idx) {
        let decl = self.program.add_named(kind, name, parent);
        let ty = self.program.declared_interface_type(decl);
        (decl, ty)
    }

    /// Declare a generic nominal type with `signature`.
    pub fn generic_nominal(
        &mut self,
        kind: DeclKind,
        name: &str,
        parent: impl Into<DeclContext>,
        signature: GenericSigId,
    ) -> (DeclId, Idx) {
        let decl = self.add(
            Decl::new(kind, Some(self.name(name)), Some(parent.into())).with_signature(signature),
        );
        let ty = self.program.declared_interface_type(decl);
        (decl, ty)
    }

    pub fn protocol(&mut self, name: &str, parent: impl Into<DeclContext>) -> DeclId {
        let kind = DeclKind::Protocol {
            associated_conformances: Vec::new(),
        };
        self.program.add_named(kind, name, parent)
    }

    pub fn add(&mut self, decl: Decl) -> DeclId {
        self.program.add_decl(decl)
    }

    /// Native function type without attributes.
    pub fn fn_type(&mut self, params: &[Idx], result: Idx) -> Idx {
        let params: Vec<_> = params.iter().copied().map(FnParam::new).collect();
        self.program
            .pool_mut()
            .function(&params, result, FunctionExtInfo::default())
    }

    pub fn func(&mut self, name: &str, parent: impl Into<DeclContext>, ty: Idx) -> DeclId {
        self.value(DeclKind::Func, name, parent, ty)
    }

    pub fn var(&mut self, name: &str, parent: impl Into<DeclContext>, ty: Idx) -> DeclId {
        self.value(DeclKind::Var, name, parent, ty)
    }

    pub fn value(
        &mut self,
        kind: DeclKind,
        name: &str,
        parent: impl Into<DeclContext>,
        ty: Idx,
    ) -> DeclId {
        self.add(Decl::new(kind, Some(self.name(name)), Some(parent.into())).with_type(ty))
    }

    /// Generic parameter type `τ_depth_index`.
    pub fn param(&mut self, depth: u32, index: u32) -> Idx {
        self.program
            .pool_mut()
            .generic_param(GenericParamKey::new(depth, index))
    }

    pub fn signature(&mut self, params: &[(u32, u32)], requirements: Vec<Requirement>) -> GenericSigId {
        let params = params
            .iter()
            .map(|&(depth, index)| GenericParamKey::new(depth, index))
            .collect();
        self.program
            .add_signature(GenericSignature::new(params, requirements))
    }
}
