//! Declaration, closure and storage symbols.

use quill_ir::{AccessorKind, ClosureId, DeclContext, DeclId, DeclKind, PatternBindingId};

use crate::{MangleError, Mangler, SymbolKind, MANGLING_PREFIX};

impl Mangler<'_> {
    /// Symbol of a value declaration: function, variable, subscript, enum
    /// element, constructor or destructor.
    pub fn mangle_entity(&mut self, decl: DeclId, kind: SymbolKind) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "entity", |m| {
            m.append_operator(kind.operator());
            m.append_entity(decl)
        })
    }

    pub fn mangle_closure(
        &mut self,
        closure: ClosureId,
        kind: SymbolKind,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "closure", |m| {
            m.append_operator(kind.operator());
            m.append_closure_entity(closure)
        })
    }

    /// Allocating (`fC`) or initializing (`fc`) entry point of a
    /// constructor.
    pub fn mangle_constructor(
        &mut self,
        decl: DeclId,
        allocating: bool,
        kind: SymbolKind,
    ) -> Result<String, MangleError> {
        self.expect_kind(decl, |k| matches!(k, DeclKind::Constructor), "a constructor")?;
        self.mangle(MANGLING_PREFIX, "constructor", |m| {
            m.append_operator(kind.operator());
            m.append_constructor_entity(decl, allocating)
        })
    }

    /// Deallocating (`fD`) or destroying (`fd`) entry point of a
    /// destructor.
    pub fn mangle_destructor(
        &mut self,
        decl: DeclId,
        deallocating: bool,
        kind: SymbolKind,
    ) -> Result<String, MangleError> {
        self.expect_kind(decl, |k| matches!(k, DeclKind::Destructor), "a destructor")?;
        self.mangle(MANGLING_PREFIX, "destructor", |m| {
            m.append_operator(kind.operator());
            m.append_destructor_entity(decl, deallocating)
        })
    }

    /// Instance variable initializer (`fe`) or destroyer (`fE`) of a class.
    pub fn mangle_ivar_initializer(
        &mut self,
        class: DeclId,
        is_destroyer: bool,
        kind: SymbolKind,
    ) -> Result<String, MangleError> {
        self.expect_kind(class, |k| matches!(k, DeclKind::Class), "a class")?;
        self.mangle(MANGLING_PREFIX, "ivar initializer", |m| {
            m.append_operator(kind.operator());
            m.append_nominal_decl(class)?;
            m.append_operator(if is_destroyer { "fE" } else { "fe" });
            Ok(())
        })
    }

    pub fn mangle_accessor(
        &mut self,
        storage: DeclId,
        accessor: AccessorKind,
        kind: SymbolKind,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "accessor", |m| {
            m.append_operator(kind.operator());
            m.append_accessor_entity(storage, accessor)
        })
    }

    /// Lazy getter of a global variable.
    pub fn mangle_global_getter(&mut self, var: DeclId) -> Result<String, MangleError> {
        self.expect_kind(var, |k| matches!(k, DeclKind::Var), "a variable")?;
        self.mangle(MANGLING_PREFIX, "global getter", |m| {
            m.append_value_entity(var, true, "vG")
        })
    }

    pub fn mangle_global_variable(&mut self, var: DeclId) -> Result<String, MangleError> {
        self.expect_kind(var, |k| matches!(k, DeclKind::Var), "a variable")?;
        self.mangle(MANGLING_PREFIX, "global variable", |m| m.append_entity(var))
    }

    /// Generator of default argument `index` of `owner`.
    pub fn mangle_default_argument(
        &mut self,
        owner: DeclId,
        index: u32,
    ) -> Result<String, MangleError> {
        let program = self.program;
        let param_count = program
            .decl(owner)
            .interface_type
            .and_then(|ty| program.pool().function_info(ty))
            .map(|function| function.params.len())
            .ok_or(MangleError::UnexpectedEntity {
                decl: owner,
                expected: "a declaration with a function type",
            })?;
        let position = usize::try_from(index).unwrap_or(usize::MAX);
        if position >= param_count {
            return Err(MangleError::InvalidIndex {
                index: position,
                len: param_count,
            });
        }
        self.mangle(MANGLING_PREFIX, "default argument", |m| {
            m.append_context(DeclContext::DefaultArgument { owner, index })
        })
    }

    /// Initial-value expression of a stored property.
    pub fn mangle_initializer(&mut self, var: DeclId) -> Result<String, MangleError> {
        self.expect_kind(var, |k| matches!(k, DeclKind::Var), "a variable")?;
        self.mangle(MANGLING_PREFIX, "initializer", |m| {
            m.append_context(DeclContext::Initializer(var))
        })
    }

    /// Initializer of the backing storage of a wrapped property.
    pub fn mangle_backing_initializer(&mut self, var: DeclId) -> Result<String, MangleError> {
        self.expect_kind(var, |k| matches!(k, DeclKind::Var), "a variable")?;
        self.mangle(MANGLING_PREFIX, "backing initializer", |m| {
            m.append_entity(var)?;
            m.append_operator("fP");
            Ok(())
        })
    }

    pub fn mangle_nominal_type(&mut self, decl: DeclId) -> Result<String, MangleError> {
        self.expect_kind(decl, DeclKind::is_nominal, "a nominal type")?;
        self.mangle_subject(MANGLING_PREFIX, "nominal type", decl, |m| {
            m.append_nominal_decl(decl)
        })
    }

    /// Local type declaration, spelled without the global prefix.
    pub fn mangle_local_type_decl(&mut self, decl: DeclId) -> Result<String, MangleError> {
        self.expect_kind(decl, DeclKind::is_nominal, "a nominal type")?;
        self.mangle_subject("", "local type", decl, |m| m.append_nominal_decl(decl))
    }

    /// One-time initializer of the variables in entry `entry` of a global
    /// pattern binding: the token (`Wz`) or the function (`WZ`).
    ///
    /// ```text
    /// global-init ::= context decl-name ('_' decl-name*)? ('WZ' | 'Wz')
    /// ```
    pub fn mangle_global_init(
        &mut self,
        binding: PatternBindingId,
        entry: usize,
        is_init_func: bool,
    ) -> Result<String, MangleError> {
        let program = self.program;
        let binding = program.pattern_binding(binding);
        let vars = binding.entries.get(entry).ok_or(MangleError::InvalidIndex {
            index: entry,
            len: binding.entries.len(),
        })?;
        if vars.is_empty() {
            return Err(MangleError::EmptyPatternEntry { entry });
        }
        self.mangle(MANGLING_PREFIX, "global init", |m| {
            m.append_context(binding.parent)?;
            for (i, &var) in vars.iter().enumerate() {
                m.append_decl_name(var)?;
                if i == 0 && vars.len() > 1 {
                    m.append_operator("_");
                }
            }
            m.append_operator(if is_init_func { "WZ" } else { "Wz" });
            Ok(())
        })
    }

    /// Interface type of a declaration with its generic signature.
    pub fn mangle_decl_type(&mut self, decl: DeclId) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "declaration type", |m| {
            m.append_decl_type(decl)?;
            m.append_operator("D");
            Ok(())
        })
    }

    pub(crate) fn expect_kind(
        &self,
        decl: DeclId,
        accept: impl Fn(&DeclKind) -> bool,
        expected: &'static str,
    ) -> Result<(), MangleError> {
        if accept(&self.program.decl(decl).kind) {
            Ok(())
        } else {
            Err(MangleError::UnexpectedEntity { decl, expected })
        }
    }
}
