//! Declaration contexts, names and nominal declarations.
//!
//! ```text
//! context ::= module | nominal | extension | entity | closure-entity
//!         ::= entity 'fi'                          // property initializer
//!         ::= entity 'fA' INDEX                    // default argument
//! module ::= 's' | 'So' | identifier
//! nominal ::= context decl-name ('V' | 'O' | 'C' | 'P' | 'a')
//!         ::= STANDARD-SUBSTITUTION | SYMBOLIC-REFERENCE
//! extension ::= nominal module generic-signature? ('E' | 'XE')
//! decl-name ::= (identifier | 'Xn') ('L' INDEX | identifier 'LL')?
//! opaque-decl ::= entity 'QO' | SYMBOLIC-REFERENCE
//! ```

use quill_ir::{DeclContext, DeclFlags, DeclId, DeclKind};

use crate::substitution::{standard_substitution, SubstKey, FOREIGN_MODULE, STDLIB_MODULE};
use crate::{MangleError, Mangler};

impl Mangler<'_> {
    pub(crate) fn append_context(&mut self, ctx: DeclContext) -> Result<(), MangleError> {
        match ctx {
            DeclContext::Decl(decl) => self.append_decl_context(decl),
            DeclContext::Closure(closure) => self.append_closure_entity(closure),
            DeclContext::Initializer(var) => {
                self.append_entity(var)?;
                self.append_operator("fi");
                Ok(())
            }
            DeclContext::DefaultArgument { owner, index } => {
                self.append_entity(owner)?;
                self.append_operator_with_index("fA", index);
                Ok(())
            }
            DeclContext::Accessor { storage, kind } => self.append_accessor_entity(storage, kind),
        }
    }

    /// Append the context enclosing `decl`.
    pub(crate) fn append_context_of(&mut self, decl: DeclId) -> Result<(), MangleError> {
        match self.program.decl(decl).parent {
            Some(parent) => self.append_context(parent),
            None => Err(MangleError::UnexpectedEntity {
                decl,
                expected: "a declaration inside a module",
            }),
        }
    }

    fn append_decl_context(&mut self, decl: DeclId) -> Result<(), MangleError> {
        match self.program.decl(decl).kind {
            DeclKind::Module | DeclKind::ForeignModule => self.append_module(decl),
            DeclKind::Extension { extended } => self.append_extension(decl, extended),
            DeclKind::TypeAlias => self.append_nominal_decl(decl),
            ref kind if kind.is_nominal() => self.append_nominal_decl(decl),
            _ => self.append_entity(decl),
        }
    }

    pub(crate) fn append_module(&mut self, module: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        if program.is_stdlib_module(module) {
            self.append_operator(STDLIB_MODULE);
            return Ok(());
        }
        match program.decl(module).kind {
            DeclKind::ForeignModule => {
                self.append_operator(FOREIGN_MODULE);
                Ok(())
            }
            DeclKind::Module => {
                let key = SubstKey::Decl(module);
                if self.try_substitution(key) {
                    return Ok(());
                }
                self.append_decl_name(module)?;
                self.add_substitution(key);
                Ok(())
            }
            _ => Err(MangleError::UnexpectedEntity {
                decl: module,
                expected: "a module",
            }),
        }
    }

    /// Append the module declaring `decl`.
    pub(crate) fn append_module_of(&mut self, decl: DeclId) -> Result<(), MangleError> {
        let module = self
            .program
            .module_of_decl(decl)
            .ok_or(MangleError::UnexpectedEntity {
                decl,
                expected: "a declaration inside a module",
            })?;
        self.append_module(module)
    }

    /// Append a nominal type or type alias declaration.
    pub(crate) fn append_nominal_decl(&mut self, decl: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        let kind_op = match program.decl(decl).kind {
            DeclKind::Struct => "V",
            DeclKind::Enum => "O",
            DeclKind::Class => "C",
            DeclKind::Protocol { .. } => "P",
            DeclKind::TypeAlias => "a",
            _ => {
                return Err(MangleError::UnexpectedEntity {
                    decl,
                    expected: "a nominal type or type alias",
                })
            }
        };

        if let Some(standard) = self.standard_substitution_for(decl) {
            self.append_operator(standard);
            return Ok(());
        }
        if kind_op != "a" && self.try_symbolic_reference(decl)? {
            return Ok(());
        }
        let key = SubstKey::Decl(decl);
        if self.try_substitution(key) {
            return Ok(());
        }

        self.append_context_of(decl)?;
        self.append_decl_name(decl)?;
        self.append_operator(kind_op);
        self.add_substitution(key);
        Ok(())
    }

    pub(crate) fn append_protocol(&mut self, protocol: DeclId) -> Result<(), MangleError> {
        if !matches!(self.program.decl(protocol).kind, DeclKind::Protocol { .. }) {
            return Err(MangleError::UnexpectedEntity {
                decl: protocol,
                expected: "a protocol",
            });
        }
        self.append_nominal_decl(protocol)
    }

    fn standard_substitution_for(&self, decl: DeclId) -> Option<&'static str> {
        let program = self.program;
        let d = program.decl(decl);
        match d.parent {
            Some(DeclContext::Decl(parent)) if program.is_stdlib_module(parent) => {
                standard_substitution(program.name_text(d.name?))
            }
            _ => None,
        }
    }

    /// An extension is spelled out only when it lives in another module
    /// than its nominal or adds requirements; otherwise its members use the
    /// nominal as context.
    fn append_extension(&mut self, ext: DeclId, extended: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        let own_signature = program.decl(ext).generic_signature;
        let nominal_signature = program.generic_signature_of(DeclContext::Decl(extended));
        let constrained = own_signature.is_some_and(|sig| Some(sig) != nominal_signature);
        let same_module = program.module_of_decl(ext) == program.module_of_decl(extended);

        self.append_nominal_decl(extended)?;
        if same_module && !constrained {
            return Ok(());
        }
        self.append_module_of(ext)?;
        let with_signature = match own_signature {
            Some(sig) => self.append_generic_signature(sig, nominal_signature)?,
            None => false,
        };
        self.append_operator(if with_signature { "XE" } else { "E" });
        Ok(())
    }

    /// Append the name of `decl` with its local or private discriminator.
    pub(crate) fn append_decl_name(&mut self, decl: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        let d = program.decl(decl);
        match self.decl_identifier(decl)? {
            Some(text) => self.append_identifier(text),
            None => self.append_operator("Xn"),
        }
        if let Some(discriminator) = d.local_discriminator {
            self.append_operator_with_index("L", discriminator);
        } else if let Some(private) = d.private_discriminator {
            self.append_identifier(program.name_text(private));
            self.append_operator("LL");
        }
        Ok(())
    }

    /// The identifier spelling `decl`, or `None` for a tolerated nameless
    /// declaration.
    fn decl_identifier(&self, decl: DeclId) -> Result<Option<&'static str>, MangleError> {
        let program = self.program;
        let d = program.decl(decl);
        if self.options.use_objc_runtime_names && d.flags.contains(DeclFlags::FOREIGN_VISIBLE) {
            if let Some(foreign) = d.foreign_name {
                return Ok(Some(program.name_text(foreign)));
            }
        }
        match d.name {
            Some(name) => Ok(Some(program.name_text(name))),
            None if self.options.allow_nameless => Ok(None),
            None => Err(MangleError::NamelessEntity { decl }),
        }
    }

    pub(crate) fn append_opaque_decl(&mut self, opaque: DeclId) -> Result<(), MangleError> {
        let DeclKind::OpaqueType { naming } = self.program.decl(opaque).kind else {
            return Err(MangleError::UnexpectedEntity {
                decl: opaque,
                expected: "an opaque type declaration",
            });
        };
        if self.try_symbolic_reference(opaque)? {
            return Ok(());
        }
        let key = SubstKey::Decl(opaque);
        if self.try_substitution(key) {
            return Ok(());
        }
        self.append_entity(naming)?;
        self.append_operator("QO");
        self.add_substitution(key);
        Ok(())
    }
}
