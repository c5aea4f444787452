//! Entity productions and the public symbol manglings built on them.
//!
//! ```text
//! entity ::= context decl-name type 'F' 'Z'?      // function
//!        ::= context decl-name type 'vp' 'Z'?     // variable
//!        ::= context type 'ip' 'Z'?               // subscript
//!        ::= context decl-name type 'fO'          // enum element
//!        ::= context type ('fC' | 'fc')           // constructor
//!        ::= context ('fD' | 'fd')                // destructor
//!        ::= context decl-name 'Qy'               // associated type
//!        ::= nominal | opaque-decl
//! closure-entity ::= context type ('fU' | 'fu') INDEX
//! accessor-entity ::= context decl-name? type ('v' | 'i') ACCESSOR 'Z'?
//! ```

mod autodiff;
mod debug;
mod decl;
mod keypath;
mod thunk;

pub use thunk::WitnessRequirement;

use quill_ir::{AccessorKind, ClosureId, DeclContext, DeclId, DeclKind, Tag};

use crate::{MangleError, Mangler};

impl Mangler<'_> {
    pub(crate) fn append_entity(&mut self, decl: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        match program.decl(decl).kind {
            DeclKind::Func => self.append_value_entity(decl, true, "F"),
            DeclKind::Var => self.append_value_entity(decl, true, "vp"),
            DeclKind::Subscript => self.append_value_entity(decl, false, "ip"),
            DeclKind::EnumElement => self.append_value_entity(decl, true, "fO"),
            DeclKind::Constructor => self.append_constructor_entity(decl, true),
            DeclKind::Destructor => self.append_destructor_entity(decl, true),
            DeclKind::AssociatedType => {
                self.append_context_of(decl)?;
                self.append_decl_name(decl)?;
                self.append_operator("Qy");
                Ok(())
            }
            DeclKind::OpaqueType { .. } => self.append_opaque_decl(decl),
            DeclKind::Module
            | DeclKind::ForeignModule
            | DeclKind::Extension { .. }
            | DeclKind::Struct
            | DeclKind::Enum
            | DeclKind::Class
            | DeclKind::Protocol { .. }
            | DeclKind::TypeAlias => self.append_context(DeclContext::Decl(decl)),
        }
    }

    pub(crate) fn append_value_entity(
        &mut self,
        decl: DeclId,
        with_name: bool,
        op: &str,
    ) -> Result<(), MangleError> {
        self.append_context_of(decl)?;
        if with_name {
            self.append_decl_name(decl)?;
        }
        self.append_decl_type(decl)?;
        self.append_operator(op);
        if self.program.decl(decl).is_static() {
            self.append_operator("Z");
        }
        Ok(())
    }

    pub(crate) fn append_constructor_entity(
        &mut self,
        decl: DeclId,
        allocating: bool,
    ) -> Result<(), MangleError> {
        self.append_context_of(decl)?;
        self.append_decl_type(decl)?;
        self.append_operator(if allocating { "fC" } else { "fc" });
        Ok(())
    }

    pub(crate) fn append_destructor_entity(
        &mut self,
        decl: DeclId,
        deallocating: bool,
    ) -> Result<(), MangleError> {
        self.append_context_of(decl)?;
        self.append_operator(if deallocating { "fD" } else { "fd" });
        Ok(())
    }

    /// Append the interface type of `decl` followed by the part of its
    /// generic signature its context does not provide.
    ///
    /// ```text
    /// decl-type ::= type generic-signature? 'u'?
    /// ```
    ///
    /// The trailing `u` marks a generic non-function type.
    pub(crate) fn append_decl_type(&mut self, decl: DeclId) -> Result<(), MangleError> {
        let program = self.program;
        let d = program.decl(decl);
        let ty = d.interface_type.ok_or(MangleError::UnexpectedEntity {
            decl,
            expected: "a declaration with an interface type",
        })?;
        let is_function = program.pool().tag(ty) == Tag::Function;
        let bound = program.generic_signature_of(DeclContext::Decl(decl));

        let saved_owner = self.opaque_owner.replace(decl);
        let result = self.with_generic_signature(bound, |m| {
            if is_function {
                m.append_function_type(ty, &d.arg_labels)
            } else {
                m.append_type(ty)
            }
        });
        self.opaque_owner = saved_owner;
        result?;

        if let Some(signature) = d.generic_signature {
            let context = program.outer_generic_signature(decl);
            if self.append_generic_signature(signature, context)? && !is_function {
                self.append_operator("u");
            }
        }
        Ok(())
    }

    pub(crate) fn append_closure_entity(&mut self, closure: ClosureId) -> Result<(), MangleError> {
        let program = self.program;
        let c = program.closure(closure);
        self.append_context(c.parent)?;
        let bound = program.generic_signature_of(DeclContext::Closure(closure));
        self.with_generic_signature(bound, |m| m.append_type(c.ty))?;
        self.append_operator_with_index(if c.implicit { "fu" } else { "fU" }, c.discriminator);
        Ok(())
    }

    pub(crate) fn append_accessor_entity(
        &mut self,
        storage: DeclId,
        kind: AccessorKind,
    ) -> Result<(), MangleError> {
        let program = self.program;
        let d = program.decl(storage);
        let (storage_op, with_name) = match d.kind {
            DeclKind::Var => ("v", true),
            DeclKind::Subscript => ("i", false),
            _ => {
                return Err(MangleError::UnexpectedEntity {
                    decl: storage,
                    expected: "a property or subscript",
                })
            }
        };

        self.append_context_of(storage)?;
        if with_name {
            self.append_decl_name(storage)?;
        }
        self.append_decl_type(storage)?;
        self.append_operator(storage_op);
        self.append_operator(accessor_code(kind));
        if d.is_static() {
            self.append_operator("Z");
        }
        Ok(())
    }
}

const fn accessor_code(kind: AccessorKind) -> &'static str {
    match kind {
        AccessorKind::Get => "g",
        AccessorKind::Set => "s",
        AccessorKind::Read => "r",
        AccessorKind::Modify => "M",
        AccessorKind::WillSet => "w",
        AccessorKind::DidSet => "W",
        AccessorKind::Address => "lu",
        AccessorKind::MutableAddress => "au",
        AccessorKind::Init => "i",
    }
}
