//! Standard library declarations.
//!
//! The mangler spells a handful of standard library types with reserved
//! short forms, so the program must know which declarations they are.

use super::Program;
use crate::{
    Decl, DeclContext, DeclId, DeclKind, GenericParamKey, GenericSignature, Idx, NormalConformance,
    ProtocolConformance, Requirement,
};

/// Name of the standard library module.
pub const STDLIB_MODULE_NAME: &str = "Std";

/// Handles to the standard library declarations.
#[derive(Copy, Clone, Debug)]
pub struct Stdlib {
    pub module: DeclId,
    pub int: DeclId,
    pub uint: DeclId,
    pub bool: DeclId,
    pub double: DeclId,
    pub float: DeclId,
    pub string: DeclId,
    pub character: DeclId,
    pub optional: DeclId,
    pub array: DeclId,
    pub dictionary: DeclId,
    pub set: DeclId,
    pub equatable: DeclId,
    pub hashable: DeclId,
}

impl Program {
    /// Declare the standard library module and its core types, and mark it
    /// as the standard library.
    pub fn install_stdlib(&mut self) -> Stdlib {
        let module = self.add_module(STDLIB_MODULE_NAME);
        self.set_stdlib_module(module);

        let protocol = || DeclKind::Protocol {
            associated_conformances: Vec::new(),
        };
        let equatable = self.add_named(protocol(), "Equatable", module);
        let hashable = self.add_named(protocol(), "Hashable", module);

        let t0 = self.pool_mut().generic_param(GenericParamKey::new(0, 0));
        let one_param = self.add_signature(GenericSignature::new(
            vec![GenericParamKey::new(0, 0)],
            Vec::new(),
        ));
        let hashable_param = self.add_signature(GenericSignature::new(
            vec![GenericParamKey::new(0, 0)],
            vec![Requirement::conformance(t0, hashable)],
        ));
        let hashable_key = self.add_signature(GenericSignature::new(
            vec![GenericParamKey::new(0, 0), GenericParamKey::new(0, 1)],
            vec![Requirement::conformance(t0, hashable)],
        ));

        let nominal = |program: &mut Self, kind: DeclKind, name: &str| {
            program.add_named(kind, name, module)
        };
        let int = nominal(self, DeclKind::Struct, "Int");
        let uint = nominal(self, DeclKind::Struct, "UInt");
        let bool = nominal(self, DeclKind::Struct, "Bool");
        let double = nominal(self, DeclKind::Struct, "Double");
        let float = nominal(self, DeclKind::Struct, "Float");
        let string = nominal(self, DeclKind::Struct, "String");
        let character = nominal(self, DeclKind::Struct, "Character");

        let generic = |program: &mut Self, kind: DeclKind, name: &str, sig| {
            let name = program.intern(name);
            program.add_decl(
                Decl::new(kind, Some(name), Some(DeclContext::Decl(module))).with_signature(sig),
            )
        };
        let optional = generic(self, DeclKind::Enum, "Optional", one_param);
        let array = generic(self, DeclKind::Struct, "Array", one_param);
        let set = generic(self, DeclKind::Struct, "Set", hashable_param);
        let dictionary = generic(self, DeclKind::Struct, "Dictionary", hashable_key);

        for decl in [int, uint, bool, double, float, string, character] {
            let ty = self.pool_mut().nominal(decl, None);
            for protocol in [equatable, hashable] {
                self.add_conformance(ProtocolConformance::Normal(NormalConformance {
                    ty,
                    protocol,
                    context: decl,
                    conditional_signature: None,
                }));
            }
        }

        Stdlib {
            module,
            int,
            uint,
            bool,
            double,
            float,
            string,
            character,
            optional,
            array,
            dictionary,
            set,
            equatable,
            hashable,
        }
    }
}

impl Stdlib {
    /// The canonical type of a non-generic standard library nominal.
    pub fn ty(&self, program: &mut Program, decl: DeclId) -> Idx {
        program.pool_mut().nominal(decl, None)
    }

    /// `Optional<inner>`.
    pub fn optional_of(&self, program: &mut Program, inner: Idx) -> Idx {
        program.pool_mut().bound_generic(self.optional, None, &[inner])
    }

    /// `Array<element>`.
    pub fn array_of(&self, program: &mut Program, element: Idx) -> Idx {
        program.pool_mut().bound_generic(self.array, None, &[element])
    }

    /// `Dictionary<key, value>`.
    pub fn dictionary_of(&self, program: &mut Program, key: Idx, value: Idx) -> Idx {
        program
            .pool_mut()
            .bound_generic(self.dictionary, None, &[key, value])
    }

    /// `inner?`, sugar for `Optional<inner>`.
    pub fn optional_sugar(&self, program: &mut Program, inner: Idx) -> Idx {
        let desugared = self.optional_of(program, inner);
        program.pool_mut().optional_sugar(inner, desugared)
    }

    /// `[element]`, sugar for `Array<element>`.
    pub fn array_sugar(&self, program: &mut Program, element: Idx) -> Idx {
        let desugared = self.array_of(program, element);
        program.pool_mut().array_sugar(element, desugared)
    }

    /// `[key: value]`, sugar for `Dictionary<key, value>`.
    pub fn dictionary_sugar(&self, program: &mut Program, key: Idx, value: Idx) -> Idx {
        let desugared = self.dictionary_of(program, key, value);
        program.pool_mut().dictionary_sugar(key, value, desugared)
    }
}
