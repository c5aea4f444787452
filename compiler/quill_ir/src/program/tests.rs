use pretty_assertions::assert_eq;

use super::*;
use crate::{
    AssociatedConformance, ConformanceStep, GenericParamKey, NormalConformance,
    ProtocolConformanceRef, Requirement,
};

fn protocol() -> DeclKind {
    DeclKind::Protocol {
        associated_conformances: Vec::new(),
    }
}

#[test]
fn module_of_walks_to_root() {
    let mut program = Program::new();
    let module = program.add_module("M");
    let outer = program.add_named(DeclKind::Struct, "Outer", module);
    let method = program.add_named(DeclKind::Func, "run", outer);
    let closure = program.add_closure(Closure {
        parent: DeclContext::Decl(method),
        discriminator: 0,
        ty: Idx::EMPTY_TUPLE,
        implicit: false,
    });

    assert_eq!(program.module_of(DeclContext::Closure(closure)), Some(module));
    assert_eq!(program.module_of_decl(module), Some(module));
    assert_eq!(program.name_text(program.decl(outer).name.unwrap_or_default()), "Outer");
}

#[test]
fn generic_signature_comes_from_nearest_generic_context() {
    let mut program = Program::new();
    let module = program.add_module("M");
    let sig = program.add_signature(GenericSignature::new(
        vec![GenericParamKey::new(0, 0)],
        Vec::new(),
    ));
    let name = program.intern("Box");
    let boxed = program.add_decl(
        Decl::new(DeclKind::Struct, Some(name), Some(module.into())).with_signature(sig),
    );
    let method = program.add_named(DeclKind::Func, "get", boxed);
    let ext = program.add_decl(Decl::new(
        DeclKind::Extension { extended: boxed },
        None,
        Some(module.into()),
    ));
    let ext_member = program.add_named(DeclKind::Func, "put", ext);

    assert_eq!(program.generic_signature_of(method.into()), Some(sig));
    assert_eq!(program.generic_signature_of(ext_member.into()), Some(sig));
    assert_eq!(program.generic_signature_of(module.into()), None);
    assert_eq!(program.own_generic_params(boxed), vec![GenericParamKey::new(0, 0)]);
    assert_eq!(program.own_generic_params(method), Vec::new());
}

#[test]
fn signatures_are_deduplicated() {
    let mut program = Program::new();
    let a = program.add_signature(GenericSignature::new(vec![GenericParamKey::new(0, 0)], vec![]));
    let b = program.add_signature(GenericSignature::new(vec![GenericParamKey::new(0, 0)], vec![]));
    assert_eq!(a, b);
}

#[test]
fn declared_interface_type_of_generic_nominal() {
    let mut program = Program::new();
    let std = program.install_stdlib();
    let ty = program.declared_interface_type(std.array);
    let t0 = program.pool_mut().generic_param(GenericParamKey::new(0, 0));
    assert_eq!(program.pool().nominal_info(ty).map(|n| n.args), Some(vec![t0]));

    let int = program.declared_interface_type(std.int);
    assert_eq!(program.pool().tag(int), crate::Tag::Nominal);
}

#[test]
fn lookup_finds_stdlib_conformance() {
    let mut program = Program::new();
    let std = program.install_stdlib();
    let int = std.ty(&mut program, std.int);
    let found = program.lookup_conformance(int, std.hashable);
    assert!(found.is_concrete());

    let t0 = program.pool_mut().generic_param(GenericParamKey::new(0, 0));
    assert_eq!(
        program.lookup_conformance(t0, std.hashable),
        ProtocolConformanceRef::Abstract(std.hashable)
    );
}

#[test]
fn context_substitutions_look_up_requirement_conformances() {
    let mut program = Program::new();
    let std = program.install_stdlib();
    let int = std.ty(&mut program, std.int);
    let string = std.ty(&mut program, std.string);
    let dict = std.dictionary_of(&mut program, int, string);

    let subs = program.context_substitutions(dict);
    let Some(subs) = subs else {
        panic!("dictionary has a generic signature");
    };
    assert_eq!(subs.replacements, vec![int, string]);
    assert_eq!(subs.conformances.len(), 1);
    assert!(subs.conformances[0].is_concrete());
    assert_eq!(
        program.replacement_for(&subs, GenericParamKey::new(0, 1)),
        Some(string)
    );
}

#[test]
fn retroactive_conformance_detection() {
    let mut program = Program::new();
    let a = program.add_module("A");
    let b = program.add_module("B");
    let c = program.add_module("C");
    let s = program.add_named(DeclKind::Struct, "S", a);
    let p = program.add_named(protocol(), "P", b);
    let s_ty = program.pool_mut().nominal(s, None);

    let in_c = program.add_decl(Decl::new(
        DeclKind::Extension { extended: s },
        None,
        Some(c.into()),
    ));
    let retro = program.add_conformance(ProtocolConformance::Normal(NormalConformance {
        ty: s_ty,
        protocol: p,
        context: in_c,
        conditional_signature: None,
    }));
    let home = program.add_conformance(ProtocolConformance::Normal(NormalConformance {
        ty: s_ty,
        protocol: p,
        context: s,
        conditional_signature: None,
    }));

    assert!(program.is_retroactive(retro));
    assert!(!program.is_retroactive(home));
}

#[test]
fn access_path_through_associated_conformance() {
    let mut program = Program::new();
    let module = program.add_module("M");
    let sequence = program.add_named(protocol(), "Sequence", module);
    let iterator_proto = program.add_named(protocol(), "IteratorProtocol", module);
    let iterator = program.add_named(DeclKind::AssociatedType, "Iterator", sequence);
    program.decl_mut(sequence).kind = DeclKind::Protocol {
        associated_conformances: vec![AssociatedConformance {
            associated_type: iterator,
            protocol: iterator_proto,
        }],
    };

    let t0 = program.pool_mut().generic_param(GenericParamKey::new(0, 0));
    let member = program.pool_mut().dependent_member(t0, iterator);
    let sig = program.add_signature(GenericSignature::new(
        vec![GenericParamKey::new(0, 0)],
        vec![Requirement::conformance(t0, sequence)],
    ));

    assert_eq!(
        program.conformance_access_path(sig, member, iterator_proto),
        Some(vec![
            ConformanceStep::Root {
                subject: t0,
                protocol: sequence,
                requirement: 0,
            },
            ConformanceStep::Associated {
                subject: member,
                protocol: iterator_proto,
                index: 0,
            },
        ])
    );
    assert_eq!(program.conformance_access_path(sig, t0, iterator_proto), None);
    assert_eq!(program.required_protocols(sig, t0).as_slice(), &[sequence]);
    assert_eq!(program.protocol_of_associated_type(iterator), Some(sequence));
}

#[test]
fn conditional_requirements_resolve_against_arguments() {
    let mut program = Program::new();
    let std = program.install_stdlib();
    let array_ty = program.declared_interface_type(std.array);
    let t0 = program.pool_mut().generic_param(GenericParamKey::new(0, 0));
    let conditional = program.add_signature(GenericSignature::new(
        vec![GenericParamKey::new(0, 0)],
        vec![Requirement::conformance(t0, std.equatable)],
    ));
    let ext = program.add_decl(
        Decl::new(
            DeclKind::Extension {
                extended: std.array,
            },
            None,
            Some(std.module.into()),
        )
        .with_signature(conditional),
    );
    let conformance = program.add_conformance(ProtocolConformance::Normal(NormalConformance {
        ty: array_ty,
        protocol: std.equatable,
        context: ext,
        conditional_signature: Some(conditional),
    }));

    let int = std.ty(&mut program, std.int);
    let array_int = std.array_of(&mut program, int);
    let reqs = program.conditional_requirements(conformance, array_int);
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].0, int);
    assert!(reqs[0].1.is_concrete());
}
