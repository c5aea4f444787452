use pretty_assertions::assert_eq;
use quill_ir::{
    AccessorKind, Closure, Decl, DeclFlags, DeclKind, FnParam, FunctionExtInfo, Idx,
    PatternBinding,
};

use crate::test_helpers::Fixture;
use crate::{MangleError, ManglerOptions, SymbolKind};

#[test]
fn function_in_module() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let ty = fx.fn_type(&[], Idx::INT64);
    let f = fx.func("f", module, ty);

    assert_eq!(
        fx.mangler().mangle_entity(f, SymbolKind::Default).unwrap(),
        "$q1M1fBi64_ycF"
    );
}

#[test]
fn argument_labels_are_part_of_the_signature() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let int = fx.int();
    let ty = fx.fn_type(&[int], int);
    let label = fx.name("x");
    let labeled = fx.add(
        Decl::new(DeclKind::Func, Some(fx.name("g")), Some(module.into()))
            .with_type(ty)
            .with_labels(vec![Some(label)]),
    );
    let unlabeled = fx.func("g", module, ty);

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_entity(labeled, SymbolKind::Default).unwrap(),
        "$q1M1gSi1xSi_tcF"
    );
    assert_eq!(
        mangler.mangle_entity(unlabeled, SymbolKind::Default).unwrap(),
        "$q1M1gSiSicF"
    );
}

#[test]
fn symbol_kinds_produce_distinct_names() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let f = fx.func("f", module, ty);

    let mut mangler = fx.mangler();
    let default = mangler.mangle_entity(f, SymbolKind::Default).unwrap();
    let dynamic = mangler.mangle_entity(f, SymbolKind::DynamicThunk).unwrap();
    let handler = mangler
        .mangle_entity(f, SymbolKind::AsyncHandlerBody)
        .unwrap();

    assert_eq!(default, "$q1M1fytycF");
    assert_eq!(dynamic, "$qTD1M1fytycF");
    assert_eq!(handler, "$qTa1M1fytycF");
    assert_ne!(default, dynamic);
    assert_ne!(dynamic, handler);
    assert_ne!(default, handler);
}

#[test]
fn members_and_static_members() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let method = fx.func("method", s, ty);
    let make = fx.add(
        Decl::new(DeclKind::Func, Some(fx.name("make")), Some(s.into()))
            .with_type(ty)
            .with_flags(DeclFlags::STATIC),
    );

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_entity(method, SymbolKind::Default).unwrap(),
        "$q1M1SV6methodytycF"
    );
    assert_eq!(
        mangler.mangle_entity(make, SymbolKind::Default).unwrap(),
        "$q1M1SV4makeytycFZ"
    );
}

#[test]
fn repeated_context_is_back_referenced() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (_, s) = fx.nominal(DeclKind::Struct, "S", module);
    let ty = fx.fn_type(&[s, s], s);
    let h = fx.func("h", module, ty);

    assert_eq!(
        fx.mangler().mangle_entity(h, SymbolKind::Default).unwrap(),
        "$q1M1hAa1SVAb_AbtcF"
    );
}

#[test]
fn properties_subscripts_and_enum_elements() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (e, e_ty) = fx.nominal(DeclKind::Enum, "E", module);
    let int = fx.int();
    let bool = fx.bool();
    let count = fx.var("count", e, int);
    let subscript_ty = fx.fn_type(&[int], bool);
    let subscript = fx.add(
        Decl::new(DeclKind::Subscript, None, Some(e.into())).with_type(subscript_ty),
    );
    let element = fx.value(DeclKind::EnumElement, "none", e, e_ty);

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_entity(count, SymbolKind::Default).unwrap(),
        "$q1M1EO5countSivp"
    );
    assert_eq!(
        mangler.mangle_entity(subscript, SymbolKind::Default).unwrap(),
        "$q1M1EOSbSicip"
    );
    assert_eq!(
        mangler.mangle_entity(element, SymbolKind::Default).unwrap(),
        "$q1M1EO4noneAbfO"
    );
}

#[test]
fn constructors_destructors_and_ivar_initializers() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (class, class_ty) = fx.nominal(DeclKind::Class, "C", module);
    let init_ty = fx.fn_type(&[], class_ty);
    let init = fx.add(Decl::new(DeclKind::Constructor, None, Some(class.into())).with_type(init_ty));
    let deinit = fx.add(Decl::new(DeclKind::Destructor, None, Some(class.into())));

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler
            .mangle_constructor(init, true, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCAbycfC"
    );
    assert_eq!(
        mangler
            .mangle_constructor(init, false, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCAbycfc"
    );
    assert_eq!(
        mangler
            .mangle_destructor(deinit, true, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCfD"
    );
    assert_eq!(
        mangler
            .mangle_destructor(deinit, false, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCfd"
    );
    assert_eq!(
        mangler
            .mangle_ivar_initializer(class, false, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCfe"
    );
    assert_eq!(
        mangler
            .mangle_ivar_initializer(class, true, SymbolKind::Default)
            .unwrap(),
        "$q1M1CCfE"
    );
    assert_eq!(
        mangler
            .mangle_entity(init, SymbolKind::NativeToForeignThunk)
            .unwrap(),
        "$qTo1M1CCAbycfC"
    );
}

#[test]
fn dispatchers_reject_mismatched_declarations() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let f = fx.func("f", module, ty);

    let mut mangler = fx.mangler();
    assert!(matches!(
        mangler.mangle_constructor(f, true, SymbolKind::Default),
        Err(MangleError::UnexpectedEntity { decl, .. }) if decl == f
    ));
    assert!(matches!(
        mangler.mangle_ivar_initializer(s, false, SymbolKind::Default),
        Err(MangleError::UnexpectedEntity { decl, .. }) if decl == s
    ));
    assert!(matches!(
        mangler.mangle_accessor(f, AccessorKind::Get, SymbolKind::Default),
        Err(MangleError::UnexpectedEntity { .. })
    ));
}

#[test]
fn accessors() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let int = fx.int();
    let bool = fx.bool();
    let count = fx.var("count", s, int);
    let shared = fx.add(
        Decl::new(DeclKind::Var, Some(fx.name("shared")), Some(s.into()))
            .with_type(int)
            .with_flags(DeclFlags::STATIC),
    );
    let subscript_ty = fx.fn_type(&[int], bool);
    let subscript = fx.add(
        Decl::new(DeclKind::Subscript, None, Some(s.into())).with_type(subscript_ty),
    );

    let mut mangler = fx.mangler();
    let cases = [
        (count, AccessorKind::Get, "$q1M1SV5countSivg"),
        (count, AccessorKind::Set, "$q1M1SV5countSivs"),
        (count, AccessorKind::Modify, "$q1M1SV5countSivM"),
        (count, AccessorKind::Read, "$q1M1SV5countSivr"),
        (count, AccessorKind::WillSet, "$q1M1SV5countSivw"),
        (count, AccessorKind::DidSet, "$q1M1SV5countSivW"),
        (count, AccessorKind::Address, "$q1M1SV5countSivlu"),
        (count, AccessorKind::MutableAddress, "$q1M1SV5countSivau"),
        (count, AccessorKind::Init, "$q1M1SV5countSivi"),
        (shared, AccessorKind::Get, "$q1M1SV6sharedSivgZ"),
        (subscript, AccessorKind::Get, "$q1M1SVSbSicig"),
    ];
    for (storage, accessor, expected) in cases {
        assert_eq!(
            mangler
                .mangle_accessor(storage, accessor, SymbolKind::Default)
                .unwrap(),
            expected
        );
    }
}

#[test]
fn globals() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let int = fx.int();
    let a = fx.var("a", module, int);
    let b = fx.var("b", module, int);
    let binding = fx.program.add_pattern_binding(PatternBinding {
        parent: module.into(),
        entries: vec![vec![a, b], vec![a], Vec::new()],
    });

    let mut mangler = fx.mangler();
    assert_eq!(mangler.mangle_global_variable(a).unwrap(), "$q1M1aSivp");
    assert_eq!(mangler.mangle_global_getter(a).unwrap(), "$q1M1aSivG");
    assert_eq!(
        mangler.mangle_global_init(binding, 0, true).unwrap(),
        "$q1M1a_1bWZ"
    );
    assert_eq!(
        mangler.mangle_global_init(binding, 1, false).unwrap(),
        "$q1M1aWz"
    );
    assert_eq!(
        mangler.mangle_global_init(binding, 2, true),
        Err(MangleError::EmptyPatternEntry { entry: 2 })
    );
    assert_eq!(
        mangler.mangle_global_init(binding, 3, true),
        Err(MangleError::InvalidIndex { index: 3, len: 3 })
    );
}

#[test]
fn initializer_contexts() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let int = fx.int();
    let value = fx.var("value", s, int);
    let fn_ty = fx.fn_type(&[int], Idx::EMPTY_TUPLE);
    let label = fx.name("x");
    let f = fx.add(
        Decl::new(DeclKind::Func, Some(fx.name("f")), Some(module.into()))
            .with_type(fn_ty)
            .with_labels(vec![Some(label)]),
    );

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_initializer(value).unwrap(),
        "$q1M1SV5valueSivpfi"
    );
    assert_eq!(
        mangler.mangle_backing_initializer(value).unwrap(),
        "$q1M1SV5valueSivpfP"
    );
    assert_eq!(
        mangler.mangle_default_argument(f, 0).unwrap(),
        "$q1M1fyt1xSi_tcFfA_"
    );
    assert_eq!(
        mangler.mangle_default_argument(f, 1),
        Err(MangleError::InvalidIndex { index: 1, len: 1 })
    );
}

#[test]
fn nominal_and_local_type_symbols() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let outer = fx.func("outer", module, ty);
    let local = fx.add(
        Decl::new(DeclKind::Struct, Some(fx.name("Local")), Some(outer.into()))
            .with_local_discriminator(1),
    );

    let mut mangler = fx.mangler();
    assert_eq!(mangler.mangle_nominal_type(s).unwrap(), "$q1M1SV");
    assert_eq!(
        mangler.mangle_local_type_decl(local).unwrap(),
        "1M5outerytycF5LocalL0_V"
    );
}

#[test]
fn local_and_private_names() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let outer = fx.func("outer", module, ty);
    let inner = fx.add(
        Decl::new(DeclKind::Func, Some(fx.name("inner")), Some(outer.into()))
            .with_type(ty)
            .with_local_discriminator(0),
    );
    let file = fx.name("file");
    let hidden = fx.add(
        Decl::new(DeclKind::Func, Some(fx.name("hidden")), Some(module.into()))
            .with_type(ty)
            .with_private_discriminator(file),
    );

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_entity(inner, SymbolKind::Default).unwrap(),
        "$q1M5outerytycF5innerL_ytycF"
    );
    assert_eq!(
        mangler.mangle_entity(hidden, SymbolKind::Default).unwrap(),
        "$q1M6hidden4fileLLytycF"
    );
}

#[test]
fn nameless_entities_need_tolerance() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let ty = fx.fn_type(&[], Idx::INT64);
    let nameless = fx.add(Decl::new(DeclKind::Func, None, Some(module.into())).with_type(ty));

    assert_eq!(
        fx.mangler().mangle_entity(nameless, SymbolKind::Default),
        Err(MangleError::NamelessEntity { decl: nameless })
    );
    let tolerant = ManglerOptions::default().with_nameless(true);
    assert_eq!(
        fx.mangler_with(tolerant)
            .mangle_entity(nameless, SymbolKind::Default)
            .unwrap(),
        "$q1MXnBi64_ycF"
    );
}

#[test]
fn closures() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let f = fx.func("f", module, ty);
    let explicit = fx.program.add_closure(Closure {
        parent: f.into(),
        discriminator: 0,
        ty,
        implicit: false,
    });
    let implicit = fx.program.add_closure(Closure {
        parent: f.into(),
        discriminator: 2,
        ty,
        implicit: true,
    });
    let nested = fx.program.add_closure(Closure {
        parent: explicit.into(),
        discriminator: 0,
        ty,
        implicit: false,
    });

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_closure(explicit, SymbolKind::Default).unwrap(),
        "$q1M1fytycFytycfU_"
    );
    assert_eq!(
        mangler.mangle_closure(implicit, SymbolKind::Default).unwrap(),
        "$q1M1fytycFytycfu1_"
    );
    assert_eq!(
        mangler.mangle_closure(nested, SymbolKind::Default).unwrap(),
        "$q1M1fytycFytycfU_AbfU_"
    );
}

#[test]
fn extensions_in_other_modules() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let (s, _) = fx.nominal(DeclKind::Struct, "S", module);
    let other = fx.program.add_module("N");
    let ext = fx.add(Decl::new(
        DeclKind::Extension { extended: s },
        None,
        Some(other.into()),
    ));
    let same_module_ext = fx.add(Decl::new(
        DeclKind::Extension { extended: s },
        None,
        Some(module.into()),
    ));
    let ty = fx.fn_type(&[], Idx::EMPTY_TUPLE);
    let g = fx.func("g", ext, ty);
    let h = fx.func("h", same_module_ext, ty);

    let mut mangler = fx.mangler();
    assert_eq!(
        mangler.mangle_entity(g, SymbolKind::Default).unwrap(),
        "$q1M1SV1NE1gytycF"
    );
    assert_eq!(
        mangler.mangle_entity(h, SymbolKind::Default).unwrap(),
        "$q1M1SV1hytycF"
    );
}

#[test]
fn foreign_runtime_names_replace_identifiers() {
    let mut fx = Fixture::new();
    let foreign = fx.program.add_foreign_module("CLib");
    let runtime_name = fx.name("NSPoint");
    let point = fx.add(
        Decl::new(DeclKind::Class, Some(fx.name("Point")), Some(foreign.into()))
            .with_flags(DeclFlags::FOREIGN_VISIBLE)
            .with_foreign_name(runtime_name),
    );

    assert_eq!(fx.mangler().mangle_nominal_type(point).unwrap(), "$qSo5PointC");
    let runtime = ManglerOptions::default().with_objc_runtime_names(true);
    assert_eq!(
        fx.mangler_with(runtime).mangle_nominal_type(point).unwrap(),
        "$qSo7NSPointC"
    );
}

#[test]
fn variable_of_function_type() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let int = fx.int();
    let callback = fx
        .program
        .pool_mut()
        .function(&[FnParam::new(int)], int, FunctionExtInfo::default());
    let v = fx.var("callback", module, callback);

    assert_eq!(
        fx.mangler().mangle_entity(v, SymbolKind::Default).unwrap(),
        "$q1M8callbackSiSicvp"
    );
    assert_eq!(
        fx.mangler().mangle_decl_type(v).unwrap(),
        "$qSiSicD"
    );
}
