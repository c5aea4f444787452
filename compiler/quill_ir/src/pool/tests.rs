use pretty_assertions::assert_eq;

use super::*;
use crate::types::ImplFunctionType;
use crate::{CalleeConvention, DifferentiabilityKind};

fn decl(raw: u32) -> DeclId {
    DeclId::from_raw(raw)
}

#[test]
fn builtins_at_fixed_indices() {
    let pool = Pool::new();
    assert_eq!(pool.len(), Idx::FIRST_DYNAMIC as usize);
    assert_eq!(pool.tag(Idx::EMPTY_TUPLE), Tag::EmptyTuple);
    assert_eq!(pool.tag(Idx::WORD), Tag::BuiltinWord);
    assert_eq!(pool.builtin_width(Idx::INT32), Some(32));
    assert_eq!(pool.builtin_width(Idx::FLOAT64), Some(64));
    assert!(pool.flags(Idx::RAW_POINTER).contains(TypeFlags::IS_BUILTIN));
}

#[test]
fn builtin_constructors_reuse_preinterned() {
    let mut pool = Pool::new();
    assert_eq!(pool.builtin_int(64), Idx::INT64);
    assert_eq!(pool.builtin_float(32), Idx::FLOAT32);
    let int128 = pool.builtin_int(128);
    assert!(!int128.is_primitive());
    assert_eq!(pool.builtin_width(int128), Some(128));
}

#[test]
fn structural_types_are_hash_consed() {
    let mut pool = Pool::new();
    let a = pool.bound_generic(decl(1), None, &[Idx::INT8, Idx::INT16]);
    let b = pool.bound_generic(decl(1), None, &[Idx::INT8, Idx::INT16]);
    let c = pool.bound_generic(decl(1), None, &[Idx::INT16, Idx::INT8]);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let nominal = pool.nominal_info(a).map(|n| n.args);
    assert_eq!(nominal, Some(vec![Idx::INT8, Idx::INT16]));
}

#[test]
fn tuple_shortcuts() {
    let mut pool = Pool::new();
    assert_eq!(pool.tuple(&[]), Idx::EMPTY_TUPLE);
    assert_eq!(pool.tuple(&[TupleElem::unlabeled(Idx::WORD)]), Idx::WORD);

    let pair = pool.tuple(&[
        TupleElem::labeled(Name::from_raw(5), Idx::WORD),
        TupleElem::unlabeled(Idx::INT8),
    ]);
    assert_eq!(
        pool.tuple_elems(pair),
        Some(vec![
            TupleElem::labeled(Name::from_raw(5), Idx::WORD),
            TupleElem::unlabeled(Idx::INT8),
        ])
    );
    assert_eq!(pool.tuple_elems(Idx::EMPTY_TUPLE), Some(Vec::new()));
    assert_eq!(pool.tuple_elems(Idx::WORD), None);
}

#[test]
fn function_round_trips_ext_info_and_params() {
    let mut pool = Pool::new();
    let ext = FunctionExtInfo::default()
        .with_throws(true)
        .with_differentiability(DifferentiabilityKind::Normal);
    let params = [
        FnParam::new(Idx::INT8).with_flags(ParamFlags::INOUT),
        FnParam::new(Idx::WORD),
    ];
    let f = pool.function(&params, Idx::EMPTY_TUPLE, ext);
    let decoded = pool.function_info(f);
    assert_eq!(
        decoded,
        Some(FunctionType {
            params: params.to_vec(),
            result: Idx::EMPTY_TUPLE,
            ext,
        })
    );
    assert!(pool.flags(f).contains(TypeFlags::IS_FUNCTION));
    assert!(!pool.has_function_repr(f, FunctionRepr::Block));
}

#[test]
fn impl_function_round_trips() {
    let mut pool = Pool::new();
    let func = ImplFunctionType {
        callee: CalleeConvention::Guaranteed,
        repr: FunctionRepr::Block,
        is_async: true,
        params: vec![ImplParam {
            convention: ParamConvention::Indirect,
            ty: Idx::INT8,
        }],
        results: vec![
            ImplResult {
                convention: ResultConvention::Owned,
                ty: Idx::WORD,
            },
            ImplResult {
                convention: ResultConvention::Unowned,
                ty: Idx::INT64,
            },
        ],
        error: Some(Idx::NATIVE_OBJECT),
    };
    let idx = pool.impl_function(&func);
    assert_eq!(pool.impl_function_info(idx), Some(func));
}

#[test]
fn generic_params_and_dependent_members() {
    let mut pool = Pool::new();
    let t = pool.generic_param(GenericParamKey::new(1, 2));
    assert_eq!(pool.generic_param_key(t), Some(GenericParamKey::new(1, 2)));
    assert!(pool.flags(t).is_dependent());

    let member = pool.dependent_member(t, decl(9));
    assert_eq!(pool.dependent_member_info(member), Some((t, decl(9))));
    assert!(pool
        .flags(member)
        .contains(TypeFlags::HAS_DEPENDENT_MEMBER | TypeFlags::HAS_TYPE_PARAM));
}

#[test]
fn sugar_has_canonical_successor() {
    let mut pool = Pool::new();
    let alias = pool.alias(decl(3), Idx::INT64);
    assert!(pool.flags(alias).contains(TypeFlags::HAS_SUGAR));
    assert_eq!(pool.canonical(alias), Idx::INT64);
    assert_eq!(pool.singly_desugared(alias), Some(Idx::INT64));
    assert_eq!(pool.alias_info(alias), Some((decl(3), Idx::INT64)));

    // Nested sugar: ((Alias)) desugars one layer at a time.
    let paren = pool.paren(alias);
    assert_eq!(pool.singly_desugared(paren), Some(alias));
    assert_eq!(pool.canonical(paren), Idx::INT64);
}

#[test]
fn sugar_inside_compound_types_is_canonicalized() {
    let mut pool = Pool::new();
    let alias = pool.alias(decl(3), Idx::INT64);
    let sugared = pool.bound_generic(decl(1), None, &[alias]);
    let plain = pool.bound_generic(decl(1), None, &[Idx::INT64]);
    assert_ne!(sugared, plain);
    assert_eq!(pool.canonical(sugared), plain);
    assert!(pool.is_canonical(plain));

    let meta = pool.metatype(sugared);
    let plain_meta = pool.metatype(plain);
    assert_eq!(pool.canonical(meta), plain_meta);

    let func = pool.function(&[FnParam::new(alias)], alias, FunctionExtInfo::default());
    let plain_func = pool.function(&[FnParam::new(Idx::INT64)], Idx::INT64, FunctionExtInfo::default());
    assert_eq!(pool.canonical(func), plain_func);
}

#[test]
fn existential_layout_round_trips() {
    let mut pool = Pool::new();
    let layout = ExistentialType {
        protocols: vec![decl(4), decl(2)],
        superclass: None,
        any_object: true,
    };
    let idx = pool.existential(&layout);
    assert_eq!(
        pool.existential_layout(idx),
        Some(ExistentialType {
            protocols: vec![decl(2), decl(4)],
            ..layout
        })
    );
    let meta = pool.existential_metatype(idx);
    assert_eq!(pool.metatype_instance(meta), Some(idx));
    assert_eq!(pool.tag(meta), Tag::ExistentialMetatype);
}

#[test]
fn existential_protocol_order_is_irrelevant() {
    let mut pool = Pool::new();
    let mut compose = |protocols: Vec<DeclId>| {
        pool.existential(&ExistentialType {
            protocols,
            superclass: None,
            any_object: false,
        })
    };
    let forward = compose(vec![decl(2), decl(4)]);
    let backward = compose(vec![decl(4), decl(2)]);
    let repeated = compose(vec![decl(4), decl(2), decl(4)]);
    assert_eq!(forward, backward);
    assert_eq!(forward, repeated);
    assert!(pool.is_canonical(backward));
}

#[test]
fn opaque_round_trips() {
    let mut pool = Pool::new();
    let idx = pool.opaque(decl(11), 1, &[Idx::WORD]);
    let opaque = pool.opaque_info(idx);
    assert_eq!(
        opaque,
        Some(OpaqueType {
            decl: decl(11),
            ordinal: 1,
            args: vec![Idx::WORD],
        })
    );
    assert!(pool.flags(idx).contains(TypeFlags::HAS_OPAQUE));
}
