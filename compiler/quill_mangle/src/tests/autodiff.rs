use pretty_assertions::assert_eq;
use quill_ir::{
    AutoDiffConfig, DerivativeFunctionKind, DifferentiabilityWitnessKind, GeneratedDeclKind,
    IndexSubset, LinearMapKind, Requirement,
};

use crate::test_helpers::Fixture;

const ORIGINAL: &str = "$q1M1fSfSfcF";

fn first_of_one() -> AutoDiffConfig {
    AutoDiffConfig {
        parameters: IndexSubset::new(1, [0]),
        results: IndexSubset::new(1, [0]),
        derivative_signature: None,
    }
}

#[test]
fn derivative_functions() {
    let fx = Fixture::new();
    let config = first_of_one();
    let mut mangler = fx.mangler();

    assert_eq!(
        mangler
            .mangle_derivative_function(ORIGINAL, DerivativeFunctionKind::Jvp, &config)
            .unwrap(),
        "$q1M1fSfSfcFTJfSpSr"
    );
    assert_eq!(
        mangler
            .mangle_derivative_function(ORIGINAL, DerivativeFunctionKind::Vjp, &config)
            .unwrap(),
        "$q1M1fSfSfcFTJrSpSr"
    );
}

#[test]
fn linear_maps_and_generated_declarations() {
    let fx = Fixture::new();
    let config = first_of_one();
    let mut mangler = fx.mangler();

    assert_eq!(
        mangler
            .mangle_linear_map(ORIGINAL, LinearMapKind::Pullback, &config)
            .unwrap(),
        "$q1M1fSfSfcFTJpSpSr"
    );
    assert_eq!(
        mangler
            .mangle_autodiff_generated_decl(
                ORIGINAL,
                GeneratedDeclKind::LinearMapStruct,
                LinearMapKind::Pullback,
                2,
                &config,
            )
            .unwrap(),
        "$q1M1fSfSfcFTJlp1_SpSr"
    );
    assert_eq!(
        mangler
            .mangle_autodiff_generated_decl(
                ORIGINAL,
                GeneratedDeclKind::BranchingTraceEnum,
                LinearMapKind::Differential,
                0,
                &config,
            )
            .unwrap(),
        "$q1M1fSfSfcFTJbd_SpSr"
    );
}

#[test]
fn differentiability_witness() {
    let fx = Fixture::new();
    let mut mangler = fx.mangler();

    assert_eq!(
        mangler
            .mangle_differentiability_witness(
                ORIGINAL,
                DifferentiabilityWitnessKind::Reverse,
                &first_of_one(),
            )
            .unwrap(),
        "$q1M1fSfSfcFWJrSpSr"
    );
}

#[test]
fn unmangled_original_and_wider_subsets() {
    let mut fx = Fixture::new();
    let sig = fx.signature(&[(0, 0)], Vec::new());
    let config = AutoDiffConfig {
        parameters: IndexSubset::new(3, [0, 2]),
        results: IndexSubset::new(2, [1]),
        derivative_signature: Some(sig),
    };
    let mut mangler = fx.mangler();

    assert_eq!(
        mangler
            .mangle_derivative_function("foo", DerivativeFunctionKind::Jvp, &first_of_one())
            .unwrap(),
        "$q3fooXxTJfSpSr"
    );
    assert_eq!(
        mangler
            .mangle_derivative_function(ORIGINAL, DerivativeFunctionKind::Vjp, &config)
            .unwrap(),
        "$q1M1fSfSfcFTJrSUSpUSrl"
    );
}

#[test]
fn derivative_signature_starts_a_fresh_substitution_table() {
    let mut fx = Fixture::new();
    let module = fx.module;
    let proto = fx.protocol("P", module);
    let t = fx.param(0, 0);
    let sig = fx.signature(&[(0, 0)], vec![Requirement::conformance(t, proto)]);
    let config = AutoDiffConfig {
        derivative_signature: Some(sig),
        ..first_of_one()
    };

    // `M` already occurs in the original but is spelled out again.
    assert_eq!(
        fx.mangler()
            .mangle_derivative_function(ORIGINAL, DerivativeFunctionKind::Vjp, &config)
            .unwrap(),
        "$q1M1fSfSfcFTJrSpSrx1M1PPRpl"
    );
}
