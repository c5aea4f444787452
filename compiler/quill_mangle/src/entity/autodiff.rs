//! Automatic differentiation symbols.
//!
//! Every artifact is named after its original function's symbol:
//!
//! ```text
//! autodiff ::= original 'TJ' AD-KIND index-subset 'p' index-subset 'r' generic-signature?
//! AD-KIND ::= 'f' | 'r'                         // JVP, VJP
//!         ::= 'd' | 'p'                         // differential, pullback
//!         ::= ('l' | 'b') ('d' | 'p') INDEX     // generated declaration in a block
//! witness ::= original 'WJ' ('d' | 'l' | 'f' | 'r') index-subset 'p' index-subset 'r' generic-signature?
//! index-subset ::= ('S' | 'U')*
//! original ::= SYMBOL-WITHOUT-PREFIX | identifier 'Xx'
//! ```
//!
//! The original symbol is copied verbatim and its nodes are not entered in
//! the substitution table. Back-references in the derivative generic
//! signature therefore count only nodes expanded after `TJ`/`WJ`, and a
//! demangler must start a fresh table there.

use quill_ir::{
    AutoDiffConfig, DerivativeFunctionKind, DifferentiabilityWitnessKind, GeneratedDeclKind,
    IndexSubset, LinearMapKind,
};

use crate::{MangleError, Mangler, MANGLING_PREFIX};

impl Mangler<'_> {
    /// Forward (JVP) or reverse (VJP) derivative of `original`.
    pub fn mangle_derivative_function(
        &mut self,
        original: &str,
        kind: DerivativeFunctionKind,
        config: &AutoDiffConfig,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "derivative function", |m| {
            m.append_original_function(original);
            m.append_operator("TJ");
            m.append_operator(match kind {
                DerivativeFunctionKind::Jvp => "f",
                DerivativeFunctionKind::Vjp => "r",
            });
            m.append_autodiff_config(config)
        })
    }

    /// Differential or pullback of `original`.
    pub fn mangle_linear_map(
        &mut self,
        original: &str,
        kind: LinearMapKind,
        config: &AutoDiffConfig,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "linear map", |m| {
            m.append_original_function(original);
            m.append_operator("TJ");
            m.append_operator(linear_map_code(kind));
            m.append_autodiff_config(config)
        })
    }

    /// Declaration synthesized for basic block `block` of `original`'s
    /// derivative.
    pub fn mangle_autodiff_generated_decl(
        &mut self,
        original: &str,
        decl_kind: GeneratedDeclKind,
        map_kind: LinearMapKind,
        block: u32,
        config: &AutoDiffConfig,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "autodiff generated declaration", |m| {
            m.append_original_function(original);
            m.append_operator("TJ");
            m.append_operator(match decl_kind {
                GeneratedDeclKind::LinearMapStruct => "l",
                GeneratedDeclKind::BranchingTraceEnum => "b",
            });
            m.append_operator_with_index(linear_map_code(map_kind), block);
            m.append_autodiff_config(config)
        })
    }

    /// Key of the differentiability witness of `original`.
    pub fn mangle_differentiability_witness(
        &mut self,
        original: &str,
        kind: DifferentiabilityWitnessKind,
        config: &AutoDiffConfig,
    ) -> Result<String, MangleError> {
        self.mangle(MANGLING_PREFIX, "differentiability witness", |m| {
            m.append_original_function(original);
            m.append_operator("WJ");
            m.append_operator(match kind {
                DifferentiabilityWitnessKind::Normal => "d",
                DifferentiabilityWitnessKind::Linear => "l",
                DifferentiabilityWitnessKind::Forward => "f",
                DifferentiabilityWitnessKind::Reverse => "r",
            });
            m.append_autodiff_config(config)
        })
    }

    /// A mangled original is embedded without its prefix; any other name
    /// is an identifier.
    fn append_original_function(&mut self, original: &str) {
        match original.strip_prefix(MANGLING_PREFIX) {
            Some(symbol) => self.append_operator(symbol),
            None => {
                self.append_identifier(original);
                self.append_operator("Xx");
            }
        }
    }

    fn append_autodiff_config(&mut self, config: &AutoDiffConfig) -> Result<(), MangleError> {
        self.append_index_subset(&config.parameters);
        self.append_operator("p");
        self.append_index_subset(&config.results);
        self.append_operator("r");
        if let Some(signature) = config.derivative_signature {
            self.append_generic_signature(signature, None)?;
        }
        Ok(())
    }

    fn append_index_subset(&mut self, subset: &IndexSubset) {
        for index in 0..subset.capacity() {
            self.append_operator(if subset.contains(index) { "S" } else { "U" });
        }
    }
}

const fn linear_map_code(kind: LinearMapKind) -> &'static str {
    match kind {
        LinearMapKind::Differential => "d",
        LinearMapKind::Pullback => "p",
    }
}
