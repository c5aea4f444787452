//! Generic environment: the binding stack, generic parameters and
//! generic signature deltas.

use smallvec::SmallVec;
use tracing::trace;

use quill_ir::{
    DeclId, GenericParamKey, GenericSigId, GenericSignature, Idx, LayoutConstraint, Requirement,
    RequirementKind,
};

use crate::{MangleError, Mangler};

/// Stack of generic signatures in scope while encoding.
///
/// `None` entries unbind: parameters are spelled without validation.
#[derive(Default)]
pub(crate) struct GenericBinder {
    stack: SmallVec<[Option<GenericSigId>; 4]>,
}

impl GenericBinder {
    pub(crate) fn push(&mut self, signature: Option<GenericSigId>) {
        self.stack.push(signature);
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn current(&self) -> Option<GenericSigId> {
        self.stack.last().copied().flatten()
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }
}

/// Parameters and requirements of a signature beyond its context's.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SignatureDelta {
    pub params: Vec<GenericParamKey>,
    pub requirements: Vec<Requirement>,
}

impl SignatureDelta {
    pub fn compute(signature: &GenericSignature, context: Option<&GenericSignature>) -> Self {
        let Some(context) = context else {
            return Self {
                params: signature.params.clone(),
                requirements: signature.requirements.clone(),
            };
        };
        Self {
            params: signature
                .params
                .iter()
                .copied()
                .filter(|&key| !context.contains_param(key))
                .collect(),
            requirements: signature
                .requirements
                .iter()
                .copied()
                .filter(|req| !context.requirements.contains(req))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.requirements.is_empty()
    }

    /// New parameter counts per depth, from the shallowest new depth to
    /// the deepest.
    fn counts_per_depth(&self) -> Vec<u32> {
        let (Some(first), Some(last)) = (self.params.first(), self.params.last()) else {
            return Vec::new();
        };
        (first.depth..=last.depth)
            .map(|depth| {
                let count = self.params.iter().filter(|key| key.depth == depth).count();
                u32::try_from(count).unwrap_or(u32::MAX)
            })
            .collect()
    }
}

impl Mangler<'_> {
    /// Append the delta of `signature` over `context`.
    ///
    /// Returns `false`, emitting nothing, when the delta is empty.
    ///
    /// ```text
    /// generic-signature ::= requirement* param-counts 'l'
    /// param-counts ::= ''                  // exactly one new parameter
    ///              ::= 'r' (COUNT '_')*
    /// ```
    pub(crate) fn append_generic_signature(
        &mut self,
        signature: GenericSigId,
        context: Option<GenericSigId>,
    ) -> Result<bool, MangleError> {
        let program = self.program;
        let delta = SignatureDelta::compute(
            program.signature(signature),
            context.map(|sig| program.signature(sig)),
        );
        if delta.is_empty() {
            return Ok(false);
        }
        trace!(
            ?signature,
            ?context,
            params = delta.params.len(),
            requirements = delta.requirements.len(),
            "generic signature delta"
        );

        self.with_generic_signature(Some(signature), |m| {
            for requirement in &delta.requirements {
                m.append_requirement(requirement)?;
            }
            Ok(())
        })?;

        if delta.params.len() != 1 {
            self.append_operator("r");
            for count in delta.counts_per_depth() {
                self.append_operator(&format!("{count}_"));
            }
        }
        self.append_operator("l");
        Ok(true)
    }

    fn append_requirement(&mut self, requirement: &Requirement) -> Result<(), MangleError> {
        self.append_type(requirement.subject)?;
        match requirement.kind {
            RequirementKind::Conformance(protocol) => {
                self.append_protocol(protocol)?;
                self.append_operator("Rp");
            }
            RequirementKind::SameType(other) => {
                self.append_type(other)?;
                self.append_operator("Rs");
            }
            RequirementKind::Superclass(class) => {
                self.append_type(class)?;
                self.append_operator("Rb");
            }
            RequirementKind::Layout(layout) => {
                self.append_operator("Rl");
                self.append_layout_constraint(layout);
            }
        }
        Ok(())
    }

    fn append_layout_constraint(&mut self, layout: LayoutConstraint) {
        match layout {
            LayoutConstraint::Unknown => self.append_operator("U"),
            LayoutConstraint::RefCountedObject => self.append_operator("R"),
            LayoutConstraint::NativeRefCountedObject => self.append_operator("N"),
            LayoutConstraint::Class => self.append_operator("C"),
            LayoutConstraint::NativeClass => self.append_operator("D"),
            LayoutConstraint::Trivial => self.append_operator("T"),
            LayoutConstraint::TrivialOfExactSize(bits) => {
                self.append_operator(&format!("e{bits}_"));
            }
            LayoutConstraint::TrivialOfAtMostSize(bits) => {
                self.append_operator(&format!("m{bits}_"));
            }
        }
    }

    /// ```text
    /// generic-param ::= 'x'                          // depth 0, index 0
    ///               ::= 'q' INDEX                    // depth 0, index n+1
    ///               ::= 'qd' INDEX INDEX             // depth n+1
    /// ```
    pub(crate) fn append_generic_param(&mut self, key: GenericParamKey) -> Result<(), MangleError> {
        if let Some(signature) = self.binder.current() {
            if !self.program.signature(signature).contains_param(key) {
                return Err(MangleError::UnboundGenericParameter {
                    depth: key.depth,
                    index: key.index,
                });
            }
        }
        match (key.depth, key.index) {
            (0, 0) => self.append_operator("x"),
            (0, index) => self.append_operator_with_index("q", index - 1),
            (depth, index) => {
                self.append_operator_with_index("qd", depth - 1);
                self.append_operator_with_index("", index);
            }
        }
        Ok(())
    }

    /// Whether the protocol of a dependent member `base.assoc` can be left
    /// out: `base` conforms to exactly that one protocol.
    pub(crate) fn can_elide_protocol(&self, base: Idx, protocol: DeclId) -> bool {
        if !self.options.optimize_protocol_names {
            return false;
        }
        let Some(signature) = self.binder.current() else {
            return false;
        };
        self.program.required_protocols(signature, base).as_slice() == [protocol]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn delta_against_no_context_is_everything() {
        let sig = GenericSignature::new(
            vec![GenericParamKey::new(0, 0)],
            vec![Requirement::conformance(Idx::from_raw(12), DeclId::from_raw(1))],
        );
        let delta = SignatureDelta::compute(&sig, None);
        assert_eq!(delta.params, sig.params);
        assert_eq!(delta.requirements, sig.requirements);
    }

    #[test]
    fn delta_drops_context_params_and_requirements() {
        let shared = Requirement::conformance(Idx::from_raw(12), DeclId::from_raw(1));
        let added = Requirement::layout(Idx::from_raw(13), LayoutConstraint::Class);
        let context = GenericSignature::new(vec![GenericParamKey::new(0, 0)], vec![shared]);
        let sig = GenericSignature::new(
            vec![GenericParamKey::new(0, 0), GenericParamKey::new(1, 0)],
            vec![shared, added],
        );
        let delta = SignatureDelta::compute(&sig, Some(&context));
        assert_eq!(delta.params, vec![GenericParamKey::new(1, 0)]);
        assert_eq!(delta.requirements, vec![added]);
        assert!(SignatureDelta::compute(&context, Some(&context)).is_empty());
    }

    #[test]
    fn counts_cover_every_depth_between_new_params() {
        let delta = SignatureDelta {
            params: vec![
                GenericParamKey::new(0, 0),
                GenericParamKey::new(0, 1),
                GenericParamKey::new(2, 0),
            ],
            requirements: Vec::new(),
        };
        assert_eq!(delta.counts_per_depth(), vec![2, 0, 1]);
    }

    #[test]
    fn binder_tracks_innermost_binding() {
        let mut binder = GenericBinder::default();
        assert_eq!(binder.current(), None);
        binder.push(Some(GenericSigId::from_raw(1)));
        binder.push(None);
        assert_eq!(binder.current(), None);
        binder.pop();
        assert_eq!(binder.current(), Some(GenericSigId::from_raw(1)));
    }
}
