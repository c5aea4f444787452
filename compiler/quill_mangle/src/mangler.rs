//! The mangler and its per-call state.
//!
//! A `Mangler` borrows the program read-only. Each public mangling
//! starts from a cleared buffer, substitution table, symbolic ledger and
//! generic binding stack, so no state outlives one call.

use quill_ir::{DeclId, GenericSigId, Program};
use tracing::{debug, trace};

use crate::encode::{push_back_reference, push_identifier, push_index};
use crate::generics::GenericBinder;
use crate::substitution::{SubstKey, SubstitutionTable};
use crate::symbolic::{push_placeholder, SymbolicPolicy, SymbolicReference, SymbolicReferent};
use crate::{MangleError, ManglerOptions};

/// Prefix of every linker-visible symbol.
pub const MANGLING_PREFIX: &str = "$q";

/// Symbol mangler over one program.
pub struct Mangler<'p> {
    pub(crate) program: &'p Program,
    pub(crate) options: ManglerOptions,
    policy: Option<SymbolicPolicy<'p>>,
    pub(crate) out: String,
    substitutions: SubstitutionTable,
    symbolic_references: Vec<SymbolicReference>,
    pub(crate) binder: GenericBinder,
    /// Sugar is accepted in the current call.
    pub(crate) tolerate_sugar: bool,
    /// Symbolic references may be emitted in the current call.
    symbolic_enabled: bool,
    /// Declaration whose own type is being encoded; its opaque result
    /// types are spelled relative to it.
    pub(crate) opaque_owner: Option<DeclId>,
    /// Declaration the current symbol names. It is always spelled out.
    subject: Option<DeclId>,
}

impl<'p> Mangler<'p> {
    pub fn new(program: &'p Program, options: ManglerOptions) -> Self {
        Self {
            program,
            options,
            policy: None,
            out: String::with_capacity(64),
            substitutions: SubstitutionTable::default(),
            symbolic_references: Vec::new(),
            binder: GenericBinder::default(),
            tolerate_sugar: false,
            symbolic_enabled: false,
            opaque_owner: None,
            subject: None,
        }
    }

    /// A mangler for debug info: sugared types are encoded as written.
    pub fn for_debugger(program: &'p Program) -> Self {
        Self::new(program, ManglerOptions::default().with_dwarf_mode(true))
    }

    /// Only referents accepted by `policy` become symbolic references.
    /// Without a policy every eligible referent is accepted.
    #[must_use]
    pub fn with_symbolic_policy(mut self, policy: impl Fn(SymbolicReferent) -> bool + 'p) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn options(&self) -> ManglerOptions {
        self.options
    }

    pub fn program(&self) -> &'p Program {
        self.program
    }

    /// Placeholders emitted by the most recent mangling, in output order.
    pub fn symbolic_references(&self) -> &[SymbolicReference] {
        &self.symbolic_references
    }

    // === Call lifecycle ===

    fn begin(&mut self, prefix: &str) {
        self.out.clear();
        self.substitutions.clear();
        self.symbolic_references.clear();
        self.binder.clear();
        self.tolerate_sugar = self.options.dwarf_mode;
        self.symbolic_enabled = self.options.allow_symbolic_references;
        self.opaque_owner = None;
        self.subject = None;
        self.out.push_str(prefix);
    }

    fn finish(&mut self, what: &'static str) -> String {
        let symbol = std::mem::take(&mut self.out);
        debug!(
            kind = what,
            symbol = %symbol.escape_debug(),
            substitutions = self.substitutions.len(),
            symbolic = self.symbolic_references.len(),
            "mangled"
        );
        symbol
    }

    /// Run one complete mangling with `prefix`.
    pub(crate) fn mangle(
        &mut self,
        prefix: &str,
        what: &'static str,
        body: impl FnOnce(&mut Self) -> Result<(), MangleError>,
    ) -> Result<String, MangleError> {
        self.begin(prefix);
        body(self)?;
        Ok(self.finish(what))
    }

    /// Like [`mangle`](Self::mangle), accepting sugared types.
    pub(crate) fn mangle_tolerating_sugar(
        &mut self,
        prefix: &str,
        what: &'static str,
        body: impl FnOnce(&mut Self) -> Result<(), MangleError>,
    ) -> Result<String, MangleError> {
        self.mangle(prefix, what, |m| {
            m.tolerate_sugar = true;
            body(m)
        })
    }

    /// Like [`mangle`](Self::mangle) for a symbol naming `subject`, which
    /// never becomes a placeholder of itself.
    pub(crate) fn mangle_subject(
        &mut self,
        prefix: &str,
        what: &'static str,
        subject: DeclId,
        body: impl FnOnce(&mut Self) -> Result<(), MangleError>,
    ) -> Result<String, MangleError> {
        self.mangle(prefix, what, |m| {
            m.subject = Some(subject);
            body(m)
        })
    }

    /// Like [`mangle`](Self::mangle), without symbolic references.
    pub(crate) fn mangle_without_symbolic_references(
        &mut self,
        prefix: &str,
        what: &'static str,
        body: impl FnOnce(&mut Self) -> Result<(), MangleError>,
    ) -> Result<String, MangleError> {
        self.mangle(prefix, what, |m| {
            m.symbolic_enabled = false;
            body(m)
        })
    }

    // === Tokens ===

    pub(crate) fn append_operator(&mut self, op: &str) {
        self.out.push_str(op);
    }

    pub(crate) fn append_identifier(&mut self, text: &str) {
        push_identifier(&mut self.out, text);
    }

    pub(crate) fn append_operator_with_index(&mut self, op: &str, index: u32) {
        self.out.push_str(op);
        push_index(&mut self.out, index);
    }

    // === Substitutions ===

    /// Emit a back-reference when `key` was already expanded in this call.
    pub(crate) fn try_substitution(&mut self, key: SubstKey) -> bool {
        let Some(index) = self.substitutions.lookup(key) else {
            return false;
        };
        trace!(?key, index, "substitution hit");
        push_back_reference(&mut self.out, index);
        true
    }

    pub(crate) fn add_substitution(&mut self, key: SubstKey) {
        let index = self.substitutions.register(key);
        trace!(?key, index, "substitution registered");
    }

    // === Symbolic references ===

    /// Emit a placeholder for `decl` when symbolic references are enabled
    /// and the policy accepts it.
    pub(crate) fn try_symbolic_reference(&mut self, decl: DeclId) -> Result<bool, MangleError> {
        if !self.symbolic_enabled || self.subject == Some(decl) {
            return Ok(false);
        }
        let referent = SymbolicReferent::for_decl(self.program, decl)?;
        if !self.policy.as_ref().map_or(true, |accept| accept(referent)) {
            return Ok(false);
        }
        let reference = push_placeholder(&mut self.out, referent);
        trace!(?referent, offset = reference.offset, "symbolic reference");
        self.symbolic_references.push(reference);
        Ok(true)
    }

    // === Generic environment ===

    /// Encode with `signature` bound, restoring the previous binding after.
    pub(crate) fn with_generic_signature<T>(
        &mut self,
        signature: Option<GenericSigId>,
        body: impl FnOnce(&mut Self) -> Result<T, MangleError>,
    ) -> Result<T, MangleError> {
        self.binder.push(signature);
        let result = body(self);
        self.binder.pop();
        result
    }
}
