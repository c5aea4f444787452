//! Symbolic references.
//!
//! With symbolic references enabled, a nominal type or opaque type
//! declaration may be written as a fixed-width placeholder instead of its
//! full spelling. The ledger records where each placeholder starts so the
//! caller can patch in a relative address once the referent is laid out.

use quill_ir::{DeclId, DeclKind, Program};

use crate::MangleError;

/// Width of every placeholder in bytes: one kind byte and four zero bytes.
pub const SYMBOLIC_REFERENCE_WIDTH: usize = 5;

const NOMINAL_MARKER: char = '\u{1}';
const OPAQUE_MARKER: char = '\u{2}';

/// A declaration that may be referenced symbolically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolicReferent {
    /// Struct, enum, class or protocol.
    Nominal(DeclId),
    /// Opaque result type declaration.
    Opaque(DeclId),
}

impl SymbolicReferent {
    /// Classify `decl`, rejecting kinds that cannot be referenced
    /// symbolically.
    pub fn for_decl(program: &Program, decl: DeclId) -> Result<Self, MangleError> {
        match program.decl(decl).kind {
            DeclKind::OpaqueType { .. } => Ok(SymbolicReferent::Opaque(decl)),
            ref kind if kind.is_nominal() => Ok(SymbolicReferent::Nominal(decl)),
            _ => Err(MangleError::IneligibleSymbolicReferent { decl }),
        }
    }

    pub const fn decl(self) -> DeclId {
        match self {
            SymbolicReferent::Nominal(decl) | SymbolicReferent::Opaque(decl) => decl,
        }
    }

    const fn marker(self) -> char {
        match self {
            SymbolicReferent::Nominal(_) => NOMINAL_MARKER,
            SymbolicReferent::Opaque(_) => OPAQUE_MARKER,
        }
    }
}

/// One placeholder in a finished symbol.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SymbolicReference {
    pub referent: SymbolicReferent,
    /// Byte offset of the placeholder in the symbol.
    pub offset: usize,
}

/// Caller-supplied filter deciding which eligible referents become
/// placeholders.
pub type SymbolicPolicy<'p> = Box<dyn Fn(SymbolicReferent) -> bool + 'p>;

/// Append the placeholder for `referent` and return its ledger entry.
pub(crate) fn push_placeholder(out: &mut String, referent: SymbolicReferent) -> SymbolicReference {
    let offset = out.len();
    out.push(referent.marker());
    out.push_str("\0\0\0\0");
    SymbolicReference { referent, offset }
}
