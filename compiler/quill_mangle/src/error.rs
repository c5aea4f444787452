//! Mangling failures.
//!
//! Every variant is a contract violation by the caller or an earlier
//! compiler phase. No partial symbol is ever returned alongside an error.

use quill_ir::{DeclId, Idx};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MangleError {
    /// A sugared type reached the encoder outside debug-info mode.
    #[error("type {ty:?} is not canonical")]
    NonCanonicalType { ty: Idx },

    /// Only nominal type and opaque type declarations can be referenced
    /// symbolically.
    #[error("declaration {decl:?} cannot be referenced symbolically")]
    IneligibleSymbolicReferent { decl: DeclId },

    #[error("declaration {decl:?} has no name and nameless entities are not allowed")]
    NamelessEntity { decl: DeclId },

    #[error("declaration {decl:?} is not {expected}")]
    UnexpectedEntity {
        decl: DeclId,
        expected: &'static str,
    },

    #[error("type {ty:?} is not {expected}")]
    UnexpectedType { ty: Idx, expected: &'static str },

    /// A generic parameter outside the bound generic signature.
    #[error("generic parameter τ_{depth}_{index} is not bound")]
    UnboundGenericParameter { depth: u32, index: u32 },

    #[error("no conformance path for {ty:?} to protocol {protocol:?}")]
    MissingConformancePath { ty: Idx, protocol: DeclId },

    #[error("pattern binding entry {entry} binds no variables")]
    EmptyPatternEntry { entry: usize },

    #[error("index {index} is out of range for {len} entries")]
    InvalidIndex { index: usize, len: usize },
}
