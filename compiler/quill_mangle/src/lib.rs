//! Symbol mangling for Quill
//!
//! Encodes declarations, types, generic signatures and protocol
//! conformances of a [`quill_ir::Program`] into compact, unique, linker-safe
//! names. The same mangling scheme also names thunks, witness tables, key
//! path helpers, automatic differentiation artifacts, debug info types and
//! cross-reference identifiers (USRs).
//!
//! # Grammar
//!
//! The grammar is postfix: each production appends one node and each
//! operator consumes a fixed number of preceding nodes.
//!
//! ```text
//! symbol ::= '$q' SYMBOL-KIND? body
//! identifier ::= LENGTH TEXT | '0' LENGTH ESCAPED-TEXT
//! INDEX ::= '_' | DIGITS '_'                     // n = 0 | n - 1
//! back-reference ::= 'A' [a-z] | 'A' DIGITS '_'
//! ```
//!
//! Every compound node is registered in a per-call substitution table. A
//! repeated node is spelled by its back-reference. Well-known standard
//! library types have reserved two-letter spellings (`Si`, `SS`, ...).
//! With symbolic references enabled, nominal and opaque type declarations
//! may instead be written as fixed-width placeholders that the caller
//! patches once addresses are known; see [`Mangler::symbolic_references`].
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=quill_mangle=debug`: Log every finished symbol.
//! - `RUST_LOG=quill_mangle=trace`: Also log substitution hits, symbolic
//!   references and generic signature deltas.

mod conformance;
mod context;
mod encode;
mod entity;
mod error;
mod function;
mod generics;
mod mangler;
mod options;
mod substitution;
mod symbolic;
mod types;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;

pub use entity::WitnessRequirement;
pub use error::MangleError;
pub use generics::SignatureDelta;
pub use mangler::{Mangler, MANGLING_PREFIX};
pub use options::{ManglerOptions, SymbolKind};
pub use symbolic::{SymbolicPolicy, SymbolicReference, SymbolicReferent, SYMBOLIC_REFERENCE_WIDTH};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
