//! Substitution table and standard substitutions.
//!
//! Every compound node the encoder expands is registered here. A later
//! occurrence of the same node in the same call is spelled as a
//! back-reference to its registration index instead of being expanded
//! again. Keys are arena identities, so registration and lookup are O(1).

use quill_ir::{DeclId, Idx};
use rustc_hash::FxHashMap;

/// Identity of an encoded node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SubstKey {
    Type(Idx),
    /// Nominal, alias, module or opaque type declaration.
    Decl(DeclId),
}

#[derive(Default)]
pub(crate) struct SubstitutionTable {
    indices: FxHashMap<SubstKey, u32>,
}

impl SubstitutionTable {
    pub(crate) fn lookup(&self, key: SubstKey) -> Option<u32> {
        self.indices.get(&key).copied()
    }

    /// Register `key` with the next index. Re-registering keeps the
    /// original index.
    pub(crate) fn register(&mut self, key: SubstKey) -> u32 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "one symbol never holds u32::MAX distinct nodes"
        )]
        let next = self.indices.len() as u32;
        *self.indices.entry(key).or_insert(next)
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    pub(crate) fn clear(&mut self) {
        self.indices.clear();
    }
}

/// Reserved spelling of a standard library declaration, looked up by name.
pub(crate) fn standard_substitution(name: &str) -> Option<&'static str> {
    Some(match name {
        "Int" => "Si",
        "UInt" => "Su",
        "Bool" => "Sb",
        "Double" => "Sd",
        "Float" => "Sf",
        "String" => "SS",
        "Character" => "SJ",
        "Array" => "Sa",
        "Dictionary" => "SD",
        "Set" => "Sh",
        "Optional" => "Sq",
        "Equatable" => "SQ",
        "Hashable" => "SH",
        _ => return None,
    })
}

/// Spelling of the standard library module.
pub(crate) const STDLIB_MODULE: &str = "s";

/// Spelling of the context of declarations imported from foreign modules.
pub(crate) const FOREIGN_MODULE: &str = "So";

/// Short form of `Optional<T>`, written after `T`.
pub(crate) const OPTIONAL_SHORTHAND: &str = "Sg";
