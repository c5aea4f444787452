//! String interner for identifiers.
//!
//! Interned strings are leaked so lookups hand out `&'static str` without
//! holding the lock.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct InternTable {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create an interner with the empty string pre-interned at slot 0.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, 0);
        Self {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its Name.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned
        if let Some(&slot) = self.table.read().map.get(s) {
            return Name::from_raw(slot);
        }

        let mut guard = self.table.write();
        if let Some(&slot) = guard.map.get(s) {
            return Name::from_raw(slot);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "identifier count never approaches u32::MAX"
        )]
        let slot = guard.strings.len() as u32;
        guard.strings.push(leaked);
        guard.map.insert(leaked, slot);
        Name::from_raw(slot)
    }

    /// Look up the text of an interned name.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.raw() as usize)
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
