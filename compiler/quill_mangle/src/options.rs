//! Mangler configuration.

/// Flags fixed when a [`Mangler`](crate::Mangler) is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ManglerOptions {
    /// Encode sugared types as written instead of rejecting them.
    pub dwarf_mode: bool,
    /// Elide the protocol of a dependent member type when the base type
    /// is known to conform to exactly that one protocol.
    pub optimize_protocol_names: bool,
    /// Spell foreign-visible declarations by their foreign runtime name.
    pub use_objc_runtime_names: bool,
    /// Spell nameless declarations with a placeholder instead of failing.
    pub allow_nameless: bool,
    /// Replace nominal and opaque type declarations by fixed-width
    /// placeholders for the caller to patch.
    pub allow_symbolic_references: bool,
}

impl Default for ManglerOptions {
    fn default() -> Self {
        Self {
            dwarf_mode: false,
            optimize_protocol_names: true,
            use_objc_runtime_names: false,
            allow_nameless: false,
            allow_symbolic_references: false,
        }
    }
}

impl ManglerOptions {
    #[must_use]
    pub const fn with_dwarf_mode(mut self, enabled: bool) -> Self {
        self.dwarf_mode = enabled;
        self
    }

    #[must_use]
    pub const fn with_optimize_protocol_names(mut self, enabled: bool) -> Self {
        self.optimize_protocol_names = enabled;
        self
    }

    #[must_use]
    pub const fn with_objc_runtime_names(mut self, enabled: bool) -> Self {
        self.use_objc_runtime_names = enabled;
        self
    }

    #[must_use]
    pub const fn with_nameless(mut self, enabled: bool) -> Self {
        self.allow_nameless = enabled;
        self
    }

    #[must_use]
    pub const fn with_symbolic_references(mut self, enabled: bool) -> Self {
        self.allow_symbolic_references = enabled;
        self
    }
}

/// Which flavour of symbol an entity mangling names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymbolKind {
    #[default]
    Default,
    /// Body of an async handler.
    AsyncHandlerBody,
    /// Dynamically replaceable implementation thunk.
    DynamicThunk,
    /// Thunk exposing a native entity to the foreign runtime.
    NativeToForeignThunk,
    /// Thunk calling a foreign entity from native code.
    ForeignToNativeThunk,
}

impl SymbolKind {
    /// Operator emitted right after the global prefix.
    pub(crate) const fn operator(self) -> &'static str {
        match self {
            SymbolKind::Default => "",
            SymbolKind::AsyncHandlerBody => "Ta",
            SymbolKind::DynamicThunk => "TD",
            SymbolKind::NativeToForeignThunk => "To",
            SymbolKind::ForeignToNativeThunk => "TO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_only_optimize_protocol_names() {
        let options = ManglerOptions::default();
        assert!(options.optimize_protocol_names);
        assert!(!options.dwarf_mode);
        assert!(!options.allow_symbolic_references);
        assert_eq!(
            options.with_dwarf_mode(true).with_nameless(true),
            ManglerOptions {
                dwarf_mode: true,
                allow_nameless: true,
                ..ManglerOptions::default()
            }
        );
    }

    #[test]
    fn symbol_kind_operators_are_distinct() {
        let kinds = [
            SymbolKind::Default,
            SymbolKind::AsyncHandlerBody,
            SymbolKind::DynamicThunk,
            SymbolKind::NativeToForeignThunk,
            SymbolKind::ForeignToNativeThunk,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.operator(), b.operator());
            }
        }
    }
}
