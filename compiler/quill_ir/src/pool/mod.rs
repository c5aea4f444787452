//! Hash-consed type storage.
//!
//! Every type is an `Item` (tag + data word). Compound types keep their
//! children in the shared `extra` array as `[len, words...]`. Interning
//! guarantees that structurally equal types share one `Idx`.
//!
//! The canonical form of every type is computed when it is interned, so
//! `canonical()` is a lookup. A type is canonical iff it contains no sugar.

mod construct;

#[cfg(test)]
mod tests;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::types::{
    CalleeConvention, ExistentialType, FunctionExtInfo, FunctionType, ImplFunctionType, ImplParam,
    ImplResult, ParamConvention, ResultConvention,
};
use crate::{
    DeclId, FnParam, FunctionRepr, GenericParamKey, Idx, Name, ParamFlags, Tag, TupleElem,
    TypeFlags,
};

#[derive(Copy, Clone, Debug)]
struct Item {
    tag: Tag,
    data: u32,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct InternKey {
    tag: Tag,
    words: SmallVec<[u32; 4]>,
}

/// Decoded nominal or bound generic type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NominalType {
    pub decl: DeclId,
    /// Enclosing type when the nominal is nested in a generic type.
    pub parent: Option<Idx>,
    /// Arguments at this level only; empty for `Tag::Nominal`.
    pub args: Vec<Idx>,
}

/// Decoded opaque result type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpaqueType {
    pub decl: DeclId,
    /// Which opaque result of the naming declaration.
    pub ordinal: u32,
    /// Arguments for the opaque declaration's generic signature, flattened.
    pub args: Vec<Idx>,
}

/// The type pool.
pub struct Pool {
    items: Vec<Item>,
    flags: Vec<TypeFlags>,
    canonical: Vec<Idx>,
    extra: Vec<u32>,
    intern_map: FxHashMap<InternKey, Idx>,
}

impl Pool {
    /// Create a pool with the builtin types at their fixed indices.
    pub fn new() -> Self {
        let mut pool = Self {
            items: Vec::with_capacity(256),
            flags: Vec::with_capacity(256),
            canonical: Vec::with_capacity(256),
            extra: Vec::with_capacity(1024),
            intern_map: FxHashMap::default(),
        };

        let builtin = TypeFlags::IS_BUILTIN;
        pool.intern(Tag::EmptyTuple, 0, TypeFlags::IS_TUPLE, None);
        for bits in [8, 16, 32, 64] {
            pool.intern(Tag::BuiltinInt, bits, builtin, None);
        }
        pool.intern(Tag::BuiltinWord, 0, builtin, None);
        for bits in [32, 64] {
            pool.intern(Tag::BuiltinFloat, bits, builtin, None);
        }
        pool.intern(Tag::RawPointer, 0, builtin, None);
        pool.intern(Tag::NativeObject, 0, builtin, None);
        pool.intern(Tag::UnknownObject, 0, builtin, None);
        pool.intern(Tag::BridgeObject, 0, builtin, None);

        debug_assert_eq!(pool.items.len(), Idx::FIRST_DYNAMIC as usize);
        pool
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Interning ===

    /// Intern a type whose payload fits in the data word.
    fn intern(&mut self, tag: Tag, data: u32, flags: TypeFlags, canonical: Option<Idx>) -> Idx {
        let key = InternKey {
            tag,
            words: SmallVec::from_slice(&[data]),
        };
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }
        self.push_item(Item { tag, data }, flags, canonical, key)
    }

    /// Intern a type stored in the extra array.
    ///
    /// `canonical` is `None` when the type is its own canonical form.
    fn intern_complex(
        &mut self,
        tag: Tag,
        words: &[u32],
        flags: TypeFlags,
        canonical: Option<Idx>,
    ) -> Idx {
        debug_assert!(tag.uses_extra());
        let key = InternKey {
            tag,
            words: SmallVec::from_slice(words),
        };
        if let Some(&idx) = self.intern_map.get(&key) {
            return idx;
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "extra array stays far below u32::MAX words"
        )]
        let start = self.extra.len() as u32;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "word count fits u32, pool layout uses u32 words"
        )]
        let len = words.len() as u32;
        self.extra.push(len);
        self.extra.extend_from_slice(words);
        self.push_item(Item { tag, data: start }, flags, canonical, key)
    }

    fn push_item(
        &mut self,
        item: Item,
        flags: TypeFlags,
        canonical: Option<Idx>,
        key: InternKey,
    ) -> Idx {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "type count stays far below u32::MAX"
        )]
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(item);
        self.flags.push(flags);
        self.canonical.push(canonical.unwrap_or(idx));
        self.intern_map.insert(key, idx);
        idx
    }

    /// Union of the propagated flags of `children`.
    fn child_flags(&self, children: impl IntoIterator<Item = Idx>) -> TypeFlags {
        children
            .into_iter()
            .fold(TypeFlags::empty(), |acc, child| {
                acc | (self.flags(child) & TypeFlags::PROPAGATE_MASK)
            })
    }

    fn is_sugared(&self, idx: Idx) -> bool {
        self.flags(idx).contains(TypeFlags::HAS_SUGAR)
    }

    // === Queries ===

    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items[idx.raw() as usize].tag
    }

    #[inline]
    pub fn flags(&self, idx: Idx) -> TypeFlags {
        self.flags[idx.raw() as usize]
    }

    /// The sugar-free form of `idx`.
    #[inline]
    pub fn canonical(&self, idx: Idx) -> Idx {
        self.canonical[idx.raw() as usize]
    }

    #[inline]
    pub fn is_canonical(&self, idx: Idx) -> bool {
        self.canonical(idx) == idx
    }

    fn data(&self, idx: Idx) -> u32 {
        self.items[idx.raw() as usize].data
    }

    fn words(&self, idx: Idx) -> &[u32] {
        let start = self.data(idx) as usize;
        let len = self.extra[start] as usize;
        &self.extra[start + 1..start + 1 + len]
    }

    fn words_of(&self, idx: Idx, tags: &[Tag]) -> Option<&[u32]> {
        tags.contains(&self.tag(idx)).then(|| self.words(idx))
    }

    /// Bit width of a builtin integer or float.
    pub fn builtin_width(&self, idx: Idx) -> Option<u32> {
        matches!(self.tag(idx), Tag::BuiltinInt | Tag::BuiltinFloat).then(|| self.data(idx))
    }

    /// Strip one layer of sugar.
    pub fn singly_desugared(&self, idx: Idx) -> Option<Idx> {
        if self.tag(idx).is_sugar() {
            self.words(idx).first().map(|&raw| Idx::from_raw(raw))
        } else {
            None
        }
    }

    /// Alias declaration and underlying type of an alias reference.
    pub fn alias_info(&self, idx: Idx) -> Option<(DeclId, Idx)> {
        match self.words_of(idx, &[Tag::Alias])? {
            &[underlying, decl] => Some((DeclId::from_raw(decl), Idx::from_raw(underlying))),
            _ => None,
        }
    }

    pub fn nominal_info(&self, idx: Idx) -> Option<NominalType> {
        let words = self.words_of(idx, &[Tag::Nominal, Tag::BoundGeneric])?;
        let (&decl, rest) = words.split_first()?;
        let (&parent, args) = rest.split_first()?;
        Some(NominalType {
            decl: DeclId::from_raw(decl),
            parent: Idx::from_optional_raw(parent),
            args: args.iter().map(|&raw| Idx::from_raw(raw)).collect(),
        })
    }

    /// Elements of a tuple; the empty tuple has none.
    pub fn tuple_elems(&self, idx: Idx) -> Option<Vec<TupleElem>> {
        if self.tag(idx) == Tag::EmptyTuple {
            return Some(Vec::new());
        }
        let words = self.words_of(idx, &[Tag::Tuple])?;
        Some(
            words
                .chunks_exact(2)
                .map(|pair| TupleElem {
                    label: (pair[0] != 0).then(|| Name::from_raw(pair[0])),
                    ty: Idx::from_raw(pair[1]),
                })
                .collect(),
        )
    }

    pub fn function_info(&self, idx: Idx) -> Option<FunctionType> {
        let words = self.words_of(idx, &[Tag::Function])?;
        let (&ext, rest) = words.split_first()?;
        let (&result, params) = rest.split_last()?;
        Some(FunctionType {
            params: params
                .chunks_exact(2)
                .map(|pair| FnParam {
                    ty: Idx::from_raw(pair[0]),
                    flags: ParamFlags::from_bits_truncate(pair[1]),
                })
                .collect(),
            result: Idx::from_raw(result),
            ext: FunctionExtInfo::from_raw(ext),
        })
    }

    pub fn impl_function_info(&self, idx: Idx) -> Option<ImplFunctionType> {
        let words = self.words_of(idx, &[Tag::ImplFunction])?;
        let (header, rest) = words.split_at_checked(4)?;
        let param_words = header[3] as usize * 2;
        let (params, rest) = rest.split_at_checked(param_words)?;
        let (&result_count, rest) = rest.split_first()?;
        let (results, rest) = rest.split_at_checked(result_count as usize * 2)?;
        Some(ImplFunctionType {
            callee: CalleeConvention::from_raw(header[0]),
            repr: FunctionExtInfo::from_raw(header[1]).repr,
            is_async: header[2] != 0,
            params: params
                .chunks_exact(2)
                .map(|pair| ImplParam {
                    convention: ParamConvention::from_raw(pair[0]),
                    ty: Idx::from_raw(pair[1]),
                })
                .collect(),
            results: results
                .chunks_exact(2)
                .map(|pair| ImplResult {
                    convention: ResultConvention::from_raw(pair[0]),
                    ty: Idx::from_raw(pair[1]),
                })
                .collect(),
            error: rest.first().and_then(|&raw| Idx::from_optional_raw(raw)),
        })
    }

    /// Instance type of a metatype or existential metatype.
    pub fn metatype_instance(&self, idx: Idx) -> Option<Idx> {
        matches!(self.tag(idx), Tag::Metatype | Tag::ExistentialMetatype)
            .then(|| Idx::from_raw(self.data(idx)))
    }

    pub fn existential_layout(&self, idx: Idx) -> Option<ExistentialType> {
        let words = self.words_of(idx, &[Tag::Existential])?;
        let (header, protocols) = words.split_at_checked(2)?;
        Some(ExistentialType {
            protocols: protocols.iter().map(|&raw| DeclId::from_raw(raw)).collect(),
            superclass: Idx::from_optional_raw(header[0]),
            any_object: header[1] != 0,
        })
    }

    pub fn generic_param_key(&self, idx: Idx) -> Option<GenericParamKey> {
        (self.tag(idx) == Tag::GenericParam).then(|| {
            let data = self.data(idx);
            GenericParamKey::new(data >> 16, data & 0xFFFF)
        })
    }

    /// Base type and associated type declaration of a dependent member.
    pub fn dependent_member_info(&self, idx: Idx) -> Option<(Idx, DeclId)> {
        match self.words_of(idx, &[Tag::DependentMember])? {
            &[base, assoc] => Some((Idx::from_raw(base), DeclId::from_raw(assoc))),
            _ => None,
        }
    }

    pub fn opaque_info(&self, idx: Idx) -> Option<OpaqueType> {
        let words = self.words_of(idx, &[Tag::Opaque])?;
        let (header, args) = words.split_at_checked(2)?;
        Some(OpaqueType {
            decl: DeclId::from_raw(header[0]),
            ordinal: header[1],
            args: args.iter().map(|&raw| Idx::from_raw(raw)).collect(),
        })
    }

    /// Check if `idx` is a function value type with the given representation.
    pub fn has_function_repr(&self, idx: Idx, repr: FunctionRepr) -> bool {
        self.function_info(idx).is_some_and(|f| f.ext.repr == repr)
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
