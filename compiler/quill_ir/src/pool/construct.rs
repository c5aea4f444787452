//! Type construction helpers for the Pool.
//!
//! Each constructor computes the cached flags and, when any child is
//! sugared, interns the canonical variant first so `canonical()` stays O(1).

use smallvec::SmallVec;

use crate::types::{ExistentialType, FunctionExtInfo, ImplFunctionType};
use crate::{DeclId, FnParam, GenericParamKey, Idx, Pool, Tag, TupleElem, TypeFlags};

impl Pool {
    // === Builtins ===

    /// `Builtin.Int<bits>`; the common widths are pre-interned.
    pub fn builtin_int(&mut self, bits: u32) -> Idx {
        self.intern(Tag::BuiltinInt, bits, TypeFlags::IS_BUILTIN, None)
    }

    /// `Builtin.FPIEEE<bits>`.
    pub fn builtin_float(&mut self, bits: u32) -> Idx {
        self.intern(Tag::BuiltinFloat, bits, TypeFlags::IS_BUILTIN, None)
    }

    // === Nominal Types ===

    /// A non-generic nominal type, optionally nested in a generic `parent`.
    ///
    /// Extra layout: `[decl, parent]`.
    pub fn nominal(&mut self, decl: DeclId, parent: Option<Idx>) -> Idx {
        let flags = self.child_flags(parent) | TypeFlags::IS_NOMINAL;
        let canonical = match parent {
            Some(p) if self.is_sugared(p) => {
                let canon_parent = self.canonical(p);
                Some(self.nominal(decl, Some(canon_parent)))
            }
            _ => None,
        };
        self.intern_complex(
            Tag::Nominal,
            &[decl.raw(), Idx::optional_raw(parent)],
            flags,
            canonical,
        )
    }

    /// A generic nominal type applied to `args`.
    ///
    /// Extra layout: `[decl, parent, args...]`.
    pub fn bound_generic(&mut self, decl: DeclId, parent: Option<Idx>, args: &[Idx]) -> Idx {
        let flags =
            self.child_flags(parent.into_iter().chain(args.iter().copied())) | TypeFlags::IS_NOMINAL;
        let canonical = if flags.contains(TypeFlags::HAS_SUGAR) {
            let canon_parent = parent.map(|p| self.canonical(p));
            let canon_args: Vec<Idx> = args.iter().map(|&a| self.canonical(a)).collect();
            Some(self.bound_generic(decl, canon_parent, &canon_args))
        } else {
            None
        };

        let mut extra = Vec::with_capacity(args.len() + 2);
        extra.push(decl.raw());
        extra.push(Idx::optional_raw(parent));
        extra.extend(args.iter().map(|a| a.raw()));
        self.intern_complex(Tag::BoundGeneric, &extra, flags, canonical)
    }

    // === Structural Types ===

    /// A tuple type.
    ///
    /// The empty tuple is `Idx::EMPTY_TUPLE`; a single unlabeled element is
    /// the element itself.
    ///
    /// Extra layout: `[(label, ty)...]`, label 0 for none.
    pub fn tuple(&mut self, elems: &[TupleElem]) -> Idx {
        match elems {
            [] => return Idx::EMPTY_TUPLE,
            [only] if only.label.is_none() => return only.ty,
            _ => {}
        }

        let flags = self.child_flags(elems.iter().map(|e| e.ty)) | TypeFlags::IS_TUPLE;
        let canonical = if flags.contains(TypeFlags::HAS_SUGAR) {
            let canon: Vec<TupleElem> = elems
                .iter()
                .map(|e| TupleElem {
                    label: e.label,
                    ty: self.canonical(e.ty),
                })
                .collect();
            Some(self.tuple(&canon))
        } else {
            None
        };

        let mut extra = Vec::with_capacity(elems.len() * 2);
        for elem in elems {
            extra.push(elem.label.map_or(0, crate::Name::raw));
            extra.push(elem.ty.raw());
        }
        self.intern_complex(Tag::Tuple, &extra, flags, canonical)
    }

    /// A function type.
    ///
    /// Extra layout: `[ext_info, (ty, flags)..., result]`.
    pub fn function(&mut self, params: &[FnParam], result: Idx, ext: FunctionExtInfo) -> Idx {
        let flags = self.child_flags(params.iter().map(|p| p.ty).chain([result]))
            | TypeFlags::IS_FUNCTION;
        let canonical = if flags.contains(TypeFlags::HAS_SUGAR) {
            let canon: Vec<FnParam> = params
                .iter()
                .map(|p| FnParam {
                    ty: self.canonical(p.ty),
                    flags: p.flags,
                })
                .collect();
            let canon_result = self.canonical(result);
            Some(self.function(&canon, canon_result, ext))
        } else {
            None
        };

        let mut extra = Vec::with_capacity(params.len() * 2 + 2);
        extra.push(ext.to_raw());
        for param in params {
            extra.push(param.ty.raw());
            extra.push(param.flags.bits());
        }
        extra.push(result.raw());
        self.intern_complex(Tag::Function, &extra, flags, canonical)
    }

    /// A lowered function type.
    ///
    /// Extra layout: `[callee, repr, async, n, (conv, ty)..., m, (conv, ty)..., error]`.
    pub fn impl_function(&mut self, func: &ImplFunctionType) -> Idx {
        let children = func
            .params
            .iter()
            .map(|p| p.ty)
            .chain(func.results.iter().map(|r| r.ty))
            .chain(func.error);
        let flags = self.child_flags(children) | TypeFlags::IS_FUNCTION;
        let canonical = if flags.contains(TypeFlags::HAS_SUGAR) {
            let mut canon = func.clone();
            for param in &mut canon.params {
                param.ty = self.canonical(param.ty);
            }
            for result in &mut canon.results {
                result.ty = self.canonical(result.ty);
            }
            canon.error = canon.error.map(|e| self.canonical(e));
            Some(self.impl_function(&canon))
        } else {
            None
        };

        let repr = FunctionExtInfo::default().with_repr(func.repr);
        let mut extra = Vec::with_capacity(6 + 2 * (func.params.len() + func.results.len()));
        extra.push(func.callee.to_raw());
        extra.push(repr.to_raw());
        extra.push(u32::from(func.is_async));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "param count fits u32, pool layout uses u32 words"
        )]
        let param_count = func.params.len() as u32;
        extra.push(param_count);
        for param in &func.params {
            extra.push(param.convention.to_raw());
            extra.push(param.ty.raw());
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "result count fits u32, pool layout uses u32 words"
        )]
        let result_count = func.results.len() as u32;
        extra.push(result_count);
        for result in &func.results {
            extra.push(result.convention.to_raw());
            extra.push(result.ty.raw());
        }
        extra.push(Idx::optional_raw(func.error));
        self.intern_complex(Tag::ImplFunction, &extra, flags, canonical)
    }

    /// `instance.Type`.
    pub fn metatype(&mut self, instance: Idx) -> Idx {
        self.single_child(Tag::Metatype, instance, Self::metatype)
    }

    /// `existential.Type` for a protocol composition.
    pub fn existential_metatype(&mut self, existential: Idx) -> Idx {
        self.single_child(Tag::ExistentialMetatype, existential, Self::existential_metatype)
    }

    fn single_child(&mut self, tag: Tag, child: Idx, rebuild: fn(&mut Self, Idx) -> Idx) -> Idx {
        let flags = self.child_flags([child]);
        let canonical = if self.is_sugared(child) {
            let canon_child = self.canonical(child);
            Some(rebuild(self, canon_child))
        } else {
            None
        };
        self.intern(tag, child.raw(), flags, canonical)
    }

    /// A protocol composition `P & Q`, optionally with a superclass or
    /// class constraint.
    ///
    /// Protocols are sorted by declaration and deduplicated, so `P & Q`,
    /// `Q & P` and `P & Q & P` are one type.
    ///
    /// Extra layout: `[superclass, any_object, protocols...]`.
    pub fn existential(&mut self, layout: &ExistentialType) -> Idx {
        let flags = self.child_flags(layout.superclass) | TypeFlags::IS_EXISTENTIAL;
        let canonical = match layout.superclass {
            Some(s) if self.is_sugared(s) => {
                let mut canon = layout.clone();
                canon.superclass = Some(self.canonical(s));
                Some(self.existential(&canon))
            }
            _ => None,
        };

        let mut protocols: SmallVec<[DeclId; 4]> = SmallVec::from_slice(&layout.protocols);
        protocols.sort_unstable();
        protocols.dedup();

        let mut extra = Vec::with_capacity(protocols.len() + 2);
        extra.push(Idx::optional_raw(layout.superclass));
        extra.push(u32::from(layout.any_object));
        extra.extend(protocols.iter().map(|p| p.raw()));
        self.intern_complex(Tag::Existential, &extra, flags, canonical)
    }

    // === Generic Types ===

    /// Generic parameter at `(depth, index)`; both must fit in 16 bits.
    pub fn generic_param(&mut self, key: GenericParamKey) -> Idx {
        debug_assert!(key.depth <= 0xFFFF && key.index <= 0xFFFF);
        self.intern(
            Tag::GenericParam,
            (key.depth << 16) | (key.index & 0xFFFF),
            TypeFlags::HAS_TYPE_PARAM,
            None,
        )
    }

    /// `base.Assoc`, where `assoc` is an associated type declaration.
    pub fn dependent_member(&mut self, base: Idx, assoc: DeclId) -> Idx {
        let flags = self.child_flags([base]) | TypeFlags::HAS_DEPENDENT_MEMBER;
        let canonical = if self.is_sugared(base) {
            let canon_base = self.canonical(base);
            Some(self.dependent_member(canon_base, assoc))
        } else {
            None
        };
        self.intern_complex(
            Tag::DependentMember,
            &[base.raw(), assoc.raw()],
            flags,
            canonical,
        )
    }

    /// Opaque result type `ordinal` of opaque declaration `decl`.
    ///
    /// Extra layout: `[decl, ordinal, args...]`.
    pub fn opaque(&mut self, decl: DeclId, ordinal: u32, args: &[Idx]) -> Idx {
        let flags = self.child_flags(args.iter().copied()) | TypeFlags::HAS_OPAQUE;
        let canonical = if flags.contains(TypeFlags::HAS_SUGAR) {
            let canon_args: Vec<Idx> = args.iter().map(|&a| self.canonical(a)).collect();
            Some(self.opaque(decl, ordinal, &canon_args))
        } else {
            None
        };

        let mut extra = Vec::with_capacity(args.len() + 2);
        extra.push(decl.raw());
        extra.push(ordinal);
        extra.extend(args.iter().map(|a| a.raw()));
        self.intern_complex(Tag::Opaque, &extra, flags, canonical)
    }

    // === Sugar ===

    fn sugar(&mut self, tag: Tag, desugared: Idx, payload: &[u32]) -> Idx {
        let flags = self.child_flags([desugared]) | TypeFlags::HAS_SUGAR;
        let canonical = self.canonical(desugared);
        let mut extra = Vec::with_capacity(payload.len() + 1);
        extra.push(desugared.raw());
        extra.extend_from_slice(payload);
        self.intern_complex(tag, &extra, flags, Some(canonical))
    }

    /// Reference to `underlying` spelled through alias `decl`.
    pub fn alias(&mut self, decl: DeclId, underlying: Idx) -> Idx {
        self.sugar(Tag::Alias, underlying, &[decl.raw()])
    }

    /// `(inner)`.
    pub fn paren(&mut self, inner: Idx) -> Idx {
        self.sugar(Tag::Paren, inner, &[])
    }

    /// `inner?`, where `desugared` is `Optional<inner>`.
    pub fn optional_sugar(&mut self, inner: Idx, desugared: Idx) -> Idx {
        self.sugar(Tag::OptionalSugar, desugared, &[inner.raw()])
    }

    /// `[element]`, where `desugared` is `Array<element>`.
    pub fn array_sugar(&mut self, element: Idx, desugared: Idx) -> Idx {
        self.sugar(Tag::ArraySugar, desugared, &[element.raw()])
    }

    /// `[key: value]`, where `desugared` is `Dictionary<key, value>`.
    pub fn dictionary_sugar(&mut self, key: Idx, value: Idx, desugared: Idx) -> Idx {
        self.sugar(Tag::DictionarySugar, desugared, &[key.raw(), value.raw()])
    }
}
