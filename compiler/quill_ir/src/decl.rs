//! Declarations and the contexts that nest them.

use crate::{DeclFlags, GenericSigId, Idx, Name};

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) const fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

pub(crate) use arena_id;

arena_id!(
    /// Handle to a declaration in the [`Program`](crate::Program).
    DeclId
);
arena_id!(
    /// Handle to a closure expression.
    ClosureId
);
arena_id!(
    /// Handle to a pattern binding declaration.
    PatternBindingId
);

/// What a declaration declares.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Module,
    /// Module imported from a foreign (C-family) language.
    ForeignModule,
    Struct,
    Enum,
    Class,
    Protocol {
        /// `Self.Assoc: Proto` requirements, in declaration order.
        associated_conformances: Vec<AssociatedConformance>,
    },
    /// Alias; its target is the declaration's interface type.
    TypeAlias,
    AssociatedType,
    Extension {
        extended: DeclId,
    },
    Func,
    Constructor,
    Destructor,
    Var,
    Subscript,
    EnumElement,
    /// Opaque result type of `naming`.
    OpaqueType {
        naming: DeclId,
    },
}

impl DeclKind {
    /// Struct, enum, class or protocol.
    pub const fn is_nominal(&self) -> bool {
        matches!(
            self,
            DeclKind::Struct | DeclKind::Enum | DeclKind::Class | DeclKind::Protocol { .. }
        )
    }

    pub const fn is_module(&self) -> bool {
        matches!(self, DeclKind::Module | DeclKind::ForeignModule)
    }

    /// Property or subscript.
    pub const fn is_storage(&self) -> bool {
        matches!(self, DeclKind::Var | DeclKind::Subscript)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            DeclKind::Module => "module",
            DeclKind::ForeignModule => "foreign module",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Class => "class",
            DeclKind::Protocol { .. } => "protocol",
            DeclKind::TypeAlias => "type alias",
            DeclKind::AssociatedType => "associated type",
            DeclKind::Extension { .. } => "extension",
            DeclKind::Func => "function",
            DeclKind::Constructor => "constructor",
            DeclKind::Destructor => "destructor",
            DeclKind::Var => "variable",
            DeclKind::Subscript => "subscript",
            DeclKind::EnumElement => "enum element",
            DeclKind::OpaqueType { .. } => "opaque type",
        }
    }
}

/// `Self.<associated_type>: <protocol>` inside a protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssociatedConformance {
    pub associated_type: DeclId,
    pub protocol: DeclId,
}

/// Storage accessor kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Read,
    Modify,
    WillSet,
    DidSet,
    Address,
    MutableAddress,
    Init,
}

/// Where a declaration or closure lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclContext {
    Decl(DeclId),
    Closure(ClosureId),
    /// Initial-value expression of a stored property.
    Initializer(DeclId),
    /// Default argument expression `index` of `owner`.
    DefaultArgument { owner: DeclId, index: u32 },
    /// Body of an accessor of `storage`.
    Accessor { storage: DeclId, kind: AccessorKind },
}

impl From<DeclId> for DeclContext {
    fn from(decl: DeclId) -> Self {
        DeclContext::Decl(decl)
    }
}

impl From<ClosureId> for DeclContext {
    fn from(closure: ClosureId) -> Self {
        DeclContext::Closure(closure)
    }
}

/// A declaration.
#[derive(Clone, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    /// `None` for nameless declarations such as subscripts and destructors.
    pub name: Option<Name>,
    /// `None` only for modules.
    pub parent: Option<DeclContext>,
    /// Full generic signature, including outer contexts' parameters.
    pub generic_signature: Option<GenericSigId>,
    /// Interface type: the value type of a property, the function type of
    /// a function, the target of an alias.
    pub interface_type: Option<Idx>,
    pub flags: DeclFlags,
    /// Argument labels of functions, constructors and subscripts.
    pub arg_labels: Vec<Option<Name>>,
    /// Disambiguates same-named declarations in one local context.
    pub local_discriminator: Option<u32>,
    /// File-scoped discriminator of a private declaration.
    pub private_discriminator: Option<Name>,
    /// Foreign runtime name.
    pub foreign_name: Option<Name>,
}

impl Decl {
    pub fn new(kind: DeclKind, name: Option<Name>, parent: Option<DeclContext>) -> Self {
        Self {
            kind,
            name,
            parent,
            generic_signature: None,
            interface_type: None,
            flags: DeclFlags::empty(),
            arg_labels: Vec::new(),
            local_discriminator: None,
            private_discriminator: None,
            foreign_name: None,
        }
    }

    #[must_use]
    pub fn with_signature(mut self, signature: GenericSigId) -> Self {
        self.generic_signature = Some(signature);
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: Idx) -> Self {
        self.interface_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: DeclFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Vec<Option<Name>>) -> Self {
        self.arg_labels = labels;
        self
    }

    #[must_use]
    pub fn with_local_discriminator(mut self, discriminator: u32) -> Self {
        self.local_discriminator = Some(discriminator);
        self
    }

    #[must_use]
    pub fn with_private_discriminator(mut self, discriminator: Name) -> Self {
        self.private_discriminator = Some(discriminator);
        self
    }

    #[must_use]
    pub fn with_foreign_name(mut self, name: Name) -> Self {
        self.foreign_name = Some(name);
        self
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(DeclFlags::STATIC)
    }
}

/// A closure expression.
#[derive(Copy, Clone, Debug)]
pub struct Closure {
    pub parent: DeclContext,
    /// Distinguishes sibling closures in the same parent.
    pub discriminator: u32,
    pub ty: Idx,
    /// Autoclosure synthesized for an argument.
    pub implicit: bool,
}

/// `let (a, b) = ..., c = ...`: entries of variables bound together.
#[derive(Clone, Debug)]
pub struct PatternBinding {
    pub parent: DeclContext,
    pub entries: Vec<Vec<DeclId>>,
}
