//! Type resolution from declared names to primitive classifications.
//!
//! This module provides [`TypeResolver`], which reduces a type reference to
//! what the native side actually sees.
//!
//! ## Resolution Order
//!
//! 1. Unqualified basic keywords (`gint`, `utf8`, `none`, ...) classify directly.
//! 2. Otherwise the registry is consulted:
//!    - aliases are followed to their target,
//!    - enumerations and bitfields become `gint32`,
//!    - callbacks become callback references,
//!    - records, classes, interfaces and unions stay opaque.
//! 3. Unknown and foreign-namespace names are opaque. This is not an error.
//!
//! Alias chains are followed on every call. A chain longer than
//! [`MAX_ALIAS_DEPTH`] is treated as a cycle and resolves to an opaque handle.

use girffi_core::{ArrayLength, BasicType, EnumEntry, TypeName, TypeShape};
use girffi_registry::{Entity, TypeRegistry};

/// Longest alias chain followed before giving up.
pub const MAX_ALIAS_DEPTH: usize = 64;

/// What a type reference is at the ABI level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveClass {
    /// Basic keyword, possibly reached through aliases or an enumeration.
    Basic(BasicType),
    /// Declared callback type.
    Callback(TypeName),
    /// Pointer-backed opaque handle: records, objects, unknown names.
    Opaque(TypeName),
}

impl PrimitiveClass {
    pub fn as_basic(&self) -> Option<BasicType> {
        match self {
            PrimitiveClass::Basic(basic) => Some(*basic),
            _ => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, PrimitiveClass::Opaque(_))
    }
}

/// A non-scalar reference resolved from a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Record, object or unresolved name.
    Opaque(TypeName),
    /// Callback type.
    Callback(TypeName),
    /// Boxed array container (`GLib.Array`, `GLib.PtrArray`, `GLib.ByteArray`).
    Container(TypeName),
}

/// A plain C array with a resolved element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedArray {
    pub element: PrimitiveClass,
    pub length: ArrayLength,
}

/// Resolution of a complete declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedType {
    Scalar(BasicType),
    Array(ResolvedArray),
    Reference(Reference),
}

/// Resolves type references against one namespace's registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'reg> {
    registry: &'reg TypeRegistry,
}

impl<'reg> TypeResolver<'reg> {
    pub fn new(registry: &'reg TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'reg TypeRegistry {
        self.registry
    }

    /// Resolve a type reference to its primitive classification.
    pub fn resolve(&self, name: &TypeName) -> PrimitiveClass {
        let terminal = self.follow_aliases(name);
        self.classify_terminal(&terminal)
    }

    /// Resolve a possibly dotted name string.
    pub fn resolve_str(&self, name: &str) -> PrimitiveClass {
        self.resolve(&TypeName::parse(name))
    }

    /// Follow alias links from `name` to the first name that is not an alias.
    ///
    /// Returns `name` itself when it is not an alias. When the chain exceeds
    /// [`MAX_ALIAS_DEPTH`] the original name is returned, which then
    /// classifies as opaque.
    pub fn follow_aliases(&self, name: &TypeName) -> TypeName {
        let mut current = name.clone();
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.registry.lookup(&current) {
                Some(Entity::Alias(alias)) => {
                    tracing::trace!(from = %current, to = %alias.target, "following alias");
                    current = alias.target.clone();
                }
                _ => return current,
            }
        }

        tracing::warn!(
            alias = %name,
            depth = MAX_ALIAS_DEPTH,
            "alias chain too deep, treating as opaque"
        );
        name.clone()
    }

    /// The enumeration or bitfield a name denotes, through aliases.
    pub fn enum_name(&self, name: &TypeName) -> Option<TypeName> {
        self.enum_entry(name).map(|(name, _)| name)
    }

    /// The enumeration or bitfield a name denotes, with its localized name.
    pub fn enum_entry(&self, name: &TypeName) -> Option<(TypeName, &'reg EnumEntry)> {
        let terminal = self.follow_aliases(name);
        match self.registry.lookup(&terminal) {
            Some(Entity::Enum(entry)) => Some((self.registry.localize(&terminal), entry)),
            _ => None,
        }
    }

    fn classify_terminal(&self, name: &TypeName) -> PrimitiveClass {
        if !name.is_qualified()
            && let Some(basic) = BasicType::from_keyword(name.local_name())
        {
            return PrimitiveClass::Basic(basic);
        }

        let class = match self.registry.lookup(name) {
            Some(Entity::Enum(_)) => PrimitiveClass::Basic(BasicType::Int32),
            Some(Entity::Callback(_)) => PrimitiveClass::Callback(self.registry.localize(name)),
            // Records and over-deep alias chains
            Some(Entity::Record(_) | Entity::Alias(_)) => {
                PrimitiveClass::Opaque(self.registry.localize(name))
            }
            None => PrimitiveClass::Opaque(self.registry.localize(name)),
        };
        tracing::trace!(name = %name, ?class, "resolved");
        class
    }

    /// Resolve a declared shape.
    pub fn resolve_shape(&self, shape: &TypeShape) -> ResolvedType {
        match shape {
            TypeShape::Scalar(name) => match self.resolve(name) {
                PrimitiveClass::Basic(basic) => ResolvedType::Scalar(basic),
                PrimitiveClass::Callback(name) => ResolvedType::Reference(Reference::Callback(name)),
                PrimitiveClass::Opaque(name) => ResolvedType::Reference(Reference::Opaque(name)),
            },
            TypeShape::Array(spec) => match &spec.container {
                Some(container) => {
                    ResolvedType::Reference(Reference::Container(self.registry.localize(container)))
                }
                None => ResolvedType::Array(ResolvedArray {
                    element: self.resolve(&spec.element),
                    length: spec.length,
                }),
            },
        }
    }
}
