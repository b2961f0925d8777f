//! TypeRegistry - declared entities of one namespace.
//!
//! This module provides [`TypeRegistry`], the lookup table the resolver and
//! marshaller consult for every non-basic type name.
//!
//! # Storage Model
//!
//! - Aliases, enumerations (bitfields included), callbacks and records are
//!   stored in one map per kind, keyed by unqualified name.
//! - A kind index maps every registered name to its [`EntityKind`] so that a
//!   name is claimed by exactly one entity.
//!
//! # Lookup
//!
//! Names qualified with the registry's own namespace are stripped before
//! lookup. Names of other namespaces are never found: the engine does not
//! ingest foreign namespaces, so callers treat them as opaque.
//!
//! # Thread Safety
//!
//! Registration happens once, single-threaded. After that the registry is
//! only read, and shared references can be handed to any number of resolvers.
//!
//! # Example
//!
//! ```
//! use girffi_core::{AliasEntry, EnumEntry, NamespaceModel, TypeName};
//! use girffi_registry::{Entity, TypeRegistry};
//!
//! let ns = NamespaceModel::new("GLib", "2.0")
//!     .with_alias(AliasEntry::new("Pid", "gint"))
//!     .with_enum(EnumEntry::enumeration("SeekType").with_value("CUR", 0));
//!
//! let registry = TypeRegistry::from_namespace(&ns).unwrap();
//! assert!(matches!(
//!     registry.lookup(&TypeName::parse("GLib.SeekType")),
//!     Some(Entity::Enum(_))
//! ));
//! assert!(registry.lookup(&TypeName::parse("Gio.File")).is_none());
//! ```

use rustc_hash::FxHashMap;

use girffi_core::{
    AliasEntry, CallbackEntry, EnumEntry, NamespaceModel, RecordEntry, RegistrationError,
    TypeName,
};

/// Kind of a registered entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Alias,
    Enumeration,
    Bitfield,
    Callback,
    Record,
}

impl EntityKind {
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Alias => "alias",
            EntityKind::Enumeration => "enumeration",
            EntityKind::Bitfield => "bitfield",
            EntityKind::Callback => "callback",
            EntityKind::Record => "record",
        }
    }
}

/// Borrowed view of a registered entity.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Alias(&'a AliasEntry),
    /// Enumeration or bitfield.
    Enum(&'a EnumEntry),
    Callback(&'a CallbackEntry),
    /// Record, class, interface or union.
    Record(&'a RecordEntry),
}

impl Entity<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Alias(_) => EntityKind::Alias,
            Entity::Enum(e) if e.is_bitfield() => EntityKind::Bitfield,
            Entity::Enum(_) => EntityKind::Enumeration,
            Entity::Callback(_) => EntityKind::Callback,
            Entity::Record(_) => EntityKind::Record,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Alias(e) => &e.name,
            Entity::Enum(e) => &e.name,
            Entity::Callback(e) => &e.name,
            Entity::Record(e) => &e.name,
        }
    }
}

/// Declared entities of one namespace, keyed by unqualified name.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Namespace whose qualifier is stripped on lookup.
    namespace: String,

    aliases: FxHashMap<String, AliasEntry>,

    /// Enumerations and bitfields.
    enums: FxHashMap<String, EnumEntry>,

    callbacks: FxHashMap<String, CallbackEntry>,

    /// Records, classes, interfaces and unions.
    records: FxHashMap<String, RecordEntry>,

    /// Which map claims each name.
    kinds: FxHashMap<String, EntityKind>,
}

impl TypeRegistry {
    /// Create an empty registry for a namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            aliases: FxHashMap::default(),
            enums: FxHashMap::default(),
            callbacks: FxHashMap::default(),
            records: FxHashMap::default(),
            kinds: FxHashMap::default(),
        }
    }

    /// Create a registry populated from a namespace model.
    pub fn from_namespace(model: &NamespaceModel) -> Result<Self, RegistrationError> {
        if model.name.is_empty() {
            return Err(RegistrationError::MissingNamespaceName);
        }
        let mut registry = Self::new(model.name.clone());
        registry.register(model)?;
        Ok(registry)
    }

    /// Register every alias, enumeration, bitfield, callback and record of
    /// `model`.
    ///
    /// Stops at the first duplicate or unnamed entity.
    pub fn register(&mut self, model: &NamespaceModel) -> Result<(), RegistrationError> {
        for alias in &model.aliases {
            self.register_alias(alias.clone())?;
        }
        for entry in model.enumerations.iter().chain(model.bitfields.iter()) {
            self.register_enum(entry.clone())?;
        }
        for callback in &model.callbacks {
            self.register_callback(callback.clone())?;
        }
        for record in &model.records {
            self.register_record(record.clone())?;
        }

        tracing::debug!(
            namespace = %self.namespace,
            entities = self.kinds.len(),
            "registry populated"
        );
        Ok(())
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    pub fn register_alias(&mut self, entry: AliasEntry) -> Result<(), RegistrationError> {
        self.claim(&entry.name, EntityKind::Alias)?;
        self.aliases.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Register an enumeration or a bitfield.
    pub fn register_enum(&mut self, entry: EnumEntry) -> Result<(), RegistrationError> {
        let kind = if entry.is_bitfield() {
            EntityKind::Bitfield
        } else {
            EntityKind::Enumeration
        };
        self.claim(&entry.name, kind)?;
        self.enums.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn register_callback(&mut self, entry: CallbackEntry) -> Result<(), RegistrationError> {
        self.claim(&entry.name, EntityKind::Callback)?;
        self.callbacks.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn register_record(&mut self, entry: RecordEntry) -> Result<(), RegistrationError> {
        self.claim(&entry.name, EntityKind::Record)?;
        if !entry.introspectable {
            tracing::debug!(record = %entry.name, "registered non-introspectable record");
        }
        self.records.insert(entry.name.clone(), entry);
        Ok(())
    }

    fn claim(&mut self, name: &str, kind: EntityKind) -> Result<(), RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::UnnamedEntity {
                namespace: self.namespace.clone(),
                kind: kind.name(),
            });
        }
        if self.kinds.contains_key(name) {
            return Err(RegistrationError::DuplicateEntity {
                namespace: self.namespace.clone(),
                name: name.to_string(),
                kind: kind.name(),
            });
        }
        self.kinds.insert(name.to_string(), kind);
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Namespace this registry was populated for.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Check whether a name refers into this registry's namespace.
    pub fn owns(&self, name: &TypeName) -> bool {
        name.is_in(&self.namespace)
    }

    /// Drop this namespace's qualifier from a name; foreign names are kept.
    pub fn localize(&self, name: &TypeName) -> TypeName {
        name.localized(&self.namespace)
    }

    /// Namespace-aware lookup.
    ///
    /// Returns `None` for unknown names and for names of other namespaces.
    pub fn lookup(&self, name: &TypeName) -> Option<Entity<'_>> {
        if !self.owns(name) {
            return None;
        }
        self.lookup_local(name.local_name())
    }

    /// Lookup by a possibly dotted name string.
    pub fn lookup_str(&self, name: &str) -> Option<Entity<'_>> {
        self.lookup(&TypeName::parse(name))
    }

    /// Lookup by unqualified name.
    pub fn lookup_local(&self, name: &str) -> Option<Entity<'_>> {
        match self.kinds.get(name)? {
            EntityKind::Alias => self.aliases.get(name).map(Entity::Alias),
            EntityKind::Enumeration | EntityKind::Bitfield => {
                self.enums.get(name).map(Entity::Enum)
            }
            EntityKind::Callback => self.callbacks.get(name).map(Entity::Callback),
            EntityKind::Record => self.records.get(name).map(Entity::Record),
        }
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.lookup(name).is_some()
    }

    pub fn get_alias(&self, name: &str) -> Option<&AliasEntry> {
        self.aliases.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumEntry> {
        self.enums.get(name)
    }

    pub fn get_callback(&self, name: &str) -> Option<&CallbackEntry> {
        self.callbacks.get(name)
    }

    pub fn get_record(&self, name: &str) -> Option<&RecordEntry> {
        self.records.get(name)
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    pub fn aliases(&self) -> impl Iterator<Item = &AliasEntry> {
        self.aliases.values()
    }

    /// Enumerations and bitfields.
    pub fn enums(&self) -> impl Iterator<Item = &EnumEntry> {
        self.enums.values()
    }

    pub fn callbacks(&self) -> impl Iterator<Item = &CallbackEntry> {
        self.callbacks.values()
    }

    pub fn records(&self) -> impl Iterator<Item = &RecordEntry> {
        self.records.values()
    }

    /// Number of registered entities of all kinds.
    pub fn entity_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
