//! Parsed namespace model handed over by the repository loader.

use crate::{AliasEntry, CallableEntry, CallbackEntry, EnumEntry, RecordEntry};

/// One `<namespace>` of an introspection repository.
///
/// Collections keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceModel {
    /// Namespace name (e.g., "GLib").
    pub name: String,
    /// Namespace version (e.g., "2.0").
    pub version: String,
    /// Shared libraries providing the symbols, in declared order.
    pub shared_libraries: Vec<String>,
    pub aliases: Vec<AliasEntry>,
    pub enumerations: Vec<EnumEntry>,
    pub bitfields: Vec<EnumEntry>,
    pub callbacks: Vec<CallbackEntry>,
    /// Records, classes, interfaces and unions.
    pub records: Vec<RecordEntry>,
    /// Free functions.
    pub functions: Vec<CallableEntry>,
}

impl NamespaceModel {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Set the shared libraries from a GIR `shared-library` attribute.
    ///
    /// The attribute is a comma separated list; blank entries are dropped.
    pub fn with_shared_library(mut self, attribute: &str) -> Self {
        self.shared_libraries = attribute
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn with_alias(mut self, alias: AliasEntry) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Add an enumeration or bitfield, filed by its kind.
    pub fn with_enum(mut self, entry: EnumEntry) -> Self {
        if entry.is_bitfield() {
            self.bitfields.push(entry);
        } else {
            self.enumerations.push(entry);
        }
        self
    }

    pub fn with_callback(mut self, callback: CallbackEntry) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn with_record(mut self, record: RecordEntry) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_function(mut self, function: CallableEntry) -> Self {
        self.functions.push(function);
        self
    }

    /// Library the bindings load symbols from: the first listed one.
    pub fn primary_library(&self) -> Option<&str> {
        self.shared_libraries.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_library_list() {
        let ns = NamespaceModel::new("GLib", "2.0")
            .with_shared_library("libgobject-2.0.so.0, libglib-2.0.so.0,");
        assert_eq!(ns.shared_libraries.len(), 2);
        assert_eq!(ns.primary_library(), Some("libgobject-2.0.so.0"));
    }

    #[test]
    fn no_shared_library() {
        let ns = NamespaceModel::new("Empty", "1.0");
        assert_eq!(ns.primary_library(), None);
    }

    #[test]
    fn enums_filed_by_kind() {
        let ns = NamespaceModel::new("GLib", "2.0")
            .with_enum(EnumEntry::enumeration("Color"))
            .with_enum(EnumEntry::bitfield("IOFlags"));
        assert_eq!(ns.enumerations.len(), 1);
        assert_eq!(ns.bitfields.len(), 1);
    }
}
