//! Struct-backed entities: records, classes, interfaces and unions.

use crate::TypeName;

use super::CallableEntry;

/// Which GIR element declared a struct-backed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Record,
    Class,
    Interface,
    Union,
}

/// A struct-backed entity; values cross the boundary as pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// Unqualified name.
    pub name: String,
    /// Declared C type.
    pub c_type: Option<String>,
    /// Declaring element.
    pub kind: RecordKind,
    /// Parent class, for classes.
    pub parent: Option<TypeName>,
    /// `false` when marked `introspectable="0"`.
    pub introspectable: bool,
    pub constructors: Vec<CallableEntry>,
    pub methods: Vec<CallableEntry>,
    /// Static functions.
    pub functions: Vec<CallableEntry>,
}

impl RecordEntry {
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            name: name.into(),
            c_type: None,
            kind,
            parent: None,
            introspectable: true,
            constructors: Vec::new(),
            methods: Vec::new(),
            functions: Vec::new(),
        }
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self::new(name, RecordKind::Record)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, RecordKind::Class)
    }

    pub fn with_parent(mut self, parent: impl Into<TypeName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_c_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }

    pub fn non_introspectable(mut self) -> Self {
        self.introspectable = false;
        self
    }

    /// Add a constructor; its owner is set to this record.
    pub fn with_constructor(mut self, ctor: CallableEntry) -> Self {
        let owner = self.name.clone();
        self.constructors.push(ctor.owned_by(owner));
        self
    }

    /// Add a method; its owner is set to this record.
    pub fn with_method(mut self, method: CallableEntry) -> Self {
        let owner = self.name.clone();
        self.methods.push(method.owned_by(owner));
        self
    }

    /// Add a static function; its owner is set to this record.
    pub fn with_function(mut self, function: CallableEntry) -> Self {
        let owner = self.name.clone();
        self.functions.push(function.owned_by(owner));
        self
    }

    /// All callables: constructors, then methods, then static functions.
    pub fn callables(&self) -> impl Iterator<Item = &CallableEntry> {
        self.constructors
            .iter()
            .chain(self.methods.iter())
            .chain(self.functions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parameter;

    #[test]
    fn members_are_owned() {
        let record = RecordEntry::record("Rand")
            .with_constructor(CallableEntry::constructor("new", "g_rand_new"))
            .with_method(CallableEntry::method(
                "int",
                "g_rand_int",
                Parameter::scalar("rand_", "Rand"),
            ));

        let owners: Vec<_> = record
            .callables()
            .map(|c| c.owner.as_deref())
            .collect();
        assert_eq!(owners, vec![Some("Rand"), Some("Rand")]);
    }

    #[test]
    fn callable_order() {
        let record = RecordEntry::class("Object")
            .with_function(CallableEntry::function("interface_list", "g_object_interface_list"))
            .with_method(CallableEntry::method(
                "ref",
                "g_object_ref",
                Parameter::scalar("object", "Object"),
            ))
            .with_constructor(CallableEntry::constructor("new", "g_object_new"));

        let names: Vec<_> = record.callables().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["new", "ref", "interface_list"]);
    }
}
