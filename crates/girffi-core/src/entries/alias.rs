use crate::TypeName;

/// Alias (typedef) of another type.
///
/// Resolution is transitive: an alias of an alias of an enumeration ends at
/// the enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Unqualified name.
    pub name: String,
    /// Declared C type.
    pub c_type: Option<String>,
    /// The aliased type.
    pub target: TypeName,
}

impl AliasEntry {
    pub fn new(name: impl Into<String>, target: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            c_type: None,
            target: target.into(),
        }
    }

    pub fn with_c_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }
}
