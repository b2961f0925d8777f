//! Enumeration and bitfield entries.

/// Whether an enum-like entity is a plain enumeration or a set of flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Enumeration,
    Bitfield,
}

/// A named member of an enumeration or bitfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Integer value.
    pub value: i64,
    /// C identifier of the member constant.
    pub c_identifier: Option<String>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            c_identifier: None,
        }
    }
}

/// Registry entry for an enumeration or bitfield.
///
/// Whatever the member range, the native representation of both kinds is a
/// 32-bit signed integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    /// Unqualified name.
    pub name: String,
    /// Declared C type.
    pub c_type: Option<String>,
    /// Enumeration or bitfield.
    pub kind: EnumKind,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
    /// Error domain, for enumerations used as `GError` codes.
    pub error_domain: Option<String>,
}

impl EnumEntry {
    /// Create an empty enumeration.
    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, EnumKind::Enumeration)
    }

    /// Create an empty bitfield.
    pub fn bitfield(name: impl Into<String>) -> Self {
        Self::new(name, EnumKind::Bitfield)
    }

    fn new(name: impl Into<String>, kind: EnumKind) -> Self {
        Self {
            name: name.into(),
            c_type: None,
            kind,
            members: Vec::new(),
            error_domain: None,
        }
    }

    /// Add a member.
    pub fn with_value(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumMember::new(name, value));
        self
    }

    /// Add multiple members.
    pub fn with_values(mut self, values: impl IntoIterator<Item = (String, i64)>) -> Self {
        for (name, value) in values {
            self.members.push(EnumMember::new(name, value));
        }
        self
    }

    pub fn with_c_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }

    pub fn with_error_domain(mut self, domain: impl Into<String>) -> Self {
        self.error_domain = Some(domain.into());
        self
    }

    pub fn is_bitfield(&self) -> bool {
        self.kind == EnumKind::Bitfield
    }

    /// Look up a value by member name.
    pub fn get_value(&self, name: &str) -> Option<i64> {
        self.members.iter().find(|m| m.name == name).map(|m| m.value)
    }

    /// Look up a member name by value.
    pub fn get_name(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.value == value)
            .map(|m| m.name.as_str())
    }
}
