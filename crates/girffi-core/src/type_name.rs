use std::fmt;

/// Type reference as written in an introspection repository.
///
/// GIR references entities of other namespaces with a dotted prefix
/// (`GLib.Variant`); references inside the declaring namespace are usually
/// unqualified but may carry the namespace's own prefix as well.
///
/// # Examples
///
/// ```
/// use girffi_core::TypeName;
///
/// let local = TypeName::local("Variant");
/// assert_eq!(local.to_string(), "Variant");
///
/// let foreign = TypeName::parse("GObject.Object");
/// assert_eq!(foreign.namespace(), Some("GObject"));
/// assert_eq!(foreign.local_name(), "Object");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Unqualified name (e.g., "Variant", "gint")
    pub name: String,
    /// Namespace prefix, `None` when written unqualified
    pub namespace: Option<String>,
}

impl TypeName {
    /// Create a name qualified with a namespace.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Create an unqualified name.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Parse a possibly dotted name.
    ///
    /// The last segment is the name, everything before the last `.` is the
    /// namespace. An empty prefix (".Name") is treated as unqualified.
    pub fn parse(s: &str) -> Self {
        match s.rsplit_once('.') {
            Some((ns, name)) if !ns.is_empty() => Self::new(name, ns),
            Some((_, name)) => Self::local(name),
            None => Self::local(s),
        }
    }

    /// Check whether the name carries a namespace prefix.
    pub fn is_qualified(&self) -> bool {
        self.namespace.is_some()
    }

    /// Get the unqualified name.
    pub fn local_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace prefix, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Check whether this name refers into `namespace`.
    ///
    /// Unqualified names always refer to the namespace they appear in.
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref().is_none_or(|ns| ns == namespace)
    }

    /// Drop the qualifier if it names `namespace`; foreign names are kept.
    pub fn localized(&self, namespace: &str) -> Self {
        if self.is_in(namespace) {
            Self::local(self.name.clone())
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name() {
        let name = TypeName::local("Variant");
        assert_eq!(name.name, "Variant");
        assert!(!name.is_qualified());
        assert_eq!(name.to_string(), "Variant");
    }

    #[test]
    fn qualified_name() {
        let name = TypeName::new("Object", "GObject");
        assert_eq!(name.local_name(), "Object");
        assert_eq!(name.namespace(), Some("GObject"));
        assert_eq!(name.to_string(), "GObject.Object");
    }

    #[test]
    fn parse_dotted() {
        let name = TypeName::parse("GLib.Variant");
        assert_eq!(name, TypeName::new("Variant", "GLib"));

        let plain = TypeName::parse("gint");
        assert_eq!(plain, TypeName::local("gint"));

        let leading = TypeName::parse(".Variant");
        assert_eq!(leading, TypeName::local("Variant"));
    }

    #[test]
    fn membership() {
        assert!(TypeName::local("Variant").is_in("GLib"));
        assert!(TypeName::parse("GLib.Variant").is_in("GLib"));
        assert!(!TypeName::parse("Gio.File").is_in("GLib"));
    }

    #[test]
    fn localized_strips_own_namespace_only() {
        let own = TypeName::parse("GLib.Variant").localized("GLib");
        assert_eq!(own.to_string(), "Variant");

        let foreign = TypeName::parse("Gio.File").localized("GLib");
        assert_eq!(foreign.to_string(), "Gio.File");
    }
}
