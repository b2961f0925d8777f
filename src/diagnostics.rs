use std::fmt;

/// A single message produced while binding a namespace.
///
/// Per-callable failures, duplicate linkage identifiers and skipped
/// entities are reported here instead of aborting the run.
///
/// # Examples
///
/// ```rust
/// use girffi::{Diagnostic, DiagnosticKind};
///
/// let diagnostic = Diagnostic {
///     kind: DiagnosticKind::Warning,
///     message: "duplicate linkage identifier 'g_free'".to_string(),
///     entity: Some("free".to_string()),
/// };
///
/// assert_eq!(
///     diagnostic.to_string(),
///     "free: warning: duplicate linkage identifier 'g_free'"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity level of this diagnostic
    pub kind: DiagnosticKind,
    /// The diagnostic message text
    pub message: String,
    /// Display name of the entity concerned, if any
    pub entity: Option<String>,
}

/// The severity level of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A callable or callback could not be bound and was skipped.
    Error,

    /// The binding succeeded but the input is suspicious, such as a
    /// linkage identifier bound twice.
    Warning,

    /// Informational message, such as a skipped non-introspectable entity.
    Info,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Error => write!(f, "error"),
            DiagnosticKind::Warning => write!(f, "warning"),
            DiagnosticKind::Info => write!(f, "info"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "{}: {}: {}", entity, self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Messages collected during one namespace run, in the order reported.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a diagnostic to the collection.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind == DiagnosticKind::Error {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, entity: Option<String>) {
        self.add(DiagnosticKind::Error, message.into(), entity);
    }

    pub fn warning(&mut self, message: impl Into<String>, entity: Option<String>) {
        self.add(DiagnosticKind::Warning, message.into(), entity);
    }

    pub fn info(&mut self, message: impl Into<String>, entity: Option<String>) {
        self.add(DiagnosticKind::Info, message.into(), entity);
    }

    fn add(&mut self, kind: DiagnosticKind, message: String, entity: Option<String>) {
        self.add_diagnostic(Diagnostic {
            kind,
            message,
            entity,
        });
    }

    /// Returns `true` if the collection contains any error diagnostics.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.has_errors = false;
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    /// Returns the total number of diagnostics in the collection.
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
