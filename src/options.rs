//! Options of a namespace binding run.

use girffi_core::Platform;
use girffi_marshal::IdentifierPolicy;

/// Configuration of a [`NamespaceBinder`](crate::NamespaceBinder).
///
/// # Example
///
/// ```
/// use girffi::BindingOptions;
/// use girffi_core::Platform;
///
/// let options = BindingOptions::new()
///     .with_platform(Platform::lp64())
///     .include_non_introspectable(true)
///     .with_reserved_words(["end", "begin"]);
/// assert!(options.include_non_introspectable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOptions {
    /// Widths of platform dependent integer keywords.
    pub platform: Platform,
    /// Bind entities marked `introspectable="0"` instead of skipping them.
    pub include_non_introspectable: bool,
    /// Extra words rewritten in parameter identifiers, on top of the Rust
    /// keywords.
    pub reserved_words: Vec<String>,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            platform: Platform::REFERENCE,
            include_non_introspectable: false,
            reserved_words: Vec::new(),
        }
    }
}

impl BindingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn include_non_introspectable(mut self, include: bool) -> Self {
        self.include_non_introspectable = include;
        self
    }

    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Identifier policy: Rust keywords plus the configured words.
    pub fn identifier_policy(&self) -> IdentifierPolicy {
        IdentifierPolicy::default().with_reserved(self.reserved_words.iter().map(String::as_str))
    }
}
