//! Sanitizing of declared parameter names into host identifiers.

use rustc_hash::FxHashSet;

/// Strict and reserved keywords of Rust 2024.
pub const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Reserved words and the rewriting applied to clashing names.
#[derive(Debug, Clone)]
pub struct IdentifierPolicy {
    reserved: FxHashSet<String>,
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self::new(RUST_KEYWORDS.iter().copied())
    }
}

impl IdentifierPolicy {
    pub fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            reserved: reserved.into_iter().map(str::to_string).collect(),
        }
    }

    /// Add reserved words on top of the current ones.
    pub fn with_reserved<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.reserved.extend(words.into_iter().map(str::to_string));
        self
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// Turn a declared name into a usable identifier.
    ///
    /// `-` becomes `_`; reserved words, names starting with a digit and empty
    /// names get a leading `_`.
    pub fn sanitize(&self, name: &str) -> String {
        let name = name.replace('-', "_");
        let needs_prefix = name.is_empty()
            || name.starts_with(|c: char| c.is_ascii_digit())
            || self.is_reserved(&name);
        if needs_prefix {
            format!("_{name}")
        } else {
            name
        }
    }
}
