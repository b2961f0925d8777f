//! Basic type keywords of the introspected C type system.

use std::fmt;

/// Scalar keywords understood without consulting the type registry.
///
/// These are the GLib fundamental types as spelled in GIR `name` attributes.
/// `void` and `none` both denote the absence of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicType {
    Boolean,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Size,
    SSize,
    Offset,
    IntPtr,
    UIntPtr,
    Unichar,
    Unichar2,
    GType,
    Float,
    Double,
    Pointer,
    ConstPointer,
    Utf8,
    Filename,
    Void,
}

impl BasicType {
    /// Every keyword spelling, including the `void`/`none` synonyms.
    pub const KEYWORDS: &'static [(&'static str, BasicType)] = &[
        ("gboolean", BasicType::Boolean),
        ("gint8", BasicType::Int8),
        ("guint8", BasicType::UInt8),
        ("gint16", BasicType::Int16),
        ("guint16", BasicType::UInt16),
        ("gint32", BasicType::Int32),
        ("guint32", BasicType::UInt32),
        ("gint64", BasicType::Int64),
        ("guint64", BasicType::UInt64),
        ("gchar", BasicType::Char),
        ("guchar", BasicType::UChar),
        ("gshort", BasicType::Short),
        ("gushort", BasicType::UShort),
        ("gint", BasicType::Int),
        ("guint", BasicType::UInt),
        ("glong", BasicType::Long),
        ("gulong", BasicType::ULong),
        ("gsize", BasicType::Size),
        ("gssize", BasicType::SSize),
        ("goffset", BasicType::Offset),
        ("gintptr", BasicType::IntPtr),
        ("guintptr", BasicType::UIntPtr),
        ("gunichar", BasicType::Unichar),
        ("gunichar2", BasicType::Unichar2),
        ("GType", BasicType::GType),
        ("gfloat", BasicType::Float),
        ("gdouble", BasicType::Double),
        ("gpointer", BasicType::Pointer),
        ("gconstpointer", BasicType::ConstPointer),
        ("utf8", BasicType::Utf8),
        ("filename", BasicType::Filename),
        ("void", BasicType::Void),
        ("none", BasicType::Void),
    ];

    /// Look up a keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::KEYWORDS
            .iter()
            .find(|(k, _)| *k == keyword)
            .map(|(_, ty)| *ty)
    }

    /// Canonical keyword spelling.
    pub const fn keyword(self) -> &'static str {
        match self {
            BasicType::Boolean => "gboolean",
            BasicType::Int8 => "gint8",
            BasicType::UInt8 => "guint8",
            BasicType::Int16 => "gint16",
            BasicType::UInt16 => "guint16",
            BasicType::Int32 => "gint32",
            BasicType::UInt32 => "guint32",
            BasicType::Int64 => "gint64",
            BasicType::UInt64 => "guint64",
            BasicType::Char => "gchar",
            BasicType::UChar => "guchar",
            BasicType::Short => "gshort",
            BasicType::UShort => "gushort",
            BasicType::Int => "gint",
            BasicType::UInt => "guint",
            BasicType::Long => "glong",
            BasicType::ULong => "gulong",
            BasicType::Size => "gsize",
            BasicType::SSize => "gssize",
            BasicType::Offset => "goffset",
            BasicType::IntPtr => "gintptr",
            BasicType::UIntPtr => "guintptr",
            BasicType::Unichar => "gunichar",
            BasicType::Unichar2 => "gunichar2",
            BasicType::GType => "GType",
            BasicType::Float => "gfloat",
            BasicType::Double => "gdouble",
            BasicType::Pointer => "gpointer",
            BasicType::ConstPointer => "gconstpointer",
            BasicType::Utf8 => "utf8",
            BasicType::Filename => "filename",
            BasicType::Void => "none",
        }
    }

    /// UTF-8 or filename string.
    pub const fn is_string(self) -> bool {
        matches!(self, BasicType::Utf8 | BasicType::Filename)
    }

    /// Untyped pointer (`gpointer`/`gconstpointer`).
    pub const fn is_pointer(self) -> bool {
        matches!(self, BasicType::Pointer | BasicType::ConstPointer)
    }

    pub const fn is_void(self) -> bool {
        matches!(self, BasicType::Void)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, BasicType::Float | BasicType::Double)
    }

    /// Integer-valued keyword (booleans excluded).
    pub const fn is_integer(self) -> bool {
        !self.is_string()
            && !self.is_pointer()
            && !self.is_void()
            && !self.is_float()
            && !matches!(self, BasicType::Boolean)
    }
}

impl fmt::Display for BasicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}
