//! Error types for the mapping engine.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GirError (top-level wrapper)
//! ├── RegistrationError - Registry population errors (fatal for a namespace)
//! ├── MarshalError      - Plan construction and value conversion errors
//! └── SignatureError    - ABI signature construction errors
//! ```
//!
//! Marshal and signature errors concern a single callable; the namespace
//! pipeline reports them and carries on with the next callable.

use thiserror::Error;

use crate::AbiSlot;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating a type registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The namespace record has no name.
    #[error("namespace has no name")]
    MissingNamespaceName,

    /// Two entities of the namespace share a name.
    #[error("duplicate {kind} '{name}' in namespace {namespace}")]
    DuplicateEntity {
        namespace: String,
        name: String,
        kind: &'static str,
    },

    /// An entity was declared without a name.
    #[error("unnamed {kind} in namespace {namespace}")]
    UnnamedEntity {
        namespace: String,
        kind: &'static str,
    },
}

// ============================================================================
// Marshal Errors
// ============================================================================

/// Errors raised while planning or performing a conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarshalError {
    /// A parameter or return value has neither a type nor an array descriptor.
    #[error("{item} has no type descriptor")]
    MissingTypeDescriptor { item: String },

    /// The value shape has no real conversion.
    #[error("unsupported marshalling of {what}: {reason}")]
    Unsupported { what: String, reason: &'static str },

    /// The host value kind does not fit the conversion.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// An integer does not fit the target slot.
    #[error("integer overflow: {value} does not fit in {target}")]
    IntegerOverflow { value: i64, target: AbiSlot },

    /// Null passed where the declaration does not allow it.
    #[error("null passed for non-nullable {item}")]
    UnexpectedNull { item: String },

    /// A host string contains a NUL byte and cannot become a C string.
    #[error("string contains an interior NUL byte at position {position}")]
    InteriorNul { position: usize },

    /// Native string bytes are not valid UTF-8.
    #[error("invalid UTF-8 in native string: {detail}")]
    InvalidUtf8 { detail: String },

    /// An array received a different number of elements than its fixed
    /// size or its length argument.
    #[error("array length mismatch: expected {expected} elements, got {actual}")]
    ArrayLengthMismatch { expected: usize, actual: usize },

    /// An element of a zero-terminated array equals the terminator.
    #[error("element {index} of a zero-terminated array is zero")]
    TerminatorInArray { index: usize },

    /// The length of a returned array could not be determined.
    #[error("length of array is held by parameter {index}, which is unavailable")]
    ArrayLengthUnavailable { index: usize },

    /// Wrong number of host arguments for a callable.
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// The native call reported a `GError`.
    #[error("native error (domain {domain}, code {code}): {message}")]
    Native {
        domain: u32,
        code: i32,
        message: String,
    },
}

// ============================================================================
// Signature Errors
// ============================================================================

/// Errors raised while building an ABI signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A parameter or return value has neither a type nor an array descriptor.
    #[error("{callable}: {item} has no type descriptor")]
    MissingTypeDescriptor { callable: String, item: String },

    /// A non-callback callable has no native symbol.
    #[error("{callable} has no linkage identifier")]
    MissingLinkage { callable: String },
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Any error of the mapping engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GirError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl GirError {
    /// Whether the error aborts a whole namespace run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GirError::Registration(_))
    }
}
