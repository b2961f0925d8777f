//! Host-side types of marshalled values.

use std::fmt;

use girffi_core::TypeName;

/// Type a binding exposes for a parameter or return value.
///
/// Names qualified with the bound namespace are stored unqualified;
/// foreign names keep their namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostType {
    Void,
    Boolean,
    Integer,
    Float,
    String,
    /// Untyped native pointer.
    Pointer,
    /// Enumeration or bitfield, carried as an integer.
    Enum(TypeName),
    /// Opaque handle of a record, object or container.
    Handle(TypeName),
    /// Callback type.
    Callback(TypeName),
    Array(Box<HostType>),
}

impl HostType {
    pub fn array_of(element: HostType) -> Self {
        HostType::Array(Box::new(element))
    }

    /// Name of the referenced entity, if any.
    pub fn entity_name(&self) -> Option<&TypeName> {
        match self {
            HostType::Enum(name) | HostType::Handle(name) | HostType::Callback(name) => Some(name),
            HostType::Array(element) => element.entity_name(),
            _ => None,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Void => write!(f, "void"),
            HostType::Boolean => write!(f, "bool"),
            HostType::Integer => write!(f, "int"),
            HostType::Float => write!(f, "float"),
            HostType::String => write!(f, "string"),
            HostType::Pointer => write!(f, "pointer"),
            HostType::Enum(name) | HostType::Handle(name) | HostType::Callback(name) => {
                write!(f, "{name}")
            }
            HostType::Array(element) => write!(f, "[{element}]"),
        }
    }
}
