//! Declared type shapes of parameters, return values and fields.

use crate::TypeName;

/// How the number of elements of a C array is known.
///
/// Exactly one policy applies to an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLength {
    /// Length is carried by the declared parameter at this index.
    Param(usize),
    /// Length is a compile-time constant.
    Fixed(usize),
    /// Array ends at the first zero element.
    ZeroTerminated,
    /// Nothing is known; the array is handled as an opaque pointer.
    Unknown,
}

impl ArrayLength {
    /// Build the policy from the GIR attributes `length`, `fixed-size` and
    /// `zero-terminated`.
    ///
    /// An explicit length wins over a fixed size, which wins over zero
    /// termination.
    pub fn from_attributes(
        length: Option<usize>,
        fixed_size: Option<usize>,
        zero_terminated: bool,
    ) -> Self {
        match (length, fixed_size) {
            (Some(index), _) => ArrayLength::Param(index),
            (None, Some(n)) => ArrayLength::Fixed(n),
            (None, None) if zero_terminated => ArrayLength::ZeroTerminated,
            (None, None) => ArrayLength::Unknown,
        }
    }

    pub fn is_zero_terminated(self) -> bool {
        matches!(self, ArrayLength::ZeroTerminated)
    }
}

/// An array type: element type plus termination policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArraySpec {
    /// Element type reference.
    pub element: TypeName,
    /// Termination policy.
    pub length: ArrayLength,
    /// Boxed container type (`GLib.Array`, `GLib.PtrArray`, `GLib.ByteArray`).
    ///
    /// `None` for plain C arrays.
    pub container: Option<TypeName>,
    /// Declared C type, if present.
    pub c_type: Option<String>,
}

impl ArraySpec {
    /// Create a C array with the given policy.
    pub fn new(element: impl Into<TypeName>, length: ArrayLength) -> Self {
        Self {
            element: element.into(),
            length,
            container: None,
            c_type: None,
        }
    }

    pub fn zero_terminated(element: impl Into<TypeName>) -> Self {
        Self::new(element, ArrayLength::ZeroTerminated)
    }

    pub fn with_length_param(element: impl Into<TypeName>, index: usize) -> Self {
        Self::new(element, ArrayLength::Param(index))
    }

    pub fn fixed(element: impl Into<TypeName>, size: usize) -> Self {
        Self::new(element, ArrayLength::Fixed(size))
    }

    pub fn unknown_length(element: impl Into<TypeName>) -> Self {
        Self::new(element, ArrayLength::Unknown)
    }

    /// Mark this array as a boxed container type.
    pub fn in_container(mut self, container: impl Into<TypeName>) -> Self {
        self.container = Some(container.into());
        self
    }

    pub fn with_c_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }
}

/// Declared shape of a value: a named type or an array.
///
/// The loader produces `None` in place of a shape when a parameter carries
/// neither, which the engine reports as a missing type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Scalar(TypeName),
    Array(ArraySpec),
}

impl TypeShape {
    pub fn scalar(name: impl Into<TypeName>) -> Self {
        TypeShape::Scalar(name.into())
    }

    pub fn array(spec: ArraySpec) -> Self {
        TypeShape::Array(spec)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeShape::Array(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_policy_precedence() {
        assert_eq!(
            ArrayLength::from_attributes(Some(1), Some(4), true),
            ArrayLength::Param(1)
        );
        assert_eq!(
            ArrayLength::from_attributes(None, Some(4), true),
            ArrayLength::Fixed(4)
        );
        assert_eq!(
            ArrayLength::from_attributes(None, None, true),
            ArrayLength::ZeroTerminated
        );
        assert_eq!(
            ArrayLength::from_attributes(None, None, false),
            ArrayLength::Unknown
        );
    }

    #[test]
    fn array_builders() {
        let spec = ArraySpec::with_length_param("guint8", 1).with_c_type("const guchar*");
        assert_eq!(spec.element, TypeName::local("guint8"));
        assert_eq!(spec.length, ArrayLength::Param(1));
        assert_eq!(spec.c_type.as_deref(), Some("const guchar*"));
        assert!(spec.container.is_none());

        let boxed = ArraySpec::unknown_length("utf8").in_container("GLib.PtrArray");
        assert_eq!(boxed.container, Some(TypeName::new("PtrArray", "GLib")));
    }

    #[test]
    fn shape_constructors() {
        assert!(TypeShape::array(ArraySpec::zero_terminated("utf8")).is_array());
        assert_eq!(
            TypeShape::scalar("GLib.Variant"),
            TypeShape::Scalar(TypeName::new("Variant", "GLib"))
        );
    }
}
