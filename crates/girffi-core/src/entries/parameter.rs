//! Parameter and return value descriptors.

use bitflags::bitflags;

use crate::{ArraySpec, TypeShape};

/// Name GIR gives to the variadic `...` parameter.
pub const VARIADIC_MARKER: &str = "...";

/// Ownership transfer of a pointer-valued parameter or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transfer {
    /// Callee/caller keeps ownership.
    #[default]
    None,
    /// Container ownership moves, elements stay.
    Container,
    /// Ownership of the value and its contents moves.
    Full,
}

impl Transfer {
    /// Parse a `transfer-ownership` attribute value.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Transfer::None),
            "container" => Some(Transfer::Container),
            "full" => Some(Transfer::Full),
            _ => None,
        }
    }
}

/// Data flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    /// Parse a `direction` attribute value.
    pub fn from_attribute(value: &str) -> Option<Self> {
        match value {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "inout" => Some(Direction::InOut),
            _ => None,
        }
    }

    /// Passed by reference through a caller-owned cell.
    pub fn is_by_reference(self) -> bool {
        !matches!(self, Direction::In)
    }
}

bitflags! {
    /// Parameter attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        /// Null is an accepted value (`nullable` / `allow-none`).
        const NULLABLE = 1 << 0;
        /// Out parameter that may be passed as null.
        const OPTIONAL = 1 << 1;
        /// Out parameter whose storage the caller allocates.
        const CALLER_ALLOCATES = 1 << 2;
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Name as declared.
    pub name: String,
    /// Declared type, `None` when the descriptor is missing.
    pub shape: Option<TypeShape>,
    /// Ownership transfer.
    pub transfer: Transfer,
    /// Data flow direction.
    pub direction: Direction,
    /// Attribute flags.
    pub flags: ParamFlags,
}

impl Parameter {
    pub fn new(name: impl Into<String>, shape: Option<TypeShape>) -> Self {
        Self {
            name: name.into(),
            shape,
            transfer: Transfer::None,
            direction: Direction::In,
            flags: ParamFlags::empty(),
        }
    }

    /// Parameter of a named type.
    pub fn scalar(name: impl Into<String>, type_name: &str) -> Self {
        Self::new(name, Some(TypeShape::scalar(type_name)))
    }

    /// Parameter of an array type.
    pub fn array(name: impl Into<String>, spec: ArraySpec) -> Self {
        Self::new(name, Some(TypeShape::Array(spec)))
    }

    /// The variadic `...` marker.
    pub fn variadic() -> Self {
        Self::new(VARIADIC_MARKER, None)
    }

    pub fn nullable(mut self) -> Self {
        self.flags |= ParamFlags::NULLABLE;
        self
    }

    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_variadic(&self) -> bool {
        self.name == VARIADIC_MARKER
    }

    pub fn is_nullable(&self) -> bool {
        self.flags.contains(ParamFlags::NULLABLE)
    }
}

/// A declared return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnValue {
    /// Declared type, `None` when the descriptor is missing.
    pub shape: Option<TypeShape>,
    /// Ownership transfer to the caller.
    pub transfer: Transfer,
    /// Null may be returned.
    pub nullable: bool,
}

impl ReturnValue {
    pub fn new(shape: Option<TypeShape>) -> Self {
        Self {
            shape,
            transfer: Transfer::None,
            nullable: false,
        }
    }

    /// No return value (`none`).
    pub fn none() -> Self {
        Self::scalar("none")
    }

    pub fn scalar(type_name: &str) -> Self {
        Self::new(Some(TypeShape::scalar(type_name)))
    }

    pub fn array(spec: ArraySpec) -> Self {
        Self::new(Some(TypeShape::Array(spec)))
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfer = transfer;
        self
    }
}

impl Default for ReturnValue {
    fn default() -> Self {
        Self::none()
    }
}
