//! Native calling-convention slots and platform widths.

use std::fmt;

/// Terminal native representation of a value crossing the FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbiSlot {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Pointer,
    Void,
}

impl AbiSlot {
    /// Get the name of this slot as used in signature tables.
    pub const fn name(self) -> &'static str {
        match self {
            AbiSlot::I8 => "i8",
            AbiSlot::U8 => "u8",
            AbiSlot::I16 => "i16",
            AbiSlot::U16 => "u16",
            AbiSlot::I32 => "i32",
            AbiSlot::U32 => "u32",
            AbiSlot::I64 => "i64",
            AbiSlot::U64 => "u64",
            AbiSlot::F32 => "f32",
            AbiSlot::F64 => "f64",
            AbiSlot::Pointer => "pointer",
            AbiSlot::Void => "void",
        }
    }

    /// Size in bytes of a value in this slot on the running host.
    pub const fn size(self) -> usize {
        match self {
            AbiSlot::I8 | AbiSlot::U8 => 1,
            AbiSlot::I16 | AbiSlot::U16 => 2,
            AbiSlot::I32 | AbiSlot::U32 | AbiSlot::F32 => 4,
            AbiSlot::I64 | AbiSlot::U64 | AbiSlot::F64 => 8,
            AbiSlot::Pointer => size_of::<*const ()>(),
            AbiSlot::Void => 0,
        }
    }

    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            AbiSlot::I8
                | AbiSlot::U8
                | AbiSlot::I16
                | AbiSlot::U16
                | AbiSlot::I32
                | AbiSlot::U32
                | AbiSlot::I64
                | AbiSlot::U64
        )
    }

    /// Signed integer slot.
    pub const fn is_signed(self) -> bool {
        matches!(self, AbiSlot::I8 | AbiSlot::I16 | AbiSlot::I32 | AbiSlot::I64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, AbiSlot::F32 | AbiSlot::F64)
    }

    /// Integer or float slot.
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }
}

impl fmt::Display for AbiSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Width of a platform-dependent integer keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W32,
    W64,
}

impl IntWidth {
    pub const fn signed(self) -> AbiSlot {
        match self {
            IntWidth::W32 => AbiSlot::I32,
            IntWidth::W64 => AbiSlot::I64,
        }
    }

    pub const fn unsigned(self) -> AbiSlot {
        match self {
            IntWidth::W32 => AbiSlot::U32,
            IntWidth::W64 => AbiSlot::U64,
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }
}

/// Widths of the keywords whose size depends on the target platform.
///
/// [`Platform::REFERENCE`] keeps `glong`/`gulong` and `gsize`/`gssize` at
/// 32 bits. That matches the reference binding target but is wrong for LP64
/// systems, where both are pointer-sized; use [`Platform::lp64`] there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    /// `glong` / `gulong`
    pub long_width: IntWidth,
    /// `gsize` / `gssize` / `GType`
    pub size_width: IntWidth,
    /// `gintptr` / `guintptr`
    pub pointer_width: IntWidth,
}

impl Platform {
    /// Reference binding target: 32-bit longs and sizes, 64-bit pointers.
    pub const REFERENCE: Platform = Platform {
        long_width: IntWidth::W32,
        size_width: IntWidth::W32,
        pointer_width: IntWidth::W64,
    };

    /// 64-bit Unix (LP64).
    pub const fn lp64() -> Self {
        Platform {
            long_width: IntWidth::W64,
            size_width: IntWidth::W64,
            pointer_width: IntWidth::W64,
        }
    }

    /// 64-bit Windows (LLP64).
    pub const fn llp64() -> Self {
        Platform {
            long_width: IntWidth::W32,
            size_width: IntWidth::W64,
            pointer_width: IntWidth::W64,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_names() {
        assert_eq!(AbiSlot::I32.to_string(), "i32");
        assert_eq!(AbiSlot::Pointer.to_string(), "pointer");
        assert_eq!(AbiSlot::Void.to_string(), "void");
    }

    #[test]
    fn slot_categories() {
        assert!(AbiSlot::U8.is_integer());
        assert!(!AbiSlot::U8.is_signed());
        assert!(AbiSlot::F64.is_float());
        assert!(AbiSlot::F32.is_numeric());
        assert!(!AbiSlot::Pointer.is_numeric());
        assert!(!AbiSlot::Void.is_numeric());
    }

    #[test]
    fn slot_sizes() {
        assert_eq!(AbiSlot::I16.size(), 2);
        assert_eq!(AbiSlot::F32.size(), 4);
        assert_eq!(AbiSlot::U64.size(), 8);
        assert_eq!(AbiSlot::Pointer.size(), size_of::<usize>());
    }

    #[test]
    fn default_platform_is_reference() {
        let platform = Platform::default();
        assert_eq!(platform.long_width.signed(), AbiSlot::I32);
        assert_eq!(platform.size_width.unsigned(), AbiSlot::U32);
        assert_eq!(Platform::lp64().long_width.bits(), 64);
    }
}
