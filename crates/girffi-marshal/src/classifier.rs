//! Classification of resolved types into native calling-convention slots.

use girffi_core::{AbiSlot, BasicType, Platform};

use crate::resolver::{PrimitiveClass, ResolvedType};

/// Maps classifications to [`AbiSlot`]s for a target [`Platform`].
///
/// The mapping is total: anything that is not a basic scalar is a pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbiClassifier {
    platform: Platform,
}

impl AbiClassifier {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn classify(&self, class: &PrimitiveClass) -> AbiSlot {
        match class {
            PrimitiveClass::Basic(basic) => self.classify_basic(*basic),
            PrimitiveClass::Callback(_) | PrimitiveClass::Opaque(_) => AbiSlot::Pointer,
        }
    }

    /// Arrays and references always travel as pointers.
    pub fn classify_resolved(&self, resolved: &ResolvedType) -> AbiSlot {
        match resolved {
            ResolvedType::Scalar(basic) => self.classify_basic(*basic),
            ResolvedType::Array(_) | ResolvedType::Reference(_) => AbiSlot::Pointer,
        }
    }

    pub fn classify_basic(&self, basic: BasicType) -> AbiSlot {
        let platform = &self.platform;
        match basic {
            BasicType::Boolean => AbiSlot::I32,
            BasicType::Char | BasicType::UChar | BasicType::UInt8 => AbiSlot::U8,
            BasicType::Int8 => AbiSlot::I8,
            BasicType::Int16 | BasicType::Short => AbiSlot::I16,
            BasicType::UInt16 | BasicType::UShort | BasicType::Unichar2 => AbiSlot::U16,
            BasicType::Int | BasicType::Int32 => AbiSlot::I32,
            BasicType::UInt | BasicType::UInt32 | BasicType::Unichar => AbiSlot::U32,
            BasicType::Int64 | BasicType::Offset => AbiSlot::I64,
            BasicType::UInt64 => AbiSlot::U64,
            BasicType::Long => platform.long_width.signed(),
            BasicType::ULong => platform.long_width.unsigned(),
            BasicType::SSize => platform.size_width.signed(),
            BasicType::Size | BasicType::GType => platform.size_width.unsigned(),
            BasicType::IntPtr => platform.pointer_width.signed(),
            BasicType::UIntPtr => platform.pointer_width.unsigned(),
            BasicType::Float => AbiSlot::F32,
            BasicType::Double => AbiSlot::F64,
            BasicType::Pointer
            | BasicType::ConstPointer
            | BasicType::Utf8
            | BasicType::Filename => AbiSlot::Pointer,
            BasicType::Void => AbiSlot::Void,
        }
    }
}
