//! Values on both sides of the FFI boundary.
//!
//! - [`HostValue`]: what binding users pass and receive
//! - [`AbiValue`]: what occupies a native argument or result slot
//! - [`Handle`]: a non-owning view of a native object address

use std::ffi::c_void;
use std::ptr;

use crate::{AbiSlot, TypeName};

/// Opaque view of a native object.
///
/// A handle records an address and, when known, the declared type it points
/// to. It never frees or references the native allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    ptr: *mut c_void,
    type_name: Option<TypeName>,
}

impl Handle {
    pub fn new(ptr: *mut c_void, type_name: Option<TypeName>) -> Self {
        Self { ptr, type_name }
    }

    /// Handle of unknown type.
    pub fn untyped(ptr: *mut c_void) -> Self {
        Self::new(ptr, None)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr
    }

    pub fn address(&self) -> usize {
        self.ptr as usize
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }
}

/// Host-level value of a binding.
///
/// Integers of every width are carried as `i64`; `u64` values above
/// `i64::MAX` keep their bit pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// No value
    Void,
    /// Null string, handle or array
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Handle(Handle),
    Array(Vec<HostValue>),
}

impl HostValue {
    /// Get a human-readable name for this value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Void => "void",
            HostValue::Null => "null",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::String(_) => "string",
            HostValue::Handle(_) => "handle",
            HostValue::Array(_) => "array",
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, HostValue::Void)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HostValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Int(v)
    }
}

impl From<u32> for HostValue {
    fn from(v: u32) -> Self {
        HostValue::Int(v as i64)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Float(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::String(v.to_string())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::String(v)
    }
}

impl From<Handle> for HostValue {
    fn from(v: Handle) -> Self {
        HostValue::Handle(v)
    }
}

impl<T: Into<HostValue>> From<Vec<T>> for HostValue {
    fn from(v: Vec<T>) -> Self {
        HostValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// Value occupying a native argument or result slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AbiValue {
    Void,
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Pointer(*mut c_void),
}

impl AbiValue {
    pub fn null() -> Self {
        AbiValue::Pointer(ptr::null_mut())
    }

    /// The slot this value occupies.
    pub fn slot(&self) -> AbiSlot {
        match self {
            AbiValue::Void => AbiSlot::Void,
            AbiValue::I8(_) => AbiSlot::I8,
            AbiValue::U8(_) => AbiSlot::U8,
            AbiValue::I16(_) => AbiSlot::I16,
            AbiValue::U16(_) => AbiSlot::U16,
            AbiValue::I32(_) => AbiSlot::I32,
            AbiValue::U32(_) => AbiSlot::U32,
            AbiValue::I64(_) => AbiSlot::I64,
            AbiValue::U64(_) => AbiSlot::U64,
            AbiValue::F32(_) => AbiSlot::F32,
            AbiValue::F64(_) => AbiSlot::F64,
            AbiValue::Pointer(_) => AbiSlot::Pointer,
        }
    }

    /// Integer content widened to `i64`; `u64` keeps its bit pattern.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            AbiValue::I8(v) => Some(v as i64),
            AbiValue::U8(v) => Some(v as i64),
            AbiValue::I16(v) => Some(v as i64),
            AbiValue::U16(v) => Some(v as i64),
            AbiValue::I32(v) => Some(v as i64),
            AbiValue::U32(v) => Some(v as i64),
            AbiValue::I64(v) => Some(v),
            AbiValue::U64(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            AbiValue::F32(v) => Some(v as f64),
            AbiValue::F64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ptr(&self) -> Option<*mut c_void> {
        match *self {
            AbiValue::Pointer(p) => Some(p),
            _ => None,
        }
    }

    /// Zero of the given slot.
    pub fn zero(slot: AbiSlot) -> Self {
        match slot {
            AbiSlot::I8 => AbiValue::I8(0),
            AbiSlot::U8 => AbiValue::U8(0),
            AbiSlot::I16 => AbiValue::I16(0),
            AbiSlot::U16 => AbiValue::U16(0),
            AbiSlot::I32 => AbiValue::I32(0),
            AbiSlot::U32 => AbiValue::U32(0),
            AbiSlot::I64 => AbiValue::I64(0),
            AbiSlot::U64 => AbiValue::U64(0),
            AbiSlot::F32 => AbiValue::F32(0.0),
            AbiSlot::F64 => AbiValue::F64(0.0),
            AbiSlot::Pointer => AbiValue::null(),
            AbiSlot::Void => AbiValue::Void,
        }
    }

    /// Whether this is the zero value of its slot (null for pointers).
    pub fn is_zero(&self) -> bool {
        match *self {
            AbiValue::Void => true,
            AbiValue::F32(v) => v == 0.0,
            AbiValue::F64(v) => v == 0.0,
            AbiValue::Pointer(p) => p.is_null(),
            _ => self.as_i64() == Some(0),
        }
    }
}
