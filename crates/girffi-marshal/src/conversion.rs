//! Value conversions across the FFI boundary.
//!
//! A [`Conversion`] is decided once per parameter or return value when a
//! callable is planned. It then converts in both directions:
//!
//! - [`Conversion::to_abi`]: host value to native slot value (call-in).
//!   Strings and arrays are copied into buffers owned by the [`CallFrame`].
//! - [`Conversion::from_abi`]: native slot value to host value (call-out).
//!   Native memory is read, never freed or retained.
//!
//! ## Call-in Rules
//!
//! | conversion | accepted host values |
//! |---|---|
//! | boolean | `Bool` (1/0) |
//! | numeric | `Int` (range checked), `Float` for float slots |
//! | enum | `Int` in `i32::MIN..=u32::MAX`, passed as its 32-bit pattern |
//! | string | `String` (NUL-terminated copy), `Handle`, `Null` if nullable |
//! | pointer | `Handle`, `Null` |
//! | handle | `Handle`, `Null` if nullable |
//! | callback | `Handle`, `Null` if nullable |
//! | array | `Array`, `Handle`, `Null` if nullable |

use std::ffi::{CStr, CString, c_void};

use girffi_core::{
    AbiSlot, AbiValue, ArrayLength, EnumEntry, Handle, HostValue, MarshalError, TypeName,
};

use crate::frame::{CallFrame, TypedBuffer};

/// Conversion of an enumeration or bitfield value.
///
/// The native value is always a 32-bit integer. Members declared above
/// `i32::MAX` travel as their bit pattern and are read back unsigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConversion {
    pub name: TypeName,
    /// Read negative native values back as `u32`.
    pub unsigned: bool,
}

impl EnumConversion {
    pub fn new(name: TypeName, unsigned: bool) -> Self {
        Self { name, unsigned }
    }

    /// Conversion for a declared entry.
    ///
    /// Values are unsigned when a member exceeds `i32::MAX`, or for
    /// bitfields without negative members.
    pub fn for_entry(name: TypeName, entry: &EnumEntry) -> Self {
        let above_i32 = entry.members.iter().any(|m| m.value > i64::from(i32::MAX));
        let no_negative = entry.members.iter().all(|m| m.value >= 0);
        Self::new(name, above_i32 || (entry.is_bitfield() && no_negative))
    }

    fn to_abi(&self, value: &HostValue) -> Result<AbiValue, MarshalError> {
        match value {
            HostValue::Int(v) if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(v) => {
                // Keep the low 32 bits
                Ok(AbiValue::I32(*v as i32))
            }
            HostValue::Int(v) => Err(MarshalError::IntegerOverflow {
                value: *v,
                target: AbiSlot::I32,
            }),
            other => Err(MarshalError::TypeMismatch {
                expected: "int",
                actual: other.type_name(),
            }),
        }
    }

    fn from_abi(&self, value: AbiValue) -> Result<HostValue, MarshalError> {
        let v = value.as_i64().ok_or_else(|| slot_mismatch("int", value))?;
        let bits = v as i32;
        Ok(HostValue::Int(if self.unsigned {
            i64::from(bits as u32)
        } else {
            i64::from(bits)
        }))
    }
}

/// Conversion of one array element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementConversion {
    /// `gboolean` elements, 32 bits wide.
    Boolean,
    Numeric(AbiSlot),
    /// Enumeration or bitfield elements, 32 bits wide.
    Enum(EnumConversion),
    /// Array of string addresses.
    String,
    /// Array of object addresses, typed when the element type is known.
    Handle(Option<TypeName>),
}

impl ElementConversion {
    /// Slot of one element in the native buffer.
    pub fn slot(&self) -> AbiSlot {
        match self {
            ElementConversion::Boolean | ElementConversion::Enum(_) => AbiSlot::I32,
            ElementConversion::Numeric(slot) => *slot,
            ElementConversion::String | ElementConversion::Handle(_) => AbiSlot::Pointer,
        }
    }

    /// The conversion applied to each element on its own.
    pub fn scalar(&self) -> Conversion {
        match self {
            ElementConversion::Boolean => Conversion::Boolean,
            ElementConversion::Numeric(slot) => Conversion::Numeric(*slot),
            ElementConversion::Enum(conversion) => Conversion::Enum(conversion.clone()),
            ElementConversion::String => Conversion::String,
            ElementConversion::Handle(Some(name)) => Conversion::Handle(name.clone()),
            ElementConversion::Handle(None) => Conversion::Pointer,
        }
    }
}

/// Conversion of a plain C array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayConversion {
    pub element: ElementConversion,
    pub length: ArrayLength,
}

/// How a value crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// No value.
    Void,
    /// `gboolean`: 1/0 in, nonzero test out.
    Boolean,
    /// Integer or float passed unchanged in the given slot.
    Numeric(AbiSlot),
    /// Enumeration or bitfield in an `i32` slot.
    Enum(EnumConversion),
    /// UTF-8 or filename string.
    String,
    /// Untyped address.
    Pointer,
    /// Address of an object of the named type.
    Handle(TypeName),
    /// Address of a native function of the named callback type.
    Callback(TypeName),
    Array(ArrayConversion),
}

impl Conversion {
    /// Native slot of the value.
    pub fn slot(&self) -> AbiSlot {
        match self {
            Conversion::Void => AbiSlot::Void,
            Conversion::Boolean | Conversion::Enum(_) => AbiSlot::I32,
            Conversion::Numeric(slot) => *slot,
            Conversion::String
            | Conversion::Pointer
            | Conversion::Handle(_)
            | Conversion::Callback(_)
            | Conversion::Array(_) => AbiSlot::Pointer,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Conversion::Void)
    }

    /// Host value kind this conversion expects, for error messages.
    fn expected(&self) -> &'static str {
        match self {
            Conversion::Void => "void",
            Conversion::Boolean => "bool",
            Conversion::Numeric(slot) if slot.is_float() => "float",
            Conversion::Numeric(_) | Conversion::Enum(_) => "int",
            Conversion::String => "string",
            Conversion::Pointer | Conversion::Handle(_) | Conversion::Callback(_) => "handle",
            Conversion::Array(_) => "array",
        }
    }

    /// Convert a host value into its native slot value.
    ///
    /// Buffers backing strings and arrays are stored in `frame` and stay
    /// valid until the frame is dropped.
    pub fn to_abi(
        &self,
        value: &HostValue,
        nullable: bool,
        item: &str,
        frame: &mut CallFrame,
    ) -> Result<AbiValue, MarshalError> {
        match (self, value) {
            (Conversion::Void, _) => Ok(AbiValue::Void),
            (_, HostValue::Null) => self.null_to_abi(nullable, item),
            (Conversion::Boolean, HostValue::Bool(b)) => Ok(AbiValue::I32(i32::from(*b))),
            (Conversion::Numeric(slot), value) => numeric_to_abi(*slot, value),
            (Conversion::Enum(conversion), value) => conversion.to_abi(value),
            (Conversion::String, HostValue::String(s)) => Ok(frame.hold_string(to_cstring(s)?)),
            (
                Conversion::String
                | Conversion::Pointer
                | Conversion::Handle(_)
                | Conversion::Callback(_)
                | Conversion::Array(_),
                HostValue::Handle(handle),
            ) => Ok(AbiValue::Pointer(handle.as_ptr())),
            (Conversion::Callback(name), _) => Err(MarshalError::Unsupported {
                what: format!("callback {name}"),
                reason: "host functions cannot be passed as native callbacks",
            }),
            (Conversion::Array(array), HostValue::Array(items)) => {
                array.to_abi(items, item, frame)
            }
            (conversion, other) => Err(MarshalError::TypeMismatch {
                expected: conversion.expected(),
                actual: other.type_name(),
            }),
        }
    }

    fn null_to_abi(&self, nullable: bool, item: &str) -> Result<AbiValue, MarshalError> {
        match self {
            Conversion::Boolean | Conversion::Numeric(_) | Conversion::Enum(_) => {
                Err(MarshalError::TypeMismatch {
                    expected: self.expected(),
                    actual: "null",
                })
            }
            // Untyped pointers are user data more often than not
            Conversion::Pointer => Ok(AbiValue::null()),
            _ if nullable => Ok(AbiValue::null()),
            _ => Err(MarshalError::UnexpectedNull {
                item: item.to_string(),
            }),
        }
    }

    /// Convert a native slot value back into a host value.
    ///
    /// `length` is the element count of a returned array whose length is
    /// held by another parameter; it is ignored otherwise.
    ///
    /// # Safety
    ///
    /// Pointer values must be null or point to memory of the shape this
    /// conversion describes: a NUL-terminated string, or an array of the
    /// element slot that is long enough for its length policy.
    pub unsafe fn from_abi(
        &self,
        value: AbiValue,
        length: Option<usize>,
    ) -> Result<HostValue, MarshalError> {
        match self {
            Conversion::Void => Ok(HostValue::Void),
            Conversion::Boolean => value
                .as_i64()
                .map(|v| HostValue::Bool(v != 0))
                .ok_or_else(|| slot_mismatch("bool", value)),
            Conversion::Numeric(slot) if slot.is_float() => value
                .as_f64()
                .map(HostValue::Float)
                .ok_or_else(|| slot_mismatch("float", value)),
            Conversion::Numeric(_) => value
                .as_i64()
                .map(HostValue::Int)
                .ok_or_else(|| slot_mismatch("int", value)),
            Conversion::Enum(conversion) => conversion.from_abi(value),
            Conversion::String => {
                let ptr = pointer_of(value)?;
                if ptr.is_null() {
                    return Ok(HostValue::Null);
                }
                // SAFETY: non-null string pointers are NUL-terminated per the contract.
                unsafe { read_string(ptr) }.map(HostValue::String)
            }
            Conversion::Pointer => Ok(handle_of(pointer_of(value)?, None)),
            Conversion::Handle(name) | Conversion::Callback(name) => {
                Ok(handle_of(pointer_of(value)?, Some(name)))
            }
            // SAFETY: forwarded from the caller.
            Conversion::Array(array) => unsafe { array.from_abi(pointer_of(value)?, length) },
        }
    }
}

impl ArrayConversion {
    fn to_abi(
        &self,
        items: &[HostValue],
        item: &str,
        frame: &mut CallFrame,
    ) -> Result<AbiValue, MarshalError> {
        if let ArrayLength::Fixed(expected) = self.length
            && items.len() != expected
        {
            return Err(MarshalError::ArrayLengthMismatch {
                expected,
                actual: items.len(),
            });
        }

        let scalar = self.element.scalar();
        // Object elements may be null; the rest must carry a value.
        let nullable = matches!(self.element, ElementConversion::Handle(_));
        let mut values = items
            .iter()
            .map(|value| scalar.to_abi(value, nullable, item, frame))
            .collect::<Result<Vec<_>, _>>()?;

        let slot = self.element.slot();
        if self.length.is_zero_terminated() {
            if let Some(index) = values.iter().position(AbiValue::is_zero) {
                return Err(MarshalError::TerminatorInArray { index });
            }
            values.push(AbiValue::zero(slot));
        }
        Ok(frame.hold_buffer(TypedBuffer::from_values(slot, &values)))
    }

    /// # Safety
    ///
    /// See [`Conversion::from_abi`].
    unsafe fn from_abi(
        &self,
        ptr: *mut c_void,
        length: Option<usize>,
    ) -> Result<HostValue, MarshalError> {
        if ptr.is_null() {
            return Ok(HostValue::Null);
        }

        let slot = self.element.slot();
        let count = match self.length {
            ArrayLength::Fixed(n) => n,
            ArrayLength::Param(index) => {
                length.ok_or(MarshalError::ArrayLengthUnavailable { index })?
            }
            // SAFETY: zero-terminated arrays end with a zero element.
            ArrayLength::ZeroTerminated => unsafe { terminated_len(ptr, slot) },
            ArrayLength::Unknown => return Ok(HostValue::Handle(Handle::untyped(ptr))),
        };

        let scalar = self.element.scalar();
        let mut elements = Vec::with_capacity(count);
        for index in 0..count {
            // SAFETY: the array holds at least `count` elements.
            let value = unsafe { read_slot(ptr.byte_add(index * slot.size()), slot) };
            // SAFETY: elements follow the same contract as the array.
            elements.push(unsafe { scalar.from_abi(value, None) }?);
        }
        Ok(HostValue::Array(elements))
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn numeric_to_abi(slot: AbiSlot, value: &HostValue) -> Result<AbiValue, MarshalError> {
    match value {
        HostValue::Int(v) if slot.is_integer() => integer_to_abi(slot, *v),
        HostValue::Int(v) if slot.is_float() => Ok(float_to_abi(slot, *v as f64)),
        HostValue::Float(v) if slot.is_float() => Ok(float_to_abi(slot, *v)),
        other => Err(MarshalError::TypeMismatch {
            expected: if slot.is_float() { "float" } else { "int" },
            actual: other.type_name(),
        }),
    }
}

/// Narrow an integer into `slot`, rejecting values out of range.
///
/// `u64` accepts every value and keeps the bit pattern, matching how
/// [`HostValue`] carries values above `i64::MAX`.
fn integer_to_abi(slot: AbiSlot, value: i64) -> Result<AbiValue, MarshalError> {
    let overflow = |_| MarshalError::IntegerOverflow {
        value,
        target: slot,
    };
    Ok(match slot {
        AbiSlot::I8 => AbiValue::I8(i8::try_from(value).map_err(overflow)?),
        AbiSlot::U8 => AbiValue::U8(u8::try_from(value).map_err(overflow)?),
        AbiSlot::I16 => AbiValue::I16(i16::try_from(value).map_err(overflow)?),
        AbiSlot::U16 => AbiValue::U16(u16::try_from(value).map_err(overflow)?),
        AbiSlot::I32 => AbiValue::I32(i32::try_from(value).map_err(overflow)?),
        AbiSlot::U32 => AbiValue::U32(u32::try_from(value).map_err(overflow)?),
        AbiSlot::I64 => AbiValue::I64(value),
        AbiSlot::U64 => AbiValue::U64(value as u64),
        other => {
            return Err(MarshalError::TypeMismatch {
                expected: other.name(),
                actual: "int",
            });
        }
    })
}

fn float_to_abi(slot: AbiSlot, value: f64) -> AbiValue {
    match slot {
        AbiSlot::F32 => AbiValue::F32(value as f32),
        _ => AbiValue::F64(value),
    }
}

fn to_cstring(s: &str) -> Result<CString, MarshalError> {
    CString::new(s).map_err(|e| MarshalError::InteriorNul {
        position: e.nul_position(),
    })
}

fn slot_mismatch(expected: &'static str, value: AbiValue) -> MarshalError {
    MarshalError::TypeMismatch {
        expected,
        actual: value.slot().name(),
    }
}

fn pointer_of(value: AbiValue) -> Result<*mut c_void, MarshalError> {
    value.as_ptr().ok_or_else(|| slot_mismatch("pointer", value))
}

fn handle_of(ptr: *mut c_void, name: Option<&TypeName>) -> HostValue {
    if ptr.is_null() {
        HostValue::Null
    } else {
        HostValue::Handle(Handle::new(ptr, name.cloned()))
    }
}

/// # Safety
///
/// `ptr` must point to a NUL-terminated byte string.
unsafe fn read_string(ptr: *mut c_void) -> Result<String, MarshalError> {
    // SAFETY: forwarded from the caller.
    let bytes = unsafe { CStr::from_ptr(ptr.cast()) };
    bytes
        .to_str()
        .map(str::to_string)
        .map_err(|e| MarshalError::InvalidUtf8 {
            detail: e.to_string(),
        })
}

/// Number of elements before the first zero element.
///
/// # Safety
///
/// `ptr` must point to an array of `slot` values containing a zero element.
unsafe fn terminated_len(ptr: *mut c_void, slot: AbiSlot) -> usize {
    let mut count = 0;
    // SAFETY: every element up to and including the terminator is readable.
    while !unsafe { read_slot(ptr.byte_add(count * slot.size()), slot) }.is_zero() {
        count += 1;
    }
    count
}

/// Read one value of `slot` at `ptr`.
///
/// # Safety
///
/// `ptr` must be valid for reading `slot.size()` bytes.
pub(crate) unsafe fn read_slot(ptr: *const c_void, slot: AbiSlot) -> AbiValue {
    // SAFETY: forwarded from the caller; unaligned reads tolerate packed data.
    unsafe {
        match slot {
            AbiSlot::I8 => AbiValue::I8(ptr.cast::<i8>().read_unaligned()),
            AbiSlot::U8 => AbiValue::U8(ptr.cast::<u8>().read_unaligned()),
            AbiSlot::I16 => AbiValue::I16(ptr.cast::<i16>().read_unaligned()),
            AbiSlot::U16 => AbiValue::U16(ptr.cast::<u16>().read_unaligned()),
            AbiSlot::I32 => AbiValue::I32(ptr.cast::<i32>().read_unaligned()),
            AbiSlot::U32 => AbiValue::U32(ptr.cast::<u32>().read_unaligned()),
            AbiSlot::I64 => AbiValue::I64(ptr.cast::<i64>().read_unaligned()),
            AbiSlot::U64 => AbiValue::U64(ptr.cast::<u64>().read_unaligned()),
            AbiSlot::F32 => AbiValue::F32(ptr.cast::<f32>().read_unaligned()),
            AbiSlot::F64 => AbiValue::F64(ptr.cast::<f64>().read_unaligned()),
            AbiSlot::Pointer => AbiValue::Pointer(ptr.cast::<*mut c_void>().read_unaligned()),
            AbiSlot::Void => AbiValue::Void,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_in(conversion: &Conversion, value: HostValue) -> Result<AbiValue, MarshalError> {
        let mut frame = CallFrame::new();
        conversion.to_abi(&value, false, "parameter 'x'", &mut frame)
    }

    #[test]
    fn boolean_round_trip() {
        let mut frame = CallFrame::new();
        for b in [true, false] {
            let abi = Conversion::Boolean
                .to_abi(&HostValue::Bool(b), false, "x", &mut frame)
                .unwrap();
            assert_eq!(abi, AbiValue::I32(i32::from(b)));
            let back = unsafe { Conversion::Boolean.from_abi(abi, None) }.unwrap();
            assert_eq!(back, HostValue::Bool(b));
        }
        // Any nonzero value is true
        let back = unsafe { Conversion::Boolean.from_abi(AbiValue::I32(-7), None) }.unwrap();
        assert_eq!(back, HostValue::Bool(true));
    }

    #[test]
    fn string_round_trip() {
        let mut frame = CallFrame::new();
        for s in ["hello", "", "grüße, 世界"] {
            let abi = Conversion::String
                .to_abi(&HostValue::from(s), false, "x", &mut frame)
                .unwrap();
            // Identity echo of the buffer address
            let back = unsafe { Conversion::String.from_abi(abi, None) }.unwrap();
            assert_eq!(back, HostValue::from(s));
        }
    }

    #[test]
    fn string_with_nul_rejected() {
        let err = call_in(&Conversion::String, HostValue::from("a\0b")).unwrap_err();
        assert_eq!(err, MarshalError::InteriorNul { position: 1 });
    }

    #[test]
    fn invalid_utf8_rejected() {
        let bytes = b"\xff\xfe\0";
        let abi = AbiValue::Pointer(bytes.as_ptr() as *mut c_void);
        let err = unsafe { Conversion::String.from_abi(abi, None) }.unwrap_err();
        assert!(matches!(err, MarshalError::InvalidUtf8 { .. }));
    }

    #[test]
    fn null_handling() {
        let name = TypeName::local("Widget");
        let err = call_in(&Conversion::Handle(name.clone()), HostValue::Null).unwrap_err();
        assert_eq!(
            err,
            MarshalError::UnexpectedNull {
                item: "parameter 'x'".to_string()
            }
        );

        let mut frame = CallFrame::new();
        let abi = Conversion::Handle(name)
            .to_abi(&HostValue::Null, true, "x", &mut frame)
            .unwrap();
        assert_eq!(abi, AbiValue::null());

        assert_eq!(call_in(&Conversion::Pointer, HostValue::Null).unwrap(), AbiValue::null());
        assert_eq!(
            unsafe { Conversion::String.from_abi(AbiValue::null(), None) }.unwrap(),
            HostValue::Null
        );
    }

    #[test]
    fn integer_ranges() {
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::U8), HostValue::Int(255)).unwrap(),
            AbiValue::U8(255)
        );
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::U8), HostValue::Int(256)).unwrap_err(),
            MarshalError::IntegerOverflow {
                value: 256,
                target: AbiSlot::U8
            }
        );
        assert!(call_in(&Conversion::Numeric(AbiSlot::U32), HostValue::Int(-1)).is_err());
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::I32), HostValue::Int(-70000)).unwrap(),
            AbiValue::I32(-70000)
        );
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::U64), HostValue::Int(-1)).unwrap(),
            AbiValue::U64(u64::MAX)
        );
    }

    #[test]
    fn floats() {
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::F64), HostValue::Float(2.5)).unwrap(),
            AbiValue::F64(2.5)
        );
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::F32), HostValue::Int(3)).unwrap(),
            AbiValue::F32(3.0)
        );
        assert_eq!(
            call_in(&Conversion::Numeric(AbiSlot::I32), HostValue::Float(1.0)).unwrap_err(),
            MarshalError::TypeMismatch {
                expected: "int",
                actual: "float"
            }
        );
    }

    #[test]
    fn numeric_call_out_is_identity() {
        let conversion = Conversion::Numeric(AbiSlot::I32);
        let back = unsafe { conversion.from_abi(AbiValue::I32(2), None) }.unwrap();
        assert_eq!(back, HostValue::Int(2));
        assert_eq!(
            unsafe { Conversion::Void.from_abi(AbiValue::Void, None) }.unwrap(),
            HostValue::Void
        );
    }

    #[test]
    fn callbacks_need_native_pointers() {
        let conversion = Conversion::Callback(TypeName::local("Notify"));
        let err = call_in(&conversion, HostValue::from("closure")).unwrap_err();
        assert!(matches!(err, MarshalError::Unsupported { .. }));

        let mut target = 0u8;
        let ptr = (&mut target as *mut u8).cast::<c_void>();
        let abi = call_in(&conversion, HostValue::Handle(Handle::untyped(ptr))).unwrap();
        assert_eq!(abi, AbiValue::Pointer(ptr));

        let back = unsafe { conversion.from_abi(abi, None) }.unwrap();
        assert_eq!(
            back,
            HostValue::Handle(Handle::new(ptr, Some(TypeName::local("Notify"))))
        );
    }

    #[test]
    fn numeric_array_buffer() {
        let conversion = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::I16),
            length: ArrayLength::ZeroTerminated,
        });
        let mut frame = CallFrame::new();
        let abi = conversion
            .to_abi(&HostValue::from(vec![3, -4, 5]), false, "x", &mut frame)
            .unwrap();

        let ptr = abi.as_ptr().unwrap().cast::<i16>();
        let native = unsafe { std::slice::from_raw_parts(ptr, 4) };
        assert_eq!(native, &[3, -4, 5, 0]);

        let back = unsafe { conversion.from_abi(abi, None) }.unwrap();
        assert_eq!(back, HostValue::from(vec![3, -4, 5]));
    }

    #[test]
    fn string_array_round_trip() {
        let conversion = Conversion::Array(ArrayConversion {
            element: ElementConversion::String,
            length: ArrayLength::ZeroTerminated,
        });
        let mut frame = CallFrame::new();
        let abi = conversion
            .to_abi(&HostValue::from(vec!["a", "bc"]), false, "x", &mut frame)
            .unwrap();
        let back = unsafe { conversion.from_abi(abi, None) }.unwrap();
        assert_eq!(back, HostValue::from(vec!["a", "bc"]));
    }

    #[test]
    fn fixed_array_length_checked() {
        let conversion = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::U8),
            length: ArrayLength::Fixed(4),
        });
        let err = call_in(&conversion, HostValue::from(vec![1, 2])).unwrap_err();
        assert_eq!(
            err,
            MarshalError::ArrayLengthMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn array_call_out_lengths() {
        let data = [10u32, 20, 30];
        let abi = AbiValue::Pointer(data.as_ptr() as *mut c_void);

        let by_param = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::U32),
            length: ArrayLength::Param(1),
        });
        assert_eq!(
            unsafe { by_param.from_abi(abi, Some(2)) }.unwrap(),
            HostValue::from(vec![10u32, 20])
        );
        assert_eq!(
            unsafe { by_param.from_abi(abi, None) }.unwrap_err(),
            MarshalError::ArrayLengthUnavailable { index: 1 }
        );

        let fixed = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::U32),
            length: ArrayLength::Fixed(3),
        });
        assert_eq!(
            unsafe { fixed.from_abi(abi, None) }.unwrap(),
            HostValue::from(vec![10u32, 20, 30])
        );

        let unknown = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::U32),
            length: ArrayLength::Unknown,
        });
        assert!(matches!(
            unsafe { unknown.from_abi(abi, None) }.unwrap(),
            HostValue::Handle(_)
        ));
    }

    #[test]
    fn object_array_passes_addresses() {
        let mut a = 1u8;
        let ptr = (&mut a as *mut u8).cast::<c_void>();
        let conversion = Conversion::Array(ArrayConversion {
            element: ElementConversion::Handle(Some(TypeName::local("Widget"))),
            length: ArrayLength::ZeroTerminated,
        });
        let mut frame = CallFrame::new();
        let abi = conversion
            .to_abi(
                &HostValue::Array(vec![HostValue::Handle(Handle::untyped(ptr))]),
                false,
                "x",
                &mut frame,
            )
            .unwrap();
        let base = abi.as_ptr().unwrap().cast::<*mut c_void>();
        let native = unsafe { std::slice::from_raw_parts(base, 2) };
        assert_eq!(native, &[ptr, std::ptr::null_mut()]);
    }

    #[test]
    fn zero_terminated_rejects_inner_terminator() {
        let numbers = Conversion::Array(ArrayConversion {
            element: ElementConversion::Numeric(AbiSlot::I32),
            length: ArrayLength::ZeroTerminated,
        });
        assert_eq!(
            call_in(&numbers, HostValue::from(vec![3, 0, 5])).unwrap_err(),
            MarshalError::TerminatorInArray { index: 1 }
        );

        let mut a = 1u8;
        let ptr = (&mut a as *mut u8).cast::<c_void>();
        let objects = Conversion::Array(ArrayConversion {
            element: ElementConversion::Handle(Some(TypeName::local("Widget"))),
            length: ArrayLength::ZeroTerminated,
        });
        let items = HostValue::Array(vec![
            HostValue::Handle(Handle::untyped(ptr)),
            HostValue::Null,
            HostValue::Handle(Handle::untyped(ptr)),
        ]);
        assert_eq!(
            call_in(&objects, items.clone()).unwrap_err(),
            MarshalError::TerminatorInArray { index: 1 }
        );

        // Null elements are fine when the length is known
        let fixed = Conversion::Array(ArrayConversion {
            element: ElementConversion::Handle(Some(TypeName::local("Widget"))),
            length: ArrayLength::Fixed(3),
        });
        assert!(call_in(&fixed, items).is_ok());
    }

    #[test]
    fn enum_values_keep_their_bit_pattern() {
        let flags = Conversion::Enum(EnumConversion::new(TypeName::local("ParamFlags"), true));
        let high = 1i64 << 31;

        let abi = call_in(&flags, HostValue::Int(high)).unwrap();
        assert_eq!(abi, AbiValue::I32(i32::MIN));
        assert_eq!(
            unsafe { flags.from_abi(abi, None) }.unwrap(),
            HostValue::Int(high)
        );
        assert_eq!(
            call_in(&flags, HostValue::Int(i64::from(u32::MAX))).unwrap(),
            AbiValue::I32(-1)
        );
        assert_eq!(
            call_in(&flags, HostValue::Int(1 << 32)).unwrap_err(),
            MarshalError::IntegerOverflow {
                value: 1 << 32,
                target: AbiSlot::I32
            }
        );

        let signed = Conversion::Enum(EnumConversion::new(TypeName::local("Order"), false));
        assert_eq!(
            call_in(&signed, HostValue::Int(-1)).unwrap(),
            AbiValue::I32(-1)
        );
        assert_eq!(
            unsafe { signed.from_abi(AbiValue::I32(-1), None) }.unwrap(),
            HostValue::Int(-1)
        );
        assert!(matches!(
            call_in(&signed, HostValue::Null).unwrap_err(),
            MarshalError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn enum_signedness_follows_members() {
        let name = || TypeName::local("E");
        let bitfield = EnumEntry::bitfield("E").with_value("A", 1).with_value("B", 1 << 31);
        assert!(EnumConversion::for_entry(name(), &bitfield).unsigned);

        let small_bitfield = EnumEntry::bitfield("E").with_value("A", 1);
        assert!(EnumConversion::for_entry(name(), &small_bitfield).unsigned);

        let negative_bitfield = EnumEntry::bitfield("E").with_value("ALL", -1);
        assert!(!EnumConversion::for_entry(name(), &negative_bitfield).unsigned);

        let enumeration = EnumEntry::enumeration("E").with_value("LOW", -2).with_value("X", 2);
        assert!(!EnumConversion::for_entry(name(), &enumeration).unsigned);

        let wide = EnumEntry::enumeration("E").with_value("TOP", 0xffff_ffff);
        assert!(EnumConversion::for_entry(name(), &wide).unsigned);
    }
}
