//! Argument storage for one native call.
//!
//! A [`CallFrame`] holds the argument slot values in native order together
//! with every buffer they point into: C strings, element arrays, out cells
//! and the `GError*` cell of throwing callables. The frame must outlive the
//! native call; dropping it releases all buffers.

use std::ffi::{CString, c_char, c_void};
use std::ptr;

use rustc_hash::FxHashMap;

use girffi_core::{AbiSlot, AbiValue, MarshalError};

/// Contiguous element buffer of one slot width.
#[derive(Debug)]
pub(crate) enum TypedBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Pointer(Vec<*mut c_void>),
}

macro_rules! collect_slot {
    ($values:expr, $variant:ident) => {
        TypedBuffer::$variant(
            $values
                .iter()
                .filter_map(|value| match value {
                    AbiValue::$variant(v) => Some(*v),
                    _ => None,
                })
                .collect(),
        )
    };
}

impl TypedBuffer {
    /// Pack slot values of one width; values of other slots are skipped.
    pub(crate) fn from_values(slot: AbiSlot, values: &[AbiValue]) -> Self {
        match slot {
            AbiSlot::I8 => collect_slot!(values, I8),
            AbiSlot::U8 => collect_slot!(values, U8),
            AbiSlot::I16 => collect_slot!(values, I16),
            AbiSlot::U16 => collect_slot!(values, U16),
            AbiSlot::I32 => collect_slot!(values, I32),
            AbiSlot::U32 => collect_slot!(values, U32),
            AbiSlot::I64 => collect_slot!(values, I64),
            AbiSlot::U64 => collect_slot!(values, U64),
            AbiSlot::F32 => collect_slot!(values, F32),
            AbiSlot::F64 => collect_slot!(values, F64),
            AbiSlot::Pointer | AbiSlot::Void => collect_slot!(values, Pointer),
        }
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        match self {
            TypedBuffer::I8(v) => v.as_mut_ptr().cast(),
            TypedBuffer::U8(v) => v.as_mut_ptr().cast(),
            TypedBuffer::I16(v) => v.as_mut_ptr().cast(),
            TypedBuffer::U16(v) => v.as_mut_ptr().cast(),
            TypedBuffer::I32(v) => v.as_mut_ptr().cast(),
            TypedBuffer::U32(v) => v.as_mut_ptr().cast(),
            TypedBuffer::I64(v) => v.as_mut_ptr().cast(),
            TypedBuffer::U64(v) => v.as_mut_ptr().cast(),
            TypedBuffer::F32(v) => v.as_mut_ptr().cast(),
            TypedBuffer::F64(v) => v.as_mut_ptr().cast(),
            TypedBuffer::Pointer(v) => v.as_mut_ptr().cast(),
        }
    }

    fn byte_len(&self) -> usize {
        match self {
            TypedBuffer::I8(v) => size_of_val(v.as_slice()),
            TypedBuffer::U8(v) => size_of_val(v.as_slice()),
            TypedBuffer::I16(v) => size_of_val(v.as_slice()),
            TypedBuffer::U16(v) => size_of_val(v.as_slice()),
            TypedBuffer::I32(v) => size_of_val(v.as_slice()),
            TypedBuffer::U32(v) => size_of_val(v.as_slice()),
            TypedBuffer::I64(v) => size_of_val(v.as_slice()),
            TypedBuffer::U64(v) => size_of_val(v.as_slice()),
            TypedBuffer::F32(v) => size_of_val(v.as_slice()),
            TypedBuffer::F64(v) => size_of_val(v.as_slice()),
            TypedBuffer::Pointer(v) => size_of_val(v.as_slice()),
        }
    }
}

/// Storage pointed into by argument slots.
#[derive(Debug)]
enum ArgBuffer {
    String(CString),
    Typed(TypedBuffer),
}

impl ArgBuffer {
    fn byte_len(&self) -> usize {
        match self {
            ArgBuffer::String(s) => s.as_bytes_with_nul().len(),
            ArgBuffer::Typed(buffer) => buffer.byte_len(),
        }
    }
}

/// Where a declared parameter landed in the frame.
#[derive(Debug, Clone, Copy)]
struct DeclaredArg {
    /// Position in the native argument list.
    arg: usize,
    /// Out cell and the slot of the value it holds.
    cell: Option<(usize, AbiSlot)>,
}

/// Layout of `GError` (`GQuark domain; gint code; gchar *message`).
#[repr(C)]
pub(crate) struct NativeError {
    pub(crate) domain: u32,
    pub(crate) code: i32,
    pub(crate) message: *const c_char,
}

/// Argument values and owned buffers of one native call.
#[derive(Debug, Default)]
pub struct CallFrame {
    /// Native argument values, instance first.
    args: Vec<AbiValue>,
    buffers: Vec<ArgBuffer>,
    /// 8-byte aligned cells written by the callee.
    cells: Vec<Box<u64>>,
    /// Declared parameter index to its argument.
    declared: FxHashMap<usize, DeclaredArg>,
    /// Cell receiving the `GError*`.
    error_cell: Option<usize>,
}

impl CallFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Argument values in native order.
    pub fn args(&self) -> &[AbiValue] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Bytes held in string and element buffers.
    pub fn held_bytes(&self) -> usize {
        self.buffers.iter().map(ArgBuffer::byte_len).sum()
    }

    // ==========================================================================
    // Building
    // ==========================================================================

    /// Append an argument passed by value.
    pub(crate) fn push_arg(&mut self, declared: Option<usize>, value: AbiValue) {
        if let Some(index) = declared {
            self.declared.insert(
                index,
                DeclaredArg {
                    arg: self.args.len(),
                    cell: None,
                },
            );
        }
        self.args.push(value);
    }

    /// Append an out cell for a by-reference parameter.
    ///
    /// The cell starts as `initial` (inout) or zero (out); the argument is
    /// the cell's address.
    pub(crate) fn push_cell(&mut self, declared: usize, slot: AbiSlot, initial: Option<AbiValue>) {
        let cell = self.new_cell(initial.map_or(0, encode_cell));
        self.declared.insert(
            declared,
            DeclaredArg {
                arg: self.args.len(),
                cell: Some((cell, slot)),
            },
        );
        let ptr = self.cell_ptr(cell);
        self.args.push(ptr);
    }

    /// Append the trailing `GError**` argument.
    pub(crate) fn push_error_slot(&mut self) {
        let cell = self.new_cell(0);
        self.error_cell = Some(cell);
        let ptr = self.cell_ptr(cell);
        self.args.push(ptr);
    }

    fn new_cell(&mut self, bits: u64) -> usize {
        self.cells.push(Box::new(bits));
        self.cells.len() - 1
    }

    fn cell_ptr(&mut self, cell: usize) -> AbiValue {
        match self.cells.get_mut(cell) {
            Some(bits) => AbiValue::Pointer((&mut **bits as *mut u64).cast()),
            None => AbiValue::null(),
        }
    }

    /// Keep a C string alive for the call and return its address.
    pub(crate) fn hold_string(&mut self, s: CString) -> AbiValue {
        let ptr = s.as_ptr().cast_mut().cast();
        self.buffers.push(ArgBuffer::String(s));
        AbiValue::Pointer(ptr)
    }

    /// Keep an element buffer alive for the call and return its address.
    pub(crate) fn hold_buffer(&mut self, mut buffer: TypedBuffer) -> AbiValue {
        let ptr = buffer.as_mut_ptr();
        self.buffers.push(ArgBuffer::Typed(buffer));
        AbiValue::Pointer(ptr)
    }

    // ==========================================================================
    // Reading back
    // ==========================================================================

    /// Argument value of a declared parameter (the cell address for out
    /// parameters).
    pub fn declared_arg(&self, index: usize) -> Option<AbiValue> {
        let declared = self.declared.get(&index)?;
        self.args.get(declared.arg).copied()
    }

    /// Current content of a declared parameter's out cell.
    pub fn out_value(&self, index: usize) -> Option<AbiValue> {
        let (cell, slot) = self.declared.get(&index)?.cell?;
        self.cells.get(cell).map(|bits| decode_cell(**bits, slot))
    }

    /// Element count held by a declared length parameter.
    ///
    /// Reads the out cell for out/inout parameters and the passed value
    /// otherwise. Negative counts yield `None`.
    pub fn array_length(&self, index: usize) -> Option<usize> {
        let value = match self.declared.get(&index)?.cell {
            Some(_) => self.out_value(index)?,
            None => self.declared_arg(index)?,
        };
        usize::try_from(value.as_i64()?).ok()
    }

    /// Current `GError*`, null when none was reported or the callable does
    /// not throw.
    pub fn error_ptr(&self) -> *mut c_void {
        self.error_cell
            .and_then(|cell| self.cells.get(cell))
            .and_then(|bits| decode_cell(**bits, AbiSlot::Pointer).as_ptr())
            .unwrap_or(ptr::null_mut())
    }

    /// Take the error reported by the callee, clearing the error cell.
    ///
    /// The native `GError` is not freed.
    ///
    /// # Safety
    ///
    /// The error cell must be null or hold a pointer to a valid `GError`.
    pub unsafe fn take_error(&mut self) -> Option<MarshalError> {
        let error = self.error_ptr();
        if error.is_null() {
            return None;
        }
        if let Some(bits) = self.error_cell.and_then(|cell| self.cells.get_mut(cell)) {
            **bits = 0;
        }

        // SAFETY: non-null error pointers reference a GError per the contract.
        let native = unsafe { &*error.cast::<NativeError>() };
        let message = if native.message.is_null() {
            String::new()
        } else {
            // SAFETY: GError messages are NUL-terminated.
            unsafe { std::ffi::CStr::from_ptr(native.message) }
                .to_string_lossy()
                .into_owned()
        };

        tracing::debug!(
            domain = native.domain,
            code = native.code,
            %message,
            "native call reported an error"
        );
        Some(MarshalError::Native {
            domain: native.domain,
            code: native.code,
            message,
        })
    }
}

// ============================================================================
// Cell encoding
// ============================================================================

/// Native-endian bytes of a value, left aligned in a 64-bit cell.
fn encode_cell(value: AbiValue) -> u64 {
    let mut bytes = [0u8; 8];
    match value {
        AbiValue::Void => {}
        AbiValue::I8(v) => bytes[..1].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::U8(v) => bytes[..1].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::I16(v) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::U16(v) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::I32(v) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::U32(v) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::I64(v) => bytes.copy_from_slice(&v.to_ne_bytes()),
        AbiValue::U64(v) => bytes.copy_from_slice(&v.to_ne_bytes()),
        AbiValue::F32(v) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        AbiValue::F64(v) => bytes.copy_from_slice(&v.to_ne_bytes()),
        AbiValue::Pointer(p) => {
            bytes[..size_of::<usize>()].copy_from_slice(&p.expose_provenance().to_ne_bytes())
        }
    }
    u64::from_ne_bytes(bytes)
}

fn decode_cell(bits: u64, slot: AbiSlot) -> AbiValue {
    let bytes = bits.to_ne_bytes();
    match slot {
        AbiSlot::I8 => AbiValue::I8(i8::from_ne_bytes(prefix(&bytes))),
        AbiSlot::U8 => AbiValue::U8(u8::from_ne_bytes(prefix(&bytes))),
        AbiSlot::I16 => AbiValue::I16(i16::from_ne_bytes(prefix(&bytes))),
        AbiSlot::U16 => AbiValue::U16(u16::from_ne_bytes(prefix(&bytes))),
        AbiSlot::I32 => AbiValue::I32(i32::from_ne_bytes(prefix(&bytes))),
        AbiSlot::U32 => AbiValue::U32(u32::from_ne_bytes(prefix(&bytes))),
        AbiSlot::I64 => AbiValue::I64(i64::from_ne_bytes(bytes)),
        AbiSlot::U64 => AbiValue::U64(bits),
        AbiSlot::F32 => AbiValue::F32(f32::from_ne_bytes(prefix(&bytes))),
        AbiSlot::F64 => AbiValue::F64(f64::from_ne_bytes(bytes)),
        AbiSlot::Pointer => AbiValue::Pointer(ptr::with_exposed_provenance_mut(
            usize::from_ne_bytes(prefix(&bytes)),
        )),
        AbiSlot::Void => AbiValue::Void,
    }
}

fn prefix<const N: usize>(bytes: &[u8; 8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write through an argument pointer the way a callee would.
    unsafe fn callee_writes<T>(frame: &CallFrame, arg: usize, value: T) {
        let ptr = frame.args()[arg].as_ptr().unwrap();
        unsafe { ptr.cast::<T>().write(value) };
    }

    #[test]
    fn cell_encoding_round_trip() {
        let values = [
            AbiValue::I8(-5),
            AbiValue::U16(65000),
            AbiValue::I32(-123456),
            AbiValue::U64(u64::MAX),
            AbiValue::F32(1.25),
            AbiValue::F64(-0.5),
            AbiValue::Pointer(0x1000 as *mut c_void),
        ];
        for value in values {
            assert_eq!(decode_cell(encode_cell(value), value.slot()), value);
        }
    }

    #[test]
    fn out_cell_written_by_callee() {
        let mut frame = CallFrame::new();
        frame.push_arg(Some(0), AbiValue::I32(7));
        frame.push_cell(1, AbiSlot::I32, None);
        assert_eq!(frame.out_value(1), Some(AbiValue::I32(0)));

        unsafe { callee_writes(&frame, 1, 42i32) };
        assert_eq!(frame.out_value(1), Some(AbiValue::I32(42)));
        assert_eq!(frame.array_length(1), Some(42));
        assert_eq!(frame.array_length(0), Some(7));
        assert_eq!(frame.array_length(5), None);
    }

    #[test]
    fn inout_cell_starts_with_value() {
        let mut frame = CallFrame::new();
        frame.push_cell(0, AbiSlot::U16, Some(AbiValue::U16(300)));
        assert_eq!(frame.out_value(0), Some(AbiValue::U16(300)));
    }

    #[test]
    fn negative_length_is_unavailable() {
        let mut frame = CallFrame::new();
        frame.push_arg(Some(0), AbiValue::I32(-1));
        assert_eq!(frame.array_length(0), None);
    }

    #[test]
    fn no_error_reported() {
        let mut frame = CallFrame::new();
        frame.push_error_slot();
        assert!(frame.error_ptr().is_null());
        assert!(unsafe { frame.take_error() }.is_none());
    }

    #[test]
    fn native_error_taken_once() {
        let message = CString::new("file not found").unwrap();
        let native = NativeError {
            domain: 17,
            code: 4,
            message: message.as_ptr(),
        };

        let mut frame = CallFrame::new();
        frame.push_error_slot();
        unsafe { callee_writes(&frame, 0, &native as *const NativeError) };

        let err = unsafe { frame.take_error() }.unwrap();
        assert_eq!(
            err,
            MarshalError::Native {
                domain: 17,
                code: 4,
                message: "file not found".to_string(),
            }
        );
        assert!(unsafe { frame.take_error() }.is_none());
    }

    #[test]
    fn held_buffers_stay_valid() {
        let mut frame = CallFrame::new();
        let first = frame.hold_string(CString::new("one").unwrap());
        for i in 0..32 {
            frame.hold_string(CString::new(format!("filler {i}")).unwrap());
        }
        let text = unsafe { std::ffi::CStr::from_ptr(first.as_ptr().unwrap().cast()) };
        assert_eq!(text.to_str().unwrap(), "one");
        assert!(frame.held_bytes() > 32 * "filler ".len());
    }
}
