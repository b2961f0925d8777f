//! Marshalling plans of callables.
//!
//! A plan is computed once per callable by the
//! [`Marshaller`](crate::Marshaller) and can then convert any number of calls:
//!
//! ```text
//! host args --marshal_args--> CallFrame --(native call)--> result
//!                                 |                          |
//!                           collect_out              unmarshal_return
//!                                 v                          v
//!                         out/inout values             host return value
//! ```

use girffi_core::{
    AbiSlot, AbiValue, ArrayLength, CallableKind, Direction, HostValue, MarshalError, ParamFlags,
    Transfer,
};

use crate::conversion::Conversion;
use crate::frame::CallFrame;
use crate::host_type::HostType;
use crate::signature::AbiSignature;

/// Marshalling decision for one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamPlan {
    /// Name as declared.
    pub name: String,
    /// Sanitized host identifier.
    pub ident: String,
    /// Declared position; `None` for the instance parameter.
    pub index: Option<usize>,
    pub host_type: HostType,
    /// Conversion of the value (the pointee for by-reference parameters).
    pub conversion: Conversion,
    /// Native argument slot.
    pub slot: AbiSlot,
    pub direction: Direction,
    pub transfer: Transfer,
    pub flags: ParamFlags,
}

impl ParamPlan {
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(ParamFlags::NULLABLE)
    }

    /// Passed through an out cell owned by the frame.
    ///
    /// Caller-allocated pointer values are passed directly instead: the host
    /// supplies the storage as a handle.
    pub fn uses_cell(&self) -> bool {
        self.direction.is_by_reference()
            && !(self.flags.contains(ParamFlags::CALLER_ALLOCATES)
                && self.conversion.slot() == AbiSlot::Pointer)
    }

    /// The host passes a value for this parameter.
    pub fn takes_host_value(&self) -> bool {
        !(self.direction == Direction::Out && self.uses_cell())
    }

    fn item(&self) -> String {
        match self.index {
            Some(_) => format!("parameter '{}'", self.name),
            None => format!("instance parameter '{}'", self.name),
        }
    }
}

/// Marshalling decision for a return value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPlan {
    pub host_type: HostType,
    pub conversion: Conversion,
    pub slot: AbiSlot,
    pub transfer: Transfer,
    pub nullable: bool,
}

/// Marshalling plans of one callable.
#[derive(Debug, Clone, PartialEq)]
pub struct CallablePlan {
    /// Display name ("Owner.name" for record members).
    pub name: String,
    /// Native symbol; empty for callbacks.
    pub linkage: String,
    pub kind: CallableKind,
    pub instance: Option<ParamPlan>,
    /// Declared parameters, variadic marker removed.
    pub params: Vec<ParamPlan>,
    pub ret: ReturnPlan,
    /// Takes a trailing `GError**`.
    pub throws: bool,
}

impl CallablePlan {
    /// Number of host values `marshal_args` expects.
    pub fn host_arity(&self) -> usize {
        self.instance.iter().count()
            + self.params.iter().filter(|p| p.takes_host_value()).count()
    }

    /// Plans of the parameters the host passes values for, instance first.
    pub fn host_params(&self) -> impl Iterator<Item = &ParamPlan> {
        self.instance
            .iter()
            .chain(self.params.iter().filter(|p| p.takes_host_value()))
    }

    /// Native signature implied by the plans.
    pub fn signature(&self) -> AbiSignature {
        let mut params: Vec<AbiSlot> = self
            .instance
            .iter()
            .chain(&self.params)
            .map(|p| p.slot)
            .collect();
        if self.throws {
            params.push(AbiSlot::Pointer);
        }
        AbiSignature::new(params, self.ret.slot)
    }

    /// Convert host arguments into a call frame.
    ///
    /// `args` holds one value per host parameter (see [`host_params`]):
    /// the instance, then every declared parameter except pure out
    /// parameters.
    ///
    /// [`host_params`]: CallablePlan::host_params
    pub fn marshal_args(&self, args: &[HostValue]) -> Result<CallFrame, MarshalError> {
        let expected = self.host_arity();
        if args.len() != expected {
            return Err(MarshalError::ArityMismatch {
                expected,
                actual: args.len(),
            });
        }

        let mut frame = CallFrame::new();
        let mut args = args.iter();
        // (length parameter, element count) of host arrays passed in
        let mut lengths = Vec::new();

        if let Some(instance) = &self.instance
            && let Some(value) = args.next()
        {
            let abi = instance.conversion.to_abi(
                value,
                instance.is_nullable(),
                &instance.item(),
                &mut frame,
            )?;
            frame.push_arg(None, abi);
        }

        for param in &self.params {
            let Some(index) = param.index else { continue };
            let value = if param.takes_host_value() {
                args.next()
            } else {
                None
            };
            if let Conversion::Array(array) = &param.conversion
                && let ArrayLength::Param(length_index) = array.length
                && let Some(HostValue::Array(items)) = value
            {
                lengths.push((length_index, items.len()));
            }

            if param.uses_cell() {
                let initial = match value {
                    Some(value) => Some(param.conversion.to_abi(
                        value,
                        param.is_nullable(),
                        &param.item(),
                        &mut frame,
                    )?),
                    None => None,
                };
                frame.push_cell(index, param.conversion.slot(), initial);
            } else if let Some(value) = value {
                let abi = param.conversion.to_abi(
                    value,
                    param.is_nullable(),
                    &param.item(),
                    &mut frame,
                )?;
                frame.push_arg(Some(index), abi);
            }
        }

        self.check_lengths(&frame, &lengths)?;

        if self.throws {
            frame.push_error_slot();
        }
        Ok(frame)
    }

    /// Length arguments passed by value must match their arrays.
    fn check_lengths(
        &self,
        frame: &CallFrame,
        lengths: &[(usize, usize)],
    ) -> Result<(), MarshalError> {
        for &(length_index, actual) in lengths {
            let by_value = self
                .params
                .iter()
                .any(|p| p.index == Some(length_index) && !p.uses_cell());
            if !by_value {
                continue;
            }
            if let Some(expected) = frame.array_length(length_index)
                && expected != actual
            {
                return Err(MarshalError::ArrayLengthMismatch { expected, actual });
            }
        }
        Ok(())
    }

    /// Convert the native result of a call made with `frame`.
    ///
    /// A `GError` reported by a throwing callable is returned as
    /// [`MarshalError::Native`] and the result is ignored.
    ///
    /// # Safety
    ///
    /// `result` and the frame's out cells must hold what the callee
    /// produced for this plan's declaration.
    pub unsafe fn unmarshal_return(
        &self,
        frame: &mut CallFrame,
        result: AbiValue,
    ) -> Result<HostValue, MarshalError> {
        if self.throws
            // SAFETY: the error cell holds null or a GError written by the callee.
            && let Some(error) = unsafe { frame.take_error() }
        {
            return Err(error);
        }
        let length = array_length(&self.ret.conversion, frame);
        // SAFETY: forwarded from the caller.
        unsafe { self.ret.conversion.from_abi(result, length) }
    }

    /// Read back every out and inout parameter, in declaration order.
    ///
    /// # Safety
    ///
    /// The call must have completed; out cells must hold values matching
    /// the declarations.
    pub unsafe fn collect_out(
        &self,
        frame: &CallFrame,
    ) -> Result<Vec<(String, HostValue)>, MarshalError> {
        let mut values = Vec::new();
        for param in self.params.iter().filter(|p| p.uses_cell()) {
            let Some(value) = param.index.and_then(|index| frame.out_value(index)) else {
                continue;
            };
            let length = array_length(&param.conversion, frame);
            // SAFETY: forwarded from the caller.
            let host = unsafe { param.conversion.from_abi(value, length) }?;
            values.push((param.ident.clone(), host));
        }
        Ok(values)
    }
}

/// Element count of an array whose length lives in another parameter.
fn array_length(conversion: &Conversion, frame: &CallFrame) -> Option<usize> {
    match conversion {
        Conversion::Array(array) => match array.length {
            ArrayLength::Param(index) => frame.array_length(index),
            _ => None,
        },
        _ => None,
    }
}
