//! Plan construction for parameters, return values and callables.

use girffi_core::{
    AbiSlot, BasicType, CallableEntry, CallableKind, MarshalError, Parameter, Platform,
    ReturnValue, TypeName, TypeShape,
};
use girffi_registry::TypeRegistry;

use crate::classifier::AbiClassifier;
use crate::conversion::{ArrayConversion, Conversion, ElementConversion, EnumConversion};
use crate::host_type::HostType;
use crate::identifier::IdentifierPolicy;
use crate::plan::{CallablePlan, ParamPlan, ReturnPlan};
use crate::resolver::{PrimitiveClass, Reference, ResolvedType, TypeResolver};

/// Decides conversions for the callables of one namespace.
#[derive(Debug, Clone)]
pub struct Marshaller<'reg> {
    resolver: TypeResolver<'reg>,
    classifier: AbiClassifier,
    identifiers: IdentifierPolicy,
}

impl<'reg> Marshaller<'reg> {
    pub fn new(registry: &'reg TypeRegistry, platform: Platform) -> Self {
        Self {
            resolver: TypeResolver::new(registry),
            classifier: AbiClassifier::new(platform),
            identifiers: IdentifierPolicy::default(),
        }
    }

    /// Use a different reserved word list for parameter identifiers.
    pub fn with_identifiers(mut self, identifiers: IdentifierPolicy) -> Self {
        self.identifiers = identifiers;
        self
    }

    pub fn resolver(&self) -> &TypeResolver<'reg> {
        &self.resolver
    }

    pub fn classifier(&self) -> &AbiClassifier {
        &self.classifier
    }

    /// Conversion and host type of a declared shape.
    pub fn conversion(&self, shape: &TypeShape) -> Result<(Conversion, HostType), MarshalError> {
        let resolved = self.resolver.resolve_shape(shape);
        Ok(match resolved {
            ResolvedType::Scalar(basic) => {
                let declared = match shape {
                    TypeShape::Scalar(name) => self.enum_conversion(name),
                    TypeShape::Array(_) => None,
                };
                match declared {
                    Some(conversion) => {
                        let host = HostType::Enum(conversion.name.clone());
                        (Conversion::Enum(conversion), host)
                    }
                    None => self.scalar_conversion(basic),
                }
            }
            ResolvedType::Reference(Reference::Opaque(name) | Reference::Container(name)) => {
                (Conversion::Handle(name.clone()), HostType::Handle(name))
            }
            ResolvedType::Reference(Reference::Callback(name)) => {
                (Conversion::Callback(name.clone()), HostType::Callback(name))
            }
            ResolvedType::Array(array) => {
                let declared = match shape {
                    TypeShape::Array(spec) => self.enum_conversion(&spec.element),
                    TypeShape::Scalar(_) => None,
                };
                let (element, host) = match declared {
                    Some(conversion) => {
                        let host = HostType::Enum(conversion.name.clone());
                        (ElementConversion::Enum(conversion), host)
                    }
                    None => self.element_conversion(&array.element)?,
                };
                (
                    Conversion::Array(ArrayConversion {
                        element,
                        length: array.length,
                    }),
                    HostType::array_of(host),
                )
            }
        })
    }

    /// Enumeration or bitfield conversion of a declared name, through aliases.
    fn enum_conversion(&self, name: &TypeName) -> Option<EnumConversion> {
        let (name, entry) = self.resolver.enum_entry(name)?;
        Some(EnumConversion::for_entry(name, entry))
    }

    fn scalar_conversion(&self, basic: BasicType) -> (Conversion, HostType) {
        let slot = self.classifier.classify_basic(basic);
        match basic {
            BasicType::Void => (Conversion::Void, HostType::Void),
            BasicType::Boolean => (Conversion::Boolean, HostType::Boolean),
            b if b.is_string() => (Conversion::String, HostType::String),
            b if b.is_pointer() => (Conversion::Pointer, HostType::Pointer),
            b if b.is_float() => (Conversion::Numeric(slot), HostType::Float),
            _ => (Conversion::Numeric(slot), HostType::Integer),
        }
    }

    fn element_conversion(
        &self,
        element: &PrimitiveClass,
    ) -> Result<(ElementConversion, HostType), MarshalError> {
        Ok(match element {
            PrimitiveClass::Basic(BasicType::Void) => {
                return Err(MarshalError::Unsupported {
                    what: "array of none".to_string(),
                    reason: "array elements must carry a value",
                });
            }
            PrimitiveClass::Basic(BasicType::Boolean) => {
                (ElementConversion::Boolean, HostType::Boolean)
            }
            PrimitiveClass::Basic(b) if b.is_string() => {
                (ElementConversion::String, HostType::String)
            }
            PrimitiveClass::Basic(b) if b.is_pointer() => {
                (ElementConversion::Handle(None), HostType::Pointer)
            }
            PrimitiveClass::Basic(b) => {
                let host = if b.is_float() {
                    HostType::Float
                } else {
                    HostType::Integer
                };
                (ElementConversion::Numeric(self.classifier.classify_basic(*b)), host)
            }
            PrimitiveClass::Callback(name) => (
                ElementConversion::Handle(Some(name.clone())),
                HostType::Callback(name.clone()),
            ),
            PrimitiveClass::Opaque(name) => (
                ElementConversion::Handle(Some(name.clone())),
                HostType::Handle(name.clone()),
            ),
        })
    }

    /// Plan a parameter; `index` is its declared position, `None` for the
    /// instance parameter.
    pub fn plan_param(
        &self,
        index: Option<usize>,
        param: &Parameter,
    ) -> Result<ParamPlan, MarshalError> {
        let shape = param
            .shape
            .as_ref()
            .ok_or_else(|| MarshalError::MissingTypeDescriptor {
                item: format!("parameter '{}'", param.name),
            })?;
        let (conversion, host_type) = self.conversion(shape)?;
        let slot = if param.direction.is_by_reference() {
            AbiSlot::Pointer
        } else {
            conversion.slot()
        };

        Ok(ParamPlan {
            name: param.name.clone(),
            ident: self.identifiers.sanitize(&param.name),
            index,
            host_type,
            conversion,
            slot,
            direction: param.direction,
            transfer: param.transfer,
            flags: param.flags,
        })
    }

    pub fn plan_return(&self, ret: &ReturnValue) -> Result<ReturnPlan, MarshalError> {
        let shape = ret
            .shape
            .as_ref()
            .ok_or_else(|| MarshalError::MissingTypeDescriptor {
                item: "return value".to_string(),
            })?;
        let (conversion, host_type) = self.conversion(shape)?;
        Ok(ReturnPlan {
            host_type,
            slot: conversion.slot(),
            conversion,
            transfer: ret.transfer,
            nullable: ret.nullable,
        })
    }

    /// Constructors return a handle of their owner, whatever they declare.
    fn plan_constructor_return(&self, entry: &CallableEntry) -> Result<ReturnPlan, MarshalError> {
        let owner = match (&entry.owner, &entry.ret.shape) {
            (Some(owner), _) => TypeName::local(owner.as_str()),
            (None, Some(TypeShape::Scalar(name))) => {
                self.resolver.registry().localize(name)
            }
            (None, _) => {
                return Err(MarshalError::MissingTypeDescriptor {
                    item: "constructor return value".to_string(),
                });
            }
        };
        Ok(ReturnPlan {
            host_type: HostType::Handle(owner.clone()),
            conversion: Conversion::Handle(owner),
            slot: AbiSlot::Pointer,
            transfer: entry.ret.transfer,
            nullable: entry.ret.nullable,
        })
    }

    /// Plan every parameter and the return value of a callable.
    pub fn plan_callable(&self, entry: &CallableEntry) -> Result<CallablePlan, MarshalError> {
        let instance = entry
            .instance
            .as_ref()
            .map(|param| self.plan_param(None, param))
            .transpose()?;

        let params = entry
            .params
            .iter()
            .enumerate()
            .filter(|(_, param)| !param.is_variadic())
            .map(|(index, param)| self.plan_param(Some(index), param))
            .collect::<Result<Vec<_>, _>>()?;

        let ret = match entry.kind {
            CallableKind::Constructor => self.plan_constructor_return(entry)?,
            _ => self.plan_return(&entry.ret)?,
        };

        tracing::trace!(
            callable = %entry.display_name(),
            params = params.len(),
            ret = %ret.host_type,
            "planned callable"
        );

        Ok(CallablePlan {
            name: entry.display_name(),
            linkage: entry.linkage.clone(),
            kind: entry.kind,
            instance,
            params,
            ret,
            throws: entry.is_throwing(),
        })
    }
}
