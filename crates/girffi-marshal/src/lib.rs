//! Mapping of introspected types onto a C calling convention.
//!
//! This crate turns declared type shapes into native slots and conversions:
//!
//! - [`TypeResolver`]: type name to [`PrimitiveClass`], following aliases
//! - [`AbiClassifier`]: classification to [`AbiSlot`](girffi_core::AbiSlot)
//! - [`Marshaller`]: per-callable conversion plans ([`CallablePlan`])
//! - [`CallFrame`]: argument values and buffers of one native call
//! - [`SignatureBuilder`]: native call signatures ([`AbiSignature`])
//!
//! Everything here is a pure function over a borrowed
//! [`TypeRegistry`](girffi_registry::TypeRegistry); nothing is cached between
//! callables.

mod classifier;
pub use classifier::AbiClassifier;

mod conversion;
pub use conversion::{ArrayConversion, Conversion, ElementConversion, EnumConversion};

mod frame;
pub use frame::CallFrame;

mod host_type;
pub use host_type::HostType;

mod identifier;
pub use identifier::{IdentifierPolicy, RUST_KEYWORDS};

mod marshaller;
pub use marshaller::Marshaller;

mod plan;
pub use plan::{CallablePlan, ParamPlan, ReturnPlan};

mod resolver;
pub use resolver::{MAX_ALIAS_DEPTH, PrimitiveClass, Reference, ResolvedArray, ResolvedType, TypeResolver};

mod signature;
pub use signature::{AbiSignature, SignatureBuilder, SignatureTable};
