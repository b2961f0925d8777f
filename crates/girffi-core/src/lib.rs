//! Core data model of the GIR mapping engine.
//!
//! This crate holds everything the other crates share:
//! - Type references and basic type keywords ([`TypeName`], [`BasicType`])
//! - Native slots and platform widths ([`AbiSlot`], [`Platform`])
//! - Declared shapes ([`TypeShape`], [`ArraySpec`], [`ArrayLength`])
//! - Namespace entities ([`NamespaceModel`] and the [`entries`])
//! - Values on both sides of the boundary ([`HostValue`], [`AbiValue`], [`Handle`])
//! - Error types

mod abi;
pub use abi::{AbiSlot, IntWidth, Platform};

mod basic_type;
pub use basic_type::BasicType;

mod type_name;
pub use type_name::TypeName;

mod shape;
pub use shape::{ArrayLength, ArraySpec, TypeShape};

pub mod entries;
pub use entries::{
    AliasEntry, CallableEntry, CallableFlags, CallableKind, CallbackEntry, Direction, EnumEntry,
    EnumKind, EnumMember, ParamFlags, Parameter, RecordEntry, RecordKind, ReturnValue, Transfer,
    VARIADIC_MARKER,
};

mod namespace;
pub use namespace::NamespaceModel;

mod value;
pub use value::{AbiValue, Handle, HostValue};

mod error;
pub use error::{GirError, MarshalError, RegistrationError, SignatureError};
