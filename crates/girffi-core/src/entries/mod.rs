//! Declared entities of an introspected namespace.
//!
//! - [`AliasEntry`] - typedef to another type
//! - [`EnumEntry`] - enumeration or bitfield
//! - [`CallbackEntry`] - function pointer type
//! - [`RecordEntry`] - struct-backed record, class, interface or union
//! - [`CallableEntry`] - function, method, constructor or callback signature
//!
//! Supporting types:
//! - [`Parameter`], [`ReturnValue`] - callable members
//! - [`Transfer`], [`Direction`], [`ParamFlags`], [`CallableFlags`]

mod alias;
mod callable;
mod callback;
mod enum_entry;
mod parameter;
mod record;

pub use alias::AliasEntry;
pub use callable::{CallableEntry, CallableFlags, CallableKind};
pub use callback::CallbackEntry;
pub use enum_entry::{EnumEntry, EnumKind, EnumMember};
pub use parameter::{Direction, ParamFlags, Parameter, ReturnValue, Transfer, VARIADIC_MARKER};
pub use record::{RecordEntry, RecordKind};
