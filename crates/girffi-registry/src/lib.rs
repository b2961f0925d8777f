//! Type registry of one introspected namespace.
//!
//! The registry is populated once from a [`NamespaceModel`](girffi_core::NamespaceModel)
//! and is read-only afterwards. See [`TypeRegistry`].

mod registry;

pub use registry::{Entity, EntityKind, TypeRegistry};
