//! GObject-Introspection type mapping and marshalling.
//!
//! Given a parsed introspection namespace, this crate derives for every
//! function, method, constructor and callback:
//!
//! - the native call signature (argument and result slots), and
//! - the conversions applied to values crossing the boundary.
//!
//! The work is split over the workspace crates:
//!
//! | crate | contents |
//! |---|---|
//! | `girffi-core` | namespace model, type names, slots, values, errors |
//! | `girffi-registry` | [`TypeRegistry`](girffi_registry::TypeRegistry) |
//! | `girffi-marshal` | resolver, classifier, plans, call frames, signatures |
//! | `girffi` | [`NamespaceBinder`] pipeline and its [`Bindings`] output |
//!
//! # Example
//!
//! ```
//! use girffi::prelude::*;
//!
//! let ns = NamespaceModel::new("Demo", "1.0")
//!     .with_shared_library("libdemo-1.0.so.0")
//!     .with_enum(EnumEntry::enumeration("Color").with_value("RED", 0).with_value("BLUE", 2))
//!     .with_function(
//!         CallableEntry::function("get_color", "demo_get_color")
//!             .with_param(Parameter::scalar("name", "utf8"))
//!             .returning(ReturnValue::scalar("Color")),
//!     );
//!
//! let bindings = NamespaceBinder::default().bind(&ns).unwrap();
//! let signature = bindings.signatures.get("demo_get_color").unwrap();
//! assert_eq!(signature.to_string(), "(pointer) -> i32");
//!
//! let binding = bindings.callable("demo_get_color").unwrap();
//! let mut frame = binding.marshal_args(&[HostValue::from("sky")]).unwrap();
//! // ... call the native symbol with frame.args() ...
//! let color = unsafe { binding.unmarshal_return(&mut frame, AbiValue::I32(2)) }.unwrap();
//! assert_eq!(color, HostValue::Int(2));
//! ```

mod binder;
mod bindings;
mod diagnostics;
mod options;

pub use binder::NamespaceBinder;
pub use bindings::{Bindings, CallableBinding};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use options::BindingOptions;

pub mod prelude {
    pub use crate::{
        BindingOptions, Bindings, CallableBinding, Diagnostic, DiagnosticKind, Diagnostics,
        NamespaceBinder,
    };
    pub use girffi_core::{
        AbiSlot, AbiValue, AliasEntry, ArrayLength, ArraySpec, CallableEntry, CallbackEntry,
        Direction, EnumEntry, GirError, Handle, HostValue, MarshalError, NamespaceModel,
        Parameter, Platform, RecordEntry, ReturnValue, Transfer, TypeName, TypeShape,
    };
    pub use girffi_marshal::{AbiSignature, CallFrame, HostType};
}
