//! Output of a namespace binding run.

use rustc_hash::FxHashMap;

use girffi_core::{AbiValue, CallableKind, HostValue, MarshalError, NamespaceModel};
use girffi_marshal::{AbiSignature, CallFrame, CallablePlan, SignatureTable};

use crate::diagnostics::Diagnostics;

/// Plans and native signature of one bound callable.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableBinding {
    pub plan: CallablePlan,
    pub signature: AbiSignature,
    pub deprecated: bool,
}

impl CallableBinding {
    /// Display name ("Owner.name" for record members).
    pub fn name(&self) -> &str {
        &self.plan.name
    }

    pub fn linkage(&self) -> &str {
        &self.plan.linkage
    }

    pub fn kind(&self) -> CallableKind {
        self.plan.kind
    }

    /// Convert host arguments into argument values for the native call.
    pub fn marshal_args(&self, args: &[HostValue]) -> Result<CallFrame, MarshalError> {
        self.plan.marshal_args(args)
    }

    /// Convert the native result back into a host value.
    ///
    /// # Safety
    ///
    /// `result` and `frame` must come from calling this binding's symbol
    /// with the frame's arguments.
    pub unsafe fn unmarshal_return(
        &self,
        frame: &mut CallFrame,
        result: AbiValue,
    ) -> Result<HostValue, MarshalError> {
        // SAFETY: forwarded from the caller.
        unsafe { self.plan.unmarshal_return(frame, result) }
    }

    /// Out and inout values after the call, keyed by parameter identifier.
    ///
    /// # Safety
    ///
    /// See [`CallableBinding::unmarshal_return`].
    pub unsafe fn collect_out(
        &self,
        frame: &CallFrame,
    ) -> Result<Vec<(String, HostValue)>, MarshalError> {
        // SAFETY: forwarded from the caller.
        unsafe { self.plan.collect_out(frame) }
    }
}

/// Everything derived from one namespace.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub namespace: String,
    pub version: String,
    /// Library the symbols are loaded from.
    pub library: Option<String>,
    /// Linkage identifier to native signature.
    pub signatures: SignatureTable,
    /// Bound callables in processing order.
    pub callables: Vec<CallableBinding>,
    /// Callback type name to the signature native code calls it with.
    pub callback_signatures: FxHashMap<String, AbiSignature>,
    pub diagnostics: Diagnostics,
}

impl Bindings {
    pub(crate) fn for_namespace(model: &NamespaceModel) -> Self {
        Self {
            namespace: model.name.clone(),
            version: model.version.clone(),
            library: model.primary_library().map(str::to_string),
            ..Self::default()
        }
    }

    /// Record a bound callable; returns the signature it displaced, if any.
    pub(crate) fn insert(&mut self, binding: CallableBinding) -> Option<AbiSignature> {
        let previous = self
            .signatures
            .insert(binding.linkage(), binding.signature.clone());
        if previous.is_some() {
            self.callables.retain(|c| c.linkage() != binding.linkage());
        }
        self.callables.push(binding);
        previous
    }

    /// Look up a callable by linkage identifier.
    pub fn callable(&self, linkage: &str) -> Option<&CallableBinding> {
        self.callables.iter().find(|c| c.linkage() == linkage)
    }

    /// Look up a callable by display name ("name" or "Owner.name").
    pub fn callable_named(&self, name: &str) -> Option<&CallableBinding> {
        self.callables.iter().find(|c| c.name() == name)
    }

    pub fn callback_signature(&self, name: &str) -> Option<&AbiSignature> {
        self.callback_signatures.get(name)
    }
}
