//! Binding pipeline over a whole namespace.

use girffi_core::{CallableEntry, CallableFlags, GirError, NamespaceModel};
use girffi_marshal::{Marshaller, SignatureBuilder};
use girffi_registry::TypeRegistry;

use crate::bindings::{Bindings, CallableBinding};
use crate::options::BindingOptions;

/// Derives signatures and marshalling plans for every callable of a
/// namespace.
///
/// Processing order: namespace functions, then the constructors, methods
/// and static functions of each record, then callback types. A callable
/// that cannot be bound is reported in the diagnostics and skipped; only a
/// namespace the registry rejects fails the run.
#[derive(Debug, Clone, Default)]
pub struct NamespaceBinder {
    options: BindingOptions,
}

impl NamespaceBinder {
    pub fn new(options: BindingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn bind(&self, model: &NamespaceModel) -> Result<Bindings, GirError> {
        let registry = TypeRegistry::from_namespace(model)?;
        let marshaller = Marshaller::new(&registry, self.options.platform)
            .with_identifiers(self.options.identifier_policy());
        let builder = SignatureBuilder::new(*marshaller.resolver(), *marshaller.classifier());

        let mut bindings = Bindings::for_namespace(model);

        {
            #[cfg(feature = "profiling")]
            profiling::scope!("callables");

            for entry in &model.functions {
                self.bind_callable(entry, &marshaller, &builder, &mut bindings);
            }

            for record in &model.records {
                if !record.introspectable && !self.options.include_non_introspectable {
                    tracing::debug!(record = %record.name, "skipping non-introspectable record");
                    bindings
                        .diagnostics
                        .info("skipped non-introspectable record", Some(record.name.clone()));
                    continue;
                }
                for entry in record.callables() {
                    self.bind_callable(entry, &marshaller, &builder, &mut bindings);
                }
            }
        }

        {
            #[cfg(feature = "profiling")]
            profiling::scope!("callbacks");

            for callback in &model.callbacks {
                match builder.build(&callback.signature) {
                    Ok(signature) => {
                        bindings
                            .callback_signatures
                            .insert(callback.name.clone(), signature);
                    }
                    Err(err) => {
                        tracing::debug!(callback = %callback.name, %err, "skipping callback");
                        bindings
                            .diagnostics
                            .error(err.to_string(), Some(callback.name.clone()));
                    }
                }
            }
        }

        tracing::debug!(
            namespace = %bindings.namespace,
            callables = bindings.callables.len(),
            callbacks = bindings.callback_signatures.len(),
            errors = bindings.diagnostics.error_count(),
            "namespace bound"
        );
        Ok(bindings)
    }

    fn bind_callable(
        &self,
        entry: &CallableEntry,
        marshaller: &Marshaller<'_>,
        builder: &SignatureBuilder<'_>,
        bindings: &mut Bindings,
    ) {
        let name = entry.display_name();
        if !entry.introspectable && !self.options.include_non_introspectable {
            tracing::debug!(callable = %name, "skipping non-introspectable callable");
            bindings
                .diagnostics
                .info("skipped non-introspectable callable", Some(name));
            return;
        }

        let bound = builder
            .build(entry)
            .map_err(GirError::from)
            .and_then(|signature| {
                let plan = marshaller.plan_callable(entry)?;
                Ok(CallableBinding {
                    plan,
                    signature,
                    deprecated: entry.flags.contains(CallableFlags::DEPRECATED),
                })
            });

        match bound {
            Ok(binding) => {
                let linkage = binding.linkage().to_string();
                if bindings.insert(binding).is_some() {
                    tracing::warn!(%linkage, callable = %name, "duplicate linkage identifier, last binding wins");
                    bindings.diagnostics.warning(
                        format!("duplicate linkage identifier '{linkage}'"),
                        Some(name),
                    );
                }
            }
            Err(err) => {
                tracing::debug!(callable = %name, %err, "skipping callable");
                bindings.diagnostics.error(err.to_string(), Some(name));
            }
        }
    }
}
