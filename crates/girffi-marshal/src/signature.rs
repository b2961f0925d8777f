//! Native call signatures and the signature table.

use std::fmt;

use rustc_hash::FxHashMap;

use girffi_core::{AbiSlot, CallableEntry, CallableKind, Parameter, ReturnValue, SignatureError};

use crate::classifier::AbiClassifier;
use crate::resolver::TypeResolver;

/// Ordered argument slots and result slot of a native function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AbiSignature {
    pub params: Vec<AbiSlot>,
    pub result: AbiSlot,
}

impl AbiSignature {
    pub fn new(params: Vec<AbiSlot>, result: AbiSlot) -> Self {
        Self { params, result }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for AbiSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, slot) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{slot}")?;
        }
        write!(f, ") -> {}", self.result)
    }
}

/// Builds [`AbiSignature`]s from callable declarations.
///
/// Slot order: instance, declared parameters (variadic marker dropped),
/// trailing `GError**` for throwing callables. Arrays and by-reference
/// parameters are pointers; constructors always return a pointer.
#[derive(Debug, Clone, Copy)]
pub struct SignatureBuilder<'reg> {
    resolver: TypeResolver<'reg>,
    classifier: AbiClassifier,
}

impl<'reg> SignatureBuilder<'reg> {
    pub fn new(resolver: TypeResolver<'reg>, classifier: AbiClassifier) -> Self {
        Self {
            resolver,
            classifier,
        }
    }

    pub fn build(&self, entry: &CallableEntry) -> Result<AbiSignature, SignatureError> {
        if entry.kind != CallableKind::Callback && entry.linkage.is_empty() {
            return Err(SignatureError::MissingLinkage {
                callable: entry.display_name(),
            });
        }

        let mut params = Vec::with_capacity(entry.params.len() + 2);
        if let Some(instance) = &entry.instance {
            params.push(self.param_slot(entry, instance)?);
        }
        for param in entry.params.iter().filter(|p| !p.is_variadic()) {
            params.push(self.param_slot(entry, param)?);
        }
        if entry.is_throwing() {
            params.push(AbiSlot::Pointer);
        }

        let result = match entry.kind {
            CallableKind::Constructor => AbiSlot::Pointer,
            _ => self.return_slot(entry, &entry.ret)?,
        };
        Ok(AbiSignature::new(params, result))
    }

    fn param_slot(&self, entry: &CallableEntry, param: &Parameter) -> Result<AbiSlot, SignatureError> {
        let shape = param
            .shape
            .as_ref()
            .ok_or_else(|| SignatureError::MissingTypeDescriptor {
                callable: entry.display_name(),
                item: format!("parameter '{}'", param.name),
            })?;
        if param.direction.is_by_reference() {
            return Ok(AbiSlot::Pointer);
        }
        Ok(self
            .classifier
            .classify_resolved(&self.resolver.resolve_shape(shape)))
    }

    fn return_slot(&self, entry: &CallableEntry, ret: &ReturnValue) -> Result<AbiSlot, SignatureError> {
        let shape = ret
            .shape
            .as_ref()
            .ok_or_else(|| SignatureError::MissingTypeDescriptor {
                callable: entry.display_name(),
                item: "return value".to_string(),
            })?;
        Ok(self
            .classifier
            .classify_resolved(&self.resolver.resolve_shape(shape)))
    }
}

/// Linkage identifier to signature.
///
/// Insertion replaces and returns any previous signature, so the last
/// binding of a duplicated identifier wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureTable {
    entries: FxHashMap<String, AbiSignature>,
}

impl SignatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, linkage: impl Into<String>, signature: AbiSignature) -> Option<AbiSignature> {
        self.entries.insert(linkage.into(), signature)
    }

    pub fn get(&self, linkage: &str) -> Option<&AbiSignature> {
        self.entries.get(linkage)
    }

    pub fn contains(&self, linkage: &str) -> bool {
        self.entries.contains_key(linkage)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by linkage identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AbiSignature)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(linkage, signature)| (linkage.as_str(), signature))
            .collect();
        entries.sort_unstable_by_key(|(linkage, _)| *linkage);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girffi_core::{ArraySpec, Direction, EnumEntry, NamespaceModel, Platform};
    use girffi_registry::TypeRegistry;

    fn registry() -> TypeRegistry {
        let ns = NamespaceModel::new("Test", "1.0").with_enum(
            EnumEntry::enumeration("Color")
                .with_value("RED", 0)
                .with_value("GREEN", 1)
                .with_value("BLUE", 2),
        );
        TypeRegistry::from_namespace(&ns).unwrap()
    }

    fn builder(registry: &TypeRegistry) -> SignatureBuilder<'_> {
        SignatureBuilder::new(
            TypeResolver::new(registry),
            AbiClassifier::new(Platform::REFERENCE),
        )
    }

    #[test]
    fn method_has_instance_first() {
        let registry = registry();
        let entry = CallableEntry::method(
            "move_to",
            "test_widget_move_to",
            Parameter::scalar("self", "Widget"),
        )
        .with_param(Parameter::scalar("x", "gdouble"))
        .with_param(Parameter::scalar("y", "gint16"));

        let signature = builder(&registry).build(&entry).unwrap();
        assert_eq!(
            signature,
            AbiSignature::new(vec![AbiSlot::Pointer, AbiSlot::F64, AbiSlot::I16], AbiSlot::Void)
        );
        assert_eq!(signature.arity(), 3);
    }

    #[test]
    fn trailing_variadic_omitted() {
        let registry = registry();
        let entry = CallableEntry::function("log", "test_log")
            .with_param(Parameter::scalar("level", "Color"))
            .with_param(Parameter::scalar("format", "utf8"))
            .with_param(Parameter::variadic());
        let signature = builder(&registry).build(&entry).unwrap();
        assert_eq!(signature.params, vec![AbiSlot::I32, AbiSlot::Pointer]);
    }

    #[test]
    fn arrays_and_out_params_are_pointers() {
        let registry = registry();
        let entry = CallableEntry::function("fill", "test_fill")
            .with_param(Parameter::array("data", ArraySpec::fixed("gdouble", 3)))
            .with_param(Parameter::scalar("n", "gint64").with_direction(Direction::Out))
            .returning(ReturnValue::scalar("Color"));
        let signature = builder(&registry).build(&entry).unwrap();
        assert_eq!(
            signature,
            AbiSignature::new(vec![AbiSlot::Pointer, AbiSlot::Pointer], AbiSlot::I32)
        );
    }

    #[test]
    fn throws_and_constructors() {
        let registry = registry();
        let entry = CallableEntry::constructor("new_from_file", "test_widget_new_from_file")
            .with_param(Parameter::scalar("path", "filename"))
            .returning(ReturnValue::scalar("gint"))
            .throws();
        let signature = builder(&registry).build(&entry).unwrap();
        assert_eq!(
            signature,
            AbiSignature::new(vec![AbiSlot::Pointer, AbiSlot::Pointer], AbiSlot::Pointer)
        );
    }

    #[test]
    fn missing_pieces_rejected() {
        let registry = registry();
        let builder = builder(&registry);

        let no_linkage = CallableEntry::function("orphan", "");
        assert_eq!(
            builder.build(&no_linkage).unwrap_err(),
            SignatureError::MissingLinkage {
                callable: "orphan".to_string()
            }
        );

        let no_type = CallableEntry::function("f", "test_f").with_param(Parameter::new("p", None));
        assert!(matches!(
            builder.build(&no_type).unwrap_err(),
            SignatureError::MissingTypeDescriptor { .. }
        ));

        // Callbacks have no symbol of their own
        let callback = CallableEntry::callback("Notify").with_param(Parameter::scalar("data", "gpointer"));
        assert!(builder.build(&callback).is_ok());
    }

    #[test]
    fn display() {
        let signature = AbiSignature::new(vec![AbiSlot::Pointer, AbiSlot::U32], AbiSlot::Void);
        assert_eq!(signature.to_string(), "(pointer, u32) -> void");
    }

    #[test]
    fn table_last_write_wins() {
        let mut table = SignatureTable::new();
        let first = AbiSignature::new(vec![], AbiSlot::I32);
        let second = AbiSignature::new(vec![AbiSlot::Pointer], AbiSlot::Void);

        assert!(table.insert("g_b", first.clone()).is_none());
        assert_eq!(table.insert("g_b", second.clone()), Some(first));
        table.insert("g_a", AbiSignature::new(vec![], AbiSlot::Void));

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("g_b"), Some(&second));
        let order: Vec<_> = table.iter().map(|(linkage, _)| linkage).collect();
        assert_eq!(order, vec!["g_a", "g_b"]);
    }
}
