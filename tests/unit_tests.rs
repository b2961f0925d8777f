//! Integration tests for the binding pipeline.
//!
//! These tests bind complete namespaces through [`NamespaceBinder`] and
//! check the resulting signatures and conversions end to end.

use std::ffi::c_void;

use girffi::prelude::*;
use girffi_core::BasicType;
use girffi_marshal::{AbiClassifier, TypeResolver};
use girffi_registry::TypeRegistry;

/// Namespace exercising enums, aliases, records and callbacks.
fn sample_namespace() -> NamespaceModel {
    NamespaceModel::new("Sample", "1.0")
        .with_shared_library("libsample-1.0.so.0,libsample-extra.so.1")
        .with_enum(
            EnumEntry::enumeration("Color")
                .with_value("RED", 0)
                .with_value("GREEN", 1)
                .with_value("BLUE", 2),
        )
        .with_enum(
            EnumEntry::bitfield("Wide")
                .with_value("NEGATIVE", -1)
                .with_value("HIGH", 1 << 20),
        )
        .with_alias(AliasEntry::new("B", "Color"))
        .with_alias(AliasEntry::new("A", "B"))
        .with_alias(AliasEntry::new("Size", "gsize"))
        .with_callback(
            CallbackEntry::new("DestroyNotify").with_param(Parameter::scalar("data", "gpointer")),
        )
        .with_function(
            CallableEntry::function("get_color", "sample_get_color")
                .returning(ReturnValue::scalar("Color")),
        )
        .with_function(
            CallableEntry::function("echo", "sample_echo")
                .with_param(Parameter::scalar("text", "utf8"))
                .returning(ReturnValue::scalar("utf8")),
        )
        .with_function(
            CallableEntry::function("printf", "sample_printf")
                .with_param(Parameter::scalar("format", "utf8"))
                .with_param(Parameter::variadic())
                .returning(ReturnValue::scalar("gint")),
        )
        .with_function(
            CallableEntry::function("strv_length", "sample_strv_length")
                .with_param(Parameter::array("strv", ArraySpec::zero_terminated("utf8")))
                .returning(ReturnValue::scalar("guint")),
        )
        .with_record(
            RecordEntry::class("Widget")
                .with_constructor(CallableEntry::constructor("new", "sample_widget_new"))
                .with_method(
                    CallableEntry::method(
                        "resize",
                        "sample_widget_resize",
                        Parameter::scalar("self", "Widget"),
                    )
                    .with_param(Parameter::scalar("width", "gint"))
                    .with_param(Parameter::scalar("height", "gint")),
                )
                .with_method(
                    CallableEntry::method(
                        "set_notify",
                        "sample_widget_set_notify",
                        Parameter::scalar("self", "Widget"),
                    )
                    .with_param(Parameter::scalar("notify", "DestroyNotify").nullable()),
                ),
        )
}

fn bind(ns: &NamespaceModel) -> Bindings {
    NamespaceBinder::default().bind(ns).expect("namespace should bind")
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn test_every_keyword_classifies_per_reference_table() {
    let registry = TypeRegistry::new("Sample");
    let resolver = TypeResolver::new(&registry);
    let classifier = AbiClassifier::default();

    let table = [
        (&["gboolean", "gint", "gint32", "glong", "gssize"][..], AbiSlot::I32),
        (&["gchar", "guchar", "guint8"][..], AbiSlot::U8),
        (&["gint8"][..], AbiSlot::I8),
        (&["gint16", "gshort"][..], AbiSlot::I16),
        (&["guint16", "gushort", "gunichar2"][..], AbiSlot::U16),
        (&["guint", "guint32", "gunichar", "gulong", "gsize", "GType"][..], AbiSlot::U32),
        (&["gint64", "goffset", "gintptr"][..], AbiSlot::I64),
        (&["guint64", "guintptr"][..], AbiSlot::U64),
        (&["gfloat"][..], AbiSlot::F32),
        (&["gdouble"][..], AbiSlot::F64),
        (&["gpointer", "gconstpointer", "utf8", "filename"][..], AbiSlot::Pointer),
        (&["void", "none"][..], AbiSlot::Void),
        (&["SomethingElse", "Gio.File"][..], AbiSlot::Pointer),
    ];

    for (keywords, slot) in table {
        for keyword in keywords {
            assert_eq!(
                classifier.classify(&resolver.resolve_str(keyword)),
                slot,
                "keyword {keyword}"
            );
        }
    }
}

#[test]
fn test_enums_and_bitfields_are_i32() {
    let registry = TypeRegistry::from_namespace(&sample_namespace()).unwrap();
    let resolver = TypeResolver::new(&registry);
    let classifier = AbiClassifier::default();

    for name in ["Color", "Wide", "Sample.Wide"] {
        assert_eq!(classifier.classify(&resolver.resolve_str(name)), AbiSlot::I32);
    }
}

#[test]
fn test_alias_chain_matches_target() {
    let registry = TypeRegistry::from_namespace(&sample_namespace()).unwrap();
    let resolver = TypeResolver::new(&registry);
    let classifier = AbiClassifier::default();

    assert_eq!(
        classifier.classify(&resolver.resolve_str("A")),
        classifier.classify(&resolver.resolve_str("Color"))
    );
    assert_eq!(resolver.resolve_str("Size").as_basic(), Some(BasicType::Size));
    assert_eq!(classifier.classify(&resolver.resolve_str("Size")), AbiSlot::U32);
}

// =============================================================================
// Signatures
// =============================================================================

#[test]
fn test_method_signature_has_instance_first() {
    let bindings = bind(&sample_namespace());
    let signature = bindings.signatures.get("sample_widget_resize").unwrap();
    assert_eq!(signature.params, vec![AbiSlot::Pointer, AbiSlot::I32, AbiSlot::I32]);
    assert_eq!(signature.result, AbiSlot::Void);
}

#[test]
fn test_variadic_marker_omitted() {
    let bindings = bind(&sample_namespace());
    let signature = bindings.signatures.get("sample_printf").unwrap();
    assert_eq!(signature.to_string(), "(pointer) -> i32");
}

#[test]
fn test_array_parameters_are_pointers() {
    let bindings = bind(&sample_namespace());
    let signature = bindings.signatures.get("sample_strv_length").unwrap();
    assert_eq!(signature.params, vec![AbiSlot::Pointer]);
    assert_eq!(signature.result, AbiSlot::U32);
}

#[test]
fn test_plans_agree_with_signatures() {
    let bindings = bind(&sample_namespace());
    for binding in &bindings.callables {
        assert_eq!(binding.plan.signature(), binding.signature, "{}", binding.name());
    }
}

#[test]
fn test_output_metadata() {
    let bindings = bind(&sample_namespace());
    assert_eq!(bindings.namespace, "Sample");
    assert_eq!(bindings.version, "1.0");
    assert_eq!(bindings.library.as_deref(), Some("libsample-1.0.so.0"));
    assert_eq!(bindings.signatures.len(), 7);
    assert!(bindings.callback_signature("DestroyNotify").is_some());
    assert!(!bindings.diagnostics.has_errors());
}

// =============================================================================
// Conversions
// =============================================================================

#[test]
fn test_enum_return_identity() {
    let bindings = bind(&sample_namespace());
    let binding = bindings.callable("sample_get_color").unwrap();
    assert_eq!(binding.signature.result, AbiSlot::I32);
    assert_eq!(
        binding.plan.ret.host_type,
        HostType::Enum(TypeName::local("Color"))
    );

    let mut frame = binding.marshal_args(&[]).unwrap();
    for value in [0, 1, 2] {
        let host = unsafe { binding.unmarshal_return(&mut frame, AbiValue::I32(value)) }.unwrap();
        assert_eq!(host, HostValue::Int(value as i64));
    }
}

#[test]
fn test_string_echo_round_trip() {
    let bindings = bind(&sample_namespace());
    let binding = bindings.callable("sample_echo").unwrap();

    for text in ["plain", "", "ünïcødé ✓"] {
        let mut frame = binding.marshal_args(&[HostValue::from(text)]).unwrap();
        // Identity echo: the native side returns the buffer address it got
        let echoed = frame.args()[0];
        let host = unsafe { binding.unmarshal_return(&mut frame, echoed) }.unwrap();
        assert_eq!(host, HostValue::from(text));
    }
}

#[test]
fn test_boolean_round_trip() {
    let ns = NamespaceModel::new("Sample", "1.0").with_function(
        CallableEntry::function("negate", "sample_negate")
            .with_param(Parameter::scalar("value", "gboolean"))
            .returning(ReturnValue::scalar("gboolean")),
    );
    let bindings = bind(&ns);
    let binding = bindings.callable("sample_negate").unwrap();

    for (value, abi) in [(true, 1), (false, 0)] {
        let mut frame = binding.marshal_args(&[HostValue::Bool(value)]).unwrap();
        assert_eq!(frame.args()[0], AbiValue::I32(abi));
        let host = unsafe { binding.unmarshal_return(&mut frame, AbiValue::I32(abi)) }.unwrap();
        assert_eq!(host, HostValue::Bool(value));
    }
}

#[test]
fn test_high_bitfield_round_trip() {
    let ns = NamespaceModel::new("Sample", "1.0")
        .with_enum(
            EnumEntry::bitfield("ParamFlags")
                .with_value("READABLE", 1)
                .with_value("DEPRECATED", 1 << 31),
        )
        .with_function(
            CallableEntry::function("set_flags", "sample_set_flags")
                .with_param(Parameter::scalar("flags", "ParamFlags"))
                .returning(ReturnValue::scalar("ParamFlags")),
        );
    let bindings = bind(&ns);
    let binding = bindings.callable("sample_set_flags").unwrap();
    assert_eq!(binding.signature.params, vec![AbiSlot::I32]);

    for (value, abi) in [(1, 1), (1 << 31, i32::MIN), ((1 << 31) | 1, i32::MIN | 1)] {
        let mut frame = binding.marshal_args(&[HostValue::Int(value)]).unwrap();
        assert_eq!(frame.args()[0], AbiValue::I32(abi));
        let host = unsafe { binding.unmarshal_return(&mut frame, AbiValue::I32(abi)) }.unwrap();
        assert_eq!(host, HostValue::Int(value));
    }
}

#[test]
fn test_string_array_is_null_terminated() {
    let bindings = bind(&sample_namespace());
    let binding = bindings.callable("sample_strv_length").unwrap();

    let frame = binding
        .marshal_args(&[HostValue::from(vec!["a", "b", "c"])])
        .unwrap();
    let ptr = frame.args()[0].as_ptr().unwrap().cast::<*const c_void>();
    let entries = unsafe { std::slice::from_raw_parts(ptr, 4) };
    assert!(entries[..3].iter().all(|p| !p.is_null()));
    assert!(entries[3].is_null());
}

#[test]
fn test_zero_terminated_array_rejects_inner_zero() {
    let ns = NamespaceModel::new("Sample", "1.0").with_function(
        CallableEntry::function("sum", "sample_sum")
            .with_param(Parameter::array("values", ArraySpec::zero_terminated("gint")))
            .returning(ReturnValue::scalar("gint")),
    );
    let bindings = bind(&ns);
    let binding = bindings.callable("sample_sum").unwrap();

    assert!(binding.marshal_args(&[HostValue::from(vec![4, 2])]).is_ok());
    assert_eq!(
        binding.marshal_args(&[HostValue::from(vec![4, 0, 2])]).unwrap_err(),
        MarshalError::TerminatorInArray { index: 1 }
    );
}

#[test]
fn test_constructor_wraps_owner_handle() {
    let bindings = bind(&sample_namespace());
    let binding = bindings.callable("sample_widget_new").unwrap();
    assert_eq!(binding.signature.result, AbiSlot::Pointer);

    let mut storage = [0u8; 16];
    let ptr = storage.as_mut_ptr().cast::<c_void>();
    let mut frame = binding.marshal_args(&[]).unwrap();
    let host = unsafe { binding.unmarshal_return(&mut frame, AbiValue::Pointer(ptr)) }.unwrap();
    assert_eq!(
        host,
        HostValue::Handle(Handle::new(ptr, Some(TypeName::local("Widget"))))
    );

    let null = unsafe { binding.unmarshal_return(&mut frame, AbiValue::null()) }.unwrap();
    assert_eq!(null, HostValue::Null);
}

#[test]
fn test_callback_parameter_capabilities() {
    let bindings = bind(&sample_namespace());
    let binding = bindings.callable_named("Widget.set_notify").unwrap();

    let mut storage = [0u8; 16];
    let widget = HostValue::Handle(Handle::untyped(storage.as_mut_ptr().cast()));

    assert!(binding.marshal_args(&[widget.clone(), HostValue::Null]).is_ok());
    assert!(matches!(
        binding.marshal_args(&[widget, HostValue::from("not a function")]),
        Err(MarshalError::Unsupported { .. })
    ));
}

#[test]
fn test_lp64_platform() {
    let binder = NamespaceBinder::new(BindingOptions::new().with_platform(Platform::lp64()));
    let ns = NamespaceModel::new("Sample", "1.0").with_function(
        CallableEntry::function("size_of", "sample_size_of")
            .with_param(Parameter::scalar("n", "glong"))
            .returning(ReturnValue::scalar("gsize")),
    );
    let bindings = binder.bind(&ns).unwrap();
    assert_eq!(
        bindings.signatures.get("sample_size_of").unwrap().to_string(),
        "(i64) -> u64"
    );
}
