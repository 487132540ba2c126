//! Integration test: registry usage from outside the crate
//!
//! Covers custom transform registration, option-bearing builtins driven
//! through the registry, and the split/join round trip.

use normalise_transforms::{Registry, TransformError};
use normalise_value::Value;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn test_builtin_registry_applies_starter_set() -> anyhow::Result<()> {
    let registry = Registry::default();
    let none = Value::Undefined;

    assert_eq!(
        registry.apply("trim", &Value::from("  foo "), &none)?,
        Value::from("foo")
    );
    assert_eq!(
        registry.apply("toBool", &Value::from("TRUE"), &none)?,
        Value::Bool(true)
    );
    assert_eq!(
        registry.apply("default", &Value::Null, &Value::from(json!({"value": 0})))?,
        Value::Number(0.0)
    );
    assert_eq!(
        registry.apply("split", &Value::from("a b"), &Value::from(" "))?,
        Value::from(json!(["a", "b"]))
    );
    Ok(())
}

#[test]
fn test_custom_transform_with_options() -> anyhow::Result<()> {
    let mut registry = Registry::builtin();
    registry.register("pad", |value: &Value, options: &Value| {
        let width = options
            .as_f64()
            .ok_or_else(|| TransformError::missing_option("pad", "width"))?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let width = width as usize;
        Ok(match value {
            Value::String(s) => Value::String(format!("{s:0>width$}")),
            other => other.clone(),
        })
    })?;

    assert_eq!(
        registry.apply("pad", &Value::from("42"), &Value::Number(5.0))?,
        Value::from("00042")
    );

    let err = registry
        .apply("pad", &Value::from("42"), &Value::Undefined)
        .unwrap_err();
    assert!(err.is_configuration());
    Ok(())
}

#[test]
fn test_custom_transform_can_delegate() -> anyhow::Result<()> {
    let mut inner = Registry::builtin();
    inner.unregister("trim");
    let delegate = Registry::builtin();

    inner.register("tidy", move |value: &Value, options: &Value| {
        let trimmed = delegate.apply("trim", value, options)?;
        delegate.apply("collapseWhitespace", &trimmed, options)
    })?;

    assert_eq!(
        inner.apply("tidy", &Value::from("  a   b  "), &Value::Undefined)?,
        Value::from("a b")
    );
    assert!(!inner.contains("trim"));
    Ok(())
}

#[test]
fn test_registry_shared_across_threads() {
    let registry = std::sync::Arc::new(Registry::builtin());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = std::sync::Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .apply("toUpperCase", &Value::from(format!("t{i}")), &Value::Undefined)
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Value::from(format!("T{i}")));
    }
}

proptest! {
    #[test]
    fn prop_split_then_join_reconstructs_input(
        input in "[a-z,;| ]{0,40}",
        separator in prop_oneof![Just(","), Just(";"), Just("||"), Just(" "), Just("")],
    ) {
        let registry = Registry::builtin();
        let parts = registry
            .apply("split", &Value::from(input.as_str()), &Value::from(separator))
            .unwrap();

        let joined = parts
            .as_array()
            .unwrap()
            .iter()
            .map(|part| part.as_str().unwrap())
            .collect::<Vec<_>>()
            .join(separator);
        prop_assert_eq!(joined, input);
    }

    #[test]
    fn prop_default_without_value_always_fails(input in prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::Bool),
        "[a-z]{0,8}".prop_map(Value::String),
    ]) {
        let err = Registry::builtin()
            .apply("default", &input, &Value::Undefined)
            .unwrap_err();
        prop_assert_eq!(err, TransformError::missing_option("default", "value"));
    }

    #[test]
    fn prop_string_transforms_pass_non_strings_through(n in any::<f64>().prop_filter("finite", |n| n.is_finite()), b in any::<bool>()) {
        let registry = Registry::builtin();
        for name in ["trim", "toUpperCase", "toLowerCase", "collapseWhitespace", "decodeAsUriComponent", "toFloat", "toInt"] {
            prop_assert_eq!(registry.apply(name, &Value::Number(n), &Value::Undefined).unwrap(), Value::Number(n));
            prop_assert_eq!(registry.apply(name, &Value::Bool(b), &Value::Undefined).unwrap(), Value::Bool(b));
        }
    }
}
