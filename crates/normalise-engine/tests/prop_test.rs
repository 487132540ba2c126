//! Property-based tests for traversal
//!
//! Checks that directive chains compose in declaration order and that data
//! outside the specification is never touched.

use normalise_engine::{DirectiveSet, Registry, Specification, Value, normalise};
use proptest::prelude::*;
use serde_json::json;

const STRING_TRANSFORMS: [&str; 5] = [
    "trim",
    "toUpperCase",
    "toLowerCase",
    "collapseWhitespace",
    "undefinedIfEmpty",
];

/// Strategy for JSON values with controlled depth
fn json_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z ]{0,12}".prop_map(serde_json::Value::String),
    ];

    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_chain_equals_sequential_application(
        input in "[ a-zA-Z\t]{0,16}",
        chain in proptest::collection::vec(proptest::sample::select(STRING_TRANSFORMS.to_vec()), 1..4),
    ) {
        let registry = Registry::builtin();

        let mut expected = Value::from(input.as_str());
        for name in &chain {
            expected = registry.apply(name, &expected, &Value::Bool(true)).unwrap();
        }

        // Declaring the same transform twice collapses it in a mapping, so
        // build the chain with the builder to keep duplicates.
        let directives = chain
            .iter()
            .fold(DirectiveSet::new(), |set, name| set.transform(*name, true));
        let spec = Specification::new().field("value", directives);

        let mut data = Value::from(json!({"value": input}));
        normalise(&mut data, &spec).unwrap();
        prop_assert_eq!(data.get("value"), &expected);
    }

    #[test]
    fn prop_unlisted_fields_untouched(other in json_value_strategy(), name in "[ a-z]{0,10}") {
        let spec = Specification::try_from(json!({"name": {"trim": true, "toUpperCase": true}})).unwrap();
        let mut data = Value::from(json!({"name": name, "other": other}));

        normalise(&mut data, &spec).unwrap();

        prop_assert_eq!(data.get("other").to_json(), other);
    }

    #[test]
    fn prop_nil_data_is_noop(null in any::<bool>()) {
        let spec = Specification::try_from(json!({
            "name": {"trim": true},
            "tags": {"each": {"trim": true}},
            "shipping": {"object": {"address": {"trim": true}}}
        })).unwrap();
        let mut data = if null { Value::Null } else { Value::Undefined };
        let before = data.clone();

        normalise(&mut data, &spec).unwrap();
        prop_assert_eq!(data, before);
    }
}

#[test]
fn test_non_commuting_pair_depends_on_order() {
    let forwards = Specification::new().field(
        "name",
        DirectiveSet::new()
            .transform("trim", true)
            .transform("undefinedIfEmpty", true),
    );
    let backwards = Specification::new().field(
        "name",
        DirectiveSet::new()
            .transform("undefinedIfEmpty", true)
            .transform("trim", true),
    );

    let mut a = Value::from(json!({"name": "    "}));
    let mut b = a.clone();
    normalise(&mut a, &forwards).unwrap();
    normalise(&mut b, &backwards).unwrap();

    assert!(a.get("name").is_undefined());
    assert_eq!(b.get("name"), &Value::from(""));
}
