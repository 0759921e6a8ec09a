//! Property tests for the container sanitizer and required-fields validator

use proptest::prelude::*;
use sanitize::prelude::*;
use serde_json::{Map, json};

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-1000i64..1000).prop_map(Value::from),
        (-1000i64..1000).prop_map(|n| Value::from(n.to_string())),
        "[a-z]{0,6}".prop_map(Value::from),
        "[a-zå §<>~\t]{0,8}".prop_map(Value::from),
        "a\u{30A}[ §]{0,2}".prop_map(Value::from),
    ]
}

fn payload() -> impl Strategy<Value = Value> {
    let tags = prop_oneof![
        leaf_value(),
        prop::collection::vec(leaf_value(), 0..5).prop_map(Value::from),
    ];
    (
        prop::option::of(leaf_value()),
        prop::option::of(leaf_value()),
        prop::option::of(tags),
        prop::collection::btree_map("[a-z]{1,3}", leaf_value(), 0..4),
    )
        .prop_map(|(n, s, tags, extra)| {
            let mut map: Map<String, Value> = extra.into_iter().collect();
            for (key, value) in [("n", n), ("s", s), ("tags", tags)] {
                if let Some(value) = value {
                    map.insert(key.to_string(), value);
                }
            }
            Value::Object(map)
        })
}

fn form_spec() -> FilterSpec {
    FilterSpec::keyed([
        ("n", FilterSpec::from(filters::integer())),
        ("s", FilterSpec::from(filters::string())),
        ("tags", FilterSpec::each(filters::string())),
    ])
}

proptest! {
    /// Clean data re-sanitizes to itself.
    #[test]
    fn sanitize_is_idempotent(input in payload()) {
        let spec = form_spec();
        let once = sanitize_container(&input, &spec, Flags::empty());
        let twice = sanitize_container(&once, &spec, Flags::empty());
        prop_assert_eq!(once, twice);
    }

    /// Keyed output has exactly the declared keys, in declaration order.
    #[test]
    fn keyed_output_matches_spec_keys(input in payload()) {
        let out = sanitize_container(&input, &form_spec(), Flags::empty());
        let keys: Vec<&str> = out
            .as_object()
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default();
        prop_assert_eq!(keys, vec!["n", "s", "tags"]);
    }

    /// Broadcast output has exactly the input's keys.
    #[test]
    fn broadcast_covers_every_input_key(
        entries in prop::collection::btree_map("[a-z]{1,3}", leaf_value(), 0..6),
    ) {
        let mut input: Map<String, Value> = entries.into_iter().collect();
        input.insert("anchor".to_string(), json!("ok"));
        let input = Value::Object(input);

        let out = sanitize_container(&input, &FilterSpec::each(filters::string()), Flags::empty());
        let in_keys: Vec<&String> = input.as_object().map(|m| m.keys().collect()).unwrap_or_default();
        let out_keys: Vec<&String> = out.as_object().map(|m| m.keys().collect()).unwrap_or_default();
        prop_assert_eq!(in_keys, out_keys);
    }

    /// Broadcast over a sequence keeps its length.
    #[test]
    fn broadcast_keeps_sequence_length(items in prop::collection::vec(leaf_value(), 0..8)) {
        let mut input = items;
        input.push(json!(1));
        let len = input.len();

        let out = sanitize_container(&Value::from(input), &FilterSpec::each(filters::integer()), Flags::empty());
        prop_assert_eq!(out.as_array().map(Vec::len), Some(len));
    }

    /// A JSON-encoded payload sanitizes like the decoded structure.
    #[test]
    fn json_encoded_payload_round_trips(input in payload()) {
        let encoded = Value::from(serde_json::to_string(&input).expect("should encode"));
        let spec = form_spec();

        let from_text = sanitize_container(&encoded, &spec, Flag::ExpectJson);
        let from_value = sanitize_container(&input, &spec, Flags::empty());
        prop_assert_eq!(from_text, from_value);
    }

    /// The validator yields `Ok` or a non-empty list of declared labels.
    #[test]
    fn required_fields_is_total(input in payload()) {
        let spec = RequireSpec::keyed([("n", true), ("s", true), ("tags", true)]);
        match find_missing_fields(&input, &spec, Flags::empty()) {
            Ok(()) => {}
            Err(missing) => {
                prop_assert!(!missing.labels().is_empty());
                for label in missing.labels() {
                    prop_assert!(["n", "s", "tags"].contains(&label.as_str()));
                }
            }
        }
    }

    /// Decoding never panics on arbitrary text.
    #[test]
    fn json_decode_accepts_any_text(text in "\\PC*") {
        let value = Value::from(text);
        let _ = maybe_decode_json(&value);
    }
}
