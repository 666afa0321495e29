use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use serde_json::Value;
use smile_serde::{
    ConfigError, DeserializeResultType, Deserializer, Serde, SerdeError, SerdeProperties,
    Serializer, SmileSerde, Target,
};

const DOCUMENTS: &[&str] = &[
    r#"{ "name": "Clark Kent",  "age": 35 }"#,
    "123",
    "123.123",
    r#""string json""#,
    "null",
];

fn assert_json_eq(expected: &str, actual: &str) {
    let expected: Value = serde_json::from_str(expected).expect("expected is JSON");
    let actual: Value = serde_json::from_str(actual).expect("actual is JSON");
    assert_eq!(actual, expected);
}

fn headerless_properties() -> SerdeProperties {
    SerdeProperties::new()
        .with_generator_flag("WRITE_HEADER", false)
        .with_parser_flag("REQUIRE_HEADER", false)
}

#[test]
fn can_be_applied_to_any_topic() {
    let serde = SmileSerde::new();
    for target in [Target::Key, Target::Value] {
        assert!(serde.can_serialize("test", target));
        assert!(serde.can_deserialize("test", target));
        assert!(serde.schema("test", target).is_none());
    }
}

#[test]
fn serialize_and_deserialize_work_in_pair() {
    let mut serde = SmileSerde::new();
    serde.configure(&SerdeProperties::new()).unwrap();
    for doc in DOCUMENTS {
        let bytes = serde.serializer("test", Target::Value).serialize(doc).unwrap();
        let result = serde
            .deserializer("test", Target::Value)
            .deserialize(&[], &bytes)
            .unwrap();
        assert_eq!(result.kind, DeserializeResultType::Json);
        assert!(result.additional_properties.is_empty());
        assert_json_eq(doc, &result.result);
    }
}

#[test]
fn integers_and_floats_keep_their_text_form() {
    let serde = SmileSerde::new();
    let ser = serde.serializer("test", Target::Key);
    let de = serde.deserializer("test", Target::Key);
    for (input, output) in [("123", "123"), ("123.123", "123.123"), ("1.0", "1.0")] {
        let bytes = ser.serialize(input).unwrap();
        assert_eq!(de.deserialize(&[], &bytes).unwrap().result, output);
    }
}

#[test]
fn payload_starts_with_smile_prefix_by_default() {
    let serde = SmileSerde::new();
    for doc in DOCUMENTS {
        let bytes = serde.serializer("test", Target::Value).serialize(doc).unwrap();
        assert!(bytes.starts_with(b":)"), "doc={doc}");
    }
}

#[test]
fn generator_and_parser_features_can_be_tuned_via_config() {
    let mut serde = SmileSerde::new();
    serde.configure(&headerless_properties()).unwrap();

    let json = r#"{ "name": "Clark Kent",  "age": 35 }"#;
    let bytes = serde.serializer("test", Target::Value).serialize(json).unwrap();
    assert!(!bytes.starts_with(b":)"));

    let result = serde
        .deserializer("test", Target::Value)
        .deserialize(&[], &bytes)
        .unwrap();
    assert_json_eq(json, &result.result);
}

#[test]
fn features_can_be_tuned_via_toml() {
    let props = SerdeProperties::from_toml_str(
        "[generator]\nWRITE_HEADER = false\n\n[parser]\nREQUIRE_HEADER = false\n",
    )
    .unwrap();
    assert_eq!(props, headerless_properties());

    let mut serde = SmileSerde::new();
    serde.configure(&props).unwrap();
    let bytes = serde.serializer("t", Target::Value).serialize("[1]").unwrap();
    assert_eq!(bytes, [0xf8, 0xc2, 0xf9]);
}

#[test]
fn reconfiguring_does_not_affect_existing_serializers() {
    let mut serde = SmileSerde::new();
    let with_header = serde.serializer("test", Target::Value);
    let strict = serde.deserializer("test", Target::Value);

    serde.configure(&headerless_properties()).unwrap();
    let without_header = serde.serializer("test", Target::Value);
    let lenient = serde.deserializer("test", Target::Value);

    let a = with_header.serialize("{}").unwrap();
    let b = without_header.serialize("{}").unwrap();
    assert!(a.starts_with(b":)"));
    assert_eq!(b, [0xfa, 0xfb]);

    assert!(matches!(
        strict.deserialize(&[], &b),
        Err(SerdeError::Deserialization(_))
    ));
    assert_eq!(lenient.deserialize(&[], &b).unwrap().result, "{}");
    assert_eq!(lenient.deserialize(&[], &a).unwrap().result, "{}");
}

#[test]
fn configuration_errors() {
    let mut serde = SmileSerde::new();

    let err = serde
        .configure(&SerdeProperties::new().with_generator_flag("WRITE_HEDAER", false))
        .unwrap_err();
    assert!(matches!(err, SerdeError::Configuration(ConfigError::Feature(_))));

    let err = SerdeProperties::from_toml_str("[parser]\nREQUIRE_HEADER = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    // the failed attempt applied nothing
    let bytes = serde.serializer("test", Target::Value).serialize("1").unwrap();
    assert!(bytes.starts_with(b":)"));
}

#[test]
fn serialization_and_deserialization_errors() {
    let serde = SmileSerde::new();
    let err = serde
        .serializer("test", Target::Value)
        .serialize(r#"{"name": "Clark"#)
        .unwrap_err();
    assert!(matches!(err, SerdeError::Serialization(_)));

    let de = serde.deserializer("test", Target::Value);
    let payloads: [&[u8]; 4] = [b"", b":)\n\x01", b":)\n\x01\xfa\x80a", b":)\n\x01\x27"];
    for payload in payloads {
        assert!(
            matches!(de.deserialize(&[], payload), Err(SerdeError::Deserialization(_))),
            "payload={payload:?}"
        );
    }
}

#[test]
fn configured_serde_is_shared_across_threads() {
    let mut serde = SmileSerde::new();
    serde
        .configure(&SerdeProperties::new().with_generator_flag("CHECK_SHARED_STRING_VALUES", true))
        .unwrap();
    let ser = Arc::new(serde.serializer("test", Target::Value));
    let de = Arc::new(serde.deserializer("test", Target::Value));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let ser = Arc::clone(&ser);
            let de = Arc::clone(&de);
            thread::spawn(move || {
                let doc = format!(r#"{{"worker":{i},"tags":["x","x","x"]}}"#);
                let bytes = ser.serialize(&doc).unwrap();
                de.deserialize(&[], &bytes).unwrap().result == doc
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

proptest! {
    /// Every object of string members round-trips through a configured pair.
    #[test]
    fn string_objects_roundtrip(
        fields in prop::collection::vec(("[a-z]{1,12}", "\\PC{0,40}"), 0..16),
        headerless in any::<bool>(),
    ) {
        let mut serde = SmileSerde::new();
        if headerless {
            serde.configure(&headerless_properties()).unwrap();
        }
        let doc = Value::Object(
            fields.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
        );
        let text = doc.to_string();
        let bytes = serde.serializer("t", Target::Value).serialize(&text).unwrap();
        prop_assert_eq!(bytes.starts_with(b":)\n"), !headerless);
        let out = serde.deserializer("t", Target::Value).deserialize(&[], &bytes).unwrap();
        let reparsed: Value = serde_json::from_str(&out.result).unwrap();
        prop_assert_eq!(reparsed, doc);
    }
}
