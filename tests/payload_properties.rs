//! Property tests for the raw-events wire payload.

use proptest::prelude::*;
use seqlog::{Fields, LogEntry, dispatcher::serialise_payload};
use serde_json::{Map, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        Just(Value::Null),
        "[a-zA-Z0-9 _.-]{0,12}".prop_map(Value::String),
    ]
}

fn property_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
            .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
    })
}

fn fields() -> impl Strategy<Value = Option<Fields>> {
    prop::option::of(
        prop::collection::btree_map("[a-zA-Z]{1,8}", property_value(), 0..5)
            .prop_map(|m| m.into_iter().collect::<Fields>()),
    )
}

proptest! {
    #[test]
    fn payload_reproduces_entry(
        level in "[A-Za-z]{1,12}",
        message in "[ -~]{1,40}",
        fields in fields(),
    ) {
        let entry = LogEntry::new(&level, &message, fields.clone());
        let body = serialise_payload(&entry).expect("serialise");
        let parsed: Value = serde_json::from_str(&body).expect("parse");

        let events = parsed["Events"].as_array().expect("events array");
        prop_assert_eq!(events.len(), 1);
        let event = &events[0];
        prop_assert_eq!(event["Timestamp"].as_str(), Some(entry.timestamp.as_str()));
        prop_assert_eq!(event["Level"].as_str(), Some(level.as_str()));
        prop_assert_eq!(event["MessageTemplate"].as_str(), Some(message.as_str()));
        match fields {
            Some(fields) => prop_assert_eq!(&event["Properties"], &Value::Object(fields)),
            None => prop_assert!(event.get("Properties").is_none()),
        }
    }
}
