//! Property-based tests for the wire envelope

use chatline::shared::{EventKind, WsEvent};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_any_kind_name_survives_the_wire(kind in "[a-z_]{1,24}", text in ".*") {
        let event = WsEvent::new(kind.as_str(), serde_json::json!({ "text": text }));
        let decoded = WsEvent::from_json(&event.to_json().unwrap()).unwrap();

        prop_assert_eq!(decoded.kind.as_str(), kind.as_str());
        prop_assert_eq!(decoded.payload["text"].as_str(), Some(text.as_str()));
    }

    #[test]
    fn test_type_alias_accepted(kind in "[a-z_]{1,24}") {
        let frame = format!(r#"{{"type":"{kind}"}}"#);
        let decoded = WsEvent::from_json(&frame).unwrap();
        prop_assert_eq!(decoded.kind, EventKind::from(kind.as_str()));
        prop_assert!(decoded.payload.is_null());
    }
}
