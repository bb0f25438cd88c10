//! Message payloads accepted by the facade and their rendering to text
//!
//! A payload is rendered by exactly one of these branches, in order:
//!
//! 1. a structured [`FieldMap`] is dumped as sorted, pretty-printed JSON
//! 2. a [`Loggable`] value with a JSON form uses that JSON
//! 3. a [`Loggable`] value with a mapping form dumps that mapping as in (1)
//! 4. anything else passes through unchanged

use super::error::Result;
use super::log_context::{FieldMap, FieldValue};
use serde::Serialize;
use std::fmt;

/// Capabilities a domain value may expose to control how it is logged.
///
/// Both methods default to `None`; the value's `Display` output is used when
/// neither is provided.
pub trait Loggable: fmt::Display + Send + Sync {
    /// JSON representation of the value
    fn to_json(&self) -> Option<String> {
        None
    }

    /// Plain mapping representation of the value
    fn to_map(&self) -> Option<FieldMap> {
        None
    }
}

/// Message payload of a single log call
pub enum Message {
    Text(String),
    Map(FieldMap),
    Object(Box<dyn Loggable>),
}

impl Message {
    /// Wrap a value exposing [`Loggable`] capabilities
    pub fn object(value: impl Loggable + 'static) -> Self {
        Message::Object(Box::new(value))
    }

    /// Build a structured payload from any serializable value.
    ///
    /// Values that serialize to a JSON object become [`Message::Map`]; any
    /// other shape becomes its compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](super::LoggerError::JsonError)
    /// when the value cannot be serialized.
    pub fn serialized<T: Serialize>(value: &T) -> Result<Self> {
        let json = serde_json::to_value(value)?;
        Ok(match FieldValue::from(json) {
            FieldValue::Map(map) => Message::Map(map),
            other => Message::Text(other.to_json_value().to_string()),
        })
    }

    /// Render this payload to the text written to the engine
    pub fn format(&self) -> String {
        match self {
            Message::Text(text) => text.clone(),
            Message::Map(map) => dump_map(map),
            Message::Object(value) => {
                if let Some(json) = value.to_json() {
                    json
                } else if let Some(map) = value.to_map() {
                    dump_map(&map)
                } else {
                    value.to_string()
                }
            }
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Message::Object(value) => f.debug_tuple("Object").field(&value.to_string()).finish(),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<FieldMap> for Message {
    fn from(map: FieldMap) -> Self {
        Message::Map(map)
    }
}

impl From<Box<dyn Loggable>> for Message {
    fn from(value: Box<dyn Loggable>) -> Self {
        Message::Object(value)
    }
}

/// Deterministic, human-readable dump of a mapping.
///
/// Keys are sorted and the output is valid JSON, so parsing it back yields
/// an equal mapping.
pub fn dump_map(map: &FieldMap) -> String {
    let value = FieldValue::Map(map.clone()).to_json_value();
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    struct Order {
        id: i64,
    }

    impl fmt::Display for Order {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Order #{}", self.id)
        }
    }

    impl Loggable for Order {
        fn to_json(&self) -> Option<String> {
            Some(format!("{{\"id\":{}}}", self.id))
        }

        fn to_map(&self) -> Option<FieldMap> {
            panic!("to_json takes priority over to_map");
        }
    }

    struct Invoice {
        total: i64,
    }

    impl fmt::Display for Invoice {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Invoice")
        }
    }

    impl Loggable for Invoice {
        fn to_map(&self) -> Option<FieldMap> {
            let mut map = FieldMap::new();
            map.insert("total".to_string(), FieldValue::Int(self.total));
            Some(map)
        }
    }

    struct Plain;

    impl fmt::Display for Plain {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "plain value")
        }
    }

    impl Loggable for Plain {}

    #[test]
    fn test_text_passes_through() {
        assert_eq!(Message::from("hello\nworld").format(), "hello\nworld");
        assert_eq!(Message::from(String::new()).format(), "");
    }

    #[test]
    fn test_map_dump_is_sorted_and_reparses() {
        let mut map = FieldMap::new();
        map.insert("zeta".to_string(), FieldValue::Int(1));
        map.insert("alpha".to_string(), FieldValue::from(vec!["a", "b"]));

        let dumped = Message::from(map.clone()).format();
        assert!(dumped.find("alpha").unwrap() < dumped.find("zeta").unwrap());

        let reparsed: FieldMap = serde_json::from_str(&dumped).unwrap();
        assert_eq!(reparsed, map);
    }

    #[test]
    fn test_to_json_has_priority() {
        assert_eq!(Message::object(Order { id: 9 }).format(), "{\"id\":9}");
    }

    #[test]
    fn test_to_map_dumped_like_mapping() {
        let mut expected = FieldMap::new();
        expected.insert("total".to_string(), FieldValue::Int(42));

        let formatted = Message::object(Invoice { total: 42 }).format();
        assert_eq!(formatted, dump_map(&expected));
    }

    #[test]
    fn test_object_without_capabilities_uses_display() {
        assert_eq!(Message::object(Plain).format(), "plain value");
    }

    #[test]
    fn test_serialized_struct_becomes_map() {
        #[derive(Serialize)]
        struct Payload {
            user: &'static str,
            retries: u8,
        }

        let message = Message::serialized(&Payload { user: "ann", retries: 2 }).unwrap();
        let Message::Map(map) = &message else {
            panic!("expected map payload");
        };
        assert_eq!(map.get("retries"), Some(&FieldValue::Int(2)));

        let scalar = Message::serialized(&[1, 2, 3]).unwrap();
        assert_eq!(scalar.format(), "[1,2,3]");
    }
}
