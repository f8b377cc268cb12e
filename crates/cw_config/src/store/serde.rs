use alloc::string::{String, ToString};
use core::fmt::{self, Formatter};

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::store::{ListSection, Node, Section, Value};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::List(v) => v.serialize(serializer),
            Self::Section(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for ListSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Comments are not part of the serialized form.
impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, node) in self.iter() {
            state.serialize_entry(key, node)?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

/// A node that may be null. Null entries are dropped from sections and lists.
struct MaybeNode(Option<Node>);

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = MaybeNode;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a document node")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(MaybeNode(Some(Node::Value(Value::Bool(v)))))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(MaybeNode(Some(Node::Value(Value::Int(v)))))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let value = match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::String(v.to_string()),
        };
        Ok(MaybeNode(Some(Node::Value(value))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(MaybeNode(Some(Node::Value(Value::Float(v)))))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(MaybeNode(Some(Node::Value(Value::String(v.into())))))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(MaybeNode(Some(Node::Value(Value::String(v)))))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MaybeNode(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(MaybeNode(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = ListSection::new();
        while let Some(MaybeNode(item)) = seq.next_element::<MaybeNode>()? {
            if let Some(item) = item {
                list.push(item);
            }
        }
        Ok(MaybeNode(Some(Node::List(list))))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut section = Section::new();
        while let Some(key) = map.next_key::<KeyString>()? {
            let MaybeNode(value) = map.next_value::<MaybeNode>()?;
            if let Some(value) = value {
                section.insert(key.0, value);
            }
        }
        Ok(MaybeNode(Some(Node::Section(section))))
    }
}

impl<'de> Deserialize<'de> for MaybeNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Map keys in the document are strings, but formats such as YAML allow
/// scalar keys of other kinds; those are kept in their textual form.
struct KeyString(String);

impl<'de> Deserialize<'de> for KeyString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match MaybeNode::deserialize(deserializer)?.0 {
            Some(Node::Value(value)) => Ok(KeyString(value.to_text())),
            Some(other) => Err(de::Error::custom(alloc::format!(
                "a {} cannot be used as a section key",
                other.kind_name()
            ))),
            None => Err(de::Error::custom("null cannot be used as a section key")),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        MaybeNode::deserialize(deserializer)?
            .0
            .ok_or_else(|| de::Error::custom("null is not a document node"))
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)? {
            Node::Section(section) => Ok(section),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.kind_name()),
                &"a section",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{ListSection, Node, Section, Value};

    #[test]
    fn json_round_trip_keeps_order() {
        let section = Section::new()
            .with("name", "demo")
            .with("port", 8080_i64)
            .with("ratio", 0.5)
            .with("enabled", true)
            .with("tags", ListSection::new().with("a").with("b"))
            .with("nested", Section::new().with("x", 1_i64));

        let text = serde_json::to_string(&section).unwrap();
        assert_eq!(
            text,
            r#"{"name":"demo","port":8080,"ratio":0.5,"enabled":true,"tags":["a","b"],"nested":{"x":1}}"#
        );

        let back: Section = serde_json::from_str(&text).unwrap();
        assert_eq!(back, section);
    }

    #[test]
    fn nulls_are_dropped() {
        let back: Section = serde_json::from_str(r#"{"a":null,"b":[1,null,2]}"#).unwrap();
        assert!(back.iter().all(|(k, _)| k != "a"));
        assert_eq!(back.list("b").unwrap().len(), 2);
    }

    #[test]
    fn huge_unsigned_kept_as_text() {
        let node: Node = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(node, Node::Value(Value::String("18446744073709551615".into())));
    }

    #[test]
    fn root_must_be_section() {
        assert!(serde_json::from_str::<Section>("[1, 2]").is_err());
    }
}
