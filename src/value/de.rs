use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use super::Value;

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Shape-driven decoding: each JSON shape has exactly one entry point below,
/// so an input document always resolves to the same variant. Integers and
/// floats both land in `Number`.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON value (object, array, string, bool, number, or null)")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut object = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            object.insert(key, value);
        }
        Ok(Value::Object(object))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = access.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_shape_resolves_to_its_variant() {
        let cases: &[(&str, Value)] = &[
            (r#"{"a":1}"#, Value::Object(
                [("a".to_string(), Value::Number(1.0))].into_iter().collect(),
            )),
            ("[1,2]", Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])),
            (r#""text""#, Value::String("text".to_string())),
            ("true", Value::Bool(true)),
            ("3.25", Value::Number(3.25)),
            ("null", Value::Null),
        ];

        for (input, want) in cases {
            let got: Value = serde_json::from_str(input).unwrap();
            assert_eq!(&got, want, "input {input}");
        }
    }

    #[test]
    fn test_nested_containers_decode_recursively() {
        let got: Value = serde_json::from_str(r#"{"outer":{"inner":[null,false]}}"#).unwrap();
        let outer = got.as_object().unwrap();
        let inner = outer["outer"].as_object().unwrap();
        assert_eq!(
            inner["inner"],
            Value::Array(vec![Value::Null, Value::Bool(false)])
        );
    }
}
