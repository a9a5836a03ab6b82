use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::Value;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                // Whole numbers keep their integer wire form so the service
                // sees `42`, not `42.0`.
                match super::exact_i64(*n) {
                    Some(i) => serializer.serialize_i64(i),
                    None => serializer.serialize_f64(*n),
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut object = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    object.serialize_entry(key, value)?;
                }
                object.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tag_is_emitted() {
        let value = Value::Object(
            [("flag".to_string(), Value::Bool(true))]
                .into_iter()
                .collect(),
        );
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"flag":true}"#);
    }

    #[test]
    fn test_whole_numbers_serialize_as_integers() {
        assert_eq!(serde_json::to_string(&Value::Number(42.0)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&Value::Number(1.5)).unwrap(),
            "1.5"
        );
    }

    #[test]
    fn test_whole_numbers_outside_i64_range_stay_floats() {
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        let text = serde_json::to_string(&Value::Number(two_pow_63)).unwrap();
        assert_ne!(text, i64::MAX.to_string());
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            Value::Number(two_pow_63)
        );

        // i64::MIN is exactly representable and keeps the integer form.
        assert_eq!(
            serde_json::to_string(&Value::Number(i64::MIN as f64)).unwrap(),
            i64::MIN.to_string()
        );
    }

    #[test]
    fn test_null_serializes_bare() {
        assert_eq!(serde_json::to_string(&Value::Null).unwrap(), "null");
    }
}
