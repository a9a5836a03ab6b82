//! Native-value conversion: a serde serializer that builds a [`Value`] tree
//! directly, so leaves without a JSON shape (non-finite numbers, non-string
//! map keys) fail instead of degrading to `null` on the way through a JSON
//! writer.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{self, Serialize};

use super::Value;

#[derive(Debug)]
pub(super) struct NativeError(String);

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NativeError {}

impl ser::Error for NativeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        NativeError(msg.to_string())
    }
}

pub(super) struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = NativeError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTaggedArray;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeTaggedObject;

    fn serialize_bool(self, v: bool) -> Result<Value, NativeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, NativeError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value, NativeError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value, NativeError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value, NativeError> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, NativeError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value, NativeError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value, NativeError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value, NativeError> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, NativeError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value, NativeError> {
        if v.is_finite() {
            Ok(Value::Number(v))
        } else {
            Err(ser::Error::custom(format!(
                "non-finite number {v} has no JSON form"
            )))
        }
    }

    fn serialize_char(self, v: char) -> Result<Value, NativeError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, NativeError> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, NativeError> {
        Ok(Value::Array(
            v.iter().map(|b| Value::Number(f64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value, NativeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, NativeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, NativeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, NativeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Value, NativeError> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, NativeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, NativeError> {
        let mut entries = BTreeMap::new();
        entries.insert(variant.to_owned(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(entries))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, NativeError> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, NativeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, NativeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTaggedArray, NativeError> {
        Ok(SerializeTaggedArray {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeObject, NativeError> {
        Ok(SerializeObject {
            entries: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<SerializeObject, NativeError> {
        self.serialize_map(None)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeTaggedObject, NativeError> {
        Ok(SerializeTaggedObject {
            variant,
            entries: BTreeMap::new(),
        })
    }
}

pub(super) struct SerializeArray {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NativeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NativeError> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NativeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NativeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NativeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, NativeError> {
        ser::SerializeSeq::end(self)
    }
}

pub(super) struct SerializeTaggedArray {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTaggedArray {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NativeError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NativeError> {
        let mut entries = BTreeMap::new();
        entries.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Object(entries))
    }
}

pub(super) struct SerializeObject {
    entries: BTreeMap<String, Value>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), NativeError> {
        match key.serialize(ValueSerializer)? {
            Value::String(s) => {
                self.pending_key = Some(s);
                Ok(())
            }
            other => Err(ser::Error::custom(format!(
                "map key must be a string, got {other:?}"
            ))),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), NativeError> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ser::Error::custom("map value emitted without a key"))?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NativeError> {
        Ok(Value::Object(self.entries))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NativeError> {
        self.entries
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NativeError> {
        Ok(Value::Object(self.entries))
    }
}

pub(super) struct SerializeTaggedObject {
    variant: &'static str,
    entries: BTreeMap<String, Value>,
}

impl ser::SerializeStructVariant for SerializeTaggedObject {
    type Ok = Value;
    type Error = NativeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), NativeError> {
        self.entries
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, NativeError> {
        let mut wrapper = BTreeMap::new();
        wrapper.insert(self.variant.to_owned(), Value::Object(self.entries));
        Ok(Value::Object(wrapper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_keys_must_be_strings() {
        let mut string_keys = std::collections::HashMap::new();
        string_keys.insert("k".to_string(), 1u8);
        assert!(string_keys.serialize(ValueSerializer).is_ok());

        let mut array_keys = std::collections::HashMap::new();
        array_keys.insert(vec![1u8], 1u8);
        assert!(array_keys.serialize(ValueSerializer).is_err());
    }

    #[test]
    fn test_enums_take_their_tagged_json_shape() {
        #[derive(serde::Serialize)]
        enum Shape {
            Unit,
            Pair(u8, u8),
            Fields { x: u8 },
        }

        assert_eq!(
            Shape::Unit.serialize(ValueSerializer).unwrap(),
            Value::from("Unit")
        );

        let pair = Shape::Pair(1, 2).serialize(ValueSerializer).unwrap();
        assert_eq!(
            pair.as_object().unwrap()["Pair"],
            Value::from(vec![1, 2])
        );

        let fields = Shape::Fields { x: 9 }.serialize(ValueSerializer).unwrap();
        assert_eq!(
            fields.as_object().unwrap()["Fields"],
            [("x", Value::from(9))].into_iter().collect()
        );
    }
}
