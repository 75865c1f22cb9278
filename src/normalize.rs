//! Normalization: draining every lazy container in a `Value` tree into an
//! eager, in-memory form.
//!
//! Structural equality (`Value`'s `PartialEq` impl) is only meaningful
//! between two normalized trees — comparing two values straight off a
//! decode, before draining their containers, is defined to be `false`
//! rather than a panic or an implicit drain. Call `to_primitive` on both
//! sides first when a real comparison is needed, e.g. in a
//! decode-then-compare test.

use crate::error::CodecError;
use crate::value::{Field, List, Map, MapItem, Set, Struct, Value};

/// Recursively drains `value`'s containers, replacing every reader-backed
/// `Lazy` with an eager one. Fails with whatever error first interrupted a
/// drain — typically a `DecodeError` surfacing from a container whose body
/// turned out to be truncated or malformed.
pub fn to_primitive(value: Value) -> Result<Value, CodecError> {
    Ok(match value {
        Value::Bool(_)
        | Value::Byte(_)
        | Value::Double(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::Binary(_) => value,
        Value::Struct(mut s) => {
            let mut fields = Vec::new();
            s.fields.for_each(|f| {
                fields.push(Field {
                    id: f.id,
                    value: to_primitive(f.value)?,
                });
                Ok(())
            })?;
            trace!("normalized struct: {} fields", fields.len());
            Value::Struct(Struct::new(fields))
        }
        Value::Map(mut m) => {
            let key_type = m.key_type;
            let value_type = m.value_type;
            let mut items = Vec::new();
            m.items.for_each(|item| {
                items.push(MapItem {
                    key: to_primitive(item.key)?,
                    value: to_primitive(item.value)?,
                });
                Ok(())
            })?;
            trace!("normalized map: {} items", items.len());
            Value::Map(Map::new(key_type, value_type, items))
        }
        Value::Set(mut s) => {
            let element_type = s.element_type;
            let mut items = Vec::new();
            s.items.for_each(|v| {
                items.push(to_primitive(v)?);
                Ok(())
            })?;
            trace!("normalized set: {} items", items.len());
            Value::Set(Set::new(element_type, items))
        }
        Value::List(mut l) => {
            let element_type = l.element_type;
            let mut items = Vec::new();
            l.items.for_each(|v| {
                items.push(to_primitive(v)?);
                Ok(())
            })?;
            trace!("normalized list: {} items", items.len());
            Value::List(List::new(element_type, items))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::wire_type::WireType;

    #[test]
    fn normalized_decode_compares_equal_to_eager_construction() {
        let decoded = decode(&[0x02, 0x00, 0x01, 0x01, 0x00], WireType::Struct).unwrap();
        let normalized = to_primitive(decoded).unwrap();
        let expected = Value::Struct(Struct::new(vec![Field {
            id: 1,
            value: Value::Bool(true),
        }]));
        assert_eq!(normalized, expected);
    }

    #[test]
    fn un_normalized_decode_never_compares_equal() {
        let decoded = decode(&[0x00], WireType::Struct).unwrap();
        let expected = Value::Struct(Struct::new(vec![]));
        assert_ne!(decoded, expected);
    }

    #[test]
    fn normalizing_drains_nested_containers_too() {
        let bytes = [
            0x0F, 0x00, 0x01, // field 1: a list
            0x0B, 0x00, 0x00, 0x00, 0x02, // element type binary, count 2
            0x00, 0x00, 0x00, 0x01, b'a', // "a"
            0x00, 0x00, 0x00, 0x01, b'b', // "b"
            0x00, // struct STOP
        ];
        let decoded = decode(&bytes, WireType::Struct).unwrap();
        let normalized = to_primitive(decoded).unwrap();
        match &normalized {
            Value::Struct(s) => {
                let fields = s.fields.as_eager().unwrap();
                assert_eq!(fields.len(), 1);
                match &fields[0].value {
                    Value::List(l) => assert_eq!(l.items.as_eager().unwrap().len(), 2),
                    other => panic!("expected a list, got {:?}", other),
                }
            }
            other => panic!("expected a struct, got {:?}", other),
        }
    }
}
