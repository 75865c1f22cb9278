//! The encoder: writes a `Value` to a byte sink.
//!
//! Draining a container's `Lazy` sequence requires `&mut`, so `encode` and
//! every helper below take `value: &mut Value` even though writing never
//! mutates a payload's semantic content — an already-eager `Value` is left
//! with its `Lazy`s marked consumed, same as after a `for_each` anywhere
//! else in this crate.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{CodecError, ProgrammerError};
use crate::io::ByteSink;
use crate::lazy::Lazy;
use crate::value::{Map, Struct, Value};
use crate::wire_type::{WireType, STOP};

/// Bit pattern every NaN double is canonicalized to on encode, regardless
/// of which NaN bit pattern produced it: encoding must be deterministic,
/// and `f64` has many bit patterns that are all equally "NaN".
const NAN_CANONICAL_BITS: u64 = 0x7FF8_0000_0000_0001;

/// Writes `value` to `sink`. Containers are drained in the process: a
/// `Value` that still holds reader-backed `Lazy` sequences reads them from
/// their original source and re-serializes them, rather than requiring the
/// caller to normalize first.
pub fn encode<S: ByteSink>(value: &mut Value, sink: &mut S) -> Result<(), CodecError> {
    trace!("encode: writing a {:?}", value.wire_type());
    write_payload(value, sink)
}

fn write_u8<S: ByteSink>(sink: &mut S, b: u8) -> Result<(), CodecError> {
    sink.write_all(&[b]).map_err(CodecError::Sink)
}

fn write_i16<S: ByteSink>(sink: &mut S, v: i16) -> Result<(), CodecError> {
    let mut buf = [0u8; 2];
    BigEndian::write_i16(&mut buf, v);
    sink.write_all(&buf).map_err(CodecError::Sink)
}

fn write_i32<S: ByteSink>(sink: &mut S, v: i32) -> Result<(), CodecError> {
    let mut buf = [0u8; 4];
    BigEndian::write_i32(&mut buf, v);
    sink.write_all(&buf).map_err(CodecError::Sink)
}

fn write_i64<S: ByteSink>(sink: &mut S, v: i64) -> Result<(), CodecError> {
    let mut buf = [0u8; 8];
    BigEndian::write_i64(&mut buf, v);
    sink.write_all(&buf).map_err(CodecError::Sink)
}

fn write_u64<S: ByteSink>(sink: &mut S, v: u64) -> Result<(), CodecError> {
    let mut buf = [0u8; 8];
    BigEndian::write_u64(&mut buf, v);
    sink.write_all(&buf).map_err(CodecError::Sink)
}

fn len_to_i32(len: usize) -> Result<i32, ProgrammerError> {
    if len > i32::MAX as usize {
        Err(ProgrammerError::LengthOverflow(len))
    } else {
        Ok(len as i32)
    }
}

fn canonical_bits(d: f64) -> u64 {
    if d.is_nan() {
        NAN_CANONICAL_BITS
    } else {
        d.to_bits()
    }
}

fn check_element_type(expected: WireType, found: WireType) -> Result<(), ProgrammerError> {
    if expected == found {
        Ok(())
    } else {
        Err(ProgrammerError::TypeMismatch)
    }
}

fn write_payload<S: ByteSink>(value: &mut Value, sink: &mut S) -> Result<(), CodecError> {
    match value {
        Value::Bool(b) => write_u8(sink, if *b { 1 } else { 0 }),
        Value::Byte(b) => write_u8(sink, *b as u8),
        Value::Double(d) => write_u64(sink, canonical_bits(*d)),
        Value::I16(v) => write_i16(sink, *v),
        Value::I32(v) => write_i32(sink, *v),
        Value::I64(v) => write_i64(sink, *v),
        Value::Binary(bytes) => {
            let len = len_to_i32(bytes.len())?;
            write_i32(sink, len)?;
            sink.write_all(bytes).map_err(CodecError::Sink)
        }
        Value::Struct(s) => write_struct(s, sink),
        Value::Map(m) => write_map(m, sink),
        Value::Set(s) => write_elements(s.element_type, &mut s.items, sink),
        Value::List(l) => write_elements(l.element_type, &mut l.items, sink),
    }
}

fn write_struct<S: ByteSink>(s: &mut Struct, sink: &mut S) -> Result<(), CodecError> {
    s.fields.for_each(|mut field| {
        write_u8(sink, field.value.wire_type().tag())?;
        write_i16(sink, field.id)?;
        write_payload(&mut field.value, sink)
    })?;
    write_u8(sink, STOP)
}

fn write_map<S: ByteSink>(m: &mut Map, sink: &mut S) -> Result<(), CodecError> {
    write_u8(sink, m.key_type.tag())?;
    write_u8(sink, m.value_type.tag())?;
    let count = m.items.size().unwrap_or(0);
    write_i32(sink, len_to_i32(count)?)?;

    let key_type = m.key_type;
    let value_type = m.value_type;
    m.items.for_each(|mut item| {
        check_element_type(key_type, item.key.wire_type())?;
        check_element_type(value_type, item.value.wire_type())?;
        write_payload(&mut item.key, sink)?;
        write_payload(&mut item.value, sink)
    })
}

fn write_elements<S: ByteSink>(
    element_type: WireType,
    items: &mut Lazy<Value>,
    sink: &mut S,
) -> Result<(), CodecError> {
    write_u8(sink, element_type.tag())?;
    let count = items.size().unwrap_or(0);
    write_i32(sink, len_to_i32(count)?)?;

    items.for_each(|mut v| {
        check_element_type(element_type, v.wire_type())?;
        write_payload(&mut v, sink)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Field, List, MapItem, Set};
    use std::sync::Arc;

    fn encode_bytes(value: &mut Value) -> Vec<u8> {
        let mut buf = Vec::new();
        encode(value, &mut buf).unwrap();
        buf
    }

    #[test]
    fn encodes_primitives() {
        assert_eq!(encode_bytes(&mut Value::Bool(true)), vec![0x01]);
        assert_eq!(encode_bytes(&mut Value::Bool(false)), vec![0x00]);
        assert_eq!(encode_bytes(&mut Value::I16(-32768)), vec![0x80, 0x00]);
        assert_eq!(
            encode_bytes(&mut Value::I32(i32::MIN)),
            vec![0x80, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode_bytes(&mut Value::Binary(Arc::from(&b"hello"[..]))),
            vec![0x00, 0x00, 0x00, 0x05, b'h', b'e', b'l', b'l', b'o']
        );
    }

    #[test]
    fn nan_is_canonicalized_regardless_of_bit_pattern() {
        let alt_nan = f64::from_bits(0x7FF8_0000_0000_0002);
        assert!(alt_nan.is_nan());
        let bytes = encode_bytes(&mut Value::Double(alt_nan));
        assert_eq!(BigEndian::read_u64(&bytes), NAN_CANONICAL_BITS);
    }

    #[test]
    fn encodes_empty_struct_with_stop_byte_only() {
        let mut s = Value::Struct(Struct::new(vec![]));
        assert_eq!(encode_bytes(&mut s), vec![0x00]);
    }

    #[test]
    fn encodes_struct_with_one_bool_field() {
        let mut s = Value::Struct(Struct::new(vec![Field {
            id: 1,
            value: Value::Bool(true),
        }]));
        assert_eq!(encode_bytes(&mut s), vec![0x02, 0x00, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn encodes_empty_map() {
        let mut m = Value::Map(Map::new(WireType::I64, WireType::Binary, vec![]));
        assert_eq!(
            encode_bytes(&mut m),
            vec![0x0A, 0x0B, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn encodes_set_of_bools() {
        let mut s = Value::Set(Set::new(
            WireType::Bool,
            vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)],
        ));
        assert_eq!(
            encode_bytes(&mut s),
            vec![0x02, 0x00, 0x00, 0x00, 0x03, 0x01, 0x00, 0x01]
        );
    }

    #[test]
    fn mismatched_element_type_is_a_programmer_error() {
        let mut l = Value::List(List::new(WireType::Bool, vec![Value::I32(1)]));
        let mut buf = Vec::new();
        let err = encode(&mut l, &mut buf).unwrap_err();
        assert!(!crate::error::is_decode_error(&err));
    }

    #[test]
    fn mismatched_map_key_type_is_a_programmer_error() {
        let mut m = Value::Map(Map::new(
            WireType::I64,
            WireType::Binary,
            vec![MapItem {
                key: Value::I32(1),
                value: Value::Binary(Arc::from(&b""[..])),
            }],
        ));
        let mut buf = Vec::new();
        let err = encode(&mut m, &mut buf).unwrap_err();
        assert!(!crate::error::is_decode_error(&err));
    }
}
