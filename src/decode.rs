//! The decoder: reads a `Value` from a byte source.
//!
//! Containers are returned with their bodies still reader-backed: decoding
//! a container's *header* is eager, but its *body* is only read when the
//! resulting `Lazy` is drained. All containers produced by one top-level
//! `decode` call share the same underlying source (`SharedSource`), because
//! a struct body has no length prefix: reading past an undrained nested
//! container leaves the shared cursor in the middle of that container's
//! bytes. A caller must fully drain one lazy container before touching its
//! sibling or parent, and the same discipline applies one level down,
//! between the codec's own internal steps: decoding field N+1 of a struct,
//! or element N+1 of a list, before field/element N's nested containers
//! have been drained will read from the wrong offset.

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;
use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};

use crate::error::DecodeError;
use crate::io::{ByteSource, ReaderSource, SharedSource, SliceSource};
use crate::lazy::Lazy;
use crate::value::{Field, List, Map, MapItem, Set, Struct, Value};
use crate::wire_type::{WireType, STOP};

/// Decodes a `Value` of the given top-level type from a byte slice.
///
/// The slice is copied once into an owned, reference-counted buffer so the
/// returned `Value` (and any lazy containers it holds) can outlive the
/// call, as required by `Value` carrying no lifetime parameter.
pub fn decode(bytes: &[u8], expected_type: WireType) -> Result<Value, DecodeError> {
    let source: SharedSource = Rc::new(RefCell::new(SliceSource::new(bytes.to_vec())));
    trace!(
        "decode: expected top-level type {:?}, {} bytes available",
        expected_type,
        bytes.len()
    );
    decode_value(&source, expected_type)
}

/// Decodes a `Value` straight off an `std::io::Read`, without buffering the
/// whole input up front.
pub fn decode_from_reader<R: Read + 'static>(
    reader: R,
    expected_type: WireType,
) -> Result<Value, DecodeError> {
    let source: SharedSource = Rc::new(RefCell::new(ReaderSource::new(reader)));
    trace!("decode_from_reader: expected top-level type {:?}", expected_type);
    decode_value(&source, expected_type)
}

fn read_n(source: &SharedSource, n: usize) -> Result<Box<[u8]>, DecodeError> {
    source.borrow_mut().read_exact(n)
}

fn read_u8(source: &SharedSource) -> Result<u8, DecodeError> {
    Ok(read_n(source, 1)?[0])
}

fn read_i16(source: &SharedSource) -> Result<i16, DecodeError> {
    Ok(BigEndian::read_i16(&read_n(source, 2)?))
}

fn read_i32(source: &SharedSource) -> Result<i32, DecodeError> {
    Ok(BigEndian::read_i32(&read_n(source, 4)?))
}

fn read_i64(source: &SharedSource) -> Result<i64, DecodeError> {
    Ok(BigEndian::read_i64(&read_n(source, 8)?))
}

fn read_u64(source: &SharedSource) -> Result<u64, DecodeError> {
    Ok(BigEndian::read_u64(&read_n(source, 8)?))
}

pub(crate) fn decode_value(source: &SharedSource, ty: WireType) -> Result<Value, DecodeError> {
    match ty {
        WireType::Bool => match read_u8(source)? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            other => Err(DecodeError::InvalidBoolean(other)),
        },
        WireType::Byte => Ok(Value::Byte(read_u8(source)? as i8)),
        WireType::Double => Ok(Value::Double(f64::from_bits(read_u64(source)?))),
        WireType::I16 => Ok(Value::I16(read_i16(source)?)),
        WireType::I32 => Ok(Value::I32(read_i32(source)?)),
        WireType::I64 => Ok(Value::I64(read_i64(source)?)),
        WireType::Binary => {
            let len = read_i32(source)?;
            if len < 0 {
                return Err(DecodeError::NegativeLength {
                    field: "binary length",
                    value: len,
                });
            }
            let bytes = read_n(source, len as usize)?;
            Ok(Value::Binary(Arc::from(bytes)))
        }
        WireType::Struct => decode_struct(source),
        WireType::Map => decode_map(source),
        WireType::Set => decode_set(source),
        WireType::List => decode_list(source),
    }
}

fn decode_struct(source: &SharedSource) -> Result<Value, DecodeError> {
    let src = Rc::clone(source);
    let fields = Lazy::unbounded(move || {
        let tag = read_u8(&src)?;
        if tag == STOP {
            return Ok(None);
        }
        let field_type = WireType::from_tag(tag)?;
        let id = read_i16(&src)?;
        let value = decode_value(&src, field_type)?;
        Ok(Some(Field { id, value }))
    });
    Ok(Value::Struct(Struct { fields }))
}

fn decode_map(source: &SharedSource) -> Result<Value, DecodeError> {
    let key_type = WireType::from_tag(read_u8(source)?)?;
    let value_type = WireType::from_tag(read_u8(source)?)?;
    let count = read_i32(source)?;
    if count < 0 {
        return Err(DecodeError::NegativeLength {
            field: "map count",
            value: count,
        });
    }

    let src = Rc::clone(source);
    let items = Lazy::bounded(count as usize, move || {
        let key = decode_value(&src, key_type)?;
        let value = decode_value(&src, value_type)?;
        Ok(MapItem { key, value })
    });
    Ok(Value::Map(Map {
        key_type,
        value_type,
        items,
    }))
}

fn decode_element_header(source: &SharedSource, what: &'static str) -> Result<(WireType, usize), DecodeError> {
    let element_type = WireType::from_tag(read_u8(source)?)?;
    let count = read_i32(source)?;
    if count < 0 {
        return Err(DecodeError::NegativeLength {
            field: what,
            value: count,
        });
    }
    Ok((element_type, count as usize))
}

fn decode_set(source: &SharedSource) -> Result<Value, DecodeError> {
    let (element_type, count) = decode_element_header(source, "set count")?;
    let src = Rc::clone(source);
    let items = Lazy::bounded(count, move || decode_value(&src, element_type));
    Ok(Value::Set(Set {
        element_type,
        items,
    }))
}

fn decode_list(source: &SharedSource) -> Result<Value, DecodeError> {
    let (element_type, count) = decode_element_header(source, "list count")?;
    let src = Rc::clone(source);
    let items = Lazy::bounded(count, move || decode_value(&src, element_type));
    Ok(Value::List(List {
        element_type,
        items,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_concrete_scenarios() {
        assert_eq!(decode(&[0x01], WireType::Bool).unwrap().as_bool().unwrap(), true);
        assert_eq!(
            decode(&[0x80, 0x00], WireType::I16).unwrap().as_i16().unwrap(),
            -32768
        );
        assert_eq!(
            decode(&[0x80, 0x00, 0x00, 0x00], WireType::I32)
                .unwrap()
                .as_i32()
                .unwrap(),
            i32::MIN
        );
        assert_eq!(
            decode(
                &[0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF],
                WireType::I64
            )
            .unwrap()
            .as_i64()
            .unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn rejects_unknown_top_level_tag() {
        // A negative length on a `Binary` value, deliberately routed
        // through the generic byte stream rather than `WireType::from_tag`
        // (which is exercised directly in `wire_type.rs`): decoding a
        // top-level value of an expected type never consults the tag byte
        // of `expected_type` itself, so this instead exercises the same
        // "unknown tag" failure path a corrupt struct field would hit.
        let err = WireType::from_tag(0x07).unwrap_err();
        assert!(crate::error::is_decode_error(&err.into()));
    }

    #[test]
    fn negative_binary_length_is_a_decode_error() {
        let bytes = [0xFF, 0x30, 0x30, 0x30];
        let err = decode(&bytes, WireType::Binary).unwrap_err();
        match err {
            DecodeError::NegativeLength { field, value } => {
                assert_eq!(field, "binary length");
                assert!(value < 0);
            }
            other => panic!("expected NegativeLength, got {:?}", other),
        }
    }

    #[test]
    fn invalid_boolean_byte_is_a_decode_error() {
        let bytes = [0x02, 0x00, 0x00, 0x00, 0x01, 0x10];
        let list = decode(&bytes, WireType::List).unwrap();
        let mut list = list;
        let err = list
            .as_list_mut()
            .unwrap()
            .items
            .for_each(|_| Ok(()))
            .unwrap_err();
        assert!(crate::error::is_decode_error(&err));
    }

    #[test]
    fn map_body_error_surfaces_during_iteration() {
        // key type i64, value type binary, declared count 1 — the header
        // alone decodes fine; only draining the (truncated) body fails.
        let bytes = [0x0A, 0x0B, 0x00, 0x00, 0x00, 0x01, 0xAA, 0xBB];
        let mut value = decode(&bytes, WireType::Map).unwrap();
        let err = value
            .as_map_mut()
            .unwrap()
            .items
            .for_each(|_| Ok(()))
            .unwrap_err();
        assert!(crate::error::is_decode_error(&err));
    }

    #[test]
    fn struct_stop_terminates_with_no_fields() {
        let mut value = decode(&[0x00], WireType::Struct).unwrap();
        let mut seen = 0;
        value
            .as_struct_mut()
            .unwrap()
            .fields
            .for_each(|_| {
                seen += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, 0);
    }

    #[test]
    fn struct_with_one_bool_field() {
        let mut value = decode(&[0x02, 0x00, 0x01, 0x01, 0x00], WireType::Struct).unwrap();
        let mut ids = Vec::new();
        value
            .as_struct_mut()
            .unwrap()
            .fields
            .for_each(|f| {
                ids.push(f.id);
                assert_eq!(f.value.as_bool().unwrap(), true);
                Ok(())
            })
            .unwrap();
        assert_eq!(ids, vec![1]);
    }
}
