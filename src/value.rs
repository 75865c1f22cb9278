//! The value model: `Value`, and the container subtypes `Struct`, `Field`,
//! `Map`, `MapItem`, `Set`, `List` it's built from.

use std::sync::Arc;

use crate::error::ProgrammerError;
use crate::lazy::Lazy;
use crate::wire_type::WireType;

/// A tagged union carrying a wire type plus exactly one payload of that
/// type.
///
/// `Value` carries no lifetime parameter: unlike a zero-copy reader over a
/// borrowed buffer, every `Value` — including one fresh off a decode, with
/// its containers still reader-backed — owns everything it needs to
/// outlive the call that produced it. `Value::Binary` holds an `Arc<[u8]>`
/// rather than a `Vec<u8>` so cloning a decoded tree (e.g. to retry an
/// operation against two different sinks) doesn't copy payload bytes.
#[derive(Debug)]
pub enum Value {
    Bool(bool),
    Byte(i8),
    Double(f64),
    I16(i16),
    I32(i32),
    I64(i64),
    Binary(Arc<[u8]>),
    Struct(Struct),
    Map(Map),
    Set(Set),
    List(List),
}

/// A struct field: `(id, value)`. Field IDs need not be unique at this
/// layer — higher layers (generated from IDL) enforce uniqueness — and
/// field order on the wire is whatever order the producer iterated in.
#[derive(Debug)]
pub struct Field {
    pub id: i16,
    pub value: Value,
}

/// A finite sequence of fields, in producer order. Has no declared count on
/// the wire: the decoder keeps reading fields until it sees the STOP byte.
#[derive(Debug)]
pub struct Struct {
    pub fields: Lazy<Field>,
}

impl Struct {
    pub fn new(fields: Vec<Field>) -> Self {
        Struct {
            fields: Lazy::eager(fields),
        }
    }
}

/// One `(key, value)` entry of a `Map`. Both members must match the map's
/// declared key/value wire types.
#[derive(Debug)]
pub struct MapItem {
    pub key: Value,
    pub value: Value,
}

/// A map: a key wire type, a value wire type, and a lazy sequence of
/// entries.
#[derive(Debug)]
pub struct Map {
    pub key_type: WireType,
    pub value_type: WireType,
    pub items: Lazy<MapItem>,
}

impl Map {
    pub fn new(key_type: WireType, value_type: WireType, items: Vec<MapItem>) -> Self {
        Map {
            key_type,
            value_type,
            items: Lazy::eager(items),
        }
    }
}

/// A set: an element wire type and a lazy sequence of elements.
#[derive(Debug)]
pub struct Set {
    pub element_type: WireType,
    pub items: Lazy<Value>,
}

impl Set {
    pub fn new(element_type: WireType, items: Vec<Value>) -> Self {
        Set {
            element_type,
            items: Lazy::eager(items),
        }
    }
}

/// A list: same wire shape as `Set`, but a distinct wire type and a
/// distinct Rust type, since the format treats `Set` and `List` as
/// different container kinds even though they serialize identically.
#[derive(Debug)]
pub struct List {
    pub element_type: WireType,
    pub items: Lazy<Value>,
}

impl List {
    pub fn new(element_type: WireType, items: Vec<Value>) -> Self {
        List {
            element_type,
            items: Lazy::eager(items),
        }
    }
}

impl Value {
    /// The wire type of this value. Used by the encoder to pick the tag
    /// byte for a struct field or to validate an element against its
    /// container's declared type.
    pub fn wire_type(&self) -> WireType {
        match self {
            Value::Bool(_) => WireType::Bool,
            Value::Byte(_) => WireType::Byte,
            Value::Double(_) => WireType::Double,
            Value::I16(_) => WireType::I16,
            Value::I32(_) => WireType::I32,
            Value::I64(_) => WireType::I64,
            Value::Binary(_) => WireType::Binary,
            Value::Struct(_) => WireType::Struct,
            Value::Map(_) => WireType::Map,
            Value::Set(_) => WireType::Set,
            Value::List(_) => WireType::List,
        }
    }

    /// Returns `true` if this value's payload is a double classified as
    /// NaN. Spec. invariant 6: equality for NaN is tested via this
    /// predicate, never via bit-equality of the decoded value.
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Double(d) if d.is_nan())
    }
}

macro_rules! accessor {
    ($name:ident, $variant:ident, $t:ty) => {
        impl Value {
            #[doc = concat!("Extracts the payload, or a `ProgrammerError` if `self` is not `Value::", stringify!($variant), "`.")]
            pub fn $name(&self) -> Result<$t, ProgrammerError> {
                match self {
                    Value::$variant(v) => Ok(*v),
                    _ => Err(ProgrammerError::WrongVariant {
                        expected: stringify!($variant),
                    }),
                }
            }
        }
    };
}

accessor!(as_bool, Bool, bool);
accessor!(as_byte, Byte, i8);
accessor!(as_double, Double, f64);
accessor!(as_i16, I16, i16);
accessor!(as_i32, I32, i32);
accessor!(as_i64, I64, i64);

impl Value {
    /// Extracts the binary payload, or a `ProgrammerError` if `self` is not
    /// `Value::Binary`.
    pub fn as_binary(&self) -> Result<&Arc<[u8]>, ProgrammerError> {
        match self {
            Value::Binary(b) => Ok(b),
            _ => Err(ProgrammerError::WrongVariant { expected: "Binary" }),
        }
    }

    pub fn as_struct(&self) -> Result<&Struct, ProgrammerError> {
        match self {
            Value::Struct(s) => Ok(s),
            _ => Err(ProgrammerError::WrongVariant { expected: "Struct" }),
        }
    }

    pub fn as_struct_mut(&mut self) -> Result<&mut Struct, ProgrammerError> {
        match self {
            Value::Struct(s) => Ok(s),
            _ => Err(ProgrammerError::WrongVariant { expected: "Struct" }),
        }
    }

    pub fn as_map_mut(&mut self) -> Result<&mut Map, ProgrammerError> {
        match self {
            Value::Map(m) => Ok(m),
            _ => Err(ProgrammerError::WrongVariant { expected: "Map" }),
        }
    }

    pub fn as_set_mut(&mut self) -> Result<&mut Set, ProgrammerError> {
        match self {
            Value::Set(s) => Ok(s),
            _ => Err(ProgrammerError::WrongVariant { expected: "Set" }),
        }
    }

    pub fn as_list_mut(&mut self) -> Result<&mut List, ProgrammerError> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(ProgrammerError::WrongVariant { expected: "List" }),
        }
    }
}

/// Structural equality, defined only on fully-normalized values. A
/// comparison that reaches a still-reader-backed lazy container on either
/// side is `false`, not a panic — call [`crate::normalize::to_primitive`]
/// on both trees first if you need a meaningful answer.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            // Native `f64` equality already treats NaN as unequal to
            // itself, which is exactly invariant 6's "is-NaN" rule.
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => a.fields == b.fields,
            (Value::Map(a), Value::Map(b)) => {
                a.key_type == b.key_type && a.value_type == b.value_type && a.items == b.items
            }
            (Value::Set(a), Value::Set(b)) => {
                a.element_type == b.element_type && a.items == b.items
            }
            (Value::List(a), Value::List(b)) => {
                a.element_type == b.element_type && a.items == b.items
            }
            _ => false,
        }
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value == other.value
    }
}

impl PartialEq for MapItem {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}
