//! Wire type code table.
//!
//! A single source of truth mapping every logical Thrift type to its
//! one-byte wire tag, shared by the encoder and the decoder so the two can
//! never drift apart.

use num_traits::FromPrimitive;

use crate::error::DecodeError;

/// The byte that terminates a struct's field sequence.
pub const STOP: u8 = 0x00;

/// A Thrift binary-protocol wire type, and the one-byte tag it is encoded
/// as.
///
/// Tag values `0x00` (outside the struct-terminator position), `0x01`,
/// `0x05`, `0x07` and `0x09` are unused by the format and are not
/// represented here; `WireType::from_tag` rejects them rather than treating
/// them as skippable.
#[allow(bad_style)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive)]
pub enum WireType {
    Bool = 0x02,
    Byte = 0x03,
    Double = 0x04,
    I16 = 0x06,
    I32 = 0x08,
    I64 = 0x0A,
    Binary = 0x0B,
    Struct = 0x0C,
    Map = 0x0D,
    Set = 0x0E,
    List = 0x0F,
}

impl WireType {
    /// The one-byte tag this type is encoded as on the wire.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Maps a raw tag byte read off the wire to a `WireType`.
    pub fn from_tag(tag: u8) -> Result<Self, DecodeError> {
        WireType::from_u8(tag).ok_or(DecodeError::UnknownTypeTag(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trip() {
        let all = [
            WireType::Bool,
            WireType::Byte,
            WireType::Double,
            WireType::I16,
            WireType::I32,
            WireType::I64,
            WireType::Binary,
            WireType::Struct,
            WireType::Map,
            WireType::Set,
            WireType::List,
        ];
        for ty in all {
            assert_eq!(WireType::from_tag(ty.tag()).unwrap(), ty);
        }
    }

    #[test]
    fn unused_tags_rejected() {
        for tag in [0x00, 0x01, 0x05, 0x07, 0x09] {
            assert!(WireType::from_tag(tag).is_err());
        }
    }
}
