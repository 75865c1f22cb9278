//! Error taxonomy.
//!
//! Two categories, kept as distinct types so a caller can't accidentally
//! treat a programmer mistake as recoverable malformed input or vice versa:
//! `DecodeError` for malformed/truncated wire data, `ProgrammerError` for
//! caller misuse of the API (wrong accessor, mismatched element type,
//! double iteration of a lazy sequence). `CodecError` unifies the two plus
//! sink I/O failures for the handful of call sites that can raise more than
//! one kind.

use std::io;

/// Malformed or truncated input, discovered either eagerly (decoding a
/// container header) or lazily (draining a container's body).
#[derive(Debug, Fail)]
pub enum DecodeError {
    #[fail(display = "unknown type tag 0x{:02X}", _0)]
    UnknownTypeTag(u8),
    #[fail(display = "invalid boolean byte 0x{:02X}, expected 0x00 or 0x01", _0)]
    InvalidBoolean(u8),
    #[fail(display = "negative {}: {}", field, value)]
    NegativeLength { field: &'static str, value: i32 },
    #[fail(
        display = "unexpected end of input: needed {} bytes, {} available",
        needed, available
    )]
    UnexpectedEof { needed: usize, available: usize },
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
    #[fail(display = "{}", _0)]
    Other(String),
}

impl DecodeError {
    pub(crate) fn other<S: Into<String>>(message: S) -> Self {
        DecodeError::Other(message.into())
    }
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::Io(e)
    }
}

/// A caller/programmer mistake: these indicate a bug in the code calling
/// into this crate, not a problem with wire data.
#[derive(Debug, Fail)]
pub enum ProgrammerError {
    #[fail(display = "expected a Value::{}, found a different variant", expected)]
    WrongVariant { expected: &'static str },
    #[fail(display = "value's wire type does not match its container's declared element type")]
    TypeMismatch,
    #[fail(display = "length {} does not fit in a signed 32-bit count", _0)]
    LengthOverflow(usize),
    #[fail(display = "lazy sequence was iterated more than once")]
    SequenceAlreadyConsumed,
}

/// Unifies `DecodeError` and `ProgrammerError`, plus sink I/O failures, for
/// the call sites that can raise more than one of the three. Most functions
/// in this crate raise exactly one concrete error type and use it directly;
/// `encode` and the lazy `for_each` traversals are the exceptions.
#[derive(Debug, Fail)]
pub enum CodecError {
    #[fail(display = "{}", _0)]
    Decode(#[cause] DecodeError),
    #[fail(display = "{}", _0)]
    Programmer(#[cause] ProgrammerError),
    #[fail(display = "{}", _0)]
    Sink(#[cause] io::Error),
}

impl From<DecodeError> for CodecError {
    fn from(e: DecodeError) -> Self {
        CodecError::Decode(e)
    }
}

impl From<ProgrammerError> for CodecError {
    fn from(e: ProgrammerError) -> Self {
        CodecError::Programmer(e)
    }
}

/// Classifies whether `e` stems from malformed input, as opposed to caller
/// misuse or a sink I/O failure.
pub fn is_decode_error(e: &CodecError) -> bool {
    matches!(e, CodecError::Decode(_))
}
