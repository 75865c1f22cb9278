//! Encoder, decoder, and value model for the Thrift binary protocol.
//!
//! This crate covers the wire-level codec only: reading and writing
//! [`Value`] trees in Thrift's binary protocol encoding, plus the error
//! taxonomy and normalization helper that make decoded trees usable and
//! comparable. It does not parse or generate code from Thrift IDL, does
//! not implement a streaming transport, and does not understand the RPC
//! message envelope (method name, sequence id, call/reply framing) —
//! those live at a layer above this one.

//#![doc(html_root_url = "https://docs.rs/thrift-binary-codec/0.1.0")]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate num_derive;
extern crate num_traits;
extern crate byteorder;

mod decode;
mod encode;
mod error;
mod io;
mod lazy;
mod normalize;
mod value;
mod wire_type;

pub use crate::decode::{decode, decode_from_reader};
pub use crate::encode::encode;
pub use crate::error::{is_decode_error, CodecError, DecodeError, ProgrammerError};
pub use crate::io::{ByteSink, ByteSource, ReaderSource, SliceSource};
pub use crate::lazy::Lazy;
pub use crate::normalize::to_primitive;
pub use crate::value::{Field, List, Map, MapItem, Set, Struct, Value};
pub use crate::wire_type::{WireType, STOP};
