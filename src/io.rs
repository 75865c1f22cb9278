//! Byte sink and byte source: the two linear, non-seeking I/O contracts the
//! codec is built on. Neither ever seeks; a sink only appends, a source
//! only hands out the next `n` bytes.

use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::DecodeError;

/// "Append these bytes" and nothing else.
///
/// Blanket-implemented for anything that's `std::io::Write`, so a `Vec<u8>`,
/// a `File`, or a `TcpStream` all work as a sink without a bespoke adapter.
pub trait ByteSink {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<W: io::Write> ByteSink for W {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, bytes)
    }
}

/// "Give me exactly N bytes" and "have you more?".
///
/// A short read for a requested exact count is a decode error, not a
/// partial result: implementors must not return fewer bytes than asked.
pub trait ByteSource {
    fn read_exact(&mut self, n: usize) -> Result<Box<[u8]>, DecodeError>;
    fn has_remaining(&self) -> bool;
}

/// Handle to the single reader backing a decode call and every lazy
/// container it produced. Containers share this handle (via `Rc`) rather
/// than each owning a slice of the input, because the wire format gives
/// struct bodies no length prefix: the only way to find the end of a
/// struct, or to move on to the next sibling field, is to keep reading from
/// the same cursor the enclosing decode started with.
pub(crate) type SharedSource = Rc<RefCell<dyn ByteSource>>;

/// A `ByteSource` over an owned, reference-counted byte slice.
///
/// `Value` carries no lifetime parameter (normalization always produces an
/// owned tree), so a source backing a decoded `Value` must own its bytes
/// too, rather than borrowing a `&[u8]` the way a zero-copy reader would.
#[derive(Debug)]
pub struct SliceSource {
    data: Arc<[u8]>,
    pos: usize,
}

impl SliceSource {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        SliceSource {
            data: data.into(),
            pos: 0,
        }
    }
}

impl ByteSource for SliceSource {
    fn read_exact(&mut self, n: usize) -> Result<Box<[u8]>, DecodeError> {
        let available = self.data.len() - self.pos;
        if n > available {
            return Err(DecodeError::UnexpectedEof {
                needed: n,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(Box::from(slice))
    }

    fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }
}

/// A `ByteSource` over any `std::io::Read`, for callers who want to decode
/// straight off a file or socket instead of buffering the whole input.
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        ReaderSource { inner, eof: false }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn read_exact(&mut self, n: usize) -> Result<Box<[u8]>, DecodeError> {
        let mut buf = vec![0u8; n];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => Ok(buf.into_boxed_slice()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.eof = true;
                Err(DecodeError::UnexpectedEof {
                    needed: n,
                    available: 0,
                })
            }
            Err(e) => Err(DecodeError::from(e)),
        }
    }

    fn has_remaining(&self) -> bool {
        !self.eof
    }
}
