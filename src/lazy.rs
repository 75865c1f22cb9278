//! Lazy item sequence: a finite sequence of items that can be visited at
//! most once, and that can fail mid-traversal.
//!
//! This is the uniform handle struct fields, map entries, set elements and
//! list elements are all stored behind: an already-materialized slice just
//! walks itself, and a reader-backed sequence reads exactly `size()`
//! elements from the reader on demand. A third backing, unbounded, exists
//! because a struct body has no declared element count: the wire format
//! only tells you to stop when you see the STOP byte.

use crate::error::{CodecError, DecodeError, ProgrammerError};

enum Backing<T> {
    /// Already materialized — produced by caller code, or by a prior
    /// `for_each` draining a reader-backed sequence during normalization.
    Eager(std::vec::IntoIter<T>),
    /// Reader-backed, with a declared count (`Map`/`Set`/`List`).
    Bounded {
        remaining: usize,
        next: Box<dyn FnMut() -> Result<T, DecodeError>>,
    },
    /// Reader-backed, with no declared count (`Struct`): `next` returns
    /// `None` once it has consumed the STOP byte.
    Unbounded {
        next: Box<dyn FnMut() -> Result<Option<T>, DecodeError>>,
    },
}

/// A single-pass sequence of `T`, possibly still backed by an unread
/// portion of a byte source.
pub struct Lazy<T> {
    backing: Backing<T>,
    consumed: bool,
    declared_size: Option<usize>,
}

impl<T> Lazy<T> {
    /// Wraps an already-materialized vector. Used for caller-constructed
    /// values and for the result of normalization.
    pub fn eager(items: Vec<T>) -> Self {
        let declared_size = Some(items.len());
        Lazy {
            backing: Backing::Eager(items.into_iter()),
            consumed: false,
            declared_size,
        }
    }

    pub(crate) fn bounded(
        count: usize,
        next: impl FnMut() -> Result<T, DecodeError> + 'static,
    ) -> Self {
        Lazy {
            backing: Backing::Bounded {
                remaining: count,
                next: Box::new(next),
            },
            consumed: false,
            declared_size: Some(count),
        }
    }

    pub(crate) fn unbounded(next: impl FnMut() -> Result<Option<T>, DecodeError> + 'static) -> Self {
        Lazy {
            backing: Backing::Unbounded { next: Box::new(next) },
            consumed: false,
            declared_size: None,
        }
    }

    /// The count declared in the container header: exact for `Map`/`Set`/
    /// `List`, `None` for `Struct` (which has no declared count on the
    /// wire). Authoritative only once traversal has completed.
    pub fn size(&self) -> Option<usize> {
        self.declared_size
    }

    /// Visits every item in order. Stops and returns the error as soon as
    /// either `visit` or production of the next item fails. Calling this a
    /// second time on the same `Lazy` is a programmer error.
    pub fn for_each(
        &mut self,
        mut visit: impl FnMut(T) -> Result<(), CodecError>,
    ) -> Result<(), CodecError> {
        if self.consumed {
            return Err(ProgrammerError::SequenceAlreadyConsumed.into());
        }
        self.consumed = true;

        match &mut self.backing {
            Backing::Eager(iter) => {
                for item in iter {
                    visit(item)?;
                }
            }
            Backing::Bounded { remaining, next } => {
                while *remaining > 0 {
                    let item = next()?;
                    *remaining -= 1;
                    visit(item)?;
                }
            }
            Backing::Unbounded { next } => {
                while let Some(item) = next()? {
                    visit(item)?;
                }
            }
        }
        Ok(())
    }

    /// The drained items, if this sequence is eager-backed (e.g. after
    /// [`crate::normalize::to_primitive`]). `None` if it is still drawing
    /// from a reader, since those items can't be inspected without
    /// consuming the sequence.
    pub fn as_eager(&self) -> Option<&[T]> {
        match &self.backing {
            Backing::Eager(iter) => Some(iter.as_slice()),
            _ => None,
        }
    }
}

impl<T> std::fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Lazy")
            .field("size", &self.declared_size)
            .field("consumed", &self.consumed)
            .finish()
    }
}

impl<T: PartialEq> PartialEq for Lazy<T> {
    /// Structural equality is only meaningful for two eager-backed, i.e.
    /// already-normalized, sequences. Any comparison involving a still
    /// reader-backed sequence is `false`, never a panic or a drain as a
    /// side effect.
    fn eq(&self, other: &Self) -> bool {
        match (self.as_eager(), other.as_eager()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
