//! Forward-only cursors over the members of arrays and objects.
//!
//! An iterator is bound to one compound when it is created. It holds the number of members,
//! how many it has produced, and the offset of the next one; each step advances that offset
//! by the byte size of what it just returned. Once exhausted it stays exhausted.
//!
//! ```
//! use vpack::prelude::*;
//!
//! // [1, 2, 3], compact
//! let array = VPackSlice::from_static(&[0x13, 0x06, 0x31, 0x32, 0x33, 0x03]);
//! let mut it = array.array_iter().unwrap();
//!
//! let mut sum = 0;
//! while it.has_next() {
//!     sum += it.next_slice().unwrap().get_as_i64().unwrap();
//! }
//! assert_eq!(sum, 6);
//! assert_eq!(it.next_slice().unwrap_err(), VPackError::ExhaustedIterator);
//! ```

use crate::{
    errors::{Result, VPackError},
    slice::VPackSlice,
};
use log::trace;
use std::iter::FusedIterator;

macro_rules! cursor_protocol {
    ($name:ident) => {
        impl $name {
            /// Whether another member remains.
            #[inline]
            pub fn has_next(&self) -> bool { self.position < self.size }

            /// Number of members already produced.
            pub fn position(&self) -> usize { self.position }

            /// Number of members of the compound.
            pub fn size(&self) -> usize { self.size }

            /// Encoded values cannot be modified, so this always fails with
            /// [`VPackError::Unsupported`] and leaves the iterator as it was.
            pub fn remove(&mut self) -> Result<()> {
                Err(VPackError::unsupported(concat!(
                    stringify!($name),
                    "::remove on immutable data"
                )))
            }

            fn fuse(&mut self) { self.position = self.size; }
        }
    };
}

/// Cursor over the members of an array.
#[derive(Clone, Debug)]
pub struct ArrayIterator {
    slice: VPackSlice,
    size: usize,
    position: usize,
    current: usize,
    end: usize,
}

cursor_protocol!(ArrayIterator);

impl ArrayIterator {
    /// Binds a new cursor to `slice`, which must be an array.
    pub fn new(slice: &VPackSlice) -> Result<ArrayIterator> {
        if !slice.is_array() {
            return Err(slice.mismatch("Array"));
        }
        let (first, size) = slice.first_member()?;
        let end = slice.end()?;
        Ok(ArrayIterator {
            slice: slice.clone(),
            size,
            position: 0,
            current: first.unwrap_or(end),
            end,
        })
    }

    /// Produces the next member.
    ///
    /// # Errors
    ///
    /// [`VPackError::ExhaustedIterator`] once all members were produced. If the member is
    /// malformed the iterator is left unchanged.
    pub fn next_slice(&mut self) -> Result<VPackSlice> {
        if !self.has_next() {
            return Err(VPackError::ExhaustedIterator);
        }
        let member = self.slice.member_at(self.current, self.end)?;
        trace!("array member {} at {}", self.position, self.current);
        self.current += member.byte_size()?;
        self.position += 1;
        Ok(member)
    }
}

impl Iterator for ArrayIterator {
    type Item = Result<VPackSlice>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let item = self.next_slice();
        if item.is_err() {
            self.fuse();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ArrayIterator {}
impl FusedIterator for ArrayIterator {}

/// Cursor over the key/value pairs of an object, in storage order.
#[derive(Clone, Debug)]
pub struct ObjectIterator {
    slice: VPackSlice,
    size: usize,
    position: usize,
    current: usize,
    end: usize,
}

cursor_protocol!(ObjectIterator);

impl ObjectIterator {
    /// Binds a new cursor to `slice`, which must be an object.
    pub fn new(slice: &VPackSlice) -> Result<ObjectIterator> {
        if !slice.is_object() {
            return Err(slice.mismatch("Object"));
        }
        let (first, size) = slice.first_member()?;
        let end = slice.end()?;
        Ok(ObjectIterator {
            slice: slice.clone(),
            size,
            position: 0,
            current: first.unwrap_or(end),
            end,
        })
    }

    /// Produces the next key and its value, advancing past both.
    pub fn next_entry(&mut self) -> Result<(VPackSlice, VPackSlice)> {
        if !self.has_next() {
            return Err(VPackError::ExhaustedIterator);
        }
        let key = self.slice.member_at(self.current, self.end)?;
        let key_size = key.byte_size()?;
        let value = self.slice.member_at(self.current + key_size, self.end)?;
        trace!("object member {} at {}", self.position, self.current);
        self.current += key_size + value.byte_size()?;
        self.position += 1;
        Ok((key, value))
    }
}

impl Iterator for ObjectIterator {
    type Item = Result<(VPackSlice, VPackSlice)>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let item = self.next_entry();
        if item.is_err() {
            self.fuse();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ObjectIterator {}
impl FusedIterator for ObjectIterator {}

impl VPackSlice {
    /// A cursor over the members of this array.
    pub fn array_iter(&self) -> Result<ArrayIterator> { ArrayIterator::new(self) }

    /// A cursor over the key/value pairs of this object.
    pub fn object_iter(&self) -> Result<ObjectIterator> { ObjectIterator::new(self) }
}
