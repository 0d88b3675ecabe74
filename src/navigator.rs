//! Random access into arrays and objects.
//!
//! Every lookup starts from the tag byte of the compound and recomputes what it needs from
//! the buffer. Indexed layouts read a single table entry; compact layouts scan forwards
//! from the first member, one byte size at a time.

use crate::{
    encoding::{Layout, ValueType},
    errors::{Result, VPackError},
    slice::VPackSlice,
    util::*,
};
use log::trace;
use std::cmp::Ordering;

/// Header positions at which members may start, after optional zero padding.
const DATA_POSITIONS: [usize; 3] = [2, 3, 5];
const MAX_HEADER: usize = 9;

/// A compound with its header decoded. Offsets are relative to the compound's tag byte.
struct Compound<'a> {
    slice: &'a VPackSlice,
    layout: Layout,
    byte_size: usize,
    size: usize,
    is_object: bool,
}

impl<'a> Compound<'a> {
    fn of(slice: &'a VPackSlice) -> Result<Compound<'a>> {
        let layout = Layout::of(slice.head()).ok_or_else(|| slice.mismatch("Array or Object"))?;
        let byte_size = slice.byte_size()?;
        let mut compound = Compound {
            slice,
            layout,
            byte_size,
            size: 0,
            is_object: slice.is_object(),
        };
        compound.size = compound.read_size()?;
        Ok(compound)
    }

    /// Member count, checked against the room the value leaves for members.
    fn read_size(&self) -> Result<usize> {
        let trailer = match self.layout {
            Layout::Indexed { width: 8, .. } => 8,
            _ => 0,
        };
        if self.byte_size < self.layout.min_header() + trailer {
            return Err(self.malformed("header does not fit into the value"));
        }
        let size = match self.layout {
            Layout::Empty => return Ok(0),
            Layout::EqualSize { .. } => {
                let data = self.data_offset()?;
                if data >= self.byte_size {
                    return Ok(0);
                }
                let member = self.child(data)?.byte_size()?;
                let payload = self.byte_size - data;
                if payload % member != 0 {
                    return Err(self.malformed("members of an equal-size array differ in size"));
                }
                return Ok(payload / member);
            }
            Layout::Indexed { width: 8, .. } => self.slice.read_len(self.byte_size - 8, 8)?,
            Layout::Indexed { width, .. } => self.slice.read_len(1 + width, width)?,
            Layout::Compact => {
                let last = self.slice.start() + self.byte_size - 1;
                let count = read_variable_length_reverse(self.slice.buffer(), last)?;
                to_usize(count, last)?
            }
        };

        // every key and every value takes at least one byte
        let member = if self.is_object { 2 } else { 1 };
        let table = match self.layout {
            Layout::Indexed { width, .. } => width,
            _ => 0,
        };
        let needed = size
            .checked_mul(member + table)
            .and_then(|n| n.checked_add(trailer));
        let room = self.byte_size.saturating_sub(self.data_offset()?);
        match needed {
            Some(n) if n <= room => Ok(size),
            _ => Err(self.malformed(format!("{} members do not fit into the value", size))),
        }
    }

    /// Offset of the first member, skipping zero padding after the header.
    fn data_offset(&self) -> Result<usize> {
        match self.layout {
            Layout::Compact => {
                let (_, used) = read_variable_length(self.slice.buffer(), self.slice.start() + 1)?;
                Ok(1 + used)
            }
            layout => {
                let min = layout.min_header();
                let buf = self.slice.buffer();
                let found = DATA_POSITIONS.iter().copied().find(|&pos| {
                    pos >= min
                        && pos < self.byte_size
                        && buf.get(self.slice.start() + pos).map_or(false, |&b| b != 0)
                });
                Ok(found.unwrap_or(MAX_HEADER))
            }
        }
    }

    /// Offset of member `index`; for objects this is the key.
    fn nth_offset(&self, index: usize) -> Result<usize> {
        if index >= self.size {
            return Err(VPackError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        match self.layout {
            Layout::Empty => Err(VPackError::IndexOutOfRange { index, size: 0 }),
            Layout::Indexed { width, .. } => self.index_entry(index, width),
            Layout::EqualSize { .. } => {
                let data = self.data_offset()?;
                let member = self.child(data)?.byte_size()?;
                index
                    .checked_mul(member)
                    .and_then(|off| off.checked_add(data))
                    .ok_or_else(|| self.malformed("member offset overflows"))
            }
            Layout::Compact => {
                trace!(
                    "scanning compact {:?} at {} for member {}",
                    self.slice.value_type(),
                    self.slice.start(),
                    index
                );
                let mut pos = self.data_offset()?;
                for _ in 0..index {
                    pos = self.skip_member(pos)?;
                }
                Ok(pos)
            }
        }
    }

    fn index_entry(&self, index: usize, width: usize) -> Result<usize> {
        let trailer = if width == 8 { 8 } else { 0 };
        let base = self
            .size
            .checked_mul(width)
            .and_then(|table| table.checked_add(trailer))
            .and_then(|tail| self.byte_size.checked_sub(tail))
            .ok_or_else(|| self.malformed("index table does not fit into the value"))?;
        self.slice.read_len(base + index * width, width)
    }

    /// Offset just past the member (key and value for objects) starting at `pos`.
    fn skip_member(&self, pos: usize) -> Result<usize> {
        let mut next = pos + self.child(pos)?.byte_size()?;
        if self.is_object {
            next += self.child(next)?.byte_size()?;
        }
        Ok(next)
    }

    /// The value stored at `rel`, which must lie entirely inside this compound.
    fn child(&self, rel: usize) -> Result<VPackSlice> {
        if rel == 0 || rel >= self.byte_size {
            return Err(self.malformed(format!("member offset {} is outside the value", rel)));
        }
        let child = self.slice.at_offset(self.slice.start() + rel);
        let size = child.byte_size()?;
        if rel + size > self.byte_size {
            return Err(self.malformed(format!(
                "member at {} of {} bytes overruns its parent",
                rel, size
            )));
        }
        Ok(child)
    }

    fn key(&self, index: usize) -> Result<VPackSlice> { self.child(self.nth_offset(index)?) }

    fn value_of(&self, key: &VPackSlice) -> Result<VPackSlice> {
        let rel = key.start() - self.slice.start() + key.byte_size()?;
        self.child(rel)
    }

    fn find(&self, wanted: &[u8]) -> Result<Option<VPackSlice>> {
        match self.layout {
            Layout::Empty => Ok(None),
            Layout::Indexed { sorted: true, .. } => self.binary_search(wanted),
            _ => self.linear_search(wanted),
        }
    }

    fn binary_search(&self, wanted: &[u8]) -> Result<Option<VPackSlice>> {
        let (mut low, mut high) = (0, self.size);
        while low < high {
            let mid = low + (high - low) / 2;
            let key = self.key(mid)?;
            match key.get_as_str()?.as_bytes().cmp(wanted) {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
                Ordering::Equal => return self.value_of(&key).map(Some),
            }
        }
        Ok(None)
    }

    fn linear_search(&self, wanted: &[u8]) -> Result<Option<VPackSlice>> {
        trace!(
            "linear key search in object at {} over {} members",
            self.slice.start(),
            self.size
        );
        let mut pos = self.data_offset()?;
        for _ in 0..self.size {
            let key = self.child(pos)?;
            if key.get_as_str()?.as_bytes() == wanted {
                return self.value_of(&key).map(Some);
            }
            pos = self.skip_member(pos)?;
        }
        Ok(None)
    }

    fn malformed<S: Into<String>>(&self, reason: S) -> VPackError {
        VPackError::malformed(self.slice.start(), reason)
    }
}

impl VPackSlice {
    /// How an array or object lays out its members.
    pub fn layout(&self) -> Result<Layout> {
        Layout::of(self.head()).ok_or_else(|| self.mismatch("Array or Object"))
    }

    /// Number of members of an array or object.
    pub fn length(&self) -> Result<usize> { Ok(Compound::of(self)?.size) }

    /// Whether an array or object has no members.
    pub fn is_empty_compound(&self) -> Result<bool> { Ok(self.length()? == 0) }

    /// The member at `index`. For objects this is the key at that position of the index
    /// table, see [`VPackSlice::value_at`] for the value.
    ///
    /// # Errors
    ///
    /// * [`VPackError::TypeMismatch`] unless this is an array or object.
    /// * [`VPackError::IndexOutOfRange`] if `index >= self.length()`.
    /// * [`VPackError::MalformedEncoding`] if the member lies outside this value.
    pub fn get_nth(&self, index: usize) -> Result<VPackSlice> { Compound::of(self)?.key(index) }

    /// Same as [`VPackSlice::get_nth`].
    pub fn at(&self, index: usize) -> Result<VPackSlice> { self.get_nth(index) }

    /// The key at `index` of an object.
    pub fn key_at(&self, index: usize) -> Result<VPackSlice> {
        self.require_object()?;
        self.get_nth(index)
    }

    /// The value at `index` of an object.
    pub fn value_at(&self, index: usize) -> Result<VPackSlice> {
        self.require_object()?;
        let compound = Compound::of(self)?;
        let key = compound.key(index)?;
        compound.value_of(&key)
    }

    /// Looks up the value stored under `key` in an object.
    ///
    /// Sorted objects are searched by binary search over the key bytes, all other layouts
    /// linearly.
    pub fn get(&self, key: &str) -> Result<Option<VPackSlice>> {
        self.require_object()?;
        Compound::of(self)?.find(key.as_bytes())
    }

    /// Follows `path` through nested objects. An empty path yields this slice.
    pub fn get_path(&self, path: &[&str]) -> Result<Option<VPackSlice>> {
        let mut current = self.clone();
        for key in path {
            match current.get(key)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn has_key(&self, key: &str) -> Result<bool> { Ok(self.get(key)?.is_some()) }

    /// Absolute offset of the first member in storage order, `None` for empty compounds.
    pub(crate) fn first_member(&self) -> Result<(Option<usize>, usize)> {
        let compound = Compound::of(self)?;
        if compound.size == 0 {
            return Ok((None, 0));
        }
        let rel = match compound.layout {
            // the table of an indexed array is in member order
            Layout::Indexed { .. } if !compound.is_object => compound.nth_offset(0)?,
            _ => compound.data_offset()?,
        };
        Ok((Some(self.start() + rel), compound.size))
    }

    /// Absolute end offset of this compound.
    pub(crate) fn end(&self) -> Result<usize> { Ok(self.start() + self.byte_size()?) }

    /// A member starting at absolute `offset`, checked against `end`.
    pub(crate) fn member_at(&self, offset: usize, end: usize) -> Result<VPackSlice> {
        let member = self.at_offset(offset);
        let size = member.byte_size()?;
        if offset <= self.start() || offset + size > end {
            return Err(VPackError::malformed(
                offset,
                "member overruns its parent",
            ));
        }
        Ok(member)
    }

    fn require_object(&self) -> Result<()> {
        if self.value_type() == ValueType::Object {
            Ok(())
        } else {
            Err(self.mismatch("Object"))
        }
    }
}
