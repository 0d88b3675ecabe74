//! The [`VPackSlice`], a view of one encoded value.
//!
//! A slice is a shared handle to a buffer plus the offset of a tag byte. Cloning a slice
//! never copies the buffer, and nothing here mutates it, so slices can be handed to other
//! threads freely.
//!
//! # Example
//!
//! ```
//! use vpack::prelude::*;
//!
//! // the integer 300, stored in two bytes
//! let slice = VPackSlice::from_static(&[0x21, 0x2c, 0x01]);
//!
//! assert_eq!(slice.value_type(), ValueType::Int);
//! assert_eq!(slice.byte_size().unwrap(), 3);
//! assert_eq!(slice.get_as_i32().unwrap(), 300);
//!
//! // narrowing never truncates
//! assert!(slice.get_as_i8().is_err());
//! ```

use crate::{
    decimal::BigDecimal,
    encoding::{constants::*, ValueType},
    errors::{Result, VPackError},
    number::Number,
    util::*,
};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use num_bigint::BigInt;
use std::fmt;

/// An immutable, zero-copy view of one encoded value.
#[derive(Clone, PartialEq)]
pub struct VPackSlice {
    buffer: Bytes,
    start: usize,
}

macro_rules! type_predicates {
    ($($name:ident => $typ:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $name(&self) -> bool { self.value_type() == ValueType::$typ }
        )*
    };
}

macro_rules! narrowing_accessors {
    ($($name:ident => $to:ident: $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("Reads an integer as `", stringify!($t), "`, failing with `NumericOverflow` if it does not fit.")]
            pub fn $name(&self) -> Result<$t> { self.integer()?.$to() }
        )*
    };
}

impl VPackSlice {
    /// Creates a root slice over `buffer`, starting at its first byte.
    pub fn new(buffer: Bytes) -> VPackSlice { VPackSlice { buffer, start: 0 } }

    /// Creates a root slice, taking ownership of `v`.
    pub fn from_vec(v: Vec<u8>) -> VPackSlice { VPackSlice::new(Bytes::from(v)) }

    /// Creates a root slice over static data.
    pub fn from_static(bytes: &'static [u8]) -> VPackSlice { VPackSlice::new(Bytes::from_static(bytes)) }

    /// A slice over the same buffer at another offset.
    #[inline]
    pub(crate) fn at_offset(&self, start: usize) -> VPackSlice {
        VPackSlice {
            buffer: self.buffer.clone(),
            start,
        }
    }

    /// Offset of this value's tag byte within the buffer.
    pub fn start(&self) -> usize { self.start }

    /// The whole underlying buffer.
    pub fn buffer(&self) -> &Bytes { &self.buffer }

    /// The tag byte. A slice starting past the end of its buffer reads as padding.
    #[inline]
    pub fn head(&self) -> u8 { self.buffer.get(self.start).copied().unwrap_or(NONE) }

    /// The type of this value, decided by the tag byte alone.
    #[inline]
    pub fn value_type(&self) -> ValueType { ValueType::of(self.head()) }

    type_predicates! {
        is_none => None,
        is_illegal => Illegal,
        is_null => Null,
        is_bool => Bool,
        is_array => Array,
        is_object => Object,
        is_double => Double,
        is_date => UTCDate,
        is_min_key => MinKey,
        is_max_key => MaxKey,
        is_int => Int,
        is_uint => UInt,
        is_small_int => SmallInt,
        is_string => String,
        is_binary => Binary,
        is_custom => Custom,
    }

    pub fn is_true(&self) -> bool { self.head() == TRUE }

    pub fn is_false(&self) -> bool { self.head() == FALSE }

    /// Whether the value is an integer of any width.
    pub fn is_integer(&self) -> bool {
        match self.value_type() {
            ValueType::Int | ValueType::UInt | ValueType::SmallInt => true,
            _ => false,
        }
    }

    /// Whether the value is an integer or a double.
    pub fn is_number(&self) -> bool { self.is_integer() || self.is_double() }

    /// Whether the value is an array or an object.
    pub fn is_compound(&self) -> bool { self.is_array() || self.is_object() }

    /// Total encoded length of this value, including tag, length fields and index table.
    ///
    /// This only reads the tag and, for variable-length values, the length field. For
    /// arrays and objects the stored byte length is authoritative.
    ///
    /// # Errors
    ///
    /// Fails with [`VPackError::MalformedEncoding`] if the declared size runs past the end
    /// of the buffer or the tag has no defined size.
    pub fn byte_size(&self) -> Result<usize> {
        let h = self.head();
        let size = match h {
            EMPTY_ARRAY | EMPTY_OBJECT | ILLEGAL | NULL | FALSE | TRUE | MIN_KEY | MAX_KEY => 1,
            SMALLINT_ZERO..=SMALLINT_NEG_MAX => 1,
            // padding is one byte
            NONE => 1,
            DOUBLE | UTC_DATE => 9,
            ARRAY_EQUAL_1..=ARRAY_INDEXED_8 | OBJECT_SORTED_1..=OBJECT_UNSORTED_8 => {
                let width = crate::encoding::Layout::of(h)
                    .and_then(|l| l.length_width())
                    .unwrap_or(1);
                self.read_len(1, width)?
            }
            COMPACT_ARRAY | COMPACT_OBJECT => {
                let (len, _) = read_variable_length(&self.buffer, self.start + 1)?;
                to_usize(len, self.start)?
            }
            INT_MIN..=INT_MAX => 1 + (h - INT_BASE) as usize,
            UINT_MIN..=UINT_MAX => 1 + (h - UINT_BASE) as usize,
            SHORT_STRING_BASE..=SHORT_STRING_MAX => 1 + (h - SHORT_STRING_BASE) as usize,
            LONG_STRING => self.checked_sum(9, self.read_len(1, 8)?)?,
            BINARY_MIN..=BINARY_MAX => {
                let width = (h - BINARY_BASE) as usize;
                self.checked_sum(1 + width, self.read_len(1, width)?)?
            }
            0xf0 => 2,
            0xf1 => 3,
            0xf2 => 5,
            0xf3 => 9,
            0xf4..=0xf6 => self.checked_sum(2, self.read_len(1, 1)?)?,
            0xf7..=0xf9 => self.checked_sum(3, self.read_len(1, 2)?)?,
            0xfa..=0xfc => self.checked_sum(5, self.read_len(1, 4)?)?,
            0xfd..=0xff => self.checked_sum(9, self.read_len(1, 8)?)?,
            _ => {
                return Err(VPackError::malformed(
                    self.start,
                    format!("tag {:#04x} has no defined byte size", h),
                ))
            }
        };

        if size == 0 {
            return Err(VPackError::malformed(self.start, "declared byte size is zero"));
        }
        match self.start.checked_add(size) {
            Some(end) if end <= self.buffer.len() => Ok(size),
            _ => Err(VPackError::malformed(
                self.start,
                format!(
                    "value of {} bytes runs past the end of a {} byte buffer",
                    size,
                    self.buffer.len()
                ),
            )),
        }
    }

    /// The encoded bytes of this value.
    pub fn as_bytes(&self) -> Result<&[u8]> {
        let size = self.byte_size()?;
        Ok(&self.buffer[self.start..self.start + size])
    }

    #[inline]
    pub(crate) fn read_uint(&self, rel: usize, width: usize) -> Result<u64> {
        read_uint_le(&self.buffer, self.start + rel, width)
    }

    #[inline]
    pub(crate) fn read_len(&self, rel: usize, width: usize) -> Result<usize> {
        to_usize(self.read_uint(rel, width)?, self.start + rel)
    }

    #[inline]
    fn checked_sum(&self, a: usize, b: usize) -> Result<usize> {
        a.checked_add(b)
            .ok_or_else(|| VPackError::malformed(self.start, "length overflows"))
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> VPackError {
        VPackError::type_mismatch(expected, self.value_type())
    }

    /// Reads a boolean.
    pub fn get_as_bool(&self) -> Result<bool> {
        match self.head() {
            TRUE => Ok(true),
            FALSE => Ok(false),
            _ => Err(self.mismatch("Bool")),
        }
    }

    /// Reads any numeric value.
    pub fn get_as_number(&self) -> Result<Number> {
        let h = self.head();
        match self.value_type() {
            ValueType::SmallInt => Ok(Number::Int(small_int(h))),
            ValueType::Int => {
                let width = (h - INT_BASE) as usize;
                Ok(Number::Int(read_int_le(&self.buffer, self.start + 1, width)?))
            }
            ValueType::UInt => Ok(Number::UInt(self.read_uint(1, (h - UINT_BASE) as usize)?)),
            ValueType::Double => Ok(Number::Double(f64::from_bits(self.read_uint(1, 8)?))),
            _ => Err(self.mismatch("number")),
        }
    }

    /// Reads an integer of any width.
    fn integer(&self) -> Result<Number> {
        if self.is_integer() {
            self.get_as_number()
        } else {
            Err(self.mismatch("integer"))
        }
    }

    narrowing_accessors! {
        get_as_i8 => to_i8: i8,
        get_as_u8 => to_u8: u8,
        get_as_i16 => to_i16: i16,
        get_as_i32 => to_i32: i32,
        get_as_i64 => to_i64: i64,
        get_as_u64 => to_u64: u64,
    }

    /// Reads a double, or widens an integer to one.
    pub fn get_as_f64(&self) -> Result<f64> { Ok(self.get_as_number()?.to_f64()) }

    /// Reads a number as `f32`, failing for finite values outside its range.
    pub fn get_as_f32(&self) -> Result<f32> { self.get_as_number()?.to_f32() }

    /// Reads an integer of any width without loss.
    pub fn get_as_big_integer(&self) -> Result<BigInt> { self.integer()?.to_big_integer() }

    /// Reads an integer, a double, or decimal text stored as a string.
    pub fn get_as_big_decimal(&self) -> Result<BigDecimal> {
        if self.is_string() {
            return self.get_as_str()?.parse();
        }
        match self.get_as_number()? {
            Number::Int(i) => Ok(BigDecimal::from(i)),
            Number::UInt(u) => Ok(BigDecimal::from(u)),
            Number::Double(d) => BigDecimal::from_f64(d).ok_or_else(|| VPackError::overflow("BigDecimal")),
        }
    }

    /// Reads a string without copying it.
    ///
    /// # Errors
    ///
    /// Fails with [`VPackError::TypeMismatch`] unless the value is a string, and with
    /// [`VPackError::MalformedEncoding`] if it is not valid UTF-8.
    pub fn get_as_str(&self) -> Result<&str> {
        let h = self.head();
        let (offset, len) = match h {
            SHORT_STRING_BASE..=SHORT_STRING_MAX => (1, (h - SHORT_STRING_BASE) as usize),
            LONG_STRING => (9, self.read_len(1, 8)?),
            _ => return Err(self.mismatch("String")),
        };
        let bytes = self.payload(offset, len)?;
        std::str::from_utf8(bytes).map_err(|e| VPackError::malformed(self.start, e.to_string()))
    }

    /// Reads a string into an owned [`String`].
    pub fn get_as_string(&self) -> Result<String> { self.get_as_str().map(str::to_owned) }

    /// Reads a string holding exactly one character.
    pub fn get_as_char(&self) -> Result<char> {
        let s = self.get_as_str()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(VPackError::parse(
                "char",
                format!("expected exactly one character, found {:?}", s),
            )),
        }
    }

    /// Reads a binary blob. The returned [`Bytes`] shares the slice's buffer.
    pub fn get_as_binary(&self) -> Result<Bytes> {
        let h = self.head();
        match h {
            BINARY_MIN..=BINARY_MAX => {
                let width = (h - BINARY_BASE) as usize;
                let len = self.read_len(1, width)?;
                self.payload(1 + width, len)?;
                let from = self.start + 1 + width;
                Ok(self.buffer.slice(from..from + len))
            }
            _ => Err(self.mismatch("Binary")),
        }
    }

    /// Raw milliseconds since the Unix epoch of a UTC date.
    pub fn get_utc_date_millis(&self) -> Result<i64> {
        if self.is_date() {
            read_int_le(&self.buffer, self.start + 1, 8)
        } else {
            Err(self.mismatch("UTCDate"))
        }
    }

    /// Reads a UTC date.
    pub fn get_as_date(&self) -> Result<DateTime<Utc>> {
        let millis = self.get_utc_date_millis()?;
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| VPackError::overflow("DateTime<Utc>"))
    }

    /// Reads the calendar day (in UTC) of a UTC date.
    pub fn get_as_sql_date(&self) -> Result<NaiveDate> { Ok(self.get_as_date()?.date_naive()) }

    /// Reads a UTC date as a timestamp without zone.
    pub fn get_as_sql_timestamp(&self) -> Result<NaiveDateTime> { Ok(self.get_as_date()?.naive_utc()) }

    /// The payload of a custom value, without tag and length field.
    pub fn custom_payload(&self) -> Result<Bytes> {
        let h = self.head();
        let header = match h {
            0xf0..=0xf3 => 1,
            0xf4..=0xf6 => 2,
            0xf7..=0xf9 => 3,
            0xfa..=0xfc => 5,
            0xfd..=0xff => 9,
            _ => return Err(self.mismatch("Custom")),
        };
        let size = self.byte_size()?;
        Ok(self.buffer.slice(self.start + header..self.start + size))
    }

    /// `len` bytes starting `offset` bytes after the tag, bounds checked.
    fn payload(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let from = self.start + offset;
        from.checked_add(len)
            .and_then(|to| self.buffer.get(from..to))
            .ok_or_else(|| VPackError::malformed(self.start, "payload runs past the end of the buffer"))
    }
}

#[inline]
fn small_int(h: u8) -> i64 {
    match h {
        SMALLINT_ZERO..=SMALLINT_POS_MAX => i64::from(h - SMALLINT_ZERO),
        SMALLINT_NEG_MIN..=SMALLINT_NEG_MAX => i64::from(h) - SMALLINT_NEG_BASE,
        _ => 0,
    }
}

impl fmt::Debug for VPackSlice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VPackSlice")
            .field("type", &self.value_type())
            .field("start", &self.start)
            .field("byte_size", &self.byte_size().ok())
            .finish()
    }
}
