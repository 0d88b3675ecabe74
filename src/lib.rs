//! # vpack
//!
//! A zero-copy reader for VelocyPack, a compact, self-describing binary format for nested
//! data. Values are read in place: looking up one field of a large document decodes only
//! the headers on the way to it.
//!
//! # Usage
//!
//! Wrap a buffer in a [`VPackSlice`] and walk it.
//!
//! ```
//! use vpack::prelude::*;
//!
//! // {"a": 1, "b": [true, "x"]}, compact layout
//! let doc = VPackSlice::from_static(&[
//!     0x14, 0x0e, 0x41, 0x61, 0x31, 0x41, 0x62, 0x13, 0x06, 0x1a, 0x41, 0x78, 0x02, 0x02,
//! ]);
//!
//! assert!(doc.is_object());
//! assert_eq!(doc.get("a").unwrap().unwrap().get_as_i64().unwrap(), 1);
//!
//! let b = doc.get("b").unwrap().unwrap();
//! assert_eq!(b.length().unwrap(), 2);
//! assert!(b.get_nth(0).unwrap().get_as_bool().unwrap());
//! assert_eq!(b.get_nth(1).unwrap().get_as_str().unwrap(), "x");
//! ```
//!
//! Slices share their buffer, so cloning them is cheap and they can be sent to other
//! threads. Nothing in this crate ever writes to a buffer.
//!
//! # Typed extraction
//!
//! Scalars are read with the `get_as_*` accessors of [`VPackSlice`]. Every accessor checks
//! the stored type and fails with [`VPackError::TypeMismatch`] if it does not apply.
//! Integers are never truncated: reading `300` as an `i8` fails with
//! [`VPackError::NumericOverflow`].
//!
//! For conversions into arbitrary types there is the [`DeserializerRegistry`], which maps
//! each target type to a converter. See the [`deserializer`] module.
//!
//! # Format
//!
//! This section summarizes the parts of VelocyPack that the reader understands.
//!
//! ## Tags
//!
//! The first byte of every value is its *tag*. It alone decides the [`ValueType`] and how
//! the length of the value is stored. All multi-byte integers are little endian.
//!
//! | Tag           | Value                                              |
//! | ---           | ---                                                |
//! | `0x00`        | padding                                            |
//! | `0x01`        | empty array                                        |
//! | `0x02`-`0x05` | array of equally sized members                     |
//! | `0x06`-`0x09` | array with index table                             |
//! | `0x0a`        | empty object                                       |
//! | `0x0b`-`0x0e` | object with index table sorted by key              |
//! | `0x0f`-`0x12` | object with unsorted index table                   |
//! | `0x13`        | compact array                                      |
//! | `0x14`        | compact object                                     |
//! | `0x18`        | `null`                                             |
//! | `0x19`/`0x1a` | `false`/`true`                                     |
//! | `0x1b`        | double                                             |
//! | `0x1c`        | UTC date, milliseconds since the epoch             |
//! | `0x1e`/`0x1f` | min key/max key                                    |
//! | `0x20`-`0x27` | signed integer of 1 to 8 bytes                     |
//! | `0x28`-`0x2f` | unsigned integer of 1 to 8 bytes                   |
//! | `0x30`-`0x3f` | small integers `0` to `9` and `-6` to `-1`         |
//! | `0x40`-`0xbe` | string of up to 126 bytes, length is `tag - 0x40`  |
//! | `0xbf`        | string with 8 byte length                          |
//! | `0xc0`-`0xc7` | binary with 1 to 8 byte length                     |
//! | `0xf0`-`0xff` | custom                                             |
//!
//! Everything else is illegal.
//!
//! ## Arrays and objects
//!
//! Compounds with an index table store the tag, the total byte length and (for offset
//! widths below 8) the member count. Zero bytes may pad the header to 9 bytes. The members
//! follow, then a table of member offsets relative to the tag byte. With 8 byte offsets
//! the count is stored last.
//!
//! Compact compounds store the byte length as a variable-length integer (7 bits per byte,
//! high bit set on all but the last byte), then the members, then the count as a
//! variable-length integer read backwards from the last byte.
//!
//! Object members are a string key directly followed by its value.

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    macro_use_extern_crate,
    unreachable_pub,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces
)]

pub mod decimal;
pub mod deserializer;
pub mod encoding;
pub mod errors;
pub mod iterator;
mod navigator;
pub mod number;
pub mod options;
pub mod prelude;
pub mod slice;
mod util;

pub use crate::{
    decimal::BigDecimal,
    deserializer::{DeserializationContext, DeserializerRegistry, VPackDeserializer},
    encoding::{Layout, ValueType},
    errors::{Result, VPackError},
    iterator::{ArrayIterator, ObjectIterator},
    number::Number,
    options::VPackOptions,
    slice::VPackSlice,
};
