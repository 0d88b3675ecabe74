/// Padding byte, never the head of a value
pub(crate) const NONE: u8 = 0x00;
/// Empty array
pub(crate) const EMPTY_ARRAY: u8 = 0x01;
/// Array without index table, 1-byte length
pub(crate) const ARRAY_EQUAL_1: u8 = 0x02;
/// Array without index table, 8-byte length
pub(crate) const ARRAY_EQUAL_8: u8 = 0x05;
/// Array with index table, 1-byte offsets
pub(crate) const ARRAY_INDEXED_1: u8 = 0x06;
/// Array with index table, 8-byte offsets
pub(crate) const ARRAY_INDEXED_8: u8 = 0x09;
/// Empty object
pub(crate) const EMPTY_OBJECT: u8 = 0x0a;
/// Object with sorted index table, 1-byte offsets
pub(crate) const OBJECT_SORTED_1: u8 = 0x0b;
/// Object with sorted index table, 8-byte offsets
pub(crate) const OBJECT_SORTED_8: u8 = 0x0e;
/// Object with unsorted index table, 1-byte offsets
pub(crate) const OBJECT_UNSORTED_1: u8 = 0x0f;
/// Object with unsorted index table, 8-byte offsets
pub(crate) const OBJECT_UNSORTED_8: u8 = 0x12;
/// Compact array
pub(crate) const COMPACT_ARRAY: u8 = 0x13;
/// Compact object
pub(crate) const COMPACT_OBJECT: u8 = 0x14;

pub(crate) const ILLEGAL: u8 = 0x17;
pub(crate) const NULL: u8 = 0x18;
pub(crate) const FALSE: u8 = 0x19;
pub(crate) const TRUE: u8 = 0x1a;
/// IEEE-754 double, 8 bytes
pub(crate) const DOUBLE: u8 = 0x1b;
/// Milliseconds since epoch, signed, 8 bytes
pub(crate) const UTC_DATE: u8 = 0x1c;
pub(crate) const MIN_KEY: u8 = 0x1e;
pub(crate) const MAX_KEY: u8 = 0x1f;

/// Signed integers are `0x20..=0x27`, the width is `tag - INT_BASE`
pub(crate) const INT_BASE: u8 = 0x1f;
pub(crate) const INT_MIN: u8 = 0x20;
pub(crate) const INT_MAX: u8 = 0x27;
/// Unsigned integers are `0x28..=0x2f`, the width is `tag - UINT_BASE`
pub(crate) const UINT_BASE: u8 = 0x27;
pub(crate) const UINT_MIN: u8 = 0x28;
pub(crate) const UINT_MAX: u8 = 0x2f;
/// Small integers `0..=9`
pub(crate) const SMALLINT_ZERO: u8 = 0x30;
pub(crate) const SMALLINT_POS_MAX: u8 = 0x39;
/// Small integers `-6..=-1`, the value is `tag - SMALLINT_NEG_BASE`
pub(crate) const SMALLINT_NEG_MIN: u8 = 0x3a;
pub(crate) const SMALLINT_NEG_MAX: u8 = 0x3f;
pub(crate) const SMALLINT_NEG_BASE: i64 = 0x40;

/// Short strings are `0x40..=0xbe`, the length is `tag - SHORT_STRING_BASE`
pub(crate) const SHORT_STRING_BASE: u8 = 0x40;
pub(crate) const SHORT_STRING_MAX: u8 = 0xbe;
/// Long string, 8-byte length
pub(crate) const LONG_STRING: u8 = 0xbf;
/// Binary blobs are `0xc0..=0xc7`, the length field width is `tag - BINARY_BASE`
pub(crate) const BINARY_BASE: u8 = 0xbf;
pub(crate) const BINARY_MIN: u8 = 0xc0;
pub(crate) const BINARY_MAX: u8 = 0xc7;

pub(crate) const CUSTOM_MIN: u8 = 0xf0;
