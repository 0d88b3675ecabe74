use crate::errors::{Result, VPackError};
use byteorder::{ByteOrder, LittleEndian};
use std::convert::TryFrom;

/// Longest variable-length integer that still fits a `u64`.
const MAX_VARIABLE_LENGTH: usize = 10;

#[inline]
fn window(buf: &[u8], offset: usize, width: usize) -> Result<&[u8]> {
    offset
        .checked_add(width)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| {
            VPackError::malformed(
                offset,
                format!(
                    "tried to read {} bytes from buffer of size {}",
                    width,
                    buf.len()
                ),
            )
        })
}

/// Reads a little-endian unsigned integer of `width` bytes (1 to 8) starting at `offset`.
#[inline]
pub(crate) fn read_uint_le(buf: &[u8], offset: usize, width: usize) -> Result<u64> {
    debug_assert!(width >= 1 && width <= 8);
    Ok(LittleEndian::read_uint(window(buf, offset, width)?, width))
}

/// Reads a little-endian two's complement integer of `width` bytes, sign-extended.
#[inline]
pub(crate) fn read_int_le(buf: &[u8], offset: usize, width: usize) -> Result<i64> {
    debug_assert!(width >= 1 && width <= 8);
    Ok(LittleEndian::read_int(window(buf, offset, width)?, width))
}

/// Reads a variable-length integer forwards from `offset`.
/// Returns the value and the number of bytes it occupied.
pub(crate) fn read_variable_length(buf: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    for i in 0..MAX_VARIABLE_LENGTH {
        let byte = offset
            .checked_add(i)
            .and_then(|pos| buf.get(pos))
            .copied()
            .ok_or_else(|| VPackError::malformed(offset, "variable-length integer runs past the buffer"))?;
        value |= u64::from(byte & 0x7f).checked_shl(7 * i as u32).unwrap_or(0);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(VPackError::malformed(offset, "variable-length integer is too long"))
}

/// Reads a variable-length integer backwards, starting at `last` and moving towards the
/// front of the buffer.
pub(crate) fn read_variable_length_reverse(buf: &[u8], last: usize) -> Result<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARIABLE_LENGTH {
        let byte = last
            .checked_sub(i)
            .and_then(|pos| buf.get(pos))
            .copied()
            .ok_or_else(|| VPackError::malformed(last, "reverse variable-length integer runs past the buffer"))?;
        value |= u64::from(byte & 0x7f).checked_shl(7 * i as u32).unwrap_or(0);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(VPackError::malformed(last, "variable-length integer is too long"))
}

/// Converts a length read from the buffer into a `usize`.
#[inline]
pub(crate) fn to_usize(value: u64, offset: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| VPackError::malformed(offset, "length does not fit into memory"))
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width() {
        let buf = [0x2c, 0x01, 0xd4, 0xfe];
        assert_eq!(read_uint_le(&buf, 0, 2).unwrap(), 300);
        assert_eq!(read_int_le(&buf, 2, 2).unwrap(), -300);
        assert_eq!(read_uint_le(&buf, 3, 1).unwrap(), 0xfe);
        assert!(read_uint_le(&buf, 3, 2).is_err());
        assert!(read_int_le(&buf, usize::max_value(), 2).is_err());
    }

    #[test]
    fn variable_length() {
        // 300 = 0b10_0101100
        let buf = [0xac, 0x02, 0x05];
        assert_eq!(read_variable_length(&buf, 0).unwrap(), (300, 2));
        assert_eq!(read_variable_length(&buf, 2).unwrap(), (5, 1));
        assert!(read_variable_length(&[0x80, 0x80], 0).is_err());

        // reverse: lowest group last
        let rev = [0x02, 0xac];
        assert_eq!(read_variable_length_reverse(&rev, 1).unwrap(), 300);
        assert!(read_variable_length_reverse(&[0x80], 0).is_err());
    }
}
