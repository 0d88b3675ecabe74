use super::constants::*;

/// VelocyPack value types.
///
/// Exactly one type applies to every tag byte. Tags the format reserves, or that this
/// reader does not understand, are [`ValueType::Illegal`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Padding, or a slice starting past the end of its buffer.
    None,
    Illegal,
    Null,
    Bool,
    Array,
    Object,
    Double,
    UTCDate,
    MinKey,
    MaxKey,
    Int,
    UInt,
    SmallInt,
    String,
    Binary,
    Custom,
}

impl ValueType {
    /// Classifies a tag byte.
    pub fn of(head: u8) -> ValueType {
        use ValueType::*;
        match head {
            NONE => None,
            EMPTY_ARRAY..=ARRAY_INDEXED_8 | COMPACT_ARRAY => Array,
            EMPTY_OBJECT..=OBJECT_UNSORTED_8 | COMPACT_OBJECT => Object,
            NULL => Null,
            FALSE | TRUE => Bool,
            DOUBLE => Double,
            UTC_DATE => UTCDate,
            MIN_KEY => MinKey,
            MAX_KEY => MaxKey,
            INT_MIN..=INT_MAX => Int,
            UINT_MIN..=UINT_MAX => UInt,
            SMALLINT_ZERO..=SMALLINT_NEG_MAX => SmallInt,
            SHORT_STRING_BASE..=LONG_STRING => String,
            BINARY_MIN..=BINARY_MAX => Binary,
            CUSTOM_MIN..=0xff => Custom,
            _ => Illegal,
        }
    }
}

/// How the members of an array or object are laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// No members at all, the value is a single tag byte.
    Empty,
    /// Array members of identical byte size, without an index table. `width` is the size
    /// of the byte length field.
    EqualSize { width: usize },
    /// Members followed by a table of `width`-byte member offsets.
    Indexed { width: usize, sorted: bool },
    /// Members back to back, byte length and count stored as variable-length integers.
    Compact,
}

impl Layout {
    /// Reads the layout from a tag byte, `None` if the tag is not a compound.
    pub fn of(head: u8) -> Option<Layout> {
        use Layout::*;
        match head {
            EMPTY_ARRAY | EMPTY_OBJECT => Some(Empty),
            ARRAY_EQUAL_1..=ARRAY_EQUAL_8 => Some(EqualSize {
                width: 1 << (head - ARRAY_EQUAL_1),
            }),
            ARRAY_INDEXED_1..=ARRAY_INDEXED_8 => Some(Indexed {
                width: 1 << (head - ARRAY_INDEXED_1),
                sorted: false,
            }),
            OBJECT_SORTED_1..=OBJECT_SORTED_8 => Some(Indexed {
                width: 1 << (head - OBJECT_SORTED_1),
                sorted: true,
            }),
            OBJECT_UNSORTED_1..=OBJECT_UNSORTED_8 => Some(Indexed {
                width: 1 << (head - OBJECT_UNSORTED_1),
                sorted: false,
            }),
            COMPACT_ARRAY | COMPACT_OBJECT => Some(Compact),
            _ => None,
        }
    }

    /// Width in bytes of the byte length field, `None` for compact and empty layouts.
    pub fn length_width(self) -> Option<usize> {
        match self {
            Layout::EqualSize { width } | Layout::Indexed { width, .. } => Some(width),
            _ => None,
        }
    }

    /// Length of the header when no padding follows it.
    pub(crate) fn min_header(self) -> usize {
        match self {
            Layout::Empty => 1,
            Layout::EqualSize { width } => 1 + width,
            Layout::Indexed { width: 8, .. } => 9,
            Layout::Indexed { width, .. } => 1 + 2 * width,
            // depends on the stored byte length, see `Compound::data_offset`
            Layout::Compact => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_has_one_type() {
        assert_eq!(ValueType::of(0x00), ValueType::None);
        assert_eq!(ValueType::of(0x01), ValueType::Array);
        assert_eq!(ValueType::of(0x09), ValueType::Array);
        assert_eq!(ValueType::of(0x0a), ValueType::Object);
        assert_eq!(ValueType::of(0x12), ValueType::Object);
        assert_eq!(ValueType::of(0x13), ValueType::Array);
        assert_eq!(ValueType::of(0x14), ValueType::Object);
        assert_eq!(ValueType::of(0x15), ValueType::Illegal);
        assert_eq!(ValueType::of(0x17), ValueType::Illegal);
        assert_eq!(ValueType::of(0x1a), ValueType::Bool);
        assert_eq!(ValueType::of(0x1d), ValueType::Illegal);
        assert_eq!(ValueType::of(0x27), ValueType::Int);
        assert_eq!(ValueType::of(0x28), ValueType::UInt);
        assert_eq!(ValueType::of(0x3f), ValueType::SmallInt);
        assert_eq!(ValueType::of(0x40), ValueType::String);
        assert_eq!(ValueType::of(0xbf), ValueType::String);
        assert_eq!(ValueType::of(0xc7), ValueType::Binary);
        assert_eq!(ValueType::of(0xc8), ValueType::Illegal);
        assert_eq!(ValueType::of(0xef), ValueType::Illegal);
        assert_eq!(ValueType::of(0xf0), ValueType::Custom);
        assert_eq!(ValueType::of(0xff), ValueType::Custom);
    }

    #[test]
    fn layouts() {
        assert_eq!(Layout::of(0x05), Some(Layout::EqualSize { width: 8 }));
        assert_eq!(
            Layout::of(0x07),
            Some(Layout::Indexed {
                width: 2,
                sorted: false
            })
        );
        assert_eq!(
            Layout::of(0x0d),
            Some(Layout::Indexed {
                width: 4,
                sorted: true
            })
        );
        assert_eq!(
            Layout::of(0x12),
            Some(Layout::Indexed {
                width: 8,
                sorted: false
            })
        );
        assert_eq!(Layout::of(0x14), Some(Layout::Compact));
        assert_eq!(Layout::of(0x18), None);

        assert_eq!(Layout::of(0x06).unwrap().min_header(), 3);
        assert_eq!(Layout::of(0x08).unwrap().min_header(), 9);
        assert_eq!(Layout::of(0x09).unwrap().min_header(), 9);
        assert_eq!(Layout::of(0x03).unwrap().min_header(), 3);
    }
}
