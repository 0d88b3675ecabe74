use crate::encoding::ValueType;
use failure::Fail;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Fail)]
/// An error encountered while reading a VelocyPack value.
///
/// None of these are transient: they signal either a wrong accessor for the stored type or
/// bad input data.
pub enum VPackError {
    /// The operation requires a different [`ValueType`] than the slice holds.
    #[fail(display = "expected a value of type {}, found {:?}", expected, found)]
    TypeMismatch {
        /// What the operation accepts.
        expected: &'static str,
        /// What was actually stored.
        found: ValueType,
    },
    /// A position past the end of an array or object was requested.
    #[fail(
        display = "index {} is out of range for a compound with {} members",
        index, size
    )]
    IndexOutOfRange { index: usize, size: usize },
    /// The stored value cannot be represented by the requested numeric type.
    #[fail(display = "stored value does not fit into `{}`", target)]
    NumericOverflow { target: &'static str },
    /// A textual sub-encoding (date, UUID, Base64, decimal, ...) is malformed.
    #[fail(display = "could not parse {}: {}", what, reason)]
    ParseFailure { what: &'static str, reason: String },
    /// An iterator was advanced past its last member.
    #[fail(display = "iterator is exhausted")]
    ExhaustedIterator,
    /// The operation is not supported on immutable encoded data.
    #[fail(display = "unsupported operation: {}", _0)]
    Unsupported(String),
    /// A tag or length field is inconsistent with the buffer.
    #[fail(display = "malformed encoding at offset {}: {}", offset, reason)]
    MalformedEncoding { offset: usize, reason: String },
}

impl VPackError {
    pub(crate) fn type_mismatch(expected: &'static str, found: ValueType) -> Self {
        VPackError::TypeMismatch { expected, found }
    }

    pub(crate) fn overflow(target: &'static str) -> Self { VPackError::NumericOverflow { target } }

    pub(crate) fn parse<E: Display>(what: &'static str, reason: E) -> Self {
        VPackError::ParseFailure {
            what,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed<S: Into<String>>(offset: usize, reason: S) -> Self {
        VPackError::MalformedEncoding {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported<S: Into<String>>(what: S) -> Self { VPackError::Unsupported(what.into()) }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VPackError>;
