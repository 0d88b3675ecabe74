//! # VelocyPack tags and layouts
//!
//! Everything about a value that can be learned from its first byte: its [`ValueType`]
//! and, for arrays and objects, its [`Layout`].
//!
//! # Example
//!
//! ```
//! use vpack::encoding::{Layout, ValueType};
//!
//! assert_eq!(ValueType::of(0x1a), ValueType::Bool);
//! assert_eq!(ValueType::of(0x13), ValueType::Array);
//! assert_eq!(Layout::of(0x13), Some(Layout::Compact));
//! assert_eq!(Layout::of(0x18), None);
//! ```

pub(crate) mod constants;
mod tag;
pub use tag::*;
