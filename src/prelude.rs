pub use crate::{
    decimal::BigDecimal,
    deserializer::{DeserializationContext, DeserializerRegistry, FnDeserializer, VPackDeserializer},
    encoding::{Layout, ValueType},
    errors::{Result, VPackError},
    iterator::{ArrayIterator, ObjectIterator},
    number::Number,
    options::{VPackOptions, DEFAULT_DATE_FORMAT},
    slice::VPackSlice,
};
pub use bytes::Bytes;
pub use num_bigint::BigInt;
