use crate::{
    encoding::ValueType,
    errors::{Result, VPackError},
    from_fn,
};
use num_bigint::BigInt;
use std::{convert::TryFrom, fmt};

/// A number as stored in a slice: signed, unsigned or floating point.
///
/// Integer conversions are checked; a value that does not fit the requested width fails
/// with [`VPackError::NumericOverflow`] instead of wrapping.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Double(f64),
}

use Number::*;

from_fn!(Number, i64, Int);
from_fn!(Number, u64, UInt);
from_fn!(Number, f64, Double);

macro_rules! narrow {
    ($name:ident, $t:ty) => {
        #[doc = concat!("Produces an `", stringify!($t), "` if the value is an integer that fits.")]
        pub fn $name(&self) -> Result<$t> {
            match *self {
                Int(i) => <$t>::try_from(i).map_err(|_| VPackError::overflow(stringify!($t))),
                UInt(u) => <$t>::try_from(u).map_err(|_| VPackError::overflow(stringify!($t))),
                Double(_) => Err(VPackError::type_mismatch("integer", ValueType::Double)),
            }
        }
    };
}

impl Number {
    /// Whether the number was stored as an integer.
    pub fn is_integer(&self) -> bool {
        match self {
            Double(_) => false,
            _ => true,
        }
    }

    narrow!(to_i8, i8);
    narrow!(to_u8, u8);
    narrow!(to_i16, i16);
    narrow!(to_i32, i32);
    narrow!(to_i64, i64);
    narrow!(to_u64, u64);

    /// Widens the number to `f64`. Integers beyond 2^53 lose their lowest digits.
    pub fn to_f64(&self) -> f64 {
        match *self {
            Int(i) => i as f64,
            UInt(u) => u as f64,
            Double(d) => d,
        }
    }

    /// Narrows the number to `f32`, failing for finite values outside its range.
    pub fn to_f32(&self) -> Result<f32> {
        let d = self.to_f64();
        if d.is_finite() && d.abs() > f64::from(std::f32::MAX) {
            Err(VPackError::overflow("f32"))
        } else {
            Ok(d as f32)
        }
    }

    /// Produces a [`BigInt`] without loss if the value is an integer.
    pub fn to_big_integer(&self) -> Result<BigInt> {
        match *self {
            Int(i) => Ok(BigInt::from(i)),
            UInt(u) => Ok(BigInt::from(u)),
            Double(_) => Err(VPackError::type_mismatch("integer", ValueType::Double)),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Int(i) => write!(f, "{}", i),
            UInt(u) => write!(f, "{}", u),
            Double(d) => write!(f, "{}", d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrowing_is_checked() {
        let n = Number::from(300i64);
        assert_eq!(n.to_i32().unwrap(), 300);
        assert_eq!(n.to_i16().unwrap(), 300);
        assert_eq!(
            n.to_i8().unwrap_err(),
            VPackError::NumericOverflow { target: "i8" }
        );
        assert!(n.to_u8().is_err());

        assert!(Number::from(-1i64).to_u64().is_err());
        assert!(Number::from(u64::max_value()).to_i64().is_err());
        assert_eq!(Number::from(u64::max_value()).to_u64().unwrap(), u64::max_value());
        assert_eq!(Number::from(-128i64).to_i8().unwrap(), -128);
    }

    #[test]
    fn doubles_are_not_integers() {
        let d = Number::from(1.0);
        assert!(!d.is_integer());
        assert!(d.to_i64().is_err());
        assert!(d.to_big_integer().is_err());
        assert_eq!(d.to_f64(), 1.0);
        assert!(Number::from(1e300).to_f32().is_err());
        assert!(Number::from(std::f64::INFINITY).to_f32().unwrap().is_infinite());
    }

    #[test]
    fn big_integers() {
        assert_eq!(
            Number::from(u64::max_value()).to_big_integer().unwrap(),
            BigInt::from(u64::max_value())
        );
        assert_eq!(Number::from(-5i64).to_string(), "-5");
    }
}
