use crate::errors::VPackError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::{fmt, str::FromStr};

/// An arbitrary-precision decimal, `mantissa * 10^exponent`.
///
/// Equality is structural: `1.0` and `1.00` have different mantissas and compare unequal.
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct BigDecimal {
    mantissa: BigInt,
    exponent: i64,
}

impl BigDecimal {
    pub fn new(mantissa: BigInt, exponent: i64) -> BigDecimal { BigDecimal { mantissa, exponent } }

    pub fn mantissa(&self) -> &BigInt { &self.mantissa }

    pub fn exponent(&self) -> i64 { self.exponent }

    pub fn into_pair(self) -> (BigInt, i64) { (self.mantissa, self.exponent) }

    /// The decimal with the fewest digits that round-trips to `f`, `None` for NaN and
    /// infinities.
    pub fn from_f64(f: f64) -> Option<BigDecimal> {
        if f.is_finite() {
            // `{:e}` prints the shortest round-tripping digits
            format!("{:e}", f).parse().ok()
        } else {
            None
        }
    }
}

impl From<BigInt> for BigDecimal {
    fn from(i: BigInt) -> BigDecimal { BigDecimal::new(i, 0) }
}

impl From<i64> for BigDecimal {
    fn from(i: i64) -> BigDecimal { BigDecimal::new(BigInt::from(i), 0) }
}

impl From<u64> for BigDecimal {
    fn from(u: u64) -> BigDecimal { BigDecimal::new(BigInt::from(u), 0) }
}

impl FromStr for BigDecimal {
    type Err = VPackError;

    /// Parses `[+-]digits[.digits][(e|E)[+-]digits]`.
    fn from_str(s: &str) -> Result<BigDecimal, VPackError> {
        let fail = |reason: &str| VPackError::parse("decimal", format!("{} in {:?}", reason, s));

        let (significand, exp) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let exp = s[pos + 1..]
                    .parse::<i64>()
                    .map_err(|_| fail("bad exponent"))?;
                (&s[..pos], exp)
            }
            None => (s, 0),
        };

        let (negative, unsigned) = match significand.as_bytes().first() {
            Some(b'-') => (true, &significand[1..]),
            Some(b'+') => (false, &significand[1..]),
            _ => (false, significand),
        };

        let (int_part, frac_part) = match unsigned.find('.') {
            Some(pos) => (&unsigned[..pos], &unsigned[pos + 1..]),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(fail("no digits"));
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(fail("unexpected character"));
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mut mantissa = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| fail("no digits"))?;
        if negative {
            mantissa = -mantissa;
        }

        let exponent = exp
            .checked_sub(frac_part.len() as i64)
            .ok_or_else(|| fail("exponent out of range"))?;

        Ok(BigDecimal::new(mantissa, exponent))
    }
}

/// Plain notation while the exponent is at most zero and the value is not below `1E-6`,
/// scientific notation (`2.5E+3`) otherwise. Output length is bounded by the digit count.
impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        let adjusted = self.exponent.saturating_add(digits.len() as i64 - 1);

        if self.exponent > 0 || adjusted < -6 {
            let (first, rest) = digits.split_at(1);
            let point = if rest.is_empty() { "" } else { "." };
            let plus = if adjusted >= 0 { "+" } else { "" };
            return write!(f, "{}{}{}{}E{}{}", sign, first, point, rest, plus, adjusted);
        }
        if self.exponent == 0 {
            return write!(f, "{}{}", sign, digits);
        }

        let point = digits.len() as i64 + self.exponent;
        if point > 0 {
            let (int, frac) = digits.split_at(point as usize);
            write!(f, "{}{}.{}", sign, int, frac)
        } else {
            // at most six leading zeros here
            write!(f, "{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(m: i64, e: i64) -> BigDecimal { BigDecimal::new(BigInt::from(m), e) }

    #[test]
    fn parse() {
        assert_eq!("1.50".parse::<BigDecimal>().unwrap(), dec(150, -2));
        assert_eq!("-12".parse::<BigDecimal>().unwrap(), dec(-12, 0));
        assert_eq!("+.5".parse::<BigDecimal>().unwrap(), dec(5, -1));
        assert_eq!("3.".parse::<BigDecimal>().unwrap(), dec(3, 0));
        assert_eq!("2.5e3".parse::<BigDecimal>().unwrap(), dec(25, 2));
        assert_eq!("1E-2".parse::<BigDecimal>().unwrap(), dec(1, -2));

        let big = "123456789012345678901234567890".parse::<BigDecimal>().unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890");

        for bad in &["", "-", ".", "1.2.3", "abc", "1e", "1e+x", "1 2"] {
            match bad.parse::<BigDecimal>() {
                Err(VPackError::ParseFailure { what, .. }) => assert_eq!(what, "decimal"),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn display() {
        assert_eq!(dec(150, -2).to_string(), "1.50");
        assert_eq!(dec(-5, -3).to_string(), "-0.005");
        assert_eq!(dec(-42, 0).to_string(), "-42");
        assert_eq!(dec(1, -6).to_string(), "0.000001");
    }

    #[test]
    fn display_large_exponents() {
        assert_eq!(dec(25, 2).to_string(), "2.5E+3");
        assert_eq!(dec(0, 3).to_string(), "0E+3");
        assert_eq!(dec(7, 0).to_string(), "7");
        assert_eq!(dec(1, -7).to_string(), "1E-7");
        assert_eq!(dec(-123, -12).to_string(), "-1.23E-10");

        let tiny = "1e-999999999999".parse::<BigDecimal>().unwrap();
        assert_eq!(tiny.to_string(), "1E-999999999999");
        let huge = "-4.5e999999999999".parse::<BigDecimal>().unwrap();
        assert_eq!(huge.to_string(), "-4.5E+999999999999");
    }

    #[test]
    fn from_double() {
        assert_eq!(BigDecimal::from_f64(0.1).unwrap(), dec(1, -1));
        assert_eq!(BigDecimal::from_f64(-1.5).unwrap(), dec(-15, -1));
        assert_eq!(BigDecimal::from_f64(1e20).unwrap(), dec(1, 20));
        assert_eq!(BigDecimal::from_f64(0.0).unwrap(), dec(0, 0));
        assert!(BigDecimal::from_f64(std::f64::NAN).is_none());
        assert!(BigDecimal::from_f64(std::f64::INFINITY).is_none());
    }
}
