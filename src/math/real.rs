//! Arbitrary-precision reals.
//!
//! A [Real] remembers how many significant digits it was computed to, and
//! every operation rounds its result to the smaller precision of its inputs.
//! Division and roots are done on the integer mantissas directly, so that they
//! honour the working precision instead of bigdecimal's built-in default.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::NumericError;

use super::constants;

pub const DEFAULT_PRECISION: u64 = 1024;

// Significant digits used when printing without an explicit precision
const DISPLAY_DIGITS: u64 = 28;

const LOG10_2: f64 = 0.301_029_995_663_981_2;

#[derive(Debug, Clone)]
pub struct Real {
    value: BigDecimal,
    precision: u64,
}

pub(crate) fn pow10(exponent: u64) -> BigInt {
    num_traits::pow::pow(BigInt::from(10u8), exponent as usize)
}

// Lower and upper bounds on the number of decimal digits in |n|.
fn digits_at_least(n: &BigInt) -> i64 {
    match n.bits() {
        0 => 0,
        bits => ((bits - 1) as f64 * LOG10_2).floor() as i64 + 1,
    }
}

fn digits_at_most(n: &BigInt) -> i64 {
    (n.bits() as f64 * LOG10_2).ceil() as i64 + 1
}

fn round(value: BigDecimal, precision: u64) -> BigDecimal {
    if value.digits() > precision {
        value.with_prec(precision)
    } else {
        value
    }
}

// Decimal exponent of the leading digit. Value must be non-zero.
fn magnitude(value: &BigDecimal) -> i64 {
    let (_, scale) = value.as_bigint_and_exponent();
    value.digits() as i64 - 1 - scale
}

fn fault(err: NumericError) -> ! {
    panic!("arithmetic fault: {}", err)
}

impl Real {
    pub fn new(value: BigDecimal, precision: u64) -> Self {
        Self {
            value: round(value, precision),
            precision,
        }
    }

    pub fn zero(precision: u64) -> Self {
        Self::new(BigDecimal::zero(), precision)
    }

    pub fn from_i64(n: i64, precision: u64) -> Self {
        Self::new(BigDecimal::from(n), precision)
    }

    /// Parses decimal or scientific notation. A bare leading dot (".0002") is
    /// accepted.
    pub fn parse(text: &str, precision: u64) -> Result<Self, NumericError> {
        let trimmed = text.trim();
        let normalized = if let Some(rest) = trimmed.strip_prefix("-.") {
            format!("-0.{}", rest)
        } else if let Some(rest) = trimmed.strip_prefix('.') {
            format!("0.{}", rest)
        } else {
            trimmed.to_owned()
        };

        BigDecimal::from_str(&normalized)
            .map(|value| Self::new(value, precision))
            .map_err(|_| NumericError::Parse(text.to_owned()))
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    pub fn abs(&self) -> Real {
        Self {
            value: self.value.abs(),
            precision: self.precision,
        }
    }

    pub fn checked_div(&self, rhs: &Real) -> Result<Real, NumericError> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let precision = self.precision.min(rhs.precision);
        if self.is_zero() {
            return Ok(Real::zero(precision));
        }

        let (num, num_scale) = self.value.as_bigint_and_exponent();
        let (den, den_scale) = rhs.value.as_bigint_and_exponent();

        // Widen the numerator so the truncated integer quotient still carries
        // `precision` digits, plus two guard digits.
        let shift = (precision as i64 + 2 + digits_at_most(&den) - digits_at_least(&num)).max(0);
        let quotient = num * pow10(shift as u64) / den;

        Ok(Real::new(
            BigDecimal::new(quotient, num_scale - den_scale + shift),
            precision,
        ))
    }

    /// n-th root, truncated to the working precision. Odd roots of negative
    /// values are allowed.
    pub fn checked_root(&self, n: u32) -> Result<Real, NumericError> {
        assert!(n > 0, "zeroth root is undefined");
        if self.is_zero() {
            return Ok(self.clone());
        }
        if self.is_negative() && n % 2 == 0 {
            return Err(NumericError::NegativeRoot);
        }

        let (mantissa, scale) = self.value.as_bigint_and_exponent();
        let n = n as i64;

        // Pad the mantissa so the integer root has enough digits, and so the
        // resulting scale divides evenly by n.
        let wanted = n * (self.precision as i64 + 2);
        let mut extra = (wanted - digits_at_least(&mantissa)).max(0);
        extra += (n - (scale + extra).rem_euclid(n)) % n;

        let root = (mantissa * pow10(extra as u64)).nth_root(n as u32);
        Ok(Real::new(
            BigDecimal::new(root, (scale + extra) / n),
            self.precision,
        ))
    }

    pub fn sqrt(&self) -> Real {
        self.checked_root(2).unwrap_or_else(|err| fault(err))
    }

    pub fn nth_root(&self, n: u32) -> Real {
        self.checked_root(n).unwrap_or_else(|err| fault(err))
    }

    pub fn pow(&self, exponent: u32) -> Real {
        let mut result = Real::from_i64(1, self.precision);
        for _ in 0..exponent {
            result = &result * self;
        }
        result
    }

    pub fn square(&self) -> Real {
        self * self
    }

    /// How many leading significant digits the two values share.
    ///
    /// Identical values share `u64::MAX` digits; values of different sign (or
    /// zero against non-zero) share none.
    pub fn equal_digits(&self, other: &Real) -> u64 {
        if self.value == other.value {
            return u64::MAX;
        }
        if self.is_zero() || other.is_zero() || self.is_negative() != other.is_negative() {
            return 0;
        }

        let diff = (&self.value - &other.value).abs();
        let larger = self.value.abs().max(other.value.abs());
        (magnitude(&larger) - magnitude(&diff)).max(0) as u64
    }

    /// Truncates toward zero.
    pub fn trunc_to_i64(&self) -> Option<i64> {
        self.value.with_scale(0).to_i64()
    }

    pub fn to_f64(&self) -> f64 {
        self.value.to_f64().unwrap_or(f64::NAN)
    }
}

fn add(lhs: &Real, rhs: &Real) -> Real {
    Real::new(&lhs.value + &rhs.value, lhs.precision.min(rhs.precision))
}

fn sub(lhs: &Real, rhs: &Real) -> Real {
    Real::new(&lhs.value - &rhs.value, lhs.precision.min(rhs.precision))
}

fn mul(lhs: &Real, rhs: &Real) -> Real {
    Real::new(&lhs.value * &rhs.value, lhs.precision.min(rhs.precision))
}

fn div(lhs: &Real, rhs: &Real) -> Real {
    lhs.checked_div(rhs).unwrap_or_else(|err| fault(err))
}

// Implement each operator for every owned/borrowed combination
macro_rules! real_binop {
    ($($trait_path:ident)::*, $fn_name:ident, $core:ident) => {
        impl $($trait_path)::*<&Real> for &Real {
            type Output = Real;

            fn $fn_name(self, rhs: &Real) -> Real {
                $core(self, rhs)
            }
        }

        impl $($trait_path)::*<Real> for Real {
            type Output = Real;

            fn $fn_name(self, rhs: Real) -> Real {
                $core(&self, &rhs)
            }
        }

        impl $($trait_path)::*<&Real> for Real {
            type Output = Real;

            fn $fn_name(self, rhs: &Real) -> Real {
                $core(&self, rhs)
            }
        }

        impl $($trait_path)::*<Real> for &Real {
            type Output = Real;

            fn $fn_name(self, rhs: Real) -> Real {
                $core(self, &rhs)
            }
        }
    };
}

real_binop!(std::ops::Add, add, add);
real_binop!(std::ops::Sub, sub, sub);
real_binop!(std::ops::Mul, mul, mul);
real_binop!(std::ops::Div, div, div);

impl std::ops::Neg for Real {
    type Output = Real;

    fn neg(self) -> Real {
        Real {
            value: -self.value,
            precision: self.precision,
        }
    }
}

impl std::ops::Neg for &Real {
    type Output = Real;

    fn neg(self) -> Real {
        -self.clone()
    }
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Real {}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Real {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Display for Real {
    // `{:.N}` prints N significant digits
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().map_or(DISPLAY_DIGITS, |p| p.max(1) as u64);
        write!(f, "{}", round(self.value.clone(), digits))
    }
}

/// The working precision together with the constants derived from it.
#[derive(Debug, Clone)]
pub struct Kernel {
    precision: u64,
    pi: Real,
}

impl Kernel {
    pub fn new(precision: u64) -> Self {
        assert!(precision >= 8, "working precision of {} is too small", precision);
        Self {
            precision,
            pi: constants::pi(precision),
        }
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    /// Digits two values must share to be treated as the same value after a
    /// chain of rounded operations.
    pub fn half_precision(&self) -> u64 {
        self.precision / 2
    }

    pub fn pi(&self) -> &Real {
        &self.pi
    }

    /// 10^-(half precision), the slack allowed when a rounded quotient should
    /// land on an integer.
    pub fn epsilon(&self) -> Real {
        Real::new(
            BigDecimal::new(BigInt::from(1), self.half_precision() as i64),
            self.precision,
        )
    }

    pub fn zero(&self) -> Real {
        Real::zero(self.precision)
    }

    pub fn int(&self, n: i64) -> Real {
        Real::from_i64(n, self.precision)
    }

    pub fn ratio(&self, num: i64, den: i64) -> Real {
        self.int(num) / self.int(den)
    }

    pub fn parse(&self, text: &str) -> Result<Real, NumericError> {
        Real::parse(text, self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(text: &str) -> Real {
        Real::parse(text, 60).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(real(".0002"), real("0.0002"));
        assert_eq!(real("-.5"), real("-0.5"));
        assert_eq!(real("6.67430e-20"), real("0.0000000000000000000667430"));
        assert_eq!(
            Real::parse("twelve", 60),
            Err(NumericError::Parse("twelve".to_owned()))
        );
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(real("1.5") + real("2.25"), real("3.75"));
        assert_eq!(real("1.5") - real("2.25"), real("-0.75"));
        assert_eq!(real("1.5") * real("-4"), real("-6"));
        assert_eq!(real("7") / real("2"), real("3.5"));
        assert_eq!(-real("7"), real("-7"));
        assert_eq!(real("-7").abs(), real("7"));
        assert_eq!(real("3").pow(4), real("81"));
    }

    #[test]
    fn test_division_precision() {
        let third = real("1") / real("3");
        let expected = format!("0.{}", "3".repeat(60));
        assert_eq!(third, real(&expected));
        assert_eq!(third.precision(), 60);

        // Mixed precision keeps the smaller one
        let coarse = Real::parse("1", 20).unwrap();
        assert_eq!((coarse / real("3")).precision(), 20);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            real("1").checked_div(&real("0")),
            Err(NumericError::DivisionByZero)
        );
        assert_eq!(real("0").checked_div(&real("5")), Ok(real("0")));
    }

    #[test]
    #[should_panic(expected = "arithmetic fault")]
    fn test_division_by_zero_operator() {
        let _ = real("1") / real("0");
    }

    #[test]
    fn test_roots() {
        assert_eq!(real("100").sqrt(), real("10"));
        assert_eq!(real("0.0004").sqrt(), real("0.02"));
        assert_eq!(real("27").nth_root(3), real("3"));
        assert_eq!(real("-8").nth_root(3), real("-2"));

        let root_two = real("2").sqrt();
        assert!(root_two.equal_digits(&real(
            "1.41421356237309504880168872420969807856967187537694807317667973799"
        )) >= 59);
        assert!((&root_two * &root_two).equal_digits(&real("2")) >= 58);

        assert_eq!(real("-4").checked_root(2), Err(NumericError::NegativeRoot));
    }

    #[test]
    fn test_equal_digits() {
        assert_eq!(real("1.5").equal_digits(&real("1.5")), u64::MAX);
        assert_eq!(real("1.5").equal_digits(&real("-1.5")), 0);
        assert_eq!(real("0").equal_digits(&real("1e-300")), 0);
        assert_eq!(real("1.0000001").equal_digits(&real("1.0000002")), 7);
        assert_eq!(real("123456").equal_digits(&real("123457")), 5);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(real("2.9999999").trunc_to_i64(), Some(2));
        approx::assert_relative_eq!(real("3181.3192807").to_f64(), 3181.3192807, max_relative = 1e-15);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{:.5}", real("3.14159265")), "3.1416");
        assert_eq!(format!("{}", real("2.5")), "2.5");
    }

    #[test]
    fn test_kernel_constants() {
        let kernel = Kernel::new(50);
        assert_eq!(kernel.half_precision(), 25);
        assert_eq!(kernel.epsilon(), Real::parse("1e-25", 50).unwrap());
        assert_eq!(kernel.ratio(3, 8), Real::parse("0.375", 50).unwrap());
        assert!(kernel.pi().equal_digits(&real(
            "3.14159265358979323846264338327950288419716939937510582097494459"
        )) >= 49);
    }
}
