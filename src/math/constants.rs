use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;

use super::real::{pow10, Real};

// Physical constants, in km / kg / s.

pub const SPEED_OF_LIGHT: &str = "299792.458";
pub const GRAVITATIONAL_CONSTANT: &str = "6.67430e-20";

/// π to the requested number of significant digits, by Machin's formula
/// π/4 = 4·atan(1/5) − atan(1/239).
pub fn pi(precision: u64) -> Real {
    let guard = precision + 10;
    let unity = pow10(guard);
    let pi = arctan_recip(5, &unity) * BigInt::from(16) - arctan_recip(239, &unity) * BigInt::from(4);
    Real::new(BigDecimal::new(pi, guard as i64), precision)
}

// atan(1/x) in fixed point, scaled by `unity`
fn arctan_recip(x: u32, unity: &BigInt) -> BigInt {
    let x_squared = BigInt::from(x) * BigInt::from(x);
    let mut power = unity / BigInt::from(x);
    let mut sum = power.clone();
    let mut k = 1u64;
    loop {
        power = power / &x_squared;
        if power.is_zero() {
            break;
        }
        let term = &power / BigInt::from(2 * k + 1);
        if k % 2 == 1 {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
    sum
}
