//! Complex arithmetic over `f64` pairs (spec §4.1 / component C1).
//!
//! Every comparison against zero or one is tolerance-based; there is no
//! exact equality anywhere in this module except in `PartialEq`, which
//! exists only so `Complex` can be used as a map value in tests.

use std::fmt;

use crate::error::CoreError;

/// Absolute tolerance for zero/one/equality tests. Load-bearing for both
/// "is this equation redundant" and "is this coefficient dead" in the
/// solver (spec §9) — keep the default even if made configurable
/// elsewhere, so golden tests stay stable.
pub const TOLERANCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    pub fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }

    pub fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }

    pub fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }

    pub fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }

    /// Division via the textbook conjugate formula.
    pub fn div(self, rhs: Complex) -> Result<Complex, CoreError> {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        if Complex::new(denom, 0.0).is_zero() {
            return Err(CoreError::DivByZero);
        }
        Ok(Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        ))
    }

    /// `self ^ exponent`. The exponent must have zero imaginary part;
    /// computed as `exp(log(self) * exponent)`.
    pub fn pow(self, exponent: Complex) -> Result<Complex, CoreError> {
        if !Complex::new(0.0, exponent.im).is_zero() {
            return Err(CoreError::DomainError(
                "pow: exponent must be real".to_string(),
            ));
        }
        let e = Complex::real(exponent.re);
        Ok(self.log().mul(e).exp())
    }

    pub fn abs(self) -> Complex {
        Complex::real((self.re * self.re + self.im * self.im).sqrt())
    }

    pub fn exp(self) -> Complex {
        let mag = self.re.exp();
        Complex::new(mag * self.im.cos(), mag * self.im.sin())
    }

    /// Principal branch: `(½ log(r²+i²), atan2(i, r))`.
    pub fn log(self) -> Complex {
        Complex::new(
            0.5 * (self.re * self.re + self.im * self.im).ln(),
            self.im.atan2(self.re),
        )
    }

    pub fn cos(self) -> Complex {
        Complex::new(
            self.re.cos() * self.im.cosh(),
            -self.re.sin() * self.im.sinh(),
        )
    }

    pub fn sin(self) -> Complex {
        Complex::new(
            self.re.sin() * self.im.cosh(),
            self.re.cos() * self.im.sinh(),
        )
    }

    /// Degrees to radians; fails on complex input (spec §4.1).
    pub fn rad(self) -> Result<Complex, CoreError> {
        self.require_real("rad")
            .map(|r| Complex::real(r * std::f64::consts::PI / 180.0))
    }

    /// Radians to degrees; fails on complex input (spec §4.1).
    pub fn deg(self) -> Result<Complex, CoreError> {
        self.require_real("deg")
            .map(|r| Complex::real(r * 180.0 / std::f64::consts::PI))
    }

    fn require_real(self, op: &str) -> Result<f64, CoreError> {
        if Complex::new(0.0, self.im).is_zero() {
            Ok(self.re)
        } else {
            Err(CoreError::DomainError(format!(
                "{op}: argument must be real"
            )))
        }
    }

    /// Pivot-selection magnitude score: `max(|re|, |im|)`.
    pub fn mag(self) -> f64 {
        self.re.abs().max(self.im.abs())
    }

    pub fn is_zero(self) -> bool {
        self.re.abs() < TOLERANCE && self.im.abs() < TOLERANCE
    }

    pub fn is_one(self) -> bool {
        (self.re - 1.0).abs() < TOLERANCE && self.im.abs() < TOLERANCE
    }

    pub fn eq_tol(self, other: Complex) -> bool {
        self.sub(other).is_zero()
    }

    pub fn snap(x: f64) -> f64 {
        if x.abs() < TOLERANCE {
            0.0
        } else {
            x
        }
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = Complex::snap(self.re);
        let i = Complex::snap(self.im);
        let im_is_zero = Complex::new(0.0, i).is_zero();
        let re_is_zero = Complex::new(r, 0.0).is_zero();
        let im_is_one = Complex::new(0.0, i - 1.0).is_zero();
        let im_is_minus_one = Complex::new(0.0, i + 1.0).is_zero();

        if im_is_zero {
            write!(f, "{}", r)
        } else if re_is_zero {
            if im_is_one {
                write!(f, "i")
            } else {
                write!(f, "{}*i", i)
            }
        } else if im_is_minus_one {
            write!(f, "{} - i", r)
        } else if im_is_one {
            write!(f, "{} + i", r)
        } else {
            write!(f, "{} + {}*i", r, i)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_neg() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);
        assert_eq!(a.add(b), Complex::new(4.0, 1.0));
        assert_eq!(a.sub(b), Complex::new(-2.0, 3.0));
        assert_eq!(a.neg(), Complex::new(-1.0, -2.0));
    }

    #[test]
    fn mul_matches_field_rule() {
        let a = Complex::new(2.0, 3.0);
        let b = Complex::new(1.0, -1.0);
        assert_eq!(a.mul(b), Complex::new(5.0, 1.0));
    }

    #[test]
    fn div_by_zero_is_an_error() {
        let a = Complex::new(1.0, 0.0);
        assert_eq!(a.div(Complex::ZERO), Err(CoreError::DivByZero));
    }

    #[test]
    fn div_matches_conjugate_formula() {
        let a = Complex::new(5.0, 1.0);
        let b = Complex::new(1.0, -1.0);
        let q = a.div(b).unwrap();
        assert!(q.eq_tol(Complex::new(2.0, 3.0)));
    }

    #[test]
    fn i_squared_is_minus_one() {
        let i = Complex::I;
        assert!(i.mul(i).eq_tol(Complex::new(-1.0, 0.0)));
    }

    #[test]
    fn pow_rejects_complex_exponent() {
        let base = Complex::new(2.0, 0.0);
        let exp = Complex::new(1.0, 1.0);
        assert!(matches!(base.pow(exp), Err(CoreError::DomainError(_))));
    }

    #[test]
    fn pow_integer_matches_repeated_mul() {
        let base = Complex::new(2.0, 0.0);
        let cubed = base.pow(Complex::real(3.0)).unwrap();
        assert!(cubed.eq_tol(Complex::new(8.0, 0.0)));
    }

    #[test]
    fn rad_deg_roundtrip() {
        let ninety = Complex::real(90.0);
        let radians = ninety.rad().unwrap();
        assert!((radians.re - std::f64::consts::FRAC_PI_2).abs() < TOLERANCE);
        let back = radians.deg().unwrap();
        assert!(back.eq_tol(ninety));
    }

    #[test]
    fn rad_rejects_complex_input() {
        let z = Complex::new(1.0, 1.0);
        assert!(matches!(z.rad(), Err(CoreError::DomainError(_))));
    }

    #[test]
    fn display_real() {
        assert_eq!(Complex::new(3.0, 0.0).to_string(), "3");
        assert_eq!(Complex::new(-0.2, 0.0).to_string(), "-0.2");
    }

    #[test]
    fn display_pure_imaginary() {
        assert_eq!(Complex::new(0.0, 1.0).to_string(), "i");
        assert_eq!(Complex::new(0.0, 2.5).to_string(), "2.5*i");
    }

    #[test]
    fn display_minus_i() {
        assert_eq!(Complex::new(3.0, -1.0).to_string(), "3 - i");
    }

    #[test]
    fn display_general() {
        assert_eq!(Complex::new(1.0, 2.0).to_string(), "1 + 2*i");
        assert_eq!(Complex::new(1.0, 1.0).to_string(), "1 + i");
    }

    #[test]
    fn mag_is_max_of_parts() {
        assert_eq!(Complex::new(-3.0, 2.0).mag(), 3.0);
    }
}
