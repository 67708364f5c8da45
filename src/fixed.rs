//! 16.16 fixed-point arithmetic.
//!
//! A fixed-point value is an `i32` scaled by 2^16. The free functions work
//! on raw `i32` values (the rasterizer's hot loops use them directly);
//! [`Fixed`] wraps the same representation for callers that want operator
//! syntax and type safety.
//!
//! Addition and subtraction wrap. Multiplication, division and float
//! conversion saturate and report the overflow as a [`FixedError`].

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::error::{FixedError, OrSentinel};

// ============================================================================
// Constants
// ============================================================================

pub const FIXED_SHIFT: u32 = 16;
/// 1.0 in 16.16.
pub const FIXED_ONE: i32 = 1 << FIXED_SHIFT;
pub const FIXED_HALF: i32 = FIXED_ONE >> 1;
/// Largest magnitude produced by saturating operations.
pub const FIXED_MAX: i32 = 0x7FFF_FFFF;

// ============================================================================
// Conversions
// ============================================================================

/// Integer to fixed point. Wraps for `|x| >= 32768`.
#[inline]
pub fn itofix(x: i32) -> i32 {
    x.wrapping_shl(FIXED_SHIFT)
}

/// Fixed point to integer, rounding halves up.
#[inline]
pub fn fixtoi(x: i32) -> i32 {
    (x >> FIXED_SHIFT) + ((x & 0x8000) >> 15)
}

/// Largest integer not above `x`.
#[inline]
pub fn fixfloor(x: i32) -> i32 {
    x >> FIXED_SHIFT
}

/// Smallest integer not below `x`.
///
/// Values above `0x7FFF0000` have no representable ceiling and report
/// `Range(0x7FFF)`.
#[inline]
pub fn fixceil(x: i32) -> Result<i32, FixedError> {
    if x > 0x7FFF_0000 {
        return Err(FixedError::Range(0x7FFF));
    }
    Ok((x + 0xFFFF) >> FIXED_SHIFT)
}

/// Ceiling used by the rasterizer: saturates to `0x7FFF` on overflow.
#[inline]
pub(crate) fn fceil(x: i32) -> i32 {
    fixceil(x).or_sentinel()
}

/// Float to fixed point, rounding half away from zero.
#[inline]
pub fn ftofix(x: f64) -> Result<i32, FixedError> {
    if x > 32767.0 {
        return Err(FixedError::Range(FIXED_MAX));
    }
    if x < -32767.0 {
        return Err(FixedError::Range(-FIXED_MAX));
    }
    let bias = if x < 0.0 { -0.5 } else { 0.5 };
    Ok((x * 65536.0 + bias) as i32)
}

/// Fixed point to float.
#[inline]
pub fn fixtof(x: i32) -> f64 {
    x as f64 / 65536.0
}

// ============================================================================
// Arithmetic
// ============================================================================

#[inline]
pub fn fixadd(x: i32, y: i32) -> i32 {
    x.wrapping_add(y)
}

#[inline]
pub fn fixsub(x: i32, y: i32) -> i32 {
    x.wrapping_sub(y)
}

/// Product through a 64-bit intermediate, truncated toward negative
/// infinity. Saturates to `i32::MAX` / `i32::MIN` on overflow.
#[inline]
pub fn fixmul(x: i32, y: i32) -> Result<i32, FixedError> {
    let r = (x as i64 * y as i64) >> FIXED_SHIFT;
    if r > i32::MAX as i64 {
        Err(FixedError::Range(i32::MAX))
    } else if r < i32::MIN as i64 {
        Err(FixedError::Range(i32::MIN))
    } else {
        Ok(r as i32)
    }
}

/// Quotient computed in double precision and converted back.
///
/// Division by zero reports `Range(±0x7FFFFFFF)` signed like `x`, not
/// `Domain`: the result is treated as an overflow toward infinity, and
/// `or_sentinel` continues with the saturated value.
#[inline]
pub fn fixdiv(x: i32, y: i32) -> Result<i32, FixedError> {
    if y == 0 {
        return Err(FixedError::Range(if x < 0 { -FIXED_MAX } else { FIXED_MAX }));
    }
    ftofix(fixtof(x) / fixtof(y))
}

/// `fixmul` continuing with the saturated value.
#[inline]
pub(crate) fn fmul(x: i32, y: i32) -> i32 {
    fixmul(x, y).or_sentinel()
}

/// `fixdiv` continuing with the saturated value.
#[inline]
pub(crate) fn fdiv(x: i32, y: i32) -> i32 {
    fixdiv(x, y).or_sentinel()
}

// ============================================================================
// Fixed
// ============================================================================

/// A 16.16 fixed-point number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Fixed(pub i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(FIXED_ONE);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);

    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Fixed(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn from_int(x: i32) -> Self {
        Fixed(itofix(x))
    }

    /// Saturating conversion from a float.
    #[inline]
    pub fn from_f64(x: f64) -> Self {
        Fixed(ftofix(x).or_sentinel())
    }

    #[inline]
    pub fn try_from_f64(x: f64) -> Result<Self, FixedError> {
        ftofix(x).map(Fixed)
    }

    #[inline]
    pub fn from_f32(x: f32) -> Self {
        Self::from_f64(x as f64)
    }

    /// Nearest integer, halves rounded up.
    #[inline]
    pub fn to_int(self) -> i32 {
        fixtoi(self.0)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        fixtof(self.0)
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        fixtof(self.0) as f32
    }

    #[inline]
    pub fn floor(self) -> i32 {
        fixfloor(self.0)
    }

    #[inline]
    pub fn ceil(self) -> Result<i32, FixedError> {
        fixceil(self.0)
    }

    #[inline]
    pub fn checked_mul(self, rhs: Fixed) -> Result<Fixed, FixedError> {
        fixmul(self.0, rhs.0).map(Fixed)
    }

    #[inline]
    pub fn checked_div(self, rhs: Fixed) -> Result<Fixed, FixedError> {
        fixdiv(self.0, rhs.0).map(Fixed)
    }
}

impl From<i32> for Fixed {
    fn from(x: i32) -> Self {
        Fixed::from_int(x)
    }
}

impl From<Fixed> for f64 {
    fn from(x: Fixed) -> Self {
        x.to_f64()
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(fixadd(self.0, rhs.0))
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        self.0 = fixadd(self.0, rhs.0);
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(fixsub(self.0, rhs.0))
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        self.0 = fixsub(self.0, rhs.0);
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

/// Saturating; use [`Fixed::checked_mul`] to observe overflow.
impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(fmul(self.0, rhs.0))
    }
}

/// Saturating; use [`Fixed::checked_div`] to observe overflow.
impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed(fdiv(self.0, rhs.0))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itofix_fixtoi() {
        assert_eq!(itofix(3), 3 << 16);
        assert_eq!(itofix(-2), -2 << 16);
        assert_eq!(fixtoi(itofix(7)), 7);
        // Halves round up.
        assert_eq!(fixtoi(0x18000), 2);
        assert_eq!(fixtoi(0x17FFF), 1);
        assert_eq!(fixtoi(-0x18000), -1);
    }

    #[test]
    fn test_floor_ceil() {
        assert_eq!(fixfloor(0x18000), 1);
        assert_eq!(fixfloor(-0x8000), -1);
        assert_eq!(fixceil(0x10000), Ok(1));
        assert_eq!(fixceil(0x10001), Ok(2));
        assert_eq!(fixceil(-0x8000), Ok(0));
        assert_eq!(fixceil(0x7FFF_0000), Ok(0x7FFF));
        assert_eq!(fixceil(0x7FFF_0001), Err(FixedError::Range(0x7FFF)));
        assert_eq!(fceil(0x7FFF_FFFF), 0x7FFF);
    }

    #[test]
    fn test_ftofix_rounding() {
        assert_eq!(ftofix(1.0), Ok(0x10000));
        assert_eq!(ftofix(0.5), Ok(0x8000));
        assert_eq!(ftofix(-0.5), Ok(-0x8000));
        // Half of one ulp rounds away from zero.
        assert_eq!(ftofix(1.5 / 65536.0), Ok(2));
        assert_eq!(ftofix(-1.5 / 65536.0), Ok(-2));
        assert_eq!(ftofix(40000.0), Err(FixedError::Range(FIXED_MAX)));
        assert_eq!(ftofix(-40000.0), Err(FixedError::Range(-FIXED_MAX)));
    }

    #[test]
    fn test_add_sub_wrap() {
        assert_eq!(fixadd(i32::MAX, 1), i32::MIN);
        assert_eq!(fixsub(i32::MIN, 1), i32::MAX);
        assert_eq!(fixadd(itofix(2), itofix(3)), itofix(5));
    }

    #[test]
    fn test_mul() {
        assert_eq!(fixmul(itofix(3), itofix(4)), Ok(itofix(12)));
        assert_eq!(fixmul(itofix(-3), 0x8000), Ok(-0x18000));
        assert_eq!(fixmul(itofix(30000), itofix(30000)), Err(FixedError::Range(i32::MAX)));
        assert_eq!(fixmul(itofix(-30000), itofix(30000)), Err(FixedError::Range(i32::MIN)));
    }

    #[test]
    fn test_div() {
        assert_eq!(fixdiv(itofix(12), itofix(4)), Ok(itofix(3)));
        assert_eq!(fixdiv(itofix(1), itofix(3)), Ok(21845));
        assert_eq!(fixdiv(itofix(1), 0), Err(FixedError::Range(FIXED_MAX)));
        assert_eq!(fixdiv(itofix(-1), 0), Err(FixedError::Range(-FIXED_MAX)));
        assert_eq!(fixdiv(0, 0), Err(FixedError::Range(FIXED_MAX)));
        assert_eq!(fixdiv(itofix(30000), 0x100), Err(FixedError::Range(FIXED_MAX)));
        assert_eq!(fdiv(itofix(-30000), 0x100), -FIXED_MAX);
    }

    #[test]
    fn test_fixed_ops() {
        let a = Fixed::from_int(6);
        let b = Fixed::from_f64(1.5);
        assert_eq!(a + b, Fixed::from_f64(7.5));
        assert_eq!(a - b, Fixed::from_f64(4.5));
        assert_eq!(a * b, Fixed::from_int(9));
        assert_eq!(a / b, Fixed::from_int(4));
        assert_eq!(-a, Fixed::from_int(-6));
        assert_eq!(Fixed::from(2).to_int(), 2);
        assert!(Fixed::ONE.checked_div(Fixed::ZERO).is_err());
        assert_eq!(Fixed::from_f64(2.25).to_string(), "2.25");
    }
}
