//! The field of rational numbers.

use std::cmp::Ordering;
use std::fmt::{Display, Error, Formatter};
use std::ops::Neg;

use rand::Rng;
use rug::ops::Pow;
pub use rug::Rational;

use crate::error::AlgebraError;

use super::integer::Integer;
use super::{EuclideanDomain, Ring};

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RationalField;

impl Default for RationalField {
    fn default() -> Self {
        Self::new()
    }
}

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }

    /// Create the rational number `num/den`.
    pub fn to_element(&self, num: i64, den: i64) -> Rational {
        assert!(den != 0, "Zero denominator");
        Rational::from((num, den))
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Q")
    }
}

impl Ring for RationalField {
    type Element = Rational;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone() * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a += b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a -= b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a *= b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += b.clone() * c;
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= b.clone() * c;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Rational::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Rational::from(1)
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        Rational::from(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        if e > u32::MAX as u64 {
            panic!("Power of exponentation is larger than 2^32: {}", e);
        }
        b.clone().pow(e as u32)
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.cmp0() == Ordering::Equal
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn characteristic(&self) -> Integer {
        Integer::new()
    }

    fn size(&self) -> Integer {
        Integer::new()
    }

    fn is_field(&self) -> bool {
        true
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if Self::is_zero(b) {
            None
        } else {
            Some(a.clone() / b)
        }
    }

    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if Self::is_zero(a) {
            Err(AlgebraError::not_invertible("0 in Q"))
        } else {
            Ok(a.clone().recip())
        }
    }

    /// Sample a fraction whose numerator lies in `[range.0, range.1]` and whose
    /// denominator lies in `[1, max(|range|)]`. An empty range yields `range.0`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        if range.0 >= range.1 {
            return Rational::from(range.0);
        }

        let num = rng.gen_range(range.0..=range.1);
        let max_den = range.0.unsigned_abs().max(range.1.unsigned_abs()).max(1);
        let den = rng.gen_range(1..=max_den);
        Rational::from((num, den))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let negative = element.cmp0() == Ordering::Less;
        if f.sign_plus() && !negative {
            f.write_str("+")?;
        }

        if in_product && *element.denom() != 1 {
            if negative {
                write!(f, "-({})", element.clone().abs())
            } else {
                write!(f, "({})", element)
            }
        } else {
            write!(f, "{}", element)
        }
    }
}

impl EuclideanDomain for RationalField {
    fn rem(&self, _: &Self::Element, _: &Self::Element) -> Self::Element {
        Rational::new()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (a.clone() / b, Rational::new())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        // gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)
        let n = a.numer().clone().gcd(b.numer());
        let d = a.denom().clone().lcm(b.denom());
        Rational::from((n, d))
    }
}
