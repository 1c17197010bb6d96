//! The ring of arbitrary-precision integers.

use std::cmp::Ordering;
use std::fmt::{Display, Error, Formatter};
use std::ops::Neg;

use rand::Rng;
use rug::ops::Pow;
pub use rug::Integer;

use crate::error::AlgebraError;

use super::{EuclideanDomain, Ring};

/// The integer ring.
pub type Z = IntegerRing;
/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerRing;

impl Default for IntegerRing {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }

    /// Compute the least common multiple of `a` and `b`. The result is non-negative.
    pub fn lcm(&self, a: &Integer, b: &Integer) -> Integer {
        a.clone().lcm(b)
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Z")
    }
}

/// Map `a` to the symmetric residue system `(-m/2, m/2]` of the positive modulus `m`.
pub fn symmetric_mod(a: &Integer, m: &Integer) -> Integer {
    let mut r = a.clone() % m;
    if r.cmp0() == Ordering::Less {
        r += m;
    }

    if r.clone() * 2u32 > *m {
        r -= m;
    }
    r
}

impl Ring for IntegerRing {
    type Element = Integer;

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

    #[inline(always)]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a += b.clone() * c;
    }

    #[inline(always)]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a -= b.clone() * c;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        Integer::new()
    }

    #[inline]
    fn one(&self) -> Self::Element {
        Integer::from(1)
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        n.clone()
    }

    #[inline]
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
        false
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if Self::is_zero(b) {
            return None;
        }

        let (q, r) = a.clone().div_rem_euc(b.clone());
        if Self::is_zero(&r) {
            Some(q)
        } else {
            None
        }
    }

    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if *a == 1 || *a == -1 {
            Ok(a.clone())
        } else {
            Err(AlgebraError::not_invertible(format!("{} in Z", a)))
        }
    }

    /// Sample an integer in `[range.0, range.1]`. An empty range yields `range.0`.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        if range.0 >= range.1 {
            return Integer::from(range.0);
        }
        Integer::from(rng.gen_range(range.0..=range.1))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if f.sign_plus() && element.cmp0() != Ordering::Less {
            f.write_str("+")?;
        }
        write!(f, "{}", element)
    }
}

impl EuclideanDomain for IntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone().div_rem_euc(b.clone()).1
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        a.clone().div_rem_euc(b.clone())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.clone().gcd(b)
    }
}
