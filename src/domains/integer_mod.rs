use std::cmp::Ordering;
use std::fmt::{Display, Error, Formatter};

use rug::integer::IsPrime;
use tracing::debug;

use crate::error::AlgebraError;

use super::integer::{symmetric_mod, Integer, Z};
use super::Ring;

/// The modular ring `Z / mZ`, where `m` can be any integer larger than one.
/// Elements are stored as residues in `[0, m)`.
///
/// The ring carries a field flag. It is detected with a probabilistic primality
/// test in [IntegerMod::new], and can be asserted by the caller with [IntegerMod::with_field_flag].
/// Inversion never relies on the flag: non-units always yield [AlgebraError::NotInvertible].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct IntegerMod {
    modulus: Integer,
    is_field: bool,
}

impl IntegerMod {
    pub fn new(m: Integer) -> Result<IntegerMod, AlgebraError> {
        let is_field = m > 1 && m.is_probably_prime(30) != IsPrime::No;
        Self::with_field_flag(m, is_field)
    }

    pub fn with_field_flag(m: Integer, is_field: bool) -> Result<IntegerMod, AlgebraError> {
        if m <= 1 {
            return Err(AlgebraError::invalid_configuration(format!(
                "modulus {} must be larger than one",
                m
            )));
        }

        Ok(IntegerMod {
            modulus: m,
            is_field,
        })
    }

    pub fn modulus(&self) -> &Integer {
        &self.modulus
    }

    /// Reduce an integer to its residue in `[0, m)`.
    pub fn to_element(&self, a: &Integer) -> Integer {
        let mut r = a.clone() % &self.modulus;
        if r.cmp0() == Ordering::Less {
            r += &self.modulus;
        }
        r
    }

    /// Map a residue to the symmetric residue system `(-m/2, m/2]`.
    pub fn to_symmetric(&self, a: &Integer) -> Integer {
        symmetric_mod(a, &self.modulus)
    }

    /// Build the ring modulo `m0 * m1`, used as target of [IntegerMod::chinese_remainder].
    pub fn product(&self, other: &IntegerMod) -> IntegerMod {
        IntegerMod {
            modulus: self.modulus.clone() * &other.modulus,
            is_field: false,
        }
    }

    /// Combine `c` modulo `m0` (the modulus of `ring0`) and `a` modulo `m1`
    /// (the modulus of `ring1`) into the residue modulo `m0 * m1` of `self`,
    /// where `ci` is the inverse of `m0` modulo `m1`.
    pub fn chinese_remainder(
        &self,
        ring0: &IntegerMod,
        c: &Integer,
        ci: &Integer,
        ring1: &IntegerMod,
        a: &Integer,
    ) -> Integer {
        let b = ring1.to_element(c);
        let d = ring1.sub(a, &b);
        if Self::is_zero(&d) {
            debug!("residues agree, no correction needed");
            return self.to_element(c);
        }

        let b = ring1.mul(&d, ci);
        let s = ring0.modulus.clone() * &b + c;
        self.to_element(&s)
    }
}

impl Display for IntegerMod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z/{}", self.modulus)
    }
}

impl Ring for IntegerMod {
    type Element = Integer;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mut r = a.clone() + b;
        if r >= self.modulus {
            r -= &self.modulus;
        }
        r
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mut r = a.clone() - b;
        if r.cmp0() == Ordering::Less {
            r += &self.modulus;
        }
        r
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.to_element(&(a.clone() * b))
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.to_element(&(b.clone() * c + &*a));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.to_element(&(a.clone() - b.clone() * c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        if Self::is_zero(a) {
            a.clone()
        } else {
            self.modulus.clone() - a
        }
    }

    fn zero(&self) -> Self::Element {
        Integer::new()
    }

    fn one(&self) -> Self::Element {
        self.to_element(&Integer::from(1))
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        self.to_element(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        match b.clone().pow_mod(&Integer::from(e), &self.modulus) {
            Ok(r) => r,
            Err(_) => unreachable!("non-negative exponents always have a modular power"),
        }
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.cmp0() == Ordering::Equal
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn characteristic(&self) -> Integer {
        self.modulus.clone()
    }

    fn size(&self) -> Integer {
        self.modulus.clone()
    }

    fn is_field(&self) -> bool {
        self.is_field
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.try_inv(b).ok().map(|inv| self.mul(a, &inv))
    }

    /// Compute the inverse when `a` and the modulus are coprime.
    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if Self::is_zero(a) {
            return Err(AlgebraError::not_invertible(format!("0 mod {}", self.modulus)));
        }

        a.clone().invert(&self.modulus).map_err(|_| {
            AlgebraError::not_invertible(format!("{} mod {}", a, self.modulus))
        })
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.to_element(&Z.sample(rng, range))
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        _in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if f.sign_plus() {
            f.write_str("+")?;
        }
        write!(f, "{}", element)
    }
}

#[cfg(test)]
mod test {
    use super::IntegerMod;
    use crate::domains::integer::Integer;
    use crate::domains::Ring;

    #[test]
    fn field_detection() {
        let f = IntegerMod::new(19.into()).unwrap();
        assert!(f.is_field());
        let r = IntegerMod::new(12.into()).unwrap();
        assert!(!r.is_field());
        assert!(IntegerMod::new(1.into()).is_err());
    }

    #[test]
    fn arithmetic() {
        let r = IntegerMod::new(12.into()).unwrap();
        let a = r.nth(&Integer::from(-5));
        assert_eq!(a, 7);
        assert_eq!(r.add(&a, &r.nth(&9.into())), 4);
        assert_eq!(r.neg(&a), 5);
        assert_eq!(r.pow(&a, 2), 1);
        assert_eq!(r.try_inv(&a), Ok(Integer::from(7)));
        assert!(r.try_inv(&r.nth(&4.into())).unwrap_err().is_not_invertible());
        assert_eq!(r.to_symmetric(&a), -5);
    }

    #[test]
    fn chinese_remainder() {
        let r0 = IntegerMod::new(7.into()).unwrap();
        let r1 = IntegerMod::new(11.into()).unwrap();
        let r01 = r0.product(&r1);
        let ci = r1.try_inv(&r1.nth(r0.modulus())).unwrap();

        for v in [0, 5, 23, 76] {
            let v = Integer::from(v);
            let c = r0.to_element(&v);
            let a = r1.to_element(&v);
            assert_eq!(r01.chinese_remainder(&r0, &c, &ci, &r1, &a), v);
        }
    }
}
