//! Hamilton quaternions over an arbitrary base ring.

use std::fmt::{Display, Error, Formatter};

use crate::error::AlgebraError;

use super::integer::Integer;
use super::Ring;

/// The quaternion algebra with `i^2 = j^2 = k^2 = ijk = -1`.
/// Multiplication is not commutative.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct QuaternionRing<R: Ring> {
    base: R,
}

/// A quaternion `re + i*i + j*j + k*k`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Quaternion<T> {
    pub re: T,
    pub i: T,
    pub j: T,
    pub k: T,
}

impl<R: Ring> QuaternionRing<R> {
    pub fn new(base: R) -> QuaternionRing<R> {
        QuaternionRing { base }
    }

    pub fn base(&self) -> &R {
        &self.base
    }

    pub fn to_element(
        &self,
        re: R::Element,
        i: R::Element,
        j: R::Element,
        k: R::Element,
    ) -> Quaternion<R::Element> {
        Quaternion { re, i, j, k }
    }

    /// The units `i`, `j` and `k`.
    pub fn units(&self) -> [Quaternion<R::Element>; 3] {
        let (z, o) = (self.base.zero(), self.base.one());
        [
            self.to_element(z.clone(), o.clone(), z.clone(), z.clone()),
            self.to_element(z.clone(), z.clone(), o.clone(), z.clone()),
            self.to_element(z.clone(), z.clone(), z, o),
        ]
    }

    pub fn conjugate(&self, a: &Quaternion<R::Element>) -> Quaternion<R::Element> {
        Quaternion {
            re: a.re.clone(),
            i: self.base.neg(&a.i),
            j: self.base.neg(&a.j),
            k: self.base.neg(&a.k),
        }
    }

    /// Compute the sum of the squares of the components.
    pub fn norm(&self, a: &Quaternion<R::Element>) -> R::Element {
        let mut n = self.base.mul(&a.re, &a.re);
        self.base.add_mul_assign(&mut n, &a.i, &a.i);
        self.base.add_mul_assign(&mut n, &a.j, &a.j);
        self.base.add_mul_assign(&mut n, &a.k, &a.k);
        n
    }

    fn scale(&self, a: &Quaternion<R::Element>, s: &R::Element) -> Quaternion<R::Element> {
        Quaternion {
            re: self.base.mul(&a.re, s),
            i: self.base.mul(&a.i, s),
            j: self.base.mul(&a.j, s),
            k: self.base.mul(&a.k, s),
        }
    }
}

impl<R: Ring> Display for QuaternionRing<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[i,j,k]", self.base)
    }
}

impl<R: Ring> Ring for QuaternionRing<R> {
    type Element = Quaternion<R::Element>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Quaternion {
            re: self.base.add(&a.re, &b.re),
            i: self.base.add(&a.i, &b.i),
            j: self.base.add(&a.j, &b.j),
            k: self.base.add(&a.k, &b.k),
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Quaternion {
            re: self.base.sub(&a.re, &b.re),
            i: self.base.sub(&a.i, &b.i),
            j: self.base.sub(&a.j, &b.j),
            k: self.base.sub(&a.k, &b.k),
        }
    }

    /// The Hamilton product.
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let r = &self.base;

        let mut re = r.mul(&a.re, &b.re);
        r.sub_mul_assign(&mut re, &a.i, &b.i);
        r.sub_mul_assign(&mut re, &a.j, &b.j);
        r.sub_mul_assign(&mut re, &a.k, &b.k);

        let mut i = r.mul(&a.re, &b.i);
        r.add_mul_assign(&mut i, &a.i, &b.re);
        r.add_mul_assign(&mut i, &a.j, &b.k);
        r.sub_mul_assign(&mut i, &a.k, &b.j);

        let mut j = r.mul(&a.re, &b.j);
        r.sub_mul_assign(&mut j, &a.i, &b.k);
        r.add_mul_assign(&mut j, &a.j, &b.re);
        r.add_mul_assign(&mut j, &a.k, &b.i);

        let mut k = r.mul(&a.re, &b.k);
        r.add_mul_assign(&mut k, &a.i, &b.j);
        r.sub_mul_assign(&mut k, &a.j, &b.i);
        r.add_mul_assign(&mut k, &a.k, &b.re);

        Quaternion { re, i, j, k }
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
        *a = self.add(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Quaternion {
            re: self.base.neg(&a.re),
            i: self.base.neg(&a.i),
            j: self.base.neg(&a.j),
            k: self.base.neg(&a.k),
        }
    }

    fn zero(&self) -> Self::Element {
        let z = self.base.zero();
        self.to_element(z.clone(), z.clone(), z.clone(), z)
    }

    fn one(&self) -> Self::Element {
        let z = self.base.zero();
        self.to_element(self.base.one(), z.clone(), z.clone(), z)
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        let z = self.base.zero();
        self.to_element(self.base.nth(n), z.clone(), z.clone(), z)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        // powers of a single quaternion commute
        let mut res = self.one();
        for _ in 0..e {
            res = self.mul(&res, b);
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        R::is_zero(&a.re) && R::is_zero(&a.i) && R::is_zero(&a.j) && R::is_zero(&a.k)
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        self.base.is_one(&a.re) && R::is_zero(&a.i) && R::is_zero(&a.j) && R::is_zero(&a.k)
    }

    fn characteristic(&self) -> Integer {
        self.base.characteristic()
    }

    fn size(&self) -> Integer {
        let s = self.base.size();
        s.clone() * &s * &s * &s
    }

    /// Quaternions over `Q` form a division ring, not a field.
    fn is_field(&self) -> bool {
        false
    }

    fn is_commutative(&self) -> bool {
        false
    }

    /// Right division `a * b^-1`.
    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.try_inv(b).ok().map(|inv| self.mul(a, &inv))
    }

    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        let n = self.base.try_inv(&self.norm(a)).map_err(|_| {
            AlgebraError::not_invertible(format!("{}", self.printer(a)))
        })?;
        Ok(self.scale(&self.conjugate(a), &n))
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Quaternion {
            re: self.base.sample(rng, range),
            i: self.base.sample(rng, range),
            j: self.base.sample(rng, range),
            k: self.base.sample(rng, range),
        }
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
        write!(
            f,
            "({}{:+}*i{:+}*j{:+}*k)",
            self.base.printer(&element.re),
            self.base.printer(&element.i).in_product(),
            self.base.printer(&element.j).in_product(),
            self.base.printer(&element.k).in_product()
        )
    }
}

#[cfg(test)]
mod test {
    use super::QuaternionRing;
    use crate::domains::rational::Q;
    use crate::domains::Ring;

    #[test]
    fn hamilton() {
        let h = QuaternionRing::new(Q);
        let [i, j, k] = h.units();
        let minus_one = h.neg(&h.one());

        assert_eq!(h.mul(&i, &i), minus_one);
        assert_eq!(h.mul(&j, &j), minus_one);
        assert_eq!(h.mul(&h.mul(&i, &j), &k), minus_one);
        assert_eq!(h.mul(&i, &j), k);
        assert_eq!(h.mul(&j, &i), h.neg(&k));
        assert!(!h.is_commutative());
    }

    #[test]
    fn inverse() {
        let h = QuaternionRing::new(Q);
        let a = h.to_element(
            Q.to_element(1, 1),
            Q.to_element(2, 1),
            Q.to_element(-1, 1),
            Q.to_element(3, 1),
        );
        let inv = h.try_inv(&a).unwrap();
        assert_eq!(h.mul(&a, &inv), h.one());
        assert_eq!(h.mul(&inv, &a), h.one());
        assert!(h.try_inv(&h.zero()).is_err());
    }

    #[test]
    fn display() {
        let h = QuaternionRing::new(Q);
        let [i, j, _] = h.units();
        assert_eq!(h.printer(&i).to_string(), "(0+1*i+0*j+0*k)");
        assert_eq!(h.printer(&h.neg(&j)).to_string(), "(0+0*i-1*j+0*k)");
    }
}
