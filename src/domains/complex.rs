//! Complex numbers over an arbitrary base ring.

use std::fmt::{Display, Error, Formatter};

use crate::error::AlgebraError;

use super::integer::Integer;
use super::Ring;

/// The ring `R[i]` with `i^2 = -1`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ComplexRing<R: Ring> {
    base: R,
}

/// A complex number `re + im*i`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<R: Ring> ComplexRing<R> {
    pub fn new(base: R) -> ComplexRing<R> {
        ComplexRing { base }
    }

    pub fn base(&self) -> &R {
        &self.base
    }

    pub fn to_element(&self, re: R::Element, im: R::Element) -> Complex<R::Element> {
        Complex { re, im }
    }

    /// The imaginary unit.
    pub fn i(&self) -> Complex<R::Element> {
        Complex {
            re: self.base.zero(),
            im: self.base.one(),
        }
    }

    pub fn conjugate(&self, a: &Complex<R::Element>) -> Complex<R::Element> {
        Complex {
            re: a.re.clone(),
            im: self.base.neg(&a.im),
        }
    }

    /// Compute `re^2 + im^2`.
    pub fn norm(&self, a: &Complex<R::Element>) -> R::Element {
        let mut n = self.base.mul(&a.re, &a.re);
        self.base.add_mul_assign(&mut n, &a.im, &a.im);
        n
    }
}

impl<R: Ring> Display for ComplexRing<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[i]", self.base)
    }
}

impl<R: Ring> Ring for ComplexRing<R> {
    type Element = Complex<R::Element>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Complex {
            re: self.base.add(&a.re, &b.re),
            im: self.base.add(&a.im, &b.im),
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Complex {
            re: self.base.sub(&a.re, &b.re),
            im: self.base.sub(&a.im, &b.im),
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mut re = self.base.mul(&a.re, &b.re);
        self.base.sub_mul_assign(&mut re, &a.im, &b.im);
        let mut im = self.base.mul(&a.re, &b.im);
        self.base.add_mul_assign(&mut im, &a.im, &b.re);
        Complex { re, im }
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        self.base.add_assign(&mut a.re, &b.re);
        self.base.add_assign(&mut a.im, &b.im);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        self.base.sub_assign(&mut a.re, &b.re);
        self.base.sub_assign(&mut a.im, &b.im);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.add_assign(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        self.sub_assign(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Complex {
            re: self.base.neg(&a.re),
            im: self.base.neg(&a.im),
        }
    }

    fn zero(&self) -> Self::Element {
        Complex {
            re: self.base.zero(),
            im: self.base.zero(),
        }
    }

    fn one(&self) -> Self::Element {
        Complex {
            re: self.base.one(),
            im: self.base.zero(),
        }
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        Complex {
            re: self.base.nth(n),
            im: self.base.zero(),
        }
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = b.clone();
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = self.mul(&res, &base);
            }
            base = self.mul(&base, &base);
            e >>= 1;
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        R::is_zero(&a.re) && R::is_zero(&a.im)
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        self.base.is_one(&a.re) && R::is_zero(&a.im)
    }

    fn characteristic(&self) -> Integer {
        self.base.characteristic()
    }

    fn size(&self) -> Integer {
        let s = self.base.size();
        s.clone() * &s
    }

    /// Over a field of characteristic zero such as `Q`, `re^2 + im^2`
    /// vanishes only at zero, so every nonzero element is invertible.
    fn is_field(&self) -> bool {
        self.base.is_field() && self.base.characteristic() == 0
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.try_inv(b).ok().map(|inv| self.mul(a, &inv))
    }

    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        let n = self.base.try_inv(&self.norm(a)).map_err(|_| {
            AlgebraError::not_invertible(format!("{}", self.printer(a)))
        })?;
        let c = self.conjugate(a);
        Ok(Complex {
            re: self.base.mul(&c.re, &n),
            im: self.base.mul(&c.im, &n),
        })
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Complex {
            re: self.base.sample(rng, range),
            im: self.base.sample(rng, range),
        }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        if R::is_zero(&element.im) {
            return self.base.fmt_display(&element.re, in_product, f);
        }

        if f.sign_plus() {
            f.write_str("+")?;
        }
        if in_product {
            f.write_str("(")?;
        }
        // the imaginary part carries its own sign
        write!(
            f,
            "{}{:+}*i",
            self.base.printer(&element.re),
            self.base.printer(&element.im).in_product()
        )?;
        if in_product {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ComplexRing;
    use crate::domains::integer::Integer;
    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::term_order::NamedOrder;
    use crate::poly::Variable;

    #[test]
    fn inverse() {
        let c = ComplexRing::new(Q);
        let a = c.to_element(Q.to_element(1, 1), Q.to_element(2, 1));
        let inv = c.try_inv(&a).unwrap();
        assert_eq!(inv, c.to_element(Q.to_element(1, 5), Q.to_element(-2, 5)));
        assert_eq!(c.mul(&a, &inv), c.one());
        assert!(c.try_inv(&c.zero()).is_err());
        assert!(c.is_field());
    }

    #[test]
    fn imaginary_unit() {
        let c = ComplexRing::new(Q);
        let i = c.i();
        assert_eq!(c.mul(&i, &i), c.neg(&c.one()));
        assert_eq!(c.pow(&i, 4), c.one());
    }

    #[test]
    fn display() {
        let c = ComplexRing::new(Q);
        let a = c.to_element(Q.to_element(1, 1), Q.to_element(-2, 1));
        assert_eq!(c.printer(&a).to_string(), "1-2*i");
        let b = c.to_element(Q.to_element(-1, 2), Q.to_element(1, 2));
        assert_eq!(c.printer(&b).to_string(), "-1/2+(1/2)*i");

        let r = PolynomialRing::<_, u16>::new(
            c.clone(),
            Variable::list(&["x"]),
            NamedOrder::InvLex.into(),
        )
        .unwrap();
        let x = r.variable(0).unwrap();
        let three = r.constant(c.nth(&Integer::from(3)));
        assert_eq!((&x + &three).to_string(), "x+3");
        assert_eq!((&x - &three).to_string(), "x-3");
        assert_eq!((&r.monomial(a, &[1]) + &three).to_string(), "(1-2*i)*x+3");
    }
}
