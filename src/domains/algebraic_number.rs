//! Algebraic extensions `R[x]/(m)`, such as `Q(sqrt(2))` or the Galois field `GF(19^2)`.

use std::fmt::{Display, Error, Formatter};
use std::sync::Arc;

use rug::ops::Pow;
use tracing::debug;

use crate::error::AlgebraError;
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::poly::reconstruct::interpolate_univariate;

use super::integer::Integer;
use super::Ring;

/// The ring `R[x]/(m)` for a monic univariate polynomial `m`.
///
/// Elements are kept as remainders of degree less than the degree of `m`.
/// The field flag is set by the caller, for example when `m` is known to be
/// irreducible over a field. Inversion does not rely on it.
///
/// # Examples
///
/// ```
/// use polyring::domains::{algebraic_number::AlgebraicExtension, rational::Q, Ring};
/// use polyring::poly::{polynomial::PolynomialRing, term_order::NamedOrder, Variable};
///
/// let r = PolynomialRing::new(Q, Variable::list(&["x"]), NamedOrder::InvLex.into()).unwrap();
/// let x = r.variable(0).unwrap();
/// let m = &(&x * &x) - &r.constant(Q.to_element(2, 1));
///
/// let extension = AlgebraicExtension::new(m, true).unwrap();
/// let sqrt_2 = extension.generator();
/// assert_eq!(extension.mul(&sqrt_2, &sqrt_2), extension.nth(&2.into()));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AlgebraicExtension<R: Ring> {
    poly: Arc<MultivariatePolynomial<R, u16>>,
    is_field: bool,
}

/// A number in an [AlgebraicExtension], represented by its reduced polynomial.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct AlgebraicNumber<R: Ring> {
    pub(crate) poly: MultivariatePolynomial<R, u16>,
}

impl<R: Ring> Display for AlgebraicNumber<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.poly)
    }
}

impl<R: Ring> AlgebraicNumber<R> {
    pub fn poly(&self) -> &MultivariatePolynomial<R, u16> {
        &self.poly
    }

    pub fn into_poly(self) -> MultivariatePolynomial<R, u16> {
        self.poly
    }
}

impl<R: Ring> AlgebraicExtension<R> {
    /// Create the extension modulo `m`, which must be univariate, monic and of degree at least one.
    pub fn new(
        m: MultivariatePolynomial<R, u16>,
        is_field: bool,
    ) -> Result<AlgebraicExtension<R>, AlgebraError> {
        if m.nvars() != 1 {
            return Err(AlgebraError::invalid_configuration(format!(
                "modulus {} must be a polynomial in one variable, not {}",
                m,
                m.nvars()
            )));
        }

        if !m.order.is_admissible() {
            return Err(AlgebraError::invalid_configuration(format!(
                "modulus {} uses the non-admissible order {}",
                m, m.order
            )));
        }

        if m.degree(0) == 0 {
            return Err(AlgebraError::invalid_configuration(format!(
                "modulus {} must have positive degree",
                m
            )));
        }

        if !m.ring.is_one(&m.leading_base_coefficient()) {
            return Err(AlgebraError::invalid_configuration(format!(
                "modulus {} is not monic",
                m
            )));
        }

        Ok(AlgebraicExtension {
            poly: Arc::new(m),
            is_field,
        })
    }

    /// Create the field modulo `m` over a coefficient field. The caller asserts that
    /// `m` is irreducible.
    pub fn galois_field(m: MultivariatePolynomial<R, u16>) -> Result<AlgebraicExtension<R>, AlgebraError> {
        if !m.ring.is_field() {
            return Err(AlgebraError::invalid_configuration(format!(
                "a Galois field requires a coefficient field, not {}",
                m.ring
            )));
        }

        Self::new(m, true)
    }

    /// Get the defining polynomial.
    pub fn modulus(&self) -> &MultivariatePolynomial<R, u16> {
        &self.poly
    }

    pub fn degree(&self) -> u16 {
        self.poly.degree(0)
    }

    /// The class of the variable.
    pub fn generator(&self) -> AlgebraicNumber<R> {
        self.reduce(self.poly.monomial(self.poly.ring.one(), vec![1]))
    }

    pub fn constant(&self, c: R::Element) -> AlgebraicNumber<R> {
        self.reduce(self.poly.constant(c))
    }

    /// Reduce `poly` modulo the defining polynomial. A constant polynomial without
    /// variables is accepted as well.
    pub fn to_element(
        &self,
        poly: MultivariatePolynomial<R, u16>,
    ) -> Result<AlgebraicNumber<R>, AlgebraError> {
        if poly.nvars() > 1 {
            return Err(AlgebraError::RankMismatch {
                expected: 1,
                found: poly.nvars(),
            });
        }

        Ok(self.reduce_univariate(&poly))
    }

    /// Move a polynomial of rank at most one into the ring of the modulus and reduce it.
    fn reduce_univariate(&self, poly: &MultivariatePolynomial<R, u16>) -> AlgebraicNumber<R> {
        let mut p = self.poly.zero_with_capacity(poly.nterms());
        for t in poly {
            p.append_monomial(t.coefficient.clone(), &[t.exponents.first().copied().unwrap_or(0)]);
        }

        self.reduce(p)
    }

    fn reduce(&self, mut p: MultivariatePolynomial<R, u16>) -> AlgebraicNumber<R> {
        let d = self.degree();
        while let Some(e) = p.leading_exp_vector() {
            if e[0] < d {
                break;
            }

            let c = p.leading_base_coefficient();
            p = &p - &self.poly.mul_monomial_left(&c, &[e[0] - d]);
        }

        AlgebraicNumber { poly: p }
    }

    /// The extension modulo the product of both defining polynomials. The field flag is unset.
    pub fn product(&self, other: &AlgebraicExtension<R>) -> Result<AlgebraicExtension<R>, AlgebraError> {
        self.poly.check_compatible(&other.poly)?;

        Ok(AlgebraicExtension {
            poly: Arc::new(&*self.poly * &*other.poly),
            is_field: false,
        })
    }

    /// Combine `c` modulo `m0` (the modulus of `ring0`) and `a` modulo `m1`
    /// (the modulus of `ring1`) into the element modulo `m0 * m1` of `self`,
    /// where `ci` is the inverse of `m0` in `ring1`.
    pub fn chinese_remainder(
        &self,
        ring0: &AlgebraicExtension<R>,
        c: &AlgebraicNumber<R>,
        ci: &AlgebraicNumber<R>,
        ring1: &AlgebraicExtension<R>,
        a: &AlgebraicNumber<R>,
    ) -> AlgebraicNumber<R> {
        let b = ring1.reduce_univariate(&c.poly);
        let d = ring1.sub(a, &b);
        if Self::is_zero(&d) {
            debug!("residues agree, no correction needed");
            return self.reduce_univariate(&c.poly);
        }

        let b = ring1.mul(&d, ci);
        self.reduce_univariate(&(&(&*ring0.poly * &b.poly) + &c.poly))
    }

    /// Combine `c` modulo `m0` (the modulus of `ring0`) with the value `a` at the point `am`
    /// into the element modulo `m0 * (x - am)` of `self`, where `ci` is the inverse of `m0(am)`.
    pub fn interpolate(
        &self,
        ring0: &AlgebraicExtension<R>,
        c: &AlgebraicNumber<R>,
        ci: &R::Element,
        am: &R::Element,
        a: &R::Element,
    ) -> Result<AlgebraicNumber<R>, AlgebraError> {
        let s = interpolate_univariate(&c.poly, &ring0.poly, ci, a, am)?;
        Ok(self.reduce_univariate(&s))
    }
}

impl<R: Ring> Display for AlgebraicExtension<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]/({})", self.poly.ring, self.poly.variables[0], self.poly)
    }
}

impl<R: Ring> Ring for AlgebraicExtension<R> {
    type Element = AlgebraicNumber<R>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly + &b.poly,
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        AlgebraicNumber {
            poly: &a.poly - &b.poly,
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.reduce(&a.poly * &b.poly)
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
        AlgebraicNumber {
            poly: -a.poly.clone(),
        }
    }

    fn zero(&self) -> Self::Element {
        AlgebraicNumber {
            poly: self.poly.zero(),
        }
    }

    fn one(&self) -> Self::Element {
        self.constant(self.poly.ring.one())
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        self.constant(self.poly.ring.nth(n))
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = b.clone();
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = self.mul(&res, &base);
            }
            e >>= 1;
            if e > 0 {
                base = self.mul(&base, &base);
            }
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.poly.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.poly.is_one()
    }

    fn characteristic(&self) -> Integer {
        self.poly.ring.characteristic()
    }

    fn size(&self) -> Integer {
        let s = self.poly.ring.size();
        if s == 0 {
            s
        } else {
            s.pow(self.degree() as u32)
        }
    }

    fn is_field(&self) -> bool {
        self.is_field
    }

    fn is_commutative(&self) -> bool {
        self.poly.ring.is_commutative()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        self.try_inv(b).ok().map(|inv| self.mul(a, &inv))
    }

    /// Invert with the extended Euclidean algorithm against the modulus.
    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if Self::is_zero(a) {
            return Err(AlgebraError::not_invertible(format!("0 in {}", self)));
        }

        let (g, s, _) = a.poly.egcd(&self.poly)?;
        if !g.is_one() {
            return Err(AlgebraError::not_invertible(format!(
                "{} in {}: gcd is {}",
                a, self, g
            )));
        }

        Ok(self.reduce(s))
    }

    /// Sample an element with random coefficients for all powers below the degree.
    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let mut poly = self.poly.zero_with_capacity(self.degree() as usize);
        for i in 0..self.degree() {
            poly.append_monomial(self.poly.ring.sample(rng, range), &[i]);
        }

        AlgebraicNumber { poly }
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        PolynomialRing::from_poly(&self.poly).fmt_display(&element.poly, in_product, f)
    }
}
