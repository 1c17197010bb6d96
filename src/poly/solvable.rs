//! Solvable polynomial rings: polynomial rings whose variables satisfy commutation
//! relations, such as the Weyl algebra `y*x = x*y + 1`.
//!
//! Elements are ordinary [MultivariatePolynomial]s, whose terms are read as the
//! standard monomials `c * x_0^e_0 * ... * x_n^e_n`. Only the multiplication differs
//! from the commutative ring.

use std::fmt::{Display, Error, Formatter};
use std::sync::Arc;

use crate::domains::integer::Integer;
use crate::domains::Ring;
use crate::error::AlgebraError;

use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::relation_table::{RelationTable, TableLookup};
use super::{ExpVector, Exponent};

/// A polynomial ring with the multiplication defined by a [RelationTable].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SolvablePolynomialRing<R: Ring, E: Exponent = u16> {
    ring: PolynomialRing<R, E>,
    table: Arc<RelationTable<R, E>>,
}

impl<R: Ring, E: Exponent> SolvablePolynomialRing<R, E> {
    /// Create the solvable ring. The table must have been built for `ring`.
    pub fn new(
        ring: PolynomialRing<R, E>,
        table: RelationTable<R, E>,
    ) -> Result<SolvablePolynomialRing<R, E>, AlgebraError> {
        if table.ring() != &ring {
            return Err(AlgebraError::invalid_configuration(format!(
                "relation table for {} used in {}",
                table.ring(),
                ring
            )));
        }

        Ok(SolvablePolynomialRing {
            ring,
            table: Arc::new(table),
        })
    }

    pub fn poly_ring(&self) -> &PolynomialRing<R, E> {
        &self.ring
    }

    pub fn table(&self) -> &RelationTable<R, E> {
        &self.table
    }

    pub fn variable(&self, index: usize) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
        self.ring.variable(index)
    }

    fn monomial(&self, e: &[E]) -> MultivariatePolynomial<R, E> {
        self.ring.monomial(self.ring.coefficient_ring().one(), e)
    }

    /// Compute `x^e * x^f`.
    pub fn mul_monomials(&self, e: &ExpVector<E>, f: &ExpVector<E>) -> MultivariatePolynomial<R, E> {
        let de = e.dependency();
        let df = f.dependency();

        let (Some(&le), Some(&sf)) = (de.last(), df.first()) else {
            return self.monomial(&e.sum(f));
        };

        if le <= sf {
            return self.monomial(&e.sum(f));
        }

        // e = e1 * e2 with e2 the power of the largest variable of e,
        // f = f2 * f1 with f2 the power of the smallest variable of f
        let e2 = ExpVector::unit(e.rank(), le, e[le]);
        let f2 = ExpVector::unit(f.rank(), sf, f[sf]);
        let e1 = e.checked_sub(&e2).unwrap_or_else(|| e.clone());
        let f1 = f.checked_sub(&f2).unwrap_or_else(|| f.clone());

        let mut c = match self.table.lookup(&e2, &f2) {
            TableLookup::Exact(p) => p.clone(),
            TableLookup::Partial {
                left,
                relation,
                right,
            } => {
                let mut p = relation.product.clone();
                if !left.is_zero() {
                    p = self.mul_polynomials(&self.monomial(&left), &p);
                }
                if !right.is_zero() {
                    p = self.mul_polynomials(&p, &self.monomial(&right));
                }
                p
            }
            TableLookup::Commute => self.monomial(&e2.sum(&f2)),
        };

        if !e1.is_zero() {
            c = self.mul_polynomials(&self.monomial(&e1), &c);
        }
        if !f1.is_zero() {
            c = self.mul_polynomials(&c, &self.monomial(&f1));
        }
        c
    }

    /// Multiply two polynomials term by term. The coefficients commute with the variables.
    pub fn mul_polynomials(
        &self,
        a: &MultivariatePolynomial<R, E>,
        b: &MultivariatePolynomial<R, E>,
    ) -> MultivariatePolynomial<R, E> {
        assert_eq!(
            a.nvars(),
            b.nvars(),
            "Cannot multiply polynomials of different rank"
        );

        if self.table.is_empty() {
            return a * b;
        }

        let coeff_ring = self.ring.coefficient_ring();
        let mut res = a.zero();
        for ta in a {
            let e = ta.exp_vector();
            for tb in b {
                let c = coeff_ring.mul(ta.coefficient, tb.coefficient);
                if R::is_zero(&c) {
                    continue;
                }

                let p = self.mul_monomials(&e, &tb.exp_vector());
                res = &res + &p.mul_monomial_left(&c, &ExpVector::zero(e.rank()));
            }
        }
        res
    }
}

impl<R: Ring, E: Exponent> Display for SolvablePolynomialRing<R, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.ring, self.table)
    }
}

impl<R: Ring, E: Exponent> Ring for SolvablePolynomialRing<R, E> {
    type Element = MultivariatePolynomial<R, E>;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul_polynomials(a, b)
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a + b;
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a - b;
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul_polynomials(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = &*a + &self.mul_polynomials(b, c);
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = &*a - &self.mul_polynomials(b, c);
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        self.ring.neg(a)
    }

    fn zero(&self) -> Self::Element {
        self.ring.zero()
    }

    fn one(&self) -> Self::Element {
        self.ring.one()
    }

    fn nth(&self, n: &Integer) -> Self::Element {
        self.ring.nth(n)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        let mut res = self.one();
        for _ in 0..e {
            res = self.mul_polynomials(&res, b);
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn characteristic(&self) -> Integer {
        self.ring.characteristic()
    }

    fn size(&self) -> Integer {
        self.ring.size()
    }

    fn is_field(&self) -> bool {
        false
    }

    fn is_commutative(&self) -> bool {
        self.table.is_empty() && self.ring.is_commutative()
    }

    /// Division is only supported by units and in the commutative case.
    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if let Ok(inv) = self.try_inv(b) {
            return Some(self.mul_polynomials(a, &inv));
        }

        if self.table.is_empty() {
            a.divides(b)
        } else {
            None
        }
    }

    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        self.ring.try_inv(a)
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.ring.sample(rng, range)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        self.ring.fmt_display(element, in_product, f)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::SolvablePolynomialRing;
    use crate::domains::rational::{RationalField, Q};
    use crate::domains::Ring;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::relation_table::RelationTable;
    use crate::poly::term_order::NamedOrder;
    use crate::poly::{ExpVector, Variable};

    fn weyl() -> SolvablePolynomialRing<RationalField> {
        let r = PolynomialRing::new(Q, Variable::list(&["x", "y"]), NamedOrder::IGrLex.into())
            .unwrap();
        let x = r.variable(0).unwrap();
        let y = r.variable(1).unwrap();

        let mut t = RelationTable::new(&r);
        t.update(
            ExpVector::unit(2, 1, 1),
            ExpVector::unit(2, 0, 1),
            &(&x * &y) + &r.one(),
        )
        .unwrap();
        SolvablePolynomialRing::new(r, t).unwrap()
    }

    #[test]
    fn weyl_commutator() {
        let w = weyl();
        let x = w.variable(0).unwrap();
        let y = w.variable(1).unwrap();

        let c = w.sub(&w.mul(&x, &y), &w.mul(&y, &x));
        assert_eq!(c, w.neg(&w.one()));
        assert!(!w.is_commutative());

        // y*x^2 = x^2*y + 2*x
        let x2 = w.mul(&x, &x);
        let expected = &w.mul(&x2, &y) + &(&x * &w.poly_ring().constant(Q.to_element(2, 1)));
        assert_eq!(w.mul(&y, &x2), expected);
    }

    #[test]
    fn weyl_associativity() {
        let w = weyl();
        let mut rng = StdRng::seed_from_u64(2);

        for _ in 0..10 {
            let a = w.poly_ring().random(&mut rng, 3, 3, 0.8, (-4, 4));
            let b = w.poly_ring().random(&mut rng, 3, 3, 0.8, (-4, 4));
            let c = w.poly_ring().random(&mut rng, 3, 3, 0.8, (-4, 4));

            assert_eq!(
                w.mul(&w.mul(&a, &b), &c),
                w.mul(&a, &w.mul(&b, &c)),
                "{} {} {}",
                a,
                b,
                c
            );
            assert_eq!(
                w.mul(&a, &w.add(&b, &c)),
                w.add(&w.mul(&a, &b), &w.mul(&a, &c))
            );
        }
    }

    #[test]
    fn empty_table_is_commutative() {
        let r = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x", "y"]), NamedOrder::Lex.into())
            .unwrap();
        let s = SolvablePolynomialRing::new(r.clone(), RelationTable::new(&r)).unwrap();
        assert!(s.is_commutative());

        let x = r.variable(0).unwrap();
        let y = r.variable(1).unwrap();
        assert_eq!(s.mul(&y, &x), &x * &y);

        let other = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x"]), NamedOrder::Lex.into())
            .unwrap();
        assert!(SolvablePolynomialRing::new(other, RelationTable::new(&r)).is_err());
    }
}
