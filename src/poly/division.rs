//! Division with remainder, exact division and pseudo-division.

use tracing::{debug, instrument};

use crate::domains::Ring;
use crate::error::AlgebraError;

use super::polynomial::MultivariatePolynomial;
use super::{add_exponents, ExpVector, Exponent};

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Compute `c * x^exponents * self`, multiplying the coefficients from the left.
    pub fn mul_monomial_left(&self, c: &F::Element, exponents: &[E]) -> Self {
        let mut res = self.zero_with_capacity(self.nterms());
        for i in 0..self.nterms() {
            let coeff = self.ring.mul(c, &self.coefficients[i]);
            if F::is_zero(&coeff) {
                continue;
            }
            res.coefficients.push(coeff);
            for (e1, e2) in self.exponents(i).iter().zip(exponents) {
                res.exponents.push(add_exponents(e1, e2));
            }
        }
        res
    }

    /// Build a polynomial from terms listed from largest to smallest.
    fn from_descending_terms(&self, terms: Vec<(F::Element, ExpVector<E>)>) -> Self {
        let mut res = self.zero_with_capacity(terms.len());
        for (c, e) in terms.into_iter().rev() {
            if !F::is_zero(&c) {
                res.coefficients.push(c);
                res.exponents.extend_from_slice(&e);
            }
        }
        res
    }

    fn check_division(&self, div: &Self) -> Result<(), AlgebraError> {
        self.check_compatible(div)?;

        if !self.order.is_admissible() {
            return Err(AlgebraError::invalid_configuration(format!(
                "division requires an admissible term order, not {}",
                self.order
            )));
        }

        if div.is_zero() {
            return Err(AlgebraError::not_invertible("division by the zero polynomial"));
        }

        Ok(())
    }

    /// Multiply by the inverse of the leading coefficient.
    /// The zero polynomial is returned unchanged.
    pub fn monic(&self) -> Result<Self, AlgebraError> {
        if self.is_zero() {
            return Ok(self.clone());
        }

        let inv = self.ring.try_inv(&self.leading_base_coefficient())?;
        Ok(self.clone().mul_coeff(inv))
    }

    /// Divide by `div`, returning the quotient `q` and remainder `r` such that
    /// `self = q * div + r` and no term of `r` is a multiple of the leading
    /// monomial of `div`.
    ///
    /// The leading coefficient of `div` must be a unit. Use
    /// [MultivariatePolynomial::pseudo_divide_and_remainder] otherwise.
    pub fn divide_and_remainder(&self, div: &Self) -> Result<(Self, Self), AlgebraError> {
        self.check_division(div)?;

        let inv = self.ring.try_inv(&div.leading_base_coefficient())?;
        let lexp = ExpVector::from(div.last_exponents());

        let mut r = self.clone();
        let mut q_terms = vec![];
        let mut rem_terms = vec![];

        while !r.is_zero() {
            let e = ExpVector::from(r.last_exponents());
            let c = r.leading_base_coefficient();

            if let Some(f) = e.checked_sub(&lexp) {
                let c = self.ring.mul(&c, &inv);
                r = &r - &div.mul_monomial_left(&c, &f);
                q_terms.push((c, f));
            } else {
                rem_terms.push((c, e));
                r = r.reductum();
            }
        }

        Ok((
            self.from_descending_terms(q_terms),
            self.from_descending_terms(rem_terms),
        ))
    }

    /// The remainder of [MultivariatePolynomial::divide_and_remainder].
    pub fn rem(&self, div: &Self) -> Result<Self, AlgebraError> {
        Ok(self.divide_and_remainder(div)?.1)
    }

    /// Divide by `div`, failing with [AlgebraError::Inexact] if the remainder is not zero.
    pub fn div_exact(&self, div: &Self) -> Result<Self, AlgebraError> {
        let (q, r) = self.divide_and_remainder(div)?;
        if r.is_zero() {
            Ok(q)
        } else {
            Err(AlgebraError::Inexact(format!("{} / {} has remainder {}", self, div, r)))
        }
    }

    /// Return `self / div` if `div` divides `self` exactly, using exact division of the
    /// coefficients. The leading coefficient of `div` does not have to be a unit.
    pub fn divides(&self, div: &Self) -> Option<Self> {
        if self.check_division(div).is_err() {
            return None;
        }

        let lc = div.leading_base_coefficient();
        let lexp = ExpVector::from(div.last_exponents());

        let mut r = self.clone();
        let mut q_terms = vec![];
        while !r.is_zero() {
            let e = ExpVector::from(r.last_exponents());
            let f = e.checked_sub(&lexp)?;
            let c = self.ring.try_div(&r.leading_base_coefficient(), &lc)?;

            r = &r - &div.mul_monomial_left(&c, &f);
            if r.last_exponents_or_none() == Some(&e[..]) {
                return None;
            }
            q_terms.push((c, f));
        }

        Some(self.from_descending_terms(q_terms))
    }

    fn last_exponents_or_none(&self) -> Option<&[E]> {
        if self.is_zero() {
            None
        } else {
            Some(self.last_exponents())
        }
    }

    /// Pseudo-divide by `div`, returning `(q, r, c)` such that
    /// `c * self = q * div + r`, where `c` is a power of the leading coefficient of `div`
    /// and no term of `r` is a multiple of the leading monomial of `div`.
    ///
    /// Whenever a leading coefficient is exactly divisible, no scaling takes place.
    /// The coefficient ring should be commutative.
    #[instrument(level = "trace", skip_all, fields(a = %self, b = %div))]
    pub fn pseudo_divide_and_remainder(
        &self,
        div: &Self,
    ) -> Result<(Self, Self, F::Element), AlgebraError> {
        self.check_division(div)?;

        let lc = div.leading_base_coefficient();
        let lexp = ExpVector::from(div.last_exponents());

        let mut scale = self.ring.one();
        let mut q = self.zero();
        let mut r = self.clone();
        let mut rem_terms: Vec<(F::Element, ExpVector<E>)> = vec![];

        while !r.is_zero() {
            let e = ExpVector::from(r.last_exponents());
            let c = r.leading_base_coefficient();

            let Some(f) = e.checked_sub(&lexp) else {
                rem_terms.push((c, e));
                r = r.reductum();
                continue;
            };

            let c = match self.ring.try_div(&c, &lc) {
                Some(c) => c,
                None => {
                    debug!("Scaling by leading coefficient {}", self.ring.printer(&lc));
                    self.ring.mul_assign(&mut scale, &lc);
                    q = q.mul_coeff(lc.clone());
                    r = r.mul_coeff(lc.clone());
                    for (rc, _) in &mut rem_terms {
                        self.ring.mul_assign(rc, &lc);
                    }
                    c
                }
            };

            r = &r - &div.mul_monomial_left(&c, &f);
            q.append_monomial(c, &f);
        }

        Ok((q, self.from_descending_terms(rem_terms), scale))
    }

    /// The remainder of [MultivariatePolynomial::pseudo_divide_and_remainder].
    pub fn pseudo_remainder(&self, div: &Self) -> Result<Self, AlgebraError> {
        Ok(self.pseudo_divide_and_remainder(div)?.1)
    }

    /// The quotient of [MultivariatePolynomial::pseudo_divide_and_remainder].
    pub fn pseudo_divide(&self, div: &Self) -> Result<Self, AlgebraError> {
        Ok(self.pseudo_divide_and_remainder(div)?.0)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domains::integer::{Integer, Z};
    use crate::domains::integer_mod::IntegerMod;
    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::error::AlgebraError;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::term_order::NamedOrder;
    use crate::poly::Variable;

    #[test]
    #[should_panic(expected = "overflow in adding exponents")]
    fn exponent_overflow() {
        let r = PolynomialRing::<_, u8>::new(Z, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let p = r.monomial(Integer::from(1), &[200]);
        p.mul_monomial_left(&Integer::from(2), &[100]);
    }

    #[test]
    fn invlex_division() {
        let r = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let x = r.variable(0).unwrap();
        let one = r.one();

        let a = &(&x * &x) + &one;
        let b = &x + &one;
        let (q, rem) = a.divide_and_remainder(&b).unwrap();
        assert_eq!(q, &x - &one);
        assert_eq!(rem, r.constant(Q.to_element(2, 1)));
        assert!(a.div_exact(&b).is_err());
        assert_eq!((&a * &b).div_exact(&b), Ok(a.clone()));
    }

    #[test]
    fn division_law() {
        let mut rng = StdRng::seed_from_u64(42);
        let r = PolynomialRing::<_, u16>::new(
            Q,
            Variable::list(&["x", "y", "z"]),
            NamedOrder::GrLex.into(),
        )
        .unwrap();

        for _ in 0..20 {
            let a = r.random(&mut rng, 8, 5, 0.7, (-10, 10));
            let b = r.random(&mut rng, 3, 3, 0.7, (-10, 10));
            if b.is_zero() {
                continue;
            }

            let (q, rem) = a.divide_and_remainder(&b).unwrap();
            assert_eq!(&(&q * &b) + &rem, a);

            let lexp = b.leading_exp_vector().unwrap();
            for t in &rem {
                assert!(!t.exp_vector().multiple_of(&lexp));
            }
        }
    }

    #[test]
    fn errors() {
        let r = PolynomialRing::<_, u16>::new(Z, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let x = r.variable(0).unwrap();
        let two_x = &x * &r.constant(Integer::from(2));

        assert!(x
            .divide_and_remainder(&r.zero())
            .unwrap_err()
            .is_not_invertible());
        assert!(x.divide_and_remainder(&two_x).unwrap_err().is_not_invertible());
        assert_eq!(two_x.divides(&x), Some(r.constant(Integer::from(2))));
        assert_eq!(x.divides(&two_x), None);

        let rl = PolynomialRing::<_, u16>::new(Z, Variable::list(&["x"]), NamedOrder::RevLex.into())
            .unwrap();
        let y = rl.variable(0).unwrap();
        assert!(matches!(
            y.divide_and_remainder(&y),
            Err(AlgebraError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn monic() {
        let f = IntegerMod::new(19.into()).unwrap();
        let r = PolynomialRing::<_, u16>::new(f.clone(), Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let x = r.variable(0).unwrap();
        let p = &(&x * &r.constant(Integer::from(5))) + &r.one();
        let m = p.monic().unwrap();
        assert!(f.is_one(&m.leading_base_coefficient()));
        assert!(r.zero().monic().unwrap().is_zero());

        let rz = PolynomialRing::<_, u16>::new(Z, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let p = rz.constant(Integer::from(3));
        assert!(p.monic().unwrap_err().is_not_invertible());
    }

    #[test]
    fn pseudo_division() {
        let mut rng = StdRng::seed_from_u64(9);
        let r = PolynomialRing::<_, u16>::new(Z, Variable::list(&["x", "y"]), NamedOrder::IGrLex.into())
            .unwrap();

        for _ in 0..20 {
            let a = r.random(&mut rng, 6, 5, 0.7, (-10, 10));
            let b = r.random(&mut rng, 3, 3, 0.7, (-10, 10));
            if b.is_zero() {
                continue;
            }

            let (q, rem, c) = a.pseudo_divide_and_remainder(&b).unwrap();
            assert_eq!(&a * &r.constant(c), &(&q * &b) + &rem);
            assert_eq!(a.pseudo_remainder(&b).unwrap(), rem);
            assert_eq!(a.pseudo_divide(&b).unwrap(), q);
        }
    }
}
