//! Greatest common divisors of univariate polynomials.
//!
//! The polynomials may live in a multivariate ring, as long as they depend on
//! at most one common variable. The leading coefficients that appear in the
//! Euclidean remainder sequence must be invertible, which is the case for
//! fields such as [Q](type@crate::domains::rational::Q), prime moduli and Galois fields.

use tracing::{debug, instrument};

use crate::domains::Ring;
use crate::error::AlgebraError;

use super::polynomial::MultivariatePolynomial;
use super::Exponent;

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// The variable the polynomial depends on, or `None` for a constant.
    /// Fails if the polynomial depends on more than one variable.
    pub fn univariate_variable(&self) -> Result<Option<usize>, AlgebraError> {
        let mut var = None;
        for i in 0..self.nterms() {
            for (v, e) in self.exponents(i).iter().enumerate() {
                if e.is_zero() {
                    continue;
                }

                match var {
                    None => var = Some(v),
                    Some(w) if w != v => {
                        return Err(AlgebraError::invalid_configuration(format!(
                            "{} is not univariate",
                            self
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(var)
    }

    fn check_univariate_pair(&self, other: &Self) -> Result<(), AlgebraError> {
        self.check_compatible(other)?;

        match (self.univariate_variable()?, other.univariate_variable()?) {
            (Some(a), Some(b)) if a != b => Err(AlgebraError::invalid_configuration(format!(
                "{} and {} depend on different variables",
                self, other
            ))),
            _ => Ok(()),
        }
    }

    /// Compute the monic greatest common divisor with the Euclidean algorithm.
    /// `gcd(0, 0) = 0`.
    #[instrument(level = "trace", skip_all, fields(a = %self, b = %other))]
    pub fn gcd(&self, other: &Self) -> Result<Self, AlgebraError> {
        self.check_univariate_pair(other)?;

        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            if b.is_constant() {
                debug!("Constant remainder: gcd is one");
                return Ok(self.one());
            }

            let r = a.rem(&b)?;
            a = b;
            b = r;
        }

        a.monic()
    }

    /// Compute the extended gcd `(g, s, t)` such that `g = self * s + other * t`,
    /// where `g` is monic or zero.
    #[instrument(level = "trace", skip_all, fields(a = %self, b = %other))]
    pub fn egcd(&self, other: &Self) -> Result<(Self, Self, Self), AlgebraError> {
        self.check_univariate_pair(other)?;

        if self.is_zero() && other.is_zero() {
            debug!("Both inputs are zero");
            return Ok((self.zero(), self.zero(), self.zero()));
        }

        let mut r0 = self.clone();
        let mut r1 = other.clone();
        let mut s0 = self.one();
        let mut s1 = self.zero();
        let mut t0 = self.zero();
        let mut t1 = self.one();

        while !r1.is_zero() {
            let (q, r) = r0.divide_and_remainder(&r1)?;

            let s = &s0 - &(&q * &s1);
            let t = &t0 - &(&q * &t1);
            r0 = std::mem::replace(&mut r1, r);
            s0 = std::mem::replace(&mut s1, s);
            t0 = std::mem::replace(&mut t1, t);
        }

        let inv = self.ring.try_inv(&r0.leading_base_coefficient())?;
        Ok((
            r0.mul_coeff(inv.clone()),
            s0.mul_coeff(inv.clone()),
            t0.mul_coeff(inv),
        ))
    }

    /// Compute the inverse of `self` modulo `modulus`, reduced modulo `modulus`.
    pub fn mod_inverse(&self, modulus: &Self) -> Result<Self, AlgebraError> {
        let (g, s, _) = self.egcd(modulus)?;
        if !g.is_one() {
            return Err(AlgebraError::not_invertible(format!(
                "{} mod {}: gcd is {}",
                self, modulus, g
            )));
        }

        s.rem(modulus)
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::domains::integer_mod::IntegerMod;
    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::term_order::NamedOrder;
    use crate::poly::Variable;

    #[test]
    fn gcd_law() {
        let mut rng = StdRng::seed_from_u64(31);
        let r = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();

        for _ in 0..15 {
            let a = r.random(&mut rng, 4, 5, 1.0, (-6, 6));
            let b = r.random(&mut rng, 4, 5, 1.0, (-6, 6));
            let c = r.random(&mut rng, 3, 3, 1.0, (-6, 6));
            if c.is_zero() {
                continue;
            }

            let ac = &a * &c;
            let bc = &b * &c;
            let (g, s, t) = ac.egcd(&bc).unwrap();
            assert_eq!(&(&ac * &s) + &(&bc * &t), g);
            assert_eq!(ac.gcd(&bc).unwrap(), g);

            // the common factor divides the gcd
            assert!(g.rem(&c).unwrap().is_zero());
            if !g.is_zero() {
                assert!(ac.rem(&g).unwrap().is_zero());
                assert!(bc.rem(&g).unwrap().is_zero());
            }
        }
    }

    #[test]
    fn mod_inverse() {
        let f = IntegerMod::new(19.into()).unwrap();
        let r = PolynomialRing::<_, u16>::new(f.clone(), Variable::list(&["i"]), NamedOrder::InvLex.into())
            .unwrap();
        let i = r.variable(0).unwrap();
        let m = &(&i * &i) + &r.one();

        let a = &i + &r.constant(f.nth(&3.into()));
        let inv = a.mod_inverse(&m).unwrap();
        assert!((&a * &inv).rem(&m).unwrap().is_one());

        assert!(m.mod_inverse(&m).unwrap_err().is_not_invertible());
    }

    #[test]
    fn not_univariate() {
        let r = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x", "y"]), NamedOrder::Lex.into())
            .unwrap();
        let x = r.variable(0).unwrap();
        let y = r.variable(1).unwrap();
        assert!(x.gcd(&y).is_err());
        assert!((&x * &y).egcd(&x).is_err());
        assert_eq!(x.gcd(&r.zero()).unwrap(), x);
    }
}
