//! Conversions between polynomial representations and the building blocks of
//! modular and evaluation/interpolation algorithms.
//!
//! A recursive polynomial is a [MultivariatePolynomial] whose coefficients are
//! polynomials themselves, in the ring built by [PolynomialRing::recursive].

use std::collections::BTreeMap;

use rug::Rational;
use tracing::{debug, instrument};

use crate::domains::complex::{Complex, ComplexRing};
use crate::domains::integer::{Integer, IntegerRing, Z};
use crate::domains::integer_mod::IntegerMod;
use crate::domains::rational::{RationalField, Q};
use crate::domains::Ring;
use crate::error::AlgebraError;

use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::{ExpVector, Exponent};

/// A polynomial whose coefficients are polynomials over `R`.
pub type RecursivePolynomial<R, E = u16> = MultivariatePolynomial<PolynomialRing<R, E>, E>;

fn check_rank(expected: usize, found: usize) -> Result<(), AlgebraError> {
    if expected != found {
        Err(AlgebraError::RankMismatch { expected, found })
    } else {
        Ok(())
    }
}

/// Convert `p` to the recursive ring `rring`, whose variables are the first
/// variables of `p` and whose coefficients are polynomials in the rest.
pub fn recursive<R: Ring, E: Exponent>(
    rring: &PolynomialRing<PolynomialRing<R, E>, E>,
    p: &MultivariatePolynomial<R, E>,
) -> Result<RecursivePolynomial<R, E>, AlgebraError> {
    let k = rring.nvars();
    let inner = rring.coefficient_ring();
    check_rank(k + inner.nvars(), p.nvars())?;

    let mut coeffs: BTreeMap<ExpVector<E>, MultivariatePolynomial<R, E>> = BTreeMap::new();
    for t in p {
        let (head, rest) = t.exp_vector().contract(k);
        coeffs
            .entry(head)
            .or_insert_with(|| inner.zero())
            .append_monomial(t.coefficient.clone(), &rest);
    }

    let mut res = rring.zero();
    for (head, c) in coeffs {
        res.append_monomial(c, &head);
    }
    Ok(res)
}

/// Convert the recursive polynomial `rp` back to the distributed ring `ring`.
pub fn distribute<R: Ring, E: Exponent>(
    ring: &PolynomialRing<R, E>,
    rp: &RecursivePolynomial<R, E>,
) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
    check_rank(ring.nvars(), rp.nvars() + rp.ring.nvars())?;

    let mut res = ring.zero();
    let mut exp = Vec::with_capacity(ring.nvars());
    for t in rp {
        for c in t.coefficient {
            exp.clear();
            exp.extend_from_slice(t.exponents);
            exp.extend_from_slice(c.exponents);
            res.append_monomial(c.coefficient.clone(), &exp);
        }
    }
    Ok(res)
}

/// Map every coefficient of `p` into `ring` with `f`. Terms that map to zero are dropped.
pub fn map_coefficients<R: Ring, U: Ring, E: Exponent>(
    ring: &U,
    p: &MultivariatePolynomial<R, E>,
    f: impl Fn(&R::Element) -> U::Element,
) -> MultivariatePolynomial<U, E> {
    p.map_coeff(f, ring.clone())
}

pub fn rational_from_integer_coefficients<E: Exponent>(
    p: &MultivariatePolynomial<IntegerRing, E>,
) -> MultivariatePolynomial<RationalField, E> {
    p.map_coeff(|c| Rational::from(c.clone()), Q)
}

/// Clear the denominators of `p` by multiplying with their least common multiple.
pub fn integer_from_rational_coefficients<E: Exponent>(
    p: &MultivariatePolynomial<RationalField, E>,
) -> MultivariatePolynomial<IntegerRing, E> {
    let lcm = p
        .coefficients
        .iter()
        .fold(Integer::from(1), |acc, c| Z.lcm(&acc, c.denom()));

    p.map_coeff(
        |c| {
            let (num, den) = c.clone().into_numer_denom();
            num * (lcm.clone() / den)
        },
        Z,
    )
}

/// Map integer coefficients into any ring, through [Ring::nth].
pub fn from_integer_coefficients<R: Ring, E: Exponent>(
    ring: &R,
    p: &MultivariatePolynomial<IntegerRing, E>,
) -> MultivariatePolynomial<R, E> {
    p.map_coeff(|c| ring.nth(c), ring.clone())
}

/// Lift modular coefficients to integers in the symmetric range `(-m/2, m/2]`.
pub fn integer_from_modular_coefficients<E: Exponent>(
    p: &MultivariatePolynomial<IntegerMod, E>,
) -> MultivariatePolynomial<IntegerRing, E> {
    p.map_coeff(|c| p.ring.to_symmetric(c), Z)
}

/// Lift modular coefficients to integers in the range `[0, m)`.
pub fn integer_from_modular_coefficients_positive<E: Exponent>(
    p: &MultivariatePolynomial<IntegerMod, E>,
) -> MultivariatePolynomial<IntegerRing, E> {
    p.map_coeff(|c| c.clone(), Z)
}

/// Embed the coefficients of `p` as the real parts of complex numbers.
pub fn complex_from_rational_coefficients<R: Ring, E: Exponent>(
    ring: &ComplexRing<R>,
    p: &MultivariatePolynomial<R, E>,
) -> MultivariatePolynomial<ComplexRing<R>, E> {
    p.map_coeff(
        |c| Complex {
            re: c.clone(),
            im: ring.base().zero(),
        },
        ring.clone(),
    )
}

pub fn real_part<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<ComplexRing<R>, E>,
) -> MultivariatePolynomial<R, E> {
    p.map_coeff(|c| c.re.clone(), p.ring.base().clone())
}

pub fn imaginary_part<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<ComplexRing<R>, E>,
) -> MultivariatePolynomial<R, E> {
    p.map_coeff(|c| c.im.clone(), p.ring.base().clone())
}

fn check_univariate<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<R, E>,
) -> Result<(), AlgebraError> {
    if p.nvars() != 1 {
        return Err(AlgebraError::invalid_configuration(format!(
            "evaluation at the main variable requires a univariate ring, not one in {} variables",
            p.nvars()
        )));
    }
    Ok(())
}

/// Horner's rule on a polynomial of rank 1.
fn horner<R: Ring, E: Exponent>(p: &MultivariatePolynomial<R, E>, a: &R::Element) -> R::Element {
    if p.is_zero() {
        return p.ring.zero();
    }
    if R::is_zero(a) {
        return p.trailing_base_coefficient();
    }

    let mut terms: Vec<(u32, &R::Element)> = p
        .into_iter()
        .map(|t| (t.exponents[0].to_u32(), t.coefficient))
        .collect();
    terms.sort_by(|x, y| y.0.cmp(&x.0));

    let mut b = terms[0].1.clone();
    let mut last = terms[0].0;
    for (d, c) in &terms[1..] {
        b = p.ring.mul(&b, &p.ring.pow(a, (last - d) as u64));
        p.ring.add_assign(&mut b, c);
        last = *d;
    }

    if last > 0 {
        b = p.ring.mul(&b, &p.ring.pow(a, last as u64));
    }
    b
}

/// Evaluate the univariate polynomial `p` at `a`.
pub fn evaluate_main<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<R, E>,
    a: &R::Element,
) -> Result<R::Element, AlgebraError> {
    check_univariate(p)?;
    Ok(horner(p, a))
}

/// Evaluate the main variable of the univariate recursive polynomial `rp` at `a`,
/// giving a polynomial in the coefficient ring `ring`.
pub fn evaluate_main_recursive<R: Ring, E: Exponent>(
    ring: &PolynomialRing<R, E>,
    rp: &RecursivePolynomial<R, E>,
    a: &R::Element,
) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
    check_univariate(rp)?;
    check_rank(ring.nvars(), rp.ring.nvars())?;

    if rp.is_zero() {
        return Ok(ring.zero());
    }
    Ok(horner(rp, &ring.constant(a.clone())))
}

/// Substitute `a` for the first variable, which is removed from the ring.
pub fn evaluate_first<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<R, E>,
    a: &R::Element,
) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
    if p.nvars() == 0 {
        return Err(AlgebraError::invalid_configuration(
            "cannot evaluate the first variable of a ring without variables",
        ));
    }

    Ok(evaluate_first_unchecked(p, a))
}

fn evaluate_first_unchecked<R: Ring, E: Exponent>(
    p: &MultivariatePolynomial<R, E>,
    a: &R::Element,
) -> MultivariatePolynomial<R, E> {
    let zero = ExpVector::zero(1);
    p.evaluate_var(0, a)
        .contract(1)
        .remove(&zero)
        .unwrap_or_else(|| p.poly_ring().contract(1).zero())
}

/// Substitute `a` for the first variable of every coefficient of `rp`.
pub fn evaluate_first_rec<R: Ring, E: Exponent>(
    rp: &RecursivePolynomial<R, E>,
    a: &R::Element,
) -> Result<RecursivePolynomial<R, E>, AlgebraError> {
    if rp.ring.nvars() == 0 {
        return Err(AlgebraError::invalid_configuration(
            "the coefficient ring has no variable to evaluate",
        ));
    }

    Ok(rp.map_coeff(
        |c| evaluate_first_unchecked(c, a),
        rp.ring.contract(1),
    ))
}

/// The largest degree of any variable in any coefficient of `rp`.
pub fn coeff_max_degree<R: Ring, E: Exponent>(rp: &RecursivePolynomial<R, E>) -> u32 {
    rp.coefficients
        .iter()
        .flat_map(|c| (0..c.nvars()).map(move |v| c.degree(v).to_u32()))
        .max()
        .unwrap_or(0)
}

/// Pair up the coefficients of `a` and `b` by exponent vector.
fn zip_terms<'a, R: Ring, U: Ring, E: Exponent>(
    a: &'a MultivariatePolynomial<R, E>,
    b: &'a MultivariatePolynomial<U, E>,
) -> BTreeMap<ExpVector<E>, (Option<&'a R::Element>, Option<&'a U::Element>)> {
    let mut map: BTreeMap<_, (Option<&R::Element>, Option<&U::Element>)> = BTreeMap::new();
    for t in a {
        map.entry(t.exp_vector()).or_default().0 = Some(t.coefficient);
    }
    for t in b {
        map.entry(t.exp_vector()).or_default().1 = Some(t.coefficient);
    }
    map
}

/// Combine `a` modulo `m0` and `b` modulo `m1` coefficient-wise into the polynomial
/// modulo `m0 * m1` in `ring`, where `mi` is the inverse of `m0` modulo `m1`.
#[instrument(level = "trace", skip_all, fields(a = %a, b = %b))]
pub fn chinese_remainder<E: Exponent>(
    ring: &PolynomialRing<IntegerMod, E>,
    a: &MultivariatePolynomial<IntegerMod, E>,
    mi: &Integer,
    b: &MultivariatePolynomial<IntegerMod, E>,
) -> Result<MultivariatePolynomial<IntegerMod, E>, AlgebraError> {
    check_rank(ring.nvars(), a.nvars())?;
    check_rank(ring.nvars(), b.nvars())?;

    let target = ring.coefficient_ring();
    if target.modulus().clone() != a.ring.modulus().clone() * b.ring.modulus() {
        return Err(AlgebraError::invalid_configuration(format!(
            "{} is not the product of {} and {}",
            target, a.ring, b.ring
        )));
    }

    let zero = Integer::new();
    let mut res = ring.zero();
    for (e, (x, y)) in zip_terms(a, b) {
        let c = target.chinese_remainder(
            &a.ring,
            x.unwrap_or(&zero),
            mi,
            &b.ring,
            y.unwrap_or(&zero),
        );
        res.append_monomial(c, &e);
    }
    Ok(res)
}

/// Find `s` with `s = a mod m` and `s(am) = b`, where `a` and `m` are univariate
/// and `mi` is the inverse of `m(am)`.
pub fn interpolate_univariate<R: Ring, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    m: &MultivariatePolynomial<R, E>,
    mi: &R::Element,
    b: &R::Element,
    am: &R::Element,
) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
    check_univariate(a)?;
    check_univariate(m)?;
    Ok(interpolate_unchecked(a, m, mi, b, am))
}

fn interpolate_unchecked<R: Ring, E: Exponent>(
    a: &MultivariatePolynomial<R, E>,
    m: &MultivariatePolynomial<R, E>,
    mi: &R::Element,
    b: &R::Element,
    am: &R::Element,
) -> MultivariatePolynomial<R, E> {
    let ring = &m.ring;
    let d = ring.sub(b, &horner(a, am));
    if R::is_zero(&d) {
        return a.clone();
    }

    &m.clone().mul_coeff(ring.mul(&d, mi)) + a
}

/// Interpolate the recursive polynomial `rp`, whose coefficients are univariate in the
/// interpolation variable, coefficient-wise with the evaluation `b` at `am`.
/// `b` lives in the ring of the main variables of `rp`.
#[instrument(level = "trace", skip_all, fields(a = %rp, b = %b))]
pub fn interpolate<R: Ring, E: Exponent>(
    rp: &RecursivePolynomial<R, E>,
    m: &MultivariatePolynomial<R, E>,
    mi: &R::Element,
    b: &MultivariatePolynomial<R, E>,
    am: &R::Element,
) -> Result<RecursivePolynomial<R, E>, AlgebraError> {
    check_rank(rp.nvars(), b.nvars())?;
    check_univariate(m)?;
    check_rank(1, rp.ring.nvars())?;

    let zero_poly = rp.ring.zero();
    let zero = m.ring.zero();
    let mut res = rp.zero();
    for (e, (x, y)) in zip_terms(rp, b) {
        let x = x.unwrap_or(&zero_poly);
        let c = interpolate_unchecked(x, m, mi, y.unwrap_or(&zero), am);
        res.append_monomial(c, &e);
    }

    debug!("Interpolated at {}", m.ring.printer(am));
    Ok(res)
}

/// Divide `rp` by the leading base coefficient of its leading coefficient.
pub fn monic_recursive<R: Ring, E: Exponent>(
    rp: &RecursivePolynomial<R, E>,
) -> Result<RecursivePolynomial<R, E>, AlgebraError> {
    let Some(lc) = rp.coefficients.last() else {
        return Ok(rp.clone());
    };

    let inv = lc.ring.try_inv(&lc.leading_base_coefficient())?;
    Ok(rp.map_coeff(|c| c.clone().mul_coeff(inv.clone()), rp.ring.clone()))
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::poly::term_order::NamedOrder;
    use crate::poly::Variable;

    fn ring3<R: Ring>(r: R) -> PolynomialRing<R> {
        PolynomialRing::new(r, Variable::list(&["x", "y", "z"]), NamedOrder::IGrLex.into())
            .unwrap()
    }

    #[test]
    fn recursive_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        let r = ring3(Q);

        for k in 0..=3 {
            let rr = r.recursive(k);
            assert_eq!(rr.nvars(), k);
            assert_eq!(rr.coefficient_ring().nvars(), 3 - k);

            for _ in 0..5 {
                let p = r.random(&mut rng, 8, 4, 0.7, (-9, 9));
                let rp = recursive(&rr, &p).unwrap();
                rp.check_consistency();
                assert_eq!(distribute(&r, &rp).unwrap(), p);
            }
        }

        let rr = PolynomialRing::new(Q, Variable::list(&["x"]), NamedOrder::Lex.into())
            .unwrap()
            .recursive(1);
        assert!(recursive(&rr, &r.one()).is_err());
    }

    #[test]
    fn coefficient_maps() {
        let mut rng = StdRng::seed_from_u64(11);
        let rz = ring3(Z);
        let p = rz.random(&mut rng, 6, 3, 0.7, (-20, 20));

        let pq = rational_from_integer_coefficients(&p);
        assert_eq!(integer_from_rational_coefficients(&pq), p);

        let half = pq.clone().mul_coeff(Q.to_element(1, 6));
        let back = integer_from_rational_coefficients(&half);
        assert!(back.coefficients.iter().all(|c| *c <= 20 && *c >= -20));

        let m = IntegerMod::new(101.into()).unwrap();
        let pm = from_integer_coefficients(&m, &p);
        assert_eq!(integer_from_modular_coefficients(&pm), p);
        assert!(integer_from_modular_coefficients_positive(&pm)
            .coefficients
            .iter()
            .all(|c| *c >= 0 && *c < 101));

        let c = ComplexRing::new(Q);
        let pc = complex_from_rational_coefficients(&c, &pq);
        assert_eq!(real_part(&pc), pq);
        assert!(imaginary_part(&pc).is_zero());

        let g = map_coefficients(&Q, &p, |c| Rational::from(c.clone()));
        assert_eq!(g, pq);
    }

    #[test]
    fn evaluation() {
        let mut rng = StdRng::seed_from_u64(17);
        let r = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x"]), NamedOrder::InvLex.into())
            .unwrap();
        let x = r.variable(0).unwrap();

        // 2x^3 - x + 5 at 3 is 56
        let p = &(&(&(&x * &x) * &x) * &r.constant(Q.to_element(2, 1)))
            - &(&x - &r.constant(Q.to_element(5, 1)));
        assert_eq!(evaluate_main(&p, &Q.to_element(3, 1)), Ok(Q.to_element(56, 1)));
        assert_eq!(evaluate_main(&p, &Q.zero()), Ok(Q.to_element(5, 1)));

        for _ in 0..10 {
            let a = r.random(&mut rng, 4, 5, 1.0, (-5, 5));
            let b = r.random(&mut rng, 4, 5, 1.0, (-5, 5));
            let v = Q.to_element(-2, 3);

            let (ea, eb) = (evaluate_main(&a, &v).unwrap(), evaluate_main(&b, &v).unwrap());
            assert_eq!(evaluate_main(&(&a * &b), &v).unwrap(), Q.mul(&ea, &eb));
            assert_eq!(evaluate_main(&(&a + &b), &v).unwrap(), Q.add(&ea, &eb));
        }

        assert!(evaluate_main(&ring3(Q).one(), &Q.one()).is_err());
    }

    #[test]
    fn evaluate_first_variable() {
        let mut rng = StdRng::seed_from_u64(23);
        let r = ring3(Q);
        let v = Q.to_element(3, 2);

        for _ in 0..5 {
            let p = r.random(&mut rng, 6, 3, 0.7, (-9, 9));
            let e = evaluate_first(&p, &v).unwrap();
            assert_eq!(e.nvars(), 2);

            let expected = p.evaluate_var(0, &v);
            let lifted = e.extend(&r, 0, 0).unwrap();
            assert_eq!(lifted, expected);

            // the main variable of the recursive form in z
            let rr = r.reverse().recursive(1);
            let rp = recursive(&rr, &p.reverse()).unwrap();
            let ez = evaluate_main_recursive(rr.coefficient_ring(), &rp, &v).unwrap();
            assert_eq!(
                ez.extend(&r.reverse(), 0, 0).unwrap(),
                p.reverse().evaluate_var(0, &v)
            );

            // the first coefficient variable of the recursive form in x
            let rr = r.recursive(1);
            let rp = recursive(&rr, &p).unwrap();
            let ey = evaluate_first_rec(&rp, &v).unwrap();
            let xz = PolynomialRing::new(Q, Variable::list(&["x", "z"]), NamedOrder::IGrLex.into())
                .unwrap();
            let flat = distribute(&xz, &ey).unwrap();
            let expected = p.evaluate_var(1, &v);
            for t in &flat {
                let exp = [t.exponents[0], 0, t.exponents[1]];
                let found = expected
                    .into_iter()
                    .find(|u| u.exponents == &exp[..])
                    .map(|u| u.coefficient.clone());
                assert_eq!(found, Some(t.coefficient.clone()));
            }
            assert_eq!(flat.nterms(), expected.nterms());
        }
    }

    #[test]
    fn max_degree() {
        let r = ring3(Q);
        let x = r.variable(0).unwrap();
        let y = r.variable(1).unwrap();
        let z = r.variable(2).unwrap();

        let p = &(&(&x * &y) * &y) + &(&(&z * &z) * &z);
        let rp = recursive(&r.recursive(1), &p).unwrap();
        assert_eq!(coeff_max_degree(&rp), 3);
        assert_eq!(coeff_max_degree(&r.recursive(1).zero()), 0);
    }

    #[test]
    fn chinese_remainder_round_trip() {
        let mut rng = StdRng::seed_from_u64(29);
        let rz = ring3(Z);
        let m0 = IntegerMod::new(7.into()).unwrap();
        let m1 = IntegerMod::new(11.into()).unwrap();
        let m01 = m0.product(&m1);
        let mi = m1.try_inv(&m1.nth(m0.modulus())).unwrap();
        let r01 = ring3(m01);

        for _ in 0..10 {
            let p = rz.random(&mut rng, 8, 3, 0.7, (-38, 38));
            let a = from_integer_coefficients(&m0, &p);
            let b = from_integer_coefficients(&m1, &p);

            let c = chinese_remainder(&r01, &a, &mi, &b).unwrap();
            assert_eq!(integer_from_modular_coefficients(&c), p);
        }

        let bad = ring3(IntegerMod::new(13.into()).unwrap());
        let a = from_integer_coefficients(&m0, &rz.one());
        let b = from_integer_coefficients(&m1, &rz.one());
        assert!(chinese_remainder(&bad, &a, &mi, &b).is_err());
    }

    #[test]
    fn interpolation() {
        let mut rng = StdRng::seed_from_u64(37);
        let f = IntegerMod::new(97.into()).unwrap();
        let r = PolynomialRing::<_, u16>::new(
            f.clone(),
            Variable::list(&["x", "y"]),
            NamedOrder::IGrLex.into(),
        )
        .unwrap();
        let rr = r.recursive(1);
        let ry = rr.coefficient_ring().clone();
        let y = ry.variable(0).unwrap();

        let p = r.random(&mut rng, 8, 4, 0.8, (0, 96));
        let deg = p.degree(1).to_u32();

        let mut rp = rr.zero();
        let mut m = ry.one();
        for point in 1..=deg + 1 {
            let am = f.nth(&Integer::from(point));
            let b = evaluate_first(&p.reverse(), &am).unwrap();
            let mi = f.try_inv(&evaluate_main(&m, &am).unwrap()).unwrap();

            rp = interpolate(&rp, &m, &mi, &b, &am).unwrap();
            m = &m * &(&y - &ry.constant(am));
        }

        assert_eq!(distribute(&r, &rp).unwrap(), p);

        let s = interpolate_univariate(&y, &ry.one(), &f.one(), &f.nth(&5.into()), &f.one()).unwrap();
        assert_eq!(evaluate_main(&s, &f.one()), Ok(f.nth(&5.into())));
    }

    #[test]
    fn monic() {
        let r = ring3(Q);
        let rr = r.recursive(1);
        let x = r.variable(0).unwrap();
        let y = r.variable(1).unwrap();

        let p = &(&x * &(&y * &r.constant(Q.to_element(4, 1)))) + &r.one();
        let m = monic_recursive(&recursive(&rr, &p).unwrap()).unwrap();
        let lc = m.coefficients.last().unwrap();
        assert!(Q.is_one(&lc.leading_base_coefficient()));
        assert!(monic_recursive(&rr.zero()).unwrap().is_zero());

        let rz = ring3(Z);
        let p = rz.constant(Integer::from(3));
        assert!(monic_recursive(&recursive(&rz.recursive(1), &p).unwrap()).is_err());
    }
}
