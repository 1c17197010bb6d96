use std::iter::FusedIterator;

use crate::domains::Ring;

use super::polynomial::MultivariatePolynomial;
use super::{ExpVector, Exponent};

/// View object for a term in a multivariate polynomial.
#[derive(Copy, Clone, Debug)]
pub struct MonomialView<'a, F: 'a + Ring, E: 'a + Exponent> {
    pub coefficient: &'a F::Element,
    pub exponents: &'a [E],
}

impl<'a, F: Ring, E: Exponent> MonomialView<'a, F, E> {
    pub fn exp_vector(&self) -> ExpVector<E> {
        self.exponents.into()
    }
}

/// Iterator over the terms of a multivariate polynomial, from the
/// leading term to the smallest term.
pub struct MonomialViewIterator<'a, F: Ring, E: Exponent> {
    poly: &'a MultivariatePolynomial<F, E>,
    // the half-open range of storage indices that has not been visited yet
    low: usize,
    high: usize,
}

impl<'a, F: Ring, E: Exponent> MonomialViewIterator<'a, F, E> {
    #[inline]
    fn view(&self, index: usize) -> MonomialView<'a, F, E> {
        MonomialView {
            coefficient: &self.poly.coefficients[index],
            exponents: self.poly.exponents(index),
        }
    }
}

impl<'a, F: Ring, E: Exponent> Iterator for MonomialViewIterator<'a, F, E> {
    type Item = MonomialView<'a, F, E>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.low == self.high {
            None
        } else {
            self.high -= 1;
            Some(self.view(self.high))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.high - self.low;
        (n, Some(n))
    }
}

impl<'a, F: Ring, E: Exponent> DoubleEndedIterator for MonomialViewIterator<'a, F, E> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.low == self.high {
            None
        } else {
            self.low += 1;
            Some(self.view(self.low - 1))
        }
    }
}

impl<'a, F: Ring, E: Exponent> ExactSizeIterator for MonomialViewIterator<'a, F, E> {}
impl<'a, F: Ring, E: Exponent> FusedIterator for MonomialViewIterator<'a, F, E> {}

impl<'a, F: Ring, E: Exponent> IntoIterator for &'a MultivariatePolynomial<F, E> {
    type Item = MonomialView<'a, F, E>;
    type IntoIter = MonomialViewIterator<'a, F, E>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        MonomialViewIterator {
            poly: self,
            low: 0,
            high: self.nterms(),
        }
    }
}
