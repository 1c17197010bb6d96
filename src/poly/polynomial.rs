use ahash::{HashMap, HashMapExt};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::{Display, Error, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use crate::domains::integer::Integer;
use crate::domains::Ring;
use crate::error::AlgebraError;

use super::monomial::MonomialView;
use super::term_order::TermOrder;
use super::{add_exponents, ExpVector, Exponent, Variable};

/// A polynomial ring: a coefficient ring, a list of variables and a term order.
///
/// The ring is itself a [Ring], so that polynomials can be the coefficients
/// of other polynomials.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PolynomialRing<R: Ring, E: Exponent = u16> {
    ring: R,
    variables: Arc<Vec<Variable>>,
    order: TermOrder,
    _phantom_exp: PhantomData<E>,
}

impl<R: Ring, E: Exponent> PolynomialRing<R, E> {
    /// Create a new polynomial ring. The term order must be able to compare
    /// exponent vectors with one entry per variable.
    pub fn new(
        coeff_ring: R,
        variables: Arc<Vec<Variable>>,
        order: TermOrder,
    ) -> Result<PolynomialRing<R, E>, AlgebraError> {
        order.check_rank(variables.len())?;
        Ok(PolynomialRing {
            ring: coeff_ring,
            variables,
            order,
            _phantom_exp: PhantomData,
        })
    }

    pub fn from_poly(poly: &MultivariatePolynomial<R, E>) -> PolynomialRing<R, E> {
        PolynomialRing {
            ring: poly.ring.clone(),
            variables: poly.variables.clone(),
            order: poly.order.clone(),
            _phantom_exp: PhantomData,
        }
    }

    #[inline]
    pub fn coefficient_ring(&self) -> &R {
        &self.ring
    }

    #[inline]
    pub fn variables(&self) -> &Arc<Vec<Variable>> {
        &self.variables
    }

    #[inline]
    pub fn order(&self) -> &TermOrder {
        &self.order
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    pub fn constant(&self, coeff: R::Element) -> MultivariatePolynomial<R, E> {
        self.zero().constant(coeff)
    }

    /// The polynomial `x_i`.
    pub fn variable(&self, index: usize) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
        if index >= self.nvars() {
            return Err(AlgebraError::invalid_configuration(format!(
                "variable {} out of range for {}",
                index, self
            )));
        }

        Ok(self.monomial(
            self.ring.one(),
            &ExpVector::unit(self.nvars(), index, E::one()),
        ))
    }

    pub fn monomial(&self, coeff: R::Element, exponents: &[E]) -> MultivariatePolynomial<R, E> {
        self.zero().monomial(coeff, exponents.to_vec())
    }

    /// Create a polynomial from `(coefficient, exponents)` pairs. Equal exponents
    /// are summed and zero coefficients are dropped.
    pub fn from_terms(
        &self,
        terms: Vec<(R::Element, Vec<E>)>,
    ) -> Result<MultivariatePolynomial<R, E>, AlgebraError> {
        let mut res = self.zero().zero_with_capacity(terms.len());
        for (c, e) in terms {
            if e.len() != self.nvars() {
                return Err(AlgebraError::RankMismatch {
                    expected: self.nvars(),
                    found: e.len(),
                });
            }
            res.append_monomial(c, &e);
        }
        Ok(res)
    }

    /// Generate a random polynomial with at most `nterms` terms. Every exponent is
    /// nonzero with probability `density` and smaller than `max_exp`. The coefficients
    /// are sampled from the closed range `coeff_range`.
    pub fn random(
        &self,
        rng: &mut impl rand::RngCore,
        nterms: usize,
        max_exp: u32,
        density: f64,
        coeff_range: (i64, i64),
    ) -> MultivariatePolynomial<R, E> {
        let mut res = self.zero().zero_with_capacity(nterms);
        for _ in 0..nterms {
            let c = self.ring.sample(rng, coeff_range);
            let e = ExpVector::<E>::random(rng, self.nvars(), max_exp, density);
            res.append_monomial(c, &e);
        }
        res
    }

    /// The ring with `k` new leading variables.
    pub fn extend(&self, k: usize) -> PolynomialRing<R, E> {
        let mut vars: Vec<_> = (0..k).map(Variable::Temporary).collect();
        vars.extend(self.variables.iter().cloned());

        PolynomialRing {
            ring: self.ring.clone(),
            variables: Arc::new(vars),
            order: self.order.extend(k),
            _phantom_exp: PhantomData,
        }
    }

    /// The ring without its first `k` variables.
    pub fn contract(&self, k: usize) -> PolynomialRing<R, E> {
        PolynomialRing {
            ring: self.ring.clone(),
            variables: Arc::new(self.variables[k..].to_vec()),
            order: self.order.contract(k, self.nvars()),
            _phantom_exp: PhantomData,
        }
    }

    /// The ring with the variables in reverse order.
    pub fn reverse(&self) -> PolynomialRing<R, E> {
        PolynomialRing {
            ring: self.ring.clone(),
            variables: Arc::new(self.variables.iter().rev().cloned().collect()),
            order: self.order.reverse(self.nvars()),
            _phantom_exp: PhantomData,
        }
    }

    /// The ring in the first `k` variables whose coefficients are polynomials
    /// in the remaining variables.
    pub fn recursive(&self, k: usize) -> PolynomialRing<PolynomialRing<R, E>, E> {
        let (outer, _) = self.order.split_at(k, self.nvars());
        PolynomialRing {
            ring: self.contract(k),
            variables: Arc::new(self.variables[..k].to_vec()),
            order: outer,
            _phantom_exp: PhantomData,
        }
    }
}

impl<R: Ring, E: Exponent> Display for PolynomialRing<R, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.ring)?;
        for (i, v) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "] {}", self.order)
    }
}

impl<R: Ring, E: Exponent> Ring for PolynomialRing<R, E> {
    type Element = MultivariatePolynomial<R, E>;

    #[inline]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a + b
    }

    #[inline]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a - b
    }

    #[inline]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a * b
    }

    #[inline]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a + b;
    }

    #[inline]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a - b;
    }

    #[inline]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = &*a * b;
    }

    #[inline]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = std::mem::replace(a, b.zero()) + b * c;
    }

    #[inline]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = std::mem::replace(a, b.zero()) - b * c;
    }

    #[inline]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.clone().neg()
    }

    #[inline]
    fn zero(&self) -> Self::Element {
        MultivariatePolynomial::new(&self.ring, 0, self.variables.clone(), self.order.clone())
    }

    #[inline]
    fn one(&self) -> Self::Element {
        self.zero().one()
    }

    #[inline]
    fn nth(&self, n: &Integer) -> Self::Element {
        self.zero().constant(self.ring.nth(n))
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = b.clone();
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = &res * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }
        res
    }

    #[inline]
    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    #[inline]
    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn characteristic(&self) -> Integer {
        self.ring.characteristic()
    }

    fn size(&self) -> Integer {
        if self.nvars() == 0 {
            self.ring.size()
        } else {
            Integer::new()
        }
    }

    fn is_field(&self) -> bool {
        self.nvars() == 0 && self.ring.is_field()
    }

    fn is_commutative(&self) -> bool {
        self.ring.is_commutative()
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        a.divides(b)
    }

    /// Only nonzero constants with an invertible coefficient are units.
    fn try_inv(&self, a: &Self::Element) -> Result<Self::Element, AlgebraError> {
        if a.is_constant() && !a.is_zero() {
            let inv = self.ring.try_inv(&a.coefficients[0])?;
            Ok(a.constant(inv))
        } else {
            Err(AlgebraError::not_invertible(format!("{}", a)))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.random(rng, 3, 3, 0.5, range)
    }

    fn fmt_display(
        &self,
        element: &Self::Element,
        in_product: bool,
        f: &mut Formatter<'_>,
    ) -> Result<(), Error> {
        let s = element.to_string();
        if in_product && element.nterms() > 1 {
            if f.sign_plus() {
                f.write_str("+")?;
            }
            write!(f, "({})", s)
        } else {
            if f.sign_plus() && !s.starts_with('-') {
                f.write_str("+")?;
            }
            f.write_str(&s)
        }
    }
}

/// A multivariate polynomial with coefficients in the ring `F` and exponents of type `E`.
///
/// The terms are stored in `coefficients` and the flat `exponents` array, sorted
/// from smallest to largest in the term order `order`, so that the leading term is the last.
/// No zero coefficients are stored.
#[derive(Clone, Debug)]
pub struct MultivariatePolynomial<F: Ring, E: Exponent = u16> {
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<E>,
    pub ring: F,
    pub variables: Arc<Vec<Variable>>,
    pub order: TermOrder,
}

impl<F: Ring, E: Exponent> MultivariatePolynomial<F, E> {
    /// Constructs a zero polynomial. Instead of using this constructor,
    /// prefer to create new polynomials from existing ones, such as `self.zero()`.
    #[inline]
    pub fn new(
        ring: &F,
        cap: usize,
        variables: Arc<Vec<Variable>>,
        order: TermOrder,
    ) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * variables.len()),
            ring: ring.clone(),
            variables,
            order,
        }
    }

    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(&self.ring, 0, self.variables.clone(), self.order.clone())
    }

    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self::new(&self.ring, cap, self.variables.clone(), self.order.clone())
    }

    /// Constructs a constant polynomial in the same ring as `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents: vec![E::zero(); self.nvars()],
            ring: self.ring.clone(),
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }

    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.ring.one())
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponents: Vec<E>) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents,
            ring: self.ring.clone(),
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }

    /// The ring this polynomial lives in.
    pub fn poly_ring(&self) -> PolynomialRing<F, E> {
        PolynomialRing::from_poly(self)
    }

    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.ring.is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| x.is_zero())
    }

    /// Returns `true` iff the polynomial is zero or has only a constant term.
    #[inline]
    pub fn is_constant(&self) -> bool {
        match self.nterms() {
            0 => true,
            1 => self.exponents.iter().all(|e| e.is_zero()),
            _ => false,
        }
    }

    /// Get the exponents of the `index`th term in storage order.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    #[inline]
    pub fn last_exponents(&self) -> &[E] {
        assert!(self.nterms() > 0);
        self.exponents(self.nterms() - 1)
    }

    #[inline]
    pub fn to_monomial_view(&self, index: usize) -> MonomialView<F, E> {
        MonomialView {
            coefficient: &self.coefficients[index],
            exponents: self.exponents(index),
        }
    }

    /// Check that both polynomials live in rings with the same rank and term order.
    pub fn check_compatible(&self, other: &Self) -> Result<(), AlgebraError> {
        if self.nvars() != other.nvars() {
            return Err(AlgebraError::RankMismatch {
                expected: self.nvars(),
                found: other.nvars(),
            });
        }
        if self.order != other.order {
            return Err(AlgebraError::invalid_configuration(format!(
                "term orders {} and {} differ",
                self.order, other.order
            )));
        }
        Ok(())
    }

    /// Validate the internal invariants: terms sorted by the term order and no zero coefficients.
    pub fn check_consistency(&self) {
        assert_eq!(self.exponents.len(), self.nterms() * self.nvars());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("Inconsistent polynomial (0 coefficient): {}", self);
            }
        }

        for t in 1..self.nterms() {
            match self.order.cmp(self.exponents(t), self.exponents(t - 1)) {
                Ordering::Equal => panic!("Inconsistent polynomial (equal monomials): {}", self),
                Ordering::Less => panic!(
                    "Inconsistent polynomial (wrong monomial ordering): {}",
                    self
                ),
                Ordering::Greater => {}
            }
        }
    }

    /// Add a monomial to the polynomial, merging it with an existing term
    /// with the same exponents.
    pub fn append_monomial(&mut self, coefficient: F::Element, exponents: &[E]) {
        if F::is_zero(&coefficient) {
            return;
        }
        if self.nvars() != exponents.len() {
            panic!(
                "nvars mismatched: got {}, expected {}",
                exponents.len(),
                self.nvars()
            );
        }

        // should we append to the back?
        if self.nterms() == 0 || self.order.cmp(self.last_exponents(), exponents).is_lt() {
            self.coefficients.push(coefficient);
            self.exponents.extend_from_slice(exponents);
            return;
        }

        // binary search for the insertion point
        let mut l = 0;
        let mut r = self.nterms();
        while l < r {
            let m = (l + r) / 2;
            match self.order.cmp(exponents, self.exponents(m)) {
                Ordering::Equal => {
                    self.ring.add_assign(&mut self.coefficients[m], &coefficient);
                    if F::is_zero(&self.coefficients[m]) {
                        self.coefficients.remove(m);
                        let i = m * self.nvars();
                        self.exponents.drain(i..i + self.nvars());
                    }
                    return;
                }
                Ordering::Greater => l = m + 1,
                Ordering::Less => r = m,
            }
        }

        self.coefficients.insert(l, coefficient);
        let i = l * self.nvars();
        self.exponents.splice(i..i, exponents.iter().cloned());
    }

    /// Add the term `coefficient * x^exponents` in place.
    pub fn add_term(&mut self, coefficient: F::Element, exponents: &[E]) {
        self.append_monomial(coefficient, exponents);
    }

    /// Subtract the term `coefficient * x^exponents` in place.
    pub fn sub_term(&mut self, coefficient: F::Element, exponents: &[E]) {
        let c = self.ring.neg(&coefficient);
        self.append_monomial(c, exponents);
    }

    /// The exponent vector of the leading term, or `None` for the zero polynomial.
    pub fn leading_exp_vector(&self) -> Option<ExpVector<E>> {
        if self.is_zero() {
            None
        } else {
            Some(self.last_exponents().into())
        }
    }

    /// The coefficient of the leading term, or zero for the zero polynomial.
    pub fn leading_base_coefficient(&self) -> F::Element {
        self.coefficients
            .last()
            .cloned()
            .unwrap_or_else(|| self.ring.zero())
    }

    /// The constant term.
    pub fn trailing_base_coefficient(&self) -> F::Element {
        // the zero vector is the smallest element of an admissible order
        if self.nterms() > 0 && self.exponents(0).iter().all(|e| e.is_zero()) {
            return self.coefficients[0].clone();
        }

        (0..self.nterms())
            .find(|i| self.exponents(*i).iter().all(|e| e.is_zero()))
            .map(|i| self.coefficients[i].clone())
            .unwrap_or_else(|| self.ring.zero())
    }

    pub fn leading_monomial(&self) -> Option<MonomialView<F, E>> {
        if self.is_zero() {
            None
        } else {
            Some(self.to_monomial_view(self.nterms() - 1))
        }
    }

    /// The polynomial without its leading term.
    pub fn reductum(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }

        let mut res = self.clone();
        res.coefficients.pop();
        res.exponents.truncate((self.nterms() - 1) * self.nvars());
        res
    }

    /// Get the highest degree of the variable `var`.
    pub fn degree(&self, var: usize) -> E {
        let mut max = E::zero();
        for t in 0..self.nterms() {
            if max < self.exponents(t)[var] {
                max = self.exponents(t)[var];
            }
        }
        max
    }

    /// The maximal total degree of the terms.
    pub fn total_degree(&self) -> u64 {
        (0..self.nterms())
            .map(|t| super::total_degree(self.exponents(t)))
            .max()
            .unwrap_or(0)
    }

    /// Map the coefficients into a new ring. Terms that map to zero are dropped.
    pub fn map_coeff<U: Ring, T: Fn(&F::Element) -> U::Element>(
        &self,
        f: T,
        ring: U,
    ) -> MultivariatePolynomial<U, E> {
        let mut coefficients = Vec::with_capacity(self.nterms());
        let mut exponents = Vec::with_capacity(self.exponents.len());

        for m in self.into_iter().rev() {
            let c = f(m.coefficient);
            if !U::is_zero(&c) {
                coefficients.push(c);
                exponents.extend_from_slice(m.exponents);
            }
        }

        MultivariatePolynomial {
            coefficients,
            exponents,
            ring,
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }

    /// Multiply every coefficient on the right by `c`.
    pub fn mul_coeff(mut self, c: F::Element) -> Self {
        if self.ring.is_one(&c) {
            return self;
        }

        let mut i = 0;
        while i < self.nterms() {
            self.ring.mul_assign(&mut self.coefficients[i], &c);
            if F::is_zero(&self.coefficients[i]) {
                self.coefficients.remove(i);
                self.exponents.drain(i * self.nvars()..(i + 1) * self.nvars());
            } else {
                i += 1;
            }
        }

        self
    }

    /// Multiply by the monomial `x^exponents`.
    pub fn mul_exp(mut self, exponents: &[E]) -> Self {
        debug_assert_eq!(self.nvars(), exponents.len());

        for e in self.exponents.chunks_mut(exponents.len().max(1)) {
            for (a, b) in e.iter_mut().zip(exponents) {
                *a = add_exponents(a, b);
            }
        }

        self
    }

    /// Differentiate with respect to the variable `var`.
    pub fn derivative(&self, var: usize) -> Self {
        let mut res = self.zero_with_capacity(self.nterms());
        let mut exp = vec![E::zero(); self.nvars()];

        for i in 0..self.nterms() {
            let e = self.exponents(i)[var];
            if e.is_zero() {
                continue;
            }

            let c = self.ring.mul(
                &self.coefficients[i],
                &self.ring.nth(&Integer::from(e.to_u32())),
            );
            exp.copy_from_slice(self.exponents(i));
            exp[var] = e - E::one();
            res.append_monomial(c, &exp);
        }

        res
    }

    /// Substitute `value` for the variable `var`. The rank is unchanged.
    pub fn evaluate_var(&self, var: usize, value: &F::Element) -> Self {
        let d = self.degree(var).to_u32() as usize;
        let mut powers = Vec::with_capacity(d + 1);
        powers.push(self.ring.one());
        for i in 1..=d {
            let p = self.ring.mul(&powers[i - 1], value);
            powers.push(p);
        }

        let mut res = self.zero_with_capacity(self.nterms());
        let mut exp = vec![E::zero(); self.nvars()];
        for i in 0..self.nterms() {
            let e = self.exponents(i)[var].to_u32() as usize;
            exp.copy_from_slice(self.exponents(i));
            exp[var] = E::zero();
            res.append_monomial(self.ring.mul(&self.coefficients[i], &powers[e]), &exp);
        }

        res
    }

    /// Embed the polynomial into `ring`, which has `k'` additional leading
    /// variables, and multiply by `x_j^k` where `j` is the position among the new variables.
    pub fn extend(
        &self,
        ring: &PolynomialRing<F, E>,
        j: usize,
        k: E,
    ) -> Result<Self, AlgebraError> {
        if ring.nvars() < self.nvars() {
            return Err(AlgebraError::RankMismatch {
                expected: self.nvars(),
                found: ring.nvars(),
            });
        }
        let added = ring.nvars() - self.nvars();

        let mut res = ring.zero().zero_with_capacity(self.nterms());
        for i in 0..self.nterms() {
            let e = ExpVector::from(self.exponents(i)).extend(added, j, k)?;
            res.append_monomial(self.coefficients[i].clone(), &e);
        }
        Ok(res)
    }

    /// Split off the first `k` variables. Returns a map from the removed exponents
    /// to the polynomial in the remaining variables.
    pub fn contract(&self, k: usize) -> BTreeMap<ExpVector<E>, Self> {
        let ring = self.poly_ring().contract(k);

        let mut map: BTreeMap<ExpVector<E>, Self> = BTreeMap::new();
        for i in 0..self.nterms() {
            let (head, rest) = ExpVector::from(self.exponents(i)).contract(k);
            map.entry(head)
                .or_insert_with(|| ring.zero())
                .append_monomial(self.coefficients[i].clone(), &rest);
        }
        map
    }

    /// Reverse the order of the variables.
    pub fn reverse(&self) -> Self {
        let mut res = self.poly_ring().reverse().zero().zero_with_capacity(self.nterms());
        for i in 0..self.nterms() {
            let e = ExpVector::from(self.exponents(i)).reverse();
            res.append_monomial(self.coefficients[i].clone(), &e);
        }
        res
    }

    /// Term indices sorted by the natural order of the exponents, independent of the term order.
    fn canonical_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.nterms()).collect();
        indices.sort_by(|a, b| self.exponents(*a).cmp(self.exponents(*b)));
        indices
    }

    /// Multiply two polynomials by merging the partial products in a heap.
    /// The coefficients of `self` are multiplied from the left.
    pub(crate) fn heap_mul(&self, rhs: &Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        // place the smallest polynomial first, as this is faster in the heap algorithm
        let swapped = self.nterms() > rhs.nterms();
        let (a, b) = if swapped { (rhs, self) } else { (self, rhs) };

        let mut res = self.zero_with_capacity(a.nterms());

        let mut cache: HashMap<Vec<E>, Vec<(usize, usize)>> = HashMap::new();
        let mut q_cache: Vec<Vec<(usize, usize)>> = vec![];

        let mut h: BinaryHeap<MinHeapEntry<E>> = BinaryHeap::with_capacity(a.nterms());

        let monom = ExpVector::from(a.exponents(0)).sum(b.exponents(0)).to_vec();
        cache.insert(monom.clone(), vec![(0, 0)]);
        h.push(MinHeapEntry {
            exponents: monom,
            order: &self.order,
        });

        let mut m_cache: Vec<E> = vec![E::zero(); self.nvars()];

        // i=merged_index[j] signifies that a[i]*b[j] has been merged
        let mut merged_index = vec![0; b.nterms()];
        // in_heap[j] signifies that b[j] is in the heap
        let mut in_heap = vec![false; b.nterms()];
        in_heap[0] = true;

        while let Some(cur_mon) = h.pop() {
            let mut coefficient = self.ring.zero();

            let mut q = cache.remove(&cur_mon.exponents).unwrap_or_default();

            for (i, j) in q.drain(..) {
                if swapped {
                    self.ring
                        .add_mul_assign(&mut coefficient, &b.coefficients[j], &a.coefficients[i]);
                } else {
                    self.ring
                        .add_mul_assign(&mut coefficient, &a.coefficients[i], &b.coefficients[j]);
                }

                merged_index[j] = i + 1;

                if i + 1 < a.nterms() && (j == 0 || merged_index[j - 1] > i + 1) {
                    for ((m, e1), e2) in m_cache
                        .iter_mut()
                        .zip(a.exponents(i + 1))
                        .zip(b.exponents(j))
                    {
                        *m = add_exponents(e1, e2);
                    }

                    if let Some(e) = cache.get_mut(&m_cache) {
                        e.push((i + 1, j));
                    } else {
                        h.push(MinHeapEntry {
                            exponents: m_cache.clone(),
                            order: &self.order,
                        });
                        let mut qq = q_cache.pop().unwrap_or_default();
                        qq.push((i + 1, j));
                        cache.insert(m_cache.clone(), qq);
                    }
                } else {
                    in_heap[j] = false;
                }

                if j + 1 < b.nterms() && !in_heap[j + 1] {
                    for ((m, e1), e2) in m_cache
                        .iter_mut()
                        .zip(a.exponents(i))
                        .zip(b.exponents(j + 1))
                    {
                        *m = add_exponents(e1, e2);
                    }

                    if let Some(e) = cache.get_mut(&m_cache) {
                        e.push((i, j + 1));
                    } else {
                        h.push(MinHeapEntry {
                            exponents: m_cache.clone(),
                            order: &self.order,
                        });
                        let mut qq = q_cache.pop().unwrap_or_default();
                        qq.push((i, j + 1));
                        cache.insert(m_cache.clone(), qq);
                    }

                    in_heap[j + 1] = true;
                }
            }

            q_cache.push(q);

            if !F::is_zero(&coefficient) {
                res.coefficients.push(coefficient);
                res.exponents.extend_from_slice(&cur_mon.exponents);
            }
        }
        res
    }
}

/// A heap entry that pops the smallest exponent vector in the term order first.
struct MinHeapEntry<'a, E: Exponent> {
    exponents: Vec<E>,
    order: &'a TermOrder,
}

impl<E: Exponent> PartialEq for MinHeapEntry<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        self.exponents == other.exponents
    }
}

impl<E: Exponent> Eq for MinHeapEntry<'_, E> {}

impl<E: Exponent> PartialOrd for MinHeapEntry<'_, E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Exponent> Ord for MinHeapEntry<'_, E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.cmp(&other.exponents, &self.exponents)
    }
}

impl<F: Ring, E: Exponent> PartialEq for MultivariatePolynomial<F, E> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        if self.nvars() != other.nvars() || self.nterms() != other.nterms() {
            return false;
        }

        if self.order == other.order {
            return self.exponents.eq(&other.exponents) && self.coefficients.eq(&other.coefficients);
        }

        // the storage orders differ, so compare the term sets
        self.canonical_indices()
            .into_iter()
            .zip(other.canonical_indices())
            .all(|(i, j)| {
                self.exponents(i) == other.exponents(j)
                    && self.coefficients[i] == other.coefficients[j]
            })
    }
}

impl<F: Ring, E: Exponent> Eq for MultivariatePolynomial<F, E> {}

impl<F: Ring, E: Exponent> Hash for MultivariatePolynomial<F, E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nvars().hash(state);
        for i in self.canonical_indices() {
            self.coefficients[i].hash(state);
            self.exponents(i).hash(state);
        }
    }
}

impl<F: Ring, E: Exponent> Display for MultivariatePolynomial<F, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, m) in self.into_iter().enumerate() {
            let is_constant = m.exponents.iter().all(|e| e.is_zero());

            if !is_constant && self.ring.is_one(m.coefficient) {
                if i > 0 {
                    f.write_str("+")?;
                }
            } else if !is_constant && self.ring.is_one(&self.ring.neg(m.coefficient)) {
                f.write_str("-")?;
            } else {
                let p = self.ring.printer(m.coefficient);
                let p = if is_constant { p } else { p.in_product() };
                if i > 0 {
                    write!(f, "{:+}", p)?;
                } else {
                    write!(f, "{}", p)?;
                }

                if is_constant {
                    continue;
                }
                f.write_str("*")?;
            }

            let mut first = true;
            for (v, e) in self.variables.iter().zip(m.exponents) {
                if e.is_zero() {
                    continue;
                }
                if !first {
                    f.write_str("*")?;
                }
                first = false;

                if e.to_u32() == 1 {
                    write!(f, "{}", v)?;
                } else {
                    write!(f, "{}^{}", v, e)?;
                }
            }
        }

        Ok(())
    }
}

impl<F: Ring, E: Exponent> Add for MultivariatePolynomial<F, E> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Add<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn add(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        assert_eq!(
            self.nvars(),
            other.nvars(),
            "Cannot add polynomials of different rank"
        );
        debug_assert_eq!(self.order, other.order);

        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        // Merge the two polynomials, which are assumed to be already sorted.
        let nvars = self.nvars();
        let mut new_coefficients = Vec::with_capacity(self.nterms() + other.nterms());
        let mut new_exponents: Vec<E> = Vec::with_capacity(nvars * (self.nterms() + other.nterms()));
        let mut i = 0;
        let mut j = 0;

        macro_rules! insert_monomial {
            ($source:expr, $index:expr) => {
                new_coefficients.push($source.coefficients[$index].clone());
                new_exponents.extend_from_slice($source.exponents($index));
            };
        }

        while i < self.nterms() && j < other.nterms() {
            match self.order.cmp(self.exponents(i), other.exponents(j)) {
                Ordering::Less => {
                    insert_monomial!(self, i);
                    i += 1;
                }
                Ordering::Greater => {
                    insert_monomial!(other, j);
                    j += 1;
                }
                Ordering::Equal => {
                    let coeff = self.ring.add(&self.coefficients[i], &other.coefficients[j]);
                    if !F::is_zero(&coeff) {
                        new_coefficients.push(coeff);
                        new_exponents.extend_from_slice(self.exponents(i));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            insert_monomial!(self, i);
            i += 1;
        }

        while j < other.nterms() {
            insert_monomial!(other, j);
            j += 1;
        }

        MultivariatePolynomial {
            coefficients: new_coefficients,
            exponents: new_exponents,
            ring: self.ring.clone(),
            variables: self.variables.clone(),
            order: self.order.clone(),
        }
    }
}

impl<F: Ring, E: Exponent> Sub for MultivariatePolynomial<F, E> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Sub<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    fn sub(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        self + &other.clone().neg()
    }
}

impl<F: Ring, E: Exponent> Neg for MultivariatePolynomial<F, E> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        // Negate coefficients of all terms.
        for c in &mut self.coefficients {
            *c = self.ring.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring, E: Exponent> Mul<&'a MultivariatePolynomial<F, E>>
    for &'b MultivariatePolynomial<F, E>
{
    type Output = MultivariatePolynomial<F, E>;

    #[inline]
    fn mul(self, other: &'a MultivariatePolynomial<F, E>) -> Self::Output {
        assert_eq!(
            self.nvars(),
            other.nvars(),
            "Cannot multiply polynomials of different rank"
        );
        debug_assert_eq!(self.order, other.order);

        self.heap_mul(other)
    }
}

impl<F: Ring, E: Exponent> Mul for MultivariatePolynomial<F, E> {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self::Output {
        &self * &other
    }
}
