pub mod division;
pub mod gcd;
pub mod monomial;
pub mod polynomial;
pub mod reconstruct;
pub mod relation_table;
pub mod solvable;
pub mod term_order;

use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::Sum;
use std::ops::{Add as OpAdd, AddAssign, Deref, Sub};
use std::sync::Arc;

use rand::Rng;
use smallvec::{smallvec, SmallVec};
use smartstring::{LazyCompact, SmartString};

use crate::error::AlgebraError;

pub const INLINED_EXPONENTS: usize = 6;

pub trait Exponent:
    Hash
    + Debug
    + Display
    + Ord
    + Sub<Output = Self>
    + OpAdd<Output = Self>
    + Sum<Self>
    + AddAssign
    + Clone
    + Copy
    + PartialEq
    + Eq
    + Send
    + Sync
{
    fn zero() -> Self;
    fn one() -> Self;
    /// Convert the exponent to `u32`. This is always possible, as `u32` is the largest supported exponent type.
    fn to_u32(&self) -> u32;
    /// Convert from `u32`. This function may panic if the exponent is too large.
    fn from_u32(n: u32) -> Self;
    fn is_zero(&self) -> bool;
    fn checked_add(&self, other: &Self) -> Option<Self>;
    fn checked_sub(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_exponent {
    ($($t:ty),*) => {
        $(
            impl Exponent for $t {
                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn one() -> Self {
                    1
                }

                #[inline]
                fn to_u32(&self) -> u32 {
                    *self as u32
                }

                #[inline]
                fn from_u32(n: u32) -> Self {
                    if n <= <$t>::MAX as u32 {
                        n as $t
                    } else {
                        panic!("Exponent {} too large for {}", n, stringify!($t));
                    }
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    *self == 0
                }

                #[inline]
                fn checked_add(&self, other: &Self) -> Option<Self> {
                    <$t>::checked_add(*self, *other)
                }

                #[inline]
                fn checked_sub(&self, other: &Self) -> Option<Self> {
                    <$t>::checked_sub(*self, *other)
                }
            }
        )*
    };
}

impl_exponent!(u8, u16, u32);

/// A polynomial variable. It is either a named symbol
/// or a temporary variable.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum Variable {
    Symbol(SmartString<LazyCompact>),
    Temporary(usize),
}

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable::Symbol(name.into())
    }

    /// Create a shared variable list from names.
    pub fn list(names: &[&str]) -> Arc<Vec<Variable>> {
        Arc::new(names.iter().map(|n| Variable::new(n)).collect())
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Variable {
        Variable::new(name)
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Variable::Symbol(s) => f.write_str(s),
            Variable::Temporary(t) => write!(f, "_TMP_{}", t),
        }
    }
}

/// An exponent vector of fixed rank: the key of a monomial.
/// Every arithmetic operation creates a new vector.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ExpVector<E: Exponent = u16>(SmallVec<[E; INLINED_EXPONENTS]>);

impl<E: Exponent> Deref for ExpVector<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.0
    }
}

impl<E: Exponent> From<Vec<E>> for ExpVector<E> {
    fn from(v: Vec<E>) -> Self {
        ExpVector(SmallVec::from_vec(v))
    }
}

impl<E: Exponent> From<&[E]> for ExpVector<E> {
    fn from(v: &[E]) -> Self {
        ExpVector(SmallVec::from_slice(v))
    }
}

impl<E: Exponent> ExpVector<E> {
    /// The identity monomial of rank `rank`.
    pub fn zero(rank: usize) -> Self {
        ExpVector(smallvec![E::zero(); rank])
    }

    /// The vector of rank `rank` that is `value` at `index` and zero elsewhere.
    pub fn unit(rank: usize, index: usize, value: E) -> Self {
        let mut e = Self::zero(rank);
        e.0[index] = value;
        e
    }

    /// Create a random vector where each entry is nonzero with probability `density`
    /// and, if so, uniformly drawn from `[0, max_exp)`.
    pub fn random(rng: &mut impl rand::RngCore, rank: usize, max_exp: u32, density: f64) -> Self {
        let mut e = Self::zero(rank);
        if max_exp == 0 {
            return e;
        }

        for x in e.0.iter_mut() {
            if rng.gen_bool(density.clamp(0., 1.)) {
                *x = E::from_u32(rng.gen_range(0..max_exp));
            }
        }
        e
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|e| e.is_zero())
    }

    /// Componentwise sum. Panics on exponent overflow.
    pub fn sum(&self, other: &[E]) -> Self {
        debug_assert_eq!(self.rank(), other.len());
        ExpVector(
            self.0
                .iter()
                .zip(other)
                .map(|(a, b)| add_exponents(a, b))
                .collect(),
        )
    }

    /// Componentwise difference, or `None` if any entry would become negative.
    pub fn checked_sub(&self, other: &[E]) -> Option<Self> {
        debug_assert_eq!(self.rank(), other.len());
        let mut r = self.clone();
        for (a, b) in r.0.iter_mut().zip(other) {
            *a = a.checked_sub(b)?;
        }
        Some(r)
    }

    /// Returns `true` iff every entry of `self` is at least the entry in `other`.
    pub fn multiple_of(&self, other: &[E]) -> bool {
        self.0.iter().zip(other).all(|(a, b)| a >= b)
    }

    /// Componentwise maximum.
    pub fn lcm(&self, other: &[E]) -> Self {
        ExpVector(self.0.iter().zip(other).map(|(a, b)| *a.max(b)).collect())
    }

    /// Componentwise minimum.
    pub fn gcd(&self, other: &[E]) -> Self {
        ExpVector(self.0.iter().zip(other).map(|(a, b)| *a.min(b)).collect())
    }

    pub fn total_degree(&self) -> u64 {
        total_degree(&self.0)
    }

    /// The weighted degree for every row of `weights`.
    pub fn weighted_degree(&self, weights: &[Vec<i64>]) -> Vec<i64> {
        weights
            .iter()
            .map(|w| weighted_degree(w, &self.0, 0..self.rank()))
            .collect()
    }

    /// The indices of the variables with a nonzero exponent, in ascending order.
    pub fn dependency(&self) -> SmallVec<[usize; INLINED_EXPONENTS]> {
        dependency(&self.0)
    }

    /// Prepend `k` zero entries and set the new entry `j` to `value`.
    pub fn extend(&self, k: usize, j: usize, value: E) -> Result<Self, AlgebraError> {
        let mut r: SmallVec<[E; INLINED_EXPONENTS]> = smallvec![E::zero(); k];
        if !value.is_zero() {
            let Some(x) = r.get_mut(j) else {
                return Err(AlgebraError::invalid_configuration(format!(
                    "position {} is not among the {} new variables",
                    j, k
                )));
            };
            *x = value;
        }
        r.extend_from_slice(&self.0);
        Ok(ExpVector(r))
    }

    /// Split off the first `k` entries.
    pub fn contract(&self, k: usize) -> (Self, Self) {
        (
            ExpVector::from(&self.0[..k]),
            ExpVector::from(&self.0[k..]),
        )
    }

    pub fn reverse(&self) -> Self {
        ExpVector(self.0.iter().rev().cloned().collect())
    }
}

impl<E: Exponent> Display for ExpVector<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", e)?;
        }
        f.write_str(")")
    }
}

/// Add two exponents. Panics on overflow.
#[inline]
pub(crate) fn add_exponents<E: Exponent>(a: &E, b: &E) -> E {
    a.checked_add(b)
        .unwrap_or_else(|| panic!("overflow in adding exponents"))
}

#[inline]
pub(crate) fn total_degree<E: Exponent>(e: &[E]) -> u64 {
    e.iter().map(|x| x.to_u32() as u64).sum()
}

#[inline]
pub(crate) fn weighted_degree<E: Exponent>(
    w: &[i64],
    e: &[E],
    range: std::ops::Range<usize>,
) -> i64 {
    range.map(|i| w[i] * e[i].to_u32() as i64).sum()
}

pub(crate) fn dependency<E: Exponent>(e: &[E]) -> SmallVec<[usize; INLINED_EXPONENTS]> {
    e.iter()
        .enumerate()
        .filter(|(_, x)| !x.is_zero())
        .map(|(i, _)| i)
        .collect()
}
