//! Commutation relations for solvable polynomial rings.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use smallvec::SmallVec;
use tracing::warn;

use crate::domains::Ring;
use crate::error::AlgebraError;

use super::polynomial::{MultivariatePolynomial, PolynomialRing};
use super::{ExpVector, Exponent, Variable, INLINED_EXPONENTS};

type Dependency = SmallVec<[usize; INLINED_EXPONENTS]>;

/// The relation `x^left * x^right = product`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Relation<R: Ring, E: Exponent = u16> {
    pub left: ExpVector<E>,
    pub right: ExpVector<E>,
    pub product: MultivariatePolynomial<R, E>,
}

/// The result of looking up the product `x^e * x^f` in a [RelationTable].
#[derive(Debug)]
pub enum TableLookup<'a, R: Ring, E: Exponent> {
    /// A relation is stored for exactly this pair.
    Exact(&'a MultivariatePolynomial<R, E>),
    /// `x^e * x^f = x^left * (relation) * x^right`.
    Partial {
        left: ExpVector<E>,
        relation: &'a Relation<R, E>,
        right: ExpVector<E>,
    },
    /// No relation applies and the variables commute.
    Commute,
}

/// A table of commutation relations between powers of variables, keyed by the
/// variables the two factors depend on. A missing entry means that the factors commute.
///
/// The table is filled with [RelationTable::update] and is read-only once it is
/// part of a [SolvablePolynomialRing](super::solvable::SolvablePolynomialRing).
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RelationTable<R: Ring, E: Exponent = u16> {
    ring: PolynomialRing<R, E>,
    table: BTreeMap<(Dependency, Dependency), Vec<Relation<R, E>>>,
}

impl<R: Ring, E: Exponent> RelationTable<R, E> {
    pub fn new(ring: &PolynomialRing<R, E>) -> RelationTable<R, E> {
        RelationTable {
            ring: ring.clone(),
            table: BTreeMap::new(),
        }
    }

    pub fn ring(&self) -> &PolynomialRing<R, E> {
        &self.ring
    }

    /// The number of stored relations.
    pub fn len(&self) -> usize {
        self.table.values().map(|r| r.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate over the relations in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = &Relation<R, E>> {
        self.table.values().flatten()
    }

    /// Insert or overwrite the relation `x^e * x^f = p`.
    ///
    /// A relation between single variables that is given in standard order, that is
    /// where the variable of `e` comes before the variable of `f`, is stored
    /// for the swapped pair as `x^f * x^e = lt(p) - (p - lt(p))`.
    pub fn update(
        &mut self,
        e: ExpVector<E>,
        f: ExpVector<E>,
        p: MultivariatePolynomial<R, E>,
    ) -> Result<(), AlgebraError> {
        let rank = self.ring.nvars();
        for found in [e.rank(), f.rank(), p.nvars()] {
            if found != rank {
                return Err(AlgebraError::invalid_configuration(format!(
                    "relation of rank {} in a table of rank {}",
                    found, rank
                )));
            }
        }

        let de = e.dependency();
        let df = f.dependency();

        let (e, f, p, de, df) = if de.len() == 1 && df.len() == 1 {
            match de[0].cmp(&df[0]) {
                std::cmp::Ordering::Equal => {
                    return Err(AlgebraError::invalid_configuration(format!(
                        "relation between powers of the same variable {}",
                        self.ring.variables()[de[0]]
                    )));
                }
                std::cmp::Ordering::Less => {
                    let lt = p.leading_monomial().map(|m| {
                        p.zero().monomial(m.coefficient.clone(), m.exponents.to_vec())
                    });
                    let p = match lt {
                        Some(lt) => &lt - &(&p - &lt),
                        None => p,
                    };

                    warn!(
                        "Relation {} * {} is in standard order: storing {} * {} = {}",
                        self.fmt_monomial(&e),
                        self.fmt_monomial(&f),
                        self.fmt_monomial(&f),
                        self.fmt_monomial(&e),
                        p
                    );
                    (f, e, p, df, de)
                }
                std::cmp::Ordering::Greater => (e, f, p, de, df),
            }
        } else {
            (e, f, p, de, df)
        };

        let relations = self.table.entry((de, df)).or_default();
        match relations.binary_search_by(|r| (&r.left, &r.right).cmp(&(&e, &f))) {
            Ok(i) => relations[i].product = p,
            Err(i) => relations.insert(
                i,
                Relation {
                    left: e,
                    right: f,
                    product: p,
                },
            ),
        }

        Ok(())
    }

    /// Look up the product `x^e * x^f`.
    ///
    /// If no relation is stored for exactly this pair, the relation `x^e' * x^f'` with
    /// `e' | e` and `f' | f` that leaves the smallest total degree is used.
    pub fn lookup(&self, e: &ExpVector<E>, f: &ExpVector<E>) -> TableLookup<'_, R, E> {
        let Some(relations) = self.table.get(&(e.dependency(), f.dependency())) else {
            return TableLookup::Commute;
        };

        if let Ok(i) = relations.binary_search_by(|r| (&r.left, &r.right).cmp(&(e, f))) {
            return TableLookup::Exact(&relations[i].product);
        }

        let mut best: Option<(u64, ExpVector<E>, &Relation<R, E>, ExpVector<E>)> = None;
        for r in relations {
            let (Some(left), Some(right)) = (e.checked_sub(&r.left), f.checked_sub(&r.right))
            else {
                continue;
            };

            let leftover = left.total_degree() + right.total_degree();
            if best.as_ref().map(|b| leftover < b.0).unwrap_or(true) {
                best = Some((leftover, left, r, right));
            }
        }

        match best {
            Some((_, left, relation, right)) => TableLookup::Partial {
                left,
                relation,
                right,
            },
            None => TableLookup::Commute,
        }
    }

    fn fmt_monomial(&self, e: &[E]) -> String {
        fmt_monomial(self.ring.variables(), e)
    }
}

pub(crate) fn fmt_monomial<E: Exponent>(variables: &[Variable], e: &[E]) -> String {
    let mut s = String::new();
    for (v, x) in variables.iter().zip(e) {
        if x.is_zero() {
            continue;
        }
        if !s.is_empty() {
            s.push('*');
        }
        if x.to_u32() == 1 {
            s.push_str(&v.to_string());
        } else {
            s.push_str(&format!("{}^{}", v, x));
        }
    }

    if s.is_empty() {
        s.push('1');
    }
    s
}

impl<R: Ring, E: Exponent> Display for RelationTable<R, E> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("RelationTable[")?;
        for (i, r) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{} * {} = {}",
                self.fmt_monomial(&r.left),
                self.fmt_monomial(&r.right),
                r.product
            )?;
        }
        f.write_str("]")
    }
}
