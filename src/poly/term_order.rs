//! Term orders on exponent vectors.
//!
//! A [TermOrder] is a runtime value carried by every polynomial ring. It can be a
//! [NamedOrder] identified by an integer code, a weight matrix, or a block order
//! that compares a prefix of the variables before the rest.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::sync::Arc;

use crate::error::AlgebraError;

use super::{total_degree, weighted_degree, Exponent};

/// A term order with a fixed integer code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum NamedOrder {
    /// The first differing position decides.
    Lex = 1,
    /// The last differing position decides.
    InvLex = 2,
    /// Total degree, then [NamedOrder::Lex].
    GrLex = 3,
    /// Total degree, then [NamedOrder::InvLex].
    IGrLex = 4,
    /// The last differing position decides, the smaller entry is larger.
    RevLex = 5,
    /// The first differing position decides, the smaller entry is larger.
    RevILex = 6,
    /// Total degree, then [NamedOrder::RevLex].
    RevTDeg = 7,
    /// Total degree, then [NamedOrder::RevILex].
    RevITDeg = 8,
}

impl NamedOrder {
    pub const ALL: [NamedOrder; 8] = [
        NamedOrder::Lex,
        NamedOrder::InvLex,
        NamedOrder::GrLex,
        NamedOrder::IGrLex,
        NamedOrder::RevLex,
        NamedOrder::RevILex,
        NamedOrder::RevTDeg,
        NamedOrder::RevITDeg,
    ];

    pub fn from_code(code: u32) -> Result<NamedOrder, AlgebraError> {
        match code {
            1 => Ok(NamedOrder::Lex),
            2 => Ok(NamedOrder::InvLex),
            3 => Ok(NamedOrder::GrLex),
            4 => Ok(NamedOrder::IGrLex),
            5 => Ok(NamedOrder::RevLex),
            6 => Ok(NamedOrder::RevILex),
            7 => Ok(NamedOrder::RevTDeg),
            8 => Ok(NamedOrder::RevITDeg),
            _ => Err(AlgebraError::invalid_configuration(format!(
                "unknown term order code {}",
                code
            ))),
        }
    }

    #[inline]
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// The reverse lexicographic orders without degree are total but not well-founded.
    pub fn is_admissible(&self) -> bool {
        !matches!(self, NamedOrder::RevLex | NamedOrder::RevILex)
    }

    /// The order that compares reversed vectors the way `self` compares the originals.
    pub fn reverse(&self) -> NamedOrder {
        match self {
            NamedOrder::Lex => NamedOrder::InvLex,
            NamedOrder::InvLex => NamedOrder::Lex,
            NamedOrder::GrLex => NamedOrder::IGrLex,
            NamedOrder::IGrLex => NamedOrder::GrLex,
            NamedOrder::RevLex => NamedOrder::RevILex,
            NamedOrder::RevILex => NamedOrder::RevLex,
            NamedOrder::RevTDeg => NamedOrder::RevITDeg,
            NamedOrder::RevITDeg => NamedOrder::RevTDeg,
        }
    }

    /// Compare two exponent vectors. Panics if their ranks differ.
    pub fn cmp<E: Exponent>(&self, a: &[E], b: &[E]) -> Ordering {
        check_same_rank(a, b);
        match self {
            NamedOrder::Lex => lex(a, b),
            NamedOrder::InvLex => inv_lex(a, b),
            NamedOrder::RevLex => inv_lex(b, a),
            NamedOrder::RevILex => lex(b, a),
            NamedOrder::GrLex => graded(a, b).then_with(|| lex(a, b)),
            NamedOrder::IGrLex => graded(a, b).then_with(|| inv_lex(a, b)),
            NamedOrder::RevTDeg => graded(a, b).then_with(|| inv_lex(b, a)),
            NamedOrder::RevITDeg => graded(a, b).then_with(|| lex(b, a)),
        }
    }
}

impl Display for NamedOrder {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(match self {
            NamedOrder::Lex => "LEX",
            NamedOrder::InvLex => "INVLEX",
            NamedOrder::GrLex => "GRLEX",
            NamedOrder::IGrLex => "IGRLEX",
            NamedOrder::RevLex => "REVLEX",
            NamedOrder::RevILex => "REVILEX",
            NamedOrder::RevTDeg => "REVTDEG",
            NamedOrder::RevITDeg => "REVITDG",
        })
    }
}

#[inline]
fn check_same_rank<E: Exponent>(a: &[E], b: &[E]) {
    assert_eq!(
        a.len(),
        b.len(),
        "cannot compare exponent vectors of different rank"
    );
}

#[inline]
fn lex<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.cmp(y) {
            Ordering::Equal => {}
            o => return o,
        }
    }
    Ordering::Equal
}

#[inline]
fn inv_lex<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
    for (x, y) in a.iter().zip(b).rev() {
        match x.cmp(y) {
            Ordering::Equal => {}
            o => return o,
        }
    }
    Ordering::Equal
}

#[inline]
fn graded<E: Exponent>(a: &[E], b: &[E]) -> Ordering {
    total_degree(a).cmp(&total_degree(b))
}

/// Compare the entries of `a` and `b` in `range` by their weighted degrees, one
/// weight row at a time. Every row has length `range.len()`. Ties are broken by
/// [NamedOrder::InvLex] on the range.
pub fn weighted_cmp<E: Exponent>(
    weights: &[Vec<i64>],
    a: &[E],
    b: &[E],
    range: Range<usize>,
) -> Ordering {
    check_same_rank(a, b);
    let (a, b) = (&a[range.clone()], &b[range]);
    for w in weights {
        let da = weighted_degree(w, a, 0..a.len());
        let db = weighted_degree(w, b, 0..b.len());
        match da.cmp(&db) {
            Ordering::Equal => {}
            o => return o,
        }
    }

    inv_lex(a, b)
}

/// A term order. The default is [NamedOrder::IGrLex].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum TermOrder {
    Named(NamedOrder),
    /// A non-empty weight matrix with rows of equal length.
    Weighted(Arc<Vec<Vec<i64>>>),
    /// Positions `[0, split)` are compared by `first`, ties are broken by the
    /// remaining positions compared by `second`.
    Split {
        split: usize,
        first: Arc<TermOrder>,
        second: Arc<TermOrder>,
    },
}

impl Default for TermOrder {
    fn default() -> Self {
        TermOrder::Named(NamedOrder::IGrLex)
    }
}

impl From<NamedOrder> for TermOrder {
    fn from(o: NamedOrder) -> Self {
        TermOrder::Named(o)
    }
}

impl TermOrder {
    pub fn from_code(code: u32) -> Result<TermOrder, AlgebraError> {
        Ok(TermOrder::Named(NamedOrder::from_code(code)?))
    }

    pub fn weighted(weights: Vec<Vec<i64>>) -> Result<TermOrder, AlgebraError> {
        if weights.is_empty() {
            return Err(AlgebraError::invalid_configuration("empty weight matrix"));
        }

        let len = weights[0].len();
        if len == 0 {
            return Err(AlgebraError::invalid_configuration("empty weight row"));
        }
        if weights.iter().any(|w| w.len() != len) {
            return Err(AlgebraError::invalid_configuration(
                "weight rows have different lengths",
            ));
        }

        Ok(TermOrder::Weighted(Arc::new(weights)))
    }

    pub fn split(
        split: usize,
        first: impl Into<TermOrder>,
        second: impl Into<TermOrder>,
    ) -> TermOrder {
        TermOrder::Split {
            split,
            first: Arc::new(first.into()),
            second: Arc::new(second.into()),
        }
    }

    /// Check that the order can compare exponent vectors of rank `rank`.
    pub fn check_rank(&self, rank: usize) -> Result<(), AlgebraError> {
        match self {
            TermOrder::Named(_) => Ok(()),
            TermOrder::Weighted(w) => {
                if w.iter().all(|r| r.len() == rank) {
                    Ok(())
                } else {
                    Err(AlgebraError::invalid_configuration(format!(
                        "weight rows of {} do not match rank {}",
                        self, rank
                    )))
                }
            }
            TermOrder::Split {
                split,
                first,
                second,
            } => {
                if *split > rank {
                    return Err(AlgebraError::invalid_configuration(format!(
                        "split {} exceeds rank {}",
                        split, rank
                    )));
                }
                first.check_rank(*split)?;
                second.check_rank(rank - split)
            }
        }
    }

    /// Returns `true` iff the order is a well-order compatible with multiplication.
    pub fn is_admissible(&self) -> bool {
        match self {
            TermOrder::Named(o) => o.is_admissible(),
            TermOrder::Weighted(w) => w.iter().flatten().all(|x| *x >= 0),
            TermOrder::Split { first, second, .. } => {
                first.is_admissible() && second.is_admissible()
            }
        }
    }

    /// Compare two exponent vectors. Panics if their ranks differ.
    pub fn cmp<E: Exponent>(&self, a: &[E], b: &[E]) -> Ordering {
        check_same_rank(a, b);
        match self {
            TermOrder::Named(o) => o.cmp(a, b),
            TermOrder::Weighted(w) => weighted_cmp(w, a, b, 0..a.len()),
            TermOrder::Split {
                split,
                first,
                second,
            } => first
                .cmp(&a[..*split], &b[..*split])
                .then_with(|| second.cmp(&a[*split..], &b[*split..])),
        }
    }

    /// A comparator that sorts terms from smallest to largest.
    pub fn ascending<E: Exponent>(&self) -> impl Fn(&[E], &[E]) -> Ordering + '_ {
        move |a, b| self.cmp(a, b)
    }

    /// A comparator that sorts terms from largest to smallest.
    pub fn descending<E: Exponent>(&self) -> impl Fn(&[E], &[E]) -> Ordering + '_ {
        move |a, b| self.cmp(b, a)
    }

    /// The order for a ring with `k` new leading variables.
    pub fn extend(&self, k: usize) -> TermOrder {
        if k == 0 {
            return self.clone();
        }

        let first = match self {
            TermOrder::Named(o) => TermOrder::Named(*o),
            _ => TermOrder::default(),
        };
        TermOrder::split(k, first, self.clone())
    }

    /// The order on the last `rank - k` variables.
    pub fn contract(&self, k: usize, rank: usize) -> TermOrder {
        if k == 0 {
            return self.clone();
        }

        match self {
            TermOrder::Named(o) => TermOrder::Named(*o),
            TermOrder::Weighted(w) => {
                TermOrder::Weighted(Arc::new(w.iter().map(|r| r[k..].to_vec()).collect()))
            }
            TermOrder::Split {
                split,
                first,
                second,
            } => match k.cmp(split) {
                Ordering::Equal => second.as_ref().clone(),
                Ordering::Less => TermOrder::Split {
                    split: split - k,
                    first: Arc::new(first.contract(k, *split)),
                    second: second.clone(),
                },
                Ordering::Greater => second.contract(k - split, rank - split),
            },
        }
    }

    /// The order on the first `k` variables.
    pub fn truncate(&self, k: usize, rank: usize) -> TermOrder {
        if k == rank {
            return self.clone();
        }

        match self {
            TermOrder::Named(o) => TermOrder::Named(*o),
            TermOrder::Weighted(w) => {
                TermOrder::Weighted(Arc::new(w.iter().map(|r| r[..k].to_vec()).collect()))
            }
            TermOrder::Split {
                split,
                first,
                second,
            } => match k.cmp(split) {
                Ordering::Equal => first.as_ref().clone(),
                Ordering::Less => first.truncate(k, *split),
                Ordering::Greater => TermOrder::Split {
                    split: *split,
                    first: first.clone(),
                    second: Arc::new(second.truncate(k - split, rank - split)),
                },
            },
        }
    }

    /// The orders of the outer and inner ring when the first `k` variables
    /// become the outer variables.
    pub fn split_at(&self, k: usize, rank: usize) -> (TermOrder, TermOrder) {
        (self.truncate(k, rank), self.contract(k, rank))
    }

    /// The order of the ring with reversed variables.
    ///
    /// A named order becomes the order that compares reversed vectors exactly as
    /// `self` compares the originals. Weight rows are reversed, which preserves the
    /// weighted degrees, but ties are still broken by [NamedOrder::InvLex] on the
    /// reversed vectors. Split blocks swap places, so the block that held the last
    /// variables is compared first.
    pub fn reverse(&self, rank: usize) -> TermOrder {
        match self {
            TermOrder::Named(o) => TermOrder::Named(o.reverse()),
            TermOrder::Weighted(w) => TermOrder::Weighted(Arc::new(
                w.iter().map(|r| r.iter().rev().cloned().collect()).collect(),
            )),
            TermOrder::Split {
                split,
                first,
                second,
            } => TermOrder::Split {
                split: rank - split,
                first: Arc::new(second.reverse(rank - split)),
                second: Arc::new(first.reverse(*split)),
            },
        }
    }
}

impl Display for TermOrder {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            TermOrder::Named(o) => o.fmt(f),
            TermOrder::Weighted(w) => {
                f.write_str("W(")?;
                for (i, r) in w.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{:?}", r)?;
                }
                f.write_str(")")
            }
            TermOrder::Split {
                split,
                first,
                second,
            } => write!(f, "S({},{},{})", split, first, second),
        }
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{NamedOrder, TermOrder};
    use crate::poly::ExpVector;

    fn orders() -> Vec<TermOrder> {
        let mut o: Vec<TermOrder> = NamedOrder::ALL.iter().map(|o| (*o).into()).collect();
        o.push(TermOrder::weighted(vec![vec![1, 2, 3, 4, 5], vec![1; 5]]).unwrap());
        o.push(TermOrder::split(2, NamedOrder::Lex, NamedOrder::IGrLex));
        o.push(TermOrder::split(
            3,
            TermOrder::weighted(vec![vec![2, 1, 1]]).unwrap(),
            NamedOrder::GrLex,
        ));
        o
    }

    #[test]
    fn codes() {
        for o in NamedOrder::ALL {
            assert_eq!(NamedOrder::from_code(o.code()), Ok(o));
        }
        assert!(NamedOrder::from_code(0).is_err());
        assert!(NamedOrder::from_code(9).is_err());
        assert_eq!(TermOrder::default(), NamedOrder::IGrLex.into());
    }

    #[test]
    fn named_semantics() {
        let a: ExpVector<u16> = vec![1, 0, 2].into();
        let b: ExpVector<u16> = vec![0, 3, 0].into();

        assert_eq!(NamedOrder::Lex.cmp(&a, &b), Ordering::Greater);
        assert_eq!(NamedOrder::InvLex.cmp(&a, &b), Ordering::Greater);
        assert_eq!(NamedOrder::RevLex.cmp(&a, &b), Ordering::Less);
        assert_eq!(NamedOrder::RevILex.cmp(&a, &b), Ordering::Less);
        assert_eq!(NamedOrder::GrLex.cmp(&a, &b), Ordering::Less);
        assert_eq!(NamedOrder::IGrLex.cmp(&a, &b), Ordering::Less);

        let c: ExpVector<u16> = vec![2, 1, 0].into();
        assert_eq!(NamedOrder::GrLex.cmp(&a, &c), Ordering::Less);
        assert_eq!(NamedOrder::IGrLex.cmp(&a, &c), Ordering::Greater);
        assert_eq!(NamedOrder::RevTDeg.cmp(&a, &c), Ordering::Less);
        assert_eq!(NamedOrder::RevITDeg.cmp(&a, &c), Ordering::Greater);
    }

    #[test]
    fn sum_is_greater() {
        let mut rng = StdRng::seed_from_u64(7);
        for o in orders().iter().filter(|o| o.is_admissible()) {
            o.check_rank(5).unwrap();
            for _ in 0..30 {
                let a = ExpVector::<u16>::random(&mut rng, 5, 10, 0.5);
                let b = ExpVector::<u16>::random(&mut rng, 5, 10, 0.5);
                let c = a.sum(&b);

                assert_eq!(o.cmp(&c, &c), Ordering::Equal);
                if !b.is_zero() {
                    assert_eq!(o.cmp(&c, &a), Ordering::Greater, "{}", o);
                    assert_eq!(o.cmp(&a, &c), Ordering::Less, "{}", o);
                }
                if !a.is_zero() {
                    assert_eq!(o.cmp(&c, &b), Ordering::Greater, "{}", o);
                }
                assert_eq!(
                    o.descending::<u16>()(&a[..], &b[..]),
                    o.ascending::<u16>()(&b[..], &a[..])
                );
            }
        }
    }

    #[test]
    fn invalid() {
        assert!(TermOrder::weighted(vec![]).is_err());
        assert!(TermOrder::weighted(vec![vec![]]).is_err());
        assert!(TermOrder::weighted(vec![vec![1, 2], vec![1]]).is_err());
        let w = TermOrder::weighted(vec![vec![1, 2]]).unwrap();
        assert!(w.check_rank(3).is_err());
        assert!(TermOrder::split(4, NamedOrder::Lex, NamedOrder::Lex)
            .check_rank(3)
            .is_err());
        assert!(!TermOrder::from(NamedOrder::RevLex).is_admissible());
        assert!(!TermOrder::weighted(vec![vec![1, -1]]).unwrap().is_admissible());
    }

    #[test]
    fn structure() {
        for o in orders() {
            assert_eq!(o.extend(2).contract(2, 7), o);
            assert_eq!(o.reverse(5).reverse(5), o);
            o.extend(2).check_rank(7).unwrap();
            o.reverse(5).check_rank(5).unwrap();
        }

        let o = TermOrder::split(2, NamedOrder::Lex, NamedOrder::IGrLex);
        assert_eq!(
            o.split_at(2, 5),
            (NamedOrder::Lex.into(), NamedOrder::IGrLex.into())
        );
        assert_eq!(format!("{}", o), "S(2,LEX,IGRLEX)");
    }

    #[test]
    #[should_panic(expected = "different rank")]
    fn rank_mismatch() {
        let a: ExpVector<u16> = vec![1].into();
        let b: ExpVector<u16> = vec![1, 5].into();
        let _ = TermOrder::from(NamedOrder::Lex).cmp(&a, &b);
    }

    #[test]
    fn rank_mismatch_in_every_order() {
        let a: ExpVector<u16> = vec![1, 0, 2, 0, 0].into();
        let b: ExpVector<u16> = vec![1, 0, 2, 0, 0, 3].into();
        for o in orders() {
            let r = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| o.cmp(&a, &b)));
            assert!(r.is_err(), "{}", o);
        }
    }

    #[test]
    fn reversed_weights() {
        let mut rng = StdRng::seed_from_u64(8);
        let w = vec![vec![1, 2, 3, 4, 5], vec![5, 1, 1, 1, 1]];
        let o = TermOrder::weighted(w.clone()).unwrap();
        let r = o.reverse(5);
        for _ in 0..30 {
            let a = ExpVector::<u16>::random(&mut rng, 5, 5, 0.7);
            let b = ExpVector::<u16>::random(&mut rng, 5, 5, 0.7);
            if a.weighted_degree(&w) != b.weighted_degree(&w) {
                assert_eq!(o.cmp(&a, &b), r.cmp(&a.reverse(), &b.reverse()));
            }
        }
    }

    #[test]
    fn reversed_comparison() {
        let mut rng = StdRng::seed_from_u64(5);
        for o in NamedOrder::ALL {
            let r = o.reverse();
            for _ in 0..20 {
                let a = ExpVector::<u16>::random(&mut rng, 4, 5, 0.7);
                let b = ExpVector::<u16>::random(&mut rng, 4, 5, 0.7);
                assert_eq!(o.cmp(&a, &b), r.cmp(&a.reverse(), &b.reverse()));
            }
        }
    }
}
