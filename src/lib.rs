//! Polyring is an exact arithmetic engine for multivariate polynomials over
//! generic coefficient rings.
//!
//! Coefficients live in a [Ring](domains::Ring), such as the integers, the rationals,
//! modular integers, complex numbers, quaternions, algebraic extensions or
//! polynomials themselves. The terms of a polynomial are kept sorted in a runtime
//! [TermOrder](poly::term_order::TermOrder), and solvable polynomial rings replace
//! the commutative multiplication by one defined through commutation relations.
//!
//! For example:
//!
//! ```
//! use polyring::domains::{rational::Q, Ring};
//! use polyring::poly::{polynomial::PolynomialRing, term_order::NamedOrder, Variable};
//!
//! let ring = PolynomialRing::<_, u16>::new(Q, Variable::list(&["x"]), NamedOrder::InvLex.into())
//!     .unwrap();
//! let x = ring.variable(0).unwrap();
//!
//! let a = &(&x * &x) + &ring.one();
//! let b = &x + &ring.one();
//! let (q, r) = a.divide_and_remainder(&b).unwrap();
//! assert_eq!(q, &x - &ring.one());
//! assert_eq!(r.to_string(), "2");
//! ```

pub mod domains;
pub mod error;
pub mod poly;
