use rand::{rngs::StdRng, SeedableRng};

use polyring::{
    domains::{
        algebraic_number::AlgebraicExtension,
        integer::Z,
        integer_mod::IntegerMod,
        rational::{RationalField, Q},
        Ring,
    },
    poly::{
        polynomial::{MultivariatePolynomial, PolynomialRing},
        reconstruct::{distribute, evaluate_main, recursive},
        relation_table::RelationTable,
        solvable::SolvablePolynomialRing,
        term_order::{NamedOrder, TermOrder},
        ExpVector, Variable,
    },
};

fn orders() -> Vec<TermOrder> {
    let mut orders: Vec<TermOrder> = NamedOrder::ALL.iter().map(|o| (*o).into()).collect();
    orders.push(TermOrder::weighted(vec![vec![1, 2, 3], vec![0, 0, 1]]).unwrap());
    orders.push(TermOrder::split(1, NamedOrder::Lex, NamedOrder::GrLex));
    orders.push(TermOrder::split(
        2,
        TermOrder::weighted(vec![vec![2, 1]]).unwrap(),
        NamedOrder::RevTDeg,
    ));
    orders
}

fn ring(order: TermOrder) -> PolynomialRing<RationalField> {
    PolynomialRing::new(Q, Variable::list(&["x", "y", "z"]), order).unwrap()
}

fn random(
    ring: &PolynomialRing<RationalField>,
    rng: &mut StdRng,
) -> MultivariatePolynomial<RationalField> {
    ring.random(rng, 6, 4, 0.7, (-10, 10))
}

#[test]
fn additive_group() {
    let mut rng = StdRng::seed_from_u64(1);
    for o in orders() {
        let r = ring(o);
        for _ in 0..10 {
            let a = random(&r, &mut rng);
            let b = random(&r, &mut rng);

            a.check_consistency();
            assert_eq!(&(&a + &b) - &b, a);
            assert_eq!(&a + &b, &b + &a);
            assert!((&a - &a).is_zero());
            assert_eq!(-(-a.clone()), a);
        }
    }
}

#[test]
fn multiplication() {
    let mut rng = StdRng::seed_from_u64(2);
    for o in orders() {
        let r = ring(o);
        for _ in 0..8 {
            let a = random(&r, &mut rng);
            let b = random(&r, &mut rng);
            let c = random(&r, &mut rng);

            let ab = &a * &b;
            ab.check_consistency();
            assert_eq!(ab, &b * &a);
            assert_eq!(&ab * &c, &a * &(&b * &c));
            assert_eq!(&a * &(&b + &c), &ab + &(&a * &c));
            assert_eq!(&a * &r.one(), a);
        }
    }
}

#[test]
fn division() {
    let mut rng = StdRng::seed_from_u64(3);
    for o in orders().into_iter().filter(|o| o.is_admissible()) {
        let r = ring(o);
        for _ in 0..8 {
            let a = random(&r, &mut rng);
            let b = r.random(&mut rng, 3, 3, 0.7, (-10, 10));
            if b.is_zero() {
                continue;
            }

            let (q, rem) = a.divide_and_remainder(&b).unwrap();
            assert_eq!(&(&q * &b) + &rem, a);

            let lead = b.leading_exp_vector().unwrap();
            assert!(rem.into_iter().all(|t| !t.exp_vector().multiple_of(&lead)));
            assert_eq!((&a * &b).div_exact(&b), Ok(a.clone()));
        }
    }
}

#[test]
fn gcd_and_bezout() {
    let mut rng = StdRng::seed_from_u64(4);
    let f = IntegerMod::new(101.into()).unwrap();
    let r = PolynomialRing::<_, u16>::new(f, Variable::list(&["t"]), NamedOrder::InvLex.into())
        .unwrap();

    for _ in 0..10 {
        let a = r.random(&mut rng, 5, 6, 1.0, (0, 100));
        let b = r.random(&mut rng, 5, 6, 1.0, (0, 100));
        let (g, s, t) = a.egcd(&b).unwrap();

        assert_eq!(&(&a * &s) + &(&b * &t), g);
        if !g.is_zero() {
            assert!(a.rem(&g).unwrap().is_zero());
            assert!(b.rem(&g).unwrap().is_zero());
        }
    }
}

#[test]
fn structural_round_trips() {
    let mut rng = StdRng::seed_from_u64(5);
    for o in orders() {
        let r = ring(o);
        for _ in 0..5 {
            let p = random(&r, &mut rng);

            assert_eq!(p.reverse().reverse(), p);

            let er = r.extend(2);
            let mut parts = p.extend(&er, 1, 3).unwrap().contract(2);
            assert_eq!(parts.len(), usize::from(!p.is_zero()));
            if let Some(q) = parts.remove(&ExpVector::from(vec![0, 3])) {
                assert_eq!(q, p);
                assert_eq!(q.poly_ring(), r);
            }

            for k in 0..=3 {
                let rr = r.recursive(k);
                let rp = recursive(&rr, &p).unwrap();
                assert_eq!(distribute(&r, &rp).unwrap(), p);
            }
        }
    }
}

#[test]
fn evaluation_homomorphism() {
    let mut rng = StdRng::seed_from_u64(6);
    let r = ring(NamedOrder::GrLex.into());
    let v = Q.to_element(-3, 4);

    for _ in 0..8 {
        let a = random(&r, &mut rng);
        let b = random(&r, &mut rng);
        for var in 0..3 {
            let (ea, eb) = (a.evaluate_var(var, &v), b.evaluate_var(var, &v));
            assert_eq!((&a * &b).evaluate_var(var, &v), &ea * &eb);
            assert_eq!((&a + &b).evaluate_var(var, &v), &ea + &eb);
        }
    }

    let u = PolynomialRing::<_, u16>::new(Z, Variable::list(&["x"]), NamedOrder::InvLex.into())
        .unwrap();
    for _ in 0..8 {
        let a = u.random(&mut rng, 4, 6, 1.0, (-9, 9));
        let b = u.random(&mut rng, 4, 6, 1.0, (-9, 9));
        let p = 7.into();
        assert_eq!(
            evaluate_main(&(&a * &b), &p).unwrap(),
            Z.mul(&evaluate_main(&a, &p).unwrap(), &evaluate_main(&b, &p).unwrap())
        );
    }
}

#[test]
fn weyl_laws() {
    let mut rng = StdRng::seed_from_u64(7);
    let r = PolynomialRing::<_, u16>::new(
        Q,
        Variable::list(&["p", "q", "x", "y"]),
        NamedOrder::IGrLex.into(),
    )
    .unwrap();

    // two commuting Weyl pairs (p, x) and (q, y)
    let mut table = RelationTable::new(&r);
    for (a, b) in [(0, 2), (1, 3)] {
        let va = r.variable(a).unwrap();
        let vb = r.variable(b).unwrap();
        table
            .update(
                ExpVector::unit(4, b, 1),
                ExpVector::unit(4, a, 1),
                &(&va * &vb) + &r.one(),
            )
            .unwrap();
    }
    let w = SolvablePolynomialRing::new(r.clone(), table).unwrap();

    for _ in 0..5 {
        let a = r.random(&mut rng, 3, 3, 0.6, (-5, 5));
        let b = r.random(&mut rng, 3, 3, 0.6, (-5, 5));
        let c = r.random(&mut rng, 3, 3, 0.6, (-5, 5));

        assert_eq!(w.mul(&w.mul(&a, &b), &c), w.mul(&a, &w.mul(&b, &c)));
        assert_eq!(w.mul(&w.add(&a, &b), &c), w.add(&w.mul(&a, &c), &w.mul(&b, &c)));
    }

    let x = r.variable(2).unwrap();
    let p = r.variable(0).unwrap();
    assert_eq!(w.sub(&w.mul(&p, &x), &w.mul(&x, &p)), w.neg(&w.one()));
}

#[test]
fn algebraic_chinese_remainder() {
    let mut rng = StdRng::seed_from_u64(8);
    let f = IntegerMod::new(31.into()).unwrap();
    let r = PolynomialRing::<_, u16>::new(f.clone(), Variable::list(&["a"]), NamedOrder::InvLex.into())
        .unwrap();
    let a = r.variable(0).unwrap();

    let m0 = &(&a * &a) + &r.one();
    let m1 = &(&(&a * &a) * &a) - &r.constant(f.nth(&2.into()));
    let ring0 = AlgebraicExtension::new(m0.clone(), false).unwrap();
    let ring1 = AlgebraicExtension::new(m1, false).unwrap();
    let ring01 = ring0.product(&ring1).unwrap();
    let ci = ring1.try_inv(&ring1.to_element(m0).unwrap()).unwrap();

    for _ in 0..10 {
        let p = ring01.sample(&mut rng, (0, 30));
        let c = ring0.to_element(p.poly().clone()).unwrap();
        let b = ring1.to_element(p.poly().clone()).unwrap();

        assert_eq!(ring01.chinese_remainder(&ring0, &c, &ci, &ring1, &b), p);
    }
}
