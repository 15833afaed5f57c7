//! Property tests for the five universal invariants of spec §8, run
//! against the public crate surface (`LinearPoly`, `SolverState`,
//! `scanner::run`) rather than ad-hoc fixtures.

use std::collections::BTreeMap;

use proptest::prelude::*;

use lineqpp::complex::Complex;
use lineqpp::config::SolverConfig;
use lineqpp::env::{Entry, SolverState};
use lineqpp::poly::LinearPoly;
use lineqpp::scanner;

/// A coefficient bounded away from zero by at least 0.5, so pivoting
/// and is-zero checks never land near the `τ = 1e-6` tolerance band.
fn coeff() -> impl Strategy<Value = f64> {
    (-10.0f64..10.0f64).prop_map(|x| if x.abs() < 0.5 { x + 1.0 } else { x })
}

fn signed_lit(x: f64) -> String {
    if x < 0.0 {
        format!("-{}", -x)
    } else {
        format!("{x}")
    }
}

fn arb_poly(names: &'static [&'static str]) -> impl Strategy<Value = LinearPoly> {
    (
        coeff(),
        coeff(),
        proptest::collection::vec((0..names.len(), coeff(), coeff()), 0..=names.len()),
    )
        .prop_map(move |(cre, cim, terms)| {
            let mut map = BTreeMap::new();
            for (idx, re, im) in terms {
                map.insert(names[idx].to_string(), Complex::new(re, im));
            }
            LinearPoly {
                constant: Complex::new(cre, cim),
                terms: map,
            }
        })
}

proptest! {
    /// Property 2: `simplify(simplify(p)) == simplify(p)` exactly.
    #[test]
    fn simplify_is_idempotent(p in arb_poly(&["a", "b", "c"])) {
        let once = p.simplify();
        let twice = once.simplify();
        prop_assert_eq!(once, twice);
    }

    /// Property 4: after `solve`, the pivot variable never appears on
    /// the right-hand side of any dependent definition, and appears
    /// exactly once as an environment key.
    #[test]
    fn pivot_preservation(ka in coeff(), kb in coeff(), kc in coeff()) {
        let mut state = SolverState::new(SolverConfig::default());
        let a_term = LinearPoly::variable("a")
            .mul(&LinearPoly::constant(Complex::real(ka)))
            .unwrap();
        let b_term = LinearPoly::variable("b")
            .mul(&LinearPoly::constant(Complex::real(kb)))
            .unwrap();
        let p = a_term.add(&b_term).add(&LinearPoly::constant(Complex::real(kc)));

        state.solve(&p, false).unwrap();

        let pivoted: Vec<&str> = ["a", "b"]
            .into_iter()
            .filter(|name| state.lookup(name).is_some())
            .collect();
        prop_assert_eq!(pivoted.len(), 1, "exactly one of a/b should become the pivot");

        for name in pivoted {
            if let Some(Entry::Poly(def)) = state.lookup(name) {
                prop_assert!(!def.terms.contains_key(name));
            }
        }
    }

    /// Property 1: substitution closure. `a + b = K1 ; a - b = K2 ;`
    /// pivots `a` to a definition in terms of `b` on the first
    /// equation, then the second equation pins `b` to a constant and
    /// forces a real cascading rewrite of `a`'s definition — unlike a
    /// chain where every right-hand side is already constant by the
    /// time it's referenced, this exercises `subst`'s propagation path
    /// for real. No dependent definition's right-hand side should name
    /// a variable that is itself dependent once both equations land.
    #[test]
    fn substitution_closure(k1 in coeff(), k2 in coeff()) {
        let src = format!(
            "#lineqpp a + b = {} ; a - b = {} ;\n",
            signed_lit(k1),
            signed_lit(k2),
        );
        let mut state = SolverState::new(SolverConfig::default());
        scanner::run(&src, "prop.svg", &mut state, false).unwrap();

        for name in ["a", "b"] {
            if let Some(Entry::Poly(def)) = state.lookup(name) {
                for dep_name in def.terms.keys() {
                    prop_assert!(
                        !matches!(state.lookup(dep_name), Some(Entry::Poly(_))),
                        "{name}'s definition still references dependent variable {dep_name}",
                    );
                }
            }
        }
    }

    /// Property 3 (restricted to independent equations): feeding two
    /// unrelated constant equations in either order yields the same
    /// final translation-table entries for both variables.
    #[test]
    fn independent_equations_commute(k1 in coeff(), k2 in coeff()) {
        let eq_x = format!("x = {} ;", signed_lit(k1));
        let eq_y = format!("y = {} ;", signed_lit(k2));

        let mut forward = SolverState::new(SolverConfig::default());
        scanner::run(&format!("#lineqpp {eq_x} {eq_y}\n"), "prop.svg", &mut forward, false).unwrap();

        let mut backward = SolverState::new(SolverConfig::default());
        scanner::run(&format!("#lineqpp {eq_y} {eq_x}\n"), "prop.svg", &mut backward, false).unwrap();

        prop_assert_eq!(forward.translation.get("x#r"), backward.translation.get("x#r"));
        prop_assert_eq!(forward.translation.get("x#i"), backward.translation.get("x#i"));
        prop_assert_eq!(forward.translation.get("y#r"), backward.translation.get("y#r"));
        prop_assert_eq!(forward.translation.get("y#i"), backward.translation.get("y#i"));
    }

    /// Property 5: `v = k` populates both `v#r` and `v#i` with `k`'s
    /// formatted real and imaginary parts.
    #[test]
    fn round_trip_for_constant_equations(re_cents in -500i32..500, im_cents in -500i32..500) {
        let re = re_cents as f64 / 100.0;
        let im = im_cents as f64 / 100.0;
        let src = format!(
            "#lineqpp v = {} + {} * i ;\n",
            signed_lit(re),
            signed_lit(im),
        );
        let mut state = SolverState::new(SolverConfig::default());
        scanner::run(&src, "prop.svg", &mut state, false).unwrap();

        prop_assert_eq!(state.translation.get("v#r"), Some(format!("{re:.4}")).as_deref());
        prop_assert_eq!(state.translation.get("v#i"), Some(format!("{im:.4}")).as_deref());
    }
}
