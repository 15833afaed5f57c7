//! Solver / environment (spec §4.4 / component C4): the global map from
//! variable name to either a defining polynomial or a built-in function,
//! and the incremental Gauss-style elimination that keeps it reduced.
//!
//! Per spec §9's explicit redesign note, this is an explicit `SolverState`
//! value threaded through the scanner and parser rather than a process
//! singleton — the only two mutation sites are `SolverState::solve`
//! (the environment) and the calls into `self.translation` it makes
//! along the way (the translation table).

use std::collections::BTreeMap;

use crate::complex::Complex;
use crate::config::SolverConfig;
use crate::error::CoreError;
use crate::poly::LinearPoly;
use crate::translate::TranslationTable;

/// Built-in pure functions, seeded into the environment at startup.
/// Declared as a tagged enum (spec §9: "in a language without
/// first-class reflective name lookup, declare `Fun` as a tagged variant
/// referencing a built-in function identifier").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Exp,
    Log,
    Cos,
    Sin,
    Rad,
    Deg,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Abs,
        Builtin::Exp,
        Builtin::Log,
        Builtin::Cos,
        Builtin::Sin,
        Builtin::Rad,
        Builtin::Deg,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Exp => "exp",
            Builtin::Log => "log",
            Builtin::Cos => "cos",
            Builtin::Sin => "sin",
            Builtin::Rad => "rad",
            Builtin::Deg => "deg",
        }
    }

    pub fn apply(self, arg: Complex) -> Result<Complex, CoreError> {
        match self {
            Builtin::Abs => Ok(arg.abs()),
            Builtin::Exp => Ok(arg.exp()),
            Builtin::Log => Ok(arg.log()),
            Builtin::Cos => Ok(arg.cos()),
            Builtin::Sin => Ok(arg.sin()),
            Builtin::Rad => arg.rad(),
            Builtin::Deg => arg.deg(),
        }
    }
}

/// Environment entry (spec §3): a dependent variable's definition, or a
/// built-in function descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Poly(LinearPoly),
    Fun(Builtin),
}

/// Everything that lives for one run: the environment, the translation
/// table, the anonymous-name counter, and the tunable config.
pub struct SolverState {
    env: BTreeMap<String, Entry>,
    pub translation: TranslationTable,
    pub config: SolverConfig,
    anon_counter: u64,
}

impl SolverState {
    pub fn new(config: SolverConfig) -> Self {
        let mut env = BTreeMap::new();
        env.insert("i".to_string(), Entry::Poly(LinearPoly::constant(Complex::I)));
        env.insert(
            "pi".to_string(),
            Entry::Poly(LinearPoly::constant(Complex::real(std::f64::consts::PI))),
        );
        for b in Builtin::ALL {
            env.insert(b.name().to_string(), Entry::Fun(b));
        }
        Self {
            env,
            translation: TranslationTable::new(),
            config,
            anon_counter: 0,
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Entry> {
        self.env.get(name)
    }

    /// Fresh synthetic name for an anonymous variable (`?` in the
    /// equation grammar). Monotonic for the life of the process, never
    /// recycled; generated names start with a digit so they can never
    /// collide with a user identifier (spec §9).
    pub fn fresh_anon_name(&mut self) -> String {
        let name = format!("{}z", self.anon_counter);
        self.anon_counter += 1;
        name
    }

    /// Solve `p = 0`: pivot, eliminate, and propagate through every
    /// dependent entry (spec §4.4). `debug` enables the §6 trace format.
    pub fn solve(&mut self, p: &LinearPoly, debug: bool) -> Result<(), CoreError> {
        let p = p.simplify();

        if let Some(c) = p.number() {
            return if c.is_zero() {
                Err(CoreError::RedundantEquation)
            } else {
                Err(CoreError::InconsistentEquation)
            };
        }

        let (pivot_name, pivot_coeff) = select_pivot(&p);

        let mut reduced = p.clone();
        reduced.terms.remove(&pivot_name);
        let neg_recip = Complex::ONE.div(pivot_coeff.neg())?;
        let q = reduced.scale(neg_recip).simplify();

        let names: Vec<String> = self.env.keys().cloned().collect();
        for name in names {
            if let Some(Entry::Poly(def)) = self.env.get(&name) {
                let new_def = def.subst(&pivot_name, &q);
                if &new_def != def {
                    if debug {
                        eprintln!("{} is {}", name, new_def.format_trace());
                    }
                    if let Some(c) = new_def.number() {
                        self.translation.record(&name, c, &self.config);
                    }
                    self.env.insert(name, Entry::Poly(new_def));
                }
            }
        }

        if let Some(c) = q.number() {
            self.translation.record(&pivot_name, c, &self.config);
        }
        self.env.insert(pivot_name, Entry::Poly(q));
        Ok(())
    }

    /// Substitute every currently-dependent variable named in `p`'s terms
    /// with its definition. One pass over `p`'s original term names is
    /// enough: the environment's substitution-closure invariant guarantees
    /// a dependent variable's own definition never names another dependent
    /// variable, so freshly-introduced names are always independent.
    pub fn reduce(&self, p: &LinearPoly) -> LinearPoly {
        let names: Vec<String> = p.terms.keys().cloned().collect();
        let mut result = p.clone();
        for name in names {
            if let Some(Entry::Poly(def)) = self.env.get(&name) {
                result = result.subst(&name, def);
            }
        }
        result
    }
}

/// Entry with the largest-magnitude coefficient, ties broken by the
/// lexicographically smallest name (spec §4.4: "ties broken arbitrarily
/// — deterministically by name is acceptable"). `p` must not be a
/// number (checked by the caller).
fn select_pivot(p: &LinearPoly) -> (String, Complex) {
    let mut best: Option<(&String, Complex)> = None;
    for (name, coeff) in &p.terms {
        let better = match best {
            None => true,
            Some((_, k)) => coeff.mag() > k.mag(),
        };
        if better {
            best = Some((name, *coeff));
        }
    }
    let (name, coeff) = best.expect("solve() only calls select_pivot on a non-number polynomial");
    (name.clone(), coeff)
}
