//! Expression evaluator (spec §4.3 / component C3): a stack machine
//! whose operands are linear polynomials, fed by the parser's small set
//! of expression-builder entry points (`mk_num`, `mk_var`, …).
//!
//! The parser never builds an AST for equation-mode input; it drives
//! this stack machine directly, which is the natural Rust rendering of
//! "MetaPost-style incremental evaluation" — each operator reduces its
//! operands to a `LinearPoly` (via `poly.rs`) as soon as it is parsed.

use crate::complex::Complex;
use crate::env::{Builtin, Entry, SolverState};
use crate::error::CoreError;
use crate::poly::LinearPoly;

/// A value on the evaluator's stack: either a linear polynomial, or a
/// built-in function pushed by looking up its name (only valid directly
/// before `mk_app`).
#[derive(Clone, Debug, PartialEq)]
pub enum StackValue {
    Poly(LinearPoly),
    Fun(Builtin),
}

#[derive(Default)]
pub struct Evaluator {
    stack: Vec<StackValue>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the stack, abandoning whatever statement was in progress.
    /// Used both at `mk_cmd` (end of a well-formed statement) and by the
    /// parser's error-recovery path (spec §4.3: "on any error, the
    /// current statement is abandoned and the stack cleared").
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn mk_num(&mut self, x: Complex) {
        self.stack.push(StackValue::Poly(LinearPoly::constant(x)));
    }

    pub fn mk_var(&mut self, name: &str, state: &SolverState) {
        let value = match state.lookup(name) {
            Some(Entry::Poly(p)) => StackValue::Poly(p.clone()),
            Some(Entry::Fun(f)) => StackValue::Fun(*f),
            None => StackValue::Poly(LinearPoly::variable(name)),
        };
        self.stack.push(value);
    }

    pub fn mk_anon(&mut self, state: &mut SolverState) {
        let name = state.fresh_anon_name();
        self.stack.push(StackValue::Poly(LinearPoly::variable(name)));
    }

    /// Pop argument then function; apply if the argument is a number.
    pub fn mk_app(&mut self) -> Result<(), CoreError> {
        let arg = self.pop_poly()?;
        let func = self.pop()?;
        let f = match func {
            StackValue::Fun(f) => f,
            StackValue::Poly(p) => {
                return Err(CoreError::NotAFunction(
                    p.as_variable().unwrap_or("<expr>").to_string(),
                ))
            }
        };
        let c = arg.number().ok_or(CoreError::NonConstantArg)?;
        let result = f.apply(c)?;
        self.stack.push(StackValue::Poly(LinearPoly::constant(result)));
        Ok(())
    }

    /// `t[a,b] = a + re(t)*(b-a)`, pushed in source order `t, a, b`
    /// (so `b` is on top); pops `right` (b), `left` (a), `scale` (t).
    pub fn mk_med(&mut self) -> Result<(), CoreError> {
        let right = self.pop_poly()?;
        let left = self.pop_poly()?;
        let scale = self.pop_poly()?;
        let re_scale = re_part(&scale);
        let diff = right.sub(&left);
        let scaled = diff.mul(&re_scale)?;
        self.stack.push(StackValue::Poly(left.add(&scaled)));
        Ok(())
    }

    pub fn mk_add(&mut self) -> Result<(), CoreError> {
        self.binary(|lhs, rhs| Ok(lhs.add(rhs)))
    }

    pub fn mk_sub(&mut self) -> Result<(), CoreError> {
        self.binary(|lhs, rhs| Ok(lhs.sub(rhs)))
    }

    pub fn mk_mul(&mut self) -> Result<(), CoreError> {
        self.binary(LinearPoly::mul)
    }

    pub fn mk_div(&mut self) -> Result<(), CoreError> {
        self.binary(LinearPoly::div)
    }

    pub fn mk_pow(&mut self) -> Result<(), CoreError> {
        self.binary(LinearPoly::pow)
    }

    pub fn mk_neg(&mut self) -> Result<(), CoreError> {
        let p = self.pop_poly()?;
        self.stack.push(StackValue::Poly(p.neg()));
        Ok(())
    }

    /// Pop `right, left`; solve `left - right = 0`; push `right`
    /// reduced against the (now-updated) environment, so a chain
    /// `a = b = c` sees the latest dependency graph.
    pub fn mk_eq(&mut self, state: &mut SolverState, debug: bool) -> Result<LinearPoly, CoreError> {
        let right = self.pop_poly()?;
        let left = self.pop_poly()?;
        if debug {
            eprintln!("{} = {}", left.format_trace(), right.format_trace());
        }
        state.solve(&left.sub(&right), debug)?;
        let reduced = state.reduce(&right);
        self.stack.push(StackValue::Poly(reduced.clone()));
        Ok(reduced)
    }

    /// End of statement: clear the stack (mirrors `clear`, named
    /// separately because it's driven by the parser hitting `;`/EOF
    /// rather than by error recovery).
    pub fn mk_cmd(&mut self) {
        self.clear();
    }

    fn binary(
        &mut self,
        op: impl FnOnce(&LinearPoly, &LinearPoly) -> Result<LinearPoly, CoreError>,
    ) -> Result<(), CoreError> {
        let rhs = self.pop_poly()?;
        let lhs = self.pop_poly()?;
        self.stack.push(StackValue::Poly(op(&lhs, &rhs)?));
        Ok(())
    }

    fn pop(&mut self) -> Result<StackValue, CoreError> {
        self.stack
            .pop()
            .ok_or_else(|| CoreError::ParseError("expression stack underflow".to_string()))
    }

    fn pop_poly(&mut self) -> Result<LinearPoly, CoreError> {
        match self.pop()? {
            StackValue::Poly(p) => Ok(p),
            StackValue::Fun(_) => Err(CoreError::ParseError(
                "expected a value, found a bare function name".to_string(),
            )),
        }
    }
}

/// The polynomial obtained by discarding the imaginary part of every
/// coefficient of `p` (spec §4.3's mediation rule uses only `re(scale)`,
/// not `scale` collapsed to a number) — preserves `p`'s variable terms
/// instead of flattening an unresolved scale to the constant `0`.
fn re_part(p: &LinearPoly) -> LinearPoly {
    LinearPoly {
        constant: Complex::real(p.constant.re),
        terms: p
            .terms
            .iter()
            .map(|(name, coeff)| (name.clone(), Complex::real(coeff.re)))
            .collect(),
    }
}
