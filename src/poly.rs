//! Linear polynomials over complex coefficients (spec §4.2 / component C2).
//!
//! A `LinearPoly` is `constant + Σ coeff_i * var_i`. Arithmetic mirrors
//! `Complex`'s inherent-method style (`add/sub/neg/mul/div/pow`), but
//! `mul`/`div`/`pow` are partial: the spec restricts this type to linear
//! closure, so any operation that would produce a variable-times-variable
//! term fails with `NonLinear` instead of being expressible.

use std::collections::BTreeMap;
use std::fmt;

use crate::complex::Complex;
use crate::error::CoreError;

#[derive(Clone, Debug, PartialEq)]
pub struct LinearPoly {
    pub constant: Complex,
    pub terms: BTreeMap<String, Complex>,
}

impl LinearPoly {
    pub fn constant(c: Complex) -> Self {
        Self {
            constant: c,
            terms: BTreeMap::new(),
        }
    }

    /// The bare polynomial `0 + 1*name`.
    pub fn variable(name: impl Into<String>) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(name.into(), Complex::ONE);
        Self {
            constant: Complex::ZERO,
            terms,
        }
    }

    pub fn add(&self, other: &LinearPoly) -> LinearPoly {
        let mut terms = self.terms.clone();
        for (name, coeff) in &other.terms {
            let entry = terms.entry(name.clone()).or_insert(Complex::ZERO);
            *entry = entry.add(*coeff);
        }
        LinearPoly {
            constant: self.constant.add(other.constant),
            terms,
        }
    }

    pub fn sub(&self, other: &LinearPoly) -> LinearPoly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> LinearPoly {
        self.scale(Complex::new(-1.0, 0.0))
    }

    /// Scale every coefficient (including the constant) by `k`. Internal
    /// helper — unlike `mul`, it doesn't check for linearity, because the
    /// caller already knows `k` is a scalar (used by `subst` and by `mul`
    /// itself once the number operand has been identified).
    pub(crate) fn scale(&self, k: Complex) -> LinearPoly {
        let mut terms = BTreeMap::new();
        for (name, coeff) in &self.terms {
            terms.insert(name.clone(), k.mul(*coeff));
        }
        LinearPoly {
            constant: k.mul(self.constant),
            terms,
        }
    }

    /// Fails with `NonLinear` unless at least one operand is a number.
    pub fn mul(&self, other: &LinearPoly) -> Result<LinearPoly, CoreError> {
        if let Some(k) = self.number() {
            Ok(other.scale(k))
        } else if let Some(k) = other.number() {
            Ok(self.scale(k))
        } else {
            Err(CoreError::NonLinear)
        }
    }

    /// Fails with `NonLinear` unless `other` is a number.
    pub fn div(&self, other: &LinearPoly) -> Result<LinearPoly, CoreError> {
        let q = other.number().ok_or(CoreError::NonLinear)?;
        let recip = Complex::ONE.div(q)?;
        Ok(self.scale(recip))
    }

    /// Fails unless both operands are numbers.
    pub fn pow(&self, other: &LinearPoly) -> Result<LinearPoly, CoreError> {
        let base = self.number().ok_or(CoreError::NonLinear)?;
        let exp = other.number().ok_or(CoreError::NonLinear)?;
        Ok(LinearPoly::constant(base.pow(exp)?))
    }

    /// Drop entries whose coefficient is ≈0; snap the constant term.
    /// Exactly idempotent: `simplify(simplify(p)) == simplify(p)`.
    pub fn simplify(&self) -> LinearPoly {
        let mut terms = BTreeMap::new();
        for (name, coeff) in &self.terms {
            if !coeff.is_zero() {
                terms.insert(name.clone(), *coeff);
            }
        }
        let constant = Complex::new(Complex::snap(self.constant.re), Complex::snap(self.constant.im));
        LinearPoly { constant, terms }
    }

    /// `Some(c)` iff this (already-simplified) polynomial has no terms.
    pub fn number(&self) -> Option<Complex> {
        if self.terms.is_empty() {
            Some(self.constant)
        } else {
            None
        }
    }

    /// `Some(name)` iff this is `0 + 1*name` for a single `name`.
    pub fn as_variable(&self) -> Option<&str> {
        if !self.constant.is_zero() || self.terms.len() != 1 {
            return None;
        }
        let (name, coeff) = self.terms.iter().next().expect("len checked above");
        coeff.is_one().then(|| name.as_str())
    }

    /// Substitute `replacement` for `var` in `self`. Leaves `self`
    /// unchanged (a clone) if `var` does not appear. The result is always
    /// simplified, since substitution is how constants are discovered.
    pub fn subst(&self, var: &str, replacement: &LinearPoly) -> LinearPoly {
        match self.terms.get(var) {
            None => self.clone(),
            Some(&k) => {
                let mut reduced = self.clone();
                reduced.terms.remove(var);
                reduced.add(&replacement.scale(k)).simplify()
            }
        }
    }

    /// Render in the §6 debug-trace convention: variables in
    /// lexicographic order (free, since `terms` is a `BTreeMap`),
    /// coefficient-one terms as `" + v"`, other coefficients as
    /// `"({z})*v"` when `{z}`'s own display has multiple parts.
    pub fn format_trace(&self) -> String {
        let mut out = String::new();
        let mut first = true;

        if !self.constant.is_zero() || self.terms.is_empty() {
            out.push_str(&self.constant.to_string());
            first = false;
        }

        for (name, coeff) in &self.terms {
            let piece = if coeff.is_one() {
                name.clone()
            } else {
                let cs = coeff.to_string();
                if cs.contains(' ') {
                    format!("({cs})*{name}")
                } else {
                    format!("{cs}*{name}")
                }
            };
            if first {
                out.push_str(&piece);
                first = false;
            } else {
                out.push_str(" + ");
                out.push_str(&piece);
            }
        }

        out
    }
}

impl fmt::Display for LinearPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_trace())
    }
}
