//! Error kinds for the equation core and the source-level wrapper used
//! for diagnostics (spec §7).

use std::fmt;

/// The fixed set of ways the equation core can fail.
///
/// Kept as a plain enum with a manual `Display` impl rather than pulled
/// through `thiserror`/`anyhow`: each variant corresponds to exactly one
/// row of the error table, and the messages are simple enough that a
/// derive buys nothing.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CoreError {
    /// Malformed equation input (raised by the parser, not the core).
    ParseError(String),
    /// Product or quotient of two non-constant polynomials.
    NonLinear,
    /// Divisor is (near-)zero.
    DivByZero,
    /// Function application argument did not reduce to a number.
    NonConstantArg,
    /// Identifier in function position does not name a built-in.
    NotAFunction(String),
    /// Real-only operation (`rad`, `deg`, `pow`) applied to complex input.
    DomainError(String),
    /// Equation reduced to `0 = 0`.
    RedundantEquation,
    /// Equation reduced to `c = 0` for `c != 0`.
    InconsistentEquation,
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::ParseError(msg) => write!(f, "{msg}"),
            CoreError::NonLinear => write!(
                f,
                "non-linear: product or quotient of two non-constant polynomials"
            ),
            CoreError::DivByZero => write!(f, "division by zero"),
            CoreError::NonConstantArg => {
                write!(f, "function applied to a non-constant argument")
            }
            CoreError::NotAFunction(name) => write!(f, "'{name}' is not a function"),
            CoreError::DomainError(msg) => write!(f, "{msg}"),
            CoreError::RedundantEquation => write!(f, "redundant equation (0 = 0)"),
            CoreError::InconsistentEquation => write!(f, "inconsistent equation"),
        }
    }
}

impl std::error::Error for CoreError {}

/// A `CoreError` located in the input stream, in the shape spec §7
/// requires for reporting: `"{file}:{lineno}: {message} at token {lexeme}"`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub file: String,
    pub lineno: u32,
    pub lexeme: String,
    pub kind: CoreError,
}

impl SourceError {
    pub fn new(file: impl Into<String>, lineno: u32, lexeme: impl Into<String>, kind: CoreError) -> Self {
        Self {
            file: file.into(),
            lineno,
            lexeme: lexeme.into(),
            kind,
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} at token {}",
            self.file, self.lineno, self.kind, self.lexeme
        )
    }
}

impl std::error::Error for SourceError {}

/// A `CoreError` located at a byte offset within one equation-mode block,
/// as produced by the lexer/parser before the scanner knows which file
/// line that offset falls on.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedError {
    pub offset: u32,
    pub lexeme: String,
    pub kind: CoreError,
}

impl LocatedError {
    pub fn new(offset: u32, lexeme: impl Into<String>, kind: CoreError) -> Self {
        Self {
            offset,
            lexeme: lexeme.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_spec_shape() {
        let e = SourceError::new("a.svg", 3, "x", CoreError::RedundantEquation);
        assert_eq!(e.to_string(), "a.svg:3: redundant equation (0 = 0) at token x");
    }

    #[test]
    fn not_a_function_names_the_identifier() {
        let e = CoreError::NotAFunction("foo".to_string());
        assert_eq!(e.to_string(), "'foo' is not a function");
    }
}
