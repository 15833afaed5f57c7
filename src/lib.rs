//! `lineqpp`: a MetaPost-style linear-equation preprocessor for text
//! with embedded complex-linear equations.
//!
//! Module layout mirrors the component table: `complex`/`poly` are the
//! algebraic core (C1/C2), `eval`/`env`/`translate` are the evaluator,
//! solver, and translation table (C3/C4/C5), and `lexeme`/`lexer`/
//! `parser`/`scanner` are the external collaborators that turn raw
//! text into calls against that core (§6).

pub mod cli;
pub mod complex;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexeme;
pub mod lexer;
pub mod parser;
pub mod poly;
pub mod scanner;
pub mod span;
pub mod translate;

pub use config::SolverConfig;
pub use env::SolverState;
pub use error::{CoreError, SourceError};

/// Preprocess `input` (labelled `file` for diagnostics) in one shot,
/// with a fresh `SolverState`. The convenience entry point used by
/// integration tests and anything that doesn't need to keep solving
/// against an existing environment across calls.
pub fn preprocess(input: &str, file: &str, config: SolverConfig, debug: bool) -> Result<String, SourceError> {
    let mut state = SolverState::new(config);
    scanner::run(input, file, &mut state, debug)
}
