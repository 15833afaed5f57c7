//! Equation-mode parser (spec §6 grammar), Pratt-parsed by binding power
//! rather than built as an AST: every production drives the stack
//! machine in `eval.rs` directly, pushing and popping `LinearPoly`
//! values as it goes (spec §2's "parser calls a small set of expression
//! builder entry points").
//!
//! Operator precedence (lowest to highest): `+ -` < `* /` < unary `-` <
//! `^` (right-assoc). Function application (`ID prim`) and mediation
//! (`prim '[' exp ',' exp ']'`) bind tighter than any of the above —
//! they are part of `prim`, not `exp`.

use crate::complex::Complex;
use crate::env::SolverState;
use crate::error::{CoreError, LocatedError};
use crate::eval::Evaluator;
use crate::lexeme::Lexeme;
use crate::lexer::Lexer;

const UNARY_OPERAND_BP: u8 = 4;

enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

pub fn parse_program(
    text: &str,
    ev: &mut Evaluator,
    state: &mut SolverState,
    debug: bool,
) -> Result<(), LocatedError> {
    let tokens = Lexer::new(text).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        last_offset: 0,
        last_lexeme: String::new(),
    };
    parser.parse_start(ev, state, debug)
}

struct Parser {
    tokens: Vec<crate::span::Spanned<Lexeme>>,
    pos: usize,
    last_offset: u32,
    last_lexeme: String,
}

impl Parser {
    fn peek_kind(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn peek_kind_at(&self, ahead: usize) -> &Lexeme {
        self.tokens
            .get(self.pos + ahead)
            .map(|t| &t.node)
            .unwrap_or(&Lexeme::Eof)
    }

    fn advance(&mut self) -> Lexeme {
        let tok = self.tokens[self.pos].clone();
        self.last_offset = tok.span.start;
        self.last_lexeme = tok.node.to_string();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok.node
    }

    fn expect(&mut self, want: Lexeme) -> Result<(), LocatedError> {
        if *self.peek_kind() == want {
            self.advance();
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{want}'")))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> LocatedError {
        let tok = &self.tokens[self.pos];
        LocatedError::new(
            tok.span.start,
            tok.node.to_string(),
            CoreError::ParseError(message.into()),
        )
    }

    fn wrap(&self, kind: CoreError) -> LocatedError {
        LocatedError::new(self.last_offset, self.last_lexeme.clone(), kind)
    }

    fn starts_exp(kind: &Lexeme) -> bool {
        matches!(
            kind,
            Lexeme::Number(_) | Lexeme::Ident(_) | Lexeme::LParen | Lexeme::Question | Lexeme::Minus
        )
    }

    fn starts_prim(&self) -> bool {
        matches!(
            self.peek_kind(),
            Lexeme::Number(_) | Lexeme::Ident(_) | Lexeme::LParen | Lexeme::Question
        )
    }

    fn parse_start(&mut self, ev: &mut Evaluator, state: &mut SolverState, debug: bool) -> Result<(), LocatedError> {
        if matches!(self.peek_kind(), Lexeme::Eof) {
            return Ok(());
        }
        self.parse_cmds(ev, state, debug)?;
        if matches!(self.peek_kind(), Lexeme::Semicolon) {
            self.advance();
        }
        self.expect(Lexeme::Eof)
    }

    fn parse_cmds(&mut self, ev: &mut Evaluator, state: &mut SolverState, debug: bool) -> Result<(), LocatedError> {
        loop {
            self.parse_eqns(ev, state, debug)?;
            ev.mk_cmd();
            if matches!(self.peek_kind(), Lexeme::Semicolon) && Self::starts_exp(self.peek_kind_at(1)) {
                self.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn parse_eqns(&mut self, ev: &mut Evaluator, state: &mut SolverState, debug: bool) -> Result<(), LocatedError> {
        self.parse_exp(ev, state, 0)?;
        if !matches!(self.peek_kind(), Lexeme::Eq) {
            return Err(self.error_here("expected '=' in equation"));
        }
        while matches!(self.peek_kind(), Lexeme::Eq) {
            self.advance();
            self.parse_exp(ev, state, 0)?;
            ev.mk_eq(state, debug).map_err(|e| self.wrap(e))?;
        }
        Ok(())
    }

    fn parse_exp(&mut self, ev: &mut Evaluator, state: &mut SolverState, min_bp: u8) -> Result<(), LocatedError> {
        self.parse_exp_atom(ev, state)?;
        loop {
            let (op, left_bp, right_bp) = match self.peek_kind() {
                Lexeme::Plus => (BinOp::Add, 1, 2),
                Lexeme::Minus => (BinOp::Sub, 1, 2),
                Lexeme::Star => (BinOp::Mul, 2, 3),
                Lexeme::Slash => (BinOp::Div, 2, 3),
                Lexeme::Caret => (BinOp::Pow, 4, 4),
                _ => break,
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();
            self.parse_exp(ev, state, right_bp)?;
            let result = match op {
                BinOp::Add => ev.mk_add(),
                BinOp::Sub => ev.mk_sub(),
                BinOp::Mul => ev.mk_mul(),
                BinOp::Div => ev.mk_div(),
                BinOp::Pow => ev.mk_pow(),
            };
            result.map_err(|e| self.wrap(e))?;
        }
        Ok(())
    }

    fn parse_exp_atom(&mut self, ev: &mut Evaluator, state: &mut SolverState) -> Result<(), LocatedError> {
        if matches!(self.peek_kind(), Lexeme::Minus) {
            self.advance();
            self.parse_exp(ev, state, UNARY_OPERAND_BP)?;
            ev.mk_neg().map_err(|e| self.wrap(e))?;
            return Ok(());
        }
        self.parse_application_or_prim(ev, state)
    }

    /// `exp ::= ID prim | prim`: an identifier immediately followed by
    /// another `prim` (no operator between) is a function application;
    /// otherwise it's a bare variable reference, eligible for mediation.
    fn parse_application_or_prim(&mut self, ev: &mut Evaluator, state: &mut SolverState) -> Result<(), LocatedError> {
        if let Lexeme::Ident(name) = self.peek_kind().clone() {
            self.advance();
            if self.starts_prim() {
                ev.mk_var(&name, state);
                self.parse_prim(ev, state)?;
                return ev.mk_app().map_err(|e| self.wrap(e));
            }
            ev.mk_var(&name, state);
            return self.parse_mediation_suffix(ev, state);
        }
        self.parse_prim(ev, state)
    }

    /// `prim ::= NUM | ID | '(' exp ')'`, with its own mediation suffix.
    /// Used both as the top of a non-application `exp` and as a
    /// function-application argument (which the grammar restricts to a
    /// bare `prim`, not a further application).
    fn parse_prim(&mut self, ev: &mut Evaluator, state: &mut SolverState) -> Result<(), LocatedError> {
        match self.peek_kind().clone() {
            Lexeme::Number(n) => {
                self.advance();
                ev.mk_num(Complex::real(n));
            }
            Lexeme::Question => {
                self.advance();
                ev.mk_anon(state);
            }
            Lexeme::Ident(name) => {
                self.advance();
                ev.mk_var(&name, state);
            }
            Lexeme::LParen => {
                self.advance();
                self.parse_exp(ev, state, 0)?;
                self.expect(Lexeme::RParen)?;
            }
            _ => {
                return Err(self.error_here("expected a number, identifier, '?', or '('"));
            }
        }
        self.parse_mediation_suffix(ev, state)
    }

    fn parse_mediation_suffix(&mut self, ev: &mut Evaluator, state: &mut SolverState) -> Result<(), LocatedError> {
        while matches!(self.peek_kind(), Lexeme::LBracket) {
            self.advance();
            self.parse_exp(ev, state, 0)?;
            self.expect(Lexeme::Comma)?;
            self.parse_exp(ev, state, 0)?;
            self.expect(Lexeme::RBracket)?;
            ev.mk_med().map_err(|e| self.wrap(e))?;
        }
        Ok(())
    }
}
