//! Equation-mode tokenizer (spec §6). Byte-indexed scan loop in the
//! teacher's style, but over a far smaller token set: no keywords, no
//! comments, decimal number literals, and the anonymous-variable `?`.

use crate::error::{CoreError, LocatedError};
use crate::lexeme::{is_ident_continue, is_ident_start, Lexeme};
use crate::span::{Span, Spanned};

pub struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Spanned<Lexeme>>, LocatedError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let is_eof = tok.node == Lexeme::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Spanned<Lexeme>, LocatedError> {
        self.skip_whitespace();

        if self.pos >= self.source.len() {
            return Ok(self.make_token(Lexeme::Eof, self.pos, self.pos));
        }

        let start = self.pos;
        let ch = self.source[self.pos];

        if is_ident_start(ch) {
            return Ok(self.scan_ident());
        }

        if ch.is_ascii_digit() || (ch == b'.' && self.peek_digit_after_dot()) {
            return self.scan_number();
        }

        self.scan_symbol(start)
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek_digit_after_dot(&self) -> bool {
        self.source
            .get(self.pos + 1)
            .is_some_and(u8::is_ascii_digit)
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn scan_ident(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        self.make_token(Lexeme::Ident(text.to_string()), start, self.pos)
    }

    fn scan_number(&mut self) -> Result<Spanned<Lexeme>, LocatedError> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        match text.parse::<f64>() {
            Ok(n) => Ok(self.make_token(Lexeme::Number(n), start, self.pos)),
            Err(_) => Err(LocatedError::new(
                start as u32,
                text,
                CoreError::ParseError(format!("invalid numeric literal '{text}'")),
            )),
        }
    }

    fn scan_symbol(&mut self, start: usize) -> Result<Spanned<Lexeme>, LocatedError> {
        let ch = self.source[self.pos];
        self.pos += 1;
        let token = match ch {
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'/' => Lexeme::Slash,
            b'^' => Lexeme::Caret,
            b'[' => Lexeme::LBracket,
            b',' => Lexeme::Comma,
            b']' => Lexeme::RBracket,
            b'(' => Lexeme::LParen,
            b')' => Lexeme::RParen,
            b'=' => Lexeme::Eq,
            b';' => Lexeme::Semicolon,
            b'?' => Lexeme::Question,
            other => {
                let lexeme = (other as char).to_string();
                return Err(LocatedError::new(
                    start as u32,
                    lexeme.clone(),
                    CoreError::ParseError(format!("unexpected character '{lexeme}'")),
                ));
            }
        };
        Ok(self.make_token(token, start, self.pos))
    }

    fn make_token(&self, node: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(node, Span::new(start as u32, end as u32))
    }
}
