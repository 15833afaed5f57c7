//! Input-stream driver (spec §6 / component C6): splits a mixed text
//! stream into free-text lines (copied through, with translation-token
//! substitution) and equation-mode blocks (fed to the parser), and maps
//! any parse/core error back onto the file line it came from.
//!
//! This and `parser.rs`/`lexer.rs` are, per the core's own design note,
//! "thin and uninteresting" collaborators around the solver (`env.rs`)
//! — there is no independent grammar theory here, just careful line
//! bookkeeping so error messages point at the right line.

use crate::env::SolverState;
use crate::error::{LocatedError, SourceError};
use crate::eval::Evaluator;
use crate::lexeme::{is_ident_continue, is_ident_start};
use crate::parser::parse_program;

const MARKER: &str = "#lineqpp";

enum Mode {
    Text,
    Equation,
}

/// Run the whole preprocessing pass over `input`, mutating `state` as
/// equations are solved and returning the rewritten text.
pub fn run(input: &str, file: &str, state: &mut SolverState, debug: bool) -> Result<String, SourceError> {
    let mut ev = Evaluator::new();
    let mut out = String::new();
    let mut mode = Mode::Text;
    let mut eq_block = String::new();
    let mut eq_line_starts: Vec<(u32, u32)> = Vec::new();
    let mut lineno: u32 = 0;

    let had_trailing_newline = input.ends_with('\n');
    let lines: Vec<&str> = input.split('\n').collect();
    let line_count = if had_trailing_newline {
        lines.len().saturating_sub(1)
    } else {
        lines.len()
    };

    for line in &lines[..line_count] {
        lineno += 1;
        match mode {
            Mode::Text => {
                if let Some(rest) = match_marker(line) {
                    out.push('\n');
                    eq_block.clear();
                    eq_line_starts.clear();
                    let (continues, content) = strip_continuation(rest);
                    eq_line_starts.push((eq_block.len() as u32, lineno));
                    eq_block.push_str(content);
                    if continues {
                        mode = Mode::Equation;
                    } else {
                        finalize_block(&eq_block, &eq_line_starts, file, state, &mut ev, debug)?;
                    }
                } else {
                    out.push_str(&substitute_text_line(line, state));
                    out.push('\n');
                }
            }
            Mode::Equation => {
                out.push('\n');
                let (continues, content) = strip_continuation(line);
                eq_line_starts.push((eq_block.len() as u32, lineno));
                eq_block.push(' ');
                eq_block.push_str(content);
                if !continues {
                    finalize_block(&eq_block, &eq_line_starts, file, state, &mut ev, debug)?;
                    mode = Mode::Text;
                }
            }
        }
    }

    if matches!(mode, Mode::Equation) {
        finalize_block(&eq_block, &eq_line_starts, file, state, &mut ev, debug)?;
    }

    if !had_trailing_newline && out.ends_with('\n') {
        out.pop();
    }

    Ok(out)
}

fn finalize_block(
    block: &str,
    line_starts: &[(u32, u32)],
    file: &str,
    state: &mut SolverState,
    ev: &mut Evaluator,
    debug: bool,
) -> Result<(), SourceError> {
    parse_program(block, ev, state, debug).map_err(|e| locate(e, line_starts, file))
}

/// Map a `LocatedError`'s byte offset (within one equation block) back
/// to the file line it came from: the greatest recorded line-start
/// offset not exceeding it.
fn locate(err: LocatedError, line_starts: &[(u32, u32)], file: &str) -> SourceError {
    let lineno = line_starts
        .iter()
        .rev()
        .find(|(offset, _)| *offset <= err.offset)
        .map(|(_, lineno)| *lineno)
        .unwrap_or(0);
    SourceError::new(file, lineno, err.lexeme, err.kind)
}

/// `line` starts with `#lineqpp`, at column 0, and the marker is not
/// itself the prefix of a longer identifier.
fn match_marker(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(MARKER)?;
    if rest.is_empty() || rest.as_bytes()[0].is_ascii_whitespace() {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// Trailing-backslash line continuation: strips the backslash and
/// reports whether equation mode should continue onto the next line.
fn strip_continuation(s: &str) -> (bool, &str) {
    let trimmed = s.trim_end();
    match trimmed.strip_suffix('\\') {
        Some(content) => (true, content),
        None => (false, s),
    }
}

/// Replace every `name#r`/`name#i` (or MetaPost-flavoured `name#x`/
/// `name#y`) token with its translation-table entry; a miss leaves the
/// original text untouched.
fn substitute_text_line(line: &str, state: &SolverState) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < bytes.len() {
        if is_ident_start(bytes[i]) {
            let start = i;
            i += 1;
            while i < bytes.len() && is_ident_continue(bytes[i]) {
                i += 1;
            }
            let name = &line[start..i];

            if i < bytes.len() && bytes[i] == b'#' && i + 1 < bytes.len() {
                let suffix = bytes[i + 1];
                let next_is_ident = i + 2 < bytes.len() && is_ident_continue(bytes[i + 2]);
                let part = match suffix {
                    b'r' | b'x' => Some('r'),
                    b'i' | b'y' => Some('i'),
                    _ => None,
                };
                if let (false, Some(p)) = (next_is_ident, part) {
                    let token = format!("{name}#{p}");
                    if let Some(value) = state.translation.get(&token) {
                        out.push_str(value);
                        i += 2;
                        continue;
                    }
                }
            }

            out.push_str(name);
            continue;
        }

        let ch = line[i..].chars().next().expect("i < bytes.len()");
        out.push(ch);
        i += ch.len_utf8();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;

    fn process(input: &str) -> (String, SolverState) {
        let mut state = SolverState::new(SolverConfig::default());
        let out = run(input, "test.svg", &mut state, false).unwrap();
        (out, state)
    }

    #[test]
    fn marker_switches_mode_and_blanks_its_line() {
        let (out, state) = process("before\n#lineqpp x = 1 ;\nafter: x#r\n");
        assert_eq!(out, "before\n\nafter: 1.0000\n");
        assert_eq!(state.translation.get("x#r"), Some("1.0000"));
    }

    #[test]
    fn miss_leaves_token_untouched() {
        let (out, _) = process("value is y#r\n");
        assert_eq!(out, "value is y#r\n");
    }

    #[test]
    fn continuation_spans_multiple_physical_lines() {
        let (_, state) = process("#lineqpp x = 1 + \\\n2 ;\n");
        assert_eq!(state.translation.get("x#r"), Some("3.0000"));
    }

    #[test]
    fn metapost_spelling_of_parts_is_equivalent() {
        let (out, _) = process("#lineqpp x = 1 ;\nx#x and x#y\n");
        assert_eq!(out, "\n1.0000 and 0.0000\n");
    }

    #[test]
    fn error_reports_the_line_the_block_started_on() {
        let mut state = SolverState::new(SolverConfig::default());
        let err = run("ok\n#lineqpp x = 1 ;\n#lineqpp x = 2 ;\n", "test.svg", &mut state, false)
            .unwrap_err();
        assert_eq!(err.lineno, 3);
    }
}
