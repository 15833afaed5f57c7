//! Command-line surface (spec §6 / component C7).
//!
//! A single flat `clap::Parser` struct, collapsed from the teacher's
//! subcommand tree (`cli/build.rs`, `cli/check.rs`, …) to one command,
//! since this tool has exactly one job. Help and version are handled
//! by hand rather than clap's built-ins, because the spec pins their
//! short flags to `-h`/`-v` and their exit code to 0 — matching clap's
//! defaults closely enough that it's simpler to just own them.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::SolverConfig;
use crate::env::SolverState;
use crate::scanner;

const USAGE: &str = "\
usage: lineqpp [-o FILE] [-d] [FILE]
       lineqpp -v | -h

  -o FILE   redirect output to FILE (default: stdout)
  -d        enable debug trace to stderr
  -v        print version and exit
  -h        print this usage and exit
  FILE      read input from FILE (default: stdin)";

#[derive(Parser)]
#[command(name = "lineqpp", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(short = 'd')]
    pub debug: bool,

    #[arg(short = 'v')]
    pub version: bool,

    #[arg(short = 'h')]
    pub help: bool,

    /// At most one: the input file (default stdin). More is a usage error.
    pub files: Vec<PathBuf>,
}

/// Parse `argv`, run the preprocessor, and return the process exit code.
/// Never panics on malformed input — every failure path prints to
/// stderr and returns a code instead.
pub fn run(args: impl IntoIterator<Item = String>) -> i32 {
    let args = match Args::try_parse_from(args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };

    if args.help {
        println!("{USAGE}");
        return 0;
    }
    if args.version {
        println!("lineqpp {}", env!("CARGO_PKG_VERSION"));
        return 0;
    }
    if args.files.len() > 1 {
        eprintln!("lineqpp: at most one input file may be given\n{USAGE}");
        return 1;
    }

    let file_label = args
        .files
        .first()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());

    let input = match read_input(args.files.first()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("lineqpp: {file_label}: {e}");
            return 1;
        }
    };

    let mut state = SolverState::new(SolverConfig::default());
    let output = match scanner::run(&input, &file_label, &mut state, args.debug) {
        Ok(s) => s,
        Err(source_err) => {
            eprintln!("{source_err}");
            return 1;
        }
    };

    match write_output(args.output.as_deref(), &output) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("lineqpp: {e}");
            1
        }
    }
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(file: Option<&std::path::Path>, content: &str) -> io::Result<()> {
    match file {
        Some(path) => fs::write(path, content),
        None => io::stdout().write_all(content.as_bytes()),
    }
}
