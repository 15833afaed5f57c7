//! CLI file-I/O integration tests (spec §6 "CLI surface"): drives
//! `cli::run` against real files on disk rather than the in-process
//! `preprocess` entry point, the one layer `tests/scenarios.rs` and
//! `tests/properties.rs` don't touch (argv parsing, `-o`, reading a
//! named input file, the positional-arity usage error).

use std::fs;

use tempfile::tempdir;

fn argv(args: &[&str]) -> Vec<String> {
    std::iter::once("lineqpp".to_string())
        .chain(args.iter().map(|s| s.to_string()))
        .collect()
}

#[test]
fn reads_named_file_and_writes_named_output() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("in.svg");
    let output_path = dir.path().join("out.svg");
    fs::write(&input_path, "#lineqpp x = 1 ;\nx is x#r\n").unwrap();

    let code = lineqpp::cli::run(argv(&[
        "-o",
        output_path.to_str().unwrap(),
        input_path.to_str().unwrap(),
    ]));

    assert_eq!(code, 0);
    let out = fs::read_to_string(&output_path).unwrap();
    assert_eq!(out, "\nx is 1.0000\n");
}

#[test]
fn missing_input_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.svg");

    let code = lineqpp::cli::run(argv(&[missing.to_str().unwrap()]));

    assert_eq!(code, 1);
}

#[test]
fn more_than_one_positional_argument_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.svg");
    let b = dir.path().join("b.svg");
    fs::write(&a, "hello\n").unwrap();
    fs::write(&b, "world\n").unwrap();

    let code = lineqpp::cli::run(argv(&[a.to_str().unwrap(), b.to_str().unwrap()]));

    assert_eq!(code, 1);
}

#[test]
fn inconsistent_equation_in_a_file_exits_nonzero_and_leaves_no_output_file() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("bad.svg");
    let output_path = dir.path().join("out.svg");
    fs::write(&input_path, "#lineqpp x = 1 ; x = 2 ;\n").unwrap();

    let code = lineqpp::cli::run(argv(&[
        "-o",
        output_path.to_str().unwrap(),
        input_path.to_str().unwrap(),
    ]));

    assert_eq!(code, 1);
    assert!(!output_path.exists());
}
