use std::process;

fn main() {
    let code = lineqpp::cli::run(std::env::args());
    process::exit(code);
}
