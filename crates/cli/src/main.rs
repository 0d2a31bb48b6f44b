use std::process::ExitCode;

fn main() -> ExitCode {
    delish_cli::run()
}
