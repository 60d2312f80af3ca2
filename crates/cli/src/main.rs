use std::process::ExitCode;

fn main() -> ExitCode {
    tierwise_cli::run()
}
