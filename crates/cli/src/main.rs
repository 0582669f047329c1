use std::process::ExitCode;

fn main() -> ExitCode {
    roomdesk_cli::run()
}
