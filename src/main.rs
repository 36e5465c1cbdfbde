//! todoit - task lists kept in a plain text file

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = todoit::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
