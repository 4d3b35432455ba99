//! Manray relay binary.
//! Run with: cargo run --bin manray-relay

use std::process::ExitCode;

use manray_assistant::startup;

fn main() -> ExitCode {
    startup::run()
}
