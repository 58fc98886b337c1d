//! Shopping assistant server binary.
//! Run with: cargo run --bin shopping-assistant

use std::process::ExitCode;

use shopping_assistant::start_shopping_assistant;

fn main() -> ExitCode {
    start_shopping_assistant::run()
}
