//! # StoreSim Demo Entry Point
//!
//! ## Startup Sequence
//! 1. Parse command line
//! 2. Load configuration (defaults → TOML file → environment → flags)
//! 3. Initialize tracing (logging)
//! 4. Build the sample store and run the cart/checkout flow

use std::process::ExitCode;

fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match storesim_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("storesim: {}", e);
            ExitCode::FAILURE
        }
    }
}
