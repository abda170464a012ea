//! statsync - Scheduled refresh of basketball stats caches
//!
//! Runs each team's and each data domain's producer in turn, tolerating
//! individual failures, and publishes the refreshed caches through git.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

mod cli;

use statsync::RefreshError;

/// Main entry point for the statsync CLI
fn main() {
    let code = match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.downcast_ref::<RefreshError>().map_or(1, RefreshError::exit_code)
        },
    };
    std::process::exit(code);
}
