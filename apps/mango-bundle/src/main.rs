//! # Mango Mart Host Entry Point
//!
//! Reads JSON commands from stdin and answers on stdout. The actual setup is
//! in lib.rs.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match mango_bundle::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Mango Mart bundle failed");
            eprintln!("mango-bundle: {}", err);
            ExitCode::FAILURE
        }
    }
}
