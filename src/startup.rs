//! Startup helpers for the relay binary.

use std::process::ExitCode;

use crate::server::{self, AppState};

/// Environment variable for the listening port.
const PORT_ENV: &str = "PORT";

/// Run the relay (used by the `manray-relay` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Manray relay v{}", env!("CARGO_PKG_VERSION"));

    let state = match AppState::from_env() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let port = get_port();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::run_server(state, port)) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Read the listening port from the environment, falling back to the
/// default when unset or unparsable.
fn get_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(server::DEFAULT_PORT)
}
