//! Manray terminal client binary.
//! Run with: cargo run --bin manray

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    manray_assistant::tui::run().await
}
