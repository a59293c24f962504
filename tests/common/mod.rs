//! Common utilities for integration tests.

#![allow(dead_code)]

use lagrange_chainops::{ChainOps, Config};

/// Helper to connect a client from environment variables.
pub async fn create_test_ops() -> Option<ChainOps> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Check if required environment variables are set
    let rpc_url = std::env::var("LAGRANGE_RPC_URL").ok()?;
    let private_key = std::env::var("LAGRANGE_PRIVATE_KEY").ok()?;

    if rpc_url.is_empty() || private_key.is_empty() {
        return None;
    }

    let config = Config::from_env().ok()?;

    let _ = lagrange_chainops::logging::init("warn");

    ChainOps::from_config(&config).await.ok()
}

/// Skip test if the client cannot be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_ops {
    () => {
        match common::create_test_ops().await {
            Some(ops) => ops,
            None => {
                eprintln!("Skipping test: LAGRANGE_RPC_URL or LAGRANGE_PRIVATE_KEY not set");
                return;
            }
        }
    };
}
