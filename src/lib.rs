//! Lagrange Chain Operations Library
//!
//! Client for the on-chain lifecycle of a Lagrange AVS operator.
//!
//! # Features
//!
//! - **Registration**: Register an operator with a signed consent digest
//! - **Key Management**: Add BLS public keys to an operator record
//! - **Subscriptions**: Subscribe to and unsubscribe from chains
//! - **Deregistration**: Remove an operator registration
//!
//! Every action waits until its transaction is mined and checks the receipt.
//!
//! # Example
//!
//! ```rust,ignore
//! use lagrange_chainops::{ChainOps, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     lagrange_chainops::logging::init(&config.log_level)?;
//!     let ops = ChainOps::from_config(&config).await?;
//!     ops.subscribe(&config.network, "optimism").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod ethereum;
pub mod logging;
pub mod services;
pub mod types;

pub use config::{Config, NetworkTables};
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use services::ChainOps;
pub use types::{BlsPublicKey, MinedTransaction};
