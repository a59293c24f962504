//! Business logic services module.

pub mod chain_ops;
pub mod registration;

pub use chain_ops::ChainOps;
pub use registration::{registration_expiry, registration_salt};
