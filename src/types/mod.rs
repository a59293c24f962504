//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod operator;
pub mod receipt;

pub use operator::*;
pub use receipt::*;
