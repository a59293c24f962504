//! Smart contract bindings.

pub mod avs_directory;
pub mod lagrange_service;

pub use avs_directory::IAVSDirectory;
pub use lagrange_service::{ILagrangeService, ServiceCall};
