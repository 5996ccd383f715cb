//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod ionos;

pub use ionos::IonosProvider;
