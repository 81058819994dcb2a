//! # cryptoql-core
//!
//! Shared foundation for the cryptoql rule compiler: error enums,
//! layered configuration, tracing setup, detection surfaces, and constants.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use types::Surface;
