//! Shared value types.

pub mod surface;

pub use surface::Surface;
