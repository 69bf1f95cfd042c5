//! Shared helpers that do not belong to a single feature module.
//!
//! - [`qr`]: SVG rendering of attendance tokens

pub mod qr;
