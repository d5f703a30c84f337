//! ARM NEON SIMD batches for 128-bit registers.
//!
//! # Available Types
//!
//! - [`f64x2::F64x2`]: 2 packed double-precision values, with its register
//!   mask [`f64x2::M64x2`]
//!
//! # Conditional Compilation
//!
//! This module is only compiled on aarch64 when `build.rs` detected Advanced
//! SIMD on the build host.

pub mod f64x2;
