//! AVX SIMD batches for 256-bit registers.
//!
//! # Available Types
//!
//! - [`f64x4::F64x4`]: 4 packed double-precision values, with its
//!   register mask [`f64x4::M64x4`]
//!
//! # Conditional Compilation
//!
//! This module is only compiled when `build.rs` detected AVX2 on the build
//! host. Otherwise the host configuration set holds only portable batches.

pub mod f64x4;
