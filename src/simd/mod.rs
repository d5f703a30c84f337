//! The SIMD batch capability consumed by the harness.
//!
//! Portable batches live in [`fixed`]; native register-backed batches are
//! compiled only when `build.rs` detected the matching CPU feature.

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub mod abi;
pub mod fixed;
pub mod traits;

pub use abi::{device_abi_set, host_abi_set, Abi, AbiKind, Fixed, Scalar, Simd, SimdAbi};
pub use fixed::{FixedMask, FixedSimd};
pub use traits::{
    all_of, none_of, where_, ElementAligned, SimdBatch, SimdElement, SimdMask, WhereExpression,
};

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub use abi::Avx2;

#[cfg(all(neon, target_arch = "aarch64"))]
pub use abi::Neon;
