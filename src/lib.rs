//! Verifies that SIMD batch arithmetic matches the same arithmetic done one
//! lane at a time, for every width configuration a context supports, every
//! lane-loading strategy, and both host and device execution contexts.
//!
//! ```rust
//! use lanecheck::{host_check_abis, host_abi_set, CheckConfig};
//!
//! let summary = host_check_abis(host_abi_set(), &CheckConfig::default()).unwrap();
//! assert_eq!(summary.abis(), host_abi_set().to_vec());
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod simd;

pub use check::{device_check_abis, host_check_abis, CheckSummary, ChunkStats};
pub use config::{CheckConfig, MismatchPolicy};
pub use error::{CheckFailure, HarnessError, Result};
pub use simd::{device_abi_set, host_abi_set, AbiKind};
