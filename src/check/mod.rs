//! Scalar-versus-vector verification harness.
//!
//! Data flows one way: two scalar operand streams are cut into batch-width
//! chunks by a [`loader`], combined both lane by lane and as whole batches
//! through an [`ops`] adapter, and compared by a [`checker`] backend. The
//! [`dispatch`] entry points fan this out over a configuration set, on the
//! host directly or on the device through [`device`] launches.

pub mod checker;
pub mod device;
pub mod dispatch;
pub mod driver;
pub mod loader;
pub mod ops;
pub mod space;

pub use checker::{
    check_equality, check_equality_at, device_assert, Checker, DeviceChecker, HostChecker,
};
pub use dispatch::{
    check_abi, check_abi_type, check_abis, check_addition, device_check_abis, host_check_abis,
    CheckSummary,
};
pub use driver::{
    check_binary_op_all_loaders, check_binary_op_one_loader, ChunkSite, ChunkStats,
};
pub use loader::{LoadAsScalars, LoadElementAligned, LoadMasked, Loader};
pub use ops::{BinaryOp, Operand, Plus};
pub use space::{Device, Event, ExecutionSpace, Host};
