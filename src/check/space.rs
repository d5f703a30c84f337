//! Execution contexts.
//!
//! An [`ExecutionSpace`] binds the pieces that differ between the host and a
//! device: which assertion backend runs, which call form of an operation
//! adapter is used, whether native configurations are reachable, and
//! whether progress is reported at all.

use crate::check::checker::{Checker, DeviceChecker, HostChecker};
use crate::check::driver::ChunkStats;
use crate::check::ops::{BinaryOp, Operand};
use crate::simd::AbiKind;

/// Progress notifications emitted by the driver and dispatcher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event<'a> {
    AbiStarted(AbiKind),
    Chunk {
        loader: &'a str,
        offset: usize,
        lanes: usize,
        loaded: bool,
    },
    LoaderDone {
        loader: &'a str,
        width: usize,
        stats: ChunkStats,
    },
}

pub trait ExecutionSpace {
    type Checker: Checker;

    const NAME: &'static str;

    /// Whether processor-intrinsic configurations may run here.
    const NATIVE_ABIS: bool;

    fn apply<Op: BinaryOp, X: Operand>(op: &Op, a: X, b: X) -> X;

    fn report(event: Event<'_>);
}

/// The controlling processor: full diagnostics.
#[derive(Copy, Clone, Debug, Default)]
pub struct Host;

impl ExecutionSpace for Host {
    type Checker = HostChecker;

    const NAME: &'static str = "host";

    const NATIVE_ABIS: bool = true;

    #[inline(always)]
    fn apply<Op: BinaryOp, X: Operand>(op: &Op, a: X, b: X) -> X {
        op.on_host(a, b)
    }

    fn report(event: Event<'_>) {
        match event {
            Event::AbiStarted(kind) => {
                log::info!("checking ABI {kind} ({} lanes)", kind.width())
            }
            Event::Chunk {
                loader,
                offset,
                lanes,
                loaded,
            } => log::trace!(
                "{loader}: chunk at {offset} with {lanes} valid lanes {}",
                if loaded { "compared" } else { "declined" }
            ),
            Event::LoaderDone {
                loader,
                width,
                stats,
            } => log::debug!(
                "{loader} (width {width}): {} chunks compared, {} declined",
                stats.compared,
                stats.skipped
            ),
        }
    }
}

/// A constrained kernel context: halt-on-failure assertions, portable
/// configurations only, no reporting.
#[derive(Copy, Clone, Debug, Default)]
pub struct Device;

impl ExecutionSpace for Device {
    type Checker = DeviceChecker;

    const NAME: &'static str = "device";

    const NATIVE_ABIS: bool = false;

    #[inline(always)]
    fn apply<Op: BinaryOp, X: Operand>(op: &Op, a: X, b: X) -> X {
        op.on_device(a, b)
    }

    #[inline(always)]
    fn report(_event: Event<'_>) {}
}
