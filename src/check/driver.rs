//! Chunked comparison driver.
//!
//! Walks two operand streams in strides of the batch width. For every chunk
//! it loads both operands with one loader, derives the reference result by
//! applying the operation to each lane of the loaded batches, computes the
//! vector result with a single batch operation, and hands both to
//! [`check_equality`].
//!
//! The reference is built from the loaded batches rather than from the raw
//! streams, so lanes past the end of a trailing chunk (zero on both sides
//! after a masked or scalar load) are compared too.

use std::fmt;
use std::ops::{Add, AddAssign};

use crate::check::checker::check_equality_at;
use crate::check::loader::{LoadAsScalars, LoadElementAligned, LoadMasked, Loader};
use crate::check::ops::BinaryOp;
use crate::check::space::{Event, ExecutionSpace};
use crate::simd::{Simd, SimdAbi, SimdBatch, SimdElement};

/// Chunk counts of one or more driver passes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkStats {
    /// Chunks loaded and checked.
    pub compared: usize,
    /// Chunks a loader declined.
    pub skipped: usize,
}

impl Add for ChunkStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            compared: self.compared + rhs.compared,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

impl AddAssign for ChunkStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// The chunk a batch comparison belongs to, as named in failure reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkSite {
    pub loader: &'static str,
    pub width: usize,
    pub offset: usize,
}

impl fmt::Display for ChunkSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunk of {} lanes at offset {}",
            self.loader, self.width, self.offset
        )
    }
}

/// Checks `op` over `first` and `second` with loader `L` under
/// configuration `A` in context `S`.
///
/// # Panics
///
/// Panics if the operand streams differ in length. Check failures end the
/// run through `checker`.
pub fn check_binary_op_one_loader<S, A, L, Op, T>(
    checker: &S::Checker,
    op: &Op,
    first: &[T],
    second: &[T],
) -> ChunkStats
where
    S: ExecutionSpace,
    A: SimdAbi<T>,
    L: Loader,
    Op: BinaryOp,
    T: SimdElement,
{
    assert_eq!(
        first.len(),
        second.len(),
        "operand streams must have the same length"
    );

    let loader = L::default();
    let width = <Simd<T, A> as SimdBatch<T>>::LANES;
    let n = first.len();
    let mut stats = ChunkStats::default();

    for i in (0..n).step_by(width) {
        let nlanes = (n - i).min(width);

        let mut first_arg: Simd<T, A> = Default::default();
        let loaded_first_arg = loader.load(&first[i..], nlanes, &mut first_arg);
        let mut second_arg: Simd<T, A> = Default::default();
        let loaded_second_arg = loader.load(&second[i..], nlanes, &mut second_arg);

        let loaded = loaded_first_arg && loaded_second_arg;
        S::report(Event::Chunk {
            loader: L::NAME,
            offset: i,
            lanes: nlanes,
            loaded,
        });
        if !loaded {
            stats.skipped += 1;
            continue;
        }

        let mut expected_result: Simd<T, A> = Default::default();
        for lane in 0..width {
            expected_result.set_lane(
                lane,
                S::apply(op, first_arg.lane(lane), second_arg.lane(lane)),
            );
        }
        let computed_result = S::apply(op, first_arg, second_arg);

        let site = ChunkSite {
            loader: L::NAME,
            width,
            offset: i,
        };
        check_equality_at::<_, T, _>(checker, site, &expected_result, &computed_result);
        stats.compared += 1;
    }

    S::report(Event::LoaderDone {
        loader: L::NAME,
        width,
        stats,
    });
    stats
}

/// Runs [`check_binary_op_one_loader`] with every loader strategy on the
/// same inputs: element-aligned, masked, then lane by lane.
pub fn check_binary_op_all_loaders<S, A, Op, T>(
    checker: &S::Checker,
    op: &Op,
    first: &[T],
    second: &[T],
) -> ChunkStats
where
    S: ExecutionSpace,
    A: SimdAbi<T>,
    Op: BinaryOp,
    T: SimdElement,
{
    check_binary_op_one_loader::<S, A, LoadElementAligned, Op, T>(checker, op, first, second)
        + check_binary_op_one_loader::<S, A, LoadMasked, Op, T>(checker, op, first, second)
        + check_binary_op_one_loader::<S, A, LoadAsScalars, Op, T>(checker, op, first, second)
}
