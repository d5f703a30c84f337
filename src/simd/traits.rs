//! Capability surface of a SIMD batch type.
//!
//! The harness in [`crate::check`] only ever talks to vectors through the
//! traits in this module: a batch of `LANES` elements with lane accessors,
//! a bulk element-aligned load, lane-wise comparisons returning a mask, and
//! mask-qualified (`where_`) loads and assignments.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Not, Sub};

use num::traits::NumOps;
use num::Zero;

/// Scalar element type that can populate a batch lane.
pub trait SimdElement: Copy + PartialEq + Debug + Zero + NumOps + Send + Sync + 'static {}

impl<T> SimdElement for T where T: Copy + PartialEq + Debug + Zero + NumOps + Send + Sync + 'static {}

/// Tag for loads from memory that is contiguous and aligned to the element
/// type (as opposed to the whole vector).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementAligned;

/// Per-lane boolean mask of the same width as its batch.
pub trait SimdMask: Copy + Debug + Default + PartialEq + Not<Output = Self> {
    /// Number of lanes in the mask.
    const LANES: usize;

    /// Mask with every lane set to `value`.
    fn splat(value: bool) -> Self;

    /// Reads lane `i`.
    fn test(&self, i: usize) -> bool;

    /// Writes lane `i`.
    fn set(&mut self, i: usize, value: bool);
}

/// `true` if every lane of `mask` is set.
#[inline(always)]
pub fn all_of<M: SimdMask>(mask: M) -> bool {
    (0..M::LANES).all(|i| mask.test(i))
}

/// `true` if no lane of `mask` is set.
#[inline(always)]
pub fn none_of<M: SimdMask>(mask: M) -> bool {
    !(0..M::LANES).any(|i| mask.test(i))
}

/// A fixed-width batch of `T` lanes.
///
/// `Default` yields a batch whose lanes are all `T::zero()`.
pub trait SimdBatch<T: SimdElement>:
    Copy
    + Debug
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    type Mask: SimdMask;

    /// Number of lanes, always at least one.
    const LANES: usize;

    #[inline(always)]
    fn size() -> usize {
        Self::LANES
    }

    /// Reads lane `i`. Panics if `i >= LANES`.
    fn lane(&self, i: usize) -> T;

    /// Writes lane `i`. Panics if `i >= LANES`.
    fn set_lane(&mut self, i: usize, value: T);

    /// Loads `LANES` contiguous elements from the front of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `LANES` elements.
    fn copy_from(&mut self, src: &[T], tag: ElementAligned);

    /// Lane-wise `==`.
    fn simd_eq(&self, other: &Self) -> Self::Mask;

    /// Lane-wise `!=`.
    fn simd_ne(&self, other: &Self) -> Self::Mask;

    /// Loads lane `i` from `src[i]` for every lane selected by `mask`; other
    /// lanes keep their value. Selected lanes must lie inside `src`.
    fn masked_copy_from(&mut self, mask: Self::Mask, src: &[T]);

    /// Sets every lane selected by `mask` to `value`.
    fn masked_assign(&mut self, mask: Self::Mask, value: T);
}

/// A batch borrowed under a mask, produced by [`where_`].
pub struct WhereExpression<'a, T: SimdElement, V: SimdBatch<T>> {
    mask: V::Mask,
    target: &'a mut V,
    _element: std::marker::PhantomData<T>,
}

/// Restricts the next load or assignment on `target` to the lanes of `mask`.
///
/// ```rust
/// use lanecheck::simd::{where_, ElementAligned, FixedMask, FixedSimd, SimdBatch, SimdMask};
///
/// let mut v = FixedSimd::<f64, 4>::default();
/// let mut mask = FixedMask::<4>::splat(false);
/// mask.set(0, true);
/// where_(mask, &mut v).copy_from(&[7.0], ElementAligned);
/// assert_eq!(v.lane(0), 7.0);
/// assert_eq!(v.lane(1), 0.0);
/// ```
#[inline(always)]
pub fn where_<T: SimdElement, V: SimdBatch<T>>(
    mask: V::Mask,
    target: &mut V,
) -> WhereExpression<'_, T, V> {
    WhereExpression {
        mask,
        target,
        _element: std::marker::PhantomData,
    }
}

impl<T: SimdElement, V: SimdBatch<T>> WhereExpression<'_, T, V> {
    #[inline(always)]
    pub fn copy_from(self, src: &[T], _tag: ElementAligned) {
        self.target.masked_copy_from(self.mask, src);
    }

    #[inline(always)]
    pub fn assign(self, value: T) {
        self.target.masked_assign(self.mask, value);
    }
}
