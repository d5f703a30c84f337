//! Portable array-backed batches.
//!
//! `FixedSimd<T, N>` holds `N` lanes in a plain array and implements every
//! batch operation lane by lane. It backs the `Scalar` and `Fixed<N>` width
//! configurations and is the only batch type available in the device
//! context.

use std::ops::{Add, Div, Mul, Not, Sub};

use crate::simd::traits::{ElementAligned, SimdBatch, SimdElement, SimdMask};

/// Boolean mask of `N` lanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedMask<const N: usize> {
    lanes: [bool; N],
}

impl<const N: usize> Default for FixedMask<N> {
    fn default() -> Self {
        Self { lanes: [false; N] }
    }
}

impl<const N: usize> Not for FixedMask<N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self {
            lanes: self.lanes.map(|lane| !lane),
        }
    }
}

impl<const N: usize> SimdMask for FixedMask<N> {
    const LANES: usize = N;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self { lanes: [value; N] }
    }

    #[inline(always)]
    fn test(&self, i: usize) -> bool {
        self.lanes[i]
    }

    #[inline(always)]
    fn set(&mut self, i: usize, value: bool) {
        self.lanes[i] = value;
    }
}

/// Portable SIMD batch of `N` lanes of `T`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedSimd<T: SimdElement, const N: usize> {
    elements: [T; N],
}

impl<T: SimdElement, const N: usize> FixedSimd<T, N> {
    /// Width check evaluated at monomorphization time.
    const NON_EMPTY: () = assert!(N >= 1, "a batch needs at least one lane");

    #[inline(always)]
    pub fn from_array(elements: [T; N]) -> Self {
        let () = Self::NON_EMPTY;
        Self { elements }
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.elements
    }

    #[inline(always)]
    fn zip_with(self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        let mut out = self;
        for (lhs, rhs) in out.elements.iter_mut().zip(rhs.elements) {
            *lhs = f(*lhs, rhs);
        }
        out
    }

    #[inline(always)]
    fn compare(&self, other: &Self, f: impl Fn(&T, &T) -> bool) -> FixedMask<N> {
        let mut mask = FixedMask::default();
        for i in 0..N {
            mask.set(i, f(&self.elements[i], &other.elements[i]));
        }
        mask
    }
}

impl<T: SimdElement, const N: usize> Default for FixedSimd<T, N> {
    fn default() -> Self {
        Self::from_array([T::zero(); N])
    }
}

impl<T: SimdElement, const N: usize> SimdBatch<T> for FixedSimd<T, N> {
    type Mask = FixedMask<N>;

    const LANES: usize = N;

    #[inline(always)]
    fn lane(&self, i: usize) -> T {
        self.elements[i]
    }

    #[inline(always)]
    fn set_lane(&mut self, i: usize, value: T) {
        self.elements[i] = value;
    }

    #[inline(always)]
    fn copy_from(&mut self, src: &[T], _tag: ElementAligned) {
        assert!(
            src.len() >= N,
            "source holds {} elements, batch needs {N}",
            src.len()
        );
        self.elements.copy_from_slice(&src[..N]);
    }

    #[inline(always)]
    fn simd_eq(&self, other: &Self) -> Self::Mask {
        self.compare(other, |a, b| a == b)
    }

    #[inline(always)]
    fn simd_ne(&self, other: &Self) -> Self::Mask {
        self.compare(other, |a, b| a != b)
    }

    #[inline(always)]
    fn masked_copy_from(&mut self, mask: Self::Mask, src: &[T]) {
        for i in (0..N).filter(|&i| mask.test(i)) {
            self.elements[i] = src[i];
        }
    }

    #[inline(always)]
    fn masked_assign(&mut self, mask: Self::Mask, value: T) {
        for i in (0..N).filter(|&i| mask.test(i)) {
            self.elements[i] = value;
        }
    }
}

impl<T: SimdElement, const N: usize> Add for FixedSimd<T, N> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: SimdElement, const N: usize> Sub for FixedSimd<T, N> {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: SimdElement, const N: usize> Mul for FixedSimd<T, N> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl<T: SimdElement, const N: usize> Div for FixedSimd<T, N> {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a / b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{all_of, none_of, where_};

    #[test]
    fn test_default_is_zero() {
        let v = FixedSimd::<f64, 4>::default();
        assert_eq!(v.to_array(), [0.0; 4]);
        assert_eq!(<FixedSimd<f64, 4> as SimdBatch<f64>>::size(), 4);
    }

    #[test]
    fn test_copy_from_takes_front_of_slice() {
        let mut v = FixedSimd::<i32, 3>::default();
        v.copy_from(&[1, 2, 3, 4, 5], ElementAligned);
        assert_eq!(v.to_array(), [1, 2, 3]);
    }

    #[test]
    #[should_panic(expected = "source holds 2 elements, batch needs 4")]
    fn test_copy_from_short_slice_panics() {
        let mut v = FixedSimd::<f64, 4>::default();
        v.copy_from(&[1.0, 2.0], ElementAligned);
    }

    #[test]
    fn test_lane_access() {
        let mut v = FixedSimd::from_array([1.0f32, 2.0]);
        v.set_lane(1, -4.0);
        assert_eq!(v.lane(0), 1.0);
        assert_eq!(v.lane(1), -4.0);
    }

    #[test]
    fn test_arithmetic_is_lane_wise() {
        let a = FixedSimd::from_array([1.0, 2.0, -1.0, 10.0]);
        let b = FixedSimd::from_array([1.0, 2.0, 1.0, 1.0]);
        assert_eq!((a + b).to_array(), [2.0, 4.0, 0.0, 11.0]);
        assert_eq!((a - b).to_array(), [0.0, 0.0, -2.0, 9.0]);
        assert_eq!((a * b).to_array(), [1.0, 4.0, -1.0, 10.0]);
        assert_eq!((a / b).to_array(), [1.0, 1.0, -1.0, 10.0]);
    }

    #[test]
    fn test_comparisons_and_reductions() {
        let a = FixedSimd::from_array([1, 2, 3, 4]);
        let b = FixedSimd::from_array([1, 2, 0, 4]);
        assert!(all_of(a.simd_eq(&a)));
        assert!(none_of(a.simd_ne(&a)));
        assert!(!all_of(a.simd_eq(&b)));
        assert!(!none_of(a.simd_ne(&b)));
        assert_eq!(a.simd_ne(&b), !a.simd_eq(&b));
    }

    #[test]
    fn test_masked_load_reads_only_selected_lanes() {
        let mut v = FixedSimd::from_array([9.0, 9.0, 9.0, 9.0]);
        let mut mask = FixedMask::<4>::splat(false);
        mask.set(0, true);
        mask.set(1, true);

        // two elements only: lanes 2 and 3 must not be read
        where_(mask, &mut v).copy_from(&[5.0, 6.0], ElementAligned);
        assert_eq!(v.to_array(), [5.0, 6.0, 9.0, 9.0]);

        where_(!mask, &mut v).assign(0.0);
        assert_eq!(v.to_array(), [5.0, 6.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mask_default_is_all_false() {
        let mask = FixedMask::<3>::default();
        assert!(none_of(mask));
        assert!(all_of(!mask));
    }
}
