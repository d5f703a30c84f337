//! NEON 2-lane f64 SIMD batch.
//!
//! `F64x2` wraps a `float64x2_t` register; its mask `M64x2` wraps the
//! `uint64x2_t` produced by NEON comparisons. Masked operations use
//! `vbslq_f64` bit selection.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Add, Div, Mul, Not, Sub};

use crate::simd::traits::{ElementAligned, SimdBatch, SimdMask};

/// Number of f64 elements in a 128-bit register.
pub const LANE_COUNT: usize = 2;

/// Register mask for [`F64x2`]: each lane is all ones (true) or all zeros.
#[derive(Copy, Clone, Debug)]
pub struct M64x2 {
    mask: uint64x2_t,
}

impl M64x2 {
    #[inline(always)]
    fn from_bits(bits: [u64; LANE_COUNT]) -> Self {
        Self {
            mask: unsafe { vld1q_u64(bits.as_ptr()) },
        }
    }

    #[inline(always)]
    fn to_bits(self) -> [u64; LANE_COUNT] {
        let mut bits = [0u64; LANE_COUNT];
        unsafe { vst1q_u64(bits.as_mut_ptr(), self.mask) };
        bits
    }
}

impl Default for M64x2 {
    fn default() -> Self {
        Self {
            mask: unsafe { vdupq_n_u64(0) },
        }
    }
}

impl PartialEq for M64x2 {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Not for M64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self {
            mask: unsafe { veorq_u64(self.mask, vdupq_n_u64(u64::MAX)) },
        }
    }
}

impl SimdMask for M64x2 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self::from_bits([if value { u64::MAX } else { 0 }; LANE_COUNT])
    }

    #[inline(always)]
    fn test(&self, i: usize) -> bool {
        self.to_bits()[i] != 0
    }

    #[inline(always)]
    fn set(&mut self, i: usize, value: bool) {
        let mut bits = self.to_bits();
        bits[i] = if value { u64::MAX } else { 0 };
        *self = Self::from_bits(bits);
    }
}

/// NEON SIMD batch containing 2 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x2 {
    pub elements: float64x2_t,
}

impl F64x2 {
    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut out = [0.0f64; LANE_COUNT];
        unsafe { vst1q_f64(out.as_mut_ptr(), self.elements) };
        out
    }
}

impl From<[f64; LANE_COUNT]> for F64x2 {
    fn from(values: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { vld1q_f64(values.as_ptr()) },
        }
    }
}

impl Default for F64x2 {
    fn default() -> Self {
        Self {
            elements: unsafe { vdupq_n_f64(0.0) },
        }
    }
}

impl SimdBatch<f64> for F64x2 {
    type Mask = M64x2;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn lane(&self, i: usize) -> f64 {
        self.to_array()[i]
    }

    #[inline(always)]
    fn set_lane(&mut self, i: usize, value: f64) {
        let mut lanes = self.to_array();
        lanes[i] = value;
        *self = Self::from(lanes);
    }

    #[inline(always)]
    fn copy_from(&mut self, src: &[f64], _tag: ElementAligned) {
        assert!(
            src.len() >= LANE_COUNT,
            "source holds {} elements, batch needs {LANE_COUNT}",
            src.len()
        );
        // SAFETY: the slice holds at least LANE_COUNT elements.
        self.elements = unsafe { vld1q_f64(src.as_ptr()) };
    }

    #[inline(always)]
    fn simd_eq(&self, other: &Self) -> Self::Mask {
        M64x2 {
            mask: unsafe { vceqq_f64(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_ne(&self, other: &Self) -> Self::Mask {
        !self.simd_eq(other)
    }

    #[inline(always)]
    fn masked_copy_from(&mut self, mask: Self::Mask, src: &[f64]) {
        // NEON has no masked load: gather the selected lanes, then select.
        let bits = mask.to_bits();
        let mut staging = [0.0f64; LANE_COUNT];
        for (i, lane) in staging.iter_mut().enumerate() {
            if bits[i] != 0 {
                *lane = src[i];
            }
        }
        let loaded = Self::from(staging);
        self.elements = unsafe { vbslq_f64(mask.mask, loaded.elements, self.elements) };
    }

    #[inline(always)]
    fn masked_assign(&mut self, mask: Self::Mask, value: f64) {
        self.elements = unsafe { vbslq_f64(mask.mask, vdupq_n_f64(value), self.elements) };
    }
}

impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { vaddq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { vsubq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { vmulq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { vdivq_f64(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{all_of, none_of, where_};

    #[test]
    fn test_copy_from_and_add() {
        let mut a = F64x2::default();
        let mut b = F64x2::default();
        a.copy_from(&[0.0, 1.0, -2.0], ElementAligned);
        b.copy_from(&[0.0, -3.0], ElementAligned);
        assert_eq!((a + b).to_array(), [0.0, -2.0]);
    }

    #[test]
    fn test_masked_load_single_lane() {
        let mut v = F64x2::from([5.0, 5.0]);
        let mut mask = M64x2::default();
        mask.set(0, true);
        where_(mask, &mut v).copy_from(&[-2.0], ElementAligned);
        where_(!mask, &mut v).assign(0.0);
        assert_eq!(v.to_array(), [-2.0, 0.0]);
    }

    #[test]
    fn test_reductions() {
        let v = F64x2::from([1.0, f64::NAN]);
        assert!(!all_of(v.simd_eq(&v)));
        assert!(v.simd_ne(&v).test(1));
        assert!(none_of(F64x2::default().simd_ne(&F64x2::default())));
    }
}
