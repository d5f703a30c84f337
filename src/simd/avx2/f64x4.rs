//! AVX 4-lane f64 SIMD batch.
//!
//! `F64x4` wraps an `__m256d` register holding four double-precision values.
//! Comparisons produce an `M64x4` register mask (all bits set per true lane)
//! and masked operations go through `_mm256_maskload_pd` and
//! `_mm256_blendv_pd`.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: AVX2-capable x86 processors (Haswell and later)
//! - **Target Architecture**: x86 or x86_64
//! - **Runtime Detection**: `build.rs` emits the `avx2` cfg flag for native builds

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Not, Sub};

use crate::simd::traits::{ElementAligned, SimdBatch, SimdMask};

/// Number of f64 elements in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// Alignment at which `_mm256_load_pd` may be used instead of the unaligned load.
pub(crate) const AVX_ALIGNMENT: usize = 32;

#[inline(always)]
fn is_aligned(ptr: *const f64) -> bool {
    (ptr as usize) % AVX_ALIGNMENT == 0
}

/// Register mask for [`F64x4`]: each lane is all ones (true) or all zeros.
#[derive(Copy, Clone, Debug)]
pub struct M64x4 {
    mask: __m256d,
}

impl M64x4 {
    #[inline(always)]
    fn from_bits(bits: [i64; LANE_COUNT]) -> Self {
        Self {
            mask: unsafe {
                _mm256_castsi256_pd(_mm256_setr_epi64x(bits[0], bits[1], bits[2], bits[3]))
            },
        }
    }

    #[inline(always)]
    fn to_bits(self) -> [i64; LANE_COUNT] {
        let mut bits = [0i64; LANE_COUNT];
        unsafe {
            _mm256_storeu_si256(bits.as_mut_ptr() as *mut __m256i, _mm256_castpd_si256(self.mask));
        }
        bits
    }

    /// One bit per lane, lane 0 in bit 0.
    #[inline(always)]
    fn movemask(self) -> i32 {
        unsafe { _mm256_movemask_pd(self.mask) }
    }
}

impl Default for M64x4 {
    fn default() -> Self {
        Self {
            mask: unsafe { _mm256_setzero_pd() },
        }
    }
}

impl PartialEq for M64x4 {
    fn eq(&self, other: &Self) -> bool {
        self.movemask() == other.movemask()
    }
}

impl Not for M64x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self {
            mask: unsafe { _mm256_xor_pd(self.mask, _mm256_castsi256_pd(_mm256_set1_epi64x(-1))) },
        }
    }
}

impl SimdMask for M64x4 {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self::from_bits([-(value as i64); LANE_COUNT])
    }

    #[inline(always)]
    fn test(&self, i: usize) -> bool {
        assert!(i < LANE_COUNT, "lane {i} out of range for {LANE_COUNT} lanes");
        self.movemask() & (1 << i) != 0
    }

    #[inline(always)]
    fn set(&mut self, i: usize, value: bool) {
        let mut bits = self.to_bits();
        bits[i] = -(value as i64);
        *self = Self::from_bits(bits);
    }
}

/// AVX SIMD batch containing 4 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    pub elements: __m256d,
}

impl F64x4 {
    /// Loads 4 elements, picking the aligned load when the pointer allows it.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least 4 readable f64 values.
    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match is_aligned(ptr) {
            true => Self {
                elements: _mm256_load_pd(ptr),
            },
            false => Self {
                elements: _mm256_loadu_pd(ptr),
            },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut out = [0.0f64; LANE_COUNT];
        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), self.elements) };
        out
    }
}

impl From<[f64; LANE_COUNT]> for F64x4 {
    fn from(values: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm256_loadu_pd(values.as_ptr()) },
        }
    }
}

impl Default for F64x4 {
    fn default() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_pd() },
        }
    }
}

impl SimdBatch<f64> for F64x4 {
    type Mask = M64x4;

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
        *self = unsafe { Self::load(src.as_ptr()) };
    }

    #[inline(always)]
    fn simd_eq(&self, other: &Self) -> Self::Mask {
        M64x4 {
            mask: unsafe { _mm256_cmp_pd::<_CMP_EQ_OQ>(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn simd_ne(&self, other: &Self) -> Self::Mask {
        // unordered: NaN lanes compare not-equal, mirroring scalar `!=`
        M64x4 {
            mask: unsafe { _mm256_cmp_pd::<_CMP_NEQ_UQ>(self.elements, other.elements) },
        }
    }

    #[inline(always)]
    fn masked_copy_from(&mut self, mask: Self::Mask, src: &[f64]) {
        let selected = mask.movemask();
        assert!(
            src.len() >= LANE_COUNT || selected >> src.len() == 0,
            "mask selects lanes beyond the {} source elements",
            src.len()
        );

        // Short sources go through a stack copy so the load never touches
        // memory outside the slice.
        let mut staging = [0.0f64; LANE_COUNT];
        let ptr = if src.len() >= LANE_COUNT {
            src.as_ptr()
        } else {
            staging[..src.len()].copy_from_slice(src);
            staging.as_ptr()
        };

        self.elements = unsafe {
            let loaded = _mm256_maskload_pd(ptr, _mm256_castpd_si256(mask.mask));
            _mm256_blendv_pd(self.elements, loaded, mask.mask)
        };
    }

    #[inline(always)]
    fn masked_assign(&mut self, mask: Self::Mask, value: f64) {
        self.elements =
            unsafe { _mm256_blendv_pd(self.elements, _mm256_set1_pd(value), mask.mask) };
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        Self {
            elements: unsafe { _mm256_div_pd(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{all_of, none_of, where_};

    #[test]
    fn test_copy_from_full() {
        let data = [1.0, 2.0, -1.0, 10.0, 0.0];
        let mut v = F64x4::default();
        v.copy_from(&data, ElementAligned);
        assert_eq!(v.to_array(), [1.0, 2.0, -1.0, 10.0]);
    }

    #[test]
    fn test_copy_from_unaligned_offset() {
        let data = [0.5, 1.0, 2.0, 3.0, 4.0];
        let mut v = F64x4::default();
        v.copy_from(&data[1..], ElementAligned);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    #[should_panic(expected = "source holds 3 elements, batch needs 4")]
    fn test_copy_from_short_panics() {
        let mut v = F64x4::default();
        v.copy_from(&[1.0, 2.0, 3.0], ElementAligned);
    }

    #[test]
    fn test_lane_round_trip() {
        let mut v = F64x4::default();
        v.set_lane(2, -3.5);
        assert_eq!(v.to_array(), [0.0, 0.0, -3.5, 0.0]);
        assert_eq!(v.lane(2), -3.5);
    }

    #[test]
    fn test_mask_lanes() {
        let mut mask = M64x4::splat(false);
        mask.set(1, true);
        assert!(!mask.test(0));
        assert!(mask.test(1));
        assert_eq!((!mask).movemask(), 0b1101);
        assert!(all_of(M64x4::splat(true)));
        assert!(none_of(M64x4::default()));
    }

    #[test]
    fn test_masked_load_short_source() {
        let mut v = F64x4::from([9.0; 4]);
        let mut mask = M64x4::splat(false);
        for i in 0..3 {
            mask.set(i, true);
        }
        where_(mask, &mut v).copy_from(&[0.0, 1.0, -2.0], ElementAligned);
        where_(!mask, &mut v).assign(0.0);
        assert_eq!(v.to_array(), [0.0, 1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_add_and_compare() {
        let a = F64x4::from([1.0, 2.0, -1.0, 10.0]);
        let b = F64x4::from([1.0, 2.0, 1.0, 1.0]);
        let sum = a + b;
        assert_eq!(sum.to_array(), [2.0, 4.0, 0.0, 11.0]);
        assert!(all_of(sum.simd_eq(&F64x4::from([2.0, 4.0, 0.0, 11.0]))));
        assert!(none_of(sum.simd_ne(&sum)));
    }

    #[test]
    fn test_nan_lanes_compare_not_equal() {
        let a = F64x4::from([f64::NAN, 1.0, 1.0, 1.0]);
        assert!(!a.simd_eq(&a).test(0));
        assert!(a.simd_ne(&a).test(0));
    }
}
