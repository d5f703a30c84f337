//! Lane loaders.
//!
//! A loader fills one batch from the front of a scalar buffer of which only
//! the first `n` elements are valid. The three strategies exercise the bulk
//! load, the masked load and lane-by-lane writes of the batch type.

use crate::simd::{where_, ElementAligned, SimdBatch, SimdElement, SimdMask};

pub trait Loader: Default {
    const NAME: &'static str;

    /// Loads up to `n` elements of `src` into `out`.
    ///
    /// Returns `false` when the strategy declines the chunk; `out` is then
    /// left untouched. `src` must hold at least `n` elements.
    fn load<T: SimdElement, V: SimdBatch<T>>(&self, src: &[T], n: usize, out: &mut V) -> bool;
}

/// Bulk load of a full batch; declines trailing partial chunks.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoadElementAligned;

impl Loader for LoadElementAligned {
    const NAME: &'static str = "element_aligned";

    #[inline(always)]
    fn load<T: SimdElement, V: SimdBatch<T>>(&self, src: &[T], n: usize, out: &mut V) -> bool {
        if n < V::LANES {
            return false;
        }
        out.copy_from(&src[..V::LANES], ElementAligned);
        true
    }
}

/// Masked load of the first `n` lanes, zero elsewhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoadMasked;

impl Loader for LoadMasked {
    const NAME: &'static str = "masked";

    #[inline(always)]
    fn load<T: SimdElement, V: SimdBatch<T>>(&self, src: &[T], n: usize, out: &mut V) -> bool {
        let n = n.min(V::LANES);
        let mut mask: V::Mask = Default::default();
        for i in 0..n {
            mask.set(i, true);
        }
        where_(mask, out).copy_from(&src[..n], ElementAligned);
        where_(!mask, out).assign(T::zero());
        true
    }
}

/// Lane-by-lane writes of the first `n` lanes, zero elsewhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct LoadAsScalars;

impl Loader for LoadAsScalars {
    const NAME: &'static str = "as_scalars";

    #[inline(always)]
    fn load<T: SimdElement, V: SimdBatch<T>>(&self, src: &[T], n: usize, out: &mut V) -> bool {
        let n = n.min(V::LANES);
        for (i, &value) in src[..n].iter().enumerate() {
            out.set_lane(i, value);
        }
        for i in n..V::LANES {
            out.set_lane(i, T::zero());
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::FixedSimd;

    const TAIL: [f64; 3] = [0.0, 1.0, -2.0];

    fn dirty() -> FixedSimd<f64, 4> {
        FixedSimd::from_array([9.0; 4])
    }

    #[test]
    fn test_element_aligned_full_chunk() {
        let mut out = dirty();
        assert!(LoadElementAligned.load(&[1.0, 2.0, -1.0, 10.0, 0.0], 4, &mut out));
        assert_eq!(out.to_array(), [1.0, 2.0, -1.0, 10.0]);
    }

    #[test]
    fn test_element_aligned_declines_partial_chunk() {
        let mut out = dirty();
        assert!(!LoadElementAligned.load(&TAIL, 3, &mut out));
        assert_eq!(out.to_array(), [9.0; 4], "declined load must not write");
    }

    #[test]
    fn test_masked_zero_fills_tail() {
        let mut out = dirty();
        assert!(LoadMasked.load(&TAIL, 3, &mut out));
        assert_eq!(out.to_array(), [0.0, 1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_scalars_zero_fills_tail() {
        let mut out = dirty();
        assert!(LoadAsScalars.load(&TAIL, 3, &mut out));
        assert_eq!(out.to_array(), [0.0, 1.0, -2.0, 0.0]);
    }

    #[test]
    fn test_loaders_ignore_elements_past_n() {
        // only two of the three elements are valid for this chunk
        let mut masked = dirty();
        let mut scalars = dirty();
        assert!(LoadMasked.load(&[4.0, 5.0, 6.0], 2, &mut masked));
        assert!(LoadAsScalars.load(&[4.0, 5.0, 6.0], 2, &mut scalars));
        assert_eq!(masked.to_array(), [4.0, 5.0, 0.0, 0.0]);
        assert_eq!(scalars.to_array(), masked.to_array());
    }

    #[test]
    fn test_masked_never_writes_past_width() {
        let mut out = FixedSimd::<i64, 2>::default();
        assert!(LoadMasked.load(&[1, 2, 3, 4], 4, &mut out));
        assert_eq!(out.to_array(), [1, 2]);
    }

    #[test]
    fn test_zero_valid_lanes() {
        let mut out = dirty();
        assert!(LoadAsScalars.load::<f64, _>(&[], 0, &mut out));
        assert_eq!(out.to_array(), [0.0; 4]);
        assert!(!LoadElementAligned.load::<f64, _>(&[], 0, &mut dirty()));
    }
}
