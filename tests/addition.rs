//! The f64 addition scenario: two seven-element operand streams checked
//! under one- and four-lane configurations.

use lanecheck::check::{
    check_addition, check_binary_op_one_loader, ChunkStats, DeviceChecker, Host, HostChecker,
    LoadAsScalars, LoadElementAligned, LoadMasked, Loader, Plus,
};
use lanecheck::simd::{Fixed, Scalar, Simd, SimdBatch};
use lanecheck::MismatchPolicy;

const FIRST: [f64; 7] = [1.0, 2.0, -1.0, 10.0, 0.0, 1.0, -2.0];
const SECOND: [f64; 7] = [1.0, 2.0, 1.0, 1.0, 0.0, -3.0, -2.0];
const EXPECTED: [f64; 7] = [2.0, 4.0, 0.0, 11.0, 0.0, -2.0, -4.0];

fn checker() -> HostChecker {
    HostChecker::new(MismatchPolicy::Panic)
}

/// Sums chunk `offset..offset + 4` with `loader`, or `None` if it declines.
fn sum_chunk<L: Loader>(loader: L, offset: usize) -> Option<[f64; 4]> {
    let lanes = (FIRST.len() - offset).min(4);
    let mut a: Simd<f64, Fixed<4>> = Default::default();
    let mut b: Simd<f64, Fixed<4>> = Default::default();
    let loaded_a = loader.load(&FIRST[offset..], lanes, &mut a);
    let loaded_b = loader.load(&SECOND[offset..], lanes, &mut b);
    (loaded_a && loaded_b).then(|| (a + b).to_array())
}

#[test]
fn test_width_one_every_loader_matches_expected() {
    for (i, expected) in EXPECTED.iter().enumerate() {
        for loaded in [
            load_one(LoadElementAligned, i),
            load_one(LoadMasked, i),
            load_one(LoadAsScalars, i),
        ] {
            assert_eq!(loaded, Some(*expected), "element {i}");
        }
    }
}

fn load_one<L: Loader>(loader: L, i: usize) -> Option<f64> {
    let mut a: Simd<f64, Scalar> = Default::default();
    let mut b: Simd<f64, Scalar> = Default::default();
    let loaded = loader.load(&FIRST[i..], 1, &mut a) && loader.load(&SECOND[i..], 1, &mut b);
    loaded.then(|| (a + b).lane(0))
}

#[test]
fn test_width_four_first_chunk_is_full() {
    let expected = [2.0, 4.0, 0.0, 11.0];
    assert_eq!(sum_chunk(LoadElementAligned, 0), Some(expected));
    assert_eq!(sum_chunk(LoadMasked, 0), Some(expected));
    assert_eq!(sum_chunk(LoadAsScalars, 0), Some(expected));
}

#[test]
fn test_width_four_tail_chunk() {
    // three valid lanes: element-aligned declines, the others zero-fill lane 3
    assert_eq!(sum_chunk(LoadElementAligned, 4), None);
    assert_eq!(sum_chunk(LoadMasked, 4), Some([0.0, -2.0, -4.0, 0.0]));
    assert_eq!(sum_chunk(LoadAsScalars, 4), Some([0.0, -2.0, -4.0, 0.0]));
}

#[test]
fn test_width_one_scenario_counts() {
    assert_eq!(
        check_addition::<Host, Scalar>(&checker()),
        ChunkStats { compared: 21, skipped: 0 }
    );
}

#[test]
fn test_width_four_scenario_counts() {
    assert_eq!(
        check_addition::<Host, Fixed<4>>(&checker()),
        ChunkStats { compared: 5, skipped: 1 }
    );
    assert_eq!(
        check_addition::<lanecheck::check::Device, Fixed<4>>(&DeviceChecker),
        ChunkStats { compared: 5, skipped: 1 }
    );
}

#[test]
fn test_element_aligned_declines_only_the_tail() {
    let stats = check_binary_op_one_loader::<Host, Fixed<4>, LoadElementAligned, _, _>(
        &checker(),
        &Plus,
        &FIRST,
        &SECOND,
    );
    assert_eq!(stats, ChunkStats { compared: 1, skipped: 1 });
}

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
#[test]
fn test_native_avx_scenario() {
    assert_eq!(
        check_addition::<Host, lanecheck::simd::Avx2>(&checker()),
        ChunkStats { compared: 5, skipped: 1 }
    );
}

#[cfg(all(neon, target_arch = "aarch64"))]
#[test]
fn test_native_neon_scenario() {
    // 7 elements in 2-lane chunks: 4 chunks, the last one partial
    assert_eq!(
        check_addition::<Host, lanecheck::simd::Neon>(&checker()),
        ChunkStats { compared: 11, skipped: 1 }
    );
}
