//! ABI-set dispatch and the shipped check scenarios.
//!
//! A configuration set is a slice of [`AbiKind`] descriptors. Dispatch
//! peels the first descriptor, maps it to its marker type with a `match`
//! (one monomorphized check per configuration), and recurses on the rest
//! until the slice is empty.

use crate::check::checker::{DeviceChecker, HostChecker};
use crate::check::device;
use crate::check::driver::{check_binary_op_all_loaders, ChunkStats};
use crate::check::ops::Plus;
use crate::check::space::{Device, Event, ExecutionSpace, Host};
use crate::config::CheckConfig;
use crate::error::Result;
use crate::simd::{AbiKind, Fixed, Scalar, SimdAbi};

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
use crate::simd::Avx2;

#[cfg(all(neon, target_arch = "aarch64"))]
use crate::simd::Neon;

const ADDITION_FIRST_ARGS: [f64; 7] = [1.0, 2.0, -1.0, 10.0, 0.0, 1.0, -2.0];
const ADDITION_SECOND_ARGS: [f64; 7] = [1.0, 2.0, 1.0, 1.0, 0.0, -3.0, -2.0];

/// Outcome of dispatching over a configuration set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Per-configuration chunk counts, in dispatch order.
    pub runs: Vec<(AbiKind, ChunkStats)>,
}

impl CheckSummary {
    pub fn abis(&self) -> Vec<AbiKind> {
        self.runs.iter().map(|(kind, _)| *kind).collect()
    }

    pub fn total(&self) -> ChunkStats {
        self.runs
            .iter()
            .fold(ChunkStats::default(), |total, (_, stats)| total + *stats)
    }

    fn merge(mut self, other: CheckSummary) -> CheckSummary {
        self.runs.extend(other.runs);
        self
    }
}

/// `f64` addition over two fixed streams of seven elements, with every
/// loader.
pub fn check_addition<S, A>(checker: &S::Checker) -> ChunkStats
where
    S: ExecutionSpace,
    A: SimdAbi<f64>,
{
    check_binary_op_all_loaders::<S, A, _, _>(
        checker,
        &Plus,
        &ADDITION_FIRST_ARGS,
        &ADDITION_SECOND_ARGS,
    )
}

/// Every scenario for one configuration.
pub fn check_abi_type<S, A>(checker: &S::Checker) -> ChunkStats
where
    S: ExecutionSpace,
    A: SimdAbi<f64>,
{
    check_addition::<S, A>(checker)
}

/// Every scenario for the configuration `kind` describes.
///
/// # Panics
///
/// Panics if `kind` was not compiled into this build, or is native and `S`
/// cannot run native configurations.
pub fn check_abi<S: ExecutionSpace>(kind: AbiKind, checker: &S::Checker) -> ChunkStats {
    assert!(
        kind.is_compiled() && (S::NATIVE_ABIS || !kind.is_native()),
        "ABI {kind} is not available in the {} context",
        S::NAME
    );

    S::report(Event::AbiStarted(kind));
    match kind {
        AbiKind::Scalar => check_abi_type::<S, Scalar>(checker),
        AbiKind::Fixed2 => check_abi_type::<S, Fixed<2>>(checker),
        AbiKind::Fixed4 => check_abi_type::<S, Fixed<4>>(checker),
        AbiKind::Fixed8 => check_abi_type::<S, Fixed<8>>(checker),
        #[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
        AbiKind::Avx2 => check_abi_type::<S, Avx2>(checker),
        #[cfg(all(neon, target_arch = "aarch64"))]
        AbiKind::Neon => check_abi_type::<S, Neon>(checker),
        _ => unreachable!("availability of {kind} checked above"),
    }
}

/// Checks every configuration of `set` in order.
pub fn check_abis<S: ExecutionSpace>(set: &[AbiKind], checker: &S::Checker) -> CheckSummary {
    let mut summary = CheckSummary::default();
    check_abis_into::<S>(set, checker, &mut summary);
    summary
}

fn check_abis_into<S: ExecutionSpace>(
    set: &[AbiKind],
    checker: &S::Checker,
    summary: &mut CheckSummary,
) {
    match set {
        [] => {}
        [first, rest @ ..] => {
            let stats = check_abi::<S>(*first, checker);
            summary.runs.push((*first, stats));
            check_abis_into::<S>(rest, checker, summary);
        }
    }
}

/// Host entry point: checks the configurations of `set` selected by
/// `config` with a [`HostChecker`] using `config`'s mismatch policy.
pub fn host_check_abis(set: &[AbiKind], config: &CheckConfig) -> Result<CheckSummary> {
    let selected = config.select(set, Host::NAME)?;
    let checker = HostChecker::new(config.on_mismatch);
    Ok(check_abis::<Host>(&selected, &checker))
}

/// Device entry point: launches one work item per selected configuration.
///
/// The mismatch policy does not apply; a failure halts the launch.
pub fn device_check_abis(set: &[AbiKind], config: &CheckConfig) -> Result<CheckSummary> {
    let selected = config.select(set, Device::NAME)?;
    Ok(device::parallel_reduce(
        selected.len(),
        |i| check_abis::<Device>(&selected[i..=i], &DeviceChecker),
        CheckSummary::default,
        CheckSummary::merge,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MismatchPolicy;
    use crate::simd::{device_abi_set, host_abi_set};

    fn panicking() -> CheckConfig {
        CheckConfig::default().with_policy(MismatchPolicy::Panic)
    }

    #[test]
    fn test_empty_set_does_nothing() {
        let summary = check_abis::<Host>(&[], &HostChecker::default());
        assert_eq!(summary, CheckSummary::default());
        assert_eq!(summary.total(), ChunkStats::default());
    }

    #[test]
    fn test_each_abi_once_in_order() {
        let set = [AbiKind::Fixed8, AbiKind::Scalar, AbiKind::Fixed2];
        let summary = host_check_abis(&set, &panicking()).unwrap();
        assert_eq!(summary.abis(), set.to_vec());
    }

    #[test]
    fn test_addition_chunk_counts() {
        let checker = HostChecker::new(MismatchPolicy::Panic);
        assert_eq!(
            check_addition::<Host, Scalar>(&checker),
            ChunkStats { compared: 21, skipped: 0 }
        );
        assert_eq!(
            check_addition::<Host, Fixed<4>>(&checker),
            ChunkStats { compared: 5, skipped: 1 }
        );
    }

    #[test]
    fn test_host_set_passes() {
        let summary = host_check_abis(host_abi_set(), &panicking()).unwrap();
        assert_eq!(summary.abis(), host_abi_set().to_vec());
        for (kind, stats) in &summary.runs {
            let chunks = 7usize.div_ceil(kind.width());
            let declined = usize::from(7 % kind.width() != 0);
            assert_eq!(stats.compared, 3 * chunks - declined, "{kind}");
            assert_eq!(stats.skipped, declined, "{kind}");
        }
    }

    #[test]
    fn test_device_set_passes_in_order() {
        let summary = device_check_abis(device_abi_set(), &CheckConfig::default()).unwrap();
        assert_eq!(summary.abis(), device_abi_set().to_vec());
    }

    #[test]
    fn test_device_rejects_filtered_native_abi() {
        let config = CheckConfig::default().with_abis([AbiKind::Avx2]);
        assert!(device_check_abis(device_abi_set(), &config).is_err());
    }

    #[test]
    #[should_panic(expected = "is not available in the device context")]
    fn test_device_refuses_native_descriptor() {
        check_abi::<Device>(AbiKind::Neon, &DeviceChecker);
    }
}
