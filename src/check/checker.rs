//! Equality assertion backends.
//!
//! The comparison driver is written once against [`Checker`] and runs with
//! either backend:
//!
//! - [`HostChecker`] reports failures as structured [`CheckFailure`]s (log
//!   record plus panic message naming the failed check and the caller's
//!   location). An elementwise mismatch is escalated per [`MismatchPolicy`],
//!   by default to an immediate process abort.
//! - [`DeviceChecker`] only has [`device_assert`], which halts the running
//!   kernel on a false condition and carries no values.

use std::fmt::{self, Debug, Display};
use std::panic::Location;

use crate::config::MismatchPolicy;
use crate::error::CheckFailure;
use crate::simd::{all_of, none_of, SimdBatch, SimdElement};

/// The two assertions the comparison driver needs.
pub trait Checker: Sync {
    /// Fails the run if `x` is false.
    fn truth(&self, x: bool);

    /// Fails the run if `expected != computed`.
    fn equality<T: PartialEq + Debug>(&self, expected: &T, computed: &T);

    /// [`truth`](Checker::truth), with `what` describing the check for the
    /// failure report.
    #[track_caller]
    fn truth_at(&self, x: bool, _what: fmt::Arguments<'_>) {
        self.truth(x);
    }

    /// [`equality`](Checker::equality), with `what` describing the compared
    /// values for the failure report.
    #[track_caller]
    fn equality_at<T: PartialEq + Debug>(
        &self,
        expected: &T,
        computed: &T,
        _what: fmt::Arguments<'_>,
    ) {
        self.equality(expected, computed);
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HostChecker {
    on_mismatch: MismatchPolicy,
}

impl HostChecker {
    pub fn new(on_mismatch: MismatchPolicy) -> Self {
        Self { on_mismatch }
    }

    pub fn on_mismatch(&self) -> MismatchPolicy {
        self.on_mismatch
    }

    fn fail_truth(&self, check: String) -> ! {
        let failure = CheckFailure::Truth { check };
        log::error!("{failure}");
        panic!("{failure}");
    }

    fn fail_mismatch(&self, failure: CheckFailure) {
        log::error!("{failure}");

        match self.on_mismatch {
            MismatchPolicy::Abort => {
                eprintln!("{failure}");
                std::process::abort();
            }
            MismatchPolicy::Panic => panic!("{failure}"),
        }
    }
}

impl Checker for HostChecker {
    #[track_caller]
    fn truth(&self, x: bool) {
        if !x {
            self.fail_truth(format!("batch reduction ({})", Location::caller()));
        }
    }

    #[track_caller]
    fn equality<T: PartialEq + Debug>(&self, expected: &T, computed: &T) {
        if expected != computed {
            self.fail_mismatch(CheckFailure::Mismatch {
                expected: format!("{expected:?}"),
                computed: format!("{computed:?}"),
                site: Location::caller().to_string(),
            });
        }
    }

    #[track_caller]
    fn truth_at(&self, x: bool, what: fmt::Arguments<'_>) {
        if !x {
            self.fail_truth(format!("batch reduction {what} ({})", Location::caller()));
        }
    }

    #[track_caller]
    fn equality_at<T: PartialEq + Debug>(
        &self,
        expected: &T,
        computed: &T,
        what: fmt::Arguments<'_>,
    ) {
        if expected != computed {
            self.fail_mismatch(CheckFailure::Mismatch {
                expected: format!("{expected:?}"),
                computed: format!("{computed:?}"),
                site: format!("{what}, {}", Location::caller()),
            });
        }
    }
}

/// Halts the current device kernel if `condition` is false.
#[inline(always)]
pub fn device_assert(condition: bool) {
    if !condition {
        device_halt();
    }
}

#[cold]
#[inline(never)]
fn device_halt() -> ! {
    panic!("device assertion failed")
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceChecker;

impl Checker for DeviceChecker {
    #[inline(always)]
    fn truth(&self, x: bool) {
        device_assert(x);
    }

    #[inline(always)]
    fn equality<T: PartialEq + Debug>(&self, expected: &T, computed: &T) {
        device_assert(expected == computed);
    }
}

/// Asserts that two batches agree, three ways: the `==` reduction holds on
/// every lane, the `!=` reduction holds on none, and every lane compares
/// equal on its own.
#[track_caller]
pub fn check_equality<C, T, V>(checker: &C, expected: &V, computed: &V)
where
    C: Checker,
    T: SimdElement,
    V: SimdBatch<T>,
{
    check_equality_at::<C, T, V>(checker, Location::caller(), expected, computed);
}

/// [`check_equality`] with `site` naming the compared batches in failure
/// reports, e.g. a driver's [`ChunkSite`](crate::check::driver::ChunkSite).
pub fn check_equality_at<C, T, V>(checker: &C, site: impl Display, expected: &V, computed: &V)
where
    C: Checker,
    T: SimdElement,
    V: SimdBatch<T>,
{
    checker.truth_at(
        all_of(expected.simd_eq(computed)),
        format_args!("all_of(expected == computed) over {site}"),
    );
    checker.truth_at(
        none_of(expected.simd_ne(computed)),
        format_args!("none_of(expected != computed) over {site}"),
    );
    for i in 0..V::LANES {
        checker.equality_at(
            &expected.lane(i),
            &computed.lane(i),
            format_args!("lane {i} of {site}"),
        );
    }
}
