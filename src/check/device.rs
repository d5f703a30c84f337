//! Device kernel launch.
//!
//! Work items of a launch run on the rayon pool. They may only read shared
//! data; a failed [`device_assert`](crate::check::checker::device_assert)
//! halts its work item and the panic resurfaces at the launch site, ending
//! the run.

use rayon::prelude::*;

/// Runs `kernel(i)` for every `i` in `0..n` and folds the results with
/// `join`, keeping index order. `join` must be associative and `identity()`
/// its neutral element.
pub fn parallel_reduce<R, F, I, J>(n: usize, kernel: F, identity: I, join: J) -> R
where
    R: Send,
    F: Fn(usize) -> R + Sync + Send,
    I: Fn() -> R + Sync + Send,
    J: Fn(R, R) -> R + Sync + Send,
{
    (0..n).into_par_iter().map(kernel).reduce(identity, join)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_parallel_reduce_runs_every_item_once() {
        let hits: Vec<AtomicUsize> = (0..64).map(|_| AtomicUsize::new(0)).collect();
        let total = parallel_reduce(
            hits.len(),
            |i| hits[i].fetch_add(1, Ordering::Relaxed) + 1,
            || 0,
            |a, b| a + b,
        );
        assert_eq!(total, 64);
        assert!(hits.iter().all(|h| h.load(Ordering::Relaxed) == 1));
    }

    #[test]
    fn test_parallel_reduce_keeps_order() {
        let order = parallel_reduce(
            100,
            |i| vec![i],
            Vec::new,
            |mut left, right| {
                left.extend(right);
                left
            },
        );
        assert_eq!(order, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_launch() {
        let total = parallel_reduce(
            0,
            |_| -> usize { panic!("no work items expected") },
            || 0,
            |a, b| a + b,
        );
        assert_eq!(total, 0);
    }

    #[test]
    #[should_panic(expected = "device assertion failed")]
    fn test_halt_propagates_to_launch_site() {
        parallel_reduce(
            8,
            |i| crate::check::checker::device_assert(i != 5),
            || (),
            |_, _| (),
        );
    }
}
