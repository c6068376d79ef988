//! Iterator adapters for working with streams of `(value, Range<T>)` runs.
//!
//! # Provided Adapters
//!
//! - [`ClampedRuns`](clamp::ClampedRuns): Trims every run to a fixed window, dropping
//!   runs that fall outside of it.
//! - [`CoalescedRuns`](coalesce::CoalescedRuns): Fuses touching runs with equal values.
//!
//! The [`RunIteratorsExt`] trait is implemented for all iterators over runs,
//! providing convenient methods to construct these adapters.

use std::ops::Range;

pub mod clamp;
pub mod coalesce;

/// Extension trait for more idiomatic usage of the run iterator adapters.
pub trait RunIteratorsExt<V, T>: Iterator<Item = (V, Range<T>)> + Sized {
    /// Adapts a run iterator to yield only the parts of each run that fall
    /// inside `window`.
    ///
    /// Runs that do not intersect `window` are skipped; the others have their
    /// bounds clamped into it. An empty `window` yields nothing.
    fn clamp_to(self, window: Range<T>) -> clamp::ClampedRuns<Self, T> {
        clamp::ClampedRuns::new(self, window)
    }

    /// Adapts a run iterator so that runs which touch (`prev.end == next.start`)
    /// and carry equal values are yielded as a single run.
    fn coalesce_runs(self) -> coalesce::CoalescedRuns<Self, V, T> {
        coalesce::CoalescedRuns::new(self)
    }
}

impl<V, T, I: Iterator<Item = (V, Range<T>)>> RunIteratorsExt<V, T> for I {}
