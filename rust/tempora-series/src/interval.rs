//! The atomic unit of sparse storage.

use std::ops::Range;

use tempora_common::{Result, error::Error};

use crate::position::Position;

/// An immutable value attached to the half-open range `[begin, end)`.
///
/// An interval is never empty: `begin < end` holds for every constructed
/// instance. Either bound may be one of the position domain's infinities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval<V, P> {
    value: V,
    range: Range<P>,
}

impl<V, P: Position> Interval<V, P> {
    /// Creates an interval, failing with `InvalidRange` unless `begin < end`.
    pub fn new(value: V, begin: P, end: P) -> Result<Self> {
        if begin < end {
            Ok(Self {
                value,
                range: begin..end,
            })
        } else {
            Err(Error::invalid_range(
                format!("{begin:?}"),
                format!("{end:?}"),
            ))
        }
    }

    /// Builds an interval from a run that is already known to be non-empty.
    pub(crate) fn from_run(value: V, range: Range<P>) -> Self {
        debug_assert!(range.start < range.end);
        Self { value, range }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn begin(&self) -> P {
        self.range.start
    }

    pub fn end(&self) -> P {
        self.range.end
    }

    pub fn range(&self) -> Range<P> {
        self.range.clone()
    }

    pub fn contains(&self, pos: P) -> bool {
        self.range.start <= pos && pos < self.range.end
    }

    /// Borrows this interval as a `(value, range)` run.
    pub fn as_run(&self) -> (&V, Range<P>) {
        (&self.value, self.range.clone())
    }

    pub fn into_run(self) -> (V, Range<P>) {
        (self.value, self.range)
    }
}
