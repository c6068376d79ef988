//! Interval-list backed series.

use std::{ops::Range, slice};

use num_traits::Zero;
use tempora_common::{Result, error::Error};
use tempora_runs::RunIteratorsExt;

use crate::{config::SeriesConfig, dense::DenseSeries, interval::Interval, position::Position};

/// A series stored as an ordered list of non-overlapping [`Interval`]s.
///
/// Invariants maintained by every mutation:
/// - intervals are sorted ascending by `begin`;
/// - no two intervals overlap (`intervals[i].end <= intervals[i + 1].begin`);
/// - two intervals that touch never carry equal values (they would be one
///   interval).
///
/// Positions in the gaps between intervals, and around them, read as the
/// default. Interval bounds may be infinite.
///
/// Complexity overview:
/// - `get`: O(log n)
/// - `insert`, `erase`, `clip`: O(log n) to locate the affected intervals, plus
///   the number of intervals touched, plus the tail shift of the splice.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseSeries<V, P = i64> {
    config: SeriesConfig<V, P>,
    intervals: Vec<Interval<V, P>>,
}

impl<V: Zero, P: Position> Default for SparseSeries<V, P> {
    fn default() -> Self {
        Self {
            config: SeriesConfig::default(),
            intervals: Vec::new(),
        }
    }
}

impl<V: Clone + PartialEq, P: Position> SparseSeries<V, P> {
    pub fn new(config: SeriesConfig<V, P>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            intervals: Vec::new(),
        })
    }

    /// Builds a series from ordered, non-overlapping runs. Touching runs with
    /// equal values are fused and empty runs are dropped.
    pub(crate) fn from_runs<I>(config: SeriesConfig<V, P>, runs: I) -> Self
    where
        I: IntoIterator<Item = (V, Range<P>)>,
    {
        let intervals = runs
            .into_iter()
            .filter(|(_, range)| range.start < range.end)
            .coalesce_runs()
            .map(|(value, range)| Interval::from_run(value, range))
            .collect();
        Self { config, intervals }
    }

    pub fn config(&self) -> &SeriesConfig<V, P> {
        &self.config
    }

    pub fn discretization(&self) -> P {
        self.config.discretization
    }

    pub fn default_value(&self) -> &V {
        &self.config.default
    }

    pub fn intervals(&self) -> &[Interval<V, P>] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Tight bounds of the explicitly stored intervals.
    pub fn bounds(&self) -> Option<Range<P>> {
        match (self.intervals.first(), self.intervals.last()) {
            (Some(first), Some(last)) => Some(first.begin()..last.end()),
            _ => None,
        }
    }

    /// Returns the value at `pos`, or the default when no interval covers it.
    pub fn get(&self, pos: P) -> &V {
        let idx = self.intervals.partition_point(|iv| iv.begin() <= pos);
        match idx.checked_sub(1).map(|i| &self.intervals[i]) {
            Some(iv) if pos < iv.end() => iv.value(),
            _ => &self.config.default,
        }
    }

    /// Writes `value` over `[begin, end)`.
    ///
    /// Intervals partially overlapping the range are trimmed (or split, when
    /// the range lies strictly inside one of them), intervals fully covered are
    /// removed, and the result is fused with touching neighbours of equal value.
    pub fn insert(&mut self, value: V, begin: P, end: P) -> Result<()> {
        let interval = Interval::new(value, begin, end)?;
        self.splice_window(begin..end, vec![interval.into_run()]);
        Ok(())
    }

    /// Resets `[begin, end)` to the default by removing any stored coverage.
    pub fn erase(&mut self, begin: P, end: P) -> Result<()> {
        if begin > end {
            return Err(Error::invalid_range(
                format!("{begin:?}"),
                format!("{end:?}"),
            ));
        }
        self.splice_window(begin..end, Vec::new());
        Ok(())
    }

    pub fn runs(&self) -> SparseRuns<'_, V, P> {
        SparseRuns {
            intervals: self.intervals.iter(),
        }
    }

    pub fn first_run(&self) -> Option<(&V, Range<P>)> {
        self.intervals.first().map(Interval::as_run)
    }

    pub fn last_run(&self) -> Option<(&V, Range<P>)> {
        self.intervals.last().map(Interval::as_run)
    }

    /// Converts into a dense series spanning the stored intervals.
    ///
    /// Fails with `InvalidRange` when an interval is open-ended and with
    /// `Misaligned` when an interval bound is off the discretization grid.
    pub fn to_dense(&self) -> Result<DenseSeries<V, P>> {
        let grid = DenseSeries::new(self.config.clone())?;
        for interval in &self.intervals {
            grid.check_write(&interval.range())?;
        }
        let segments: Vec<_> = self
            .intervals
            .iter()
            .map(|iv| (iv.value().clone(), iv.range()))
            .collect();
        DenseSeries::from_segments(self.config.clone(), &segments)
    }

    /// Applies `f` to every stored value and to the default.
    pub fn map<U, F>(&self, mut f: F) -> SparseSeries<U, P>
    where
        U: Clone + PartialEq,
        F: FnMut(&V) -> U,
    {
        let default = f(&self.config.default);
        SparseSeries::from_runs(
            SeriesConfig::new(self.config.discretization, default),
            self.intervals
                .iter()
                .map(|iv| (f(iv.value()), iv.range())),
        )
    }

    /// Index range of the intervals that intersect `window`.
    pub(crate) fn search_window(&self, window: &Range<P>) -> Range<usize> {
        let lo = self
            .intervals
            .partition_point(|iv| iv.end() <= window.start);
        let hi = self
            .intervals
            .partition_point(|iv| iv.begin() < window.end);
        lo..hi.max(lo)
    }

    /// Replaces everything stored inside `window` with `middle`, a sorted run
    /// list lying within `window`, and restores the interval invariants at both
    /// edges of the window.
    pub(crate) fn splice_window(&mut self, window: Range<P>, middle: Vec<(V, Range<P>)>) {
        if window.start >= window.end {
            return;
        }
        let touched = self.search_window(&window);
        let mut start = touched.start;
        let mut stop = touched.end;
        let mut replacement = Vec::with_capacity(middle.len() + 2);

        if !touched.is_empty() && self.intervals[touched.start].begin() < window.start {
            let head = &self.intervals[touched.start];
            replacement.push((head.value().clone(), head.begin()..window.start));
        } else if start > 0 && self.intervals[start - 1].end() == window.start {
            // Touching on the left, candidate for fusion.
            start -= 1;
            replacement.push(self.intervals[start].clone().into_run());
        }

        replacement.extend(middle);

        if !touched.is_empty() && self.intervals[touched.end - 1].end() > window.end {
            let tail = &self.intervals[touched.end - 1];
            replacement.push((tail.value().clone(), window.end..tail.end()));
        } else if stop < self.intervals.len() && self.intervals[stop].begin() == window.end {
            replacement.push(self.intervals[stop].clone().into_run());
            stop += 1;
        }

        log::trace!(
            "splice window {:?}: replacing intervals {}..{} with {} runs",
            window,
            start,
            stop,
            replacement.len()
        );

        let fused: Vec<_> = replacement
            .into_iter()
            .filter(|(_, range)| range.start < range.end)
            .coalesce_runs()
            .map(|(value, range)| Interval::from_run(value, range))
            .collect();
        self.intervals.splice(start..stop, fused);
    }

    pub(crate) fn from_intervals(config: SeriesConfig<V, P>, intervals: Vec<Interval<V, P>>) -> Self {
        Self { config, intervals }
    }
}

/// Iterator over the intervals of a [`SparseSeries`] as `(value, range)` runs.
#[derive(Clone)]
pub struct SparseRuns<'a, V, P> {
    intervals: slice::Iter<'a, Interval<V, P>>,
}

impl<'a, V, P: Position> Iterator for SparseRuns<'a, V, P> {
    type Item = (&'a V, Range<P>);

    fn next(&mut self) -> Option<Self::Item> {
        self.intervals.next().map(Interval::as_run)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.intervals.size_hint()
    }
}

impl<V, P: Position> DoubleEndedIterator for SparseRuns<'_, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.intervals.next_back().map(Interval::as_run)
    }
}

impl<V, P: Position> ExactSizeIterator for SparseRuns<'_, V, P> {}

#[cfg(test)]
mod tests {
    use super::SparseSeries;
    use crate::{config::SeriesConfig, interval::Interval};

    const NEG_INF: i64 = i64::MIN;
    const POS_INF: i64 = i64::MAX;

    fn triples(s: &SparseSeries<i32>) -> Vec<(i32, i64, i64)> {
        s.intervals()
            .iter()
            .map(|iv| (*iv.value(), iv.begin(), iv.end()))
            .collect()
    }

    #[test]
    fn test_insert_disjoint_and_lookup() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 5, 7).unwrap();
        s.insert(2, -3, 0).unwrap();
        s.insert(3, 10, 11).unwrap();
        assert_eq!(triples(&s), vec![(2, -3, 0), (1, 5, 7), (3, 10, 11)]);
        assert_eq!(*s.get(-3), 2);
        assert_eq!(*s.get(-1), 2);
        assert_eq!(*s.get(0), 0);
        assert_eq!(*s.get(6), 1);
        assert_eq!(*s.get(7), 0);
        assert_eq!(*s.get(10), 3);
        assert_eq!(*s.get(NEG_INF), 0);
        assert_eq!(s.bounds(), Some(-3..11));
    }

    #[test]
    fn test_insert_splits_enclosing_interval() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 0, 10).unwrap();
        s.insert(2, 3, 5).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 3), (2, 3, 5), (1, 5, 10)]);
    }

    #[test]
    fn test_insert_trims_and_removes() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 0, 4).unwrap();
        s.insert(2, 5, 6).unwrap();
        s.insert(3, 7, 10).unwrap();
        s.insert(9, 2, 8).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 2), (9, 2, 8), (3, 8, 10)]);
    }

    #[test]
    fn test_insert_fuses_equal_neighbours() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 0, 2).unwrap();
        s.insert(1, 4, 6).unwrap();
        s.insert(1, 2, 4).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 6)]);

        // Overwriting the middle of an interval with the same value changes nothing.
        s.insert(1, 1, 3).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 6)]);

        // Trimming remnants fuse with an equal new value.
        s.insert(2, 6, 8).unwrap();
        s.insert(2, 5, 7).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 5), (2, 5, 8)]);
    }

    #[test]
    fn test_insert_rejects_empty_range() {
        let mut s = SparseSeries::<i32>::default();
        assert!(s.insert(1, 3, 3).unwrap_err().is_invalid_range());
        assert!(s.insert(1, 4, 3).unwrap_err().is_invalid_range());
        assert!(s.is_empty());
    }

    #[test]
    fn test_infinite_intervals() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(-42, NEG_INF, 0).unwrap();
        s.insert(42, 0, POS_INF).unwrap();
        assert_eq!(triples(&s), vec![(-42, NEG_INF, 0), (42, 0, POS_INF)]);
        assert_eq!(*s.get(-1_000_000), -42);
        assert_eq!(*s.get(1_000_000), 42);

        s.insert(7, -1, 1).unwrap();
        assert_eq!(
            triples(&s),
            vec![(-42, NEG_INF, -1), (7, -1, 1), (42, 1, POS_INF)]
        );
    }

    #[test]
    fn test_erase() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 0, 10).unwrap();
        s.erase(3, 5).unwrap();
        assert_eq!(triples(&s), vec![(1, 0, 3), (1, 5, 10)]);
        s.erase(NEG_INF, 4).unwrap();
        assert_eq!(triples(&s), vec![(1, 5, 10)]);
        s.erase(6, 6).unwrap();
        assert_eq!(triples(&s), vec![(1, 5, 10)]);
        assert!(s.erase(6, 5).unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_to_dense() {
        let mut s = SparseSeries::<i32>::new(SeriesConfig::new(1, -1)).unwrap();
        s.insert(3, 0, 2).unwrap();
        s.insert(4, 3, 4).unwrap();
        let d = s.to_dense().unwrap();
        assert_eq!(d.origin(), 0);
        assert_eq!(d.values(), &[3, 3, -1, 4]);
        assert_eq!(*d.default_value(), -1);

        s.insert(5, 10, POS_INF).unwrap();
        assert!(s.to_dense().unwrap_err().is_invalid_range());

        let mut wide = SparseSeries::<i32>::default();
        wide.insert(2, -(1 << 62), 1 << 62).unwrap();
        assert!(wide.to_dense().unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_map_restores_maximality() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(1, 0, 2).unwrap();
        s.insert(-1, 2, 4).unwrap();
        let abs = s.map(|v| v.abs());
        assert_eq!(abs.intervals(), &[Interval::new(1, 0, 4).unwrap()]);
    }
}
