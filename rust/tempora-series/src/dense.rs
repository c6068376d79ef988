//! Array-backed series over a regular grid.

use std::{iter::Enumerate, mem, ops::Range, slice};

use num_traits::Zero;
use tempora_common::{Result, error::Error};

use crate::{config::SeriesConfig, position::Position, sparse::SparseSeries};

/// A series that materializes one value per grid position over a contiguous,
/// finite span.
///
/// The grid is anchored at `P::ZERO`: addressable positions are the integral
/// multiples of the discretization. Values are stored for the positions
/// `origin, origin + step, origin + 2 * step, ...`; every position outside the
/// materialized span `[origin, origin + len * step)` reads as the default.
///
/// Point reads at positions that are not on the grid fail with `Misaligned`
/// rather than being floored to the nearest slot.
#[derive(Debug, Clone)]
pub struct DenseSeries<V, P = i64> {
    config: SeriesConfig<V, P>,
    /// First materialized position. Meaningless while `values` is empty.
    origin: P,
    values: Vec<V>,
}

impl<V: Zero + Clone, P: Position> Default for DenseSeries<V, P> {
    fn default() -> Self {
        Self {
            config: SeriesConfig::default(),
            origin: P::ZERO,
            values: Vec::new(),
        }
    }
}

/// Two dense series are equal when their configurations and their materialized
/// values are equal element-wise, starting at the same origin.
impl<V: PartialEq, P: PartialEq> PartialEq for DenseSeries<V, P> {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.values == other.values
            && (self.values.is_empty() || self.origin == other.origin)
    }
}

impl<V: Clone, P: Position> DenseSeries<V, P> {
    /// Creates a series with an empty materialized span.
    pub fn new(config: SeriesConfig<V, P>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            origin: P::ZERO,
            values: Vec::new(),
        })
    }

    /// Creates a series holding `value` at every grid position of `[begin, end)`.
    ///
    /// Both bounds must be finite and on the grid. Equal bounds produce an empty
    /// span.
    pub fn filled(begin: P, end: P, value: V, config: SeriesConfig<V, P>) -> Result<Self> {
        let mut series = Self::new(config)?;
        if begin == end && begin.is_finite() {
            return Ok(series);
        }
        series.check_write(&(begin..end))?;
        let count = series.slot_count(begin, end)?;
        let mut values = reserve_slots(count, &(begin..end))?;
        values.resize(count, value);
        series.origin = begin;
        series.values = values;
        Ok(series)
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

    pub fn origin(&self) -> P {
        self.origin
    }

    /// End of the materialized span.
    pub fn end(&self) -> P {
        self.origin
            .offset(self.values.len() as i64, self.config.discretization)
    }

    /// The materialized span, or `None` while nothing is materialized.
    pub fn span(&self) -> Option<Range<P>> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.origin..self.end())
        }
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `pos`.
    ///
    /// Infinite positions and positions outside the materialized span read as
    /// the default; finite positions off the grid fail with `Misaligned`.
    pub fn get(&self, pos: P) -> Result<&V> {
        if !pos.is_finite() {
            return Ok(&self.config.default);
        }
        self.check_aligned(pos)?;
        Ok(self.value_at_slot(self.slot_of(pos)))
    }

    /// Iterates over the materialized slots as runs of width `discretization`.
    pub fn runs(&self) -> DenseRuns<'_, V, P> {
        DenseRuns {
            origin: self.origin,
            step: self.config.discretization,
            values: self.values.iter().enumerate(),
        }
    }

    pub fn first_run(&self) -> Option<(&V, Range<P>)> {
        self.runs().next()
    }

    pub fn last_run(&self) -> Option<(&V, Range<P>)> {
        self.runs().next_back()
    }

    /// Converts into a sparse series with the same readings. Neighbouring slots
    /// holding equal values become a single interval.
    pub fn to_sparse(&self) -> SparseSeries<V, P>
    where
        V: PartialEq,
    {
        SparseSeries::from_runs(
            self.config.clone(),
            self.runs().map(|(value, range)| (value.clone(), range)),
        )
    }

    /// Applies `f` to every materialized value and to the default.
    pub fn map<U, F>(&self, mut f: F) -> DenseSeries<U, P>
    where
        F: FnMut(&V) -> U,
    {
        DenseSeries {
            config: SeriesConfig::new(self.config.discretization, f(&self.config.default)),
            origin: self.origin,
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Builds a series from ordered, non-overlapping segments whose bounds are
    /// finite and on the grid. Gaps between segments hold the default.
    ///
    /// Fails with `InvalidRange` when the covered span cannot be materialized.
    pub(crate) fn from_segments(
        config: SeriesConfig<V, P>,
        segments: &[(V, Range<P>)],
    ) -> Result<Self> {
        let mut series = Self::from_parts(config, P::ZERO, Vec::new());
        if let (Some(first), Some(last)) = (segments.first(), segments.last()) {
            series.extend_to_cover(&(first.1.start..last.1.end))?;
        }
        for (value, range) in segments {
            series.fill_slots(range.clone(), value.clone());
        }
        Ok(series)
    }

    /// Rejects writes that cannot be materialized: empty or infinite ranges,
    /// bounds off the grid, and ranges that would stretch the span past what a
    /// single buffer can address.
    pub(crate) fn check_write(&self, range: &Range<P>) -> Result<()> {
        if range.start >= range.end || !range.start.is_finite() || !range.end.is_finite() {
            return Err(Error::invalid_range(
                format!("{:?}", range.start),
                format!("{:?}", range.end),
            ));
        }
        self.check_aligned(range.start)?;
        self.check_aligned(range.end)?;
        self.covering_span(range).map(|_| ())
    }

    /// Resets `window` to the default, then applies `writes` (ordered, inside
    /// `window`, each accepted by [`check_write`](Self::check_write)). The
    /// materialized span grows to cover `window`.
    ///
    /// On error the series is left unchanged.
    pub(crate) fn replace_window(
        &mut self,
        window: Range<P>,
        writes: Vec<(V, Range<P>)>,
    ) -> Result<()> {
        self.extend_to_cover(&window)?;
        let default = self.config.default.clone();
        self.fill_slots(window, default);
        for (value, range) in writes {
            self.fill_slots(range, value);
        }
        Ok(())
    }

    pub(crate) fn with_origin(mut self, origin: P) -> Self {
        self.origin = origin;
        self
    }

    pub(crate) fn from_parts(config: SeriesConfig<V, P>, origin: P, values: Vec<V>) -> Self {
        Self {
            config,
            origin,
            values,
        }
    }

    pub(crate) fn check_aligned(&self, pos: P) -> Result<()> {
        if pos.is_aligned(self.config.discretization) {
            Ok(())
        } else {
            Err(Error::misaligned(
                format!("{pos:?}"),
                format!("{:?}", self.config.discretization),
            ))
        }
    }

    /// Signed slot index of an aligned, finite `pos` relative to the origin.
    pub(crate) fn slot_of(&self, pos: P) -> i64 {
        pos.steps_from(self.origin, self.config.discretization)
            .unwrap_or(i64::MIN)
    }

    pub(crate) fn value_at_slot(&self, slot: i64) -> &V {
        usize::try_from(slot)
            .ok()
            .and_then(|idx| self.values.get(idx))
            .unwrap_or(&self.config.default)
    }

    /// Number of grid positions in `[begin, end)` for aligned, finite bounds.
    ///
    /// Fails with `InvalidRange` when the count does not fit in `usize`, which
    /// includes spans whose step count overflows `i64`.
    pub(crate) fn slot_count(&self, begin: P, end: P) -> Result<usize> {
        end.steps_from(begin, self.config.discretization)
            .and_then(|n| usize::try_from(n.max(0)).ok())
            .ok_or_else(|| Error::invalid_range(format!("{begin:?}"), format!("{end:?}")))
    }

    /// Bounds and slot count of the span covering both the current span and
    /// `range`. Fails with `InvalidRange` when no buffer can hold that many
    /// values.
    fn covering_span(&self, range: &Range<P>) -> Result<(Range<P>, usize)> {
        let span = match self.span() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range.clone(),
        };
        let count = self.slot_count(span.start, span.end)?;
        if count > isize::MAX as usize / mem::size_of::<V>().max(1) {
            return Err(Error::invalid_range(
                format!("{:?}", span.start),
                format!("{:?}", span.end),
            ));
        }
        Ok((span, count))
    }

    /// Grows the materialized span to cover `range`, padding with the default.
    /// Nothing is modified when the grown span cannot be allocated.
    fn extend_to_cover(&mut self, range: &Range<P>) -> Result<()> {
        let (span, total) = self.covering_span(range)?;
        let default = self.config.default.clone();
        if self.values.is_empty() {
            let mut values = reserve_slots(total, &span)?;
            values.resize(total, default);
            self.origin = span.start;
            self.values = values;
            return Ok(());
        }
        let front = self.slot_count(span.start, self.origin)?;
        self.values
            .try_reserve_exact(total.saturating_sub(self.values.len()))
            .map_err(|_| span_error(&span))?;
        if front > 0 {
            self.values
                .splice(0..0, std::iter::repeat_n(default.clone(), front));
            self.origin = span.start;
        }
        self.values.resize(total, default);
        Ok(())
    }

    /// Overwrites the slots of `range` that lie inside the span.
    fn fill_slots(&mut self, range: Range<P>, value: V) {
        let len = self.values.len() as i64;
        let first = self.slot_of(range.start).clamp(0, len) as usize;
        let last = self.slot_of(range.end).clamp(0, len) as usize;
        if first < last {
            self.values[first..last].fill(value);
        }
    }
}

fn span_error<P: Position>(span: &Range<P>) -> Error {
    Error::invalid_range(format!("{:?}", span.start), format!("{:?}", span.end))
}

/// Allocates room for `count` slots of `span` without aborting on failure.
pub(crate) fn reserve_slots<V, P: Position>(count: usize, span: &Range<P>) -> Result<Vec<V>> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(count)
        .map_err(|_| span_error(span))?;
    Ok(values)
}

/// Iterator over the slots of a [`DenseSeries`] as `(value, range)` runs, each
/// one discretization step wide.
#[derive(Clone)]
pub struct DenseRuns<'a, V, P> {
    origin: P,
    step: P,
    values: Enumerate<slice::Iter<'a, V>>,
}

impl<'a, V, P: Position> DenseRuns<'a, V, P> {
    fn run_at(&self, idx: usize, value: &'a V) -> (&'a V, Range<P>) {
        let begin = self.origin.offset(idx as i64, self.step);
        (value, begin..self.origin.offset(idx as i64 + 1, self.step))
    }
}

impl<'a, V, P: Position> Iterator for DenseRuns<'a, V, P> {
    type Item = (&'a V, Range<P>);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, value) = self.values.next()?;
        Some(self.run_at(idx, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<V, P: Position> DoubleEndedIterator for DenseRuns<'_, V, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (idx, value) = self.values.next_back()?;
        Some(self.run_at(idx, value))
    }
}

impl<V, P: Position> ExactSizeIterator for DenseRuns<'_, V, P> {}

#[cfg(test)]
mod tests {
    use ordered_float::OrderedFloat;

    use super::DenseSeries;
    use crate::config::SeriesConfig;

    #[test]
    fn test_empty_series() {
        let s = DenseSeries::<i32>::default();
        assert!(s.is_empty());
        assert_eq!(s.span(), None);
        assert_eq!(s.discretization(), 1);
        assert_eq!(*s.get(5).unwrap(), 0);
        assert_eq!(*s.get(i64::MIN).unwrap(), 0);
        assert!(s.first_run().is_none());
    }

    #[test]
    fn test_filled() {
        let s = DenseSeries::filled(-1i64, 3, 42, SeriesConfig::new(1, 0)).unwrap();
        assert_eq!(s.values(), &[42, 42, 42, 42]);
        assert_eq!(s.span(), Some(-1..3));
        for pos in -2..5 {
            let expected = if (-1..3).contains(&pos) { 42 } else { 0 };
            assert_eq!(*s.get(pos).unwrap(), expected);
        }
    }

    #[test]
    fn test_filled_rejects_bad_bounds() {
        let config = SeriesConfig::<i32, i64>::new(2, 0);
        assert!(
            DenseSeries::filled(4, 2, 1, config.clone())
                .unwrap_err()
                .is_invalid_range()
        );
        assert!(
            DenseSeries::filled(i64::MIN, 2, 1, config.clone())
                .unwrap_err()
                .is_invalid_range()
        );
        assert!(
            DenseSeries::filled(1, 4, 1, config.clone())
                .unwrap_err()
                .is_misaligned()
        );
        assert!(DenseSeries::filled(2, 2, 1, config).unwrap().is_empty());
    }

    #[test]
    fn test_misaligned_read() {
        let s = DenseSeries::filled(0i64, 10, 7, SeriesConfig::new(5, 0)).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(*s.get(5).unwrap(), 7);
        assert_eq!(*s.get(10).unwrap(), 0);
        assert!(s.get(3).unwrap_err().is_misaligned());
    }

    #[test]
    fn test_replace_window_extends_span() {
        let mut s = DenseSeries::filled(0i64, 2, 9, SeriesConfig::new(1, 0)).unwrap();
        s.replace_window(-2..1, vec![(5, -2..-1)]).unwrap();
        assert_eq!(s.origin(), -2);
        assert_eq!(s.values(), &[5, 0, 0, 9]);

        s.replace_window(5..6, vec![(1, 5..6)]).unwrap();
        assert_eq!(s.values(), &[5, 0, 0, 9, 0, 0, 0, 1]);
        assert_eq!(s.end(), 6);
    }

    #[test]
    fn test_runs_and_ends() {
        let s =
            DenseSeries::from_segments(SeriesConfig::new(2i64, 0), &[(1, -2..2), (3, 4..6)]).unwrap();
        let runs: Vec<_> = s.runs().map(|(v, r)| (*v, r)).collect();
        assert_eq!(runs, vec![(1, -2..0), (1, 0..2), (0, 2..4), (3, 4..6)]);
        assert_eq!(s.first_run(), Some((&1, -2..0)));
        assert_eq!(s.last_run(), Some((&3, 4..6)));
    }

    #[test]
    fn test_to_sparse_coalesces() {
        let s =
            DenseSeries::from_segments(SeriesConfig::new(1i64, 0), &[(1, 0..3), (2, 4..5)]).unwrap();
        let sparse = s.to_sparse();
        let runs: Vec<_> = sparse.runs().map(|(v, r)| (*v, r)).collect();
        assert_eq!(runs, vec![(1, 0..3), (0, 3..4), (2, 4..5)]);
    }

    #[test]
    fn test_oversized_spans_are_rejected() {
        let config = SeriesConfig::<i32, i64>::new(1, 0);
        // The step count of this span does not fit in an i64.
        assert!(
            DenseSeries::filled(-(1 << 62), 1 << 62, 9, config.clone())
                .unwrap_err()
                .is_invalid_range()
        );
        // Addressable, but no buffer can hold 2^62 values.
        assert!(
            DenseSeries::filled(0, 1 << 62, 9, config.clone())
                .unwrap_err()
                .is_invalid_range()
        );

        let mut s = DenseSeries::filled(0i64, 2, 9, config).unwrap();
        assert!(s.check_write(&(1 << 62..(1 << 62) + 1)).unwrap_err().is_invalid_range());
        assert!(
            s.replace_window(-(1 << 62)..0, vec![(1, -1..0)])
                .unwrap_err()
                .is_invalid_range()
        );
        assert_eq!(s.origin(), 0);
        assert_eq!(s.values(), &[9, 9]);

        let segments = [(1, -(1 << 62)..0), (2, 0..(1 << 62))];
        assert!(
            DenseSeries::from_segments(SeriesConfig::new(1i64, 0), &segments)
                .unwrap_err()
                .is_invalid_range()
        );
    }

    #[test]
    fn test_float_grid() {
        let config = SeriesConfig::new(OrderedFloat(0.5), 0.0);
        let s = DenseSeries::filled(OrderedFloat(-1.0), OrderedFloat(1.0), 2.5, config).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(*s.get(OrderedFloat(0.5)).unwrap(), 2.5);
        assert_eq!(*s.get(OrderedFloat(1.0)).unwrap(), 0.0);
        assert!(s.get(OrderedFloat(0.25)).unwrap_err().is_misaligned());
    }

    #[test]
    fn test_equality_ignores_origin_of_empty() {
        let a = DenseSeries::<i32>::new(SeriesConfig::new(1, 0)).unwrap();
        let b = DenseSeries::<i32>::default().with_origin(17);
        assert_eq!(a, b);
        let c = DenseSeries::filled(0i64, 2, 1, SeriesConfig::new(1, 0)).unwrap();
        let d = DenseSeries::filled(1i64, 3, 1, SeriesConfig::new(1, 0)).unwrap();
        assert_ne!(c, d);
    }
}
