//! Restriction of a series to a half-open window.
//!
//! Clipping never changes the representation: a dense series clips to a dense
//! series and a sparse series to a sparse one. The clipped series keeps the
//! discretization and the default of its source. Indexing by a range
//! ([`Clip::window`]) is the same operation.

use std::ops::Range;

use tempora_common::{Result, error::Error};
use tempora_runs::RunIteratorsExt;

use crate::{
    dense::{DenseSeries, reserve_slots},
    interval::Interval, position::Position, series::Series,
    sparse::SparseSeries,
};

/// Windowing over a series representation.
pub trait Clip<P: Position> {
    type Output;

    /// Restricts the series to `[lo, hi)`.
    ///
    /// `lo > hi` fails with `InvalidRange`; `lo == hi` yields an empty series.
    /// Either bound may be infinite.
    fn clip(&self, lo: P, hi: P) -> Result<Self::Output>;

    /// Equivalent to `clip(range.start, range.end)`.
    fn window(&self, range: Range<P>) -> Result<Self::Output> {
        self.clip(range.start, range.end)
    }
}

/// Restricts `series` to `[lo, hi)`. See [`Clip::clip`].
pub fn clip<P: Position, S: Clip<P>>(series: &S, lo: P, hi: P) -> Result<S::Output> {
    series.clip(lo, hi)
}

fn check_window<P: Position>(lo: P, hi: P) -> Result<()> {
    if lo > hi {
        Err(Error::invalid_range(format!("{lo:?}"), format!("{hi:?}")))
    } else {
        Ok(())
    }
}

/// Dense clipping produces one value per grid position of the window: slots
/// inside the source span keep their value, the others hold the default.
///
/// Infinite bounds cannot be materialized, so an open side of the window is
/// first narrowed to the source span; a window that is open on a side where the
/// source has nothing materialized clips to an empty series. Finite bounds
/// must lie on the grid.
impl<V: Clone, P: Position> Clip<P> for DenseSeries<V, P> {
    type Output = DenseSeries<V, P>;

    fn clip(&self, lo: P, hi: P) -> Result<Self::Output> {
        check_window(lo, hi)?;
        let empty = || DenseSeries::from_parts(self.config().clone(), P::ZERO, Vec::new());

        let span = self.span();
        let lo = match (lo.is_finite(), &span) {
            (true, _) => lo,
            (false, Some(span)) if lo == P::NEG_INF => span.start,
            _ => return Ok(empty()),
        };
        let hi = match (hi.is_finite(), &span) {
            (true, _) => hi,
            (false, Some(span)) if hi == P::POS_INF => span.end,
            _ => return Ok(empty()),
        };
        self.check_aligned(lo)?;
        self.check_aligned(hi)?;
        if lo >= hi {
            return Ok(empty().with_origin(lo));
        }

        let first = self.slot_of(lo);
        let count = self.slot_count(lo, hi)?;
        let mut values = reserve_slots(count, &(lo..hi))?;
        values.extend((0..count as i64).map(|k| self.value_at_slot(first + k).clone()));
        Ok(DenseSeries::from_parts(self.config().clone(), lo, values))
    }
}

/// Sparse clipping keeps the intervals that intersect the window, trimmed into
/// it. Gaps stay implicit.
impl<V: Clone + PartialEq, P: Position> Clip<P> for SparseSeries<V, P> {
    type Output = SparseSeries<V, P>;

    fn clip(&self, lo: P, hi: P) -> Result<Self::Output> {
        check_window(lo, hi)?;
        let window = lo..hi;
        let touched = if lo < hi {
            self.search_window(&window)
        } else {
            0..0
        };
        let intervals = self.intervals()[touched]
            .iter()
            .map(|iv| (iv.value().clone(), iv.range()))
            .clamp_to(window)
            .map(|(value, range)| Interval::from_run(value, range))
            .collect();
        Ok(SparseSeries::from_intervals(self.config().clone(), intervals))
    }
}

impl<V: Clone + PartialEq, P: Position> Clip<P> for Series<V, P> {
    type Output = Series<V, P>;

    fn clip(&self, lo: P, hi: P) -> Result<Self::Output> {
        Ok(match self {
            Series::Dense(dense) => Series::Dense(dense.clip(lo, hi)?),
            Series::Sparse(sparse) => Series::Sparse(sparse.clip(lo, hi)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Clip, clip};
    use crate::{config::SeriesConfig, dense::DenseSeries, sparse::SparseSeries};

    const NEG_INF: i64 = i64::MIN;
    const POS_INF: i64 = i64::MAX;

    fn triples(s: &SparseSeries<i32>) -> Vec<(i32, i64, i64)> {
        s.intervals()
            .iter()
            .map(|iv| (*iv.value(), iv.begin(), iv.end()))
            .collect()
    }

    fn base_sparse() -> SparseSeries<i32> {
        let mut s = SparseSeries::default();
        s.insert(1, -1, 2).unwrap();
        s.insert(2, 3, 5).unwrap();
        s.insert(3, 6, 9).unwrap();
        s
    }

    #[test]
    fn test_sparse_clip_edges() {
        let base = base_sparse();
        assert_eq!(
            triples(&clip(&base, -1, 8).unwrap()),
            vec![(1, -1, 2), (2, 3, 5), (3, 6, 8)]
        );
        assert_eq!(
            triples(&clip(&base, 0, 9).unwrap()),
            vec![(1, 0, 2), (2, 3, 5), (3, 6, 9)]
        );
        assert_eq!(triples(&clip(&base, -1, 4).unwrap()), vec![(1, -1, 2), (2, 3, 4)]);
        assert_eq!(triples(&clip(&base, 4, 9).unwrap()), vec![(2, 4, 5), (3, 6, 9)]);

        let narrowed = clip(&clip(&base, 4, 9).unwrap(), 8, 9).unwrap();
        assert_eq!(triples(&narrowed), vec![(3, 8, 9)]);
        assert_eq!(narrowed.discretization(), 1);
    }

    #[test]
    fn test_sparse_clip_gaps_and_empty() {
        let base = base_sparse();
        assert!(base.clip(2, 3).unwrap().is_empty());
        assert!(base.clip(20, 30).unwrap().is_empty());
        assert!(base.clip(4, 4).unwrap().is_empty());
        assert!(base.clip(5, 4).unwrap_err().is_invalid_range());
    }

    #[test]
    fn test_sparse_clip_infinite() {
        let mut s = SparseSeries::<i32>::default();
        s.insert(-42, NEG_INF, 0).unwrap();
        s.insert(42, 0, POS_INF).unwrap();
        assert_eq!(triples(&s.window(NEG_INF..-1).unwrap()), vec![(-42, NEG_INF, -1)]);
        assert_eq!(triples(&s.window(1..POS_INF).unwrap()), vec![(42, 1, POS_INF)]);
        assert_eq!(triples(&s.window(NEG_INF..POS_INF).unwrap()), triples(&s));
    }

    #[test]
    fn test_dense_clip_pads_with_default() {
        let s = DenseSeries::filled(-1i64, 3, 42, SeriesConfig::new(1, 0)).unwrap();
        let c = s.window(-2..4).unwrap();
        assert_eq!(c.origin(), -2);
        assert_eq!(c.values(), &[0, 42, 42, 42, 42, 0]);

        let inner = s.clip(0, 2).unwrap();
        assert_eq!(inner.values(), &[42, 42]);
    }

    #[test]
    fn test_dense_clip_disjoint_and_empty_source() {
        let empty = DenseSeries::<i32>::default();
        let c = empty.clip(0, 4).unwrap();
        assert_eq!(c.len(), 4);
        assert!(c.values().iter().all(|v| *v == 0));

        let s = DenseSeries::filled(0i64, 2, 5, SeriesConfig::new(1, 7)).unwrap();
        assert_eq!(s.clip(10, 13).unwrap().values(), &[7, 7, 7]);
        assert!(s.clip(1, 1).unwrap().is_empty());
    }

    #[test]
    fn test_dense_clip_open_window_narrows_to_span() {
        let s = DenseSeries::filled(-1i64, 3, 1, SeriesConfig::new(1, 0)).unwrap();
        assert_eq!(s.clip(NEG_INF, 1).unwrap().values(), &[1, 1]);
        assert_eq!(s.clip(1, POS_INF).unwrap().values(), &[1, 1]);
        assert_eq!(s.clip(NEG_INF, POS_INF).unwrap(), s);
        assert!(s.clip(5, POS_INF).unwrap().is_empty());
        assert!(DenseSeries::<i32>::default().clip(NEG_INF, POS_INF).unwrap().is_empty());
    }

    #[test]
    fn test_dense_clip_too_wide_to_materialize() {
        let s = DenseSeries::filled(0i64, 2, 1, SeriesConfig::new(1, 0)).unwrap();
        assert!(s.clip(-(1 << 62), 1 << 62).unwrap_err().is_invalid_range());
        assert!(s.clip(0, 1 << 62).unwrap_err().is_invalid_range());
        assert_eq!(s.clip(0, 4).unwrap().values(), &[1, 1, 0, 0]);
    }

    #[test]
    fn test_dense_clip_misaligned() {
        let s = DenseSeries::filled(0i64, 10, 1, SeriesConfig::new(2, 0)).unwrap();
        assert!(s.clip(1, 4).unwrap_err().is_misaligned());
        assert_eq!(s.clip(2, 6).unwrap().values(), &[1, 1]);
    }
}
