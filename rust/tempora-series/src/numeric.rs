//! Numeric helpers over whole series: translation along the position axis and
//! integration of the stored values.

use std::ops::Mul;

use num_traits::{NumCast, Zero};
use tempora_common::{Result, error::Error};

use crate::{position::Position, series::Series, sparse::SparseSeries};

/// Returns `series` moved by `amount` along the position axis, so that the
/// value read at `x` in the source is read at `x + amount` in the result.
///
/// Infinite interval bounds stay infinite. The amount itself must be finite,
/// and no finite bound may be moved onto or past an infinity
/// (`InvalidArgument` otherwise). A dense series can only move by whole grid
/// steps (`Misaligned` otherwise).
pub fn shift<V, P>(series: &Series<V, P>, amount: P) -> Result<Series<V, P>>
where
    V: Clone + PartialEq,
    P: Position,
{
    if !amount.is_finite() {
        return Err(Error::invalid_arg(
            "amount",
            format!("shift amount must be finite, got {amount:?}"),
        ));
    }
    Ok(match series {
        Series::Dense(dense) => {
            dense.check_aligned(amount)?;
            if let Some(span) = dense.span() {
                translate_bound(span.end, amount)?;
            }
            let origin = translate_bound(dense.origin(), amount)?;
            Series::Dense(dense.clone().with_origin(origin))
        }
        Series::Sparse(sparse) => {
            let runs = sparse
                .runs()
                .map(|(value, range)| {
                    let start = translate_bound(range.start, amount)?;
                    let end = translate_bound(range.end, amount)?;
                    Ok((value.clone(), start..end))
                })
                .collect::<Result<Vec<_>>>()?;
            Series::Sparse(SparseSeries::from_runs(sparse.config().clone(), runs))
        }
    })
}

fn translate_bound<P: Position>(bound: P, amount: P) -> Result<P> {
    if !bound.is_finite() {
        return Ok(bound);
    }
    let moved = bound.translate(amount);
    if moved.is_finite() {
        Ok(moved)
    } else {
        Err(Error::invalid_arg(
            "amount",
            format!("shifting {bound:?} by {amount:?} leaves the finite domain"),
        ))
    }
}

/// Integral of the series over the whole position domain: the sum of
/// `value * length` over the explicit runs.
///
/// The default covers an infinite extent around the stored runs, so it must be
/// zero; likewise a run with an infinite bound must hold zero. Otherwise the
/// integral diverges and the call fails with `Unbounded`.
pub fn integrate<V, P>(series: &Series<V, P>) -> Result<V>
where
    V: Clone + PartialEq + Zero + Mul<Output = V> + NumCast,
    P: Position,
{
    if !series.default_value().is_zero() {
        return Err(Error::unbounded("integrate"));
    }
    let mut total = V::zero();
    for (value, range) in series.runs() {
        if value.is_zero() {
            continue;
        }
        let Some(length) = range.start.measure(range.end) else {
            return Err(Error::unbounded("integrate"));
        };
        let length: V = NumCast::from(length).ok_or_else(|| {
            Error::invalid_arg(
                "length",
                format!("run length {length} is not representable in the value type"),
            )
        })?;
        total = total + value.clone() * length;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use ordered_float::OrderedFloat;

    use super::{integrate, shift};
    use crate::{config::SeriesConfig, series::Series, sparse::SparseSeries};

    fn sparse_of(runs: &[(i32, i64, i64)]) -> Series<i32> {
        let mut s = SparseSeries::default();
        for &(value, begin, end) in runs {
            s.insert(value, begin, end).unwrap();
        }
        s.into()
    }

    fn triples(s: &Series<i32>) -> Vec<(i32, i64, i64)> {
        s.runs().map(|(v, r)| (*v, r.start, r.end)).collect()
    }

    #[test]
    fn test_integrate_sparse() {
        let s = sparse_of(&[(2, 0, 10), (4, 10, 20), (2, 90, 99)]);
        assert_eq!(integrate(&s).unwrap(), 78);
        assert_eq!(integrate(&sparse_of(&[])).unwrap(), 0);
    }

    #[test]
    fn test_integrate_dense_and_float() {
        let dense = Series::dense_filled(0i64, 6, 3, SeriesConfig::new(2, 0)).unwrap();
        assert_eq!(integrate(&dense).unwrap(), 18);

        let mut s = SparseSeries::new(SeriesConfig::new(OrderedFloat(0.5), 0.0)).unwrap();
        s.insert(1.5, OrderedFloat(0.0), OrderedFloat(0.5)).unwrap();
        s.insert(2.0, OrderedFloat(1.0), OrderedFloat(2.5)).unwrap();
        assert_eq!(integrate(&Series::from(s)).unwrap(), 3.75);
    }

    #[test]
    fn test_integrate_unbounded() {
        let open = sparse_of(&[(1, 0, i64::MAX)]);
        assert!(integrate(&open).unwrap_err().is_unbounded());

        let zero_tail = sparse_of(&[(3, 0, 2), (0, 2, i64::MAX)]);
        assert_eq!(integrate(&zero_tail).unwrap(), 6);

        let biased = Series::<i32>::sparse(SeriesConfig::new(1, 1)).unwrap();
        assert!(integrate(&biased).unwrap_err().is_unbounded());
    }

    #[test]
    fn test_shift_sparse() {
        let s = sparse_of(&[(1, -1, 2), (2, 3, 5), (3, 6, 9)]);
        let shifted = shift(&s, 1).unwrap();
        assert_eq!(triples(&shifted), vec![(1, 0, 3), (2, 4, 6), (3, 7, 10)]);
        assert_eq!(triples(&shift(&shifted, -1).unwrap()), triples(&s));
    }

    #[test]
    fn test_shift_keeps_infinities() {
        let s = sparse_of(&[(-1, i64::MIN, 0), (1, 0, i64::MAX)]);
        let shifted = shift(&s, 5).unwrap();
        assert_eq!(triples(&shifted), vec![(-1, i64::MIN, 5), (1, 5, i64::MAX)]);
        assert!(shift(&s, i64::MAX).is_err());
    }

    #[test]
    fn test_shift_rejects_bounds_reaching_infinity() {
        let s = sparse_of(&[(5, i64::MAX - 10, i64::MAX - 5)]);
        assert!(shift(&s, 20).is_err());
        assert!(shift(&s, 5).is_err());
        assert_eq!(
            triples(&shift(&s, 4).unwrap()),
            vec![(5, i64::MAX - 6, i64::MAX - 1)]
        );

        let low = sparse_of(&[(5, i64::MIN + 2, 0)]);
        assert!(shift(&low, -2).is_err());

        let config = SeriesConfig::new(2, 0);
        let dense = Series::dense_filled(i64::MAX - 5, i64::MAX - 1, 1, config).unwrap();
        assert!(shift(&dense, 2).is_err());
        assert_eq!(shift(&dense, -2).unwrap().as_dense().unwrap().origin(), i64::MAX - 7);
    }

    #[test]
    fn test_shift_dense() {
        let s = Series::dense_filled(0i64, 4, 7, SeriesConfig::new(2, 0)).unwrap();
        let shifted = shift(&s, -6).unwrap();
        let dense = shifted.as_dense().unwrap();
        assert_eq!(dense.origin(), -6);
        assert_eq!(dense.values(), &[7, 7]);
        assert_eq!(*shifted.get(-4).unwrap(), 7);
        assert_eq!(*shifted.get(0).unwrap(), 0);
        assert!(shift(&s, 3).unwrap_err().is_misaligned());
    }
}
