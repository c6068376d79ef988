//! The representation-agnostic series.

use std::ops::Range;

use tempora_common::Result;

use crate::{
    config::SeriesConfig,
    dense::{DenseRuns, DenseSeries},
    position::Position,
    sparse::{SparseRuns, SparseSeries},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Dense,
    Sparse,
}

/// A series in one of the two storage representations.
///
/// Reads, windowing ([`Clip`](crate::clip::Clip)), ordered insertion and the
/// pointwise operators behave the same for both; only the storage cost and the
/// alignment rules of the dense grid differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Series<V, P = i64> {
    Dense(DenseSeries<V, P>),
    Sparse(SparseSeries<V, P>),
}

impl<V: Clone + PartialEq, P: Position> Series<V, P> {
    pub fn dense(config: SeriesConfig<V, P>) -> Result<Self> {
        DenseSeries::new(config).map(Series::Dense)
    }

    pub fn dense_filled(begin: P, end: P, value: V, config: SeriesConfig<V, P>) -> Result<Self> {
        DenseSeries::filled(begin, end, value, config).map(Series::Dense)
    }

    pub fn sparse(config: SeriesConfig<V, P>) -> Result<Self> {
        SparseSeries::new(config).map(Series::Sparse)
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            Series::Dense(_) => SeriesKind::Dense,
            Series::Sparse(_) => SeriesKind::Sparse,
        }
    }

    pub fn config(&self) -> &SeriesConfig<V, P> {
        match self {
            Series::Dense(dense) => dense.config(),
            Series::Sparse(sparse) => sparse.config(),
        }
    }

    pub fn discretization(&self) -> P {
        self.config().discretization
    }

    pub fn default_value(&self) -> &V {
        &self.config().default
    }

    /// Returns the value at `pos`. Dense series reject positions off their grid.
    pub fn get(&self, pos: P) -> Result<&V> {
        match self {
            Series::Dense(dense) => dense.get(pos),
            Series::Sparse(sparse) => Ok(sparse.get(pos)),
        }
    }

    /// True when nothing is stored explicitly: every position reads as the
    /// default.
    pub fn is_empty(&self) -> bool {
        match self {
            Series::Dense(dense) => dense.is_empty(),
            Series::Sparse(sparse) => sparse.is_empty(),
        }
    }

    /// The explicitly stored runs, in ascending order. Every dense slot is a
    /// run one discretization step wide.
    pub fn runs(&self) -> Runs<'_, V, P> {
        match self {
            Series::Dense(dense) => Runs::Dense(dense.runs()),
            Series::Sparse(sparse) => Runs::Sparse(sparse.runs()),
        }
    }

    pub fn first_run(&self) -> Option<(&V, Range<P>)> {
        match self {
            Series::Dense(dense) => dense.first_run(),
            Series::Sparse(sparse) => sparse.first_run(),
        }
    }

    pub fn last_run(&self) -> Option<(&V, Range<P>)> {
        match self {
            Series::Dense(dense) => dense.last_run(),
            Series::Sparse(sparse) => sparse.last_run(),
        }
    }

    pub fn as_dense(&self) -> Option<&DenseSeries<V, P>> {
        match self {
            Series::Dense(dense) => Some(dense),
            Series::Sparse(_) => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&SparseSeries<V, P>> {
        match self {
            Series::Dense(_) => None,
            Series::Sparse(sparse) => Some(sparse),
        }
    }

    /// Converts into the sparse representation. Never fails: every dense series
    /// has a sparse equivalent.
    pub fn into_sparse(self) -> SparseSeries<V, P> {
        match self {
            Series::Dense(dense) => dense.to_sparse(),
            Series::Sparse(sparse) => sparse,
        }
    }

    /// Converts into the dense representation; see [`SparseSeries::to_dense`].
    pub fn into_dense(self) -> Result<DenseSeries<V, P>> {
        match self {
            Series::Dense(dense) => Ok(dense),
            Series::Sparse(sparse) => sparse.to_dense(),
        }
    }
}

impl<V, P> From<DenseSeries<V, P>> for Series<V, P> {
    fn from(dense: DenseSeries<V, P>) -> Self {
        Series::Dense(dense)
    }
}

impl<V, P> From<SparseSeries<V, P>> for Series<V, P> {
    fn from(sparse: SparseSeries<V, P>) -> Self {
        Series::Sparse(sparse)
    }
}

/// Iterator over the runs of a [`Series`], whichever its representation.
pub enum Runs<'a, V, P> {
    Dense(DenseRuns<'a, V, P>),
    Sparse(SparseRuns<'a, V, P>),
}

impl<'a, V, P: Position> Iterator for Runs<'a, V, P> {
    type Item = (&'a V, Range<P>);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Runs::Dense(runs) => runs.next(),
            Runs::Sparse(runs) => runs.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Runs::Dense(runs) => runs.size_hint(),
            Runs::Sparse(runs) => runs.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Series, SeriesKind};
    use crate::config::SeriesConfig;

    #[test]
    fn test_uniform_reads() {
        let dense = Series::dense_filled(0i64, 3, 5, SeriesConfig::new(1, 0)).unwrap();
        let sparse = Series::Sparse(dense.clone().into_sparse());
        assert_eq!(dense.kind(), SeriesKind::Dense);
        assert_eq!(sparse.kind(), SeriesKind::Sparse);
        for pos in -2..6 {
            assert_eq!(dense.get(pos).unwrap(), sparse.get(pos).unwrap());
        }
        assert_eq!(sparse.runs().count(), 1);
        assert_eq!(dense.runs().count(), 3);
        assert_eq!(dense.first_run(), Some((&5, 0..1)));
        assert_eq!(sparse.last_run(), Some((&5, 0..3)));
    }

    #[test]
    fn test_constructors_validate() {
        assert!(Series::<i32>::dense(SeriesConfig::new(0, 0)).is_err());
        assert!(Series::<i32>::sparse(SeriesConfig::new(-1, 0)).is_err());
        let s = Series::<i32>::sparse(SeriesConfig::new(2, 9)).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.discretization(), 2);
        assert_eq!(*s.default_value(), 9);
        assert_eq!(*s.get(123).unwrap(), 9);
    }

    #[test]
    fn test_conversions() {
        let sparse = Series::<i32>::sparse(SeriesConfig::default()).unwrap();
        let dense = sparse.into_dense().unwrap();
        assert!(dense.is_empty());

        let s: Series<i32> = dense.into();
        assert!(s.as_dense().is_some());
        assert!(s.as_sparse().is_none());
    }
}
