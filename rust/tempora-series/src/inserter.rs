//! Ordered, transactional construction of series content.
//!
//! An [`OrderedInserter`] buffers a sequence of writes whose positions never go
//! backwards and applies them to its target in a single step on
//! [`commit`](OrderedInserter::commit). Commit *rewrites* the stretch of the
//! target between the first pending write's begin and the last pending write's
//! end: anything previously stored there is discarded, positions not covered by
//! a pending write fall back to the default, and content outside the stretch is
//! left untouched.
//!
//! A failed append is rejected without side effects: the inserter stays open and
//! its buffer keeps the writes accepted so far. Dropping an inserter without
//! committing leaves the target unchanged.

use std::{fmt, mem, ops::Range};

use tempora_common::{Result, error::Error};

use crate::{
    dense::DenseSeries, interval::Interval, position::Position, series::Series,
    sparse::SparseSeries,
};

/// Storage that an [`OrderedInserter`] can commit into.
pub trait OrderedStorage<V, P: Position> {
    /// Width of a point write and the default cursor advance.
    fn discretization(&self) -> P;

    /// Validates a write before it is buffered, so that commit itself cannot
    /// fail half-way. The inserter checks each write and the window that
    /// commit would replace once the write is buffered.
    fn check_write(&self, range: &Range<P>) -> Result<()>;

    /// Replaces the content of `window` with `writes`: ordered, non-overlapping
    /// runs lying within `window`, each previously accepted by
    /// [`check_write`](Self::check_write). On error the storage is unchanged.
    fn replace_window(&mut self, window: Range<P>, writes: Vec<(V, Range<P>)>) -> Result<()>;

    /// Starts an ordered insertion with the cursor at `P::ZERO`.
    fn ordered_inserter(&mut self) -> OrderedInserter<'_, Self, V, P>
    where
        Self: Sized,
    {
        OrderedInserter::new(self)
    }

    /// Starts an ordered insertion with the cursor at `start`.
    fn ordered_inserter_at(&mut self, start: P) -> OrderedInserter<'_, Self, V, P>
    where
        Self: Sized,
    {
        OrderedInserter::starting_at(self, start)
    }
}

impl<V: Clone, P: Position> OrderedStorage<V, P> for DenseSeries<V, P> {
    fn discretization(&self) -> P {
        DenseSeries::discretization(self)
    }

    fn check_write(&self, range: &Range<P>) -> Result<()> {
        DenseSeries::check_write(self, range)
    }

    fn replace_window(&mut self, window: Range<P>, writes: Vec<(V, Range<P>)>) -> Result<()> {
        DenseSeries::replace_window(self, window, writes)
    }
}

impl<V: Clone + PartialEq, P: Position> OrderedStorage<V, P> for SparseSeries<V, P> {
    fn discretization(&self) -> P {
        SparseSeries::discretization(self)
    }

    fn check_write(&self, _range: &Range<P>) -> Result<()> {
        Ok(())
    }

    fn replace_window(&mut self, window: Range<P>, writes: Vec<(V, Range<P>)>) -> Result<()> {
        self.splice_window(window, writes);
        Ok(())
    }
}

impl<V: Clone + PartialEq, P: Position> OrderedStorage<V, P> for Series<V, P> {
    fn discretization(&self) -> P {
        Series::discretization(self)
    }

    fn check_write(&self, range: &Range<P>) -> Result<()> {
        match self {
            Series::Dense(dense) => OrderedStorage::check_write(dense, range),
            Series::Sparse(sparse) => OrderedStorage::check_write(sparse, range),
        }
    }

    fn replace_window(&mut self, window: Range<P>, writes: Vec<(V, Range<P>)>) -> Result<()> {
        match self {
            Series::Dense(dense) => OrderedStorage::replace_window(dense, window, writes),
            Series::Sparse(sparse) => OrderedStorage::replace_window(sparse, window, writes),
        }
    }
}

/// Lifecycle of an [`OrderedInserter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InserterState {
    /// Accepting appends.
    Open,
    /// Pending writes have been applied to the target.
    Committed,
    /// Pending writes were dropped without touching the target.
    Discarded,
}

impl fmt::Display for InserterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InserterState::Open => f.write_str("open"),
            InserterState::Committed => f.write_str("committed"),
            InserterState::Discarded => f.write_str("discarded"),
        }
    }
}

/// Builder that accumulates ordered writes for one target and applies them
/// atomically.
///
/// Appends chain through `?`:
///
/// ```
/// use tempora_series::{DenseSeries, OrderedStorage, clip};
///
/// let mut s = DenseSeries::<i32>::default();
/// s.ordered_inserter_at(-1)
///     .append(1)?
///     .append(2)?
///     .append(3)?
///     .append(4)?
///     .commit()?;
/// assert_eq!(clip(&s, -1, 3)?.values(), &[1, 2, 3, 4]);
/// # Ok::<(), tempora_common::error::Error>(())
/// ```
pub struct OrderedInserter<'a, S, V, P> {
    target: &'a mut S,
    cursor: P,
    pending: Vec<Interval<V, P>>,
    state: InserterState,
}

impl<'a, S, V, P> OrderedInserter<'a, S, V, P>
where
    S: OrderedStorage<V, P>,
    P: Position,
{
    pub fn new(target: &'a mut S) -> Self {
        Self::starting_at(target, P::ZERO)
    }

    pub fn starting_at(target: &'a mut S, start: P) -> Self {
        Self {
            target,
            cursor: start,
            pending: Vec::new(),
            state: InserterState::Open,
        }
    }

    /// Position the next [`append`](Self::append) writes at.
    pub fn cursor(&self) -> P {
        self.cursor
    }

    pub fn state(&self) -> InserterState {
        self.state
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Writes `value` at the cursor, one discretization step wide, and advances
    /// the cursor past it.
    pub fn append(&mut self, value: V) -> Result<&mut Self> {
        self.ensure_open("append")?;
        let range = self.point_range(self.cursor)?;
        self.push(value, range)?;
        Ok(self)
    }

    /// Writes `value` at `begin`, one discretization step wide. Fails with
    /// `OrderViolation` if `begin` precedes the end of the last pending write,
    /// and with `InvalidRange` if the step would end at the positive infinity.
    pub fn append_at(&mut self, value: V, begin: P) -> Result<&mut Self> {
        self.ensure_open("append")?;
        let range = self.point_range(begin)?;
        self.push(value, range)?;
        Ok(self)
    }

    /// Writes `value` over `[begin, end)`. Fails with `InvalidRange` unless
    /// `begin < end`, and with `OrderViolation` if `begin` precedes the end of
    /// the last pending write.
    pub fn append_range(&mut self, value: V, begin: P, end: P) -> Result<&mut Self> {
        self.ensure_open("append")?;
        self.push(value, begin..end)?;
        Ok(self)
    }

    /// Applies every pending write to the target in one step.
    ///
    /// The target's content over `[first begin, last end)` of the pending writes
    /// is replaced; with no pending writes the target is left as is.
    pub fn commit(&mut self) -> Result<()> {
        self.ensure_open("commit")?;
        self.state = InserterState::Committed;
        let pending = mem::take(&mut self.pending);
        let (Some(first), Some(last)) = (pending.first(), pending.last()) else {
            log::debug!("commit: no pending writes");
            return Ok(());
        };
        let window = first.begin()..last.end();
        log::debug!(
            "commit: replacing window {:?} with {} writes",
            window,
            pending.len()
        );
        let writes = pending.into_iter().map(Interval::into_run).collect();
        self.target.replace_window(window, writes)
    }

    /// Drops all pending writes without touching the target.
    pub fn discard(&mut self) -> Result<()> {
        self.ensure_open("discard")?;
        self.state = InserterState::Discarded;
        self.pending.clear();
        Ok(())
    }

    fn ensure_open(&self, operation: &str) -> Result<()> {
        if self.state == InserterState::Open {
            Ok(())
        } else {
            Err(Error::invalid_state(self.state.to_string(), operation))
        }
    }

    /// One discretization step starting at `begin`. The end of a finite step
    /// must stay finite.
    fn point_range(&self, begin: P) -> Result<Range<P>> {
        let end = begin.offset(1, self.target.discretization());
        if begin.is_finite() && !end.is_finite() {
            return Err(Error::invalid_range(
                format!("{begin:?}"),
                format!("{end:?}"),
            ));
        }
        Ok(begin..end)
    }

    fn push(&mut self, value: V, range: Range<P>) -> Result<()> {
        let interval = Interval::new(value, range.start, range.end)?;
        if let Some(last) = self.pending.last() {
            if range.start < last.end() {
                return Err(Error::order_violation(
                    format!("{:?}", range.start),
                    format!("{:?}", last.end()),
                ));
            }
        }
        self.target.check_write(&range)?;
        if let Some(first) = self.pending.first() {
            self.target.check_write(&(first.begin()..range.end))?;
        }
        self.cursor = range.end;
        self.pending.push(interval);
        Ok(())
    }
}
