//! An iterator adapter that fuses touching runs with equal values.
use std::ops::Range;

/// Iterator adapter that merges consecutive runs when the first ends exactly
/// where the second starts and both carry the same value.
///
/// The input must be ordered by `start` and non-overlapping. Runs separated by
/// a gap are never merged, even if their values are equal.
pub struct CoalescedRuns<I, V, T> {
    inner: I,
    /// The run being grown; yielded once a non-mergeable successor shows up.
    pending: Option<(V, Range<T>)>,
}

impl<I, V, T> CoalescedRuns<I, V, T> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            pending: None,
        }
    }
}

impl<V, T, I> Iterator for CoalescedRuns<I, V, T>
where
    I: Iterator<Item = (V, Range<T>)>,
    V: PartialEq,
    T: PartialEq,
{
    type Item = (V, Range<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let mut cur = match self.pending.take() {
            Some(run) => run,
            None => self.inner.next()?,
        };
        for (value, range) in self.inner.by_ref() {
            if range.start == cur.1.end && value == cur.0 {
                cur.1.end = range.end;
            } else {
                self.pending = Some((value, range));
                break;
            }
        }
        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.inner.size_hint();
        let extra = usize::from(self.pending.is_some());
        (
            lower.min(1).max(extra),
            upper.and_then(|n| n.checked_add(extra)),
        )
    }
}
