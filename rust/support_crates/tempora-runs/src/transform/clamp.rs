//! An iterator adapter that clamps runs to a window.
use std::ops::Range;

/// Iterator adapter that yields the intersection of each input run with a fixed
/// window, keeping the run's value.
///
/// Behavior
/// - For each input run, yields at most one run: the input value over the
///   intersection of its range with `window`.
/// - Runs whose intersection is empty contribute no output.
/// - If `window` itself is empty, the iterator yields no items.
#[derive(Debug, Clone)]
pub struct ClampedRuns<I, T> {
    /// The underlying run iterator.
    inner: I,

    /// The half-open bounds `[start, end)` used to clamp incoming runs.
    window: Range<T>,
}

impl<I, T> ClampedRuns<I, T> {
    pub fn new(inner: I, window: Range<T>) -> Self {
        Self { inner, window }
    }
}

impl<V, T, I> Iterator for ClampedRuns<I, T>
where
    I: Iterator<Item = (V, Range<T>)>,
    T: Ord + Clone,
{
    type Item = (V, Range<T>);

    fn next(&mut self) -> Option<Self::Item> {
        for (value, range) in self.inner.by_ref() {
            let start = range.start.max(self.window.start.clone());
            let end = range.end.min(self.window.end.clone());
            if start < end {
                return Some((value, start..end));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.inner.size_hint();
        (0, upper)
    }
}
