use std::ops::Range;

/// Creates an iterator that walks two ordered, non-overlapping run streams in
/// lockstep and yields one [`OverlaySegment`] per maximal region over which both
/// inputs are constant.
///
/// Each input iterable (`a` and `b`) must yield `(value, Range<T>)` runs:
/// * In ascending order by `start`.
/// * That never overlap within the same iterable (adjacent is allowed).
///
/// The returned iterator:
/// * Yields segments in ascending order; segments never overlap.
/// * Covers exactly the union of both inputs' ranges. Positions covered by
///   neither input produce no segment.
/// * Splits a run wherever a boundary of the other input falls inside it, so
///   every segment sees a single value (or absence) from each side.
///
/// This is a streaming, O(len(a) + len(b)) operation that holds at most one
/// partially consumed run per side.
pub fn overlay<T, A, B, L, R>(a: L, b: R) -> Overlay<L::IntoIter, R::IntoIter, A, B, T>
where
    T: Ord + Clone,
    A: Clone,
    B: Clone,
    L: IntoIterator<Item = (A, Range<T>)>,
    R: IntoIterator<Item = (B, Range<T>)>,
{
    Overlay::new(a.into_iter(), b.into_iter())
}

/// One region produced by [`Overlay`]: the half-open `range` together with the
/// value each side holds there (`None` when that side has no run covering it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySegment<A, B, T> {
    pub range: Range<T>,
    pub left: Option<A>,
    pub right: Option<B>,
}

/// Iterator adapter that overlays two ordered run streams.
///
/// Prefer constructing via [`overlay`] unless you already have the concrete
/// iterators.
pub struct Overlay<I, J, A, B, T> {
    a: I,
    b: J,
    /// Remainder of the current left run, not yet yielded.
    pending_a: Option<(A, Range<T>)>,
    /// Remainder of the current right run, not yet yielded.
    pending_b: Option<(B, Range<T>)>,
}

impl<I, J, A, B, T> Overlay<I, J, A, B, T>
where
    I: Iterator<Item = (A, Range<T>)>,
    J: Iterator<Item = (B, Range<T>)>,
    T: Ord,
{
    pub fn new(a: I, b: J) -> Self {
        Self {
            a,
            b,
            pending_a: None,
            pending_b: None,
        }
    }

    fn fill(&mut self) {
        if self.pending_a.is_none() {
            self.pending_a = self.a.by_ref().find(|(_, r)| r.start < r.end);
        }
        if self.pending_b.is_none() {
            self.pending_b = self.b.by_ref().find(|(_, r)| r.start < r.end);
        }
    }
}

impl<I, J, A, B, T> Iterator for Overlay<I, J, A, B, T>
where
    I: Iterator<Item = (A, Range<T>)>,
    J: Iterator<Item = (B, Range<T>)>,
    A: Clone,
    B: Clone,
    T: Ord + Clone,
{
    type Item = OverlaySegment<A, B, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fill();
        match (self.pending_a.take(), self.pending_b.take()) {
            (None, None) => None,
            (Some((va, ra)), None) => Some(OverlaySegment {
                range: ra,
                left: Some(va),
                right: None,
            }),
            (None, Some((vb, rb))) => Some(OverlaySegment {
                range: rb,
                left: None,
                right: Some(vb),
            }),
            (Some((va, ra)), Some((vb, rb))) => {
                if ra.start < rb.start {
                    // Left alone up to the next right boundary.
                    let end = ra.end.clone().min(rb.start.clone());
                    if end < ra.end {
                        self.pending_a = Some((va.clone(), end.clone()..ra.end));
                    }
                    self.pending_b = Some((vb, rb));
                    Some(OverlaySegment {
                        range: ra.start..end,
                        left: Some(va),
                        right: None,
                    })
                } else if rb.start < ra.start {
                    let end = rb.end.clone().min(ra.start.clone());
                    if end < rb.end {
                        self.pending_b = Some((vb.clone(), end.clone()..rb.end));
                    }
                    self.pending_a = Some((va, ra));
                    Some(OverlaySegment {
                        range: rb.start..end,
                        left: None,
                        right: Some(vb),
                    })
                } else {
                    let end = ra.end.clone().min(rb.end.clone());
                    if end < ra.end {
                        self.pending_a = Some((va.clone(), end.clone()..ra.end));
                    }
                    if end < rb.end {
                        self.pending_b = Some((vb.clone(), end.clone()..rb.end));
                    }
                    Some(OverlaySegment {
                        range: ra.start..end,
                        left: Some(va),
                        right: Some(vb),
                    })
                }
            }
        }
    }
}
