//! Pointwise combination of series.
//!
//! Each operand is treated as a total function over the whole position domain:
//! its explicit value where it stores one, its default everywhere else. The
//! combination `op(a(x), b(x))` is computed by overlaying the two run lists in
//! a single ordered pass, so the cost is linear in the number of stored runs
//! rather than in the width of the domain.

use std::ops::{Add, Div, Mul, Neg, Range, Sub};

use tempora_runs::overlay;

use crate::{
    config::SeriesConfig,
    dense::DenseSeries,
    position::Position,
    series::{Series, SeriesKind},
    sparse::SparseSeries,
};

/// A dense result may hold at most this many slots per output segment.
const DENSE_EXPANSION: usize = 4;

/// Combines `a` and `b` pointwise with `op`.
///
/// The result covers the union of both operands' explicit domains and its
/// default is `op(a.default, b.default)`. It takes `a`'s discretization. Two
/// sparse operands give a sparse result. As soon as one operand is dense the
/// result is dense, unless some output segment is open-ended or off the grid,
/// or the output span holds more than `DENSE_EXPANSION` slots per output
/// segment. In those cases it stays sparse.
///
/// `op` is always called with the value of `a` as its first argument, so
/// non-commutative operators are applied as `a op b`.
pub fn combine<V, W, U, P, F>(a: &Series<V, P>, b: &Series<W, P>, op: F) -> Series<U, P>
where
    V: Clone + PartialEq,
    W: Clone + PartialEq,
    U: Clone + PartialEq,
    P: Position,
    F: Fn(&V, &W) -> U,
{
    let step = a.discretization();
    let config = SeriesConfig::new(step, op(a.default_value(), b.default_value()));

    let segments: Vec<(U, Range<P>)> = overlay(a.runs(), b.runs())
        .map(|segment| {
            let left = segment.left.unwrap_or(a.default_value());
            let right = segment.right.unwrap_or(b.default_value());
            (op(left, right), segment.range)
        })
        .collect();

    let dense_input = a.kind() == SeriesKind::Dense || b.kind() == SeriesKind::Dense;
    let on_grid = |range: &Range<P>| range.start.is_aligned(step) && range.end.is_aligned(step);
    let densify = dense_input
        && segments.iter().all(|(_, range)| on_grid(range))
        && compact_enough(&segments, step);
    let result = match densify.then(|| DenseSeries::from_segments(config.clone(), &segments)) {
        Some(Ok(dense)) => Series::Dense(dense),
        Some(Err(e)) => {
            log::debug!("combine: keeping sparse output, {e}");
            Series::Sparse(SparseSeries::from_runs(config, segments))
        }
        None => Series::Sparse(SparseSeries::from_runs(config, segments)),
    };

    log::debug!(
        "combine: {:?} with {:?} -> {:?}, {} runs",
        a.kind(),
        b.kind(),
        result.kind(),
        result.runs().count()
    );
    result
}

/// Whether materializing the grid under `segments` costs at most
/// `DENSE_EXPANSION` slots per segment.
fn compact_enough<U, P: Position>(segments: &[(U, Range<P>)], step: P) -> bool {
    let (Some((_, first)), Some((_, last))) = (segments.first(), segments.last()) else {
        return true;
    };
    let Some(slots) = last.end.steps_from(first.start, step) else {
        return false;
    };
    let budget = segments.len().saturating_mul(DENSE_EXPANSION);
    usize::try_from(slots).is_ok_and(|slots| slots <= budget)
}

/// Applies `f` to every stored value and to the default, keeping the
/// representation.
pub fn map<V, U, P, F>(series: &Series<V, P>, f: F) -> Series<U, P>
where
    V: Clone + PartialEq,
    U: Clone + PartialEq,
    P: Position,
    F: FnMut(&V) -> U,
{
    match series {
        Series::Dense(dense) => Series::Dense(dense.map(f)),
        Series::Sparse(sparse) => Series::Sparse(sparse.map(f)),
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident) => {
        impl<V, P> $trait<&Series<V, P>> for &Series<V, P>
        where
            V: Clone + PartialEq + $trait<Output = V>,
            P: Position,
        {
            type Output = Series<V, P>;

            fn $method(self, rhs: &Series<V, P>) -> Series<V, P> {
                combine(self, rhs, |x, y| x.clone().$method(y.clone()))
            }
        }

        impl<V, P> $trait for Series<V, P>
        where
            V: Clone + PartialEq + $trait<Output = V>,
            P: Position,
        {
            type Output = Series<V, P>;

            fn $method(self, rhs: Series<V, P>) -> Series<V, P> {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
// Integer division panics where the divisor reads zero, its default included.
impl_binary_op!(Div, div);

impl<V, P> Neg for &Series<V, P>
where
    V: Clone + PartialEq + Neg<Output = V>,
    P: Position,
{
    type Output = Series<V, P>;

    fn neg(self) -> Series<V, P> {
        map(self, |v| -v.clone())
    }
}

impl<V, P> Neg for Series<V, P>
where
    V: Clone + PartialEq + Neg<Output = V>,
    P: Position,
{
    type Output = Series<V, P>;

    fn neg(self) -> Series<V, P> {
        -&self
    }
}
