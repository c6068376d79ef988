//! The ordered index domain of a series.

use std::fmt::Debug;

use ordered_float::OrderedFloat;

/// Relative tolerance used when deciding whether a floating point position lies
/// on the discretization grid.
const FLOAT_GRID_TOLERANCE: f64 = 1e-9;

/// An ordered scalar coordinate that series are indexed by.
///
/// Besides a total order, a position domain must provide the two open-ended
/// sentinels [`NEG_INF`](Position::NEG_INF) and [`POS_INF`](Position::POS_INF), and
/// the step arithmetic the dense representation is built on. Arithmetic saturates
/// into the sentinels and never moves a sentinel.
///
/// Implemented for `i64` (where `i64::MIN` and `i64::MAX` play the role of the
/// infinities) and for `OrderedFloat<f64>` (IEEE infinities).
pub trait Position: Copy + Ord + Debug {
    const NEG_INF: Self;
    const POS_INF: Self;
    const ZERO: Self;
    const UNIT: Self;

    fn is_finite(self) -> bool {
        self != Self::NEG_INF && self != Self::POS_INF
    }

    /// Returns `self + steps * step`, saturating into the infinities.
    fn offset(self, steps: i64, step: Self) -> Self;

    /// Returns `self + delta`, saturating into the infinities. An infinite `delta`
    /// moves a finite position to that infinity.
    fn translate(self, delta: Self) -> Self;

    /// Number of whole `step`s from `origin` to `self`, rounded towards negative
    /// infinity. `None` if either position is infinite.
    fn steps_from(self, origin: Self, step: Self) -> Option<i64>;

    /// Whether `self` is an integral multiple of `step`. Infinite positions are
    /// never aligned.
    fn is_aligned(self, step: Self) -> bool;

    /// Length of `[self, end)`, or `None` when either bound is infinite.
    fn measure(self, end: Self) -> Option<f64>;
}

fn saturate_i64(value: i128) -> i64 {
    if value <= i64::MIN as i128 {
        i64::MIN
    } else if value >= i64::MAX as i128 {
        i64::MAX
    } else {
        value as i64
    }
}

impl Position for i64 {
    const NEG_INF: Self = i64::MIN;
    const POS_INF: Self = i64::MAX;
    const ZERO: Self = 0;
    const UNIT: Self = 1;

    fn offset(self, steps: i64, step: Self) -> Self {
        if !self.is_finite() {
            return self;
        }
        saturate_i64(self as i128 + steps as i128 * step as i128)
    }

    fn translate(self, delta: Self) -> Self {
        if !self.is_finite() {
            return self;
        }
        if !delta.is_finite() {
            return delta;
        }
        saturate_i64(self as i128 + delta as i128)
    }

    fn steps_from(self, origin: Self, step: Self) -> Option<i64> {
        if !self.is_finite() || !origin.is_finite() {
            return None;
        }
        let steps = (self as i128 - origin as i128).div_euclid(step as i128);
        i64::try_from(steps).ok()
    }

    fn is_aligned(self, step: Self) -> bool {
        self.is_finite() && self.rem_euclid(step) == 0
    }

    fn measure(self, end: Self) -> Option<f64> {
        if !self.is_finite() || !end.is_finite() {
            return None;
        }
        Some((end as i128 - self as i128) as f64)
    }
}

impl Position for OrderedFloat<f64> {
    const NEG_INF: Self = OrderedFloat(f64::NEG_INFINITY);
    const POS_INF: Self = OrderedFloat(f64::INFINITY);
    const ZERO: Self = OrderedFloat(0.0);
    const UNIT: Self = OrderedFloat(1.0);

    fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    fn offset(self, steps: i64, step: Self) -> Self {
        OrderedFloat(self.0 + steps as f64 * step.0)
    }

    fn translate(self, delta: Self) -> Self {
        if !self.is_finite() {
            return self;
        }
        OrderedFloat(self.0 + delta.0)
    }

    fn steps_from(self, origin: Self, step: Self) -> Option<i64> {
        if !self.is_finite() || !origin.is_finite() {
            return None;
        }
        let ratio = (self.0 - origin.0) / step.0;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= FLOAT_GRID_TOLERANCE {
            nearest
        } else {
            ratio.floor()
        };
        Some(steps as i64)
    }

    fn is_aligned(self, step: Self) -> bool {
        if !self.is_finite() {
            return false;
        }
        let ratio = self.0 / step.0;
        (ratio - ratio.round()).abs() <= FLOAT_GRID_TOLERANCE
    }

    fn measure(self, end: Self) -> Option<f64> {
        if !self.is_finite() || !end.is_finite() {
            return None;
        }
        Some(end.0 - self.0)
    }
}
