//! Construction parameters shared by every series representation.

use num_traits::Zero;
use tempora_common::{Result, verify_arg};

use crate::position::Position;

/// Parameters every series is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesConfig<V, P> {
    /// Distance between two addressable positions of a dense series. Also the
    /// width of a point write issued through an ordered inserter.
    pub discretization: P,

    /// Value reported for every position without an explicit entry.
    pub default: V,
}

impl<V: Zero, P: Position> Default for SeriesConfig<V, P> {
    fn default() -> Self {
        Self {
            discretization: P::UNIT,
            default: V::zero(),
        }
    }
}

impl<V, P: Position> SeriesConfig<V, P> {
    pub fn new(discretization: P, default: V) -> Self {
        Self {
            discretization,
            default,
        }
    }

    pub fn with_discretization(mut self, discretization: P) -> Self {
        self.discretization = discretization;
        self
    }

    pub fn with_default(mut self, default: V) -> Self {
        self.default = default;
        self
    }

    /// Validates the configuration: the discretization must be a positive,
    /// finite step.
    pub fn validate(&self) -> Result<()> {
        let discretization = self.discretization;
        verify_arg!(discretization, discretization > P::ZERO);
        verify_arg!(discretization, discretization.is_finite());
        Ok(())
    }
}
