//! Time-indexed value storage.
//!
//! A series maps every position of an ordered index domain to a value: an
//! explicit one where something was stored, the configured default everywhere
//! else. Two storage representations are provided:
//!
//! - [`DenseSeries`] materializes one value per position of a regular grid over
//!   a finite span;
//! - [`SparseSeries`] stores an ordered list of non-overlapping [`Interval`]s,
//!   possibly open-ended.
//!
//! [`Series`] wraps either one. On top of them the crate offers windowing
//! ([`Clip`]), ordered transactional construction ([`OrderedInserter`]),
//! pointwise combination ([`combine`] and the arithmetic operators) and a few
//! numeric helpers ([`shift`], [`integrate`]).
//!
//! Positions are `i64` by default, with `i64::MIN` / `i64::MAX` standing for
//! the infinities; `OrderedFloat<f64>` positions are also supported. See
//! [`Position`].

pub mod clip;
pub mod combine;
pub mod config;
pub mod dense;
pub mod inserter;
pub mod interval;
pub mod numeric;
pub mod position;
pub mod series;
pub mod sparse;


pub use clip::{Clip, clip};
pub use combine::{combine, map};
pub use config::SeriesConfig;
pub use dense::{DenseRuns, DenseSeries};
pub use inserter::{InserterState, OrderedInserter, OrderedStorage};
pub use interval::Interval;
pub use numeric::{integrate, shift};
pub use position::Position;
pub use series::{Runs, Series, SeriesKind};
pub use sparse::{SparseRuns, SparseSeries};
