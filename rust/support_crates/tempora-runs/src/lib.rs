//! Iterator adapters over ordered runs of values.
//!
//! A *run* is a `(value, Range<T>)` pair: the value holds at every position of the
//! half-open range. The adapters here work on streams of runs that are ordered by
//! `start` and never overlap, regardless of how those runs are stored. They offer:
//!
//! - **Windowing**: clamp every run into a fixed half-open window
//! - **Coalescing**: fuse adjacent runs that carry equal values
//! - **Overlay**: walk two run streams in lockstep, yielding the maximal segments
//!   over which both sides are constant
//!
//! # Key Types
//!
//! - [`RunIteratorsExt`] - Extension trait providing the single-stream adapters
//! - [`Overlay`] - Lockstep merge of two run streams, see [`overlay`]

pub mod set_ops;
pub mod transform;

pub use set_ops::overlay::{Overlay, OverlaySegment, overlay};
pub use transform::RunIteratorsExt;
