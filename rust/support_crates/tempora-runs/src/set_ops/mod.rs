//! Operations combining two run streams.

pub mod overlay;
